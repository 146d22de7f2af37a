use crate::core::mappers::{
    brands_from, cars_from, statuses_from, to_car_create_dto, to_car_update_dto, unique_brands,
    CarForm,
};
use crate::core::services::{AdminService, CustomerService};
use crate::domain::model::{Brand, Car, CarStatus};
use crate::domain::ports::Dashboard;
use crate::utils::error::{Result, RoadReadyError};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// The fleet screen has a single view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FleetView;

/// Loaded statuses, then the built-in table, then whatever the cars carry.
/// Keyed by id (or name); later entries win, first-seen order is kept.
pub fn unique_statuses(loaded: &[CarStatus], cars: &[Car]) -> Vec<CarStatus> {
    let from_cars = cars.iter().map(|c| CarStatus {
        status_id: c.status_id,
        status_name: c.status_name.clone(),
    });

    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, CarStatus> = HashMap::new();
    for status in loaded
        .iter()
        .cloned()
        .chain(CarStatus::fallbacks())
        .chain(from_cars)
    {
        if status.status_id.is_none() && status.status_name.is_empty() {
            continue;
        }
        let key = status
            .status_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| status.status_name.clone());
        if !by_key.contains_key(&key) {
            order.push(key.clone());
        }
        by_key.insert(key, status);
    }
    order.into_iter().filter_map(|k| by_key.remove(&k)).collect()
}

/// Brand or model substring, or year substring. Case-insensitive.
pub fn filter_fleet<'a>(cars: &'a [Car], query: &str) -> Vec<&'a Car> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return cars.iter().collect();
    }
    cars.iter()
        .filter(|c| {
            c.brand_name.to_lowercase().contains(&term)
                || c.model.to_lowercase().contains(&term)
                || c.year.map(|y| y.to_string()).unwrap_or_default().contains(&term)
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct FleetRow<'a> {
    car_id: Option<i64>,
    brand: &'a str,
    model: &'a str,
    year: Option<i32>,
    daily_rate: f64,
    seats: Option<u32>,
    transmission: &'a str,
    fuel_type: &'a str,
    status: &'a str,
    image_url: &'a str,
}

impl<'a> From<&'a Car> for FleetRow<'a> {
    fn from(car: &'a Car) -> Self {
        Self {
            car_id: car.car_id,
            brand: &car.brand_name,
            model: &car.model,
            year: car.year,
            daily_rate: car.daily_rate,
            seats: car.seats,
            transmission: car.transmission.as_deref().unwrap_or_default(),
            fuel_type: car.fuel_type.as_deref().unwrap_or_default(),
            status: &car.status_name,
            image_url: &car.image_url,
        }
    }
}

const FLEET_HEADER: [&str; 10] = [
    "car_id",
    "brand",
    "model",
    "year",
    "daily_rate",
    "seats",
    "transmission",
    "fuel_type",
    "status",
    "image_url",
];

/// Writes one CSV row per car. The header is written even when no car matches.
pub fn write_fleet_csv<W: Write>(cars: &[&Car], out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(FLEET_HEADER)?;
    for car in cars {
        writer.serialize(FleetRow::from(*car))?;
    }
    writer.flush()?;
    Ok(())
}

pub struct AdminFleet {
    admin: AdminService,
    customer: CustomerService,
    pub cars: Vec<Car>,
    pub brands: Vec<Brand>,
    pub statuses: Vec<CarStatus>,
}

impl AdminFleet {
    pub fn new(admin: AdminService, customer: CustomerService) -> Self {
        Self {
            admin,
            customer,
            cars: Vec::new(),
            brands: Vec::new(),
            statuses: Vec::new(),
        }
    }

    pub async fn refresh_cars(&mut self) {
        self.cars = match self.admin.get_cars().await {
            Ok(body) => cars_from(&body),
            Err(e) => {
                tracing::error!("❌ Could not load fleet: {}", e);
                Vec::new()
            }
        };
    }

    pub async fn refresh_brands(&mut self) {
        self.brands = match self.customer.get_brands().await {
            Ok(body) => brands_from(&body),
            Err(e) => {
                tracing::warn!("⚠️ Could not load brands: {}", e);
                Vec::new()
            }
        };
        if self.brands.is_empty() {
            self.brands = unique_brands(&self.cars);
        }
    }

    pub fn car(&self, car_id: i64) -> Option<&Car> {
        self.cars.iter().find(|c| c.car_id == Some(car_id))
    }

    pub fn status_options(&self) -> Vec<CarStatus> {
        unique_statuses(&self.statuses, &self.cars)
    }

    /// Creates the car, or updates it when `car_id` is given, then reloads the fleet.
    pub async fn save_car(&mut self, car_id: Option<i64>, form: &CarForm) -> Result<Value> {
        let saved = match car_id {
            Some(id) => {
                let dto = to_car_update_dto(form)?;
                self.admin.update_car(id, &dto).await?
            }
            None => {
                let dto = to_car_create_dto(form)?;
                self.admin.create_car(&dto).await?
            }
        };
        tracing::info!("💾 Saved car {}", form.model_name.trim());
        self.refresh_cars().await;
        Ok(saved)
    }

    pub async fn delete_car(&mut self, car_id: i64) -> Result<()> {
        self.admin.delete_car(car_id).await?;
        tracing::info!("🗑️ Deleted car {}", car_id);
        self.refresh_cars().await;
        Ok(())
    }

    pub async fn set_car_status(&mut self, car_id: i64, status_id: i64) -> Result<()> {
        self.admin.set_car_status(car_id, status_id).await?;
        self.refresh_cars().await;
        Ok(())
    }

    pub async fn add_brand(&mut self, brand_name: &str) -> Result<Value> {
        if brand_name.trim().is_empty() {
            return Err(RoadReadyError::validation("Brand name is required."));
        }
        let created = self.admin.create_brand(brand_name).await?;
        self.refresh_brands().await;
        Ok(created)
    }

    pub fn filtered(&self, query: &str) -> Vec<&Car> {
        filter_fleet(&self.cars, query)
    }

    pub fn export_csv(&self, query: &str, path: &Path) -> Result<usize> {
        let cars = self.filtered(query);
        let file = std::fs::File::create(path)?;
        write_fleet_csv(&cars, file)?;
        tracing::info!("📄 Exported {} cars to {}", cars.len(), path.display());
        Ok(cars.len())
    }
}

#[async_trait]
impl Dashboard for AdminFleet {
    type Tab = FleetView;

    fn active_tab(&self) -> FleetView {
        FleetView
    }

    async fn load_tab(&mut self, _tab: FleetView) -> Result<()> {
        let statuses = self.admin.get_car_statuses().await;
        self.refresh_cars().await;
        self.refresh_brands().await;
        self.statuses = statuses.map(|b| statuses_from(&b)).unwrap_or_else(|e| {
            tracing::debug!("CarStatuses unavailable: {}", e);
            Vec::new()
        });
        Ok(())
    }
}
