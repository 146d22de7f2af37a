use crate::core::api::with_fallback;
use crate::core::mappers::{
    as_list, brands_from, cars_from, statuses_from, unique_brands, work_item_from_issue,
    work_item_from_maintenance,
};
use crate::core::services::{AdminService, CustomerService};
use crate::domain::dto::{CarStatusPatch, MaintenanceRequestPayload};
use crate::domain::model::{Brand, Car, CarStatus, WorkItem, WorkItemKind};
use crate::domain::ports::Dashboard;
use crate::utils::error::{Result, RoadReadyError};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentTab {
    #[default]
    Cars,
    Issues,
}

/// Status id for `name`: loaded statuses first, then the built-in table, then 1.
pub fn status_id_by_name(statuses: &[CarStatus], name: &str) -> i64 {
    let hit = |list: &[CarStatus]| {
        list.iter()
            .find(|s| s.status_name.eq_ignore_ascii_case(name))
            .and_then(|s| s.status_id)
    };
    hit(statuses)
        .or_else(|| hit(&CarStatus::fallbacks()))
        .unwrap_or(1)
}

pub fn status_name_by_id(statuses: &[CarStatus], status_id: i64) -> String {
    let hit = |list: &[CarStatus]| {
        list.iter()
            .find(|s| s.status_id == Some(status_id))
            .map(|s| s.status_name.clone())
            .filter(|n| !n.is_empty())
    };
    hit(statuses)
        .or_else(|| hit(&CarStatus::fallbacks()))
        .unwrap_or_else(|| "Available".to_string())
}

fn reads_available(status_name: &str) -> bool {
    let name = status_name.to_lowercase();
    name.contains("avail") && !name.contains("unavail")
}

/// Available cars flip to Unavailable; everything else flips to Available.
pub fn next_toggle_status_id(statuses: &[CarStatus], car: &Car) -> i64 {
    if reads_available(&car.status_name) {
        status_id_by_name(statuses, "Unavailable")
    } else {
        status_id_by_name(statuses, "Available")
    }
}

pub struct AgentDashboard {
    customer: CustomerService,
    admin: AdminService,
    active: AgentTab,
    pub cars: Vec<Car>,
    pub brands: Vec<Brand>,
    pub statuses: Vec<CarStatus>,
    pub work_items: Vec<WorkItem>,
}

impl AgentDashboard {
    pub fn new(customer: CustomerService, admin: AdminService) -> Self {
        Self {
            customer,
            admin,
            active: AgentTab::default(),
            cars: Vec::new(),
            brands: Vec::new(),
            statuses: Vec::new(),
            work_items: Vec::new(),
        }
    }

    async fn load_cars_tab(&mut self) -> Result<()> {
        let (cars, brands, statuses) = tokio::join!(
            self.admin.get_cars(),
            self.customer.get_brands(),
            self.admin.get_car_statuses()
        );

        self.brands = brands.map(|b| brands_from(&b)).unwrap_or_else(|e| {
            tracing::warn!("⚠️ Could not load brands: {}", e);
            Vec::new()
        });
        self.statuses = match statuses {
            Ok(body) if !as_list(&body).is_empty() => statuses_from(&body),
            Ok(_) => CarStatus::fallbacks(),
            Err(e) => {
                tracing::debug!("CarStatuses unavailable, using built-in table: {}", e);
                CarStatus::fallbacks()
            }
        };
        self.cars = cars_from(&cars?);
        if self.brands.is_empty() {
            self.brands = unique_brands(&self.cars);
        }
        Ok(())
    }

    /// Booking issues and open maintenance, each tolerated on its own.
    async fn load_issues_tab(&mut self) {
        let (issues, maintenance) = tokio::join!(
            self.customer.get_all_issues(),
            self.customer.get_open_maintenance()
        );

        let mut items = Vec::new();
        match issues {
            Ok(body) => items.extend(as_list(&body).iter().map(work_item_from_issue)),
            Err(e) => tracing::warn!("⚠️ Could not load booking issues: {}", e),
        }
        match maintenance {
            Ok(body) => items.extend(as_list(&body).iter().map(work_item_from_maintenance)),
            Err(e) => tracing::warn!("⚠️ Could not load maintenance requests: {}", e),
        }
        self.work_items = items;
    }

    /// Flips a car between Available and Unavailable. Returns the new status name.
    pub async fn toggle_availability(&mut self, car_id: i64) -> Result<String> {
        let car = self
            .cars
            .iter()
            .find(|c| c.car_id == Some(car_id))
            .cloned()
            .ok_or_else(|| RoadReadyError::validation(format!("Car {} is not loaded.", car_id)))?;
        let desired = next_toggle_status_id(&self.statuses, &car);

        let path = format!("Cars/{}/status", car_id);
        let full = Car {
            status_id: Some(desired),
            seats: car.seats.or(Some(5)),
            transmission: car.transmission.clone().or_else(|| Some("Automatic".to_string())),
            fuel_type: car.fuel_type.clone().or_else(|| Some("Petrol".to_string())),
            ..car
        };
        let api = self.admin.api();
        with_fallback(
            api.patch(&path, &CarStatusPatch { status_id: desired }),
            api.put(&format!("Cars/{}", car_id), &full),
        )
        .await?;

        let name = status_name_by_id(&self.statuses, desired);
        for c in self.cars.iter_mut().filter(|c| c.car_id == Some(car_id)) {
            c.status_id = Some(desired);
            c.status_name = name.clone();
        }
        tracing::info!("🔁 Car {} is now {}", car_id, name);
        Ok(name)
    }

    pub async fn create_maintenance(
        &mut self,
        car_id: Option<i64>,
        description: &str,
    ) -> Result<Value> {
        let car_id = match car_id {
            Some(id) if !description.trim().is_empty() => id,
            _ => {
                return Err(RoadReadyError::validation(
                    "Please select a car and describe the issue.",
                ))
            }
        };
        let payload = MaintenanceRequestPayload {
            car_id,
            issue_description: description.trim().to_string(),
        };
        let created = self.customer.create_maintenance_request(&payload).await?;
        self.load_tab(AgentTab::Issues).await?;
        Ok(created)
    }

    pub async fn resolve_maintenance(&mut self, request_id: i64) -> Result<()> {
        self.customer.resolve_maintenance(request_id).await?;
        for item in self
            .work_items
            .iter_mut()
            .filter(|i| i.kind == WorkItemKind::Maintenance && i.id == Some(request_id))
        {
            item.status = "Resolved".to_string();
        }
        Ok(())
    }
}

#[async_trait]
impl Dashboard for AgentDashboard {
    type Tab = AgentTab;

    fn active_tab(&self) -> AgentTab {
        self.active
    }

    async fn load_tab(&mut self, tab: AgentTab) -> Result<()> {
        self.active = tab;
        match tab {
            AgentTab::Cars => self.load_cars_tab().await,
            AgentTab::Issues => {
                self.load_issues_tab().await;
                Ok(())
            }
        }
    }
}
