use crate::app::booking::{day_to_iso_z, BookingFlow, DEFAULT_HOUR};
use crate::core::mappers::{
    bookings_from, brands_from, cars_from, issues_from, normalize_booking, normalize_issue,
    unique_brands,
};
use crate::core::services::CustomerService;
use crate::domain::dto::{CarSearch, IssueRequest, ReviewRequest};
use crate::domain::model::{Booking, Brand, Car, Issue};
use crate::domain::ports::Dashboard;
use crate::utils::error::{Result, RoadReadyError};
use crate::utils::format::parse_instant;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerTab {
    #[default]
    Browse,
    Bookings,
    Issues,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueType {
    #[default]
    Vehicle,
    Pickup,
    Dropoff,
    Payment,
    Other,
}

impl IssueType {
    pub const ALL: [IssueType; 5] = [
        IssueType::Vehicle,
        IssueType::Pickup,
        IssueType::Dropoff,
        IssueType::Payment,
        IssueType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Vehicle => "Vehicle",
            IssueType::Pickup => "Pickup",
            IssueType::Dropoff => "Dropoff",
            IssueType::Payment => "Payment",
            IssueType::Other => "Other",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = RoadReadyError;

    fn from_str(s: &str) -> Result<Self> {
        IssueType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                RoadReadyError::validation(format!(
                    "Unknown issue type '{}'. Use Vehicle, Pickup, Dropoff, Payment or Other.",
                    s
                ))
            })
    }
}

/// Availability search filters as typed. Dates are `yyyy-MM-dd` or `dd-MM-yyyy`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub from: String,
    pub to: String,
    pub brand_id: Option<i64>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub min_seats: Option<u32>,
    pub max_daily_rate: Option<f64>,
}

impl SearchFilters {
    pub fn to_search(&self) -> Result<CarSearch> {
        let missing = || {
            RoadReadyError::validation("Select pickup/return dates to search availability.")
        };
        if self.from.trim().is_empty() || self.to.trim().is_empty() {
            return Err(missing());
        }
        let from_utc = day_to_iso_z(&self.from, DEFAULT_HOUR, 0).ok_or_else(missing)?;
        let to_utc = day_to_iso_z(&self.to, DEFAULT_HOUR, 0).ok_or_else(missing)?;
        let text = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();

        Ok(CarSearch {
            from_utc,
            to_utc,
            brand_id: self.brand_id,
            fuel_type: text(&self.fuel_type),
            transmission: text(&self.transmission),
            min_seats: self.min_seats,
            max_daily_rate: self.max_daily_rate,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewOutcome {
    Submitted(Value),
    /// The server has no Reviews endpoint.
    Disabled,
}

/// `pending` is always cancellable; `confirmed` only until pickup.
pub fn can_cancel(booking: &Booking, now: DateTime<Utc>) -> bool {
    match booking.status_name.trim().to_lowercase().as_str() {
        "pending" => true,
        "confirmed" => booking
            .pickup_date_time_utc
            .as_deref()
            .and_then(parse_instant)
            .map_or(true, |pickup| pickup >= now),
        _ => false,
    }
}

pub fn can_review(booking: &Booking, now: DateTime<Utc>) -> bool {
    let past_dropoff = booking
        .dropoff_date_time_utc
        .as_deref()
        .and_then(parse_instant)
        .is_some_and(|dropoff| dropoff < now);
    past_dropoff && !booking.has_review
}

/// Client-side filter for the public cars page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarFilter {
    pub query: String,
    pub fuel: Option<String>,
    pub seats: Option<u32>,
}

impl CarFilter {
    pub fn matches(&self, car: &Car) -> bool {
        let q = self.query.trim().to_lowercase();
        if !q.is_empty() {
            let hit = [
                car.brand_name.as_str(),
                car.model.as_str(),
                car.transmission.as_deref().unwrap_or_default(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&q));
            if !hit {
                return false;
            }
        }
        if let Some(fuel) = &self.fuel {
            let car_fuel = car.fuel_type.as_deref().unwrap_or_default();
            if !car_fuel.eq_ignore_ascii_case(fuel) {
                return false;
            }
        }
        if let Some(seats) = self.seats {
            if car.seats != Some(seats) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, cars: &'a [Car]) -> Vec<&'a Car> {
        cars.iter().filter(|c| self.matches(c)).collect()
    }
}

/// State behind the customer area: the car list, bookings and issues.
pub struct CustomerDashboard {
    service: CustomerService,
    user_id: Option<String>,
    active: CustomerTab,
    pub cars: Vec<Car>,
    pub brands: Vec<Brand>,
    pub bookings: Vec<Booking>,
    pub issues: Vec<Issue>,
}

impl CustomerDashboard {
    pub fn new(service: CustomerService, user_id: Option<String>) -> Self {
        Self {
            service,
            user_id,
            active: CustomerTab::default(),
            cars: Vec::new(),
            brands: Vec::new(),
            bookings: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn service(&self) -> &CustomerService {
        &self.service
    }

    pub fn set_active(&mut self, tab: CustomerTab) {
        self.active = tab;
    }

    async fn load_browse(&mut self) {
        let (brands, cars) = tokio::join!(self.service.get_brands(), self.service.get_cars());

        match brands {
            Ok(body) => self.brands = brands_from(&body),
            Err(e) => tracing::warn!("⚠️ Could not load brands: {}", e),
        }
        match cars {
            Ok(body) => {
                self.cars = cars_from(&body);
                if self.brands.is_empty() {
                    self.brands = unique_brands(&self.cars);
                }
            }
            Err(e) => tracing::error!("❌ Could not load cars: {}", e),
        }
        tracing::debug!("Loaded {} cars, {} brands", self.cars.len(), self.brands.len());
    }

    async fn load_bookings(&mut self) {
        self.bookings = match self.service.get_my_bookings().await {
            Ok(body) => {
                let mut list = bookings_from(&body);
                list.sort_by(|a, b| b.booking_id.unwrap_or(0).cmp(&a.booking_id.unwrap_or(0)));
                list
            }
            Err(e) => {
                tracing::error!("❌ Could not load bookings: {}", e);
                Vec::new()
            }
        };
    }

    async fn load_issues(&mut self) {
        self.issues = match self.service.get_my_issues().await {
            Ok(body) => issues_from(&body),
            Err(e) if e.is_not_found() => self.my_issues_from_all().await,
            Err(e) => {
                tracing::error!("❌ Could not load issues: {}", e);
                Vec::new()
            }
        };
    }

    /// Older servers have no per-user route; filter the full list instead.
    async fn my_issues_from_all(&self) -> Vec<Issue> {
        match self.service.get_all_issues().await {
            Ok(body) => issues_from(&body)
                .into_iter()
                .filter(|i| i.user_id.is_some() && i.user_id == self.user_id)
                .collect(),
            Err(e) => {
                tracing::error!("❌ Could not load issues: {}", e);
                Vec::new()
            }
        }
    }

    /// Replaces the car list with cars free for the chosen dates.
    pub async fn search(&mut self, filters: &SearchFilters) -> Result<&[Car]> {
        let body = filters.to_search()?;
        let found = self.service.search_cars(&body).await?;
        self.cars = cars_from(&found);
        tracing::info!("🔎 {} cars available", self.cars.len());
        Ok(&self.cars)
    }

    pub fn start_booking(&self, car: &Car) -> BookingFlow {
        BookingFlow::new(self.service.clone(), car.clone())
    }

    /// Adds a booking the server just created and shows the bookings tab.
    pub fn on_booked(&mut self, created: &Value) {
        self.bookings.insert(0, normalize_booking(created));
        self.active = CustomerTab::Bookings;
    }

    pub async fn cancel_booking(&mut self, booking_id: i64) -> Result<()> {
        self.service.cancel_booking(booking_id).await?;
        for booking in self
            .bookings
            .iter_mut()
            .filter(|b| b.booking_id == Some(booking_id))
        {
            booking.status_name = "Cancelled".to_string();
        }
        tracing::info!("🚫 Booking {} cancelled", booking_id);
        Ok(())
    }

    pub async fn report_issue(
        &mut self,
        booking_id: i64,
        issue_type: IssueType,
        description: &str,
    ) -> Result<&Issue> {
        if description.trim().is_empty() {
            return Err(RoadReadyError::validation("Please describe the issue."));
        }
        let payload = IssueRequest {
            booking_id,
            issue_type: issue_type.to_string(),
            description: description.to_string(),
        };
        let created = self.service.create_issue(&payload).await?;
        let mut issue = normalize_issue(&created);
        if issue.booking_id.is_none() {
            issue.booking_id = Some(booking_id);
        }
        self.issues.insert(0, issue);
        Ok(&self.issues[0])
    }

    pub async fn review(
        &mut self,
        booking_id: i64,
        rating: u8,
        comment: &str,
    ) -> Result<ReviewOutcome> {
        if !(1..=5).contains(&rating) {
            return Err(RoadReadyError::validation("Rating must be between 1 and 5."));
        }
        let payload = ReviewRequest {
            booking_id,
            rating,
            comment: comment.to_string(),
        };
        match self.service.create_review(&payload).await {
            Ok(created) => {
                for booking in self
                    .bookings
                    .iter_mut()
                    .filter(|b| b.booking_id == Some(booking_id))
                {
                    booking.has_review = true;
                }
                Ok(ReviewOutcome::Submitted(created))
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("⚠️ Reviews are not enabled on this server.");
                Ok(ReviewOutcome::Disabled)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Dashboard for CustomerDashboard {
    type Tab = CustomerTab;

    fn active_tab(&self) -> CustomerTab {
        self.active
    }

    async fn load_tab(&mut self, tab: CustomerTab) -> Result<()> {
        self.active = tab;
        match tab {
            CustomerTab::Browse => self.load_browse().await,
            CustomerTab::Bookings => self.load_bookings().await,
            CustomerTab::Issues => self.load_issues().await,
            CustomerTab::Profile => {}
        }
        Ok(())
    }
}
