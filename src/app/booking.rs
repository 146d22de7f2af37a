use crate::core::mappers::{locations_from, normalize_quote};
use crate::core::services::CustomerService;
use crate::domain::dto::BookingRequest;
use crate::domain::model::{Car, Location, Quote};
use crate::utils::error::{Result, RoadReadyError};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Bookings start and end at this hour (UTC) on the chosen days.
pub const DEFAULT_HOUR: u32 = 10;

fn day_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2})-(\d{2})-(\d{4})$").expect("static regex"))
}

fn year_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("static regex"))
}

/// `yyyy-MM-dd` or `dd-MM-yyyy` at `hour:minute` UTC.
pub fn day_at(day: &str, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    let day = day.trim();
    let (y, m, d) = if let Some(c) = year_first().captures(day) {
        (c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?)
    } else if let Some(c) = day_first().captures(day) {
        (c[3].parse().ok()?, c[2].parse().ok()?, c[1].parse().ok()?)
    } else {
        return None;
    };
    let naive = NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(hour, minute, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

/// ISO-8601 with milliseconds and `Z`, e.g. `2025-03-01T10:00:00.000Z`.
pub fn day_to_iso_z(day: &str, hour: u32, minute: u32) -> Option<String> {
    day_at(day, hour, minute).map(|t| t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}

/// Validated pickup/drop-off instants for a pair of days.
pub fn rental_window(pickup: &str, dropoff: &str) -> Result<(String, String)> {
    let from = day_at(pickup, DEFAULT_HOUR, 0);
    let to = day_at(dropoff, DEFAULT_HOUR, 0);
    match (from, to) {
        (Some(from), Some(to)) if to > from => Ok((
            from.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            to.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        )),
        _ => Err(RoadReadyError::validation("Dropoff must be after pickup")),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub pickup: String,
    pub dropoff: String,
    pub pickup_location_id: Option<i64>,
    pub dropoff_location_id: Option<i64>,
}

impl BookingForm {
    pub fn is_complete(&self) -> bool {
        !self.pickup.trim().is_empty()
            && !self.dropoff.trim().is_empty()
            && self.pickup_location_id.is_some()
            && self.dropoff_location_id.is_some()
    }
}

/// One car being booked: the form, its pickup locations and the cached quote.
pub struct BookingFlow {
    service: CustomerService,
    car: Car,
    form: BookingForm,
    locations: Vec<Location>,
    quote: Option<Quote>,
}

impl BookingFlow {
    pub fn new(service: CustomerService, car: Car) -> Self {
        Self {
            service,
            car,
            form: BookingForm::default(),
            locations: Vec::new(),
            quote: None,
        }
    }

    /// Pre-fills the dates, as when opened from a date-filtered search.
    pub fn with_dates(mut self, pickup: &str, dropoff: &str) -> Self {
        self.form.pickup = pickup.to_string();
        self.form.dropoff = dropoff.to_string();
        self
    }

    pub fn car(&self) -> &Car {
        &self.car
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub async fn load_locations(&mut self) -> &[Location] {
        self.locations = match self.service.get_locations().await {
            Ok(body) => locations_from(&body),
            Err(e) => {
                tracing::warn!("⚠️ Could not load locations: {}", e);
                Vec::new()
            }
        };
        &self.locations
    }

    pub fn set_pickup(&mut self, day: &str) {
        self.form.pickup = day.to_string();
        self.quote = None;
    }

    pub fn set_dropoff(&mut self, day: &str) {
        self.form.dropoff = day.to_string();
        self.quote = None;
    }

    pub fn set_locations(&mut self, pickup_id: i64, dropoff_id: i64) {
        self.form.pickup_location_id = Some(pickup_id);
        self.form.dropoff_location_id = Some(dropoff_id);
    }

    fn car_id(&self) -> Result<i64> {
        self.car
            .car_id
            .ok_or_else(|| RoadReadyError::validation("This car has no id and cannot be booked."))
    }

    pub async fn fetch_quote(&mut self) -> Result<Quote> {
        let (from, to) = rental_window(&self.form.pickup, &self.form.dropoff)?;
        let car_id = self.car_id()?;
        tracing::debug!("Quoting car {} from {} to {}", car_id, from, to);

        let body = self.service.get_quote(car_id, &from, &to).await?;
        let quote = normalize_quote(&body);
        self.quote = Some(quote.clone());
        Ok(quote)
    }

    /// Posts the booking and returns the created record as the server sent it.
    ///
    /// A missing quote is fetched first; a failed quote does not block the booking.
    pub async fn submit(&mut self) -> Result<Value> {
        if !self.form.is_complete() {
            return Err(RoadReadyError::validation(
                "Select pickup and return dates and both locations.",
            ));
        }
        let car_id = self.car_id()?;
        let (pickup, dropoff) = rental_window(&self.form.pickup, &self.form.dropoff)?;

        let payload = BookingRequest {
            car_id,
            pickup_date_time_utc: pickup,
            dropoff_date_time_utc: dropoff,
            pickup_location_id: self.form.pickup_location_id.unwrap_or_default(),
            dropoff_location_id: self.form.dropoff_location_id.unwrap_or_default(),
        };

        if self.quote.is_none() {
            if let Err(e) = self.fetch_quote().await {
                tracing::warn!("⚠️ Could not fetch quote: {}", e);
            }
        }

        let created = self.service.create_booking(&payload).await?;
        tracing::info!("✅ Booked car {}", car_id);
        Ok(created)
    }
}
