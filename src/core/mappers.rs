//! Normalization of API bodies into view models.
//!
//! Each attribute is looked up under every spelling the backend has been seen to use;
//! the first present, non-null value wins. Keys containing a dot address nested
//! objects (`brand.brandId`).

use crate::domain::dto::CarDto;
use crate::domain::model::{
    Booking, Brand, Car, CarStatus, Issue, Location, Quote, WorkItem, WorkItemKind,
};
use crate::utils::error::{Result, RoadReadyError};
use crate::utils::validation::require_filled;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::collections::HashMap;

fn lookup<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = raw;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

/// First non-null value among `keys`.
pub fn coalesce<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| lookup(raw, k))
        .find(|v| !v.is_null())
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First non-null value among `keys` that reads as an integer.
pub fn coalesce_i64(raw: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter()
        .filter_map(|k| lookup(raw, k))
        .filter(|v| !v.is_null())
        .find_map(as_i64)
}

pub fn coalesce_f64(raw: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|k| lookup(raw, k))
        .filter(|v| !v.is_null())
        .find_map(as_f64)
}

/// First non-null value among `keys` that reads as text. Objects are skipped, so
/// `brand` only counts when the backend sends the brand as a plain name.
pub fn coalesce_str(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| lookup(raw, k))
        .filter(|v| !v.is_null())
        .find_map(as_text)
}

/// Like [`coalesce_str`] but also skips empty strings.
pub fn first_non_empty(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| lookup(raw, k))
        .filter_map(as_text)
        .find(|s| !s.is_empty())
}

/// Extracts the list from a body that is either an array or an object wrapping one.
pub fn as_list(body: &Value) -> &[Value] {
    match body {
        Value::Array(items) => items,
        Value::Object(_) => ["data", "items", "$values"]
            .iter()
            .find_map(|k| body.get(*k).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

pub fn normalize_car(raw: &Value) -> Car {
    Car {
        car_id: coalesce_i64(raw, &["carId", "id"]),
        brand_id: coalesce_i64(raw, &["brandId", "brand.brandId"]),
        brand_name: coalesce_str(raw, &["brandName", "brand.brandName", "brand"])
            .unwrap_or_default(),
        model: coalesce_str(raw, &["model", "modelName"]).unwrap_or_default(),
        daily_rate: coalesce_f64(raw, &["dailyRate", "DailyRate", "pricePerDay"]).unwrap_or(0.0),
        seats: coalesce_i64(raw, &["seats", "Seats"]).and_then(|s| u32::try_from(s).ok()),
        fuel_type: coalesce_str(raw, &["fuelType", "FuelType"]),
        transmission: coalesce_str(raw, &["transmission", "Transmission"]),
        year: coalesce_i64(raw, &["year", "Year"]).and_then(|y| i32::try_from(y).ok()),
        location_name: coalesce_str(raw, &["locationName", "location"])
            .unwrap_or_else(|| "Branch".to_string()),
        image_url: first_non_empty(raw, &["imageUrl", "imageURL", "image"]).unwrap_or_default(),
        status_id: coalesce_i64(raw, &["statusId", "status.statusId"]),
        status_name: coalesce_str(raw, &["statusName", "status.statusName", "status"])
            .unwrap_or_default(),
        avg_rating: coalesce_f64(raw, &["avgRating", "averageRating", "rating", "avg_rate"])
            .unwrap_or(0.0),
        reviews_count: coalesce_i64(
            raw,
            &["reviewsCount", "reviewCount", "reviews", "totalReviews"],
        )
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0),
        available: coalesce(raw, &["available", "isAvailable"]).and_then(Value::as_bool),
        description: coalesce_str(raw, &["description", "Description"]).unwrap_or_default(),
    }
}

pub fn normalize_location(raw: &Value) -> Location {
    Location {
        location_id: coalesce_i64(raw, &["locationId", "id"]),
        location_name: coalesce_str(raw, &["locationName", "name"])
            .unwrap_or_else(|| "Location".to_string()),
    }
}

pub fn normalize_booking(raw: &Value) -> Booking {
    Booking {
        booking_id: coalesce_i64(raw, &["bookingId", "id"]),
        pickup_date_time_utc: coalesce_str(raw, &["pickupDateTimeUtc", "startDate", "fromUtc"]),
        dropoff_date_time_utc: coalesce_str(raw, &["dropoffDateTimeUtc", "endDate", "toUtc"]),
        total_amount: coalesce_f64(raw, &["totalAmount", "amount"]).unwrap_or(0.0),
        pickup_location_name: coalesce_str(raw, &["pickupLocationName", "pickupLocation"])
            .unwrap_or_else(|| "—".to_string()),
        dropoff_location_name: coalesce_str(raw, &["dropoffLocationName", "dropoffLocation"])
            .unwrap_or_else(|| "—".to_string()),
        status_name: coalesce_str(raw, &["statusName", "status"])
            .unwrap_or_else(|| "Pending".to_string()),
        car_name: coalesce_str(raw, &["carName", "car.model"]).unwrap_or_else(|| "Car".to_string()),
        has_review: coalesce(raw, &["hasReview"])
            .and_then(Value::as_bool)
            .unwrap_or(false)
            || coalesce(raw, &["reviewId"]).is_some(),
    }
}

pub fn normalize_issue(raw: &Value) -> Issue {
    Issue {
        issue_id: coalesce_i64(raw, &["issueId", "bookingIssueId", "id"]),
        booking_id: coalesce_i64(raw, &["bookingId"]),
        issue_type: coalesce_str(raw, &["issueType", "type"]).unwrap_or_else(|| "Other".to_string()),
        description: coalesce_str(raw, &["description"]).unwrap_or_default(),
        status: coalesce_str(raw, &["status", "statusName"]).unwrap_or_else(|| "Open".to_string()),
        user_id: coalesce_str(raw, &["userId"]),
        created_at: coalesce_str(raw, &["createdAt"]),
    }
}

pub fn normalize_brand(raw: &Value) -> Brand {
    Brand {
        brand_id: coalesce_i64(raw, &["brandId", "id"]),
        brand_name: coalesce_str(raw, &["brandName", "name"]).unwrap_or_default(),
    }
}

pub fn normalize_status(raw: &Value) -> CarStatus {
    CarStatus {
        status_id: coalesce_i64(raw, &["statusId", "id"]),
        status_name: coalesce_str(raw, &["statusName", "name"]).unwrap_or_default(),
    }
}

pub fn normalize_quote(raw: &Value) -> Quote {
    let num = |keys: &[&str]| coalesce_f64(raw, keys).unwrap_or(0.0);
    Quote {
        days: num(&["days", "Days"]),
        daily_rate: num(&["dailyRate", "DailyRate"]),
        subtotal: num(&["subtotal", "subTotal", "Subtotal"]),
        taxes: num(&["taxes", "tax", "Taxes"]),
        total: num(&["total", "totalAmount", "Total"]),
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn work_item_from_issue(raw: &Value) -> WorkItem {
    WorkItem {
        id: coalesce_i64(raw, &["issueId", "bookingIssueId", "id"]),
        kind: WorkItemKind::Booking,
        car_id: coalesce_i64(raw, &["carId"]),
        booking_id: coalesce_i64(raw, &["bookingId"]),
        description: coalesce_str(raw, &["description"]).unwrap_or_default(),
        status: coalesce_str(raw, &["status"]).unwrap_or_else(|| "Open".to_string()),
        priority: coalesce_str(raw, &["priority"]).unwrap_or_else(|| "Medium".to_string()),
        assigned_to: coalesce_str(raw, &["assignedTo"]),
        created_at: coalesce_str(raw, &["createdAt"]).unwrap_or_else(now_iso),
    }
}

pub fn work_item_from_maintenance(raw: &Value) -> WorkItem {
    let resolved = coalesce(raw, &["isResolved"])
        .and_then(Value::as_bool)
        .unwrap_or(false);
    WorkItem {
        id: coalesce_i64(raw, &["requestId", "maintenanceRequestId", "id"]),
        kind: WorkItemKind::Maintenance,
        car_id: coalesce_i64(raw, &["carId"]),
        booking_id: coalesce_i64(raw, &["bookingId"]),
        description: coalesce_str(raw, &["issueDescription", "description"])
            .unwrap_or_else(|| "Maintenance request".to_string()),
        status: if resolved {
            "Resolved".to_string()
        } else {
            coalesce_str(raw, &["status"]).unwrap_or_else(|| "Open".to_string())
        },
        priority: coalesce_str(raw, &["priority"]).unwrap_or_else(|| "Medium".to_string()),
        assigned_to: coalesce_str(raw, &["assignedTo"]),
        created_at: coalesce_str(raw, &["reportedDate", "createdAt"]).unwrap_or_else(now_iso),
    }
}

pub fn cars_from(body: &Value) -> Vec<Car> {
    as_list(body).iter().map(normalize_car).collect()
}

pub fn bookings_from(body: &Value) -> Vec<Booking> {
    as_list(body).iter().map(normalize_booking).collect()
}

pub fn locations_from(body: &Value) -> Vec<Location> {
    as_list(body).iter().map(normalize_location).collect()
}

pub fn issues_from(body: &Value) -> Vec<Issue> {
    as_list(body).iter().map(normalize_issue).collect()
}

pub fn brands_from(body: &Value) -> Vec<Brand> {
    as_list(body).iter().map(normalize_brand).collect()
}

pub fn statuses_from(body: &Value) -> Vec<CarStatus> {
    as_list(body).iter().map(normalize_status).collect()
}

/// Brands seen on the given cars, one per brand id (or name when the id is missing).
pub fn unique_brands(cars: &[Car]) -> Vec<Brand> {
    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, Brand> = HashMap::new();
    for car in cars {
        if car.brand_id.is_none() && car.brand_name.is_empty() {
            continue;
        }
        let key = car
            .brand_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| car.brand_name.clone());
        if !by_key.contains_key(&key) {
            order.push(key.clone());
        }
        by_key.insert(
            key,
            Brand {
                brand_id: car.brand_id,
                brand_name: car.brand_name.clone(),
            },
        );
    }
    order
        .into_iter()
        .filter_map(|k| by_key.remove(&k))
        .collect()
}

/// Free-text car form as typed by an admin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarForm {
    pub brand_id: String,
    pub model_name: String,
    pub year: String,
    pub daily_rate: String,
    pub seats: String,
    pub transmission: String,
    pub fuel_type: String,
    pub status_id: String,
    pub image_url: String,
}

impl CarForm {
    /// Pre-fills the form from an existing car for editing.
    pub fn from_car(car: &Car) -> Self {
        Self {
            brand_id: car.brand_id.map(|v| v.to_string()).unwrap_or_default(),
            model_name: car.model.clone(),
            year: car.year.map(|v| v.to_string()).unwrap_or_default(),
            daily_rate: car.daily_rate.to_string(),
            seats: car.seats.map(|v| v.to_string()).unwrap_or_default(),
            transmission: car
                .transmission
                .clone()
                .unwrap_or_else(|| "Automatic".to_string()),
            fuel_type: car.fuel_type.clone().unwrap_or_else(|| "Petrol".to_string()),
            status_id: car.status_id.map(|v| v.to_string()).unwrap_or_default(),
            image_url: car.image_url.clone(),
        }
    }
}

fn parse_field<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| RoadReadyError::validation(format!("{} must be a number", name)))
}

fn shape_car_dto(form: &CarForm) -> Result<CarDto> {
    require_filled(
        &[
            &form.brand_id,
            &form.model_name,
            &form.year,
            &form.daily_rate,
            &form.status_id,
        ],
        "Please fill brand, model, year, daily rate and status.",
    )?;

    let seats = if form.seats.trim().is_empty() {
        5
    } else {
        parse_field("seats", &form.seats)?
    };
    let image_url = form.image_url.trim();

    Ok(CarDto {
        brand_id: parse_field("brandId", &form.brand_id)?,
        model_name: form.model_name.trim().to_string(),
        year: parse_field("year", &form.year)?,
        daily_rate: parse_field("dailyRate", &form.daily_rate)?,
        seats,
        transmission: form.transmission.trim().to_string(),
        fuel_type: form.fuel_type.trim().to_string(),
        status_id: parse_field("statusId", &form.status_id)?,
        image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
    })
}

pub fn to_car_create_dto(form: &CarForm) -> Result<CarDto> {
    shape_car_dto(form)
}

pub fn to_car_update_dto(form: &CarForm) -> Result<CarDto> {
    shape_car_dto(form)
}
