use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    RentalAgent,
    Customer,
    Other(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Admin" => Role::Admin,
            "RentalAgent" => Role::RentalAgent,
            "Customer" => Role::Customer,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "Admin",
            Role::RentalAgent => "RentalAgent",
            Role::Customer => "Customer",
            Role::Other(s) => s,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A car as shown in listings and dashboards, after normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Car {
    pub car_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub brand_name: String,
    #[serde(rename = "modelName")]
    pub model: String,
    pub daily_rate: f64,
    pub seats: Option<u32>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub year: Option<i32>,
    pub location_name: String,
    pub image_url: String,
    pub status_id: Option<i64>,
    pub status_name: String,
    #[serde(skip_serializing)]
    pub avg_rating: f64,
    #[serde(skip_serializing)]
    pub reviews_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    pub description: String,
}

impl Car {
    pub fn is_unavailable(&self) -> bool {
        self.available == Some(false) || self.status_name.eq_ignore_ascii_case("rented")
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.brand_name, self.model).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub location_id: Option<i64>,
    pub location_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub brand_id: Option<i64>,
    pub brand_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarStatus {
    pub status_id: Option<i64>,
    pub status_name: String,
}

impl CarStatus {
    pub fn new(status_id: i64, status_name: &str) -> Self {
        Self {
            status_id: Some(status_id),
            status_name: status_name.to_string(),
        }
    }

    /// Used when the backend has no CarStatuses endpoint or returns nothing.
    pub fn fallbacks() -> Vec<CarStatus> {
        vec![
            CarStatus::new(1, "Available"),
            CarStatus::new(2, "Rented"),
            CarStatus::new(3, "Maintenance"),
            CarStatus::new(4, "Unavailable"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: Option<i64>,
    pub pickup_date_time_utc: Option<String>,
    pub dropoff_date_time_utc: Option<String>,
    pub total_amount: f64,
    pub pickup_location_name: String,
    pub dropoff_location_name: String,
    pub status_name: String,
    pub car_name: String,
    pub has_review: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub issue_id: Option<i64>,
    pub booking_id: Option<i64>,
    pub issue_type: String,
    pub description: String,
    pub status: String,
    pub user_id: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkItemKind {
    Booking,
    Maintenance,
}

/// Booking issues and maintenance requests merged into one queue for agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: Option<i64>,
    pub kind: WorkItemKind,
    pub car_id: Option<i64>,
    pub booking_id: Option<i64>,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub assigned_to: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub days: f64,
    pub daily_rate: f64,
    pub subtotal: f64,
    pub taxes: f64,
    pub total: f64,
}

/// The `Users/me` body. Kept raw because field spellings vary between deployments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile {
    pub raw: serde_json::Value,
}

impl UserProfile {
    pub fn new(raw: serde_json::Value) -> Self {
        Self { raw }
    }

    fn text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| match self.raw.get(*k) {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn role(&self) -> Option<Role> {
        self.text(&["roleName", "role", "RoleName"])
            .map(|r| Role::parse(&r))
    }

    pub fn user_id(&self) -> Option<String> {
        self.text(&["userId", "id", "Id", "UserId", "userID"])
    }

    pub fn first_name(&self) -> Option<String> {
        self.text(&["firstName"])
    }

    pub fn last_name(&self) -> Option<String> {
        self.text(&["lastName"])
    }

    pub fn email(&self) -> Option<String> {
        self.text(&["email"])
    }

    pub fn display_name(&self) -> Option<String> {
        match self.first_name() {
            Some(first) => Some(
                format!("{} {}", first, self.last_name().unwrap_or_default())
                    .trim()
                    .to_string(),
            ),
            None => self.email(),
        }
    }
}
