/// Cart, equipment, availability and credit top-up types
use crate::models::service::Service;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The per-user cart with computed totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: i64,
    pub items: Vec<CartItem>,
    pub total_amount: Decimal,
    pub items_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A cart line: one service, quantity, and equipment choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub service: Service,
    pub quantity: u32,
    pub use_new_equipment: bool,
    pub equipment_surcharge: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /cart/add/`
///
/// Adding a (service, equipment choice) line that already exists increments
/// its quantity instead of creating a second line.
#[derive(Debug, Clone, Serialize)]
pub struct AddToCartRequest {
    pub service_id: i64,
    pub quantity: u32,
    pub use_new_equipment: bool,
    pub equipment_surcharge: Decimal,
}

impl AddToCartRequest {
    pub fn new(service_id: i64) -> Self {
        Self {
            service_id,
            quantity: 1,
            use_new_equipment: false,
            equipment_surcharge: Decimal::ZERO,
        }
    }
}

/// Credit top-up status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopUpStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

/// A credit top-up record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditTopUp {
    pub id: i64,
    pub amount: Decimal,
    pub status: TopUpStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An open scheduling window for a service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAvailability {
    pub id: i64,
    pub service: Service,
    pub date: NaiveDate,
    #[serde(with = "super::timefmt")]
    pub start_time: NaiveTime,
    #[serde(with = "super::timefmt")]
    pub end_time: NaiveTime,
    pub capacity: u32,
    pub booked_count: u32,
    pub is_home_service: bool,
    pub is_available: bool,
    pub remaining_slots: u32,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /service-availability/create/` (staff scheduling)
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityRequest {
    pub service_id: i64,
    pub date: NaiveDate,
    #[serde(with = "super::timefmt")]
    pub start_time: NaiveTime,
    #[serde(with = "super::timefmt")]
    pub end_time: NaiveTime,
    pub capacity: u32,
    pub is_home_service: bool,
}

/// Filters for `GET /service-availability/`
#[derive(Debug, Clone, Default)]
pub struct AvailabilityQuery {
    pub service_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub is_home_service: Option<bool>,
}

impl AvailabilityQuery {
    /// Render as a query string, empty when no filter is set
    pub fn to_query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(service_id) = self.service_id {
            params.push(format!("service_id={}", service_id));
        }
        if let Some(date) = self.date {
            params.push(format!(
                "date={}",
                urlencoding::encode(&date.format("%Y-%m-%d").to_string())
            ));
        }
        if let Some(home) = self.is_home_service {
            params.push(format!("is_home_service={}", home));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// New-equipment catalog entry with its surcharge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub surcharge: Decimal,
    pub is_new: bool,
    #[serde(default)]
    pub services: Vec<Service>,
    pub created_at: DateTime<Utc>,
}
