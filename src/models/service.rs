/// Service catalog types (read-mostly, externally owned)
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bookable service from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub duration_minutes: u32,
    #[serde(default)]
    pub duration_display: Option<String>,
    pub is_active: bool,
}

impl Service {
    /// Human-readable duration, computed locally when the server did not
    /// send one (the hosted backend has no such column)
    pub fn duration_label(&self) -> String {
        if let Some(ref label) = self.duration_display {
            return label.clone();
        }
        let hours = self.duration_minutes / 60;
        let minutes = self.duration_minutes % 60;
        if hours > 0 {
            if minutes > 0 {
                format!("{}h {}min", hours, minutes)
            } else {
                format!("{}h", hours)
            }
        } else {
            format!("{}min", minutes)
        }
    }
}
