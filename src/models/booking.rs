/// Booking types and the appointment status lifecycle
use crate::error::{ClientError, ClientResult};
use crate::models::user::{Role, UserSummary};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Appointment status lifecycle
///
/// ```text
/// create ──▶ pending ──▶ confirmed ──▶ completed
///               │            │
///               └──▶ cancelled ◀──┘
/// ```
/// `completed` and `cancelled` are terminal. Customers may only cancel their
/// own pending bookings; staff drive every other transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> ClientResult<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(ClientError::Validation(format!("Invalid status: {}", s))),
        }
    }

    /// No transition leaves a terminal status, for any role
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Whether `role` may move a booking from this status to `next`
    ///
    /// `is_owner` is only consulted for the customer role; staff act on any
    /// booking.
    pub fn can_transition(&self, next: BookingStatus, role: Role, is_owner: bool) -> bool {
        if self.is_terminal() {
            return false;
        }
        match role {
            Role::Customer => {
                is_owner && *self == BookingStatus::Pending && next == BookingStatus::Cancelled
            }
            Role::Staff | Role::Admin => matches!(
                (self, next),
                (BookingStatus::Pending, BookingStatus::Confirmed)
                    | (BookingStatus::Pending, BookingStatus::Cancelled)
                    | (BookingStatus::Confirmed, BookingStatus::Completed)
                    | (BookingStatus::Confirmed, BookingStatus::Cancelled)
            ),
        }
    }

    /// The transitions a UI should offer from this status
    pub fn allowed_transitions(&self, role: Role, is_owner: bool) -> Vec<BookingStatus> {
        [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ]
        .into_iter()
        .filter(|next| self.can_transition(*next, role, is_owner))
        .collect()
    }
}

/// A booked appointment
///
/// `service_name` and `service_price` are captured from the catalog at
/// creation time; later catalog edits never alter them. The staff flags are
/// absent on the older hosted backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub user: Option<UserSummary>,
    pub service_name: String,
    pub service_price: Decimal,
    pub appointment_date: NaiveDate,
    #[serde(with = "super::timefmt")]
    pub appointment_time: NaiveTime,
    pub status: BookingStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_vip: Option<bool>,
    #[serde(default)]
    pub is_home_service: Option<bool>,
    #[serde(default)]
    pub use_new_equipment: Option<bool>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user.as_ref().map(|u| u.id.as_str()) == Some(user_id)
    }
}

/// An unvalidated booking form, mirroring what the UI collects
#[derive(Debug, Clone, Default)]
pub struct BookingDraft {
    pub service_id: Option<i64>,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

impl BookingDraft {
    /// Validate the draft against `today` before anything goes on the wire
    pub fn validate(self, today: NaiveDate) -> ClientResult<BookingRequest> {
        let (service_id, appointment_date, appointment_time) = match (
            self.service_id,
            self.appointment_date,
            self.appointment_time,
        ) {
            (Some(s), Some(d), Some(t)) => (s, d, t),
            _ => {
                return Err(ClientError::Validation(
                    "Please select a service, date and time".to_string(),
                ))
            }
        };

        if appointment_date < today {
            return Err(ClientError::Validation(
                "Appointment date cannot be in the past".to_string(),
            ));
        }

        Ok(BookingRequest {
            service_id,
            appointment_date,
            appointment_time,
            notes: self.notes,
        })
    }
}

/// Validated create payload for `POST /bookings/create/`
#[derive(Debug, Clone, Serialize)]
pub struct BookingRequest {
    pub service_id: i64,
    pub appointment_date: NaiveDate,
    #[serde(with = "super::timefmt")]
    pub appointment_time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for `PATCH /bookings/{id}/`
///
/// The staff flags are rejected server-side for customers; the client never
/// pre-validates them beyond not offering the controls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_home_service: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_new_equipment: Option<bool>,
}

impl BookingUpdate {
    pub fn status(status: BookingStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_terminal_statuses_admit_no_transition() {
        for from in [BookingStatus::Completed, BookingStatus::Cancelled] {
            for next in [
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::Completed,
                BookingStatus::Cancelled,
            ] {
                for role in [Role::Customer, Role::Staff, Role::Admin] {
                    assert!(!from.can_transition(next, role, true));
                }
            }
        }
    }

    #[test]
    fn test_customer_may_only_cancel_own_pending() {
        let pending = BookingStatus::Pending;
        assert!(pending.can_transition(BookingStatus::Cancelled, Role::Customer, true));
        assert!(!pending.can_transition(BookingStatus::Cancelled, Role::Customer, false));
        assert!(!pending.can_transition(BookingStatus::Confirmed, Role::Customer, true));
        assert!(!BookingStatus::Confirmed.can_transition(
            BookingStatus::Cancelled,
            Role::Customer,
            true
        ));
    }

    #[test]
    fn test_staff_transitions() {
        let pending = BookingStatus::Pending;
        let confirmed = BookingStatus::Confirmed;
        assert!(pending.can_transition(BookingStatus::Confirmed, Role::Staff, false));
        assert!(pending.can_transition(BookingStatus::Cancelled, Role::Staff, false));
        assert!(confirmed.can_transition(BookingStatus::Completed, Role::Admin, false));
        assert!(confirmed.can_transition(BookingStatus::Cancelled, Role::Staff, false));
        // No skipping pending straight to completed
        assert!(!pending.can_transition(BookingStatus::Completed, Role::Staff, false));
        // No reverting a confirmation
        assert!(!confirmed.can_transition(BookingStatus::Pending, Role::Admin, false));
    }

    #[test]
    fn test_allowed_transitions_drive_ui_controls() {
        let offered =
            BookingStatus::Pending.allowed_transitions(Role::Customer, true);
        assert_eq!(offered, vec![BookingStatus::Cancelled]);

        let offered =
            BookingStatus::Confirmed.allowed_transitions(Role::Customer, true);
        assert!(offered.is_empty());

        let offered = BookingStatus::Pending.allowed_transitions(Role::Staff, false);
        assert_eq!(
            offered,
            vec![BookingStatus::Confirmed, BookingStatus::Cancelled]
        );
    }

    #[test]
    fn test_draft_requires_all_fields() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let draft = BookingDraft {
            service_id: Some(1),
            appointment_date: Some(today),
            appointment_time: None,
            notes: None,
        };
        let err = draft.validate(today).unwrap_err();
        assert!(err.to_string().contains("select a service"));
    }

    #[test]
    fn test_draft_rejects_past_date() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let draft = BookingDraft {
            service_id: Some(1),
            appointment_date: today.pred_opt(),
            appointment_time: chrono::NaiveTime::from_hms_opt(10, 0, 0),
            notes: None,
        };
        assert!(draft.validate(today).is_err());
    }

    #[test]
    fn test_draft_accepts_today() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let draft = BookingDraft {
            service_id: Some(1),
            appointment_date: Some(today),
            appointment_time: chrono::NaiveTime::from_hms_opt(10, 0, 0),
            notes: Some("first visit".to_string()),
        };
        let request = draft.validate(today).unwrap();
        assert_eq!(request.service_id, 1);
    }

    #[test]
    fn test_create_payload_wire_shape() {
        let request = BookingRequest {
            service_id: 3,
            appointment_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            appointment_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            notes: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["appointment_date"], "2026-09-01");
        assert_eq!(json["appointment_time"], "09:30");
        assert!(json.get("notes").is_none());
    }
}
