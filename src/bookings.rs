/// Booking operations
///
/// Thin orchestration over the backend: client-side checks exist so a UI can
/// only offer legal actions, but the backend's own rejection is always the
/// authoritative outcome.
use crate::backend::Backend;
use crate::error::{ClientError, ClientResult};
use crate::models::{Booking, BookingDraft, BookingStatus, BookingUpdate};
use crate::session::SessionManager;
use chrono::Utc;
use std::sync::Arc;

pub struct BookingManager {
    backend: Arc<dyn Backend>,
    session: Arc<SessionManager>,
}

impl BookingManager {
    pub fn new(backend: Arc<dyn Backend>, session: Arc<SessionManager>) -> Self {
        Self { backend, session }
    }

    /// Validate a booking form and create the appointment
    ///
    /// Missing fields and past dates are rejected before anything goes on
    /// the wire. The created booking always starts at `pending` with the
    /// service price captured as of now.
    pub async fn create(&self, draft: BookingDraft) -> ClientResult<Booking> {
        let request = draft.validate(Utc::now().date_naive())?;
        self.backend.create_booking(&request).await
    }

    /// Fetch the role-scoped booking list
    ///
    /// Ordered ascending by appointment date and time regardless of backend,
    /// so the next appointment always comes first.
    pub async fn list(&self) -> ClientResult<Vec<Booking>> {
        let mut bookings = self.backend.list_bookings().await?;
        bookings.sort_by_key(|b| (b.appointment_date, b.appointment_time));
        Ok(bookings)
    }

    pub async fn update(&self, id: i64, update: BookingUpdate) -> ClientResult<Booking> {
        self.backend.update_booking(id, &update).await
    }

    pub async fn update_status(&self, id: i64, status: BookingStatus) -> ClientResult<Booking> {
        self.update(id, BookingUpdate::status(status)).await
    }

    /// Cancel one of the current user's pending bookings
    ///
    /// The product rule: a cancel action is only ever offered while the
    /// booking is still pending, and only to its owner. The same rule holds
    /// server-side so the two views never diverge.
    pub async fn cancel(&self, booking: &Booking) -> ClientResult<Booking> {
        let user = self.session.require_user()?;
        if !booking.is_owned_by(&user.id) {
            return Err(ClientError::Validation(
                "You can only cancel your own bookings".to_string(),
            ));
        }
        if booking.status != BookingStatus::Pending {
            return Err(ClientError::Validation(
                "You can only cancel pending bookings".to_string(),
            ));
        }
        self.update_status(booking.id, BookingStatus::Cancelled).await
    }

    /// Hard-delete a booking (staff only)
    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        let user = self.session.require_user()?;
        if !user.role.is_staff() {
            return Err(ClientError::Authorization(
                "Only staff can delete bookings".to_string(),
            ));
        }
        self.backend.delete_booking(id).await
    }
}
