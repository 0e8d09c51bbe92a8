/// End-to-end booking flows through the full client context
use std::sync::Arc;

use chrono::{Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use trimbook::avatar::MemoryAvatarStore;
use trimbook::backend::MemoryBackend;
use trimbook::models::{
    AvailabilityQuery, AvailabilityRequest, BookingDraft, BookingStatus, BookingUpdate,
    RegistrationRequest, Role,
};
use trimbook::token::MemoryTokenStore;
use trimbook::{AppContext, ClientConfig, ClientError};

fn context_over(backend: Arc<MemoryBackend>) -> AppContext {
    AppContext::with_backend(
        ClientConfig::rest("http://localhost:8000/api"),
        backend,
        Arc::new(MemoryTokenStore::new()),
        Arc::new(MemoryAvatarStore::new()),
    )
}

fn registration(username: &str, email: &str) -> RegistrationRequest {
    RegistrationRequest {
        username: username.to_string(),
        email: email.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        password: "hunter22".to_string(),
        password_confirm: "hunter22".to_string(),
        phone: Some("555-0100".to_string()),
        gender: None,
    }
}

fn draft(service_id: i64, days_ahead: i64, hour: u32) -> BookingDraft {
    BookingDraft {
        service_id: Some(service_id),
        appointment_date: Some(Utc::now().date_naive() + Duration::days(days_ahead)),
        appointment_time: NaiveTime::from_hms_opt(hour, 0, 0),
        notes: None,
    }
}

#[tokio::test]
async fn visitor_books_premium_fade_after_logging_in() {
    let backend = Arc::new(MemoryBackend::new());
    backend.add_service("Premium Fade", "A precision fade", Decimal::new(2500, 2), 45);
    backend.add_service("Beard Trim", "Shape and line", Decimal::new(1500, 2), 20);
    let ctx = context_over(backend.clone());
    ctx.init().await;

    // The visitor browses the catalog without being signed in
    let services = ctx.catalog.services().await.unwrap();
    let fade = services.iter().find(|s| s.name == "Premium Fade").unwrap();
    let price_at_selection = fade.price;

    // Booking before login fails at the backend's door
    let err = ctx.bookings.create(draft(fade.id, 7, 10)).await.unwrap_err();
    assert!(matches!(err, ClientError::Authentication(_)));

    // Sign up, then the same booking goes through
    ctx.session
        .sign_up(registration("ada", "ada@example.com"))
        .await
        .unwrap();
    let booking = ctx.bookings.create(draft(fade.id, 7, 10)).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.service_price, price_at_selection);

    // The dashboard list shows the pending booking, and the captured price
    // ignores a later catalog change
    backend.set_service_price(fade.id, Decimal::new(9900, 2));
    let listed = ctx.bookings.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, BookingStatus::Pending);
    assert_eq!(listed[0].service_price, price_at_selection);
}

#[tokio::test]
async fn staff_confirmation_shows_up_on_customers_next_fetch() {
    let backend = Arc::new(MemoryBackend::new());
    let service = backend.add_service("Premium Fade", "", Decimal::new(2500, 2), 45);
    backend.add_user("staff", "staff@example.com", "pw", Role::Staff);
    let ctx = context_over(backend.clone());
    ctx.init().await;

    ctx.session
        .sign_up(registration("ada", "ada@example.com"))
        .await
        .unwrap();
    let booking = ctx.bookings.create(draft(service.id, 3, 9)).await.unwrap();

    // Staff takes over the session and confirms; the customer did nothing
    ctx.session.sign_out().await;
    ctx.session.sign_in("staff@example.com", "pw").await.unwrap();
    let staff_view = ctx.bookings.list().await.unwrap();
    assert_eq!(staff_view.len(), 1);
    let owner = staff_view[0].user.as_ref().unwrap();
    assert_eq!(owner.first_name, "Ada");
    assert_eq!(owner.phone.as_deref(), Some("555-0100"));

    ctx.bookings
        .update_status(booking.id, BookingStatus::Confirmed)
        .await
        .unwrap();

    // Back as the customer: the next fetch reflects the new status
    ctx.session.sign_out().await;
    ctx.session
        .sign_in("ada@example.com", "hunter22")
        .await
        .unwrap();
    let listed = ctx.bookings.list().await.unwrap();
    assert_eq!(listed[0].status, BookingStatus::Confirmed);

    // And the cancel action is no longer offered nor accepted
    assert!(listed[0]
        .status
        .allowed_transitions(Role::Customer, true)
        .is_empty());
    assert!(ctx.bookings.cancel(&listed[0]).await.is_err());
}

#[tokio::test]
async fn customer_cancels_own_pending_booking() {
    let backend = Arc::new(MemoryBackend::new());
    let service = backend.add_service("Premium Fade", "", Decimal::new(2500, 2), 45);
    let ctx = context_over(backend);
    ctx.init().await;

    ctx.session
        .sign_up(registration("ada", "ada@example.com"))
        .await
        .unwrap();
    let booking = ctx.bookings.create(draft(service.id, 2, 14)).await.unwrap();

    let cancelled = ctx.bookings.cancel(&booking).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    // Cancelled is terminal: nothing moves it again, not even staff
    let listed = ctx.bookings.list().await.unwrap();
    assert!(listed[0].status.is_terminal());
    let err = ctx
        .bookings
        .update_status(booking.id, BookingStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn completed_lifecycle_ends_in_terminal_state() {
    let backend = Arc::new(MemoryBackend::new());
    let service = backend.add_service("Premium Fade", "", Decimal::new(2500, 2), 45);
    backend.add_user("staff", "staff@example.com", "pw", Role::Staff);
    let ctx = context_over(backend);
    ctx.init().await;

    ctx.session
        .sign_up(registration("ada", "ada@example.com"))
        .await
        .unwrap();
    let booking = ctx.bookings.create(draft(service.id, 1, 11)).await.unwrap();

    ctx.session.sign_out().await;
    ctx.session.sign_in("staff@example.com", "pw").await.unwrap();

    ctx.bookings
        .update_status(booking.id, BookingStatus::Confirmed)
        .await
        .unwrap();
    let completed = ctx
        .bookings
        .update_status(booking.id, BookingStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.status, BookingStatus::Completed);

    let err = ctx
        .bookings
        .update_status(booking.id, BookingStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("completed"));
}

#[tokio::test]
async fn staff_deletes_booking_for_good() {
    let backend = Arc::new(MemoryBackend::new());
    let service = backend.add_service("Premium Fade", "", Decimal::new(2500, 2), 45);
    backend.add_user("staff", "staff@example.com", "pw", Role::Staff);
    let ctx = context_over(backend);
    ctx.init().await;

    ctx.session
        .sign_up(registration("ada", "ada@example.com"))
        .await
        .unwrap();
    let booking = ctx.bookings.create(draft(service.id, 4, 16)).await.unwrap();

    // Customers cannot hard-delete, the client gate fires first
    let err = ctx.bookings.delete(booking.id).await.unwrap_err();
    assert!(matches!(err, ClientError::Authorization(_)));

    ctx.session.sign_out().await;
    ctx.session.sign_in("staff@example.com", "pw").await.unwrap();
    ctx.bookings.delete(booking.id).await.unwrap();
    assert!(ctx.bookings.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn staff_flags_ride_along_with_updates() {
    let backend = Arc::new(MemoryBackend::new());
    let service = backend.add_service("Premium Fade", "", Decimal::new(2500, 2), 45);
    backend.add_user("staff", "staff@example.com", "pw", Role::Staff);
    let ctx = context_over(backend);
    ctx.init().await;

    ctx.session
        .sign_up(registration("ada", "ada@example.com"))
        .await
        .unwrap();
    let booking = ctx.bookings.create(draft(service.id, 5, 13)).await.unwrap();

    ctx.session.sign_out().await;
    ctx.session.sign_in("staff@example.com", "pw").await.unwrap();
    let updated = ctx
        .bookings
        .update(
            booking.id,
            BookingUpdate {
                is_vip: Some(true),
                is_home_service: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.is_vip, Some(true));
    assert_eq!(updated.is_home_service, Some(true));
    // Untouched fields keep their values
    assert_eq!(updated.status, BookingStatus::Pending);
    assert_eq!(updated.use_new_equipment, Some(false));
}

#[tokio::test]
async fn availability_windows_are_filterable() {
    let backend = Arc::new(MemoryBackend::new());
    let fade = backend.add_service("Premium Fade", "", Decimal::new(2500, 2), 45);
    let ctx = context_over(backend);
    ctx.init().await;
    ctx.session
        .sign_up(registration("ada", "ada@example.com"))
        .await
        .unwrap();

    let date = Utc::now().date_naive() + Duration::days(3);
    ctx.catalog
        .create_availability(AvailabilityRequest {
            service_id: fade.id,
            date,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            capacity: 3,
            is_home_service: false,
        })
        .await
        .unwrap();
    ctx.catalog
        .create_availability(AvailabilityRequest {
            service_id: fade.id,
            date,
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            capacity: 1,
            is_home_service: true,
        })
        .await
        .unwrap();

    let all = ctx
        .catalog
        .availability(AvailabilityQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let home_only = ctx
        .catalog
        .availability(AvailabilityQuery {
            is_home_service: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(home_only.len(), 1);
    assert_eq!(home_only[0].capacity, 1);
    assert_eq!(home_only[0].remaining_slots, 1);
}

#[tokio::test]
async fn cart_and_topups_flow() {
    let backend = Arc::new(MemoryBackend::new());
    let trim = backend.add_service("Beard Trim", "", Decimal::new(1500, 2), 20);
    backend.add_equipment("Fresh razor kit", Decimal::new(500, 2));
    let ctx = context_over(backend);
    ctx.init().await;

    ctx.session
        .sign_up(registration("ada", "ada@example.com"))
        .await
        .unwrap();

    let equipment = ctx.catalog.equipment().await.unwrap();
    assert_eq!(equipment.len(), 1);

    let mut add = trimbook::models::AddToCartRequest::new(trim.id);
    add.use_new_equipment = true;
    add.equipment_surcharge = equipment[0].surcharge;
    ctx.catalog.add_to_cart(add.clone()).await.unwrap();
    ctx.catalog.add_to_cart(add).await.unwrap();

    let cart = ctx.catalog.cart().await.unwrap();
    assert_eq!(cart.items_count, 1);
    assert_eq!(cart.items[0].quantity, 2);
    // 2 x (15.00 + 5.00)
    assert_eq!(cart.total_amount, Decimal::new(4000, 2));

    ctx.catalog.clear_cart().await.unwrap();
    assert_eq!(ctx.catalog.cart().await.unwrap().items_count, 0);

    let topup = ctx.catalog.create_topup(Decimal::new(5000, 2)).await.unwrap();
    assert_eq!(topup.status, trimbook::models::TopUpStatus::Pending);
    assert_eq!(ctx.catalog.credit_topups().await.unwrap().len(), 1);
}
