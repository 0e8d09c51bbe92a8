/// Backend adapters
///
/// The platform's two backend iterations (a hosted database-as-a-service API
/// and the current token-authenticated REST API) sit behind one stable port.
/// Business logic never sees which wire format is in use; the choice is made
/// from configuration at construction time.
mod hosted;
mod memory;
mod rest;

pub use hosted::HostedBackend;
pub use memory::MemoryBackend;
pub use rest::RestBackend;

use crate::config::{ApiConfig, BackendConfig};
use crate::error::{ClientError, ClientResult};
use crate::models::{
    AddToCartRequest, AuthSession, AvailabilityQuery, AvailabilityRequest, Booking,
    BookingRequest, BookingUpdate, Cart, CartItem, CreditTopUp, Equipment, Profile,
    ProfileUpdate, RegistrationRequest, Service, ServiceAvailability, User,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

/// The stable booking/session port every backend implements
///
/// Role checks behind this trait are the real security boundary; anything the
/// client checks first is UX convenience only.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Replace the bearer token attached to subsequent requests
    fn set_token(&self, token: Option<String>);

    // Auth
    async fn register(&self, request: &RegistrationRequest) -> ClientResult<AuthSession>;
    async fn login(&self, email: &str, password: &str) -> ClientResult<AuthSession>;
    async fn current_user(&self) -> ClientResult<User>;
    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User>;

    // Catalog
    async fn list_services(&self) -> ClientResult<Vec<Service>>;

    // Bookings
    async fn list_bookings(&self) -> ClientResult<Vec<Booking>>;
    async fn create_booking(&self, request: &BookingRequest) -> ClientResult<Booking>;
    async fn update_booking(&self, id: i64, update: &BookingUpdate) -> ClientResult<Booking>;
    async fn delete_booking(&self, id: i64) -> ClientResult<()>;

    // Profile submodel
    async fn fetch_profile(&self, user_id: &str) -> ClientResult<Option<Profile>>;
    async fn save_profile(&self, update: &ProfileUpdate) -> ClientResult<Profile>;

    // Extended surface; the older hosted backend predates it
    async fn fetch_cart(&self) -> ClientResult<Cart> {
        Err(ClientError::Unsupported("The cart"))
    }
    async fn add_to_cart(&self, _request: &AddToCartRequest) -> ClientResult<CartItem> {
        Err(ClientError::Unsupported("The cart"))
    }
    async fn remove_cart_item(&self, _item_id: i64) -> ClientResult<()> {
        Err(ClientError::Unsupported("The cart"))
    }
    async fn clear_cart(&self) -> ClientResult<()> {
        Err(ClientError::Unsupported("The cart"))
    }
    async fn list_equipment(&self) -> ClientResult<Vec<Equipment>> {
        Err(ClientError::Unsupported("The equipment catalog"))
    }
    async fn list_availability(
        &self,
        _query: &AvailabilityQuery,
    ) -> ClientResult<Vec<ServiceAvailability>> {
        Err(ClientError::Unsupported("Availability lookup"))
    }
    async fn create_availability(
        &self,
        _request: &AvailabilityRequest,
    ) -> ClientResult<ServiceAvailability> {
        Err(ClientError::Unsupported("Availability scheduling"))
    }
    async fn list_topups(&self) -> ClientResult<Vec<CreditTopUp>> {
        Err(ClientError::Unsupported("Credit top-up"))
    }
    async fn create_topup(&self, _amount: Decimal) -> ClientResult<CreditTopUp> {
        Err(ClientError::Unsupported("Credit top-up"))
    }
}

/// Build the configured backend
pub fn build_backend(config: &BackendConfig, api: &ApiConfig) -> ClientResult<Arc<dyn Backend>> {
    match config {
        BackendConfig::Rest { base_url } => Ok(Arc::new(RestBackend::new(base_url, api)?)),
        BackendConfig::Hosted { base_url, api_key } => {
            Ok(Arc::new(HostedBackend::new(base_url, api_key, api)?))
        }
    }
}
