/// Catalog operations: services, equipment, availability, cart, top-ups
///
/// Fetch-and-display plumbing with no client-side rules beyond what the
/// types enforce; each page refetches on demand.
use crate::backend::Backend;
use crate::error::ClientResult;
use crate::models::{
    AddToCartRequest, AvailabilityQuery, AvailabilityRequest, Cart, CartItem, CreditTopUp,
    Equipment, Service, ServiceAvailability,
};
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct CatalogManager {
    backend: Arc<dyn Backend>,
}

impl CatalogManager {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Active services
    pub async fn services(&self) -> ClientResult<Vec<Service>> {
        self.backend.list_services().await
    }

    /// New-equipment options with surcharges
    pub async fn equipment(&self) -> ClientResult<Vec<Equipment>> {
        self.backend.list_equipment().await
    }

    /// Open scheduling windows, optionally filtered
    pub async fn availability(
        &self,
        query: AvailabilityQuery,
    ) -> ClientResult<Vec<ServiceAvailability>> {
        self.backend.list_availability(&query).await
    }

    /// Publish a new scheduling window (staff dashboards)
    pub async fn create_availability(
        &self,
        request: AvailabilityRequest,
    ) -> ClientResult<ServiceAvailability> {
        self.backend.create_availability(&request).await
    }

    pub async fn cart(&self) -> ClientResult<Cart> {
        self.backend.fetch_cart().await
    }

    pub async fn add_to_cart(&self, request: AddToCartRequest) -> ClientResult<CartItem> {
        self.backend.add_to_cart(&request).await
    }

    pub async fn remove_cart_item(&self, item_id: i64) -> ClientResult<()> {
        self.backend.remove_cart_item(item_id).await
    }

    pub async fn clear_cart(&self) -> ClientResult<()> {
        self.backend.clear_cart().await
    }

    pub async fn credit_topups(&self) -> ClientResult<Vec<CreditTopUp>> {
        self.backend.list_topups().await
    }

    pub async fn create_topup(&self, amount: Decimal) -> ClientResult<CreditTopUp> {
        self.backend.create_topup(amount).await
    }
}
