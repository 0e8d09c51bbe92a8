/// REST API backend (the current iteration)
///
/// Speaks the token-authenticated REST wire: `/auth/`, `/services/`,
/// `/bookings/` plus the cart/equipment/availability/top-up surface. Role
/// wire values are `user | staff | admin`.
use crate::backend::Backend;
use crate::config::ApiConfig;
use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::models::{
    AddToCartRequest, AuthSession, AvailabilityQuery, AvailabilityRequest, Booking,
    BookingRequest, BookingUpdate, Cart, CartItem, CreditTopUp, Equipment, Profile,
    ProfileUpdate, RegistrationRequest, Service, ServiceAvailability, User,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

pub struct RestBackend {
    http: HttpClient,
}

impl RestBackend {
    pub fn new(base_url: &str, api: &ApiConfig) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url, api)?,
        })
    }

    /// On this wire the profile is a view over the authenticated user row
    fn profile_from_user(user: User) -> Profile {
        Profile {
            user_id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            avatar_url: user.avatar_url,
            gender: user.gender,
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct TopUpRequest {
    amount: Decimal,
}

#[async_trait]
impl Backend for RestBackend {
    fn set_token(&self, token: Option<String>) {
        self.http.set_token(token);
    }

    async fn register(&self, request: &RegistrationRequest) -> ClientResult<AuthSession> {
        self.http.post("/auth/register/", request).await
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<AuthSession> {
        self.http
            .post("/auth/login/", &LoginRequest { email, password })
            .await
    }

    async fn current_user(&self) -> ClientResult<User> {
        self.http.get("/auth/profile/").await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        self.http.patch("/auth/profile/", update).await
    }

    async fn list_services(&self) -> ClientResult<Vec<Service>> {
        self.http.get("/services/").await
    }

    async fn list_bookings(&self) -> ClientResult<Vec<Booking>> {
        self.http.get("/bookings/").await
    }

    async fn create_booking(&self, request: &BookingRequest) -> ClientResult<Booking> {
        self.http.post("/bookings/create/", request).await
    }

    async fn update_booking(&self, id: i64, update: &BookingUpdate) -> ClientResult<Booking> {
        self.http.patch(&format!("/bookings/{}/", id), update).await
    }

    async fn delete_booking(&self, id: i64) -> ClientResult<()> {
        self.http.delete(&format!("/bookings/{}/", id)).await
    }

    async fn fetch_profile(&self, _user_id: &str) -> ClientResult<Option<Profile>> {
        // The profile row is created with the account; absence cannot happen
        let user: User = self.http.get("/auth/profile/").await?;
        Ok(Some(Self::profile_from_user(user)))
    }

    async fn save_profile(&self, update: &ProfileUpdate) -> ClientResult<Profile> {
        // PATCH of the authenticated row is the wire's atomic upsert
        let user: User = self.http.patch("/auth/profile/", update).await?;
        Ok(Self::profile_from_user(user))
    }

    async fn fetch_cart(&self) -> ClientResult<Cart> {
        self.http.get("/cart/").await
    }

    async fn add_to_cart(&self, request: &AddToCartRequest) -> ClientResult<CartItem> {
        self.http.post("/cart/add/", request).await
    }

    async fn remove_cart_item(&self, item_id: i64) -> ClientResult<()> {
        self.http.delete(&format!("/cart/remove/{}/", item_id)).await
    }

    async fn clear_cart(&self) -> ClientResult<()> {
        let _: serde_json::Value = self
            .http
            .post("/cart/clear/", &serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn list_equipment(&self) -> ClientResult<Vec<Equipment>> {
        self.http.get("/equipment/").await
    }

    async fn list_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> ClientResult<Vec<ServiceAvailability>> {
        self.http
            .get(&format!("/service-availability/{}", query.to_query_string()))
            .await
    }

    async fn create_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> ClientResult<ServiceAvailability> {
        self.http
            .post("/service-availability/create/", request)
            .await
    }

    async fn list_topups(&self) -> ClientResult<Vec<CreditTopUp>> {
        self.http.get("/credit-topups/").await
    }

    async fn create_topup(&self, amount: Decimal) -> ClientResult<CreditTopUp> {
        self.http
            .post("/credit-topups/", &TopUpRequest { amount })
            .await
    }
}
