/// Hosted database-as-a-service backend (the earlier iteration)
///
/// Auth lives under `/auth/v1/`, table rows under `/rest/v1/` with an
/// `apikey` header on every request; row access is scoped by the service's
/// row-level policies. Profiles store a combined full name that is split and
/// joined at this boundary, and the cart-era surface does not exist on this
/// wire.
use crate::backend::Backend;
use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::models::{
    AuthSession, Booking, BookingRequest, BookingStatus, BookingUpdate, Gender, Profile,
    ProfileUpdate, RegistrationRequest, Role, Service, User, UserSummary,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const UPSERT_HEADERS: &[(&str, &str)] = &[(
    "Prefer",
    "resolution=merge-duplicates,return=representation",
)];
const RETURNING_HEADERS: &[(&str, &str)] = &[("Prefer", "return=representation")];

pub struct HostedBackend {
    http: HttpClient,
}

impl HostedBackend {
    pub fn new(base_url: &str, api_key: &str, api: &ApiConfig) -> ClientResult<Self> {
        let http = HttpClient::new(base_url, api)?
            .with_default_headers(vec![("apikey".to_string(), api_key.to_string())]);
        Ok(Self { http })
    }
}

// Wire shapes for this backend only

#[derive(Deserialize)]
struct HostedAuthResponse {
    access_token: String,
    refresh_token: String,
    user: HostedUser,
}

#[derive(Deserialize)]
struct HostedUser {
    id: String,
    email: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    user_metadata: HostedMetadata,
}

#[derive(Default, Deserialize)]
struct HostedMetadata {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    gender: Option<Gender>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    role: Option<Role>,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: serde_json::Value,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct HostedServiceRow {
    id: i64,
    name: String,
    description: String,
    price: Decimal,
    duration_minutes: u32,
    is_active: bool,
}

#[derive(Deserialize)]
struct HostedBookingRow {
    id: i64,
    user_id: String,
    service_name: String,
    service_price: Decimal,
    appointment_date: NaiveDate,
    #[serde(with = "crate::models::timefmt")]
    appointment_time: NaiveTime,
    status: BookingStatus,
    #[serde(default)]
    notes: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct HostedProfileRow {
    user_id: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    gender: Option<Gender>,
}

/// Split a combined full name into first/rest
fn split_full_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.trim().splitn(2, ' ');
    let first = parts.next().unwrap_or("").to_string();
    let last = parts.next().unwrap_or("").trim().to_string();
    (first, last)
}

fn join_full_name(first: &str, last: &str) -> String {
    format!("{} {}", first, last).trim().to_string()
}

fn map_user(raw: HostedUser) -> User {
    let meta = raw.user_metadata;
    let (first_name, last_name) = split_full_name(meta.full_name.as_deref().unwrap_or(""));
    let username = meta
        .username
        .unwrap_or_else(|| raw.email.split('@').next().unwrap_or("").to_string());
    User {
        id: raw.id,
        username,
        email: raw.email,
        first_name,
        last_name,
        phone: meta.phone,
        gender: meta.gender,
        avatar_url: meta.avatar_url,
        role: meta.role.unwrap_or(Role::Customer),
        created_at: raw.created_at,
    }
}

fn map_booking(row: HostedBookingRow) -> Booking {
    Booking {
        id: row.id,
        // This wire only carries the owner id; names live in the profile row
        user: Some(UserSummary {
            id: row.user_id,
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
        }),
        service_name: row.service_name,
        service_price: row.service_price,
        appointment_date: row.appointment_date,
        appointment_time: row.appointment_time,
        status: row.status,
        notes: row.notes,
        is_vip: None,
        is_home_service: None,
        use_new_equipment: None,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn map_service(row: HostedServiceRow) -> Service {
    Service {
        id: row.id,
        name: row.name,
        description: row.description,
        price: row.price,
        duration_minutes: row.duration_minutes,
        duration_display: None,
        is_active: row.is_active,
    }
}

fn map_profile(row: HostedProfileRow) -> Profile {
    let (first_name, last_name) = split_full_name(row.full_name.as_deref().unwrap_or(""));
    Profile {
        user_id: row.user_id,
        first_name,
        last_name,
        phone: row.phone,
        avatar_url: row.avatar_url,
        gender: row.gender,
    }
}

fn map_auth(raw: HostedAuthResponse) -> AuthSession {
    AuthSession {
        user: map_user(raw.user),
        access: raw.access_token,
        refresh: raw.refresh_token,
    }
}

#[async_trait]
impl Backend for HostedBackend {
    fn set_token(&self, token: Option<String>) {
        self.http.set_token(token);
    }

    async fn register(&self, request: &RegistrationRequest) -> ClientResult<AuthSession> {
        let mut data = serde_json::json!({
            "username": request.username,
            "full_name": join_full_name(&request.first_name, &request.last_name),
        });
        if let Some(ref phone) = request.phone {
            data["phone"] = serde_json::json!(phone);
        }
        if let Some(gender) = request.gender {
            data["gender"] = serde_json::json!(gender);
        }

        let raw: HostedAuthResponse = self
            .http
            .post(
                "/auth/v1/signup",
                &SignupRequest {
                    email: &request.email,
                    password: &request.password,
                    data,
                },
            )
            .await?;
        Ok(map_auth(raw))
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<AuthSession> {
        let raw: HostedAuthResponse = self
            .http
            .post(
                "/auth/v1/token?grant_type=password",
                &PasswordGrant { email, password },
            )
            .await?;
        Ok(map_auth(raw))
    }

    async fn current_user(&self) -> ClientResult<User> {
        let raw: HostedUser = self.http.get("/auth/v1/user").await?;
        Ok(map_user(raw))
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        // Metadata updates replace provided keys; the full name has to be
        // re-joined from the current value when only one half changes
        let current = self.current_user().await?;

        let mut data = serde_json::Map::new();
        if update.first_name.is_some() || update.last_name.is_some() {
            let first = update
                .first_name
                .clone()
                .unwrap_or_else(|| current.first_name.clone());
            let last = update
                .last_name
                .clone()
                .unwrap_or_else(|| current.last_name.clone());
            data.insert(
                "full_name".to_string(),
                serde_json::json!(join_full_name(&first, &last)),
            );
        }
        if let Some(ref phone) = update.phone {
            data.insert("phone".to_string(), serde_json::json!(phone));
        }
        if let Some(gender) = update.gender {
            data.insert("gender".to_string(), serde_json::json!(gender));
        }
        if let Some(ref avatar_url) = update.avatar_url {
            data.insert("avatar_url".to_string(), serde_json::json!(avatar_url));
        }

        let raw: HostedUser = self
            .http
            .put("/auth/v1/user", &serde_json::json!({ "data": data }))
            .await?;
        Ok(map_user(raw))
    }

    async fn list_services(&self) -> ClientResult<Vec<Service>> {
        let rows: Vec<HostedServiceRow> = self
            .http
            .get("/rest/v1/services?is_active=eq.true&order=name.asc")
            .await?;
        Ok(rows.into_iter().map(map_service).collect())
    }

    async fn list_bookings(&self) -> ClientResult<Vec<Booking>> {
        let rows: Vec<HostedBookingRow> = self
            .http
            .get("/rest/v1/bookings?select=*&order=appointment_date.asc,appointment_time.asc")
            .await?;
        Ok(rows.into_iter().map(map_booking).collect())
    }

    async fn create_booking(&self, request: &BookingRequest) -> ClientResult<Booking> {
        let user = self.current_user().await?;

        // Capture the service's current price into the booking row; later
        // catalog edits must not touch historical bookings
        let mut services: Vec<HostedServiceRow> = self
            .http
            .get(&format!(
                "/rest/v1/services?id=eq.{}&limit=1",
                request.service_id
            ))
            .await?;
        let service = match services.pop() {
            Some(row) if row.is_active => row,
            _ => {
                return Err(ClientError::Validation(
                    "Invalid service selected".to_string(),
                ))
            }
        };

        let body = serde_json::json!({
            "user_id": user.id,
            "service_name": service.name,
            "service_price": service.price,
            "appointment_date": request.appointment_date,
            "appointment_time": request.appointment_time.format("%H:%M").to_string(),
            "status": BookingStatus::Pending,
            "notes": request.notes,
        });
        let mut rows: Vec<HostedBookingRow> = self
            .http
            .post_with_headers("/rest/v1/bookings", &body, RETURNING_HEADERS)
            .await?;
        rows.pop()
            .map(map_booking)
            .ok_or_else(|| ClientError::Internal("Insert returned no row".to_string()))
    }

    async fn update_booking(&self, id: i64, update: &BookingUpdate) -> ClientResult<Booking> {
        let mut body = serde_json::Map::new();
        if let Some(status) = update.status {
            body.insert("status".to_string(), serde_json::json!(status));
        }
        if let Some(ref notes) = update.notes {
            body.insert("notes".to_string(), serde_json::json!(notes));
        }

        let mut rows: Vec<HostedBookingRow> = self
            .http
            .patch_with_headers(
                &format!("/rest/v1/bookings?id=eq.{}", id),
                &serde_json::Value::Object(body),
                RETURNING_HEADERS,
            )
            .await?;
        rows.pop()
            .map(map_booking)
            .ok_or_else(|| ClientError::NotFound("Booking".to_string()))
    }

    async fn delete_booking(&self, id: i64) -> ClientResult<()> {
        self.http
            .delete(&format!("/rest/v1/bookings?id=eq.{}", id))
            .await
    }

    async fn fetch_profile(&self, user_id: &str) -> ClientResult<Option<Profile>> {
        let mut rows: Vec<HostedProfileRow> = self
            .http
            .get(&format!(
                "/rest/v1/profiles?user_id=eq.{}&limit=1",
                urlencoding::encode(user_id)
            ))
            .await?;
        Ok(rows.pop().map(map_profile))
    }

    async fn save_profile(&self, update: &ProfileUpdate) -> ClientResult<Profile> {
        let user = self.current_user().await?;
        let existing = self.fetch_profile(&user.id).await?;

        // Compose the row, then write it through the service's atomic upsert
        // keyed on the user_id uniqueness constraint
        let (first, last) = match &existing {
            Some(profile) => (profile.first_name.clone(), profile.last_name.clone()),
            None => (String::new(), String::new()),
        };
        let first = update.first_name.clone().unwrap_or(first);
        let last = update.last_name.clone().unwrap_or(last);

        let mut body = serde_json::Map::new();
        body.insert("user_id".to_string(), serde_json::json!(user.id));
        body.insert(
            "full_name".to_string(),
            serde_json::json!(join_full_name(&first, &last)),
        );
        if let Some(ref phone) = update.phone {
            body.insert("phone".to_string(), serde_json::json!(phone));
        }
        if let Some(gender) = update.gender {
            body.insert("gender".to_string(), serde_json::json!(gender));
        }
        if let Some(ref avatar_url) = update.avatar_url {
            body.insert("avatar_url".to_string(), serde_json::json!(avatar_url));
        }

        let mut rows: Vec<HostedProfileRow> = self
            .http
            .post_with_headers(
                "/rest/v1/profiles?on_conflict=user_id",
                &serde_json::Value::Object(body),
                UPSERT_HEADERS,
            )
            .await?;
        rows.pop()
            .map(map_profile)
            .ok_or_else(|| ClientError::Internal("Upsert returned no row".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_full_name() {
        assert_eq!(
            split_full_name("Ada Lovelace"),
            ("Ada".to_string(), "Lovelace".to_string())
        );
        assert_eq!(split_full_name("Ada"), ("Ada".to_string(), String::new()));
        assert_eq!(split_full_name(""), (String::new(), String::new()));
        assert_eq!(
            split_full_name("Ada King Lovelace"),
            ("Ada".to_string(), "King Lovelace".to_string())
        );
    }

    #[test]
    fn test_name_round_trip() {
        let (first, last) = split_full_name(&join_full_name("Ada", "Lovelace"));
        assert_eq!(first, "Ada");
        assert_eq!(last, "Lovelace");
    }

    #[test]
    fn test_map_user_defaults() {
        let raw: HostedUser = serde_json::from_value(serde_json::json!({
            "id": "9f7c1c9e-0000-4000-8000-000000000000",
            "email": "ada@example.com",
            "created_at": "2025-01-15T10:30:00Z"
        }))
        .unwrap();
        let user = map_user(raw);
        assert_eq!(user.username, "ada");
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.first_name, "");
    }

    #[test]
    fn test_map_user_with_metadata() {
        let raw: HostedUser = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "email": "ada@example.com",
            "created_at": "2025-01-15T10:30:00Z",
            "user_metadata": {
                "username": "ada",
                "full_name": "Ada Lovelace",
                "role": "customer",
                "phone": "555-0100"
            }
        }))
        .unwrap();
        let user = map_user(raw);
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_profile_row_maps_split_names() {
        let row: HostedProfileRow = serde_json::from_value(serde_json::json!({
            "user_id": "abc",
            "full_name": "Ada Lovelace",
            "phone": "555-0100"
        }))
        .unwrap();
        let profile = map_profile(row);
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.last_name, "Lovelace");
    }
}
