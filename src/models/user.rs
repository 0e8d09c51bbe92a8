/// User identity and role types
use crate::error::{ClientError, ClientResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User roles
///
/// The REST wire calls the customer role `user`; the hosted backend calls it
/// `customer`. Both deserialize to the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user", alias = "customer")]
    Customer,
    #[serde(rename = "staff")]
    Staff,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "user",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> ClientResult<Self> {
        match s.to_lowercase().as_str() {
            "user" | "customer" => Ok(Role::Customer),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            _ => Err(ClientError::Validation(format!("Invalid role: {}", s))),
        }
    }

    /// Staff and admins share the management surface
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }
}

/// Gender choices offered at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// The authenticated user as returned by `/auth/profile/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(with = "super::flexible_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Minimal owner projection attached to bookings in staff views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(with = "super::flexible_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Registration payload for `POST /auth/register/`
///
/// The password confirmation is validated server-side only; the client passes
/// both fields through untouched.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

/// Successful sign-in/sign-up response: the user plus a token pair
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub access: String,
    pub refresh: String,
}
