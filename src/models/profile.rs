/// Profile submodel: user-editable fields, separate from core identity
use crate::models::user::Gender;
use serde::{Deserialize, Serialize};

/// User-editable profile fields
///
/// Keyed one-to-one on the owning user. The hosted backend stores a combined
/// full name internally; its adapter splits and joins at the boundary so this
/// shape is the same everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(with = "super::flexible_id")]
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

/// Partial profile update for `PATCH /auth/profile/`
///
/// `avatar_url` distinguishes "leave alone" (`None`) from "blank the field"
/// (`Some(None)`); the latter is what avatar removal sends.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.gender.is_none()
            && self.avatar_url.is_none()
    }
}
