use crate::{errors::ApiError, http::ApiResponder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Customer => "Customer",
        }
    }
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Customer" => Ok(Self::Customer),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
    Banned,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Banned => "Banned",
        }
    }
}

impl FromStr for UserStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            "Banned" => Ok(Self::Banned),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub order_count: u32,
    #[serde(default)]
    pub review_count: u32,
}

impl ApiResponder for User {
    fn unit() -> &'static str {
        "user"
    }
    fn article() -> &'static str {
        "A"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateData {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub profile_picture: Option<String>,
    pub order_count: Option<u32>,
    pub review_count: Option<u32>,
}

/// Create data whose mandatory fields are known to be present.
#[derive(Debug, Clone)]
pub struct ValidUserCreateData {
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub phone_number: Option<String>,
    pub password: String,
    pub profile_picture: Option<String>,
    pub order_count: u32,
    pub review_count: u32,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::UserFieldMissing(field)),
    }
}

impl TryFrom<UserCreateData> for ValidUserCreateData {
    type Error = ApiError;

    fn try_from(value: UserCreateData) -> Result<Self, Self::Error> {
        Ok(Self {
            username: required(value.username, "username")?,
            email: required(value.email, "email")?,
            role: value.role.ok_or(ApiError::UserFieldMissing("role"))?,
            status: value.status.ok_or(ApiError::UserFieldMissing("status"))?,
            phone_number: value.phone_number,
            password: value.password.unwrap_or_default(),
            profile_picture: value.profile_picture,
            order_count: value.order_count.unwrap_or(0),
            review_count: value.review_count.unwrap_or(0),
        })
    }
}

/// Tells an explicit `null` (`Some(None)`) apart from an absent field (`None`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateData {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone_number: Option<Option<String>>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub profile_picture: Option<Option<String>>,
    pub order_count: Option<u32>,
    pub review_count: Option<u32>,
}

impl User {
    /// Builds a fresh record, assigning the id and both timestamps.
    pub fn new(data: ValidUserCreateData, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: data.username,
            email: data.email,
            phone_number: data.phone_number,
            role: data.role,
            status: data.status,
            created_at: now,
            updated_at: now,
            password: data.password,
            profile_picture: data.profile_picture,
            order_count: data.order_count,
            review_count: data.review_count,
        }
    }

    /// Merges `data` over the record. `id` and `created_at` are never touched,
    /// an empty password keeps the current one, an explicit `null` clears the
    /// optional profile fields.
    pub fn apply_update(&mut self, data: UserUpdateData, now: DateTime<Utc>) {
        if let Some(username) = data.username {
            self.username = username;
        }
        if let Some(email) = data.email {
            self.email = email;
        }
        if let Some(role) = data.role {
            self.role = role;
        }
        if let Some(status) = data.status {
            self.status = status;
        }
        if let Some(phone_number) = data.phone_number {
            self.phone_number = phone_number;
        }
        if let Some(password) = data.password.filter(|p| !p.is_empty()) {
            self.password = password;
        }
        if let Some(profile_picture) = data.profile_picture {
            self.profile_picture = profile_picture;
        }
        if let Some(order_count) = data.order_count {
            self.order_count = order_count;
        }
        if let Some(review_count) = data.review_count {
            self.review_count = review_count;
        }

        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedUsers {
    pub message: String,
    pub deleted_count: u64,
}

impl DeletedUsers {
    pub fn new(deleted_count: u64) -> Self {
        let message = match deleted_count {
            1 => "1 user was deleted".to_owned(),
            n => format!("{n} users were deleted"),
        };

        Self {
            message,
            deleted_count,
        }
    }
}

impl ApiResponder for DeletedUsers {
    fn unit() -> &'static str {
        "deletion result"
    }
    fn article() -> &'static str {
        "A"
    }

    fn message(&self) -> String {
        self.message.clone()
    }
}
