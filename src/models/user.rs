//! User account/profile documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Collection, Document};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    #[default]
    Admin,
    Superadmin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
            UserRole::Superadmin => "superadmin",
        }
    }
}

/// Full user document (includes the password hash; never serialized to the API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// ISO 3166-1 alpha-2 code.
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub transactions: Vec<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document for User {
    const COLLECTION: Collection = Collection::Users;
}

/// User response DTO without the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub occupation: Option<String>,
    pub phone_number: Option<String>,
    pub transactions: Vec<String>,
    pub role: UserRole,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            city: u.city,
            state: u.state,
            country: u.country,
            occupation: u.occupation,
            phone_number: u.phone_number,
            transactions: u.transactions,
            role: u.role,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn role_defaults_to_admin() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "name": "Shelly",
            "email": "s@example.com",
            "password": "hunter22"
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.transactions.is_empty());
    }

    #[test]
    fn sparse_legacy_record_still_decodes() {
        let user: User =
            serde_json::from_value(json!({"_id": "legacy-0", "country": "US"})).unwrap();
        assert_eq!(user.email, "");
        assert_eq!(user.country.as_deref(), Some("US"));
    }

    #[test]
    fn response_omits_password() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "name": "Shelly",
            "email": "s@example.com",
            "password": "hunter22",
            "phoneNumber": "8346315874",
            "role": "user"
        }))
        .unwrap();
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["phoneNumber"], "8346315874");
        assert_eq!(json["role"], "user");
        assert_eq!(json["_id"], "u1");
    }
}
