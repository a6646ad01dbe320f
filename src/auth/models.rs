//! Authentication data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::dates::iso_timestamp;

/// The signed-in member, as stored under `currentUser`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub member_id: String,
    pub member_name: String,
    pub email: String,
    pub token: String,
    #[serde(with = "iso_timestamp")]
    pub login_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session fields a profile edit may change; `None` keeps the current value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionUpdate {
    pub member_name: Option<String>,
    pub email: Option<String>,
}
