// src/dashboard/models.rs

use serde::Serialize;

use crate::auth::AuthUser;
use crate::borrowing::BorrowInfo;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load user borrowing information";

/// What the member dashboard shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub user: Option<AuthUser>,
    pub borrow_info: Option<BorrowInfo>,
    pub is_loading: bool,
    pub error: Option<String>,
}
