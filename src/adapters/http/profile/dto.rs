//! HTTP DTOs for profile endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::Timestamp;
use crate::domain::holistic::{HolisticProfile, SharingPolicy};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Query parameters of the aggregated profile view.
///
/// Values are kept raw; the handler decides which are malformed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileQueryParams {
    /// Category selector, `all` when absent
    pub c: Option<String>,
    /// Result limit per category
    pub l: Option<String>,
    #[serde(rename = "fromDate")]
    pub from_date: Option<String>,
    #[serde(rename = "toDate")]
    pub to_date: Option<String>,
}

/// Body naming the profile an authenticated request targets.
#[derive(Debug, Clone, Deserialize)]
pub struct UsernameRequest {
    pub username: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub username: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// `{auth, message}` envelope used by the authenticated endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub auth: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    pub fn ok() -> Self {
        Self {
            auth: true,
            message: None,
        }
    }

    pub fn granted(message: impl Into<String>) -> Self {
        Self {
            auth: true,
            message: Some(message.into()),
        }
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            auth: false,
            message: Some(message.into()),
        }
    }
}

/// The owner's full profile record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnProfileResponse {
    pub username: String,
    pub demographics: Option<Map<String, Value>>,
    pub personalities: Vec<Value>,
    pub empathies: Vec<Value>,
    pub holistic_profile_config: SharingPolicy,
    pub policy_version: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<HolisticProfile> for OwnProfileResponse {
    fn from(profile: HolisticProfile) -> Self {
        Self {
            username: profile.username().to_string(),
            demographics: profile.demographics().cloned(),
            personalities: profile.personalities().to_vec(),
            empathies: profile.empathies().to_vec(),
            holistic_profile_config: *profile.policy(),
            policy_version: profile.version().as_u32(),
            created_at: profile.created_at(),
            updated_at: profile.updated_at(),
        }
    }
}

/// Error response for malformed requests and server failures.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
}

impl ErrorResponse {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: HashMap<String, String>) -> Self {
        if !details.is_empty() {
            self.details = Some(details);
        }
        self
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "SERVICE_UNAVAILABLE".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}
