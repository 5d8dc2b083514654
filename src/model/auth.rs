//! Sign-in response records.

use serde::{Deserialize, Serialize};

/// `service_response_type` yang menandakan sign-in berhasil.
pub const SERVICE_RESPONSE_SUCCESS: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPersonalData {
    pub name: String,
    pub postcode: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
}

/// Persisted under the auth slot.
///
/// `message` is never written to or read from the binary stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub data: AuthPersonalData,
    pub service_response_type: i64,
    #[serde(skip)]
    pub message: Option<String>,
}

impl AuthData {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.service_response_type == SERVICE_RESPONSE_SUCCESS
    }
}
