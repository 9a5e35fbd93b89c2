use serde::{Deserialize, Serialize};

/// JSON body of `POST /api/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub house_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    pub persons_adults: u32,
    #[serde(default)]
    pub persons_children: u32,
    #[serde(default)]
    pub allergies_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<String>,
}

/// Reply of `POST /api/register`. Every field is optional because the
/// server omits `success` on plain 2xx/4xx replies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        default,
        rename = "paymentUrl",
        alias = "payment_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_url: Option<String>,
    #[serde(
        default,
        rename = "registrationId",
        skip_serializing_if = "Option::is_none"
    )]
    pub registration_id: Option<i64>,
}

impl RegisterResponse {
    /// An explicit `success` flag wins; otherwise the HTTP status decides.
    pub fn is_accepted(&self, http_success: bool) -> bool {
        self.success.unwrap_or(http_success)
    }
}

/// Accepted registration as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub message: Option<String>,
    pub payment_url: Option<String>,
    pub registration_id: Option<i64>,
}

impl From<RegisterResponse> for RegistrationReceipt {
    fn from(value: RegisterResponse) -> Self {
        Self {
            message: value.message,
            payment_url: value.payment_url.filter(|url| !url.trim().is_empty()),
            registration_id: value.registration_id,
        }
    }
}
