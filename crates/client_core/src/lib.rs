use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::SubmitError,
    protocol::{RegisterRequest, RegisterResponse, RegistrationReceipt},
};
use tracing::{debug, warn};
use url::Url;

pub mod cache;
pub mod controller;
pub mod pricing;
pub mod settings;
pub mod surface;
pub mod validation;

pub use cache::{FieldCache, FileFieldCache, MemoryFieldCache};
pub use controller::{
    ControllerConfig, FormController, FormEvent, FormPhase, SubmissionOutcome, SubmitAttempt,
};
pub use pricing::PriceQuote;
pub use settings::{load_settings, Settings};
pub use surface::{FormSurface, StatusKind};

/// Transport for one registration attempt. Implementations make a single
/// request and never retry.
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<RegistrationReceipt, SubmitError>;
}

pub struct HttpRegistrationApi {
    http: Client,
    endpoint: Url,
}

impl HttpRegistrationApi {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::new(settings.register_endpoint()?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RegistrationApi for HttpRegistrationApi {
    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<RegistrationReceipt, SubmitError> {
        debug!(endpoint = %self.endpoint, "posting registration");
        let response = self
            .http
            .post(self.endpoint.clone())
            .header("X-Requested-With", "XMLHttpRequest")
            .json(request)
            .send()
            .await
            .map_err(|err| SubmitError::NetworkFailure(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| SubmitError::NetworkFailure(err.to_string()))?;

        let reply: RegisterResponse = match serde_json::from_slice(&body) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(status = status.as_u16(), "register reply is not JSON: {err}");
                return Err(SubmitError::ServerRejection {
                    status: status.as_u16(),
                    message: None,
                });
            }
        };

        if reply.is_accepted(status.is_success()) {
            Ok(reply.into())
        } else {
            Err(SubmitError::ServerRejection {
                status: status.as_u16(),
                message: reply.message,
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
