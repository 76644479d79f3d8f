use error_stack::Report;
use serde_json::json;

use kernel::interface::provider::IdentityProvider;
use kernel::prelude::entity::{ExternalId, InternalId};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

static CLERK_SECRET_KEY: &str = "CLERK_SECRET_KEY";
static CLERK_API_URL: &str = "CLERK_API_URL";
static DEFAULT_API_URL: &str = "https://api.clerk.com/v1";

/// Backend API client for the identity provider.
pub struct ClerkProvider {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl ClerkProvider {
    pub fn new() -> error_stack::Result<Self, KernelError> {
        let secret_key = env(CLERK_SECRET_KEY)?;
        let base_url = env(CLERK_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            secret_key,
        })
    }
}

#[async_trait::async_trait]
impl IdentityProvider for ClerkProvider {
    async fn attach_internal_id(
        &self,
        external_id: &ExternalId,
        internal_id: &InternalId,
    ) -> error_stack::Result<(), KernelError> {
        let url = format!("{}/users/{}/metadata", self.base_url, external_id.as_ref());
        let body = json!({
            "public_metadata": {
                "userId": internal_id.as_ref(),
            }
        });
        self.client
            .patch(url)
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .convert_error()?
            .error_for_status()
            .convert_error()?;
        tracing::debug!(external_id = %external_id.as_ref(), "internal id attached to provider account");
        Ok(())
    }
}

impl<T> ConvertError for Result<T, reqwest::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = if error.is_timeout() {
                KernelError::Timeout
            } else {
                KernelError::Internal
            };
            Report::from(error).change_context(context)
        })
    }
}
