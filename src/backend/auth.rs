use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::session::{ApiClient, ApiRequest, ClientError};

/// Login form.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    access_token: String,
}

/// Session lifecycle calls.
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Exchange credentials for a session token and store it.
    ///
    /// # Errors
    ///
    /// [`ClientError::Status`] with 401 for wrong credentials.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ClientError> {
        let request = ApiRequest::post("/auth/login").json(credentials)?;
        self.authenticate(&request).await?;
        info!(email = %credentials.email, "Logged in");
        Ok(())
    }

    /// Create an account and store the session token it comes with.
    pub async fn register(&self, registration: &Registration) -> Result<(), ClientError> {
        let request = ApiRequest::post("/auth/register").json(registration)?;
        self.authenticate(&request).await?;
        info!(username = %registration.username, "Registered");
        Ok(())
    }

    /// End the session on the backend and forget the local token.
    ///
    /// The token is cleared even when the backend call fails; the backend
    /// error is still returned.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self
            .client
            .send_empty(&ApiRequest::post("/auth/logout"))
            .await;

        self.client.store().clear()?;

        match result {
            Ok(()) => {
                info!("Logged out");
                Ok(())
            }
            Err(e) => {
                warn!("Backend logout failed, local session cleared anyway: {}", e);
                Err(e)
            }
        }
    }

    async fn authenticate(&self, request: &ApiRequest) -> Result<(), ClientError> {
        let response = self.client.send_anonymous(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        if body.access_token.is_empty() {
            return Err(ClientError::Decode("response carried an empty token".into()));
        }

        self.client.store().set_token(&body.access_token)?;
        Ok(())
    }
}
