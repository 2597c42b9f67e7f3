//! Zoom client covering the two calls a booking needs: fetching an
//! account-credentials token and creating the meeting.

pub mod models;

pub use models::{ZoomMeetingRequest, ZoomMeetingResponse, ZoomTokenResponse};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::booking::{AccessToken, MeetingBookingService, TokenSource};
use crate::config::Config;
use crate::error::{zoom_error, AppResult};

/// OAuth endpoint for account-credentials grants
const DEFAULT_AUTH_BASE: &str = "https://zoom.us";

/// REST API endpoint
const DEFAULT_API_BASE: &str = "https://api.zoom.us";

/// Client for the Zoom OAuth and meeting APIs
#[derive(Clone)]
pub struct ZoomClient {
    client: Client,
    auth_base: String,
    api_base: String,
    account_id: String,
    client_credential: String,
}

// Keep the basic credential out of logs
impl std::fmt::Debug for ZoomClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomClient")
            .field("auth_base", &self.auth_base)
            .field("api_base", &self.api_base)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

impl ZoomClient {
    /// Create a client pointed at the production endpoints
    pub fn new(config: &Config) -> Self {
        Self::with_base_urls(
            config.zoom_account_id.clone(),
            config.zoom_client_credential.clone(),
            DEFAULT_AUTH_BASE,
            DEFAULT_API_BASE,
        )
    }

    /// Create a client with overridden endpoints; tests point this at a
    /// local mock server
    pub fn with_base_urls(
        account_id: String,
        client_credential: String,
        auth_base: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            auth_base: auth_base.into(),
            api_base: api_base.into(),
            account_id,
            client_credential,
        }
    }
}

#[async_trait]
impl TokenSource for ZoomClient {
    /// Exchange the account credential for a short-lived bearer token
    async fn fetch_access_token(&self) -> AppResult<AccessToken> {
        let mut url = Url::parse(&format!("{}/oauth/token", self.auth_base))
            .map_err(|e| zoom_error(&format!("Invalid token URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("grant_type", "account_credentials")
            .append_pair("account_id", &self.account_id);

        let response = self
            .client
            .post(url)
            .header(
                "Authorization",
                format!("Basic {}", self.client_credential),
            )
            .send()
            .await
            .map_err(|e| zoom_error(&format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(zoom_error(&format!(
                "Token request failed with status {}: {}",
                status, error_text
            )));
        }

        let token: ZoomTokenResponse = response
            .json()
            .await
            .map_err(|e| zoom_error(&format!("Failed to parse token response: {}", e)))?;

        debug!("Fetched Zoom access token");
        Ok(AccessToken::new(token.access_token))
    }
}

#[async_trait]
impl MeetingBookingService for ZoomClient {
    /// Create the meeting under the account owner and return its join URL
    async fn create_meeting(
        &self,
        meeting: &ZoomMeetingRequest,
        token: &AccessToken,
    ) -> AppResult<String> {
        let url = format!("{}/v2/users/me/meetings", self.api_base);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", token.secret()))
            .json(meeting)
            .send()
            .await
            .map_err(|e| zoom_error(&format!("Meeting request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(zoom_error(&format!(
                "Meeting request failed with status {}: {}",
                status, error_text
            )));
        }

        let created: ZoomMeetingResponse = response
            .json()
            .await
            .map_err(|e| zoom_error(&format!("Failed to parse meeting response: {}", e)))?;

        if let Some(id) = created.id {
            info!("Created Zoom meeting {}", id);
        }
        Ok(created.join_url)
    }
}
