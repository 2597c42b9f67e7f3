//! Google Calendar client authorized through a service account. Used to
//! mirror every booked meeting onto the shared team calendar.

pub mod models;
pub mod token;

pub use models::{CalendarEvent, InsertedEvent};

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::booking::CalendarPublishingService;
use crate::config::Config;
use crate::error::{google_calendar_error, AppResult};

use token::TokenManager;

/// Calendar API endpoint
const DEFAULT_API_BASE: &str = "https://www.googleapis.com";

/// Client for the Google Calendar API
#[derive(Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    token_manager: TokenManager,
    api_base: String,
    calendar_id: String,
}

impl GoogleCalendarClient {
    /// Create a client pointed at the production endpoints
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            token_manager: TokenManager::new(config.service_account_key.clone()),
            api_base: DEFAULT_API_BASE.to_string(),
            calendar_id: config.google_calendar_id.clone(),
        }
    }

    /// Create a client with overridden endpoints; tests point this at a
    /// local mock server
    pub fn with_base_urls(
        key: crate::config::ServiceAccountKey,
        calendar_id: String,
        api_base: impl Into<String>,
        token_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token_manager: TokenManager::with_base_url(key, token_base),
            api_base: api_base.into(),
            calendar_id,
        }
    }
}

#[async_trait]
impl CalendarPublishingService for GoogleCalendarClient {
    /// Insert the event into the configured calendar
    async fn insert_event(&self, event: &CalendarEvent) -> AppResult<InsertedEvent> {
        // Each insert authorizes itself with a fresh token
        let access_token = self.token_manager.fetch_access_token().await?;

        let url = format!(
            "{}/calendar/v3/calendars/{}/events",
            self.api_base, self.calendar_id
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(event)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to insert event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Event insert failed with status {}: {}",
                status, error_text
            )));
        }

        let inserted: InsertedEvent = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse event response: {}", e)))?;

        info!("Inserted calendar event {}", inserted.id);
        Ok(inserted)
    }
}
