use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use chrono_tz::Tz;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::components::google_calendar::models::{CalendarEvent, InsertedEvent};
use crate::components::zoom::models::ZoomMeetingRequest;
use crate::error::{invalid_request, AppResult};

/// Inbound webhook payload for booking a single meeting
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    /// Meeting title
    pub title: String,
    /// Wall-clock start time, interpreted in the configured timezone
    pub start_time: NaiveDateTime,
    /// Meeting length in minutes
    pub duration_min: u32,
    /// Display name of whoever hosts the meeting
    pub host: String,
}

impl BookingRequest {
    /// Check the constraints serde cannot express on its own
    pub fn validate(&self) -> AppResult<()> {
        if self.duration_min == 0 {
            return Err(invalid_request("duration_min must be greater than zero"));
        }

        // serde accepts expanded years, so the end-time sum can leave
        // chrono's representable range; everything downstream relies on
        // this addition holding
        if self
            .start_time
            .checked_add_signed(Duration::minutes(i64::from(self.duration_min)))
            .is_none()
        {
            return Err(invalid_request(
                "start_time plus duration_min is out of range",
            ));
        }

        Ok(())
    }
}

/// Short-lived bearer token for the meeting provider
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

// Keep the token out of logs
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Source of access tokens for the meeting provider
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch a fresh access token
    async fn fetch_access_token(&self) -> AppResult<AccessToken>;
}

/// Books meetings with the video-conferencing provider
#[async_trait]
pub trait MeetingBookingService: Send + Sync {
    /// Create the meeting and return its join URL
    async fn create_meeting(
        &self,
        meeting: &ZoomMeetingRequest,
        token: &AccessToken,
    ) -> AppResult<String>;
}

/// Publishes events to the shared calendar
#[async_trait]
pub trait CalendarPublishingService: Send + Sync {
    /// Insert the event into the calendar
    async fn insert_event(&self, event: &CalendarEvent) -> AppResult<InsertedEvent>;
}

/// Runs a booking end to end: token, meeting, calendar entry
pub struct BookingPipeline {
    timezone: Tz,
    token_source: Arc<dyn TokenSource>,
    booking_service: Arc<dyn MeetingBookingService>,
    calendar_publisher: Arc<dyn CalendarPublishingService>,
}

impl BookingPipeline {
    pub fn new(
        timezone: Tz,
        token_source: Arc<dyn TokenSource>,
        booking_service: Arc<dyn MeetingBookingService>,
        calendar_publisher: Arc<dyn CalendarPublishingService>,
    ) -> Self {
        Self {
            timezone,
            token_source,
            booking_service,
            calendar_publisher,
        }
    }

    /// Handle one booking request and return the join URL.
    ///
    /// The steps run strictly in order and the first failure aborts the
    /// rest. A meeting booked before a later step fails stays booked;
    /// there is no compensating cancellation.
    pub async fn handle_booking_request(&self, request: BookingRequest) -> AppResult<String> {
        request.validate()?;

        // Authenticate with the meeting provider
        let token = self.token_source.fetch_access_token().await?;

        // Book the meeting
        let meeting = ZoomMeetingRequest::from_booking(&request, self.timezone);
        let join_url = self
            .booking_service
            .create_meeting(&meeting, &token)
            .await?;
        info!("Booked meeting \"{}\" for {}", request.title, request.host);

        // Mirror it on the shared calendar
        let event = CalendarEvent::from_booking(&request, &join_url, self.timezone);
        self.calendar_publisher.insert_event(&event).await?;

        Ok(join_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(duration_min: u32) -> BookingRequest {
        BookingRequest {
            title: "standup".to_string(),
            start_time: "2023-10-14T22:00:00".parse().unwrap(),
            duration_min,
            host: "@keiji".to_string(),
        }
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        let error = request(0).validate().unwrap_err();
        assert!(error.to_string().contains("duration_min"));
    }

    #[test]
    fn test_positive_duration_is_accepted() {
        assert!(request(60).validate().is_ok());
    }

    #[test]
    fn test_end_time_past_calendar_range_is_rejected() {
        // chrono parses expanded years up to +262142
        let request = BookingRequest {
            start_time: "+262142-12-31T23:00:00".parse().unwrap(),
            ..request(120)
        };

        let error = request.validate().unwrap_err();
        assert!(error.to_string().contains("out of range"));
    }

    #[test]
    fn test_late_but_representable_end_time_is_accepted() {
        let request = BookingRequest {
            start_time: "+262142-12-31T22:00:00".parse().unwrap(),
            ..request(60)
        };

        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_access_token_debug_hides_secret() {
        let token = AccessToken::new("very-secret-value");
        let printed = format!("{:?}", token);
        assert!(!printed.contains("very-secret-value"));
    }

    #[test]
    fn test_booking_request_deserializes_naive_timestamp() {
        let request: BookingRequest = serde_json::from_str(
            r#"{
                "title": "drinking party",
                "start_time": "2023-10-14T22:00:00",
                "duration_min": 60,
                "host": "@keiji"
            }"#,
        )
        .unwrap();

        assert_eq!(request.title, "drinking party");
        assert_eq!(
            request.start_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "2023-10-14T22:00:00"
        );
        assert_eq!(request.duration_min, 60);
        assert_eq!(request.host, "@keiji");
    }

    #[test]
    fn test_offset_timestamp_is_rejected() {
        let result = serde_json::from_str::<BookingRequest>(
            r#"{
                "title": "standup",
                "start_time": "2023-10-14T22:00:00+09:00",
                "duration_min": 15,
                "host": "@keiji"
            }"#,
        );

        assert!(result.is_err());
    }
}
