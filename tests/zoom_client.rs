use kaigi::booking::{AccessToken, BookingRequest, MeetingBookingService, TokenSource};
use kaigi::components::zoom::{ZoomClient, ZoomMeetingRequest};
use kaigi::error::Error;
use mockito::Matcher;
use serde_json::json;

const ACCOUNT_ID: &str = "acc_4f2b";
const BASIC_CREDENTIAL: &str = "Y2xpZW50OnNlY3JldA==";

fn client(url: &str) -> ZoomClient {
    ZoomClient::with_base_urls(
        ACCOUNT_ID.to_string(),
        BASIC_CREDENTIAL.to_string(),
        url,
        url,
    )
}

fn meeting() -> ZoomMeetingRequest {
    let request = BookingRequest {
        title: "drinking party".to_string(),
        start_time: "2023-10-14T22:00:00".parse().unwrap(),
        duration_min: 60,
        host: "@keiji".to_string(),
    };
    ZoomMeetingRequest::from_booking(&request, chrono_tz::Asia::Tokyo)
}

/// The token exchange posts the account-credentials grant with the
/// Basic header and reads access_token from the response
#[tokio::test]
async fn test_fetch_access_token() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/oauth/token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "account_credentials".into()),
            Matcher::UrlEncoded("account_id".into(), ACCOUNT_ID.into()),
        ]))
        .match_header("authorization", format!("Basic {}", BASIC_CREDENTIAL).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "zoom-token", "token_type": "bearer", "expires_in": 3599}"#)
        .create_async()
        .await;

    let token = client(&server.url()).fetch_access_token().await.unwrap();

    assert_eq!(token.secret(), "zoom-token");
    mock.assert_async().await;
}

/// A rejected credential is fatal and carries the upstream status
#[tokio::test]
async fn test_rejected_credential_is_fatal() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/oauth/token")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"reason": "Invalid client_id or client_secret"}"#)
        .create_async()
        .await;

    let error = client(&server.url()).fetch_access_token().await.unwrap_err();

    assert!(matches!(error, Error::ZoomApi(_)));
    assert!(error.to_string().contains("401"));
}

/// A success response without an access_token field is still an error
#[tokio::test]
async fn test_missing_access_token_field_is_fatal() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/oauth/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token_type": "bearer", "expires_in": 3599}"#)
        .create_async()
        .await;

    let error = client(&server.url()).fetch_access_token().await.unwrap_err();

    assert!(matches!(error, Error::ZoomApi(_)));
    assert!(error.to_string().contains("parse"));
}

/// Creating a meeting sends the bearer token and the full payload and
/// returns the join URL from the response
#[tokio::test]
async fn test_create_meeting_returns_join_url() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/v2/users/me/meetings")
        .match_header("authorization", "Bearer zoom-token")
        .match_body(Matcher::PartialJson(json!({
            "topic": "drinking party",
            "type": 2,
            "start_time": "2023-10-14T22:00:00",
            "duration": 60,
            "timezone": "Asia/Tokyo",
            "password": "nantsuku",
            "agenda": "Host is @keiji",
            "settings": {
                "join_before_host": true,
                "waiting_room": false,
                "registrants_confirmation_email": false
            }
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id": 85746065434, "join_url": "https://zoom.us/j/85746065434?pwd=abc123", "status": "waiting"}"#,
        )
        .create_async()
        .await;

    let join_url = client(&server.url())
        .create_meeting(&meeting(), &AccessToken::new("zoom-token"))
        .await
        .unwrap();

    assert_eq!(join_url, "https://zoom.us/j/85746065434?pwd=abc123");
    mock.assert_async().await;
}

/// A failed booking is fatal and carries the upstream status
#[tokio::test]
async fn test_failed_booking_is_fatal() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/v2/users/me/meetings")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code": 429, "message": "Too many requests"}"#)
        .create_async()
        .await;

    let error = client(&server.url())
        .create_meeting(&meeting(), &AccessToken::new("zoom-token"))
        .await
        .unwrap_err();

    assert!(matches!(error, Error::ZoomApi(_)));
    assert!(error.to_string().contains("429"));
}
