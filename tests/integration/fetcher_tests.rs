//! Integration tests for the HTTP account API client

use crate::common::{create_test_config, mount_token, profile, timeline};
use langscout::crawler::{AccountApi, ApiClient};
use langscout::{Candidate, FetchError};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn create_test_client(server: &MockServer) -> ApiClient {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    ApiClient::new(&config.api).unwrap()
}

#[tokio::test]
async fn test_timeline_request_and_parsing() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1").await;

    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .and(query_param("screen_name", "alice"))
        .and(query_param("count", "200"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timeline(1, 3, 5)))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server).await;
    let posts = client
        .fetch_timeline(&Candidate::handle("alice"), 200)
        .await
        .unwrap();

    assert_eq!(posts.len(), 5);
    assert_eq!(posts[0].id, "1000");
    assert_eq!(posts[0].account_id, Some(1));
    assert!(posts[0].text.contains("天气"));
}

#[tokio::test]
async fn test_token_exchange_uses_client_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(header_exists("authorization"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "bearer",
            "access_token": "tok-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/users/show.json"))
        .and(query_param("user_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile(7, "seven")))
        .expect(2)
        .mount(&server)
        .await;

    let client = create_test_client(&server).await;

    // The second call reuses the cached token
    for _ in 0..2 {
        let account = client.fetch_profile(&Candidate::Id(7)).await.unwrap();
        assert_eq!(account.id, 7);
        assert_eq!(account.handle, "seven");
        assert!(!account.protected);
    }
}

#[tokio::test]
async fn test_rejected_token_is_refreshed_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "stale" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_token(&server, "fresh").await;

    Mock::given(method("GET"))
        .and(path("/1.1/followers/ids.json"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/followers/ids.json"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ids": [5, 6, 7] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server).await;
    let ids = client.fetch_follower_ids(&Candidate::Id(1)).await.unwrap();

    assert_eq!(ids, vec![5, 6, 7]);
}

#[tokio::test]
async fn test_repeated_unauthorized_is_remote_error() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/1.1/users/show.json"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let client = create_test_client(&server).await;
    let result = client.fetch_profile(&Candidate::Id(1)).await;

    assert!(matches!(result, Err(FetchError::Remote(_))));
}

#[tokio::test]
async fn test_status_classification() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;

    for (id, status) in [("1", 429), ("2", 420), ("3", 404), ("4", 500)] {
        Mock::given(method("GET"))
            .and(path("/1.1/users/show.json"))
            .and(query_param("user_id", id))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
    }

    let client = create_test_client(&server).await;

    assert!(matches!(
        client.fetch_profile(&Candidate::Id(1)).await,
        Err(FetchError::RateLimited)
    ));
    assert!(matches!(
        client.fetch_profile(&Candidate::Id(2)).await,
        Err(FetchError::RateLimited)
    ));
    assert!(matches!(
        client.fetch_profile(&Candidate::Id(3)).await,
        Err(FetchError::NotFound(_))
    ));
    assert!(matches!(
        client.fetch_profile(&Candidate::Id(4)).await,
        Err(FetchError::Remote(_))
    ));
}

#[tokio::test]
async fn test_malformed_bodies_are_remote_errors() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/users/show.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/followers/ids.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": [] })))
        .mount(&server)
        .await;

    let client = create_test_client(&server).await;
    let candidate = Candidate::Id(1);

    assert!(matches!(
        client.fetch_timeline(&candidate, 10).await,
        Err(FetchError::Remote(_))
    ));
    assert!(matches!(
        client.fetch_profile(&candidate).await,
        Err(FetchError::Remote(_))
    ));
    assert!(matches!(
        client.fetch_follower_ids(&candidate).await,
        Err(FetchError::Remote(_))
    ));
}

#[tokio::test]
async fn test_failed_token_exchange() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = create_test_client(&server).await;
    let result = client.fetch_timeline(&Candidate::Id(1), 10).await;

    assert!(matches!(result, Err(FetchError::Remote(_))));
}
