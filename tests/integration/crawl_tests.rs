//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the remote API and run full
//! passes against real SQLite stores in a temporary directory.

use crate::common::{create_test_config, mount_token, profile, timeline};
use langscout::config::Config;
use langscout::crawler::{ApiClient, Coordinator};
use langscout::frontier::{reseed_from_confirmed, seed_frontier, Frontier, SqliteFrontier};
use langscout::language::{LanguageGate, ScriptClassifier};
use langscout::storage::{Archive, SqliteArchive};
use langscout::Candidate;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestCoordinator = Coordinator<ApiClient, SqliteFrontier, SqliteArchive>;

fn create_test_coordinator(
    config: &Config,
) -> (Arc<TestCoordinator>, Arc<SqliteFrontier>, Arc<SqliteArchive>) {
    let archive = Arc::new(SqliteArchive::new(&config.storage.database_path).unwrap());
    let frontier = Arc::new(
        SqliteFrontier::new(&config.storage.frontier_path, &config.storage.frontier_name).unwrap(),
    );
    let classifier = ScriptClassifier::new(config.crawler.script_share).unwrap();
    let gate = LanguageGate::new(
        Arc::new(classifier),
        &config.crawler.target_language,
        config.crawler.threshold,
    );
    let api = ApiClient::new(&config.api).unwrap();

    let coordinator = Arc::new(Coordinator::new(
        Arc::new(api),
        Arc::clone(&frontier),
        Arc::clone(&archive),
        gate,
        config.crawler.clone(),
    ));

    (coordinator, frontier, archive)
}

/// Mounts profile, timeline and follower responses for one account
///
/// `key` is the query parameter the crawler will use for this account.
async fn mount_account(
    server: &MockServer,
    key: (&str, &str),
    account: Value,
    posts: Value,
    followers: Option<Vec<u64>>,
) {
    Mock::given(method("GET"))
        .and(path("/1.1/users/show.json"))
        .and(query_param(key.0, key.1))
        .respond_with(ResponseTemplate::new(200).set_body_json(account.clone()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .and(query_param(key.0, key.1))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts))
        .mount(server)
        .await;

    let id = account["id"].to_string();
    let follower_mock = Mock::given(method("GET"))
        .and(path("/1.1/followers/ids.json"))
        .and(query_param("user_id", id.as_str()));

    match followers {
        Some(ids) => {
            follower_mock
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ids": ids })))
                .mount(server)
                .await
        }
        None => {
            follower_mock
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ids": [] })))
                .expect(0)
                .mount(server)
                .await
        }
    }
}

#[tokio::test]
async fn test_full_pass_follows_accepted_accounts() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    mount_token(&server, "tok").await;

    mount_account(
        &server,
        ("screen_name", "alice"),
        profile(1, "alice"),
        timeline(1, 8, 10),
        Some(vec![101, 102]),
    )
    .await;
    mount_account(
        &server,
        ("user_id", "101"),
        profile(101, "bob"),
        timeline(101, 5, 10),
        Some(vec![]),
    )
    .await;
    mount_account(
        &server,
        ("user_id", "102"),
        profile(102, "carol"),
        timeline(102, 1, 10),
        None,
    )
    .await;

    let (coordinator, frontier, archive) = create_test_coordinator(&config);
    seed_frontier(frontier.as_ref(), &[Candidate::handle("alice")]).unwrap();

    let report = coordinator.run_pass().await.unwrap();

    assert_eq!(report.drawn, 3);
    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected, 1);
    assert_eq!(report.errored, 0);
    assert_eq!(report.followers_offered, 2);
    assert_eq!(report.accounts_inserted, 2);
    assert_eq!(report.posts_inserted, 20);

    assert!(archive.has_account(1).unwrap());
    assert!(archive.has_account(101).unwrap());
    assert!(!archive.has_account(102).unwrap());
    assert_eq!(archive.count_posts().unwrap(), 20);

    let stored = archive.get_account(1).unwrap().unwrap();
    assert_eq!(stored.handle, "alice");

    assert!(frontier.is_empty().unwrap());
    assert_eq!(frontier.confirmed_len().unwrap(), 2);
}

#[tokio::test]
async fn test_rate_limited_timeline_drops_candidate() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    mount_token(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/1.1/users/show.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile(1, "alice")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/followers/ids.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ids": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let (coordinator, frontier, archive) = create_test_coordinator(&config);
    seed_frontier(frontier.as_ref(), &[Candidate::handle("alice")]).unwrap();

    let report = coordinator.run_pass().await.unwrap();

    assert_eq!(report.drawn, 1);
    assert_eq!(report.rate_limited, 1);
    assert_eq!(archive.count_accounts().unwrap(), 0);
    assert!(frontier.is_empty().unwrap());
    assert!(coordinator.backoff().is_cooling_down());
}

#[tokio::test]
async fn test_protected_account_is_not_read() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    mount_token(&server, "tok").await;

    let mut private = profile(1, "alice");
    private["protected"] = json!(true);

    Mock::given(method("GET"))
        .and(path("/1.1/users/show.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(private))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timeline(1, 10, 10)))
        .expect(0)
        .mount(&server)
        .await;

    let (coordinator, frontier, archive) = create_test_coordinator(&config);
    seed_frontier(frontier.as_ref(), &[Candidate::handle("alice")]).unwrap();

    let report = coordinator.run_pass().await.unwrap();

    assert_eq!(report.rejected, 1);
    assert_eq!(archive.count_accounts().unwrap(), 0);
}

#[tokio::test]
async fn test_revisiting_an_account_is_idempotent() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    mount_token(&server, "tok").await;

    // Seeded by handle, re-seeded by numeric ID
    for key in [("screen_name", "alice"), ("user_id", "1")] {
        mount_account(
            &server,
            key,
            profile(1, "alice"),
            timeline(1, 10, 10),
            Some(vec![]),
        )
        .await;
    }

    let (coordinator, frontier, archive) = create_test_coordinator(&config);
    seed_frontier(frontier.as_ref(), &[Candidate::handle("alice")]).unwrap();

    let first = coordinator.run_pass().await.unwrap();
    assert_eq!(first.accounts_inserted, 1);
    assert_eq!(first.posts_inserted, 10);

    assert_eq!(reseed_from_confirmed(frontier.as_ref(), 10).unwrap(), 1);
    assert!(frontier.contains(&Candidate::Id(1)).unwrap());

    let second = coordinator.run_pass().await.unwrap();
    assert_eq!(second.accepted, 1);
    assert_eq!(second.accounts_inserted, 0);
    assert_eq!(second.posts_inserted, 0);

    assert_eq!(archive.count_accounts().unwrap(), 1);
    assert_eq!(archive.count_posts().unwrap(), 10);
}

#[tokio::test]
async fn test_frontier_survives_restart() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&server.uri(), dir.path());
    config.crawler.pass_size = 1;
    mount_token(&server, "tok").await;

    for (id, handle) in [(1, "one"), (2, "two"), (3, "three")] {
        mount_account(
            &server,
            ("screen_name", handle),
            profile(id, handle),
            timeline(id, 0, 10),
            None,
        )
        .await;
    }

    let seeds: Vec<Candidate> = ["one", "two", "three"]
        .into_iter()
        .map(Candidate::handle)
        .collect();

    {
        let (coordinator, frontier, _archive) = create_test_coordinator(&config);
        seed_frontier(frontier.as_ref(), &seeds).unwrap();

        let report = coordinator.run_pass().await.unwrap();
        assert_eq!(report.drawn, 1);
        assert_eq!(report.rejected, 1);
    }

    let reopened =
        SqliteFrontier::new(&config.storage.frontier_path, &config.storage.frontier_name).unwrap();
    assert_eq!(reopened.len().unwrap(), 2);

    // A non-empty frontier takes precedence over the seed list
    assert_eq!(seed_frontier(&reopened, &seeds).unwrap(), 0);
    assert_eq!(reopened.len().unwrap(), 2);
}
