//! End-to-end pipeline scenarios over mock feed and Discord servers

mod common;

use std::time::Duration;

use chrono::Utc;
use common::{rss_feed, RssItem};
use ryze::config::Config;
use ryze::error::{Error, FetchError};
use ryze::feed::FeedReader;
use ryze::notify::DiscordClient;
use ryze::scheduler::{notify_last_n, poll_cycle};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHANNEL: &str = "123456789";

fn config(feed_server: &MockServer) -> Config {
    Config {
        discord_token: "test-token".to_string(),
        discord_channel: CHANNEL.to_string(),
        feed_url: format!("{}/rss.xml", feed_server.uri()),
        fetch_count: 10,
        poll_interval: Duration::from_secs(60),
        freshness_window: Duration::from_secs(60),
        http_port: 8000,
        request_timeout: Duration::from_secs(5),
    }
}

async fn mock_discord() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "1"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/channels/{CHANNEL}/messages")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

async fn mock_feed(body: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;
    server
}

async fn sent_titles(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["embeds"][0]["fields"][1]["value"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect()
}

/// 10 items, 2 published inside the window: the cycle delivers exactly
/// those 2, oldest first
#[tokio::test]
async fn test_poll_cycle_delivers_fresh_items() {
    let now = Utc::now();
    let mut items = vec![
        RssItem::new("fresh-newest", "body", Some(now - chrono::Duration::seconds(10))),
        RssItem::new("fresh-older", "body", Some(now - chrono::Duration::seconds(45))),
    ];
    for i in 0..8 {
        items.push(RssItem::new(
            &format!("stale{i}"),
            "body",
            Some(now - chrono::Duration::minutes(10 + i)),
        ));
    }

    let feed_server = mock_feed(rss_feed("League of Legends", &items)).await;
    let discord = mock_discord().await;

    let config = config(&feed_server);
    let reader = FeedReader::new(config.request_timeout).unwrap();
    let backend =
        DiscordClient::with_base_url("test-token", config.request_timeout, discord.uri()).unwrap();

    let sent = poll_cycle(&config, &reader, &backend).await.unwrap();

    assert_eq!(sent, 2);
    assert_eq!(
        sent_titles(&discord).await,
        vec!["fresh-older", "fresh-newest"]
    );
}

/// Nothing fresh: no session is opened, no message sent
#[tokio::test]
async fn test_poll_cycle_all_stale() {
    let now = Utc::now();
    let items: Vec<RssItem> = (0..10)
        .map(|i| {
            RssItem::new(
                &format!("stale{i}"),
                "body",
                Some(now - chrono::Duration::hours(1 + i)),
            )
        })
        .collect();

    let feed_server = mock_feed(rss_feed("Feed", &items)).await;
    let discord = MockServer::start().await;

    let config = config(&feed_server);
    let reader = FeedReader::new(config.request_timeout).unwrap();
    let backend =
        DiscordClient::with_base_url("test-token", config.request_timeout, discord.uri()).unwrap();

    let sent = poll_cycle(&config, &reader, &backend).await.unwrap();

    assert_eq!(sent, 0);
    assert!(discord.received_requests().await.unwrap().is_empty());
}

/// Items without publish dates are never considered fresh
#[tokio::test]
async fn test_poll_cycle_drops_undated_items() {
    let items: Vec<RssItem> = (0..10)
        .map(|i| RssItem::new(&format!("undated{i}"), "body", None))
        .collect();

    let feed_server = mock_feed(rss_feed("Feed", &items)).await;
    let discord = MockServer::start().await;

    let config = config(&feed_server);
    let reader = FeedReader::new(config.request_timeout).unwrap();
    let backend =
        DiscordClient::with_base_url("test-token", config.request_timeout, discord.uri()).unwrap();

    let sent = poll_cycle(&config, &reader, &backend).await.unwrap();

    assert_eq!(sent, 0);
}

/// One-shot backfill bypasses the freshness filter and delivers
/// everything, oldest first
#[tokio::test]
async fn test_notify_last_n_bypasses_filter() {
    let now = Utc::now();
    let items = vec![
        RssItem::new("new", "body", Some(now - chrono::Duration::minutes(5))),
        RssItem::new("old", "body", Some(now - chrono::Duration::days(30))),
        RssItem::new("ancient", "body", None),
    ];

    let feed_server = mock_feed(rss_feed("Feed", &items)).await;
    let discord = mock_discord().await;

    let config = config(&feed_server);
    let reader = FeedReader::new(config.request_timeout).unwrap();
    let backend =
        DiscordClient::with_base_url("test-token", config.request_timeout, discord.uri()).unwrap();

    let sent = notify_last_n(&config, &reader, &backend, 3).await.unwrap();

    assert_eq!(sent, 3);
    assert_eq!(sent_titles(&discord).await, vec!["ancient", "old", "new"]);
}

/// Requesting more items than the feed holds fails before any send
#[tokio::test]
async fn test_notify_last_n_insufficient_items() {
    let now = Utc::now();
    let items = vec![
        RssItem::new("a", "body", Some(now)),
        RssItem::new("b", "body", Some(now)),
        RssItem::new("c", "body", Some(now)),
    ];

    let feed_server = mock_feed(rss_feed("Feed", &items)).await;
    let discord = MockServer::start().await;

    let config = config(&feed_server);
    let reader = FeedReader::new(config.request_timeout).unwrap();
    let backend =
        DiscordClient::with_base_url("test-token", config.request_timeout, discord.uri()).unwrap();

    let err = notify_last_n(&config, &reader, &backend, 5)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Fetch(FetchError::InsufficientItems {
            wanted: 5,
            available: 3
        })
    ));
    assert!(discord.received_requests().await.unwrap().is_empty());
}

/// A dead feed fails the cycle with a fetch error, not a crash
#[tokio::test]
async fn test_poll_cycle_feed_unreachable() {
    let feed_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&feed_server)
        .await;
    let discord = MockServer::start().await;

    let config = config(&feed_server);
    let reader = FeedReader::new(config.request_timeout).unwrap();
    let backend =
        DiscordClient::with_base_url("test-token", config.request_timeout, discord.uri()).unwrap();

    let err = poll_cycle(&config, &reader, &backend).await.unwrap_err();

    assert!(matches!(err, Error::Fetch(FetchError::Status(503))));
    assert!(discord.received_requests().await.unwrap().is_empty());
}
