//! Integration tests for the Bluesky listener using wiremock HTTP mocks.

use sigscout_listener::bluesky::{fetch_bluesky, BlueskyClient};
use sigscout_listener::{ListenerError, Pacing};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accessJwt": "jwt-token",
            "refreshJwt": "refresh-token",
            "handle": "scout.bsky.social",
            "did": "did:plc:abc123"
        })))
        .mount(server)
        .await;
}

fn post_json(rkey: &str, handle: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "uri": format!("at://did:plc:abc123/app.bsky.feed.post/{rkey}"),
        "author": { "handle": handle, "displayName": "Someone" },
        "record": { "text": text, "createdAt": "2025-11-02T10:15:00.000Z" },
        "likeCount": 3,
        "replyCount": 1,
        "repostCount": 0
    })
}

#[tokio::test]
async fn login_and_search_returns_normalized_posts() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.feed.searchPosts"))
        .and(query_param("q", "decentralized storage"))
        .and(query_param("sort", "latest"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "posts": [post_json("3aaa", "alice.bsky.social", "looking for decentralized storage")]
        })))
        .mount(&server)
        .await;

    let client = BlueskyClient::login_with_base_url("user", "pass", 30, &server.uri())
        .await
        .expect("login should succeed");

    let queries = vec!["decentralized storage".to_string()];
    let posts = fetch_bluesky(&client, &queries, 25, "en", Pacing::none()).await;

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post_id, "3aaa");
    assert_eq!(
        posts[0].url,
        "https://bsky.app/profile/alice.bsky.social/post/3aaa"
    );
    assert_eq!(posts[0].matched_query, "decentralized storage");
}

#[tokio::test]
async fn overlapping_queries_deduplicate_by_post_id() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.feed.searchPosts"))
        .and(query_param("q", "first"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "posts": [
                post_json("3aaa", "alice.bsky.social", "one"),
                post_json("3bbb", "bob.bsky.social", "two")
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.feed.searchPosts"))
        .and(query_param("q", "second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "posts": [
                post_json("3bbb", "bob.bsky.social", "two"),
                post_json("3ccc", "carol.bsky.social", "three")
            ]
        })))
        .mount(&server)
        .await;

    let client = BlueskyClient::login_with_base_url("user", "pass", 30, &server.uri())
        .await
        .expect("login should succeed");

    let queries = vec!["first".to_string(), "second".to_string()];
    let posts = fetch_bluesky(&client, &queries, 25, "en", Pacing::none()).await;

    let ids: Vec<&str> = posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(ids, vec!["3aaa", "3bbb", "3ccc"], "3bbb appears exactly once");
    // The first occurrence's matched query wins.
    assert_eq!(posts[1].matched_query, "first");
}

#[tokio::test]
async fn failed_query_is_skipped_not_fatal() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.feed.searchPosts"))
        .and(query_param("q", "broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.feed.searchPosts"))
        .and(query_param("q", "working"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "posts": [post_json("3ddd", "dana.bsky.social", "still here")]
        })))
        .mount(&server)
        .await;

    let client = BlueskyClient::login_with_base_url("user", "pass", 30, &server.uri())
        .await
        .expect("login should succeed");

    let queries = vec!["broken".to_string(), "working".to_string()];
    let posts = fetch_bluesky(&client, &queries, 25, "en", Pacing::none()).await;

    assert_eq!(posts.len(), 1, "failing query must not abort the loop");
    assert_eq!(posts[0].post_id, "3ddd");
}

#[tokio::test]
async fn rejected_credentials_surface_as_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "AuthenticationRequired",
            "message": "Invalid identifier or password"
        })))
        .mount(&server)
        .await;

    let result = BlueskyClient::login_with_base_url("user", "wrong", 30, &server.uri()).await;
    assert!(
        matches!(result, Err(ListenerError::Auth { platform: "bluesky", .. })),
        "expected Auth error"
    );
}

#[tokio::test]
async fn mixed_shapes_in_one_page_all_normalize() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.feed.searchPosts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "posts": [
                post_json("3aaa", "alice.bsky.social", "typed shape"),
                // Generic mapping shape: no record object, counts missing.
                {
                    "uri": "at://did:plc:xyz/app.bsky.feed.post/3eee",
                    "author": { "handle": "erin.bsky.social" }
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = BlueskyClient::login_with_base_url("user", "pass", 30, &server.uri())
        .await
        .expect("login should succeed");

    let queries = vec!["anything".to_string()];
    let posts = fetch_bluesky(&client, &queries, 25, "en", Pacing::none()).await;

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1].post_id, "3eee");
    assert_eq!(posts[1].text, "", "missing text defaults to empty");
    assert_eq!(posts[1].likes, 0, "missing counts default to zero");
}
