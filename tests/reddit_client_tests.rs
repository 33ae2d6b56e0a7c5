//! The Reddit adapter against a local HTTP stub.

mod support;

use std::sync::Arc;

use modsh::adapter::outbound::reddit::{Credentials, RedditClient, RedditConfig};
use modsh::domain::{FilterSpec, Fullname, Limit, ListingKind, ListingRequest};
use modsh::error::{Error, RemoteError};
use modsh::infrastructure::bootstrap;
use modsh::infrastructure::config::Config;
use modsh::port::ContentClient;

use support::http::{HttpStub, Recorded};

const TOKEN_PATH: &str = "/api/v1/access_token";

fn credentials() -> Credentials {
    Credentials {
        username: "modbot".into(),
        password: "hunter2".into(),
        client_id: "id".into(),
        client_secret: "secret".into(),
    }
}

fn config(stub: &HttpStub) -> Config {
    Config {
        reddit: RedditConfig {
            api_url: stub.url(),
            auth_url: format!("{}{TOKEN_PATH}", stub.url()),
            ..RedditConfig::default()
        },
        ..Config::default()
    }
}

fn client(stub: &HttpStub) -> RedditClient {
    RedditClient::from_config(&config(stub).reddit, credentials())
}

fn post_thing(id: &str) -> String {
    format!(
        concat!(
            r#"{{"kind":"t3","data":{{"name":"t3_{id}","title":"post {id}","#,
            r#""author":"alice","subreddit":"rust","domain":"example.com","#,
            r#""created_utc":1700000000.0}}}}"#,
        ),
        id = id
    )
}

fn listing(children: &[String], after: Option<&str>) -> String {
    let after = after.map_or_else(|| "null".to_string(), |a| format!("\"{a}\""));
    format!(
        r#"{{"kind":"Listing","data":{{"children":[{}],"after":{after}}}}}"#,
        children.join(",")
    )
}

fn reddit(request: &Recorded) -> (u16, String) {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", TOKEN_PATH) => (
            200,
            r#"{"access_token":"tok","token_type":"bearer","expires_in":3600}"#.into(),
        ),
        ("GET", "/api/v1/me") => (
            200,
            r#"{"name":"modbot","id":"m1","link_karma":1,"comment_karma":2}"#.into(),
        ),
        ("GET", "/r/rust/about") => (
            200,
            concat!(
                r#"{"kind":"t5","data":{"name":"t5_2s7lj","display_name":"rust","#,
                r#""title":"Rust","subscribers":10}}"#,
            )
            .into(),
        ),
        ("GET", "/r/rust/about/modqueue") => {
            if request.query.contains("after=t3_b") {
                let more = r#"{"kind":"more","data":{"count":2,"children":["d","e"]}}"#;
                (200, listing(&[post_thing("c"), more.to_string()], None))
            } else {
                (200, listing(&[post_thing("a"), post_thing("b")], Some("t3_b")))
            }
        }
        ("POST", "/api/approve") => (200, "{}".into()),
        ("POST", "/api/remove") => (
            200,
            r#"{"json":{"errors":[["NO_THING","no such thing","id"]]}}"#.into(),
        ),
        ("GET", "/api/info") => (500, "boom".into()),
        _ => (404, r#"{"message":"Not Found","error":404}"#.into()),
    }
}

#[tokio::test]
async fn token_is_fetched_once_and_sent_as_bearer() {
    let stub = HttpStub::start(reddit).await;
    let client = client(&stub);

    let me = client.me().await.expect("me");
    client.me().await.expect("me again");

    assert_eq!(me.name.as_str(), "modbot");
    let token_requests = stub.requests_to(TOKEN_PATH);
    assert_eq!(token_requests.len(), 1);
    assert!(token_requests[0].body.contains("grant_type=password"));
    assert!(token_requests[0]
        .header("authorization")
        .is_some_and(|h| h.starts_with("Basic ")));

    let calls = stub.requests_to("/api/v1/me");
    assert_eq!(calls.len(), 2);
    for call in calls {
        assert_eq!(call.header("authorization"), Some("Bearer tok"));
        assert!(call.query.contains("raw_json=1"), "{}", call.query);
    }
}

#[tokio::test]
async fn listing_follows_the_after_cursor() {
    let stub = HttpStub::start(reddit).await;
    let client: Arc<dyn ContentClient> = Arc::new(client(&stub));
    let session = bootstrap::connect(client, &config(&stub))
        .await
        .expect("session");
    let request = ListingRequest::new(
        ListingKind::ModQueue,
        Some("rust".parse().expect("name")),
        FilterSpec::default(),
        Limit::Unlimited,
    )
    .expect("request");

    let items = session.listing(&request).await.expect("listing");

    let names: Vec<&str> = items.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["t3_a", "t3_b", "t3_c"]);
    let pages = stub.requests_to("/r/rust/about/modqueue");
    assert_eq!(pages.len(), 2);
    assert!(pages[0].query.contains("limit=100"), "{}", pages[0].query);
    assert!(!pages[0].query.contains("after="));
    assert!(pages[1].query.contains("after=t3_b"), "{}", pages[1].query);
}

#[tokio::test]
async fn missing_subreddit_is_not_found() {
    let stub = HttpStub::start(reddit).await;
    let err = client(&stub)
        .subreddit(&"nope".parse().expect("name"))
        .await
        .expect_err("no such subreddit");
    match err.root() {
        Error::Remote(RemoteError::NotFound { kind, name }) => {
            assert_eq!(*kind, "subreddit");
            assert_eq!(name, "nope");
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_carry_status_and_body() {
    let stub = HttpStub::start(reddit).await;
    let err = client(&stub)
        .post(&Fullname::new("t3_x"))
        .await
        .expect_err("server fails");
    match err.root() {
        Error::Remote(RemoteError::Status { status, message }) => {
            assert_eq!(*status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn mutations_post_forms_and_surface_api_errors() {
    let stub = HttpStub::start(reddit).await;
    let client = client(&stub);

    client.approve(&Fullname::new("t3_x")).await.expect("approve");
    let approve = &stub.requests_to("/api/approve")[0];
    assert!(approve.body.contains("id=t3_x"), "{}", approve.body);
    assert!(approve.body.contains("api_type=json"), "{}", approve.body);

    let err = client
        .remove(&Fullname::new("t3_x"), false)
        .await
        .expect_err("api error");
    match err.root() {
        Error::Remote(RemoteError::Api(msg)) => assert_eq!(msg, "NO_THING: no such thing"),
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_credentials_fail_authentication() {
    let stub = HttpStub::start(|request: &Recorded| {
        if request.path == TOKEN_PATH {
            (401, r#"{"error":"invalid_grant"}"#.into())
        } else {
            (200, "{}".into())
        }
    })
    .await;

    let err = client(&stub).me().await.expect_err("no token");
    assert!(matches!(err.root(), Error::Remote(RemoteError::AuthFailed(_))), "{err}");
    assert!(stub.requests_to("/api/v1/me").is_empty());
}
