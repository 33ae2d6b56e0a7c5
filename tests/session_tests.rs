use std::sync::atomic::Ordering;
use std::sync::Arc;

use modsh::application::moderation::ModerationAction;
use modsh::application::Session;
use modsh::domain::{
    Distinguish, Entity, FilterSpec, Fullname, KindFilter, Limit, ListingKind, ListingRequest,
    ModActionType,
};
use modsh::error::{Error, RemoteError};
use modsh::port::BanRequest;
use modsh::testkit::client::ScriptedClient;
use modsh::testkit::domain::{comment, message, mod_action, post, raw_comment, raw_post};

async fn session(client: Arc<ScriptedClient>) -> Session {
    Session::start(client, 2).await.expect("session starts")
}

fn names(items: &[Entity]) -> Vec<&str> {
    items.iter().map(Entity::name).collect()
}

#[tokio::test]
async fn author_and_domain_filters_combine() {
    let client = Arc::new(ScriptedClient::new().with_listing(
        ListingKind::Unmoderated,
        vec![
            post("a", "alice", "other.org"),
            post("b", "bob", "example.com"),
            post("c", "alice", "example.com"),
            comment("d", "alice"),
            post("e", "carol", "example.com"),
        ],
    ));
    let session = session(client).await;
    let request = ListingRequest::new(
        ListingKind::Unmoderated,
        Some("rust".parse().expect("name")),
        FilterSpec::default()
            .with_authors(["alice"])
            .with_domain("example.com"),
        Limit::Unlimited,
    )
    .expect("request");

    let items = session.listing(&request).await.expect("listing");
    assert_eq!(names(&items), vec!["t3_c"]);
}

#[tokio::test]
async fn limit_counts_fetched_items_before_filtering() {
    let client = Arc::new(ScriptedClient::new().with_listing(
        ListingKind::ModQueue,
        vec![
            post("a", "bob", "example.com"),
            post("b", "bob", "example.com"),
            post("c", "alice", "example.com"),
        ],
    ));
    let session = session(client).await;
    let request = ListingRequest::new(
        ListingKind::ModQueue,
        Some("rust".parse().expect("name")),
        FilterSpec::default().with_authors(["alice"]),
        Limit::AtMost(2),
    )
    .expect("request");

    assert!(session.listing(&request).await.expect("listing").is_empty());
}

#[tokio::test]
async fn modqueue_kind_is_sent_to_the_server() {
    let client = Arc::new(ScriptedClient::new().with_listing(
        ListingKind::ModQueue,
        vec![post("a", "bob", "example.com"), comment("b", "bob")],
    ));
    let session = session(client.clone()).await;
    let request = ListingRequest::new(
        ListingKind::ModQueue,
        Some("rust".parse().expect("name")),
        FilterSpec::default().with_kind(KindFilter::Comments),
        Limit::Unlimited,
    )
    .expect("request");

    let items = session.listing(&request).await.expect("listing");
    assert_eq!(names(&items), vec!["t1_b"]);
    assert_eq!(client.page_requests()[0].query.only, KindFilter::Comments);
}

#[tokio::test]
async fn modlog_filters_by_moderator_and_action() {
    let client = Arc::new(ScriptedClient::new().with_listing(
        ListingKind::ModLog,
        vec![
            mod_action("1", "mod_a", ModActionType::RemoveLink),
            mod_action("2", "mod_b", ModActionType::RemoveLink),
            mod_action("3", "mod_a", ModActionType::BanUser),
        ],
    ));
    let session = session(client).await;
    let request = ListingRequest::new(
        ListingKind::ModLog,
        Some("rust".parse().expect("name")),
        FilterSpec::default()
            .with_moderators(["mod_a"])
            .with_action(ModActionType::RemoveLink),
        Limit::Unlimited,
    )
    .expect("request");

    let items = session.listing(&request).await.expect("listing");
    assert_eq!(names(&items), vec!["ModAction_1"]);
}

#[tokio::test]
async fn unread_filter_drops_read_messages() {
    let client = Arc::new(ScriptedClient::new().with_listing(
        ListingKind::Inbox,
        vec![
            message("m1", "alice", true),
            message("m2", "bob", false),
            message("m3", "carol", true),
        ],
    ));
    let session = session(client).await;
    let request = ListingRequest::new(
        ListingKind::Inbox,
        None,
        FilterSpec::default().unread(),
        Limit::Unlimited,
    )
    .expect("request");

    let items = session.listing(&request).await.expect("listing");
    assert_eq!(names(&items), vec!["t4_m1", "t4_m3"]);
}

#[tokio::test]
async fn subreddit_resolution_is_cached_across_listings() {
    let client = Arc::new(ScriptedClient::new());
    let lookups = client.subreddit_calls();
    let session = session(client).await;
    let request = ListingRequest::new(
        ListingKind::Unmoderated,
        Some("/r/rust".parse().expect("name")),
        FilterSpec::default(),
        Limit::Unlimited,
    )
    .expect("request");

    session.listing(&request).await.expect("first");
    session.listing(&request).await.expect("second");
    assert_eq!(lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn foreground_failure_names_target_and_session_survives() {
    let client = Arc::new(
        ScriptedClient::new()
            .with_listing(ListingKind::ModQueue, vec![post("a", "bob", "example.com")])
            .fail_page(
                0,
                RemoteError::Status {
                    status: 503,
                    message: "busy".into(),
                },
            ),
    );
    let session = session(client).await;
    let request = ListingRequest::new(
        ListingKind::ModQueue,
        Some("rust".parse().expect("name")),
        FilterSpec::default(),
        Limit::Unlimited,
    )
    .expect("request");

    let err = session.listing(&request).await.expect_err("first page fails");
    assert!(err.to_string().starts_with("modqueue r/rust: "), "{err}");
    assert!(matches!(err.root(), Error::Remote(RemoteError::Status { status: 503, .. })));

    let items = session.listing(&request).await.expect("next attempt works");
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn moderation_dispatches_by_entity_kind() {
    let client = Arc::new(
        ScriptedClient::new()
            .with_post(raw_post("p1", "alice", "example.com"))
            .with_comment(raw_comment("c1", "bob")),
    );
    let session = session(client.clone()).await;
    let moderation = session.moderation();

    moderation
        .invoke(&Fullname::new("t3_p1"), &ModerationAction::Remove { spam: true })
        .await
        .expect("remove post");
    moderation
        .invoke(
            &Fullname::new("t1_c1"),
            &ModerationAction::Distinguish(Distinguish::Moderator),
        )
        .await
        .expect("distinguish comment");
    let err = moderation
        .invoke(
            &Fullname::new("t1_c1"),
            &ModerationAction::Flair {
                text: "x".into(),
                css_class: String::new(),
            },
        )
        .await
        .expect_err("comments have no flair");
    assert_eq!(err.to_string(), "cannot flair a comment");

    assert_eq!(
        client.actions(),
        vec!["spam t3_p1", "distinguish t1_c1 yes"]
    );
}

#[tokio::test]
async fn ban_and_unban_go_through_the_session() {
    let client = Arc::new(ScriptedClient::new());
    let session = session(client.clone()).await;
    let sub = "r/rust".parse().expect("name");
    let user = "u/troll".parse().expect("name");

    session
        .moderation()
        .ban(
            &sub,
            &BanRequest {
                user: "troll".parse().expect("name"),
                note: "spam".into(),
                reason: None,
                duration_days: None,
                message: None,
            },
        )
        .await
        .expect("ban");
    session.moderation().unban(&sub, &user).await.expect("unban");

    assert_eq!(
        client.actions(),
        vec!["ban r/rust u/troll permanent", "unban r/rust u/troll"]
    );
}
