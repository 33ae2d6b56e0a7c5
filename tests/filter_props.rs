use std::sync::Arc;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

use modsh::application::listing::{filter, EntityStream, ListingFetcher};
use modsh::domain::{Entity, FilterSpec, Limit, ListingKind, ListingQuery};
use modsh::testkit::client::ScriptedClient;
use modsh::testkit::domain::{comment, post};

const AUTHORS: [&str; 3] = ["alice", "bob", "carol"];
const DOMAINS: [&str; 2] = ["example.com", "other.org"];

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

fn source(items: Vec<Entity>) -> EntityStream {
    stream::iter(items.into_iter().map(Ok)).boxed()
}

fn run_filter(items: Vec<Entity>, spec: &FilterSpec) -> Vec<Entity> {
    runtime()
        .block_on(filter::apply(source(items), spec).try_collect())
        .expect("no errors in source")
}

/// Posts and comments with authors and domains drawn from small pools so
/// every filter value is likely to match something.
fn entities() -> impl Strategy<Value = Vec<Entity>> {
    prop::collection::vec((any::<bool>(), 0..AUTHORS.len(), 0..DOMAINS.len()), 0..30).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (is_post, author, domain))| {
                    if is_post {
                        post(&format!("p{i}"), AUTHORS[author], DOMAINS[domain])
                    } else {
                        comment(&format!("c{i}"), AUTHORS[author])
                    }
                })
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn empty_spec_returns_input_unchanged(items in entities()) {
        let out = run_filter(items.clone(), &FilterSpec::default());
        prop_assert_eq!(out, items);
    }

    #[test]
    fn author_filter_is_exact_subsequence(
        items in entities(),
        pick in prop::sample::subsequence(AUTHORS.to_vec(), 1..=2),
    ) {
        let spec = FilterSpec::default().with_authors(pick.iter().copied());
        let expected: Vec<Entity> = items
            .iter()
            .filter(|e| e.author().is_some_and(|a| pick.contains(&a)))
            .cloned()
            .collect();
        prop_assert_eq!(run_filter(items, &spec), expected);
    }

    #[test]
    fn domain_filter_keeps_matching_posts_only(items in entities(), domain in 0..DOMAINS.len()) {
        let spec = FilterSpec::default().with_domain(DOMAINS[domain]);
        let expected: Vec<Entity> = items
            .iter()
            .filter(|e| matches!(e, Entity::Post(p) if p.domain == DOMAINS[domain]))
            .cloned()
            .collect();
        prop_assert_eq!(run_filter(items, &spec), expected);
    }

    #[test]
    fn fetch_respects_limit(total in 0usize..40, page_size in 1usize..8, raw_limit in -3i64..50) {
        let items: Vec<Entity> = (0..total)
            .map(|i| post(&format!("p{i}"), "alice", "example.com"))
            .collect();
        let client = Arc::new(ScriptedClient::new().with_listing(ListingKind::Unmoderated, items));
        let fetcher = ListingFetcher::new(client, page_size);
        let subreddit = "rust".parse().expect("name");
        let query = ListingQuery::new(ListingKind::Unmoderated, Some(subreddit));
        let limit = Limit::from_raw(raw_limit);

        let fetched: Vec<Entity> = runtime()
            .block_on(fetcher.fetch(query, limit, CancellationToken::new()).try_collect())
            .expect("scripted pages succeed");

        let expected = match limit {
            Limit::Unlimited => total,
            Limit::AtMost(max) => max.min(total),
        };
        prop_assert_eq!(fetched.len(), expected);
    }
}
