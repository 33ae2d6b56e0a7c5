//! Client-side filtering of entity streams.

use futures_util::future;
use futures_util::stream::{StreamExt, TryStreamExt};

use super::fetcher::EntityStream;
use crate::domain::FilterSpec;

/// Narrow `entities` to the items `spec` matches, preserving order.
///
/// An empty spec returns the input stream untouched. Errors pass through
/// unfiltered so a failing fetch still surfaces to the consumer.
#[must_use]
pub fn apply(entities: EntityStream, spec: &FilterSpec) -> EntityStream {
    if spec.is_empty() {
        return entities;
    }
    let spec = spec.clone();
    entities
        .try_filter(move |entity| future::ready(spec.matches(entity)))
        .boxed()
}
