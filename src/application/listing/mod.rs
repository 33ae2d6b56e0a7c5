//! Paginated, filtered listing retrieval.
//!
//! - [`fetcher`]: lazy page-by-page stream up to a limit
//! - [`filter`]: client-side narrowing by a [`FilterSpec`](crate::domain::FilterSpec)
//! - [`service`]: target resolution plus fetch-and-filter

pub mod fetcher;
pub mod filter;
pub mod service;

pub use fetcher::{EntityStream, ListingFetcher};
pub use service::ListingService;
