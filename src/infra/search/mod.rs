//! Search engine client implementations.

pub mod opensearch;

pub use opensearch::{
    DEFAULT_INDEX, OpenSearchClient, SearchClientConfig, parse_search_hits, specialty_match_query,
};
