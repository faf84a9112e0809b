//! Page retrieval and content extraction.
//!
//! Each URL goes through two steps:
//!
//! 1. **Fetching** ([`fetch`]): one HTTP GET returning the raw body bytes
//! 2. **Extraction** ([`extract`]): parse the body and classify it as tables,
//!    narrative text, or nothing usable for the requested output format

pub mod extract;
pub mod fetch;

pub use extract::extract;
pub use fetch::{Fetch, HttpFetcher};
