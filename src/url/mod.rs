//! URL handling module
//!
//! This module provides the normalized URL identity used for dedup and
//! per-domain queueing, domain extraction, and anchor href resolution.

mod domain;
mod normalize;
mod resolve;

pub use domain::domain_of;
pub use normalize::{fetch_url, normalize_url};
pub use resolve::resolve_link;
