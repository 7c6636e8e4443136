//! Robots.txt handling module
//!
//! This module turns the outcome of a robots.txt fetch into the crawl
//! permissions of a site.

mod parser;

pub use parser::RobotsRules;

/// Outcome of requesting `/robots.txt` for a domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsFetch {
    /// The file was served; its body is parsed for rules
    Body(String),

    /// The server explicitly refused access (HTTP 403)
    Forbidden,

    /// Any other failure: missing file, server error, network error
    Unavailable,
}

/// Derives the rules for a site from its robots.txt fetch outcome
///
/// # Returns
///
/// * `Some(RobotsRules)` - Parsed rules, or allow-all when the file was unavailable
/// * `None` - Access was forbidden; the whole domain must be excluded
pub fn rules_from_fetch(fetch: RobotsFetch) -> Option<RobotsRules> {
    match fetch {
        RobotsFetch::Body(content) => Some(RobotsRules::from_content(&content)),
        RobotsFetch::Unavailable => Some(RobotsRules::allow_all()),
        RobotsFetch::Forbidden => None,
    }
}
