//! Robots.txt rule extraction and matching
//!
//! Only the `User-agent: *` block is honoured. Paths are matched as plain
//! substrings, and any matching `Allow` rule overrides any matching
//! `Disallow` rule regardless of length or order.

/// Allow/disallow rules for the wildcard user agent
///
/// An empty rule set permits everything; this is also what a site gets when
/// its robots.txt could not be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsRules {
    disallowed: Vec<String>,
    allowed: Vec<String>,
}

impl RobotsRules {
    /// Creates a permissive rule set that allows everything
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Parses robots.txt content, keeping rules from wildcard blocks only
    ///
    /// A `User-agent:` line opens a block; the block is ours when the agent
    /// value contains `*`. Directive names are matched case-insensitively,
    /// comments after `#` are ignored, and rule values are kept verbatim
    /// (trimmed) as substring fragments. Rules with an empty value are
    /// ignored, so a bare `Disallow:` leaves the site open.
    ///
    /// # Example
    ///
    /// ```
    /// use polite_frontier::robots::RobotsRules;
    ///
    /// let rules = RobotsRules::from_content("User-agent: *\nDisallow: /priv\nAllow: /priv/public");
    /// assert!(!rules.permits("/priv/x"));
    /// assert!(rules.permits("/priv/public/y"));
    /// assert!(rules.permits("/other"));
    /// ```
    pub fn from_content(content: &str) -> Self {
        let mut rules = Self::default();
        let mut in_wildcard_block = false;

        for line in content.lines() {
            let line = match line.split_once('#') {
                Some((before, _)) => before,
                None => line,
            }
            .trim();

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => in_wildcard_block = value.contains('*'),
                // An empty fragment would match every path
                _ if value.is_empty() || !in_wildcard_block => {}
                "allow" => rules.allowed.push(value.to_string()),
                "disallow" => rules.disallowed.push(value.to_string()),
                _ => {}
            }
        }

        rules
    }

    /// Checks whether a path may be crawled
    ///
    /// # Returns
    ///
    /// * `true` - No disallow fragment occurs in `path`, or one does and some
    ///   allow fragment occurs in `path` as well
    /// * `false` - A disallow fragment matches and no allow fragment does
    pub fn permits(&self, path: &str) -> bool {
        let disallowed = self
            .disallowed
            .iter()
            .any(|fragment| path.contains(fragment.as_str()));

        if !disallowed {
            return true;
        }

        self.allowed
            .iter()
            .any(|fragment| path.contains(fragment.as_str()))
    }

    /// Returns true if no rules were collected
    pub fn is_empty(&self) -> bool {
        self.disallowed.is_empty() && self.allowed.is_empty()
    }

    pub fn disallowed(&self) -> &[String] {
        &self.disallowed
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}
