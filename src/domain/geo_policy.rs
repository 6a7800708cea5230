//! Country allow-list applied before any click is claimed.

use std::collections::HashMap;

/// Countries accepted when `ALLOWED_COUNTRIES` is not set, as ISO codes and
/// English names.
pub const DEFAULT_ALLOWED_COUNTRIES: &[&str] = &[
    "US",
    "CA",
    "GB",
    "AU",
    "IN",
    "United States",
    "Canada",
    "United Kingdom",
    "Australia",
    "India",
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GeoPolicyError {
    #[error("empty country entry at position {0}")]
    EmptyEntry(usize),
    #[error("policy allows no countries")]
    NothingAllowed,
}

/// Table of `country → allowed` rules.
///
/// Keys are codes or names, matched case-insensitively after trimming.
/// Countries absent from the table are not allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoPolicy {
    rules: HashMap<String, bool>,
}

impl GeoPolicy {
    /// Builds a policy from explicit rules. Later rules for the same country
    /// override earlier ones.
    pub fn from_rules<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .map(|(country, allowed)| (normalize(country.as_ref()), allowed))
            .collect();

        Self { rules }
    }

    /// Builds a policy allowing exactly the given countries.
    pub fn allow_only<I, S>(countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_rules(countries.into_iter().map(|c| (c, true)))
    }

    /// Parses a comma separated list such as `US, CA, United Kingdom, !FR`.
    ///
    /// A leading `!` records an explicit deny.
    ///
    /// # Errors
    ///
    /// Returns [`GeoPolicyError`] for empty entries or a list that allows
    /// nothing.
    pub fn parse(list: &str) -> Result<Self, GeoPolicyError> {
        let mut rules = Vec::new();

        for (idx, raw) in list.split(',').enumerate() {
            let entry = raw.trim();
            let (country, allowed) = match entry.strip_prefix('!') {
                Some(denied) => (denied.trim(), false),
                None => (entry, true),
            };

            if country.is_empty() {
                return Err(GeoPolicyError::EmptyEntry(idx));
            }

            rules.push((country.to_string(), allowed));
        }

        let policy = Self::from_rules(rules);
        if policy.allowed_count() == 0 {
            return Err(GeoPolicyError::NothingAllowed);
        }

        Ok(policy)
    }

    pub fn is_allowed(&self, country: &str) -> bool {
        self.rules
            .get(&normalize(country))
            .copied()
            .unwrap_or(false)
    }

    pub fn allowed_count(&self) -> usize {
        self.rules.values().filter(|allowed| **allowed).count()
    }
}

impl Default for GeoPolicy {
    fn default() -> Self {
        Self::allow_only(DEFAULT_ALLOWED_COUNTRIES)
    }
}

fn normalize(country: &str) -> String {
    country.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = GeoPolicy::default();

        assert!(policy.is_allowed("United States"));
        assert!(policy.is_allowed("us"));
        assert!(policy.is_allowed("  Canada "));
        assert!(policy.is_allowed("GB"));
        assert!(!policy.is_allowed("France"));
        assert!(!policy.is_allowed(""));
    }

    #[test]
    fn test_parse_with_denies() {
        let policy = GeoPolicy::parse("US, ca ,!FR, Germany").unwrap();

        assert!(policy.is_allowed("US"));
        assert!(policy.is_allowed("CA"));
        assert!(policy.is_allowed("germany"));
        assert!(!policy.is_allowed("FR"));
        assert_eq!(policy.allowed_count(), 3);
    }

    #[test]
    fn test_later_rule_wins() {
        let policy = GeoPolicy::parse("US,!us").unwrap_err();
        assert_eq!(policy, GeoPolicyError::NothingAllowed);

        let policy = GeoPolicy::parse("!US,US").unwrap();
        assert!(policy.is_allowed("US"));
    }

    #[test]
    fn test_parse_rejects_empty_entries() {
        assert_eq!(
            GeoPolicy::parse("US,,CA").unwrap_err(),
            GeoPolicyError::EmptyEntry(1)
        );
        assert_eq!(GeoPolicy::parse("!").unwrap_err(), GeoPolicyError::EmptyEntry(0));
    }
}
