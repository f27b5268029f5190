//! Catalog response verbosity tiers
//!
//! A response group controls how much detail is requested from the catalog
//! for each lookup. Deployments pick one tier at startup.

use std::fmt;

/// Verbosity tier for catalog lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseGroup {
    /// Title and detail page only
    Small,
    /// Everything except contributors and the larger images
    Medium,
    /// Every field the normalized record carries
    #[default]
    Large,
}

impl ResponseGroup {
    /// Parses a tier name, case-insensitively
    ///
    /// Returns `None` if the input doesn't match any tier.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<ResponseGroup> {
        match s.trim().to_lowercase().as_str() {
            "small" => Some(ResponseGroup::Small),
            "medium" => Some(ResponseGroup::Medium),
            "large" => Some(ResponseGroup::Large),
            _ => None,
        }
    }

    /// Returns the canonical display name of the tier
    pub fn name(&self) -> &'static str {
        match self {
            ResponseGroup::Small => "Small",
            ResponseGroup::Medium => "Medium",
            ResponseGroup::Large => "Large",
        }
    }
}

impl fmt::Display for ResponseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(ResponseGroup::from_str("Large"), Some(ResponseGroup::Large));
        assert_eq!(ResponseGroup::from_str("large"), Some(ResponseGroup::Large));
        assert_eq!(ResponseGroup::from_str("MEDIUM"), Some(ResponseGroup::Medium));
        assert_eq!(ResponseGroup::from_str(" small "), Some(ResponseGroup::Small));
    }

    #[test]
    fn test_from_str_rejects_unknown_tiers() {
        assert_eq!(ResponseGroup::from_str("huge"), None);
        assert_eq!(ResponseGroup::from_str(""), None);
    }

    #[test]
    fn test_default_is_large() {
        assert_eq!(ResponseGroup::default(), ResponseGroup::Large);
    }

    #[test]
    fn test_display_uses_canonical_name() {
        assert_eq!(ResponseGroup::Medium.to_string(), "Medium");
    }
}
