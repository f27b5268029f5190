//! Marketplace locales for the Product Advertising API
//!
//! Each marketplace is served from its own host and signed for a fixed AWS
//! region.

/// A catalog marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    /// Short domain code used in configuration (e.g. "JP")
    pub code: &'static str,
    /// API host
    pub host: &'static str,
    /// AWS region used when signing requests
    pub region: &'static str,
    /// Marketplace name sent with every request
    pub marketplace: &'static str,
}

/// All supported marketplaces
pub static LOCALES: [Locale; 12] = [
    Locale {
        code: "AU",
        host: "webservices.amazon.com.au",
        region: "us-west-2",
        marketplace: "www.amazon.com.au",
    },
    Locale {
        code: "BR",
        host: "webservices.amazon.com.br",
        region: "us-east-1",
        marketplace: "www.amazon.com.br",
    },
    Locale {
        code: "CA",
        host: "webservices.amazon.ca",
        region: "us-east-1",
        marketplace: "www.amazon.ca",
    },
    Locale {
        code: "DE",
        host: "webservices.amazon.de",
        region: "eu-west-1",
        marketplace: "www.amazon.de",
    },
    Locale {
        code: "ES",
        host: "webservices.amazon.es",
        region: "eu-west-1",
        marketplace: "www.amazon.es",
    },
    Locale {
        code: "FR",
        host: "webservices.amazon.fr",
        region: "eu-west-1",
        marketplace: "www.amazon.fr",
    },
    Locale {
        code: "IN",
        host: "webservices.amazon.in",
        region: "eu-west-1",
        marketplace: "www.amazon.in",
    },
    Locale {
        code: "IT",
        host: "webservices.amazon.it",
        region: "eu-west-1",
        marketplace: "www.amazon.it",
    },
    Locale {
        code: "JP",
        host: "webservices.amazon.co.jp",
        region: "us-west-2",
        marketplace: "www.amazon.co.jp",
    },
    Locale {
        code: "MX",
        host: "webservices.amazon.com.mx",
        region: "us-east-1",
        marketplace: "www.amazon.com.mx",
    },
    Locale {
        code: "UK",
        host: "webservices.amazon.co.uk",
        region: "eu-west-1",
        marketplace: "www.amazon.co.uk",
    },
    Locale {
        code: "US",
        host: "webservices.amazon.com",
        region: "us-east-1",
        marketplace: "www.amazon.com",
    },
];

/// Looks up a marketplace by its domain code, case-insensitively
pub fn locale_for(code: &str) -> Option<&'static Locale> {
    let code = code.trim();
    LOCALES.iter().find(|l| l.code.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_locale_for_jp() {
        let locale = locale_for("JP").expect("JP should be supported");
        assert_eq!(locale.host, "webservices.amazon.co.jp");
        assert_eq!(locale.region, "us-west-2");
        assert_eq!(locale.marketplace, "www.amazon.co.jp");
    }

    #[test]
    fn test_locale_for_is_case_insensitive() {
        assert_eq!(locale_for("us"), locale_for("US"));
        assert!(locale_for(" uk ").is_some());
    }

    #[test]
    fn test_locale_for_unknown_code() {
        assert!(locale_for("XX").is_none());
        assert!(locale_for("").is_none());
    }

    #[test]
    fn test_locale_codes_are_unique() {
        let codes: HashSet<_> = LOCALES.iter().map(|l| l.code).collect();
        assert_eq!(codes.len(), LOCALES.len());
    }

    #[test]
    fn test_every_host_is_a_webservices_host() {
        for locale in LOCALES.iter() {
            assert!(
                locale.host.starts_with("webservices.amazon."),
                "{} has unexpected host {}",
                locale.code,
                locale.host
            );
        }
    }
}
