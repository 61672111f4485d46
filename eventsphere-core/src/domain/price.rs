use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:\.\d+)?").expect("price pattern is valid")
});

/// A ticket price as shown to users plus the numeric amount extracted from it.
///
/// Display strings like "$299" or "Free" are parsed exactly once, when the
/// record enters the catalog or a stored collection. A string with no digits
/// parses to an amount of zero; that fallback is logged, never surfaced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "String", into = "String")]
pub struct PriceTag {
    pub amount: f64,
    pub display: String,
}

impl PriceTag {
    pub fn parse(display: &str) -> Self {
        let amount = match LEADING_NUMBER.find(display) {
            Some(m) => m.as_str().parse::<f64>().unwrap_or_else(|_| {
                warn!(price = display, "unparseable numeric portion, treating as 0");
                0.0
            }),
            None => {
                if !display.trim().eq_ignore_ascii_case("free") {
                    warn!(price = display, "no numeric portion in price, treating as 0");
                }
                0.0
            }
        };
        Self {
            amount,
            display: display.to_string(),
        }
    }

    pub fn is_free(&self) -> bool {
        self.amount == 0.0
    }
}

impl From<String> for PriceTag {
    fn from(display: String) -> Self {
        PriceTag::parse(&display)
    }
}

impl From<PriceTag> for String {
    fn from(tag: PriceTag) -> Self {
        tag.display
    }
}

impl std::fmt::Display for PriceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dollar_amount() {
        let tag = PriceTag::parse("$299");
        assert_eq!(tag.amount, 299.0);
        assert_eq!(tag.display, "$299");
        assert!(!tag.is_free());
    }

    #[test]
    fn test_parse_decimal_amount() {
        assert_eq!(PriceTag::parse("$49.50").amount, 49.5);
    }

    #[test]
    fn test_parse_free_and_malformed_fall_back_to_zero() {
        assert!(PriceTag::parse("Free").is_free());
        assert!(PriceTag::parse("TBD").is_free());
        assert_eq!(PriceTag::parse("TBD").display, "TBD");
    }

    #[test]
    fn test_serde_round_trips_the_display_string() {
        let tag: PriceTag = serde_json::from_str("\"$89\"").unwrap();
        assert_eq!(tag.amount, 89.0);
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"$89\"");
    }
}
