use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::error::SphereError;

mod price;

pub use price::PriceTag;

/// Lower bound for a cart line quantity; decrements clamp here.
pub const MIN_QUANTITY: u32 = 1;
/// Upper bound for a cart line quantity; increments clamp here.
pub const MAX_QUANTITY: u32 = 10;

/// Immutable catalog entry. Loaded once at session start, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: u32,
    pub name: String,
    pub date: NaiveDate,
    pub time: String,
    pub venue: String,
    pub location: String,
    pub short_description: String,
    pub full_description: String,
    pub image_url: String,
    pub category: String,
    pub price: PriceTag,
    pub capacity: u32,
    pub registered_count: u32,
    pub organizer: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub map_url: String,
}

impl EventRecord {
    /// Registration progress as a rounded percentage of capacity.
    pub fn percent_full(&self) -> u32 {
        if self.capacity == 0 {
            return 100;
        }
        ((self.registered_count as f64 / self.capacity as f64) * 100.0).round() as u32
    }

    pub fn spots_remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.registered_count)
    }

    pub fn is_sold_out(&self) -> bool {
        self.registered_count >= self.capacity
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: u32,
    pub name: String,
    pub rating: u8,
    pub comment: String,
    pub date: NaiveDate,
    pub avatar_url: String,
}

/// A catalog snapshot plus ticket count. At most one entry per event id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEntry {
    pub event: EventRecord,
    pub quantity: u32,
}

impl CartEntry {
    pub fn new(event: EventRecord) -> Self {
        Self {
            event,
            quantity: MIN_QUANTITY,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.event.price.amount * self.quantity as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    pub logged_in: bool,
}

/// Category sentinel meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Parameters for one derived view of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub search: String,
    pub category: String,
    pub price_bucket: PriceBucket,
    pub sort_key: SortKey,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
            price_bucket: PriceBucket::All,
            sort_key: SortKey::Date,
        }
    }
}

impl QueryParams {
    /// Builds params from a deep-link query string such as
    /// `search=jazz%20night&category=Music`. Unknown keys are ignored.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "search" => params.search = percent_decode(value),
                "category" => params.category = percent_decode(value),
                _ => {}
            }
        }
        params
    }
}

fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                if let (Some(hi), Some(lo)) = (
                    bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                    bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
                ) {
                    out.push((hi * 16 + lo) as u8);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Coarse price range for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBucket {
    All,
    Free,
    Under50,
    FiftyToHundred,
    OverHundred,
}

impl PriceBucket {
    /// Whether a numeric ticket price falls inside this bucket.
    pub fn matches(&self, amount: f64) -> bool {
        match self {
            PriceBucket::All => true,
            PriceBucket::Free => amount == 0.0,
            PriceBucket::Under50 => amount > 0.0 && amount < 50.0,
            PriceBucket::FiftyToHundred => (50.0..=100.0).contains(&amount),
            PriceBucket::OverHundred => amount > 100.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceBucket::All => "all",
            PriceBucket::Free => "free",
            PriceBucket::Under50 => "under50",
            PriceBucket::FiftyToHundred => "50to100",
            PriceBucket::OverHundred => "over100",
        }
    }
}

impl std::str::FromStr for PriceBucket {
    type Err = SphereError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PriceBucket::All),
            "free" => Ok(PriceBucket::Free),
            "under50" => Ok(PriceBucket::Under50),
            "50to100" => Ok(PriceBucket::FiftyToHundred),
            "over100" => Ok(PriceBucket::OverHundred),
            other => Err(SphereError::Invalid {
                what: "price bucket",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort order for a derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Name,
    Price,
    Popularity,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Popularity => "popularity",
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = SphereError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortKey::Date),
            "name" => Ok(SortKey::Name),
            "price" => Ok(SortKey::Price),
            "popularity" => Ok(SortKey::Popularity),
            other => Err(SphereError::Invalid {
                what: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixture used across the crate's unit tests.
#[cfg(test)]
pub(crate) fn test_event(id: u32, price: &str, registered: u32, capacity: u32) -> EventRecord {
    EventRecord {
        id,
        name: format!("Event {id}"),
        date: NaiveDate::from_ymd_opt(2025, 9, 15).unwrap(),
        time: "10:00 AM".to_string(),
        venue: "Test Hall".to_string(),
        location: "Testville, WA".to_string(),
        short_description: "A test event.".to_string(),
        full_description: "A longer description of a test event.".to_string(),
        image_url: "https://example.com/image.jpg".to_string(),
        category: "Technology".to_string(),
        price: PriceTag::parse(price),
        capacity,
        registered_count: registered,
        organizer: "Test Org".to_string(),
        tags: vec!["Testing".to_string()],
        rating: None,
        reviews: Vec::new(),
        map_url: "https://example.com/map".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(MIN_QUANTITY, 1);
        assert_eq!(MAX_QUANTITY, 10);
    }

    #[test]
    fn test_percent_full_rounds() {
        let event = test_event(1, "$10", 3247, 5000);
        assert_eq!(event.percent_full(), 65);
        assert_eq!(event.spots_remaining(), 1753);
        assert!(!event.is_sold_out());
    }

    #[test]
    fn test_price_bucket_boundaries() {
        assert!(PriceBucket::Free.matches(0.0));
        assert!(!PriceBucket::Free.matches(1.0));
        assert!(PriceBucket::Under50.matches(49.0));
        assert!(!PriceBucket::Under50.matches(0.0));
        assert!(!PriceBucket::Under50.matches(50.0));
        assert!(PriceBucket::FiftyToHundred.matches(50.0));
        assert!(PriceBucket::FiftyToHundred.matches(100.0));
        assert!(!PriceBucket::FiftyToHundred.matches(100.5));
        assert!(PriceBucket::OverHundred.matches(100.5));
        assert!(!PriceBucket::OverHundred.matches(100.0));
    }

    #[test]
    fn test_bucket_and_sort_key_parsing() {
        assert_eq!("50to100".parse::<PriceBucket>().unwrap(), PriceBucket::FiftyToHundred);
        assert_eq!("popularity".parse::<SortKey>().unwrap(), SortKey::Popularity);
        assert!("cheap".parse::<PriceBucket>().is_err());
        assert!("rating".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_query_params_from_query_string() {
        let params = QueryParams::from_query_string("?search=jazz%20night&category=Music&page=2");
        assert_eq!(params.search, "jazz night");
        assert_eq!(params.category, "Music");
        assert_eq!(params.price_bucket, PriceBucket::All);
        assert_eq!(params.sort_key, SortKey::Date);

        let params = QueryParams::from_query_string("search=live+music");
        assert_eq!(params.search, "live music");
    }
}
