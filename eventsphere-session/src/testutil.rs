use chrono::NaiveDate;
use eventsphere_core::{EventRecord, PriceTag};

/// Catalog-shaped fixture shared by the crate's unit tests.
pub(crate) fn test_event(id: u32, price: &str) -> EventRecord {
    EventRecord {
        id,
        name: format!("Event {id}"),
        date: NaiveDate::from_ymd_opt(2025, 9, 15).unwrap(),
        time: "10:00 AM".to_string(),
        venue: "Test Hall".to_string(),
        location: "Testville, WA".to_string(),
        short_description: "A test event.".to_string(),
        full_description: "A longer test description.".to_string(),
        image_url: "https://example.com/image.jpg".to_string(),
        category: "Technology".to_string(),
        price: PriceTag::parse(price),
        capacity: 100,
        registered_count: 10,
        organizer: "Test Org".to_string(),
        tags: vec!["Testing".to_string()],
        rating: None,
        reviews: Vec::new(),
        map_url: "https://example.com/map".to_string(),
    }
}
