use tracing::debug;

use crate::catalog::Catalog;
use crate::domain::{EventRecord, QueryParams, SortKey, ALL_CATEGORIES};

/// Computes a derived, ordered view of the catalog.
///
/// Filters apply in a fixed order (text, category, price bucket) followed by a
/// stable sort, so ties always keep catalog order. The catalog itself is never
/// touched; an empty result is a valid result.
pub fn query<'a>(catalog: &'a Catalog, params: &QueryParams) -> Vec<&'a EventRecord> {
    let mut view: Vec<&EventRecord> = catalog
        .get_all()
        .iter()
        .filter(|event| matches_search(event, &params.search))
        .filter(|event| {
            params.category == ALL_CATEGORIES || event.category == params.category
        })
        .filter(|event| params.price_bucket.matches(event.price.amount))
        .collect();

    sort_events(&mut view, params.sort_key);

    debug!(
        matched = view.len(),
        search = %params.search,
        category = %params.category,
        bucket = %params.price_bucket,
        sort = %params.sort_key,
        "query evaluated"
    );
    view
}

/// Quick lookup for the search overlay: text filter only, catalog order,
/// truncated to `limit`.
pub fn search_preview<'a>(catalog: &'a Catalog, text: &str, limit: usize) -> Vec<&'a EventRecord> {
    catalog
        .get_all()
        .iter()
        .filter(|event| matches_search(event, text))
        .take(limit)
        .collect()
}

/// Case-insensitive substring match over name, venue, location, short
/// description, and tags. A blank needle matches everything.
fn matches_search(event: &EventRecord, text: &str) -> bool {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    event.name.to_lowercase().contains(&needle)
        || event.venue.to_lowercase().contains(&needle)
        || event.location.to_lowercase().contains(&needle)
        || event.short_description.to_lowercase().contains(&needle)
        || event
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

fn sort_events(view: &mut [&EventRecord], key: SortKey) {
    match key {
        SortKey::Date => view.sort_by_key(|event| event.date),
        SortKey::Name => view.sort_by_key(|event| event.name.to_lowercase()),
        SortKey::Price => {
            view.sort_by(|a, b| a.price.amount.total_cmp(&b.price.amount));
        }
        SortKey::Popularity => {
            view.sort_by(|a, b| b.registered_count.cmp(&a.registered_count));
        }
    }
}
