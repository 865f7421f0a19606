pub mod errors;
pub mod google;
pub mod yelp;

use serde_json::Value;
use std::cmp::Ordering;

use crate::app::ports::HttpGetResult;
use crate::common::types::{PlaceSummary, SortOrder};

pub use google::GooglePlaces;
pub use yelp::YelpFusion;

/// Order search results the way the client asked; ties keep upstream order.
pub fn sort_results(results: &mut [PlaceSummary], sort: SortOrder) {
    match sort {
        SortOrder::Distance => results.sort_by(|a, b| a.distance.total_cmp(&b.distance)),
        SortOrder::LeastExpensive => results.sort_by(|a, b| {
            a.price
                .cmp(&b.price)
                .then_with(|| a.distance.total_cmp(&b.distance))
        }),
        SortOrder::MostReviewed => results.sort_by(|a, b| b.review_count.cmp(&a.review_count)),
    }
}

/// Keep results whose rating meets the minimum; unrated results never do.
pub(crate) fn meets_rating(result: &Value, min_rating: f64) -> bool {
    result
        .get("rating")
        .and_then(Value::as_f64)
        .map_or(false, |rating| rating >= min_rating)
}

pub(crate) fn read_json(result: &HttpGetResult) -> Option<Value> {
    serde_json::from_slice(&result.bytes).ok()
}

pub(crate) fn str_at<'a>(value: &'a Value, pointer: &str) -> &'a str {
    value.pointer(pointer).and_then(Value::as_str).unwrap_or_default()
}

pub(crate) fn f64_at(value: &Value, pointer: &str, default: f64) -> f64 {
    value.pointer(pointer).and_then(Value::as_f64).unwrap_or(default)
}

pub(crate) fn u64_at(value: &Value, pointer: &str) -> u64 {
    value.pointer(pointer).and_then(Value::as_u64).unwrap_or(0)
}

/// Sorted price levels, lowest first, formatted for query strings
pub(crate) fn price_params(prices: &[f64]) -> Vec<String> {
    let mut sorted = prices.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.iter().map(f64::to_string).collect()
}
