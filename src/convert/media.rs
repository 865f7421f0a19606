use serde_json::Value;

use super::time::unix_to_iso8601;
use crate::common::types::{Photo, Review, ReviewUser};

/// Google photo references. Only the first photo is exposed for now.
pub fn google_photos(photos: &Value) -> Vec<Photo> {
    objects(photos)
        .into_iter()
        .take(1)
        .map(|photo| Photo::Reference {
            reference: str_field(photo, "photo_reference"),
            width: photo.get("width").and_then(Value::as_u64).unwrap_or(0),
            height: photo.get("height").and_then(Value::as_u64).unwrap_or(0),
        })
        .collect()
}

/// Yelp photo URLs
pub fn yelp_photos(photos: &Value) -> Vec<Photo> {
    photos
        .as_array()
        .and_then(|items| items.iter().map(Value::as_str).collect::<Option<Vec<_>>>())
        .unwrap_or_default()
        .into_iter()
        .map(|url| Photo::Url { url: url.to_string() })
        .collect()
}

/// Google reviews embedded in place details. Google gives no review link.
pub fn google_reviews(reviews: &Value) -> Vec<Review> {
    objects(reviews)
        .into_iter()
        .map(|review| Review {
            text: str_field(review, "text"),
            url: String::new(),
            rating: review.get("rating").and_then(Value::as_f64).unwrap_or(0.0),
            time: review
                .get("time")
                .and_then(Value::as_f64)
                .map(|seconds| unix_to_iso8601(seconds as i64))
                .unwrap_or_default(),
            user: ReviewUser {
                name: str_field(review, "author_name"),
                image_url: str_field(review, "profile_photo_url"),
            },
        })
        .collect()
}

/// Elements of an array made only of objects; anything else is empty
fn objects(value: &Value) -> Vec<&Value> {
    match value.as_array() {
        Some(items) if items.iter().all(Value::is_object) => items.iter().collect(),
        _ => Vec::new(),
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}
