//! Request body checks. Each check either hands back the typed request it
//! vouches for or a `GatewayError` carrying the message clients see.

use serde_json::{Map, Value};
use tracing::debug;

use crate::common::constants::RESERVED_BODY_KEYS;
use crate::common::error::{GatewayError, Result};
use crate::common::types::{
    Coordinates, DetailsRequest, PhotoRequest, ReviewsRequest, SearchRequest, SortOrder,
};

pub type Body = Map<String, Value>;

/// Parse a raw request body into a non-empty JSON object.
pub fn parse_body(raw: &[u8]) -> Result<Body> {
    let value: Value = serde_json::from_slice(raw)?;
    check_if_empty_or_invalid(value)
}

pub fn check_if_empty_or_invalid(content: Value) -> Result<Body> {
    match content {
        Value::Object(body) if !body.is_empty() => Ok(body),
        _ => Err(GatewayError::syntax("The content is empty or invalid")),
    }
}

/// Token claims are stamped by the issuer; a body carrying them is forged.
pub fn check_if_malicious(body: &Body) -> Result<()> {
    if RESERVED_BODY_KEYS.iter().any(|key| body.contains_key(*key)) {
        debug!("rejecting body with reserved keys");
        return Err(GatewayError::System("The content is malicious".to_string()));
    }
    Ok(())
}

pub fn check_for_coordinates(body: &Body) -> Result<Coordinates> {
    let latitude = finite(body, "latitude")
        .ok_or_else(|| GatewayError::syntax("The \"latitude\" key is not a finite number"))?;
    let longitude = finite(body, "longitude")
        .ok_or_else(|| GatewayError::syntax("The \"longitude\" key is not a finite number"))?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(GatewayError::syntax(
            "The \"latitude\" or \"longitude\" key has exceeded the allowed value",
        ));
    }

    Ok(Coordinates { latitude, longitude })
}

pub fn check_for_search(body: &Body, origin: Coordinates) -> Result<SearchRequest> {
    let term = non_empty_string(body, "term")
        .ok_or_else(|| GatewayError::syntax("The \"term\" key is empty or not a string"))?;

    let categories = body
        .get("category")
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().filter(|s| !s.is_empty()).map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .filter(|categories| !categories.is_empty())
        .ok_or_else(|| GatewayError::syntax("The \"category\" key is not a string[] or wrong size"))?;

    let sort = body
        .get("sort")
        .and_then(Value::as_str)
        .and_then(SortOrder::parse)
        .ok_or_else(|| GatewayError::syntax("The \"sort\" key does not match expression"))?;

    let mut prices = body
        .get("price")
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_f64().filter(|n| n.is_finite()))
                .collect::<Option<Vec<_>>>()
        })
        .filter(|prices| (1..=4).contains(&prices.len()))
        .ok_or_else(|| GatewayError::syntax("The \"price\" key is not a finite number[] or wrong size"))?;
    prices.sort_by(f64::total_cmp);

    let min_rating = finite(body, "min_rating")
        .ok_or_else(|| GatewayError::syntax("The \"min_rating\" key is not a number"))?;

    let open_now = body
        .get("open_now")
        .and_then(Value::as_bool)
        .ok_or_else(|| GatewayError::syntax("The \"open_now\" key is not a boolean"))?;

    Ok(SearchRequest {
        term,
        origin,
        categories,
        sort,
        prices,
        min_rating,
        open_now,
    })
}

pub fn check_for_details(body: &Body, origin: Coordinates) -> Result<DetailsRequest> {
    let id = non_empty_string(body, "id")
        .ok_or_else(|| GatewayError::syntax("The \"id\" key is empty or not a string"))?;
    Ok(DetailsRequest { id, origin })
}

pub fn check_for_reviews(body: &Body) -> Result<ReviewsRequest> {
    let id = non_empty_string(body, "id")
        .ok_or_else(|| GatewayError::syntax("The \"id\" key is empty or not a string"))?;
    Ok(ReviewsRequest { id })
}

pub fn check_for_photo(body: &Body) -> Result<PhotoRequest> {
    let reference = non_empty_string(body, "reference")
        .ok_or_else(|| GatewayError::syntax("The \"reference\" key is empty or not a string"))?;
    let max_width = finite(body, "max_width")
        .ok_or_else(|| GatewayError::syntax("The \"max_width\" key is not a number"))?;
    let max_height = finite(body, "max_height")
        .ok_or_else(|| GatewayError::syntax("The \"max_height\" key is not a number"))?;

    Ok(PhotoRequest {
        reference,
        max_width,
        max_height,
    })
}

fn finite(body: &Body, key: &str) -> Option<f64> {
    body.get(key).and_then(Value::as_f64).filter(|n| n.is_finite())
}

fn non_empty_string(body: &Body, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Body {
        check_if_empty_or_invalid(value).expect("object body")
    }

    fn message(result: Result<impl std::fmt::Debug>) -> String {
        result.expect_err("should be rejected").description()
    }

    #[test]
    fn empty_or_non_object_bodies() {
        assert!(check_if_empty_or_invalid(json!({})).is_err());
        assert!(check_if_empty_or_invalid(json!([1])).is_err());
        assert!(check_if_empty_or_invalid(json!("text")).is_err());
        assert!(parse_body(b"{not json").is_err());
        assert!(parse_body(br#"{"id":"abc"}"#).is_ok());
    }

    #[test]
    fn reserved_keys_are_malicious() {
        let error = check_if_malicious(&body(json!({ "id": "abc", "iat": 1 }))).unwrap_err();
        assert_eq!(error.status(), "SYSTEM_ERROR");
        assert_eq!(error.description(), "The content is malicious");
        assert!(check_if_malicious(&body(json!({ "id": "abc" }))).is_ok());
    }

    #[test]
    fn coordinates_bounds() {
        let ok = check_for_coordinates(&body(json!({ "latitude": 40.7, "longitude": -73.9 }))).unwrap();
        assert_eq!(ok, Coordinates { latitude: 40.7, longitude: -73.9 });

        assert_eq!(
            message(check_for_coordinates(&body(json!({ "latitude": "40.7", "longitude": -73.9 })))),
            "The \"latitude\" key is not a finite number"
        );
        assert_eq!(
            message(check_for_coordinates(&body(json!({ "latitude": 40.7 })))),
            "The \"longitude\" key is not a finite number"
        );
        assert_eq!(
            message(check_for_coordinates(&body(json!({ "latitude": 91, "longitude": 0 })))),
            "The \"latitude\" or \"longitude\" key has exceeded the allowed value"
        );
    }

    #[test]
    fn search_payload() {
        let origin = Coordinates { latitude: 40.714224, longitude: -73.961452 };
        let search = check_for_search(
            &body(json!({
                "term": "food",
                "category": ["restaurant"],
                "sort": "least_expensive",
                "price": [3, 1, 2],
                "min_rating": 3,
                "open_now": true
            })),
            origin,
        )
        .unwrap();

        assert_eq!(search.sort, SortOrder::LeastExpensive);
        assert_eq!(search.prices, vec![1.0, 2.0, 3.0]);
        assert_eq!(search.min_rating, 3.0);
        assert!(search.open_now);
    }

    #[test]
    fn search_payload_errors() {
        let origin = Coordinates { latitude: 0.0, longitude: 0.0 };
        let base = json!({
            "term": "food",
            "category": ["restaurant"],
            "sort": "distance",
            "price": [1],
            "min_rating": 3,
            "open_now": false
        });
        let with = |key: &str, value: Value| {
            let mut candidate = base.clone();
            candidate[key] = value;
            message(check_for_search(&body(candidate), origin))
        };

        assert_eq!(with("term", json!("")), "The \"term\" key is empty or not a string");
        assert_eq!(with("category", json!([])), "The \"category\" key is not a string[] or wrong size");
        assert_eq!(with("category", json!(["bar", ""])), "The \"category\" key is not a string[] or wrong size");
        assert_eq!(with("sort", json!("rating")), "The \"sort\" key does not match expression");
        assert_eq!(with("price", json!([1, 2, 3, 4, 1])), "The \"price\" key is not a finite number[] or wrong size");
        assert_eq!(with("min_rating", json!(null)), "The \"min_rating\" key is not a number");
        assert_eq!(with("open_now", json!("true")), "The \"open_now\" key is not a boolean");
    }

    #[test]
    fn photo_and_id_payloads() {
        let photo = check_for_photo(&body(json!({ "reference": "abc", "max_width": 400, "max_height": 300 }))).unwrap();
        assert_eq!(photo.max_width, 400.0);

        assert_eq!(
            message(check_for_photo(&body(json!({ "reference": "abc", "max_width": 400 })))),
            "The \"max_height\" key is not a number"
        );
        assert_eq!(
            message(check_for_reviews(&body(json!({ "id": 7 })))),
            "The \"id\" key is empty or not a string"
        );
    }
}
