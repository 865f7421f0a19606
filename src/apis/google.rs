use async_trait::async_trait;
use base64::engine::general_purpose;
use base64::Engine;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::errors::UpstreamError;
use super::{f64_at, meets_rating, price_params, read_json, sort_results, str_at, u64_at};
use crate::app::ports::{HttpClientPort, HttpGetRequest};
use crate::common::error::Result;
use crate::common::types::{
    Coordinates, DetailsRequest, GeocodeResult, Phone, PhotoData, PhotoRequest, PlaceDetails,
    PlaceSummary, PlacesApi, Provider, SearchRequest,
};
use crate::convert;
use crate::hours::normalize_hours;

/// Address component types that never name a locality level
const GEOCODE_IGNORED_TYPES: [&str; 3] = ["political", "sublocality", "administrative_area"];

/// Google Places / Geocoding client
pub struct GooglePlaces {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
    api_key: String,
}

impl GooglePlaces {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> HttpGetRequest {
        HttpGetRequest::new(format!("{}{}", self.base_url, path))
    }

    /// GET a JSON endpoint; only HTTP 200 with body status `OK` counts as success.
    async fn fetch_ok(&self, request: HttpGetRequest) -> Result<Value> {
        let url = request.url.clone();
        let response = self.http.get(request).await?;
        let body = read_json(&response);

        let ok = response.is_ok()
            && body.as_ref().and_then(|b| b.get("status")).and_then(Value::as_str) == Some("OK");
        match body {
            Some(body) if ok => {
                debug!(%url, "google responded OK");
                Ok(body)
            }
            body => {
                let error = UpstreamError::from_parts(Some(response.status), body.as_ref());
                warn!(%url, status = %error.status, "google request failed");
                crate::observability::upstream_error(Provider::Google, &error.status);
                Err(error.into())
            }
        }
    }

    /// Fetch a photo and inline it as a data URL.
    #[instrument(skip(self))]
    pub async fn photo(&self, request: &PhotoRequest) -> Result<PhotoData> {
        let http_request = self
            .endpoint("/place/photo")
            .query("photoreference", &request.reference)
            .query("maxwidth", request.max_width)
            .query("maxheight", request.max_height)
            .query("key", &self.api_key);

        let response = self.http.get(http_request).await?;
        if !response.is_ok() {
            let error = UpstreamError::from_parts(Some(response.status), read_json(&response).as_ref());
            warn!(status = %error.status, "google photo request failed");
            crate::observability::upstream_error(Provider::Google, &error.status);
            return Err(error.into());
        }

        info!(bytes = response.bytes.len(), content_type = %response.content_type, "fetched photo");
        Ok(PhotoData {
            data_url: format!(
                "data:{};base64,{}",
                response.content_type.to_lowercase(),
                general_purpose::STANDARD.encode(&response.bytes)
            ),
        })
    }

    /// Reverse geocode a coordinate to its named locality levels.
    #[instrument(skip(self))]
    pub async fn geocode(&self, coordinates: &Coordinates) -> Result<GeocodeResult> {
        let request = self
            .endpoint("/geocode/json")
            .query("latlng", format!("{},{}", coordinates.latitude, coordinates.longitude))
            .query("result_type", "street_address")
            .query("key", &self.api_key);

        let body = self.fetch_ok(request).await?;
        Ok(map_geocode(&body))
    }
}

#[async_trait]
impl PlacesApi for GooglePlaces {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    #[instrument(skip(self))]
    async fn search(&self, request: &SearchRequest) -> Result<Vec<PlaceSummary>> {
        let prices = price_params(&request.prices);
        let mut http_request = self
            .endpoint("/place/nearbysearch/json")
            .query("location", format!("{},{}", request.origin.latitude, request.origin.longitude))
            .query("type", request.categories.first().map(String::as_str).unwrap_or_default())
            .query("keyword", &request.term);
        if request.open_now {
            // Google only checks for the key's presence.
            http_request = http_request.query("opennow", "");
        }
        let http_request = http_request
            .query("minprice", prices.first().map(String::as_str).unwrap_or_default())
            .query("maxprice", prices.last().map(String::as_str).unwrap_or_default())
            .query("rankby", "distance")
            .query("key", &self.api_key);

        let body = self.fetch_ok(http_request).await?;
        let mut results: Vec<PlaceSummary> = body
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|result| meets_rating(result, request.min_rating))
            .map(|result| map_search_result(result, &request.origin))
            .collect();

        sort_results(&mut results, request.sort);
        info!(count = results.len(), "google search complete");
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn details(&self, request: &DetailsRequest) -> Result<PlaceDetails> {
        let http_request = self
            .endpoint("/place/details/json")
            .query("place_id", &request.id)
            .query("key", &self.api_key);

        let body = self.fetch_ok(http_request).await?;
        let result = body.get("result").cloned().unwrap_or_else(|| json!({}));
        Ok(map_details(&result, &request.origin))
    }
}

pub fn map_search_result(result: &Value, origin: &Coordinates) -> PlaceSummary {
    let latitude = f64_at(result, "/geometry/location/lat", 0.0);
    let longitude = f64_at(result, "/geometry/location/lng", 0.0);

    PlaceSummary {
        source: Provider::Google,
        id: str_at(result, "/place_id").to_string(),
        name: str_at(result, "/name").to_string(),
        price: price_of(result),
        rating: f64_at(result, "/rating", 1.0),
        review_count: u64_at(result, "/user_ratings_total"),
        distance: convert::gps_distance(origin.latitude, origin.longitude, latitude, longitude),
    }
}

/// Map the `result` object of a place details response.
pub fn map_details(result: &Value, origin: &Coordinates) -> PlaceDetails {
    let coordinates = Coordinates {
        latitude: f64_at(result, "/geometry/location/lat", 0.0),
        longitude: f64_at(result, "/geometry/location/lng", 0.0),
    };
    let types = result.get("types").unwrap_or(&Value::Null);

    PlaceDetails {
        source: Provider::Google,
        id: str_at(result, "/place_id").to_string(),
        name: str_at(result, "/name").to_string(),
        price: price_of(result),
        rating: f64_at(result, "/rating", 1.0),
        review_count: u64_at(result, "/user_ratings_total"),
        categories: convert::google_categories(types),
        services: convert::services(types),
        address: convert::google_address(str_at(result, "/formatted_address")),
        distance: convert::gps_distance(
            origin.latitude,
            origin.longitude,
            coordinates.latitude,
            coordinates.longitude,
        ),
        coordinates,
        url: str_at(result, "/url").to_string(),
        phone: Phone {
            display: str_at(result, "/formatted_phone_number").to_string(),
            raw: convert::e164_phone(str_at(result, "/international_phone_number")),
        },
        hours: normalize_hours(Provider::Google, result.get("opening_hours").unwrap_or(&Value::Null)),
        photos: convert::google_photos(result.get("photos").unwrap_or(&Value::Null)),
        reviews: convert::google_reviews(result.get("reviews").unwrap_or(&Value::Null)),
    }
}

/// Collect locality names from the first geocode result.
pub fn map_geocode(body: &Value) -> GeocodeResult {
    let mut geocode = GeocodeResult::default();
    let components = body
        .pointer("/results/0/address_components")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for component in components {
        let level = component
            .get("types")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .find(|kind| !GEOCODE_IGNORED_TYPES.contains(kind));
        let long_name = str_at(component, "/long_name").to_string();

        let slot = match level {
            Some("neighborhood") => &mut geocode.neighborhood,
            Some("sublocality_level_1") => &mut geocode.sublocality_level_1,
            Some("locality") => &mut geocode.locality,
            Some("administrative_area_level_1") => &mut geocode.administrative_area_level_1,
            Some("country") => &mut geocode.country,
            _ => continue,
        };
        *slot = Some(long_name);
    }
    geocode
}

fn price_of(result: &Value) -> u8 {
    result
        .get("price_level")
        .and_then(Value::as_u64)
        .map(|level| level.min(4) as u8)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn geocode_keeps_named_levels_only() {
        let body = json!({
            "status": "OK",
            "results": [{
                "address_components": [
                    { "long_name": "277", "types": ["street_number"] },
                    { "long_name": "Williamsburg", "types": ["neighborhood", "political"] },
                    { "long_name": "Brooklyn", "types": ["political", "sublocality", "sublocality_level_1"] },
                    { "long_name": "New York", "types": ["administrative_area_level_1", "political"] },
                    { "long_name": "United States", "types": ["country", "political"] },
                    { "long_name": "11211", "types": ["postal_code"] }
                ]
            }]
        });

        let geocode = map_geocode(&body);
        assert_eq!(
            serde_json::to_value(&geocode).unwrap(),
            json!({
                "neighborhood": "Williamsburg",
                "sublocality_level_1": "Brooklyn",
                "administrative_area_level_1": "New York",
                "country": "United States"
            })
        );
    }

    #[test]
    fn search_result_defaults() {
        let origin = Coordinates { latitude: 1.0, longitude: 1.0 };
        let summary = map_search_result(&json!({ "geometry": { "location": { "lat": 1.0, "lng": 1.0 } } }), &origin);

        assert_eq!(summary.id, "");
        assert_eq!(summary.price, 0);
        assert_eq!(summary.rating, 1.0);
        assert_eq!(summary.review_count, 0);
        assert_eq!(summary.distance, 0.0);
    }
}
