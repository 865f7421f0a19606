use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::errors::UpstreamError;
use super::{f64_at, meets_rating, price_params, read_json, sort_results, str_at, u64_at};
use crate::app::ports::{HttpClientPort, HttpGetRequest};
use crate::common::error::{GatewayError, Result};
use crate::common::types::{
    Coordinates, DetailsRequest, Phone, PlaceDetails, PlaceSummary, PlacesApi, Provider, Review,
    ReviewUser, ReviewsRequest, ReviewsResult, SearchRequest,
};
use crate::convert;
use crate::hours::normalize_hours;

/// Yelp Fusion client, authenticated with a bearer API key
pub struct YelpFusion {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
    api_key: String,
}

impl YelpFusion {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> HttpGetRequest {
        HttpGetRequest::new(format!("{}{}", self.base_url, path)).bearer(&self.api_key)
    }

    /// Path for one business, with the id encoded as a single segment.
    fn business_path(id: &str, suffix: &str) -> Result<String> {
        if id == "." || id == ".." {
            return Err(GatewayError::syntax("The \"id\" key is not a valid identifier"));
        }
        Ok(format!("/businesses/{}{}", urlencoding::encode(id), suffix))
    }

    /// GET a JSON endpoint; success is HTTP 200 without an `error` object.
    async fn fetch_ok(&self, request: HttpGetRequest) -> Result<Value> {
        let url = request.url.clone();
        let response = self.http.get(request).await?;
        let body = read_json(&response);

        let ok = response.is_ok() && body.as_ref().map_or(false, |b| b.get("error").is_none());
        match body {
            Some(body) if ok => {
                debug!(%url, "yelp responded OK");
                Ok(body)
            }
            body => {
                let error = UpstreamError::from_parts(Some(response.status), body.as_ref());
                warn!(%url, status = %error.status, "yelp request failed");
                crate::observability::upstream_error(Provider::Yelp, &error.status);
                Err(error.into())
            }
        }
    }

    /// Reviews for one business, newest as Yelp orders them.
    #[instrument(skip(self))]
    pub async fn reviews(&self, request: &ReviewsRequest) -> Result<ReviewsResult> {
        let body = self
            .fetch_ok(self.endpoint(&Self::business_path(&request.id, "/reviews")?))
            .await?;

        let reviews: Vec<Review> = body
            .get("reviews")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(map_review)
            .collect();

        info!(count = reviews.len(), "yelp reviews fetched");
        Ok(ReviewsResult { reviews })
    }
}

#[async_trait]
impl PlacesApi for YelpFusion {
    fn provider(&self) -> Provider {
        Provider::Yelp
    }

    #[instrument(skip(self))]
    async fn search(&self, request: &SearchRequest) -> Result<Vec<PlaceSummary>> {
        let http_request = self
            .endpoint("/businesses/search")
            .query("term", &request.term)
            .query("latitude", request.origin.latitude)
            .query("longitude", request.origin.longitude)
            .query("categories", request.categories.join(","))
            .query("price", price_params(&request.prices).join(","))
            .query("open_now", request.open_now);

        let body = self.fetch_ok(http_request).await?;
        let mut results: Vec<PlaceSummary> = body
            .get("businesses")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|business| meets_rating(business, request.min_rating))
            .map(|business| map_search_result(business, &request.origin))
            .collect();

        sort_results(&mut results, request.sort);
        info!(count = results.len(), "yelp search complete");
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn details(&self, request: &DetailsRequest) -> Result<PlaceDetails> {
        let body = self
            .fetch_ok(self.endpoint(&Self::business_path(&request.id, "")?))
            .await?;
        Ok(map_details(&body, &request.origin))
    }
}

pub fn map_search_result(business: &Value, origin: &Coordinates) -> PlaceSummary {
    let latitude = f64_at(business, "/coordinates/latitude", 0.0);
    let longitude = f64_at(business, "/coordinates/longitude", 0.0);

    PlaceSummary {
        source: Provider::Yelp,
        id: str_at(business, "/id").to_string(),
        name: str_at(business, "/name").to_string(),
        price: convert::price_level(str_at(business, "/price")),
        rating: f64_at(business, "/rating", 1.0),
        review_count: u64_at(business, "/review_count"),
        distance: convert::gps_distance(origin.latitude, origin.longitude, latitude, longitude),
    }
}

/// Map a business details response.
pub fn map_details(business: &Value, origin: &Coordinates) -> PlaceDetails {
    let coordinates = Coordinates {
        latitude: f64_at(business, "/coordinates/latitude", 0.0),
        longitude: f64_at(business, "/coordinates/longitude", 0.0),
    };
    let display_address: Vec<String> = business
        .pointer("/location/display_address")
        .and_then(Value::as_array)
        .map(|lines| lines.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default();

    PlaceDetails {
        source: Provider::Yelp,
        id: str_at(business, "/id").to_string(),
        name: str_at(business, "/name").to_string(),
        price: convert::price_level(str_at(business, "/price")),
        rating: f64_at(business, "/rating", 1.0),
        review_count: u64_at(business, "/review_count"),
        categories: convert::yelp_categories(business.get("categories").unwrap_or(&Value::Null)),
        services: convert::services(business.get("transactions").unwrap_or(&Value::Null)),
        address: convert::yelp_address(&display_address),
        distance: convert::gps_distance(
            origin.latitude,
            origin.longitude,
            coordinates.latitude,
            coordinates.longitude,
        ),
        coordinates,
        url: convert::clean_url(str_at(business, "/url")),
        phone: Phone {
            display: str_at(business, "/display_phone").to_string(),
            raw: str_at(business, "/phone").to_string(),
        },
        hours: normalize_hours(Provider::Yelp, business.get("hours").unwrap_or(&Value::Null)),
        photos: convert::yelp_photos(business.get("photos").unwrap_or(&Value::Null)),
        // Yelp serves reviews from their own endpoint.
        reviews: Vec::new(),
    }
}

fn map_review(review: &Value) -> Review {
    Review {
        text: str_at(review, "/text").to_string(),
        url: convert::clean_url(str_at(review, "/url")),
        rating: f64_at(review, "/rating", 0.0),
        time: convert::local_to_iso8601(str_at(review, "/time_created")),
        user: ReviewUser {
            name: str_at(review, "/user/name").to_string(),
            image_url: str_at(review, "/user/image_url").to_string(),
        },
    }
}
