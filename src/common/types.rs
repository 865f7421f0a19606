use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::error::Result;
use crate::hours::Hours;

/// Upstream data source a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Yelp,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Yelp => "yelp",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Ordering applied to search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Distance,
    LeastExpensive,
    MostReviewed,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "distance" => Some(SortOrder::Distance),
            "least_expensive" => Some(SortOrder::LeastExpensive),
            "most_reviewed" => Some(SortOrder::MostReviewed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub term: String,
    pub origin: Coordinates,
    pub categories: Vec<String>,
    pub sort: SortOrder,
    /// Sorted ascending, 1-4 entries
    pub prices: Vec<f64>,
    pub min_rating: f64,
    pub open_now: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailsRequest {
    pub id: String,
    pub origin: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRequest {
    pub reference: String,
    pub max_width: f64,
    pub max_height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewsRequest {
    pub id: String,
}

/// Category or service tag, e.g. `{ "tag": "takeout", "name": "Takeout" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    pub name: String,
}

impl Tag {
    pub fn new(tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceSummary {
    pub source: Provider,
    pub id: String,
    pub name: String,
    pub price: u8,
    pub rating: f64,
    pub review_count: u64,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phone {
    pub display: String,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Photo {
    Reference {
        reference: String,
        width: u64,
        height: u64,
    },
    Url {
        url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewUser {
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub text: String,
    pub url: String,
    pub rating: f64,
    /// ISO 8601 in UTC, empty when the provider timestamp was unusable
    pub time: String,
    pub user: ReviewUser,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDetails {
    pub source: Provider,
    pub id: String,
    pub name: String,
    pub price: u8,
    pub rating: f64,
    pub review_count: u64,
    pub categories: Vec<Tag>,
    pub services: Vec<Tag>,
    pub address: String,
    pub coordinates: Coordinates,
    pub distance: f64,
    pub url: String,
    pub phone: Phone,
    pub hours: Hours,
    pub photos: Vec<Photo>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewsResult {
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoData {
    pub data_url: String,
}

/// Reverse-geocoded locality names; absent levels are omitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeocodeResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sublocality_level_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_area_level_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Operations every places provider offers
#[async_trait]
pub trait PlacesApi: Send + Sync {
    fn provider(&self) -> Provider;

    /// Nearby search, filtered by minimum rating and sorted as requested
    async fn search(&self, request: &SearchRequest) -> Result<Vec<PlaceSummary>>;

    /// Full details for one place, including normalized hours
    async fn details(&self, request: &DetailsRequest) -> Result<PlaceDetails>;
}
