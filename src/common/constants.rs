/// Route and action names shared by the server, the response envelope and logs.
/// Each route answers with exactly one action.
// Google Places routes
pub const PLACES_SEARCH_ROUTE: &str = "/places/search";
pub const PLACES_DETAILS_ROUTE: &str = "/places/details";
pub const PLACES_PHOTO_ROUTE: &str = "/places/photo";
pub const GEOCODE_LOCATE_ROUTE: &str = "/geocode/locate";

// Yelp Fusion routes
pub const FUSION_SEARCH_ROUTE: &str = "/fusion/search";
pub const FUSION_DETAILS_ROUTE: &str = "/fusion/details";
pub const FUSION_REVIEWS_ROUTE: &str = "/fusion/reviews";

pub const HEALTH_ROUTE: &str = "/health";

// Actions reported in the `action` field of every response
pub const PLACES_SEARCH_ACTION: &str = "PLACES_SEARCH";
pub const PLACES_DETAILS_ACTION: &str = "PLACES_DETAILS";
pub const PLACES_PHOTO_ACTION: &str = "PLACES_PHOTO";
pub const GEOCODE_LOCATE_ACTION: &str = "GEOCODE_LOCATE";
pub const FUSION_SEARCH_ACTION: &str = "FUSION_SEARCH";
pub const FUSION_DETAILS_ACTION: &str = "FUSION_DETAILS";
pub const FUSION_REVIEWS_ACTION: &str = "FUSION_REVIEWS";

// Upstream base URLs
pub const GOOGLE_API_BASE: &str = "https://maps.googleapis.com/maps/api";
pub const YELP_API_BASE: &str = "https://api.yelp.com/v3";

// Google only lists these place types as categories
pub const GOOGLE_CATEGORY_TYPES: [&str; 5] = ["bakery", "bar", "cafe", "night_club", "restaurant"];

// Fields that only the token issuer may set; their presence in a request body is rejected
pub const RESERVED_BODY_KEYS: [&str; 4] = ["ip", "ua", "iat", "exp"];

/// Yelp reports review timestamps in Pacific time
pub const YELP_TIMEZONE: chrono_tz::Tz = chrono_tz::America::Los_Angeles;

