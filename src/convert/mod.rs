//! Field-level conversions from provider payloads to the unified schema.
//!
//! Every converter is total: unusable input yields an empty value rather
//! than an error, since none of these fields should fail a whole response.

mod geo;
mod media;
mod tags;
mod text;
mod time;

pub use geo::gps_distance;
pub use media::{google_photos, google_reviews, yelp_photos};
pub use tags::{google_categories, price_level, services, yelp_categories};
pub use text::{clean_url, e164_phone, google_address, yelp_address};
pub use time::{local_to_iso8601, unix_to_iso8601};
