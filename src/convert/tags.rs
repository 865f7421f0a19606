use serde_json::Value;

use crate::common::constants::GOOGLE_CATEGORY_TYPES;
use crate::common::types::Tag;

/// Yelp dollar signs to a 0-4 price level
pub fn price_level(dollars: &str) -> u8 {
    match dollars {
        "$" => 1,
        "$$" => 2,
        "$$$" => 3,
        "$$$$" => 4,
        _ => 0,
    }
}

/// Google place `types` filtered down to food-and-drink categories
pub fn google_categories(types: &Value) -> Vec<Tag> {
    string_items(types)
        .into_iter()
        .filter(|kind| GOOGLE_CATEGORY_TYPES.contains(kind))
        .map(|kind| Tag::new(kind, title_case(kind)))
        .collect()
}

/// Yelp `categories` objects, one tag each
pub fn yelp_categories(categories: &Value) -> Vec<Tag> {
    let Some(items) = categories.as_array() else {
        return Vec::new();
    };
    if !items.iter().all(Value::is_object) {
        return Vec::new();
    }

    items
        .iter()
        .map(|category| {
            let alias = category.get("alias").and_then(Value::as_str).unwrap_or("unknown");
            let title = category.get("title").and_then(Value::as_str).unwrap_or("Unknown");
            Tag::new(alias, title)
        })
        .collect()
}

/// Google `types` or Yelp `transactions` reduced to the services we surface
pub fn services(values: &Value) -> Vec<Tag> {
    string_items(values)
        .into_iter()
        .filter_map(|service| match service {
            "meal_delivery" | "delivery" => Some(Tag::new("delivery", "Delivery")),
            "meal_takeaway" | "pickup" => Some(Tag::new("takeout", "Takeout")),
            "restaurant_reservation" => Some(Tag::new("reservation", "Reservations")),
            _ => None,
        })
        .collect()
}

/// Items of a string array; anything else (including mixed arrays) is empty
fn string_items(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .and_then(|items| items.iter().map(Value::as_str).collect::<Option<Vec<_>>>())
        .unwrap_or_default()
}

fn title_case(tag: &str) -> String {
    tag.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dollars_to_level() {
        assert_eq!(price_level("$"), 1);
        assert_eq!(price_level("$$$$"), 4);
        assert_eq!(price_level(""), 0);
        assert_eq!(price_level("$$$$$"), 0);
    }

    #[test]
    fn google_types_are_filtered_and_named() {
        let tags = google_categories(&json!(["night_club", "point_of_interest", "restaurant", "establishment"]));
        assert_eq!(
            tags,
            vec![Tag::new("night_club", "Night Club"), Tag::new("restaurant", "Restaurant")]
        );
    }

    #[test]
    fn yelp_categories_default_missing_fields() {
        let tags = yelp_categories(&json!([
            { "alias": "ramen", "title": "Ramen" },
            { "title": "Mystery" }
        ]));
        assert_eq!(tags, vec![Tag::new("ramen", "Ramen"), Tag::new("unknown", "Mystery")]);

        assert!(yelp_categories(&json!(["ramen"])).is_empty());
    }

    #[test]
    fn services_merge_provider_vocabularies() {
        let tags = services(&json!(["pickup", "meal_delivery", "restaurant_reservation", "dine_in"]));
        assert_eq!(
            tags,
            vec![
                Tag::new("takeout", "Takeout"),
                Tag::new("delivery", "Delivery"),
                Tag::new("reservation", "Reservations"),
            ]
        );
        assert!(services(&json!(["pickup", 4])).is_empty());
        assert!(services(&Value::Null).is_empty());
    }
}
