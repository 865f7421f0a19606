use once_cell::sync::Lazy;
use regex::Regex;

static UTM_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&?utm_(.*?)=[^&]+").expect("valid utm regex"));

/// Google `formatted_address`, with food-truck intersections repaired and the
/// country suffix dropped
pub fn google_address(address: &str) -> String {
    address
        .replace("&,", "&")
        .replace("and,", "and")
        .replace(", USA", "")
}

/// Yelp `location.display_address` lines joined into one string
pub fn yelp_address(lines: &[String]) -> String {
    lines.join(", ")
}

/// Strip `utm_*` tracking parameters from a URL
pub fn clean_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    UTM_PARAM.replace_all(url, "").replace("?&", "?")
}

/// Digits only, capped at 14, with a leading `+`
pub fn e164_phone(phone: &str) -> String {
    if phone.is_empty() {
        return String::new();
    }
    let digits: String = phone.chars().filter(char::is_ascii_digit).take(14).collect();
    format!("+{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_address_cleanup() {
        assert_eq!(
            google_address("Broadway &, E Pike St, Seattle, WA 98122, USA"),
            "Broadway & E Pike St, Seattle, WA 98122"
        );
        assert_eq!(google_address("5th and, Main, Portland, OR"), "5th and Main, Portland, OR");
    }

    #[test]
    fn yelp_address_joins_lines() {
        let lines = vec!["1 Main St".to_string(), "Seattle, WA 98101".to_string()];
        assert_eq!(yelp_address(&lines), "1 Main St, Seattle, WA 98101");
        assert_eq!(yelp_address(&[]), "");
    }

    #[test]
    fn tracking_parameters_are_removed() {
        assert_eq!(
            clean_url("https://www.yelp.com/biz/cafe?adjust_creative=abc&utm_campaign=yelp_api_v3&utm_medium=api_v3_business_lookup&utm_source=abc"),
            "https://www.yelp.com/biz/cafe?adjust_creative=abc"
        );
        assert_eq!(
            clean_url("https://www.yelp.com/biz/cafe?utm_source=abc&hrid=1"),
            "https://www.yelp.com/biz/cafe?hrid=1"
        );
        assert_eq!(clean_url(""), "");
    }

    #[test]
    fn phone_numbers_become_e164() {
        assert_eq!(e164_phone("+1 206-555-0100"), "+12065550100");
        assert_eq!(e164_phone("+44 20 7946 0958 ext 12345"), "+44207946095812");
        assert_eq!(e164_phone(""), "");
    }
}
