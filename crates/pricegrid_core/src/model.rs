//! Wire contract of the search API.
//!
//! Every optional field carries an explicit default so a partially filled
//! response deserializes into a well-defined value instead of failing. An
//! explicit `null` counts as absent.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of the `POST` sent to the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

/// One marketplace listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Display price as formatted by the backend.
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub rating: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub discount: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price_value: Option<f64>,
}

impl Offer {
    /// Rating suitable for display; the backend uses `"—"` for "no rating".
    pub fn display_rating(&self) -> Option<&str> {
        self.rating
            .as_deref()
            .map(str::trim)
            .filter(|rating| !rating.is_empty() && *rating != "—")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default, deserialize_with = "lenient_string")]
    pub min: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub max: String,
}

/// The cheapest offer overall, with the backend's savings estimate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BestDeal {
    #[serde(flatten)]
    pub offer: Offer,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub savings: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub savings_percent: Option<String>,
}

/// Per-platform aggregate row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cheapest: Offer,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: usize,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub average_price: Option<String>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    /// Distance from the overall best price, in price units.
    #[serde(default)]
    pub difference_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub difference_label: String,
}

/// Backend-computed summary over the current offer set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    #[serde(default)]
    pub best_deal: Option<BestDeal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platforms: Vec<PlatformSummary>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
}

/// Server-side grouping of offers by platform.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlatformBucket {
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<Offer>,
}

/// Diagnostic facts about the search run. Never affects control flow.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub elapsed_time: Option<f64>,
    #[serde(default)]
    pub platforms_searched: Option<u32>,
    #[serde(default)]
    pub platforms_succeeded: Option<u32>,
    #[serde(default, deserialize_with = "truthy")]
    pub from_cache: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Response body of the search endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Accepts any JSON value and applies JavaScript truthiness.
    #[serde(default, deserialize_with = "truthy")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, alias = "offers", deserialize_with = "null_as_default")]
    pub products: Vec<Offer>,
    #[serde(default)]
    pub comparison: Option<Comparison>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform_buckets: Vec<PlatformBucket>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A successful round trip: the parsed body plus the client-measured time.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub response: SearchResponse,
    pub elapsed: Duration,
}

/// Why a dispatched search did not produce a response to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFailure {
    /// The server answered but declined the search.
    Declined { message: Option<String> },
    /// The request could not complete.
    Unreachable,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Num(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Str(text) => text,
            StringOrNumber::Num(number) => number.to_string(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_missing_max_results() {
        let request = SearchRequest {
            query: "iphone 15".to_string(),
            max_results: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"query":"iphone 15"}"#);
    }

    #[test]
    fn response_defaults_absent_fields() {
        let response: SearchResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(response.success);
        assert!(response.products.is_empty());
        assert!(response.comparison.is_none());
        assert!(response.platform_buckets.is_empty());
        assert!(response.metadata.is_none());
    }

    #[test]
    fn missing_success_flag_means_failure() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"error": "Query is required"}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Query is required"));
    }

    #[test]
    fn numeric_rating_and_savings_become_strings() {
        let json = r#"{
            "bestDeal": {
                "platform": "Amazon",
                "title": "MacBook Air M2",
                "price": "₹92,990",
                "url": "https://example.com/a",
                "rating": 4.5,
                "priceValue": 92990.0,
                "savings": 3000,
                "savings_percent": "3%"
            },
            "platforms": [{
                "platform": "Amazon",
                "cheapest": {"platform": "Amazon", "title": "MacBook Air M2", "price": "₹92,990", "url": "https://example.com/a"},
                "count": 2,
                "averagePrice": "₹94,490",
                "differenceValue": 0.0,
                "differenceLabel": "Best price"
            }]
        }"#;
        let comparison: Comparison = serde_json::from_str(json).unwrap();
        let best = comparison.best_deal.unwrap();
        assert_eq!(best.offer.rating.as_deref(), Some("4.5"));
        assert_eq!(best.offer.price_value, Some(92990.0));
        assert_eq!(best.savings.as_deref(), Some("3000"));
        assert_eq!(best.savings_percent.as_deref(), Some("3%"));
        assert_eq!(comparison.platforms[0].difference_value, Some(0.0));
        assert_eq!(comparison.platforms[0].average_price.as_deref(), Some("₹94,490"));
    }

    #[test]
    fn offers_alias_is_accepted() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"success": true, "offers": [{"platform": "eBay", "title": "x", "price": "$1", "url": "u"}]}"#,
        )
        .unwrap();
        assert_eq!(response.products.len(), 1);
        assert_eq!(response.products[0].platform, "eBay");
    }

    #[test]
    fn null_collections_are_empty() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"success": true, "products": null, "platformBuckets": null, "comparison": {"platforms": null}}"#,
        )
        .unwrap();
        assert!(response.success);
        assert!(response.products.is_empty());
        assert!(response.platform_buckets.is_empty());
        assert!(response.comparison.unwrap().platforms.is_empty());

        let bucket: PlatformBucket =
            serde_json::from_str(r#"{"platform": null, "products": null}"#).unwrap();
        assert_eq!(bucket, PlatformBucket::default());
    }

    #[test]
    fn null_offer_fields_fall_back_to_empty() {
        let offer: Offer = serde_json::from_str(
            r#"{"platform": null, "title": null, "price": null, "url": null, "rating": null}"#,
        )
        .unwrap();
        assert_eq!(offer, Offer::default());
    }

    #[test]
    fn null_summary_fields_fall_back_to_defaults() {
        let summary: PlatformSummary = serde_json::from_str(
            r#"{"platform": "eBay", "cheapest": null, "count": null, "differenceLabel": null}"#,
        )
        .unwrap();
        assert_eq!(summary.platform, "eBay");
        assert_eq!(summary.cheapest, Offer::default());
        assert_eq!(summary.count, 0);
        assert_eq!(summary.difference_label, "");

        let metadata: Metadata = serde_json::from_str(r#"{"from_cache": null}"#).unwrap();
        assert!(!metadata.from_cache);
    }

    #[test]
    fn success_flag_follows_truthiness() {
        let cases = [
            (r#"{"success": 1}"#, true),
            (r#"{"success": "yes"}"#, true),
            (r#"{"success": {}}"#, true),
            (r#"{"success": 0}"#, false),
            (r#"{"success": ""}"#, false),
            (r#"{"success": null}"#, false),
        ];
        for (json, expected) in cases {
            let response: SearchResponse = serde_json::from_str(json).unwrap();
            assert_eq!(response.success, expected, "{json}");
        }
    }

    #[test]
    fn dash_rating_is_not_displayed() {
        let offer = Offer {
            rating: Some("—".to_string()),
            ..Offer::default()
        };
        assert_eq!(offer.display_rating(), None);
    }
}
