//! Display data derived from the stored search results.
//!
//! Everything here is recomputed from scratch on every call to
//! [`crate::AppState::view`]; nothing mutates the stored offers.

use std::collections::HashMap;

use crate::model::{Metadata, Offer, PlatformBucket, PlatformSummary, PriceRange};
use crate::state::{ErrorKind, ErrorNotice, SearchPhase, SearchResults};

/// Offers shown per platform bucket before collapsing the rest.
pub const BUCKET_DISPLAY_LIMIT: usize = 5;

/// A platform whose cheapest offer is within this distance of the best deal
/// is labelled as the best price.
pub const BEST_PRICE_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceBadge {
    BestPrice,
    /// `+<difference label>`.
    Delta(String),
    /// The backend did not rank this platform.
    Unranked,
}

impl PriceBadge {
    pub fn label(&self) -> Option<&str> {
        match self {
            PriceBadge::BestPrice => Some("Best price"),
            PriceBadge::Delta(label) => Some(label.as_str()),
            PriceBadge::Unranked => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestDealView {
    pub platform: String,
    pub title: String,
    pub price: String,
    pub url: String,
    pub rating: Option<String>,
    pub savings: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRowView {
    pub platform: String,
    pub badge: PriceBadge,
    pub price: String,
    pub title: String,
    pub url: String,
    pub rating: Option<String>,
    pub count: usize,
    pub average_price: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BucketView {
    pub platform: String,
    pub total: usize,
    pub shown: Vec<Offer>,
    /// Offers beyond the display limit.
    pub hidden: usize,
}

impl BucketView {
    pub fn more_label(&self) -> Option<String> {
        (self.hidden > 0).then(|| format!("+{} more offers available", self.hidden))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub phase: SearchPhase,
    pub loading: bool,
    pub error: Option<ErrorView>,
    /// "N results in X.Xs".
    pub result_summary: Option<String>,
    pub best_deal: Option<BestDealView>,
    pub price_range: Option<PriceRange>,
    pub platforms: Vec<PlatformRowView>,
    pub buckets: Vec<BucketView>,
    pub offer_count: usize,
    pub metadata: Option<Metadata>,
    pub show_empty_state: bool,
    pub dirty: bool,
}

impl AppViewModel {
    pub(crate) fn from_state(
        input: &str,
        phase: &SearchPhase,
        results: Option<&SearchResults>,
        error: Option<&ErrorNotice>,
        dirty: bool,
    ) -> Self {
        let loading = matches!(phase, SearchPhase::Searching { .. });
        let error = error.map(|notice| ErrorView {
            kind: notice.kind,
            message: notice.message.clone(),
        });

        let mut view = AppViewModel {
            input: input.to_string(),
            phase: phase.clone(),
            loading,
            error,
            dirty,
            ..AppViewModel::default()
        };

        if let Some(results) = results {
            view.offer_count = results.offers.len();
            view.result_summary = results
                .elapsed
                .filter(|_| !results.offers.is_empty())
                .map(|elapsed| {
                    format!(
                        "{} results in {:.1}s",
                        results.offers.len(),
                        elapsed.as_secs_f64()
                    )
                });
            if let Some(comparison) = &results.comparison {
                view.best_deal = comparison.best_deal.as_ref().map(|deal| BestDealView {
                    platform: deal.offer.platform.clone(),
                    title: deal.offer.title.clone(),
                    price: deal.offer.price.clone(),
                    url: deal.offer.url.clone(),
                    rating: deal.offer.display_rating().map(ToOwned::to_owned),
                    savings: savings_line(deal.savings.as_deref(), deal.savings_percent.as_deref()),
                });
                view.price_range = comparison.price_range.clone();
                view.platforms = comparison.platforms.iter().map(platform_row).collect();
            }
            view.buckets = if results.buckets.is_empty() {
                bucket_offers(&results.offers, BUCKET_DISPLAY_LIMIT)
            } else {
                truncate_buckets(&results.buckets, BUCKET_DISPLAY_LIMIT)
            };
            view.metadata = results.metadata.clone();
        }

        view.show_empty_state = !view.loading && view.error.is_none() && view.offer_count == 0;
        view
    }
}

/// Groups offers by platform in first-seen order and caps each group at `limit`.
pub fn bucket_offers(offers: &[Offer], limit: usize) -> Vec<BucketView> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&Offer>> = HashMap::new();
    for offer in offers {
        let platform = offer.platform.as_str();
        groups
            .entry(platform)
            .or_insert_with(|| {
                order.push(platform);
                Vec::new()
            })
            .push(offer);
    }

    order
        .into_iter()
        .map(|platform| {
            let members = groups.remove(platform).unwrap_or_default();
            build_bucket(platform, members, limit)
        })
        .collect()
}

fn truncate_buckets(buckets: &[PlatformBucket], limit: usize) -> Vec<BucketView> {
    buckets
        .iter()
        .map(|bucket| build_bucket(&bucket.platform, bucket.products.iter().collect(), limit))
        .collect()
}

fn build_bucket(platform: &str, members: Vec<&Offer>, limit: usize) -> BucketView {
    let total = members.len();
    BucketView {
        platform: platform.to_string(),
        total,
        shown: members.into_iter().take(limit).cloned().collect(),
        hidden: total.saturating_sub(limit),
    }
}

/// Classifies a platform row against the overall best deal.
pub fn price_badge(summary: &PlatformSummary) -> PriceBadge {
    match summary.difference_value {
        Some(value) if value < BEST_PRICE_THRESHOLD => PriceBadge::BestPrice,
        Some(_) => PriceBadge::Delta(format!("+{}", summary.difference_label)),
        None => PriceBadge::Unranked,
    }
}

fn platform_row(summary: &PlatformSummary) -> PlatformRowView {
    PlatformRowView {
        platform: summary.platform.clone(),
        badge: price_badge(summary),
        price: summary.cheapest.price.clone(),
        title: summary.cheapest.title.clone(),
        url: summary.cheapest.url.clone(),
        rating: summary.cheapest.display_rating().map(ToOwned::to_owned),
        count: summary.count,
        average_price: summary.average_price.clone(),
    }
}

fn savings_line(savings: Option<&str>, percent: Option<&str>) -> Option<String> {
    match (savings, percent) {
        (Some(amount), Some(percent)) => Some(format!("Save {amount} ({percent})")),
        (Some(amount), None) => Some(format!("Save {amount}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(platform: &str, title: &str) -> Offer {
        Offer {
            platform: platform.to_string(),
            title: title.to_string(),
            price: "$10".to_string(),
            url: format!("https://{platform}.example.com/{title}"),
            ..Offer::default()
        }
    }

    fn summary(difference_value: Option<f64>, label: &str) -> PlatformSummary {
        PlatformSummary {
            platform: "Flipkart".to_string(),
            difference_value,
            difference_label: label.to_string(),
            ..PlatformSummary::default()
        }
    }

    #[test]
    fn bucket_of_seven_shows_five_and_counts_rest() {
        let offers: Vec<_> = (0..7).map(|i| offer("Amazon", &format!("item{i}"))).collect();
        let buckets = bucket_offers(&offers, BUCKET_DISPLAY_LIMIT);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total, 7);
        assert_eq!(buckets[0].shown.len(), 5);
        assert_eq!(buckets[0].shown[0].title, "item0");
        assert_eq!(buckets[0].shown[4].title, "item4");
        assert_eq!(buckets[0].hidden, 2);
        assert_eq!(
            buckets[0].more_label().as_deref(),
            Some("+2 more offers available")
        );
    }

    #[test]
    fn bucket_of_three_has_no_indicator() {
        let offers: Vec<_> = (0..3).map(|i| offer("eBay", &format!("item{i}"))).collect();
        let buckets = bucket_offers(&offers, BUCKET_DISPLAY_LIMIT);

        assert_eq!(buckets[0].shown.len(), 3);
        assert_eq!(buckets[0].hidden, 0);
        assert_eq!(buckets[0].more_label(), None);
    }

    #[test]
    fn buckets_keep_first_seen_platform_order() {
        let offers = vec![
            offer("Flipkart", "a"),
            offer("Amazon", "b"),
            offer("Flipkart", "c"),
        ];
        let buckets = bucket_offers(&offers, BUCKET_DISPLAY_LIMIT);
        let platforms: Vec<_> = buckets.iter().map(|b| b.platform.as_str()).collect();
        assert_eq!(platforms, vec!["Flipkart", "Amazon"]);
        assert_eq!(buckets[0].shown[1].title, "c");
    }

    #[test]
    fn badge_threshold() {
        assert_eq!(price_badge(&summary(Some(0.0), "Best price")), PriceBadge::BestPrice);
        assert_eq!(price_badge(&summary(Some(0.99), "₹0.99")), PriceBadge::BestPrice);
        assert_eq!(
            price_badge(&summary(Some(1.5), "₹1.50")),
            PriceBadge::Delta("+₹1.50".to_string())
        );
        assert_eq!(price_badge(&summary(None, "")), PriceBadge::Unranked);
        assert_eq!(PriceBadge::Unranked.label(), None);
    }

    #[test]
    fn savings_line_needs_an_amount() {
        assert_eq!(
            savings_line(Some("₹3,000"), Some("3%")).as_deref(),
            Some("Save ₹3,000 (3%)")
        );
        assert_eq!(savings_line(None, Some("3%")), None);
    }
}
