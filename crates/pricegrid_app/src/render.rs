use pricegrid_core::{AppViewModel, BucketView, Metadata, PlatformRowView, SAMPLE_QUERIES};

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(String::new());
    lines.push(format!("PRICEGRID > {}", view.input));

    if view.loading {
        lines.push("Scanning... scraping live marketplaces".to_string());
    }
    if let Some(error) = &view.error {
        lines.push(format!("! {}", error.message));
    }
    if view.show_empty_state {
        lines.push("Start a comparison to see live marketplace results.".to_string());
    }
    if let Some(summary) = &view.result_summary {
        lines.push(summary.clone());
    }

    if let Some(deal) = &view.best_deal {
        lines.push(String::new());
        match &view.price_range {
            Some(range) => lines.push(format!(
                "== Best Offer Right Now ==  (range {} - {})",
                range.min, range.max
            )),
            None => lines.push("== Best Offer Right Now ==".to_string()),
        }
        lines.push(format!("  [{}] {}", deal.platform, deal.title));
        lines.push(with_rating(format!("  {}", deal.price), deal.rating.as_deref()));
        if let Some(savings) = &deal.savings {
            lines.push(format!("  {savings}"));
        }
        lines.push(format!("  {}", deal.url));
    }

    if !view.platforms.is_empty() {
        lines.push(String::new());
        lines.push("== Marketplace Breakdown ==".to_string());
        for row in &view.platforms {
            render_platform_row(&mut lines, row);
        }
    }

    if !view.buckets.is_empty() {
        lines.push(String::new());
        lines.push("== All Validated Offers ==".to_string());
        for bucket in &view.buckets {
            render_bucket(&mut lines, bucket);
        }
    }

    if let Some(metadata) = &view.metadata {
        if let Some(line) = metadata_line(metadata) {
            lines.push(String::new());
            lines.push(line);
        }
    }

    lines
}

pub fn render_samples() -> Vec<String> {
    SAMPLE_QUERIES
        .iter()
        .enumerate()
        .map(|(index, sample)| format!("  {}. {}", index + 1, sample))
        .collect()
}

fn render_platform_row(lines: &mut Vec<String>, row: &PlatformRowView) {
    match row.badge.label() {
        Some(label) => lines.push(format!("  {}  [{}]", row.platform, label)),
        None => lines.push(format!("  {}", row.platform)),
    }
    lines.push(format!("    {}  {}", row.price, row.title));

    let mut facts = Vec::new();
    if let Some(rating) = &row.rating {
        facts.push(rating.clone());
    }
    facts.push(format!("{} offers", row.count));
    if let Some(average) = &row.average_price {
        facts.push(format!("Avg {average}"));
    }
    lines.push(format!("    {}", facts.join(" | ")));
    lines.push(format!("    {}", row.url));
}

fn render_bucket(lines: &mut Vec<String>, bucket: &BucketView) {
    lines.push(format!("  {} ({} offers)", bucket.platform, bucket.total));
    for (rank, offer) in bucket.shown.iter().enumerate() {
        lines.push(with_rating(
            format!("    {}. {}  {}", rank + 1, offer.title, offer.price),
            offer.display_rating(),
        ));
        lines.push(format!("       {}", offer.url));
    }
    if let Some(more) = bucket.more_label() {
        lines.push(format!("    {more}"));
    }
}

fn with_rating(line: String, rating: Option<&str>) -> String {
    match rating {
        Some(rating) => format!("{line}  ({rating})"),
        None => line,
    }
}

fn metadata_line(metadata: &Metadata) -> Option<String> {
    let mut facts = Vec::new();
    match (metadata.platforms_searched, metadata.platforms_succeeded) {
        (Some(searched), Some(succeeded)) => {
            facts.push(format!("{succeeded}/{searched} platforms responded"))
        }
        (Some(searched), None) => facts.push(format!("{searched} platforms searched")),
        _ => {}
    }
    if let Some(elapsed) = metadata.elapsed_time {
        facts.push(format!("server time {elapsed:.1}s"));
    }
    if metadata.from_cache {
        facts.push("cached".to_string());
    }
    if let Some(timestamp) = &metadata.timestamp {
        facts.push(timestamp.clone());
    }
    (!facts.is_empty()).then(|| facts.join(" | "))
}
