use anyhow::Result;
use regex::RegexBuilder;

use std::collections::BTreeMap;

use crate::review::Review;

/// A single query result: a product id paired with its display value.
///
/// Counts are rendered as plain integers, weighted ratings to two decimal
/// places, and text-search rows carry the review text itself.
pub type Row = [String; 2];

/// Returns products ranked by review count, descending.
///
/// Products with identical counts are ordered by product id. At most `limit`
/// rows are returned.
///
/// # Examples
///
/// ```
/// use reviews::{query, Review};
///
/// let data = vec![
///     Review { product_id: "B002".into(), rating: 4.0, ..Review::default() },
///     Review { product_id: "B001".into(), rating: 5.0, ..Review::default() },
///     Review { product_id: "B001".into(), rating: 3.0, ..Review::default() },
/// ];
/// let rows = query::by_popularity(&data, 2);
/// assert_eq!(rows[0], ["B001".to_string(), "2".to_string()]);
/// assert_eq!(rows[1], ["B002".to_string(), "1".to_string()]);
/// ```
#[must_use]
pub fn by_popularity(reviews: &[Review], limit: usize) -> Vec<Row> {
    top_counts(reviews.iter(), limit)
}

/// Returns products ranked by mean weighted rating, descending.
///
/// Each review contributes its [`Review::weighted_rating`]; the per-product
/// value is the arithmetic mean over that product's reviews, rendered to two
/// decimal places. Products with identical means are ordered by product id.
/// At most `limit` rows are returned.
#[must_use]
pub fn by_weighted_rating(reviews: &[Review], limit: usize) -> Vec<Row> {
    let mut totals: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    for review in reviews {
        let entry = totals.entry(review.product_id.as_str()).or_insert((0.0, 0));
        entry.0 += review.weighted_rating();
        entry.1 += 1;
    }
    let mut ranked: Vec<(&str, f64)> = totals
        .into_iter()
        .map(|(product, (sum, count))| (product, sum / f64::from(count)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(product, mean)| [product.to_string(), format!("{mean:.2}")])
        .collect()
}

/// Returns products ranked by review count within `[start, end)`, descending.
///
/// The window is half-open over review timestamps (epoch seconds): a review
/// stamped exactly `start` is counted, one stamped exactly `end` is not.
/// Ranking and tie-breaking match [`by_popularity`].
#[must_use]
pub fn popular_in_period(reviews: &[Review], start: i64, end: i64, limit: usize) -> Vec<Row> {
    top_counts(
        reviews
            .iter()
            .filter(|r| r.timestamp >= start && r.timestamp < end),
        limit,
    )
}

/// Returns reviews whose text contains `text`, preserving collection order.
///
/// Matching is case-insensitive, and `text` is always taken literally, never
/// as a pattern. Each row is the product id and the full review text. At most
/// `limit` rows are returned.
///
/// # Errors
///
/// Returns an error if the match pattern cannot be compiled (in practice only
/// for absurdly long search strings).
pub fn search_text(reviews: &[Review], text: &str, limit: usize) -> Result<Vec<Row>> {
    let matcher = RegexBuilder::new(&regex::escape(text))
        .case_insensitive(true)
        .build()?;
    Ok(reviews
        .iter()
        .filter(|r| matcher.is_match(&r.text))
        .take(limit)
        .map(|r| [r.product_id.clone(), r.text.clone()])
        .collect())
}

/// Counts reviews per product and ranks descending, ties in product-id order.
///
/// `BTreeMap` iteration hands the products over already sorted by id, and the
/// sort is stable, so equal counts keep that order.
fn top_counts<'a>(reviews: impl Iterator<Item = &'a Review>, limit: usize) -> Vec<Row> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for review in reviews {
        *counts.entry(review.product_id.as_str()).or_default() += 1;
    }
    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(product, count)| [product.to_string(), count.to_string()])
        .collect()
}
