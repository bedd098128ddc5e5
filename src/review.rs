use serde::Deserialize;

use crate::votes::Votes;

const UNKNOWN_PRODUCT: &str = "unknown";

/// Defines the JSON format for one product review.
///
/// Field names follow the review-dump convention (`asin`, `reviewText`, and
/// so on); any field absent from the input takes the [`Default`] value, and
/// unrecognized fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Review {
    #[serde(rename = "asin")]
    pub product_id: String,
    #[serde(rename = "reviewText")]
    pub text: String,
    #[serde(rename = "overall")]
    pub rating: f64,
    #[serde(rename = "unixReviewTime")]
    pub timestamp: i64,
    #[serde(rename = "vote")]
    pub votes: Votes,
}

impl Review {
    /// Returns the rating weighted by helpfulness votes.
    ///
    /// A review with votes counts for `rating * votes`; a review nobody voted
    /// on counts for its raw rating.
    #[must_use]
    pub fn weighted_rating(&self) -> f64 {
        match self.votes.count() {
            0 => self.rating,
            votes => self.rating * f64::from(votes),
        }
    }
}

impl Default for Review {
    fn default() -> Self {
        Self {
            product_id: UNKNOWN_PRODUCT.to_string(),
            text: String::new(),
            rating: 0.0,
            timestamp: 0,
            votes: Votes::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializing_fills_absent_fields_with_defaults() {
        let review: Review = serde_json::from_str("{}").unwrap();
        assert_eq!(review, Review::default());
        assert_eq!(review.product_id, "unknown");
        assert_eq!(review.text, "");
        assert_eq!(review.rating, 0.0);
        assert_eq!(review.timestamp, 0);
        assert_eq!(review.votes.count(), 0);
    }

    #[test]
    fn deserializing_maps_wire_field_names() {
        let line = r#"{"asin":"B001","reviewText":"Solid.","overall":4.0,"unixReviewTime":1000,"vote":"2"}"#;
        let review: Review = serde_json::from_str(line).unwrap();
        assert_eq!(review.product_id, "B001");
        assert_eq!(review.text, "Solid.");
        assert_eq!(review.rating, 4.0);
        assert_eq!(review.timestamp, 1000);
        assert_eq!(review.votes.count(), 2);
    }

    #[test]
    fn deserializing_ignores_unrecognized_fields() {
        let line = r#"{"asin":"B001","reviewerName":"Pat","style":{"Format:":"Hardcover"}}"#;
        let review: Review = serde_json::from_str(line).unwrap();
        assert_eq!(review.product_id, "B001");
    }

    #[test]
    fn weighted_rating_fn_multiplies_by_positive_votes() {
        let review = Review {
            rating: 4.0,
            votes: 2.into(),
            ..Review::default()
        };
        assert_eq!(review.weighted_rating(), 8.0);
    }

    #[test]
    fn weighted_rating_fn_falls_back_to_raw_rating_without_votes() {
        let review = Review {
            rating: 5.0,
            ..Review::default()
        };
        assert_eq!(review.weighted_rating(), 5.0);
    }
}
