use anyhow::{bail, Context, Result};

use std::{
    ffi::OsStr,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::review::Review;

/// Holds the review collection for one session.
///
/// A `Dataset` is loaded once, up front, with [`Dataset::from_jsonl`], and is
/// read-only from then on: queries borrow the reviews as a shared slice and
/// nothing ever mutates them.
#[derive(Debug, Default)]
pub struct Dataset {
    reviews: Vec<Review>,
}

impl Dataset {
    /// Reads review data from the JSON Lines file at `path`.
    ///
    /// Each non-blank line must be one self-contained JSON object; see
    /// [`Review`] for the recognized fields and their defaults. Reviews are
    /// returned in file order.
    ///
    /// # Errors
    ///
    /// Returns errors if:
    /// * `path` does not exist
    /// * `path` does not have a `.json` extension
    /// * The file cannot be opened or read
    /// * Any non-blank line is not a well-formed review object (the error
    ///   names the offending line)
    pub fn from_jsonl(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("review file not found: {}", path.display());
        }
        if path.extension() != Some(OsStr::new("json")) {
            bail!(
                "unsupported file format: {} (expected a .json review file)",
                path.display()
            );
        }
        let file = BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        );
        Self::from_reader(file).with_context(|| format!("reading {}", path.display()))
    }

    /// Reads review data, one JSON object per line, from any buffered source.
    ///
    /// Blank lines are skipped. The first malformed line aborts the load;
    /// its 1-based line number is attached to the error.
    ///
    /// # Errors
    ///
    /// Returns any errors from reading `input` or parsing a line.
    pub fn from_reader(input: impl BufRead) -> Result<Self> {
        let mut reviews = Vec::new();
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let review = serde_json::from_str(line)
                .with_context(|| format!("line {}: malformed review", index + 1))?;
            reviews.push(review);
        }
        Ok(Self { reviews })
    }

    /// Returns the loaded reviews, in file order.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Returns the number of loaded reviews.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    /// Reports whether the dataset contains no reviews.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_jsonl_fn_loads_reviews_in_file_order() {
        let dataset = Dataset::from_jsonl("testdata/reviews.json").unwrap();
        assert_eq!(dataset.len(), 9, "wrong review count");
        assert_eq!(dataset.reviews()[0].product_id, "B00004T2X0");
        assert_eq!(dataset.reviews()[8].product_id, "B00007E7JU");
    }

    #[test]
    fn from_jsonl_fn_applies_defaults_to_sparse_records() {
        let dataset = Dataset::from_jsonl("testdata/reviews.json").unwrap();
        let sparse = &dataset.reviews()[5];
        assert_eq!(sparse.product_id, "unknown");
        assert_eq!(sparse.rating, 0.0);
        assert_eq!(sparse.timestamp, 0);
        assert_eq!(sparse.votes.count(), 0);
    }

    #[test]
    fn from_jsonl_fn_parses_comma_separated_vote_counts() {
        let dataset = Dataset::from_jsonl("testdata/reviews.json").unwrap();
        assert_eq!(dataset.reviews()[2].votes.count(), 1024);
    }

    #[test]
    fn from_jsonl_fn_returns_error_for_missing_file() {
        let err = Dataset::from_jsonl("testdata/no_such_file.json").unwrap_err();
        assert!(err.to_string().contains("not found"), "got: {err:#}");
    }

    #[test]
    fn from_jsonl_fn_returns_error_for_wrong_extension() {
        let err = Dataset::from_jsonl("testdata/reviews.txt").unwrap_err();
        assert!(err.to_string().contains("unsupported"), "got: {err:#}");
    }

    #[test]
    fn from_jsonl_fn_aborts_on_first_malformed_line() {
        let err = Dataset::from_jsonl("testdata/reviews.bad.json").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "got: {err:#}");
    }

    #[test]
    fn from_jsonl_fn_loads_blank_file_as_empty_dataset() {
        let dataset = Dataset::from_jsonl("testdata/empty.json").unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn from_reader_fn_skips_blank_lines() {
        let input = "\n{\"asin\":\"B001\"}\n   \n\n{\"asin\":\"B002\"}\n";
        let dataset = Dataset::from_reader(input.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn from_reader_fn_rejects_non_object_lines() {
        assert!(Dataset::from_reader("[1, 2, 3]".as_bytes()).is_err());
    }

    #[test]
    fn from_reader_fn_rejects_non_numeric_vote_strings() {
        let input = r#"{"asin":"B001","vote":"many"}"#;
        let err = Dataset::from_reader(input.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 1"), "got: {err:#}");
    }
}
