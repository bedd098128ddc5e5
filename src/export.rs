use anyhow::{Context, Result};
use csv::{Terminator, WriterBuilder};

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use crate::query::Row;

/// Default file name for exported popularity rankings.
pub const POPULARITY_FILE: &str = "popular_products.csv";
/// Default file name for exported weighted-rating rankings.
pub const WEIGHTED_RATING_FILE: &str = "weighted_ratings.csv";
/// Default file name for exported time-windowed rankings.
pub const PERIOD_FILE: &str = "popular_in_period.csv";
/// Default file name for exported text-search results.
pub const SEARCH_FILE: &str = "search_results.csv";

/// Builds the destination path for an export: the stem of the source review
/// file, an underscore, and the query's default file name, inside `dir`.
///
/// ```
/// use std::path::Path;
/// use reviews::export;
///
/// let path = export::export_path(
///     Path::new("out"),
///     Path::new("data/electronics.json"),
///     export::POPULARITY_FILE,
/// );
/// assert_eq!(path, Path::new("out/electronics_popular_products.csv"));
/// ```
#[must_use]
pub fn export_path(dir: &Path, source: &Path, file_name: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .unwrap_or_else(|| OsStr::new("reviews"))
        .to_string_lossy();
    dir.join(format!("{stem}_{file_name}"))
}

/// Writes result rows to `path`, one row per line, fields joined by `;`.
///
/// Lines end with the platform terminator (CRLF on Windows). Fields that
/// contain the separator are quoted so they survive a round trip. An existing
/// file at `path` is replaced without confirmation.
///
/// # Errors
///
/// Returns any errors from creating or writing the file.
pub fn write_rows(path: &Path, rows: &[Row]) -> Result<()> {
    let terminator = if cfg!(windows) {
        Terminator::CRLF
    } else {
        Terminator::Any(b'\n')
    };
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .terminator(terminator)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer
            .write_record(row)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(product: &str, value: &str) -> Row {
        [product.to_string(), value.to_string()]
    }

    #[test]
    fn export_path_fn_joins_stem_and_default_name() {
        let path = export_path(
            Path::new("/tmp/out"),
            Path::new("data/Appliances_5.json"),
            SEARCH_FILE,
        );
        assert_eq!(
            path,
            Path::new("/tmp/out/Appliances_5_search_results.csv")
        );
    }

    #[test]
    fn write_rows_fn_writes_one_semicolon_joined_line_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let rows = vec![row("B001", "3"), row("B002", "2"), row("B003", "")];
        write_rows(&path, &rows).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["B001;3", "B002;2", "B003;"]);
        for line in lines {
            assert_eq!(line.split(';').count(), 2, "bad line: {line}");
        }
    }

    #[test]
    fn write_rows_fn_round_trips_fields_containing_the_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let rows = vec![
            row("B001", "plain text"),
            row("B002", "semi;colon survives"),
        ];
        write_rows(&path, &rows).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let read_back: Vec<Row> = reader
            .records()
            .map(|record| {
                let record = record.unwrap();
                [record[0].to_string(), record[1].to_string()]
            })
            .collect();
        assert_eq!(read_back, rows);
    }

    #[test]
    fn write_rows_fn_replaces_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        write_rows(&path, &[row("OLD", "1"), row("OLD", "2")]).unwrap();
        write_rows(&path, &[row("NEW", "1")]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.starts_with("NEW"));
    }

    #[test]
    fn write_rows_fn_reports_unwritable_destinations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_subdir").join("rows.csv");
        let err = write_rows(&path, &[row("B001", "1")]).unwrap_err();
        assert!(format!("{err:#}").contains("creating"), "got: {err:#}");
    }
}
