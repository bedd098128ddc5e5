use anyhow::{bail, Context, Result};

use std::{
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use crate::{
    dataset::Dataset,
    dates, export,
    query::{self, Row},
};

/// Menu selections understood by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Popularity,
    WeightedRating,
    PopularInPeriod,
    SearchText,
    Quit,
    Invalid,
}

impl Choice {
    /// Parses a line of menu input into a selection.
    fn parse(input: &str) -> Self {
        match input.trim().parse::<u32>() {
            Ok(1) => Self::Popularity,
            Ok(2) => Self::WeightedRating,
            Ok(3) => Self::PopularInPeriod,
            Ok(4) => Self::SearchText,
            Ok(0) => Self::Quit,
            _ => Self::Invalid,
        }
    }
}

/// Runs the interactive session: prompts, menu loop, queries, exports.
///
/// The shell reads user input from `R` and writes the whole transcript to
/// `W`, so a session can be scripted in tests with a cursor and a byte
/// buffer; the binary connects it to stdin and stdout.
pub struct Shell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Runs one complete session over a review file.
    ///
    /// `review_file` and `export_dir` may be supplied up front (say, from
    /// command-line arguments); the shell prompts for whichever is missing.
    /// The session then loops on the menu until the user picks `0`.
    ///
    /// # Errors
    ///
    /// Returns errors that end the session: a failed load (missing file,
    /// wrong extension, malformed line), a failed export-directory creation,
    /// an unwritable output stream, or end of input on a prompt. Query-level
    /// failures are reported to the transcript instead and the menu
    /// continues.
    pub fn run(
        &mut self,
        review_file: Option<PathBuf>,
        export_dir: Option<PathBuf>,
    ) -> Result<()> {
        let review_file = match review_file {
            Some(path) => path,
            None => {
                PathBuf::from(self.prompt_line("Path to the review file (.json):")?.trim())
            }
        };
        let dataset = Dataset::from_jsonl(&review_file)?;
        if dataset.is_empty() {
            writeln!(self.output, "No reviews found in {}", review_file.display())?;
            return Ok(());
        }
        writeln!(
            self.output,
            "Loaded {} reviews from {}",
            dataset.len(),
            review_file.display()
        )?;

        let export_dir = match export_dir {
            Some(path) => path,
            None => {
                PathBuf::from(self.prompt_line("Directory for exported CSV files:")?.trim())
            }
        };
        if !export_dir.exists() {
            fs::create_dir_all(&export_dir)
                .with_context(|| format!("creating directory {}", export_dir.display()))?;
            writeln!(self.output, "Created directory {}", export_dir.display())?;
        }

        loop {
            self.show_menu()?;
            match Choice::parse(&self.read_line()?) {
                Choice::Popularity => self.run_popularity(&dataset, &review_file, &export_dir)?,
                Choice::WeightedRating => {
                    self.run_weighted_rating(&dataset, &review_file, &export_dir)?;
                }
                Choice::PopularInPeriod => {
                    self.run_popular_in_period(&dataset, &review_file, &export_dir)?;
                }
                Choice::SearchText => self.run_search(&dataset, &review_file, &export_dir)?,
                Choice::Quit => {
                    writeln!(self.output, "Bye.")?;
                    return Ok(());
                }
                Choice::Invalid => writeln!(self.output, "Invalid choice, try again.")?,
            }
        }
    }

    fn show_menu(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Choose an action:")?;
        writeln!(self.output, "1. Products by review count")?;
        writeln!(self.output, "2. Products by weighted rating")?;
        writeln!(self.output, "3. Most reviewed products in a period")?;
        writeln!(self.output, "4. Search reviews by text")?;
        writeln!(self.output, "0. Quit")?;
        write!(self.output, "Your choice: ")?;
        self.output.flush()?;
        Ok(())
    }

    fn run_popularity(&mut self, dataset: &Dataset, source: &Path, dir: &Path) -> Result<()> {
        let limit = self.prompt_limit()?;
        let rows = query::by_popularity(dataset.reviews(), limit);
        writeln!(self.output)?;
        writeln!(self.output, "Products by review count:")?;
        for row in &rows {
            writeln!(self.output, "{}: {} reviews", row[0], row[1])?;
        }
        self.offer_export(&rows, source, dir, export::POPULARITY_FILE)
    }

    fn run_weighted_rating(&mut self, dataset: &Dataset, source: &Path, dir: &Path) -> Result<()> {
        let limit = self.prompt_limit()?;
        let rows = query::by_weighted_rating(dataset.reviews(), limit);
        writeln!(self.output)?;
        writeln!(self.output, "Products by weighted rating:")?;
        for row in &rows {
            writeln!(self.output, "{}: {} rating", row[0], row[1])?;
        }
        self.offer_export(&rows, source, dir, export::WEIGHTED_RATING_FILE)
    }

    fn run_popular_in_period(
        &mut self,
        dataset: &Dataset,
        source: &Path,
        dir: &Path,
    ) -> Result<()> {
        let start = self.prompt_line("Start date (dd.mm.yyyy):")?;
        let end = self.prompt_line("End date (dd.mm.yyyy):")?;
        let (start, end) = match dates::period_bounds(&start, &end) {
            Ok(bounds) => bounds,
            Err(err) => {
                writeln!(self.output, "Error: {err:#}")?;
                return Ok(());
            }
        };
        let limit = self.prompt_limit()?;
        let rows = query::popular_in_period(dataset.reviews(), start, end, limit);
        writeln!(self.output)?;
        writeln!(self.output, "Most reviewed products in the period:")?;
        for row in &rows {
            writeln!(self.output, "{}: {} reviews", row[0], row[1])?;
        }
        self.offer_export(&rows, source, dir, export::PERIOD_FILE)
    }

    fn run_search(&mut self, dataset: &Dataset, source: &Path, dir: &Path) -> Result<()> {
        let text = self.prompt_line("Text to search for in reviews:")?;
        let limit = self.prompt_limit()?;
        let rows = match query::search_text(dataset.reviews(), &text, limit) {
            Ok(rows) => rows,
            Err(err) => {
                writeln!(self.output, "Error: {err:#}")?;
                return Ok(());
            }
        };
        writeln!(self.output)?;
        writeln!(self.output, "Matching reviews:")?;
        for row in &rows {
            writeln!(self.output, "{}: {}", row[0], row[1])?;
        }
        self.offer_export(&rows, source, dir, export::SEARCH_FILE)
    }

    /// Asks whether to save a non-empty result set, and exports it on `y`.
    ///
    /// Export failures are reported to the transcript; the session carries
    /// on either way.
    fn offer_export(&mut self, rows: &[Row], source: &Path, dir: &Path, name: &str) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let answer = self.prompt_line("Save these results to a CSV file? (y/n):")?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            return Ok(());
        }
        let path = export::export_path(dir, source, name);
        match export::write_rows(&path, rows) {
            Ok(()) => writeln!(self.output, "Results saved to {}", path.display())?,
            Err(err) => writeln!(self.output, "Error: {err:#}")?,
        }
        Ok(())
    }

    /// Prompts until the user supplies a positive result limit.
    fn prompt_limit(&mut self) -> Result<usize> {
        writeln!(self.output, "Maximum number of results:")?;
        self.output.flush()?;
        loop {
            match self.read_line()?.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => return Ok(limit),
                Ok(_) => writeln!(self.output, "The limit must be greater than zero, try again:")?,
                Err(_) => writeln!(self.output, "Enter a positive whole number:")?,
            }
            self.output.flush()?;
        }
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<String> {
        writeln!(self.output, "{prompt}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Reads one line with the terminator stripped. Other whitespace is
    /// kept, so search text reaches the query exactly as typed; prompts
    /// that want tidier input trim at the call site.
    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("unexpected end of input");
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}
