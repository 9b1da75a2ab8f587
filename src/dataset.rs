//! Labeled review data loading.
//!
//! The data file is CSV with a header row, review text in the first column and
//! a numeric label in the second:
//!
//! ```csv
//! text,label
//! "Great product, works as described",0
//! BUY NOW free money!!!,1
//! ```
//!
//! Rows that cannot be used are skipped and counted rather than failing the
//! whole load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Result, VeracityError};
use crate::ml::types::{Label, NUM_CLASSES, RawRecord};

/// Records read from a data file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    /// Usable records in file order.
    pub records: Vec<RawRecord>,
    /// Number of rows that were skipped.
    pub skipped: usize,
}

impl Dataset {
    /// Number of usable records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records were loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records per label, in [`Label::index`] order.
    pub fn label_counts(&self) -> [usize; NUM_CLASSES] {
        let mut counts = [0; NUM_CLASSES];
        for record in &self.records {
            counts[record.label.index()] += 1;
        }
        counts
    }
}

/// Reads [`RawRecord`]s from CSV.
#[derive(Debug, Clone)]
pub struct CsvRecordReader {
    /// CSV delimiter character (default: ',')
    delimiter: u8,
    /// Whether the first row is a header (default: true)
    has_headers: bool,
    /// Column holding the review text.
    text_column: usize,
    /// Column holding the label.
    label_column: usize,
}

impl Default for CsvRecordReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvRecordReader {
    /// Create a reader for comma separated files with a header row.
    pub fn new() -> Self {
        CsvRecordReader {
            delimiter: b',',
            has_headers: true,
            text_column: 0,
            label_column: 1,
        }
    }

    /// Set a custom delimiter character.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the first row is a header.
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Set the text and label columns.
    pub fn with_columns(mut self, text_column: usize, label_column: usize) -> Self {
        self.text_column = text_column;
        self.label_column = label_column;
        self
    }

    /// Read all usable records.
    ///
    /// Short or undecodable rows are skipped with a warning. Fails with
    /// `InvalidInput` when no usable row remains.
    pub fn read<R: Read>(&self, input: R) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let required = self.text_column.max(self.label_column) + 1;
        let mut dataset = Dataset::default();

        for (row, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(row as u64 + 1);
                    skip(&mut dataset, VeracityError::malformed_record(line, e.to_string()));
                    continue;
                }
            };

            let line = record.position().map(|p| p.line()).unwrap_or(row as u64 + 1);
            match (record.get(self.text_column), record.get(self.label_column)) {
                (Some(text), Some(label)) => dataset
                    .records
                    .push(RawRecord::new(text, Label::from_raw(label))),
                _ => skip(
                    &mut dataset,
                    VeracityError::malformed_record(
                        line,
                        format!("expected at least {required} columns, found {}", record.len()),
                    ),
                ),
            }
        }

        if dataset.skipped > 0 {
            warn!("Skipped {} unusable rows", dataset.skipped);
        }
        if dataset.is_empty() {
            return Err(VeracityError::invalid_input("data file contains no usable rows"));
        }

        Ok(dataset)
    }

    /// Read all usable records from a file.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            VeracityError::invalid_input(format!(
                "cannot open data file {}: {e}",
                path.display()
            ))
        })?;

        let dataset = self.read(file)?;
        let [genuine, fake] = dataset.label_counts();
        info!(
            "Loaded {} records from {} ({genuine} genuine, {fake} fake)",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }
}

fn skip(dataset: &mut Dataset, reason: VeracityError) {
    debug!("Skipping row: {reason}");
    dataset.skipped += 1;
}

/// Load labeled records from a CSV file with the default layout.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    Ok(CsvRecordReader::new().load(path)?.records)
}

/// Shuffle `records` with a seeded RNG and split off a test set.
///
/// The test set holds `ceil(len * test_fraction)` records, adjusted so that
/// both sides keep at least one record. The same seed always produces the
/// same split.
pub fn train_test_split(
    records: &[RawRecord],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<RawRecord>, Vec<RawRecord>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(VeracityError::invalid_input(format!(
            "test fraction must be between 0 and 1 (exclusive), got {test_fraction}"
        )));
    }
    if records.len() < 2 {
        return Err(VeracityError::invalid_input(format!(
            "need at least 2 records to split, got {}",
            records.len()
        )));
    }

    let n_test = ((records.len() as f64 * test_fraction).ceil() as usize).clamp(1, records.len() - 1);

    let mut indices: Vec<usize> = (0..records.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_indices, train_indices) = indices.split_at(n_test);
    let pick = |indices: &[usize]| -> Vec<RawRecord> {
        indices.iter().map(|&i| records[i].clone()).collect()
    };

    debug!(
        "Split {} records into {} train / {} test (seed {seed})",
        records.len(),
        train_indices.len(),
        test_indices.len()
    );

    Ok((pick(train_indices), pick(test_indices)))
}
