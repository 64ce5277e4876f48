use crate::error::{PipelineError, Result};
use crate::structs::{AuthorRatings, AuthorRecord, CanonicalBook, DecadeCount, RawBook};
use csv::{Reader, StringRecord, Writer};
use log::debug;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Marker substring identifying raw book data files.
const RAW_MARKER: &str = "RAW";
/// Marker substring identifying the author lookup file.
const AUTHOR_MARKER: &str = "AUTHORS";

/// Columns every raw book file must carry. The first three are index
/// artifacts of prior exports; they must be present (anything else is
/// schema drift) but are dropped on deserialization.
pub const RAW_COLUMNS: [&str; 8] = [
    "index",
    "Unnamed: 0",
    "Unnamed: 0.1",
    "book_title",
    "year",
    "Rating",
    "ratings",
    "author_id",
];

/// Columns of the author lookup file.
pub const AUTHOR_COLUMNS: [&str; 2] = ["author_id", "name"];

/// Canonical output schema, in export order.
pub const CANONICAL_COLUMNS: [&str; 5] = [
    "book_title",
    "author_name",
    "year_released",
    "rating",
    "ratings_count",
];

const DECADE_COLUMNS: [&str; 2] = ["decade", "count"];
const TOP_AUTHOR_COLUMNS: [&str; 2] = ["author_name", "ratings_count"];

/// Scans a directory for input files by naming convention.
///
/// A file whose name contains `AUTHORS` is the author lookup; a file whose
/// name contains `RAW` is a raw book source. Raw files are returned in
/// lexicographic filename order so concatenation order does not depend on
/// the filesystem's directory listing order.
///
/// # Arguments
/// * `data_dir` - Directory containing the input CSV files
///
/// # Returns
/// Returns the sorted raw file paths and the single author file path.
///
/// # Errors
/// Returns error if the directory cannot be read, no raw file matches,
/// no author file matches, or more than one author file matches.
pub fn discover_inputs(data_dir: &Path) -> Result<(Vec<PathBuf>, PathBuf)> {
    let mut raw_files: Vec<PathBuf> = Vec::new();
    let mut author_files: Vec<PathBuf> = Vec::new();

    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains(AUTHOR_MARKER) {
            author_files.push(entry.path());
        } else if name.contains(RAW_MARKER) {
            raw_files.push(entry.path());
        }
    }
    raw_files.sort();
    author_files.sort();

    if raw_files.is_empty() {
        return Err(PipelineError::NoRawFiles(data_dir.to_path_buf()));
    }
    if author_files.len() > 1 {
        // Picking one arbitrarily would make runs irreproducible.
        let names = author_files
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        return Err(PipelineError::AmbiguousAuthorFiles(names));
    }
    let Some(author_file) = author_files.pop() else {
        return Err(PipelineError::MissingAuthorFile(data_dir.to_path_buf()));
    };

    Ok((raw_files, author_file))
}

/// Checks that a CSV header carries exactly the expected column set, in
/// any order. Serde matches fields by header name, so column order is
/// irrelevant, but a missing or extra column means the file does not have
/// the assumed shape.
fn validate_header(headers: &StringRecord, expected: &[&str], file: &Path) -> Result<()> {
    let mut found: Vec<&str> = headers.iter().collect();
    found.sort_unstable();
    let mut want: Vec<&str> = expected.to_vec();
    want.sort_unstable();
    if found != want {
        return Err(PipelineError::Schema(format!(
            "{}: expected columns {:?}, found {:?}",
            file.display(),
            expected,
            headers.iter().collect::<Vec<&str>>()
        )));
    }
    Ok(())
}

/// Reads and concatenates the raw book source files.
///
/// Rows are concatenated in the given file order, preserving row order
/// within each file. Every file's header is validated against
/// [`RAW_COLUMNS`], so divergent schemas across sources fail before any
/// row is read.
///
/// # Arguments
/// * `paths` - Raw file paths, already in deterministic order
///
/// # Returns
/// Returns all raw rows as one table.
///
/// # Errors
/// Returns error if a file cannot be read, fails CSV parsing, or does not
/// carry the expected raw schema.
pub fn read_raw_files(paths: &[PathBuf]) -> Result<Vec<RawBook>> {
    let mut rows: Vec<RawBook> = Vec::new();
    for path in paths {
        let mut reader = Reader::from_path(path)?;
        validate_header(reader.headers()?, &RAW_COLUMNS, path)?;
        for record in reader.deserialize() {
            rows.push(record?);
        }
        debug!("Read {} ({} rows total)", path.display(), rows.len());
    }
    Ok(rows)
}

/// Reads the author lookup table.
///
/// # Arguments
/// * `path` - Path of the author lookup CSV
///
/// # Returns
/// Returns the identifier-to-display-name records.
///
/// # Errors
/// Returns error if the file cannot be read, fails CSV parsing, or does
/// not carry exactly the `author_id` and `name` columns.
pub fn read_authors(path: &Path) -> Result<Vec<AuthorRecord>> {
    let mut reader = Reader::from_path(path)?;
    validate_header(reader.headers()?, &AUTHOR_COLUMNS, path)?;
    let mut authors: Vec<AuthorRecord> = Vec::new();
    for record in reader.deserialize() {
        authors.push(record?);
    }
    Ok(authors)
}

/// Reads a processed CSV back into canonical records for the analysis
/// step.
///
/// # Errors
/// Returns error if the file cannot be read or a row does not match the
/// canonical schema.
pub fn read_processed(path: &Path) -> Result<Vec<CanonicalBook>> {
    let mut reader = Reader::from_path(path)?;
    let mut rows: Vec<CanonicalBook> = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Writes the canonical book table to a CSV file.
///
/// The header row and column order come from the [`CanonicalBook`] field
/// declarations. No row-index column is written; an existing file at the
/// path is overwritten.
///
/// # Arguments
/// * `results` - Final sorted canonical records
/// * `output_path` - Path where the CSV file will be created
///
/// # Returns
/// Returns `Ok(())` on success.
///
/// # Errors
/// Returns error if the file cannot be created or written to.
pub fn write_csv(results: &[CanonicalBook], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);
    if results.is_empty() {
        writer.write_record(CANONICAL_COLUMNS)?;
    }
    for row in results {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the decade-release summary table to a CSV file.
///
/// # Errors
/// Returns error if the file cannot be created or written to.
pub fn write_decade_releases(decades: &[DecadeCount], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);
    if decades.is_empty() {
        writer.write_record(DECADE_COLUMNS)?;
    }
    for row in decades {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the top-authors summary table to a CSV file.
///
/// # Errors
/// Returns error if the file cannot be created or written to.
pub fn write_top_authors(authors: &[AuthorRatings], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);
    if authors.is_empty() {
        writer.write_record(TOP_AUTHOR_COLUMNS)?;
    }
    for row in authors {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Rejects output paths that do not contain exactly one `.csv` occurrence.
pub fn validate_output_path(path: &str) -> Result<()> {
    if path.matches(".csv").count() != 1 {
        return Err(PipelineError::InvalidOutputPath(path.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_with_one_csv_suffix_is_accepted() {
        assert!(validate_output_path("PROCESSED_DATA.csv").is_ok());
        assert!(validate_output_path("out/books.csv").is_ok());
    }

    #[test]
    fn output_path_without_csv_is_rejected() {
        assert!(matches!(
            validate_output_path("books.txt"),
            Err(PipelineError::InvalidOutputPath(_))
        ));
    }

    #[test]
    fn output_path_with_repeated_csv_is_rejected() {
        assert!(matches!(
            validate_output_path("books.csv.csv"),
            Err(PipelineError::InvalidOutputPath(_))
        ));
    }
}
