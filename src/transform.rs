use crate::error::{PipelineError, Result};
use crate::load;
use crate::structs::{
    AuthorRecord, CanonicalBook, CleanBook, JoinedBook, RawBook, ResolvedBook, TypedBook,
};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// Matches one parenthesized span and any whitespace before it, e.g. the
/// series annotation in `"Dune (Dune Chronicles, #1)"`.
static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^)]*\)").expect("bracket pattern is valid"));

/// Runs the full book-data pipeline against a raw data directory.
///
/// Discovers the raw source files and the author lookup file, concatenates
/// the sources, then pushes the table through each stage in order: row
/// sanitizing, the author join, style conformance, type coercion, the
/// rating sort, and the rename to the canonical output schema. Every stage
/// is a pure table-to-table function; nothing is written to disk here.
///
/// # Arguments
///
/// * `data_dir` - Directory containing the raw book and author CSV files
///
/// # Returns
///
/// Returns a `Result<Vec<CanonicalBook>>` with one record per retained
/// book, sorted by rating descending, ready for export.
///
/// # Errors
///
/// Returns `PipelineError` if:
/// - Input discovery fails (no raw files, no author file, or several)
/// - A file cannot be read or does not carry the expected columns
/// - A cell cannot be coerced to its target scalar type
pub fn process_data(data_dir: &Path) -> Result<Vec<CanonicalBook>> {
    let (raw_paths, author_path) = load::discover_inputs(data_dir)?;
    debug!(
        "Found {} raw files | author lookup: {}",
        raw_paths.len(),
        author_path.display()
    );

    let raw = load::read_raw_files(&raw_paths)?;
    let authors = load::read_authors(&author_path)?;
    println!(
        "Loaded {} raw rows from {} files, {} author records",
        raw.len(),
        raw_paths.len(),
        authors.len()
    );

    let clean = drop_incomplete(raw);
    debug!("{} rows after dropping incomplete rows", clean.len());

    let joined = join_authors(clean, &authors);
    let resolved = drop_unresolved(joined);
    debug!("{} rows after resolving author names", resolved.len());

    let conformed = conform_style(resolved);
    let typed = coerce_types(conformed)?;
    let sorted = sort_by_rating(typed);
    let results = present(sorted);

    debug!("Transform processing completed successfully");
    Ok(results)
}

/// Removes every row with a missing value in any surviving column.
///
/// No column gets special treatment: missingness anywhere disqualifies the
/// row. The output type carries the completeness guarantee.
pub fn drop_incomplete(raw: Vec<RawBook>) -> Vec<CleanBook> {
    raw.into_iter()
        .filter_map(|row| {
            Some(CleanBook {
                book_title: row.book_title?,
                year: row.year?,
                rating: row.rating?,
                ratings: row.ratings?,
                author_id: row.author_id?,
            })
        })
        .collect()
}

/// Left-joins the book table to the author lookup on the identifier
/// column.
///
/// The identifier is replaced by the looked-up display name and dropped
/// from the output. Identifiers absent from the lookup leave the name
/// unresolved rather than dropping the row, so the output row count always
/// equals the input row count. Duplicate identifiers in the lookup are a
/// pre-condition violation of the lookup table; the last occurrence wins.
pub fn join_authors(books: Vec<CleanBook>, authors: &[AuthorRecord]) -> Vec<JoinedBook> {
    let by_id: HashMap<&str, &str> = authors
        .iter()
        .map(|a| (a.author_id.as_str(), a.name.as_str()))
        .collect();

    books
        .into_iter()
        .map(|b| JoinedBook {
            author_name: by_id.get(b.author_id.as_str()).map(|n| (*n).to_string()),
            book_title: b.book_title,
            year: b.year,
            rating: b.rating,
            ratings: b.ratings,
        })
        .collect()
}

/// Drops rows whose author name never resolved in the join.
///
/// The pre-join sanitizer cannot catch these: a left join reintroduces
/// missing values for identifiers absent from the lookup table, and rows
/// without an author must not reach the output.
pub fn drop_unresolved(rows: Vec<JoinedBook>) -> Vec<ResolvedBook> {
    rows.into_iter()
        .filter_map(|row| {
            Some(ResolvedBook {
                author_name: row.author_name?,
                book_title: row.book_title,
                year: row.year,
                rating: row.rating,
                ratings: row.ratings,
            })
        })
        .collect()
}

/// Normalizes the three textual fields ahead of type coercion.
///
/// - titles lose every parenthesized annotation (series, format)
/// - ratings swap the comma decimal separator for a dot
/// - ratings counts lose apostrophe and grave-accent grouping marks
///
/// Each transform is idempotent and none of them coerces types; all fields
/// stay textual.
pub fn conform_style(rows: Vec<ResolvedBook>) -> Vec<ResolvedBook> {
    rows.into_iter()
        .map(|row| ResolvedBook {
            book_title: BRACKETED.replace_all(&row.book_title, "").into_owned(),
            rating: row.rating.replace(',', "."),
            ratings: row.ratings.replace(['\'', '`'], ""),
            year: row.year,
            author_name: row.author_name,
        })
        .collect()
}

fn coercion_error(column: &'static str, row: usize, value: &str) -> PipelineError {
    PipelineError::TypeCoercion {
        column,
        row,
        value: value.to_string(),
    }
}

/// Parses integer-valued text, tolerating a float-shaped zero fraction.
///
/// Raw exports sometimes store whole numbers as `"2019.0"`; those parse
/// through f64 and are accepted only when the fractional part is exactly
/// zero. Anything else is not an integer.
fn parse_whole(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
        _ => None,
    }
}

/// Coerces each column to its canonical scalar type.
///
/// Titles and author names stay text; `year` becomes an integer, `Rating`
/// a float, `ratings` an integer count. Coercion is strict: any cell that
/// does not parse fails the whole run, naming the source column and row so
/// the operator can locate it. Nothing is truncated or wrapped silently.
pub fn coerce_types(rows: Vec<ResolvedBook>) -> Result<Vec<TypedBook>> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let year = parse_whole(&row.year)
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| coercion_error("year", idx, &row.year))?;
            let ratings = parse_whole(&row.ratings)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| coercion_error("ratings", idx, &row.ratings))?;
            let rating = row
                .rating
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| coercion_error("Rating", idx, &row.rating))?;

            Ok(TypedBook {
                book_title: row.book_title,
                author_name: row.author_name,
                year,
                rating,
                ratings,
            })
        })
        .collect()
}

/// Orders rows by rating, descending.
///
/// `sort_by` is stable, so rows with equal ratings keep their relative
/// input order. There is no secondary sort key.
pub fn sort_by_rating(mut rows: Vec<TypedBook>) -> Vec<TypedBook> {
    rows.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    rows
}

/// Renames columns to their canonical public names and fixes the export
/// column order: `year` becomes `year_released`, `ratings` becomes
/// `ratings_count`, `Rating` becomes `rating`, the lookup's `name` becomes
/// `author_name`.
pub fn present(rows: Vec<TypedBook>) -> Vec<CanonicalBook> {
    rows.into_iter()
        .map(|b| CanonicalBook {
            book_title: b.book_title,
            author_name: b.author_name,
            year_released: b.year,
            rating: b.rating,
            ratings_count: b.ratings,
        })
        .collect()
}
