use log::{Log, Metadata, Record as LogRecord};
use serde::{Deserialize, Serialize};

/// Simple logger implementation
pub struct SimpleLogger;

impl Log for SimpleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &LogRecord) {
        println!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

/// One row of a raw per-source book table. Every payload field may be
/// absent on any row; the sanitizer decides which rows survive. The index
/// artifact columns (`index`, `Unnamed: 0`, `Unnamed: 0.1`) are validated
/// against the file header at load time and discarded here.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBook {
    pub book_title: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "Rating")]
    pub rating: Option<String>,
    pub ratings: Option<String>,
    pub author_id: Option<String>,
}

/// Author lookup row: identifier to display name.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorRecord {
    pub author_id: String,
    pub name: String,
}

/// Sanitized book row: every remaining column holds a value.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanBook {
    pub book_title: String,
    pub year: String,
    pub rating: String,
    pub ratings: String,
    pub author_id: String,
}

/// Book row after the author join. The identifier column is gone; a left
/// join leaves the display name unresolved for identifiers missing from
/// the lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedBook {
    pub book_title: String,
    pub year: String,
    pub rating: String,
    pub ratings: String,
    pub author_name: Option<String>,
}

/// Joined book row with the author name known to be present.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBook {
    pub book_title: String,
    pub year: String,
    pub rating: String,
    pub ratings: String,
    pub author_name: String,
}

/// Fully typed book row, still under the source column names.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedBook {
    pub book_title: String,
    pub author_name: String,
    pub year: i32,
    pub rating: f64,
    pub ratings: u32,
}

/// Final export row. Field names and declaration order are the canonical
/// output schema; the CSV writer derives its header row from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalBook {
    pub book_title: String,
    pub author_name: String,
    pub year_released: i32,
    pub rating: f64,
    pub ratings_count: u32,
}

/// One decade bucket of the release-proportion summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecadeCount {
    pub decade: i32,
    pub count: u64,
}

/// Summed ratings volume for one author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorRatings {
    pub author_name: String,
    pub ratings_count: u64,
}
