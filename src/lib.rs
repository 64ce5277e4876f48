pub mod analyse;
pub mod error;
pub mod load;
pub mod structs;
pub mod transform;

// Re-export public API
pub use analyse::{decade_releases, top_authors};
pub use error::{PipelineError, Result};
pub use load::{
    read_processed, validate_output_path, write_csv, write_decade_releases, write_top_authors,
};
pub use structs::{AuthorRatings, CanonicalBook, DecadeCount, SimpleLogger};
pub use transform::process_data;
