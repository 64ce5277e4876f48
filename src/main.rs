use clap::{Parser, Subcommand};
use lib::{PipelineError, SimpleLogger};
use log::debug;
use std::path::{Path, PathBuf};
use std::time::Instant;

static LOGGER: SimpleLogger = SimpleLogger;

const DECADE_RELEASES_FILENAME: &str = "decade_releases.csv";
const TOP_AUTHORS_FILENAME: &str = "top_authors.csv";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level for output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean, join and export the raw book data as one canonical CSV
    Process {
        /// Directory containing the raw book and author CSV files
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Output CSV path (must contain exactly one ".csv")
        #[arg(short, long, default_value = "PROCESSED_DATA.csv")]
        output: String,
    },
    /// Derive the decade and top-author summary tables from processed data
    Analyse {
        /// Processed CSV produced by the process step
        #[arg(short, long, default_value = "PROCESSED_DATA.csv")]
        input: PathBuf,

        /// Directory the summary tables are written into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<(), PipelineError> {
    // Initialize timer and logger
    let total_start = Instant::now();
    log::set_logger(&LOGGER).unwrap();

    // Acquire CLI args
    let args = Args::parse();
    if args.debug {
        log::set_max_level(log::LevelFilter::Debug);
    } else {
        log::set_max_level(log::LevelFilter::Info);
    }

    // UI
    println!("Bookworm! Rust Book Ratings Pipeline");

    match args.command {
        Command::Process { data_dir, output } => run_process(&data_dir, &output)?,
        Command::Analyse { input, out_dir } => run_analyse(&input, &out_dir)?,
    }

    println!("\nTotal runtime: {:.2?}", total_start.elapsed());
    Ok(())
}

fn run_process(data_dir: &Path, output: &str) -> Result<(), PipelineError> {
    // Reject a bad output path before any work runs
    lib::validate_output_path(output)?;
    debug!(
        "Input directory: {} | Output: {}",
        data_dir.display(),
        output
    );

    // Process data through the staged pipeline
    println!("Starting data processing...");
    let processing_start = Instant::now();
    let results = lib::process_data(data_dir)?;
    let processing_time = processing_start.elapsed();
    println!(
        "Data processing completed in {:.2?} | Processed {} records",
        processing_time,
        results.len()
    );

    // Export is the only write, and it runs last
    let io_start = Instant::now();
    lib::write_csv(&results, Path::new(output))?;
    let io_time = io_start.elapsed();
    println!("CSV write took {:.2?}", io_time);
    println!("\nWrote {} rows to {}", results.len(), output);

    // Show summary
    if let Some(first) = results.first() {
        debug!(
            "Sample: {} by {} ({}) rating={} count={}",
            first.book_title,
            first.author_name,
            first.year_released,
            first.rating,
            first.ratings_count
        );
    }
    let total = processing_time + io_time;
    debug!(
        "Performance breakdown: Processing={:.1}%, IO={:.1}%",
        (processing_time.as_secs_f64() / total.as_secs_f64()) * 100.0,
        (io_time.as_secs_f64() / total.as_secs_f64()) * 100.0
    );

    Ok(())
}

fn run_analyse(input: &Path, out_dir: &Path) -> Result<(), PipelineError> {
    debug!("Processed input: {}", input.display());

    let books = lib::read_processed(input)?;
    println!("Loaded {} processed rows", books.len());

    let decades = lib::decade_releases(&books);
    let top = lib::top_authors(&books);
    debug!(
        "{} decade buckets | {} ranked authors",
        decades.len(),
        top.len()
    );

    let decades_path = out_dir.join(DECADE_RELEASES_FILENAME);
    let top_path = out_dir.join(TOP_AUTHORS_FILENAME);
    lib::write_decade_releases(&decades, &decades_path)?;
    lib::write_top_authors(&top, &top_path)?;
    println!(
        "\nWrote {} and {}",
        decades_path.display(),
        top_path.display()
    );

    Ok(())
}
