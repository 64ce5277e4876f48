use lib::{PipelineError, decade_releases, process_data, read_processed, top_authors, write_csv};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const RAW_HEADER: &str = "index,Unnamed: 0,Unnamed: 0.1,book_title,year,Rating,ratings,author_id";

fn write_file(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

/// Two raw sources and a lookup, exercising every normalization the
/// pipeline performs: comma decimals, both grouping-mark conventions,
/// float-shaped years, a missing field, and an unmatched author id.
fn write_fixture(dir: &Path) {
    write_file(
        dir,
        "RAW_DATA_1.csv",
        &format!(
            "{RAW_HEADER}\n\
             0,0,0,\"Dune (Dune Chronicles, #1)\",1965,\"4,25\",1'000000,1\n\
             1,1,1,The Silent Sea,,4.5,100,1\n"
        ),
    );
    write_file(
        dir,
        "RAW_DATA_2.csv",
        &format!(
            "{RAW_HEADER}\n\
             0,0,0,Hyperion,1989.0,4.23,2`000,2\n\
             1,1,1,Orphan Work,1990,4.9,50,99\n"
        ),
    );
    write_file(
        dir,
        "AUTHORS_DATA.csv",
        "author_id,name\n1,Frank Herbert\n2,Dan Simmons\n",
    );
}

#[test]
fn processes_fixture_directory_end_to_end() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    let results = process_data(dir.path()).unwrap();

    // The row without a year and the row with an unmatched author id are
    // both gone; survivors are sorted by rating descending.
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].book_title, "Dune");
    assert_eq!(results[0].author_name, "Frank Herbert");
    assert_eq!(results[0].year_released, 1965);
    assert_eq!(results[0].rating, 4.25);
    assert_eq!(results[0].ratings_count, 1_000_000);

    assert_eq!(results[1].book_title, "Hyperion");
    assert_eq!(results[1].author_name, "Dan Simmons");
    assert_eq!(results[1].year_released, 1989);
    assert_eq!(results[1].rating, 4.23);
    assert_eq!(results[1].ratings_count, 2_000);
}

#[test]
fn exported_csv_has_canonical_header_and_no_index_column() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let out = dir.path().join("PROCESSED_DATA.csv");

    let results = process_data(dir.path()).unwrap();
    write_csv(&results, &out).unwrap();

    let contents = fs::read_to_string(&out).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("book_title,author_name,year_released,rating,ratings_count")
    );
    assert_eq!(lines.next(), Some("Dune,Frank Herbert,1965,4.25,1000000"));
    assert_eq!(lines.next(), Some("Hyperion,Dan Simmons,1989,4.23,2000"));
    assert_eq!(lines.next(), None);
}

#[test]
fn rerunning_the_pipeline_is_byte_identical() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    write_csv(&process_data(dir.path()).unwrap(), &first).unwrap();
    write_csv(&process_data(dir.path()).unwrap(), &second).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn directory_without_raw_files_is_rejected() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "AUTHORS_DATA.csv", "author_id,name\n1,A\n");

    let err = process_data(dir.path()).unwrap_err();

    assert!(matches!(err, PipelineError::NoRawFiles(_)));
}

#[test]
fn directory_without_author_file_is_rejected() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "RAW_DATA_1.csv",
        &format!("{RAW_HEADER}\n0,0,0,Dune,1965,4.25,100,1\n"),
    );

    let err = process_data(dir.path()).unwrap_err();

    assert!(matches!(err, PipelineError::MissingAuthorFile(_)));
}

#[test]
fn multiple_author_files_are_rejected() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    write_file(
        dir.path(),
        "AUTHORS_EXTRA.csv",
        "author_id,name\n3,Somebody Else\n",
    );

    let err = process_data(dir.path()).unwrap_err();

    assert!(matches!(err, PipelineError::AmbiguousAuthorFiles(_)));
}

#[test]
fn divergent_raw_schema_is_rejected() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    // Missing the index artifact columns entirely.
    write_file(
        dir.path(),
        "RAW_DATA_3.csv",
        "book_title,year,Rating,ratings,author_id\nDune,1965,4.25,100,1\n",
    );

    let err = process_data(dir.path()).unwrap_err();

    assert!(matches!(err, PipelineError::Schema(_)));
}

#[test]
fn unparseable_cell_fails_the_run_naming_the_column() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "RAW_DATA_1.csv",
        &format!("{RAW_HEADER}\n0,0,0,Dune,1965,n/a,100,1\n"),
    );
    write_file(
        dir.path(),
        "AUTHORS_DATA.csv",
        "author_id,name\n1,Frank Herbert\n",
    );

    let err = process_data(dir.path()).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::TypeCoercion { column: "Rating", row: 0, .. }
    ));
}

#[test]
fn analysis_reads_back_what_the_pipeline_exported() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let out = dir.path().join("PROCESSED_DATA.csv");
    write_csv(&process_data(dir.path()).unwrap(), &out).unwrap();

    let books = read_processed(&out).unwrap();
    let decades = decade_releases(&books);
    let top = top_authors(&books);

    let buckets: Vec<(i32, u64)> = decades.iter().map(|d| (d.decade, d.count)).collect();
    assert_eq!(buckets, [(1960, 1), (1980, 1)]);

    assert_eq!(top[0].author_name, "Frank Herbert");
    assert_eq!(top[0].ratings_count, 1_000_000);
    assert_eq!(top[1].author_name, "Dan Simmons");
    assert_eq!(top[1].ratings_count, 2_000);
}
