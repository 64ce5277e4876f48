use crate::structs::{AuthorRatings, CanonicalBook, DecadeCount};
use std::collections::BTreeMap;

/// Number of authors kept in the ranking.
const TOP_AUTHOR_COUNT: usize = 10;

/// Buckets each book into its decade of release and counts bucket sizes.
///
/// A year maps to its decade by flooring to the nearest multiple of ten
/// (1985 buckets into 1980). Buckets come back ascending by decade.
pub fn decade_releases(books: &[CanonicalBook]) -> Vec<DecadeCount> {
    let mut buckets: BTreeMap<i32, u64> = BTreeMap::new();
    for book in books {
        let decade = book.year_released.div_euclid(10) * 10;
        *buckets.entry(decade).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(decade, count)| DecadeCount { decade, count })
        .collect()
}

/// Sums ratings volume per author and ranks the ten most-rated authors,
/// descending.
///
/// Totals are accumulated per display name before ranking, so an author
/// spread across several rows counts once. Group iteration is name-ordered
/// and the rank sort is stable, so authors with equal totals rank
/// alphabetically.
pub fn top_authors(books: &[CanonicalBook]) -> Vec<AuthorRatings> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for book in books {
        *totals.entry(book.author_name.as_str()).or_default() += u64::from(book.ratings_count);
    }

    let mut ranked: Vec<AuthorRatings> = totals
        .into_iter()
        .map(|(name, ratings_count)| AuthorRatings {
            author_name: name.to_string(),
            ratings_count,
        })
        .collect();
    ranked.sort_by(|a, b| b.ratings_count.cmp(&a.ratings_count));
    ranked.truncate(TOP_AUTHOR_COUNT);
    ranked
}
