//! Flattening of TMDB responses into catalog attribute strings.

use crate::providers::{MovieCredits, MovieDetails};

const SEPARATOR: &str = ", ";

/// Which credits list a name lookup reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditKind {
    Cast,
    Crew,
}

/// Genre names in API order, comma separated.
pub fn join_genres(details: &MovieDetails) -> String {
    details
        .genres
        .iter()
        .map(|genre| genre.name.as_str())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Text before the first `-` of the release date.
pub fn release_year(details: &MovieDetails) -> String {
    details
        .release_date
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Names from one credits list, comma separated.
///
/// For [`CreditKind::Crew`] only members whose job equals `job` exactly are
/// kept, and every match is included. An empty `job` matches nobody.
/// [`CreditKind::Cast`] ignores `job` and returns the whole cast.
pub fn credit_names(credits: &MovieCredits, kind: CreditKind, job: &str) -> String {
    let names: Vec<&str> = match kind {
        CreditKind::Cast => credits.cast.iter().map(|m| m.name.as_str()).collect(),
        CreditKind::Crew if job.is_empty() => Vec::new(),
        CreditKind::Crew => credits
            .crew
            .iter()
            .filter(|m| m.job == job)
            .map(|m| m.name.as_str())
            .collect(),
    };
    names.join(SEPARATOR)
}
