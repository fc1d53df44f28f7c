//! Company name → CIK resolution against the SEC ticker registry.
//!
//! Names are first [normalized](normalize), then ranked with a token-sorted edit-distance ratio
//! ([`token_sort_ratio`]). The best candidate wins if it scores at least [`THRESHOLD`];
//! otherwise the first title containing the query is taken. Anything else is
//! [`ResolveError::NotFound`].
use super::tickers::{Registry, Ticker};
use super::Cik;
use crate::error::ResolveError;
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use std::fmt;

/// Minimum fuzzy score (0-100) for a candidate to be accepted outright.
pub const THRESHOLD: f64 = 85.0;

/// Corporate suffixes folded away before comparison.
pub const SUFFIXES: [&str; 9] = [
    "incorporated",
    "inc",
    "corp",
    "corporation",
    "llc",
    "ltd",
    "plc",
    "group",
    "company",
];

lazy_static! {
    static ref SUFFIX: Regex = Regex::new(&format!(r"(?i)\b(?:{})\b", SUFFIXES.join("|")))
        .expect("suffix pattern should compile");
}

/// Canonical, comparison-only form of a company name.
///
/// Drops whole-word corporate suffixes (any case), lowercases, removes everything but ASCII
/// letters, digits and spaces, then collapses whitespace. Suffix tokens are dropped once more
/// after cleaning, since removing punctuation can join fragments into one (`"In-c"` → `"inc"`);
/// that keeps the function idempotent.
///
/// ```rust
/// use fortune_spider::sec::resolve::normalize;
///
/// assert_eq!(normalize("Microsoft Corporation"), "microsoft");
/// assert_eq!(normalize("AT&T INC."), "att");
/// assert_eq!(normalize(&normalize("Foo-Corp, Ltd.")), normalize("Foo-Corp, Ltd."));
/// ```
pub fn normalize(name: &str) -> String {
    let stripped = SUFFIX.replace_all(name, "");
    let cleaned: String = stripped
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| !SUFFIXES.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity of two strings in `[0, 100]`, insensitive to token order.
///
/// Both sides are split on whitespace, their tokens sorted and rejoined, then compared with an
/// Indel ratio: insertions and deletions only, so a substitution costs two. An empty side
/// scores 0.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sort_tokens(a), &sort_tokens(b))
}

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

// Indel ratio: 2·LCS / (|a| + |b|), scaled to 100.
fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    200.0 * lcs_len(&a, &b) as f64 / (a.len() + b.len()) as f64
}

// length of the longest common subsequence, one row at a time
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let up = row[j + 1];
            row[j + 1] = if ca == cb { diag + 1 } else { up.max(row[j]) };
            diag = up;
        }
    }
    row[b.len()]
}

/// How a [`Match`] was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// The best fuzzy candidate, scoring at least [`THRESHOLD`].
    Fuzzy,
    /// First title containing the query, after the fuzzy pass fell short.
    Substring,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Fuzzy => f.write_str("fuzzy"),
            Method::Substring => f.write_str("substring"),
        }
    }
}

/// A resolved registry entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Match<'r> {
    pub ticker: &'r Ticker,
    /// Fuzzy score of this entry against the query.
    pub score: f64,
    pub method: Method,
}

impl<'r> Match<'r> {
    pub fn cik(&self) -> &'r Cik {
        &self.ticker.cik
    }
}

/// A registry with every title normalized up front, ready for any number of lookups.
///
/// Holds no mutable state; one `Resolver` can serve lookups from many threads.
pub struct Resolver<'r> {
    tickers: &'r [Ticker],
    // normalized titles, for the substring fallback
    titles: Vec<String>,
    // normalized titles with sorted tokens, for scoring
    sorted: Vec<String>,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        let tickers = registry.as_slice();
        let titles: Vec<String> = tickers.par_iter().map(|t| normalize(&t.title)).collect();
        let sorted = titles.par_iter().map(|t| sort_tokens(t)).collect();
        Self {
            tickers,
            titles,
            sorted,
        }
    }

    /// Resolve `query` to a registry entry.
    ///
    /// Ties on the best score go to the entry met first in registry order, as does the
    /// substring fallback. An empty query (once normalized) scores 0 everywhere but is a
    /// substring of every title; callers should not pass one.
    pub fn resolve(&self, query: &str) -> Result<Match<'r>, ResolveError> {
        let target = normalize(query);
        let sorted_target = sort_tokens(&target);

        let scores: Vec<f64> = self
            .sorted
            .iter()
            .map(|title| ratio(&sorted_target, title))
            .collect();

        // first maximum wins
        let mut best: Option<(usize, f64)> = None;
        for (i, &score) in scores.iter().enumerate() {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((i, score));
            }
        }

        let best_score = match best {
            Some((i, score)) if score >= THRESHOLD => {
                return Ok(Match {
                    ticker: &self.tickers[i],
                    score,
                    method: Method::Fuzzy,
                });
            }
            Some((_, score)) => score,
            None => 0.0,
        };

        match self.titles.iter().position(|title| title.contains(&target)) {
            Some(i) => Ok(Match {
                ticker: &self.tickers[i],
                score: scores[i],
                method: Method::Substring,
            }),
            None => Err(ResolveError::NotFound { best_score }),
        }
    }

    /// Resolve a batch of names in parallel; results line up with `queries`.
    pub fn resolve_many<S>(&self, queries: &[S]) -> Vec<Result<Match<'r>, ResolveError>>
    where
        S: AsRef<str> + Sync,
    {
        queries
            .par_iter()
            .map(|query| self.resolve(query.as_ref()))
            .collect()
    }
}

/// Resolve a single `query` against `registry`.
///
/// Normalizes the whole registry; use a [`Resolver`] for more than one lookup.
pub fn resolve<'r>(query: &str, registry: &'r Registry) -> Result<Match<'r>, ResolveError> {
    Resolver::new(registry).resolve(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(entries: &[(u64, &str)]) -> Registry {
        entries
            .iter()
            .enumerate()
            .map(|(i, (cik, title))| Ticker {
                key: i.to_string(),
                cik: Cik::new(*cik),
                ticker: String::new(),
                title: title.to_string(),
            })
            .collect()
    }

    fn sample() -> Registry {
        registry(&[(320193, "Apple Inc."), (789019, "Microsoft Corporation")])
    }

    #[test]
    fn normalize_folds_suffixes_case_and_punctuation() {
        assert_eq!(normalize("Microsoft Corporation"), "microsoft");
        assert_eq!(normalize("  The   Home Depot, Inc. "), "the home depot");
        assert_eq!(normalize("Hilton Worldwide Holdings LLC"), "hilton worldwide holdings");
        assert_eq!(normalize("Marriott International (Group)"), "marriott international");
        assert_eq!(normalize("Adobe Incorporated"), normalize("ADOBE INC"));
        assert_eq!(normalize("Adobe Systems Incorporated"), "adobe systems");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_keeps_suffixes_inside_words() {
        assert_eq!(normalize("Incyte"), "incyte");
        assert_eq!(normalize("NoSuchCompany XYZ"), "nosuchcompany xyz");
        assert_eq!(normalize("Corpay"), "corpay");
    }

    #[test]
    fn normalize_is_idempotent() {
        let names = [
            "Apple Inc.",
            "In-c Widgets",
            "Foo-Corp, Ltd.",
            "C.O.R.P. Holdings",
            "AT&T INC.",
            "3M Co",
            "Ünïcödé Group",
            "İstanbul Airlines",
            "tab\tseparated\ncompany",
            "   ",
            "Group Inc",
            "Salesforce.com, inc.",
        ];
        for name in names {
            let once = normalize(name);
            assert_eq!(normalize(&once), once, "normalizing {name:?} twice");
            assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
        }
    }

    #[test]
    fn ratio_ignores_token_order() {
        assert_eq!(token_sort_ratio("bank of america", "america of bank"), 100.0);
        assert_eq!(token_sort_ratio("", "apple"), 0.0);
        assert_eq!(token_sort_ratio("", ""), 0.0);
        let score = token_sort_ratio("alpha", "alphabet");
        assert!((score - 1000.0 / 13.0).abs() < 1e-9, "score {score}");
        let score = token_sort_ratio("the cheesecake factory", "cheesecake factory");
        assert!((score - 90.0).abs() < 1e-9, "score {score}");
        assert_eq!(token_sort_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn lcs_counts_common_subsequence() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(lcs_len(&chars("kitten"), &chars("sitting")), 4);
        assert_eq!(lcs_len(&chars("alpha"), &chars("apple")), 2);
        assert_eq!(lcs_len(&chars(""), &chars("apple")), 0);
    }

    #[test]
    fn leading_article_still_matches_fuzzily() {
        let registry = registry(&[
            (887596, "CHEESECAKE FACTORY INC"),
            (19617, "JPMorgan Chase & Co."),
        ]);

        let found = resolve("The Cheesecake Factory", &registry).unwrap();
        assert_eq!(found.cik(), &Cik::new(887596));
        assert_eq!(found.method, Method::Fuzzy);
        assert!((found.score - 90.0).abs() < 1e-9);

        let found = resolve("JPMorgan Chase", &registry).unwrap();
        assert_eq!(found.cik(), &Cik::new(19617));
        assert_eq!(found.method, Method::Fuzzy);
        assert!(found.score >= THRESHOLD);
    }

    #[test]
    fn resolves_exact_name() {
        let registry = sample();
        let found = resolve("Apple", &registry).unwrap();
        assert_eq!(found.cik().as_str(), "0000320193");
        assert_eq!(found.method, Method::Fuzzy);
        assert_eq!(found.score, 100.0);
    }

    #[test]
    fn resolves_through_folded_suffix() {
        let registry = sample();
        let found = resolve("Microsoft Corp", &registry).unwrap();
        assert_eq!(found.cik().as_str(), "0000789019");
        assert_eq!(found.method, Method::Fuzzy);
    }

    #[test]
    fn falls_back_to_substring() {
        let registry = registry(&[
            (320193, "Apple Inc."),
            (1652044, "Alphabet Inc."),
            (796343, "Adobe Systems Incorporated"),
        ]);

        let found = resolve("Alpha", &registry).unwrap();
        assert_eq!(found.cik().as_str(), "0001652044");
        assert_eq!(found.method, Method::Substring);
        assert!(found.score < THRESHOLD);

        let found = resolve("ADOBE INC", &registry).unwrap();
        assert_eq!(found.cik().as_str(), "0000796343");
        assert_eq!(found.method, Method::Substring);
    }

    #[test]
    fn not_found_carries_true_best_score() {
        let registry = sample();
        let err = resolve("NoSuchCompany XYZ", &registry).unwrap_err();

        let query = normalize("NoSuchCompany XYZ");
        let expected = registry
            .iter()
            .map(|t| token_sort_ratio(&query, &normalize(&t.title)))
            .fold(0.0, f64::max);
        assert_eq!(err, ResolveError::NotFound { best_score: expected });
        assert!(expected < THRESHOLD);
    }

    #[test]
    fn empty_registry_is_not_found_with_zero() {
        let registry = Registry::default();
        assert_eq!(
            resolve("Apple", &registry),
            Err(ResolveError::NotFound { best_score: 0.0 })
        );
    }

    #[test]
    fn ties_go_to_first_in_registry_order() {
        let registry = registry(&[(1, "Acme Corp"), (2, "ACME Inc"), (3, "Acme Group")]);
        let found = resolve("acme", &registry).unwrap();
        assert_eq!(found.cik(), &Cik::new(1));

        // substring fallback ties the same way
        let registry = registry_with_suffixed_acme();
        let found = resolve("acme", &registry).unwrap();
        assert_eq!(found.method, Method::Substring);
        assert_eq!(found.cik(), &Cik::new(10));
    }

    fn registry_with_suffixed_acme() -> Registry {
        registry(&[(10, "Acme Rocket Works"), (11, "Acme Anvil Works")])
    }

    #[test]
    fn fuzzy_matches_clear_the_threshold() {
        let registry = registry(&[
            (1, "JPMorgan Chase & Co."),
            (2, "Bank of America Corp"),
            (3, "Goldman Sachs Group Inc"),
        ]);
        let queries = ["JPMorgan Chase", "Bank of America", "Goldman Sachs Group, Inc."];
        let resolver = Resolver::new(&registry);
        for (query, found) in queries.iter().zip(resolver.resolve_many(&queries)) {
            let found = found.unwrap();
            if found.method == Method::Fuzzy {
                let score = token_sort_ratio(&normalize(query), &normalize(&found.ticker.title));
                assert!(score >= THRESHOLD, "{query} scored {score}");
                assert_eq!(score, found.score);
            }
        }
    }

    #[test]
    fn resolve_many_keeps_input_order() {
        let registry = sample();
        let resolver = Resolver::new(&registry);
        let names = vec!["Microsoft Corp", "NoSuchCompany XYZ", "Apple"];
        let results = resolver.resolve_many(&names);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().cik(), &Cik::new(789019));
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().cik(), &Cik::new(320193));
    }
}
