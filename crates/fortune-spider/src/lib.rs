/// Upstream sources the stages are written against; the SEC and Places clients implement them.
pub mod api;
pub mod config;
pub mod error;

/// The Fortune 100 list: extraction from the saved HTML page, and headquarters enrichment through
/// the [Places API].
///
/// [Places API]: https://developers.google.com/maps/documentation/places/web-service/text-search
pub mod fortune;
pub mod fs;
pub mod report;

/// US filer information from the [SEC]; the ticker registry, name resolution, and the
/// `companyfacts` metrics.
///
/// [SEC]: https://www.sec.gov/search-filings/edgar-application-programming-interfaces
pub mod sec;

mod tui;

/// Shortcut for required API elements.
pub(crate) mod http {
    pub(crate) use reqwest::Client as HttpClient;
    pub(crate) use reqwest::RequestBuilder;
}

/// Time elapsed since `time`, formatted for trace messages.
pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:.2?}", time.elapsed())
}
