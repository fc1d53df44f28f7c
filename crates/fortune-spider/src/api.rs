//! Spider stages are made up of the following components:
//! 1. HTTP
//!     a) client
//!     b) request
//!     c) deserializer
//!     d) OPTIONAL: transformation
//!
//! 2. File
//!     a) read the working state
//!     b) merge the fetched data
//!     c) overwrite the working state
//!
//! The HTTP half sits behind the traits below, so a stage can be driven by any source; the SEC
//! and Places clients are the live implementations.
#![allow(async_fn_in_trait)]

use crate::error::SpiderError;
use crate::fortune::places::Place;
use crate::http::RequestBuilder;
use crate::sec::facts::CompanyFacts;
use crate::sec::tickers::Registry;
use crate::sec::Cik;
use serde::de::DeserializeOwned;
use tracing::{error, trace};

/// Supplies the SEC ticker registry.
pub trait RegistrySource {
    async fn registry(&self) -> Result<Registry, SpiderError>;
}

/// Supplies the `companyfacts` document of a filer.
pub trait FactsSource {
    async fn company_facts(&self, cik: &Cik) -> Result<CompanyFacts, SpiderError>;
}

/// Supplies the best place for a free-text query, if any.
pub trait PlaceSource {
    async fn search_place(&self, query: &str) -> Result<Option<Place>, SpiderError>;
}

/// Send `request`, reject non-success statuses, and deserialize the JSON body.
///
/// `what` names the payload in errors and traces.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    what: &str,
) -> Result<T, SpiderError> {
    let time = std::time::Instant::now();
    trace!("fetching {what}");

    let response = request
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| {
            error!("failed to fetch {what}, error({err})");
            SpiderError::upstream(what, err)
        })?;

    let data = response.json().await.map_err(|err| {
        error!("failed to parse JSON for {what}, error({err})");
        SpiderError::upstream(what, err)
    })?;

    trace!("{what} fetched, {}", crate::time_elapsed(time));
    Ok(data)
}
