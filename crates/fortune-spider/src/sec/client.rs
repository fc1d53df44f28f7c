use super::facts::{facts_url, CompanyFacts};
use super::tickers::{Registry, TICKERS_URL};
use super::Cik;
use crate::api::{fetch_json, FactsSource, RegistrySource};
use crate::error::SpiderError;
use crate::http::*;
use tracing::debug;

/// Client for the SEC's public JSON endpoints.
#[derive(Clone, Debug)]
pub struct SecClient {
    http: HttpClient,
}

impl SecClient {
    /// The SEC requires a `User-Agent` naming the requester, e.g. `"Name <email@example.com>"`.
    pub fn new(user_agent: &str) -> anyhow::Result<Self> {
        let http = reqwest::ClientBuilder::new()
            .user_agent(user_agent)
            .build()?;
        Ok(Self { http })
    }
}

impl RegistrySource for SecClient {
    async fn registry(&self) -> Result<Registry, SpiderError> {
        debug!("fetching SEC Company Tickers");
        let registry: Registry =
            fetch_json(self.http.get(TICKERS_URL), "SEC Company Tickers").await?;
        debug!("{} SEC Company Tickers fetched", registry.len());
        Ok(registry)
    }
}

impl FactsSource for SecClient {
    async fn company_facts(&self, cik: &Cik) -> Result<CompanyFacts, SpiderError> {
        fetch_json(
            self.http.get(facts_url(cik)),
            &format!("SEC Company Facts for CIK{cik}"),
        )
        .await
    }
}
