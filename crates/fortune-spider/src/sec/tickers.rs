use super::Cik;
use serde::de::Visitor;
use serde::Deserialize;
use tracing::trace;

pub(crate) const TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// The SEC's ticker registry: every listed filer, in the order the SEC publishes them.
///
/// Document order is kept because it is the tie-break order when resolving names.
#[derive(Clone, Debug, Default)]
pub struct Registry(Vec<Ticker>);

/// A single registry entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticker {
    /// Opaque key of the entry in the SEC document ("0", "1", ...).
    pub key: String,
    pub cik: Cik,
    pub ticker: String,
    pub title: String,
}

impl Registry {
    pub fn new(tickers: Vec<Ticker>) -> Self {
        Self(tickers)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ticker> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Ticker] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Ticker> for Registry {
    fn from_iter<I: IntoIterator<Item = Ticker>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Ticker;
    type IntoIter = std::slice::Iter<'a, Ticker>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// de
// ----------------------------------------------------------------------------

// Every field is optional on the wire; entries without a CIK or a title carry no data.
#[derive(Debug, Deserialize)]
struct RawTicker {
    #[serde(rename = "cik_str", default)]
    cik: Option<Cik>,
    #[serde(default)]
    ticker: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

struct RegistryVisitor;

impl<'de> Visitor<'de> for RegistryVisitor {
    type Value = Registry;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("Map of tickers")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        // each entry is in the form of:
        // `"0": { "cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc." },
        //  "1": { ... },
        //  ...`
        let mut tickers: Vec<Ticker> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, raw)) = map.next_entry::<String, RawTicker>()? {
            match (raw.cik, raw.title) {
                (Some(cik), Some(title)) => tickers.push(Ticker {
                    key,
                    cik,
                    ticker: raw.ticker.unwrap_or_default(),
                    title,
                }),
                _ => trace!("registry entry {key} has no CIK or title; dropped"),
            }
        }
        Ok(Registry(tickers))
    }
}

impl<'de> Deserialize<'de> for Registry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // we want a vector returned, but the deserialize will expect a map, given
        // how the API has been designed
        deserializer.deserialize_map(RegistryVisitor)
    }
}
