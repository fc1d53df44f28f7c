use crate::error::CikError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod client;

/// Initial download of the financial dataset for every listed company.
pub mod bootstrap;
pub mod dataset;
pub mod facts;
pub mod resolve;
pub mod tickers;

/// Daily refresh of an existing financial dataset.
pub mod update;

pub use client::SecClient;

/// Width of a CIK once zero-padded, e.g. `0000320193`.
pub const CIK_WIDTH: usize = 10;

/// Central Index Key; the SEC's filer identifier, kept zero-padded to [`CIK_WIDTH`] digits.
///
/// The SEC writes CIKs as bare integers (`"cik_str": 320193`) in the ticker registry, and padded
/// strings in its API paths; both deserialize to the same value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Cik(String);

impl Cik {
    pub fn new(cik: u64) -> Self {
        Self(format!("{cik:0>width$}", width = CIK_WIDTH))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Cik {
    type Err = CikError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        if digits.is_empty()
            || digits.len() > CIK_WIDTH
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(CikError(s.to_string()));
        }
        Ok(Self(format!("{digits:0>width$}", width = CIK_WIDTH)))
    }
}

struct CikVisitor;

impl<'de> Visitor<'de> for CikVisitor {
    type Value = Cik;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a CIK, as an integer or a string of digits")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Cik::new(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(Cik::new)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Cik {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(CikVisitor)
    }
}
