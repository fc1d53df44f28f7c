use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub(crate) fn facts_url(cik: &super::Cik) -> String {
    format!("https://data.sec.gov/api/xbrl/companyfacts/CIK{cik}.json")
}

/// Number of trailing years kept from the `companyfacts` history.
pub const WINDOW_YEARS: i32 = 5;

/// Earliest fiscal year kept, relative to the current local year.
pub fn cutoff_year() -> i32 {
    chrono::Local::now().year() - WINDOW_YEARS
}

/// The fixed set of metrics collected per company.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Revenue,
    NetIncome,
    OperatingCashFlow,
    Assets,
    Liabilities,
    Equity,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Revenue,
        Metric::NetIncome,
        Metric::OperatingCashFlow,
        Metric::Assets,
        Metric::Liabilities,
        Metric::Equity,
    ];

    /// The metric named `name`, as it is written in the dataset.
    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|metric| metric.to_string() == name)
    }

    /// The `us-gaap` concept the metric is read from.
    pub fn tag(self) -> &'static str {
        match self {
            Metric::Revenue => "Revenues",
            Metric::NetIncome => "NetIncomeLoss",
            Metric::OperatingCashFlow => "NetCashProvidedByUsedInOperatingActivities",
            Metric::Assets => "Assets",
            Metric::Liabilities => "Liabilities",
            Metric::Equity => "StockholdersEquity",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single yearly datapoint; `val` keeps the number exactly as the SEC wrote it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub year: i32,
    pub val: Number,
}

/// Metric → observations, in [`Metric`] order.
pub type Financials = BTreeMap<Metric, Vec<Observation>>;

// Input
// =====
//
// {
//    "cik": 320193,
//    "entityName": "Apple Inc.",
//    "facts": {
/// A `companyfacts` document; every level is optional, and missing levels read as no data.
#[derive(Deserialize, Debug, Default)]
pub struct CompanyFacts {
    //                      vvvv == "MetricName"
    #[serde(default)]
    facts: HashMap<String, HashMap<String, MetricData>>,
    //             ^^^^  == "dei" or "us-gaap"
}

//          "us-gaap": {
//              "Revenues": {
//                  "label": "Revenues",
//                  "description": "Amount of revenue recognized ...",
#[derive(Deserialize, Debug, Default)]
struct MetricData {
    #[serde(default)]
    units: HashMap<String, Vec<DataCell>>,
    //             ^^^^ == "shares" or "USD"
}

//                  "units": {
//                      "USD": [
#[derive(Deserialize, Debug)]
struct DataCell {
    #[serde(rename = "end", default)]
    end_date: Option<String>,
    #[serde(default)]
    val: Option<Number>,
}
//                          {
//                              "start": "2022-09-25",
//                              "end": "2023-09-30",
//                              "val": 383285000000,
//                              "accn": "0000320193-23-000106",
//                              "fy": 2023,
//                              "fp": "FY",
//                              "form": "10-K",
//                              "filed": "2023-11-03",
//                              "frame": "CY2023"
//                          },
//                          ...
//                      ]
//                  }
//              },
//              ...
//          }
//      }
// }

impl CompanyFacts {
    /// Every USD observation of `metric` with a readable year, in document order.
    pub fn observations(&self, metric: Metric) -> impl Iterator<Item = Observation> + '_ {
        self.facts
            .get("us-gaap")
            .and_then(|gaap| gaap.get(metric.tag()))
            .and_then(|data| data.units.get("USD"))
            .into_iter()
            .flatten()
            .filter_map(|cell| {
                let year = cell.end_date.as_deref().and_then(year_of)?;
                let val = cell.val.clone()?;
                Some(Observation { year, val })
            })
    }

    /// The fixed metric set, restricted to years `>= since`.
    ///
    /// Every metric is present, possibly empty. Identical `(year, val)` pairs are kept once, as
    /// the same figure is usually restated in several filings.
    pub fn financials(&self, since: i32) -> Financials {
        Metric::ALL
            .into_iter()
            .map(|metric| {
                let mut rows: Vec<Observation> = Vec::new();
                for obs in self.observations(metric).filter(|obs| obs.year >= since) {
                    if !rows.contains(&obs) {
                        rows.push(obs);
                    }
                }
                (metric, rows)
            })
            .collect()
    }
}

// "2023-09-30" -> 2023
fn year_of(date: &str) -> Option<i32> {
    let year = date.get(..4)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}
