use super::facts::{Financials, Metric, Observation};
use super::Cik;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::collections::HashSet;
use tracing::warn;

/// The persisted financial dataset: company name → [`Record`], in insertion order.
///
/// ```json
/// {
///   "Cisco": {
///     "cik": "0000858877",
///     "financials": {
///       "Revenue": [{ "year": 2023, "val": 56998000000 }, ...],
///       ...
///     }
///   },
///   ...
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(pub IndexMap<String, Record>);

/// One company of the dataset.
///
/// Reading is lenient: a missing, `null` or blank `cik` reads as `None` (the company is resolved
/// again), and `financials` entries that are not a readable [`Metric`] are kept in `other` and
/// written back as found.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct Record {
    pub cik: Option<Cik>,
    pub financials: Financials,
    pub other: IndexMap<String, Value>,
}

impl Dataset {
    pub fn insert(&mut self, company: String, record: Record) {
        self.0.insert(company, record);
    }

    pub fn get(&self, company: &str) -> Option<&Record> {
        self.0.get(company)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// de
// ----------------------------------------------------------------------------

#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default, deserialize_with = "lenient_cik")]
    cik: Option<Cik>,
    #[serde(default)]
    financials: IndexMap<String, Value>,
}

fn lenient_cik<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Cik>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => match Cik::deserialize(&value) {
            Ok(cik) => Some(cik),
            Err(err) => {
                warn!("unreadable CIK {value}, error({err}); it will be resolved again");
                None
            }
        },
    })
}

impl From<StoredRecord> for Record {
    fn from(stored: StoredRecord) -> Self {
        let mut record = Record {
            cik: stored.cik,
            ..Record::default()
        };
        for (key, value) in stored.financials {
            let Some(metric) = Metric::from_name(&key) else {
                record.other.insert(key, value);
                continue;
            };
            match Vec::<Observation>::deserialize(&value) {
                Ok(rows) => {
                    record.financials.insert(metric, rows);
                }
                Err(err) => {
                    warn!("unreadable {metric} rows, error({err}); kept as found");
                    record.other.insert(key, value);
                }
            }
        }
        record
    }
}

// ser
// ----------------------------------------------------------------------------

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("Record", 2)?;
        record.serialize_field("cik", &self.cik)?;
        record.serialize_field("financials", &StoredFinancials(self))?;
        record.end()
    }
}

// metrics in [`Metric`] order, then the unread entries not shadowed by one
struct StoredFinancials<'a>(&'a Record);

impl Serialize for StoredFinancials<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Record {
            financials, other, ..
        } = self.0;
        let mut map = serializer.serialize_map(None)?;
        for (metric, rows) in financials {
            map.serialize_entry(metric, rows)?;
        }
        for (key, value) in other {
            let shadowed = Metric::from_name(key).is_some_and(|m| financials.contains_key(&m));
            if !shadowed {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl Record {
    /// Append the observations of `latest` for years not yet recorded under each metric.
    ///
    /// When `latest` holds several values for one new year, the last one is taken. Returns what
    /// was appended, in order.
    pub fn merge(&mut self, latest: Financials) -> Vec<(Metric, Observation)> {
        let mut added = vec![];
        for (metric, observations) in latest {
            let rows = self.financials.entry(metric).or_default();
            let known: HashSet<i32> = rows.iter().map(|obs| obs.year).collect();

            // year -> last value seen, first-seen year order
            let mut by_year: IndexMap<i32, Number> = IndexMap::new();
            for obs in observations.into_iter().filter(|obs| !known.contains(&obs.year)) {
                by_year.insert(obs.year, obs.val);
            }

            for (year, val) in by_year {
                let obs = Observation { year, val };
                rows.push(obs.clone());
                added.push((metric, obs));
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(year: i32, val: i64) -> Observation {
        Observation {
            year,
            val: Number::from(val),
        }
    }

    #[test]
    fn merge_skips_known_years() {
        let mut record = Record {
            cik: Some(Cik::new(858877)),
            financials: [(Metric::Revenue, vec![obs(2022, 1), obs(2023, 2)])]
                .into_iter()
                .collect(),
            ..Record::default()
        };

        let latest: Financials = [
            (Metric::Revenue, vec![obs(2022, 9), obs(2023, 9), obs(2024, 3), obs(2024, 4)]),
            (Metric::Assets, vec![obs(2024, 5)]),
        ]
        .into_iter()
        .collect();

        let added = record.merge(latest);
        assert_eq!(
            added,
            [(Metric::Revenue, obs(2024, 4)), (Metric::Assets, obs(2024, 5))]
        );
        assert_eq!(
            record.financials[&Metric::Revenue],
            [obs(2022, 1), obs(2023, 2), obs(2024, 4)]
        );

        // a second merge of the same data changes nothing
        let again = record.clone();
        let latest: Financials = [(Metric::Revenue, vec![obs(2024, 7)])].into_iter().collect();
        assert!(record.merge(latest).is_empty());
        assert_eq!(record, again);
    }

    #[test]
    fn reads_records_without_cik_and_keeps_order() {
        let dataset: Dataset = serde_json::from_str(
            r#"{
                "Zeta": {"cik": null, "financials": {}},
                "Alpha": {"cik": "0000320193", "financials": {"Revenue": [{"year": 2023, "val": 383285000000}]}},
                "Mid": {}
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = dataset.0.keys().map(String::as_str).collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
        assert_eq!(dataset.get("Zeta").unwrap().cik, None);
        assert_eq!(
            dataset.get("Alpha").unwrap().financials[&Metric::Revenue][0].val,
            Number::from(383285000000_i64)
        );

        let text = serde_json::to_string(&dataset).unwrap();
        assert!(text.contains(r#""val":383285000000"#));
    }

    #[test]
    fn blank_or_bad_cik_reads_as_unresolved() {
        let dataset: Dataset = serde_json::from_str(
            r#"{
                "Cisco": {"cik": "", "financials": {"Revenue": []}},
                "Hilton": {"cik": "  ", "financials": {}},
                "Apple": {"cik": "not-a-cik", "financials": {}},
                "Microsoft": {"cik": 789019, "financials": {}}
            }"#,
        )
        .unwrap();

        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.get("Cisco").unwrap().cik, None);
        assert_eq!(dataset.get("Hilton").unwrap().cik, None);
        assert_eq!(dataset.get("Apple").unwrap().cik, None);
        assert_eq!(dataset.get("Microsoft").unwrap().cik, Some(Cik::new(789019)));
    }

    #[test]
    fn unknown_financials_are_carried_through() {
        let dataset: Dataset = serde_json::from_str(
            r#"{
                "Cisco": {
                    "cik": "0000858877",
                    "financials": {
                        "Revenue": [{"year": 2023, "val": 56998000000}],
                        "EPS": [{"year": 2023, "val": 3.07}],
                        "Assets": "n/a"
                    }
                },
                "Hilton": {"cik": null, "financials": {}}
            }"#,
        )
        .unwrap();

        let cisco = dataset.get("Cisco").unwrap();
        assert_eq!(cisco.financials.len(), 1);
        assert_eq!(cisco.financials[&Metric::Revenue], [obs(2023, 56998000000)]);
        let other: Vec<&str> = cisco.other.keys().map(String::as_str).collect();
        assert_eq!(other, ["EPS", "Assets"]);

        let text = serde_json::to_string(cisco).unwrap();
        assert_eq!(
            text,
            r#"{"cik":"0000858877","financials":{"Revenue":[{"year":2023,"val":56998000000}],"EPS":[{"year":2023,"val":3.07}],"Assets":"n/a"}}"#
        );

        // a merged metric replaces the unreadable entry of the same name
        let mut cisco = cisco.clone();
        cisco.merge([(Metric::Assets, vec![obs(2023, 101852000000)])].into_iter().collect());
        let text = serde_json::to_string(&cisco).unwrap();
        assert!(text.contains(r#""Assets":[{"year":2023,"val":101852000000}]"#));
        assert!(!text.contains("n/a"));
    }
}
