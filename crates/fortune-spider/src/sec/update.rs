use super::dataset::{Dataset, Record};
use super::facts::{cutoff_year, Metric, Observation};
use super::resolve::{normalize, Resolver};
use super::tickers::Registry;
use super::SecClient;
use crate::api::{FactsSource, RegistrySource};
use crate::config::Config;
use crate::error::SpiderError;
use crate::report::{Event, Reporter};
use std::cell::OnceCell;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Refresh every record of `dataset` in place.
///
/// Records without a CIK are resolved first; the registry is only fetched if one is needed, and
/// at most once successfully. Its titles are normalized once, for all such records. New years within the trailing window (`>= since`) are appended;
/// years already present are left alone. A record whose refresh fails stays exactly as it was.
pub async fn refresh<S>(
    source: &S,
    dataset: &mut Dataset,
    since: i32,
    delay: Duration,
    reporter: &dyn Reporter,
) -> usize
where
    S: RegistrySource + FactsSource,
{
    let time = std::time::Instant::now();
    let total = dataset.len();
    reporter.report(Event::Stage {
        name: "SEC Metrics Update",
        total,
    });

    // filled on first need; a failed fetch leaves it empty for the next record to retry
    let registry: tokio::sync::OnceCell<Registry> = tokio::sync::OnceCell::new();
    let resolver: OnceCell<Resolver<'_>> = OnceCell::new();
    let mut added = 0;
    for (i, (name, record)) in dataset.0.iter_mut().enumerate() {
        reporter.report(Event::Processing {
            index: i + 1,
            total,
            entity: name,
        });

        match refresh_record(source, &registry, &resolver, name, record, since, reporter).await {
            Ok(new) => {
                for (metric, observation) in &new {
                    reporter.report(Event::Added {
                        entity: name,
                        metric: *metric,
                        observation,
                    });
                }
                added += new.len();
                reporter.report(Event::Finished { entity: name });
            }
            Err(err) => reporter.report(Event::Failed {
                entity: name,
                error: &err,
            }),
        }

        // SEC rate-limit friendly
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    info!("{added} new observations, {}", crate::time_elapsed(time));
    added
}

// Works on a copy, so that `record` only changes if every step succeeded.
async fn refresh_record<'r, S>(
    source: &S,
    registry: &'r tokio::sync::OnceCell<Registry>,
    resolver: &OnceCell<Resolver<'r>>,
    name: &str,
    record: &mut Record,
    since: i32,
    reporter: &dyn Reporter,
) -> Result<Vec<(Metric, Observation)>, SpiderError>
where
    S: RegistrySource + FactsSource,
{
    let mut updated = record.clone();

    let cik = match &updated.cik {
        Some(cik) => cik.clone(),
        None => {
            if normalize(name).is_empty() {
                return Err(SpiderError::EmptyName(name.to_string()));
            }
            let registry = registry
                .get_or_try_init(|| async {
                    debug!("fetching registry to resolve {name}");
                    source.registry().await
                })
                .await?;
            let found = resolver
                .get_or_init(|| Resolver::new(registry))
                .resolve(name)?;
            reporter.report(Event::Resolved {
                entity: name,
                cik: found.cik(),
                title: &found.ticker.title,
                score: found.score,
                method: found.method,
            });
            updated.cik = Some(found.cik().clone());
            found.cik().clone()
        }
    };

    let facts = source.company_facts(&cik).await?;
    let new = updated.merge(facts.financials(since));

    *record = updated;
    Ok(new)
}

/// Refresh the dataset at `data` and write it back.
pub async fn run(config: &Config, data: &Path, reporter: &dyn Reporter) -> anyhow::Result<()> {
    let client = SecClient::new(config.user_agent()?)?;
    let mut dataset: Dataset = crate::fs::read_json(data).await?;

    refresh(&client, &mut dataset, cutoff_year(), config.sec_delay, reporter).await;

    crate::fs::write_json(data, &dataset).await?;
    reporter.report(Event::Saved {
        path: data,
        count: dataset.len(),
    });
    Ok(())
}
