use super::dataset::{Dataset, Record};
use super::facts::cutoff_year;
use super::resolve::{normalize, Resolver};
use super::SecClient;
use crate::api::{FactsSource, RegistrySource};
use crate::config::Config;
use crate::error::SpiderError;
use crate::fortune::Listing;
use crate::report::{Event, Reporter};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Build a fresh dataset for `companies`.
///
/// The registry is fetched once, and every name resolved against it up front. Each company then
/// gets its facts fetched for the trailing window; companies that fail to resolve or fetch are
/// reported and left out. Only a failed registry fetch aborts the stage.
pub async fn collect<S>(
    source: &S,
    companies: &[String],
    since: i32,
    delay: Duration,
    reporter: &dyn Reporter,
) -> anyhow::Result<Dataset>
where
    S: RegistrySource + FactsSource,
{
    let time = std::time::Instant::now();
    let registry = source.registry().await?;
    let resolver = Resolver::new(&registry);

    // resolution is pure, so the whole batch resolves at once
    let resolved = resolver.resolve_many(companies);
    debug!("{} names resolved, {}", companies.len(), crate::time_elapsed(time));

    let total = companies.len();
    reporter.report(Event::Stage {
        name: "SEC Metrics",
        total,
    });

    let mut dataset = Dataset::default();
    for (i, (name, found)) in companies.iter().zip(resolved).enumerate() {
        reporter.report(Event::Processing {
            index: i + 1,
            total,
            entity: name,
        });

        // an empty query would substring-match any title
        if normalize(name).is_empty() {
            reporter.report(Event::Skipped {
                entity: name,
                reason: &SpiderError::EmptyName(name.clone()),
            });
            continue;
        }

        let found = match found {
            Ok(found) => found,
            Err(err) => {
                reporter.report(Event::Failed {
                    entity: name,
                    error: &err,
                });
                continue;
            }
        };
        let cik = found.cik();
        reporter.report(Event::Resolved {
            entity: name,
            cik,
            title: &found.ticker.title,
            score: found.score,
            method: found.method,
        });

        match source.company_facts(cik).await {
            Ok(facts) => {
                dataset.insert(
                    name.clone(),
                    Record {
                        cik: Some(cik.clone()),
                        financials: facts.financials(since),
                        ..Record::default()
                    },
                );
                reporter.report(Event::Finished { entity: name });
            }
            Err(err) => reporter.report(Event::Failed {
                entity: name,
                error: &err,
            }),
        }

        // SEC courtesy pause
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    info!(
        "{} of {total} companies collected, {}",
        dataset.len(),
        crate::time_elapsed(time)
    );
    Ok(dataset)
}

/// Bootstrap the dataset at `output` from the company list at `companies`.
pub async fn run(
    config: &Config,
    companies: &Path,
    output: &Path,
    reporter: &dyn Reporter,
) -> anyhow::Result<()> {
    let client = SecClient::new(config.user_agent()?)?;
    let listings: Vec<Listing> = crate::fs::read_json(companies).await?;
    let names: Vec<String> = listings.into_iter().map(|l| l.company).collect();

    let dataset = collect(&client, &names, cutoff_year(), config.sec_delay, reporter).await?;

    crate::fs::write_json(output, &dataset).await?;
    reporter.report(Event::Saved {
        path: output,
        count: dataset.len(),
    });
    Ok(())
}
