//! Progress and outcome reporting.
//!
//! Stages never configure logging themselves; they are handed a [`Reporter`] and describe what
//! happens to each company through [`Event`]s. Every entity announced with
//! [`Event::Processing`] ends with exactly one of [`Event::Finished`], [`Event::Skipped`] or
//! [`Event::Failed`].
use crate::fortune::places::Place;
use crate::sec::facts::{Metric, Observation};
use crate::sec::resolve::Method;
use crate::sec::Cik;
use crate::tui::{self, Bars};
use colored::Colorize;
use std::fmt::Display;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::{error, info, warn};

#[derive(Clone, Copy)]
pub enum Event<'a> {
    /// A stage starts, over `total` entities.
    Stage { name: &'a str, total: usize },

    /// The `index`-th entity (1-based) is picked up.
    Processing {
        index: usize,
        total: usize,
        entity: &'a str,
    },

    /// A company name was resolved to a registry entry.
    Resolved {
        entity: &'a str,
        cik: &'a Cik,
        title: &'a str,
        score: f64,
        method: Method,
    },

    /// A headquarters was found.
    Located { entity: &'a str, place: &'a Place },

    /// A yearly figure was added to the dataset.
    Added {
        entity: &'a str,
        metric: Metric,
        observation: &'a Observation,
    },

    Finished { entity: &'a str },

    /// Nothing usable for this entity, without anything going wrong.
    Skipped {
        entity: &'a str,
        reason: &'a dyn Display,
    },

    Failed {
        entity: &'a str,
        error: &'a dyn Display,
    },

    /// A stage wrote its output.
    Saved { path: &'a Path, count: usize },
}

pub trait Reporter {
    fn report(&self, event: Event<'_>);
}

/// Reports events as `tracing` records.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceReporter;

impl Reporter for TraceReporter {
    fn report(&self, event: Event<'_>) {
        match event {
            Event::Stage { name, total } => info!("starting {name}, {total} companies"),
            Event::Processing {
                index,
                total,
                entity,
            } => info!("[{index}/{total}] processing {entity}"),
            Event::Resolved {
                entity,
                cik,
                title,
                score,
                method,
            } => info!("{method} match: '{entity}' -> '{title}' [{cik}] (score {score:.1})"),
            Event::Located { entity, place } => info!(
                "{entity}: {} ({:.4}, {:.4})",
                place.formatted_address, place.latitude, place.longitude
            ),
            Event::Added {
                entity,
                metric,
                observation,
            } => info!(
                "new {metric} {} for {entity}: {}",
                observation.year, observation.val
            ),
            Event::Finished { entity } => info!("finished {entity}"),
            Event::Skipped { entity, reason } => warn!("skipping {entity}: {reason}"),
            Event::Failed { entity, error } => error!("failed {entity}, error({error})"),
            Event::Saved { path, count } => {
                info!("{count} entries saved to {}", path.display())
            }
        }
    }
}

/// Reports events on the terminal: colored lines above a set of progress bars.
#[derive(Default)]
pub struct TuiReporter {
    bars: Mutex<Option<Bars>>,
}

impl TuiReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn println(bars: &Option<Bars>, msg: String) {
        match bars {
            Some(bars) => bars.println(msg),
            None => println!("{msg}"),
        }
    }
}

impl Reporter for TuiReporter {
    fn report(&self, event: Event<'_>) {
        let mut bars = self.bars.lock().unwrap_or_else(PoisonError::into_inner);
        match event {
            Event::Stage { name, total } => {
                println!("{}", tui::banner(name));
                *bars = match tui::multi_progress(total) {
                    Ok(bars) => Some(bars),
                    Err(err) => {
                        warn!("failed to build progress bars, error({err})");
                        None
                    }
                };
            }
            Event::Processing {
                index,
                total,
                entity,
            } => {
                if let Some(bars) = bars.as_ref() {
                    bars.spinner
                        .set_message(format!("[{index}/{total}] processing {entity} ..."));
                }
            }
            Event::Resolved {
                entity,
                cik,
                title,
                score,
                method,
            } => Self::println(
                &bars,
                format!(
                    "{} {entity} -> {title} [{cik}] {}",
                    "~".cyan(),
                    format!("({method}, score {score:.1})").dimmed()
                ),
            ),
            Event::Located { entity, place } => Self::println(
                &bars,
                format!(
                    "{} {entity}: {} ({:.4}, {:.4})",
                    "@".cyan(),
                    place.formatted_address,
                    place.latitude,
                    place.longitude
                ),
            ),
            Event::Added {
                entity,
                metric,
                observation,
            } => Self::println(
                &bars,
                format!(
                    "{} {entity}: {metric} {} = {}",
                    "+".green(),
                    observation.year,
                    observation.val
                ),
            ),
            Event::Finished { entity } => {
                if let Some(bars) = bars.as_ref() {
                    bars.succeed();
                } else {
                    println!("{} {entity}", "✓".green());
                }
            }
            Event::Skipped { entity, reason } => {
                if let Some(bars) = bars.as_ref() {
                    bars.fail();
                }
                Self::println(
                    &bars,
                    format!("{} {entity}: {}", "!".yellow(), reason.to_string().yellow()),
                );
            }
            Event::Failed { entity, error } => {
                if let Some(bars) = bars.as_ref() {
                    bars.fail();
                }
                Self::println(
                    &bars,
                    format!("{} {entity}: {}", "x".red(), error.to_string().red()),
                );
            }
            Event::Saved { path, count } => {
                if let Some(done) = bars.take() {
                    done.finish();
                }
                println!(
                    "{} {count} entries saved to {}\n",
                    "done".green().bold(),
                    path.display()
                );
            }
        }
    }
}
