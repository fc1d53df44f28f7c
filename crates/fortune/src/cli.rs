use clap::{Parser, Subcommand, ValueEnum};
use fortune_spider::config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    ///
    /// Without it, progress is shown as a terminal UI instead.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the Fortune 100 list from the saved HTML page.
    Extract {
        /// The saved page.
        #[arg(long, default_value = config::HTML_FILE)]
        html: PathBuf,

        #[arg(short, long, default_value = config::COMPANIES_FILE)]
        output: PathBuf,
    },

    /// Add headquarters address & coordinates to each company (needs GOOGLE_PLACES_API_KEY).
    Enrich {
        #[arg(short, long, default_value = config::COMPANIES_FILE)]
        input: PathBuf,

        #[arg(short, long, default_value = config::ENRICHED_FILE)]
        output: PathBuf,
    },

    /// Resolve every company to its CIK and collect 5 years of SEC financials (needs USER_AGENT).
    Bootstrap {
        /// Company list; enriched or not.
        #[arg(short, long, default_value = config::ENRICHED_FILE)]
        companies: PathBuf,

        #[arg(short, long, default_value = config::FINANCIALS_FILE)]
        output: PathBuf,
    },

    /// Append newly reported years to an existing financials file (needs USER_AGENT).
    Update {
        #[arg(short, long, default_value = config::FINANCIALS_FILE)]
        data: PathBuf,
    },

    /// Resolve a single company name against the SEC registry.
    Resolve {
        /// Free-text company name, e.g. "Microsoft Corp".
        name: String,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}
