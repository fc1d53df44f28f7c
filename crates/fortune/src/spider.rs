use crate::cli::Commands;
use fortune_spider::config::Config;
use fortune_spider::report::{Event, Reporter};
use fortune_spider::sec::resolve::resolve;
use fortune_spider::sec::SecClient;
use fortune_spider::{api::RegistrySource, fortune, sec};
use tracing::info;

/// Run the requested spider stage.
pub(crate) async fn run(
    command: Commands,
    config: &Config,
    reporter: &dyn Reporter,
) -> anyhow::Result<()> {
    let time = std::time::Instant::now();
    match command {
        Commands::Extract { html, output } => {
            fortune::extract::run(&html, &output, reporter).await?;
        }
        Commands::Enrich { input, output } => {
            fortune::places::run(config, &input, &output, reporter).await?;
        }
        Commands::Bootstrap { companies, output } => {
            sec::bootstrap::run(config, &companies, &output, reporter).await?;
        }
        Commands::Update { data } => {
            sec::update::run(config, &data, reporter).await?;
        }
        Commands::Resolve { name } => {
            let client = SecClient::new(config.user_agent()?)?;
            let registry = client.registry().await?;
            let found = resolve(&name, &registry)?;
            reporter.report(Event::Resolved {
                entity: &name,
                cik: found.cik(),
                title: &found.ticker.title,
                score: found.score,
                method: found.method,
            });
            println!("{}", found.cik());
        }
    }

    info!("spider finished, time elapsed: {:?}", time.elapsed());
    Ok(())
}
