//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI or a subcommand.
//! No business logic here.

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use trip_lens::adapters::ai::model_for_key;
use trip_lens::adapters::charts::export_run_charts;
use trip_lens::adapters::persistence::{CsvDatasetRepo, FsResultStore};
use trip_lens::adapters::scrape::ReqwestFetcher;
use trip_lens::adapters::ui::tui::{TuiInputPort, TuiSettings};
use trip_lens::adapters::web::{self, DashboardState, ModelFactory};
use trip_lens::ports::{DatasetPort, InputPort, ModelPort, PageFetcher, ResultStorePort};
use trip_lens::shared::config::AppConfig;
use trip_lens::usecases::{AnalysisService, ScrapeService};

#[derive(Parser)]
#[command(name = "trip-lens", version, about = "LLM analysis of psychedelic trip reports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze reports of one dataset and print the category counts
    Analyze {
        /// Dataset name (file stem of the CSV)
        #[arg(short, long)]
        dataset: String,
        /// Report title to analyze; repeat for several. Defaults to all reports.
        #[arg(short, long = "title")]
        titles: Vec<String>,
        /// Analyze at most this many reports
        #[arg(short, long)]
        limit: Option<usize>,
        /// Also write the charts as PNG images
        #[arg(long)]
        export: bool,
    },
    /// Serve the browser dashboard
    Dashboard {
        /// Listen address, e.g. 127.0.0.1:8501
        #[arg(long)]
        addr: Option<String>,
    },
    /// Scrape trip reports from the experience-report site
    Scrape {
        /// Substance name to scrape; repeat for several
        #[arg(short, long = "substance")]
        substances: Vec<String>,
        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cli = Cli::parse();
    let cfg = AppConfig::load().unwrap_or_default();
    info!(
        ai_configured = cfg.is_ai_configured(),
        model = %cfg.ai_model_or_default(),
        "configuration loaded"
    );

    // --- Adapters ---
    let dataset_repo: Arc<dyn DatasetPort> =
        Arc::new(CsvDatasetRepo::new(cfg.datasets_dir_or_default()));
    let store: Arc<dyn ResultStorePort> =
        Arc::new(FsResultStore::new(cfg.output_dir_or_default()));
    let visualizations_dir = PathBuf::from(cfg.visualizations_dir_or_default());

    // Key typed by the user wins over the configured key; no key at all means the mock model.
    let api_url = cfg.ai_api_url_or_default();
    let model_name = cfg.ai_model_or_default();
    let configured_key = cfg.ai_api_key();
    let model_factory: ModelFactory = Arc::new(move |key: Option<String>| -> Arc<dyn ModelPort> {
        let key = key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| configured_key.clone());
        model_for_key(api_url.clone(), model_name.clone(), key)
    });

    let fetcher: Arc<dyn PageFetcher> = Arc::new(ReqwestFetcher::new());
    let scrape_service = Arc::new(ScrapeService::new(fetcher, cfg.scrape_base_url_or_default()));

    match cli.command {
        Some(Command::Analyze {
            dataset,
            titles,
            limit,
            export,
        }) => {
            let datasets = dataset_repo
                .load_datasets()
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            let Some(dataset) = datasets.iter().find(|d| d.name == dataset) else {
                let names: Vec<&str> = datasets.iter().map(|d| d.name.as_str()).collect();
                anyhow::bail!("unknown dataset {:?}; available: {}", dataset, names.join(", "));
            };

            let mut selected: Vec<String> = if titles.is_empty() {
                dataset.titles().into_iter().map(str::to_string).collect()
            } else {
                titles
            };
            if let Some(limit) = limit {
                selected.truncate(limit);
            }

            let service = AnalysisService::new(model_factory(None), Arc::clone(&store));
            let summary = service
                .run_analysis_and_categorize(dataset, &selected)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);

            if export {
                for path in export_run_charts(&summary, &visualizations_dir)
                    .await
                    .map_err(|e| anyhow::anyhow!("{}", e))?
                {
                    info!(path = %path.display(), "chart written");
                }
            }
        }
        Some(Command::Dashboard { addr }) => {
            let datasets = dataset_repo
                .load_datasets()
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            let state = DashboardState::new(datasets, store, model_factory, visualizations_dir);
            let addr = addr.unwrap_or_else(|| cfg.dashboard_addr_or_default());
            web::serve(state, &addr)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
        }
        Some(Command::Scrape { substances, output }) => {
            let substances = if substances.is_empty() {
                cfg.scrape_substances_or_default()
            } else {
                substances
            };
            let output = output.unwrap_or_else(|| PathBuf::from(cfg.scrape_output_or_default()));
            let reports = scrape_service
                .run(&substances, &output)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            info!(
                substances = reports.len(),
                reports = reports.values().map(Vec::len).sum::<usize>(),
                path = %output.display(),
                "scrape finished"
            );
        }
        None => {
            trip_lens::adapters::ui::init_ui();
            let settings = TuiSettings {
                visualizations_dir,
                dashboard_addr: cfg.dashboard_addr_or_default(),
                scrape_substances: cfg.scrape_substances_or_default(),
                scrape_output: PathBuf::from(cfg.scrape_output_or_default()),
            };
            let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
                dataset_repo,
                store,
                model_factory,
                scrape_service,
                settings,
            ));

            // --- Run (main menu -> Analyze / Scrape / Dashboard) ---
            input_port
                .run()
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
        }
    }

    Ok(())
}
