//! Implements InputPort. Inquire-based interactive menu.
//!
//! Offers the dashboard's analysis flow in the terminal, plus scraping and serving the dashboard.

use super::progress::spinner;
use crate::adapters::charts::export_run_charts;
use crate::adapters::web::{self, DashboardState, ModelFactory};
use crate::domain::{AggregatedCounts, Dataset, DomainError, RunSummary};
use crate::ports::{DatasetPort, InputPort, ResultStorePort};
use crate::usecases::{AnalysisService, ScrapeService, tally_raw};
use async_trait::async_trait;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{Confirm, InquireError, MultiSelect, Password, PasswordDisplayMode, Select, Text};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

const MENU_ANALYZE: &str = "Analyze reports";
const MENU_SCRAPE: &str = "Scrape reports";
const MENU_DASHBOARD: &str = "Serve dashboard";
const MENU_QUIT: &str = "Quit";

/// Neon prompt theme for all inquire prompts.
pub fn apply_theme() {
    let pink = Color::Rgb {
        r: 0xff,
        g: 0x2f,
        b: 0xb9,
    };
    let cyan = Color::Rgb {
        r: 0x0f,
        g: 0xf0,
        b: 0xfc,
    };
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("»").with_fg(pink))
        .with_highlighted_option_prefix(Styled::new("▸").with_fg(cyan))
        .with_selected_checkbox(Styled::new("[x]").with_fg(cyan))
        .with_unselected_checkbox(Styled::new("[ ]"))
        .with_answer(StyleSheet::new().with_fg(cyan).with_attr(Attributes::BOLD))
        .with_help_message(StyleSheet::new().with_fg(Color::DarkGrey));
    inquire::set_global_render_config(config);
}

fn is_cancel(e: &InquireError) -> bool {
    matches!(
        e,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

fn ui_err(e: InquireError) -> DomainError {
    DomainError::Ui(e.to_string())
}

/// Settings the menu needs beyond the ports.
pub struct TuiSettings {
    pub visualizations_dir: PathBuf,
    pub dashboard_addr: String,
    pub scrape_substances: Vec<String>,
    pub scrape_output: PathBuf,
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    datasets: Arc<dyn DatasetPort>,
    store: Arc<dyn ResultStorePort>,
    model_factory: ModelFactory,
    scrape_service: Arc<ScrapeService>,
    settings: TuiSettings,
}

impl TuiInputPort {
    pub fn new(
        datasets: Arc<dyn DatasetPort>,
        store: Arc<dyn ResultStorePort>,
        model_factory: ModelFactory,
        scrape_service: Arc<ScrapeService>,
        settings: TuiSettings,
    ) -> Self {
        Self {
            datasets,
            store,
            model_factory,
            scrape_service,
            settings,
        }
    }

    async fn run_analyze(&self) -> Result<(), DomainError> {
        let datasets = self.datasets.load_datasets().await?;
        if datasets.is_empty() {
            println!("No datasets found.");
            return Ok(());
        }

        let names: Vec<String> = datasets.iter().map(|d| d.name.clone()).collect();
        let name = match Select::new("Dataset:", names).prompt() {
            Ok(name) => name,
            Err(e) if is_cancel(&e) => return Ok(()),
            Err(e) => return Err(ui_err(e)),
        };
        let Some(dataset) = datasets.iter().find(|d| d.name == name) else {
            return Ok(());
        };

        let titles = match select_titles(dataset) {
            Ok(titles) => titles,
            Err(e) if is_cancel(&e) => return Ok(()),
            Err(e) => return Err(ui_err(e)),
        };
        if titles.is_empty() {
            println!("No reports selected.");
            return Ok(());
        }

        let api_key = Password::new("API key (empty: configured key or mock model):")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt()
            .map_err(ui_err)?;
        let api_key = Some(api_key).filter(|k| !k.trim().is_empty());
        let export = Confirm::new("Export charts as images?")
            .with_default(false)
            .prompt()
            .map_err(ui_err)?;

        let model = (self.model_factory)(api_key);
        let service = AnalysisService::new(model, Arc::clone(&self.store));
        let pb = spinner(format!("Analyzing {} report(s)...", titles.len()));
        let result = service.run_analysis_and_categorize(dataset, &titles).await;
        pb.finish_and_clear();
        let summary = result?;

        print_summary(&summary);
        if export {
            for path in export_run_charts(&summary, &self.settings.visualizations_dir).await? {
                println!("Exported {}", path.display());
            }
        }
        Ok(())
    }

    async fn run_scrape(&self) -> Result<(), DomainError> {
        let default_list = self.settings.scrape_substances.join(", ");
        let input = match Text::new("Substances (comma-separated):")
            .with_default(&default_list)
            .prompt()
        {
            Ok(input) => input,
            Err(e) if is_cancel(&e) => return Ok(()),
            Err(e) => return Err(ui_err(e)),
        };
        let substances: Vec<String> = input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let pb = spinner("Scraping reports...");
        let result = self
            .scrape_service
            .run(&substances, &self.settings.scrape_output)
            .await;
        pb.finish_and_clear();
        let reports = result?;

        for (substance, texts) in &reports {
            println!("{:<24} {} report(s)", substance, texts.len());
        }
        println!("Saved to {}", self.settings.scrape_output.display());
        Ok(())
    }

    async fn run_dashboard(&self) -> Result<(), DomainError> {
        let datasets = self.datasets.load_datasets().await?;
        let state = DashboardState::new(
            datasets,
            Arc::clone(&self.store),
            Arc::clone(&self.model_factory),
            self.settings.visualizations_dir.clone(),
        );
        println!(
            "Dashboard at http://{} (Ctrl-C to stop)",
            self.settings.dashboard_addr
        );
        web::serve(state, &self.settings.dashboard_addr).await
    }
}

fn select_titles(dataset: &Dataset) -> Result<Vec<String>, InquireError> {
    let options: Vec<String> = dataset.titles().into_iter().map(str::to_string).collect();
    MultiSelect::new("Reports to analyze:", options)
        .with_page_size(15)
        .prompt()
}

fn print_counts(heading: &str, counts: &AggregatedCounts) {
    println!("\n{}", heading);
    if counts.is_empty() {
        println!("  (none)");
        return;
    }
    let mut rows: Vec<(&String, &usize)> = counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (label, count) in rows {
        println!("  {:<32} {}", label, count);
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\nSession {}", summary.session_id);
    print_counts("Common themes", &summary.theme_counts);
    print_counts("Emotions", &summary.emotion_counts);

    let (raw_themes, raw_emotions) = tally_raw(&summary.analysis_results);
    print_counts("Individual themes", &raw_themes);
    print_counts("Individual emotions", &raw_emotions);

    if !summary.skipped.is_empty() {
        println!("\nSkipped: {}", summary.skipped.join(", "));
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let choice = match Select::new(
                "What next?",
                vec![MENU_ANALYZE, MENU_SCRAPE, MENU_DASHBOARD, MENU_QUIT],
            )
            .prompt()
            {
                Ok(choice) => choice,
                Err(e) if is_cancel(&e) => break,
                Err(e) => return Err(ui_err(e)),
            };

            let outcome = match choice {
                MENU_ANALYZE => self.run_analyze().await,
                MENU_SCRAPE => self.run_scrape().await,
                MENU_DASHBOARD => self.run_dashboard().await,
                _ => break,
            };
            if let Err(e) = outcome {
                warn!(error = %e, action = choice, "menu action failed");
                println!("Error: {}", e);
            }
        }
        info!("bye");
        Ok(())
    }
}
