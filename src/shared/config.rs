//! Application configuration. API credentials, directories, dashboard and scraper settings.

use serde::Deserialize;

pub const DEFAULT_AI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "gpt-3.5-turbo-1106";
pub const DEFAULT_DASHBOARD_ADDR: &str = "127.0.0.1:8501";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Model
    // ─────────────────────────────────────────────────────────────────────────
    /// API key. Read from TRIP_LENS_AI_API_KEY, falls back to OPENAI_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// Chat-completions URL. Defaults to OpenAI.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// Model name. Defaults to DEFAULT_AI_MODEL.
    #[serde(default)]
    pub ai_model: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Directories
    // ─────────────────────────────────────────────────────────────────────────
    /// Root of the CSV dataset tree (default "data").
    #[serde(default)]
    pub datasets_dir: Option<String>,

    /// Per-report and aggregate JSON output (default "processed_data").
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Exported chart images (default "visualizations").
    #[serde(default)]
    pub visualizations_dir: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Dashboard / scraper
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub dashboard_addr: Option<String>,

    #[serde(default)]
    pub scrape_base_url: Option<String>,

    #[serde(default)]
    pub scrape_output: Option<String>,

    /// Comma-separated substance names to scrape (default "LSD").
    #[serde(default)]
    pub scrape_substances: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("TRIP_LENS"));
        if let Ok(path) = std::env::var("TRIP_LENS_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the API key if configured. Blank values count as unset.
    pub fn ai_api_key(&self) -> Option<String> {
        self.ai_api_key
            .clone()
            .or_else(|| std::env::var("TRIP_LENS_AI_API_KEY").ok())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_AI_API_URL.to_string())
    }

    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .unwrap_or_else(|| DEFAULT_AI_MODEL.to_string())
    }

    pub fn datasets_dir_or_default(&self) -> String {
        self.datasets_dir.clone().unwrap_or_else(|| "data".to_string())
    }

    pub fn output_dir_or_default(&self) -> String {
        self.output_dir
            .clone()
            .unwrap_or_else(|| "processed_data".to_string())
    }

    pub fn visualizations_dir_or_default(&self) -> String {
        self.visualizations_dir
            .clone()
            .unwrap_or_else(|| "visualizations".to_string())
    }

    pub fn dashboard_addr_or_default(&self) -> String {
        self.dashboard_addr
            .clone()
            .unwrap_or_else(|| DEFAULT_DASHBOARD_ADDR.to_string())
    }

    pub fn scrape_base_url_or_default(&self) -> String {
        self.scrape_base_url
            .clone()
            .unwrap_or_else(|| crate::adapters::scrape::DEFAULT_BASE_URL.to_string())
    }

    pub fn scrape_output_or_default(&self) -> String {
        self.scrape_output
            .clone()
            .unwrap_or_else(|| "trip_reports.json".to_string())
    }

    /// Substance allow-list. Empty entries are dropped; an empty list falls back to "LSD".
    pub fn scrape_substances_or_default(&self) -> Vec<String> {
        let list: Vec<String> = self
            .scrape_substances
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if list.is_empty() {
            vec!["LSD".to_string()]
        } else {
            list
        }
    }

    /// Returns true if a model API key is available.
    pub fn is_ai_configured(&self) -> bool {
        self.ai_api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.ai_api_url_or_default(), DEFAULT_AI_API_URL);
        assert_eq!(cfg.ai_model_or_default(), "gpt-3.5-turbo-1106");
        assert_eq!(cfg.datasets_dir_or_default(), "data");
        assert_eq!(cfg.output_dir_or_default(), "processed_data");
        assert_eq!(cfg.visualizations_dir_or_default(), "visualizations");
        assert_eq!(cfg.dashboard_addr_or_default(), "127.0.0.1:8501");
        assert_eq!(cfg.scrape_output_or_default(), "trip_reports.json");
        assert_eq!(cfg.scrape_substances_or_default(), vec!["LSD".to_string()]);
    }

    #[test]
    fn test_substance_list_parsing() {
        let cfg = AppConfig {
            scrape_substances: Some(" LSD, DMT ,,Psilocybin Mushrooms ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            cfg.scrape_substances_or_default(),
            vec!["LSD", "DMT", "Psilocybin Mushrooms"]
        );
    }

    #[test]
    fn test_configured_key_wins_and_blank_is_unset() {
        let cfg = AppConfig {
            ai_api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.ai_api_key().as_deref(), Some("sk-test"));

        let blank = AppConfig {
            ai_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert_ne!(blank.ai_api_key().as_deref(), Some("  "));
    }
}
