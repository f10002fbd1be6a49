use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    #[serde(default)]
    pub metrics_addr: Option<String>,
    pub model_path: String,
    pub shorteners_path: String,
    pub rank_endpoint: String,
    pub traffic_endpoint: String,
    pub search_endpoint: String,
    pub rdap_endpoint: String,
    pub search_result_cap: usize,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Config {
    // Defaults, then an optional `fisher.toml` next to the binary, then
    // `FISHER_*` environment variables (e.g. `FISHER_BIND_ADDR`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = Config::default();

        config::Config::builder()
            .set_default("bind_addr", defaults.bind_addr)?
            .set_default("model_path", defaults.model_path)?
            .set_default("shorteners_path", defaults.shorteners_path)?
            .set_default("rank_endpoint", defaults.rank_endpoint)?
            .set_default("traffic_endpoint", defaults.traffic_endpoint)?
            .set_default("search_endpoint", defaults.search_endpoint)?
            .set_default("rdap_endpoint", defaults.rdap_endpoint)?
            .set_default("search_result_cap", defaults.search_result_cap as u64)?
            .set_default("user_agent", defaults.user_agent)?
            .add_source(config::File::with_name("fisher").required(false))
            .add_source(
                config::Environment::with_prefix("FISHER")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            metrics_addr: None,
            model_path: "data/model.json".to_string(),
            shorteners_path: "data/shorteners.txt".to_string(),
            rank_endpoint: "https://www.checkpagerank.net/index.php".to_string(),
            traffic_endpoint: "http://data.alexa.com/data".to_string(),
            search_endpoint: "https://www.google.com/search".to_string(),
            rdap_endpoint: "https://rdap.org".to_string(),
            search_result_cap: 5,
            request_timeout_secs: None,
            user_agent: concat!("fisher-engine/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
