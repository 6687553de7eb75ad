use serde::Deserialize;

/// Browser identification sent with every request; the catalogue site
/// rejects clients without one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 12_0_1) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.45 Safari/537.36";

/// Main configuration structure for Catalogue Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Catalogue root; manufacturer/category/model segments are appended to it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout", default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// What a failure inside one manufacturer's subtree does to the run
    #[serde(rename = "on-failure", default)]
    pub on_failure: FailurePolicy,

    /// Only harvest these manufacturers (empty means all of them)
    #[serde(default)]
    pub manufacturers: Vec<String>,
}

/// Failure isolation policy for a manufacturer batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Drop the failing manufacturer's batch and continue with the next one
    #[default]
    SkipManufacturer,

    /// Stop the whole run at the first failure
    AbortRun,
}

/// User agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_user_agent")]
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Write the four tables of a batch in a single transaction
    #[serde(rename = "atomic-batches", default)]
    pub atomic_batches: bool,
}

/// CSS selectors for the marker containers of the catalogue markup
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SelectorConfig {
    pub makes: String,
    pub categories: String,
    pub models: String,
    pub sections: String,
    pub parts: String,
    pub part_label: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            makes: "div.c_container.allmakes".to_string(),
            categories: "div.c_container.allcategories".to_string(),
            models: "div.c_container.allmodels".to_string(),
            sections: "div.c_container.modelSections".to_string(),
            parts: "div.c_container.allparts".to_string(),
            part_label: "span".to_string(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
