//! Command-line interface definitions.
//!
//! Every option except `--config` can also be supplied through an
//! environment variable. Values given here override the YAML config file.

use clap::Parser;

/// Command-line arguments for the quiz answer service.
///
/// # Examples
///
/// ```sh
/// # Credential from the environment, everything else defaulted
/// MISTRAL_API_KEY=... quiz_answer_service
///
/// # Custom bind address and a config file
/// quiz_answer_service --bind 127.0.0.1:9000 -c ./config.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Address to listen on
    #[arg(short, long, env = "QUIZ_BIND", default_value = "0.0.0.0:8000")]
    pub bind: String,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Mistral API key
    #[arg(long, env = "MISTRAL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier sent with every completion request
    #[arg(long, env = "MISTRAL_MODEL")]
    pub model: Option<String>,

    /// Root URL of the completion API
    #[arg(long, env = "MISTRAL_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Root URL of the news site
    #[arg(long, env = "NEWS_BASE_URL")]
    pub news_base_url: Option<String>,

    /// Path of the news listing page, joined onto the news base URL
    #[arg(long, env = "NEWS_PAGE_PATH")]
    pub news_page_path: Option<String>,

    /// Timeout for the news page fetch, in seconds
    #[arg(long, env = "NEWS_TIMEOUT_SECS")]
    pub news_timeout_secs: Option<u64>,
}
