use druglikenz::engine::config::ScreeningConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    pub enabled: bool,
    pub base_url: String,
    pub timeout: Duration,
}

/// Fully merged settings for one `screen` invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub structure_column: String,
    pub key_column: Option<String>,
    pub screening: ScreeningConfig,
    pub resolver: ResolverSettings,
    pub accepted_csv: Option<PathBuf>,
    pub pages_dir: Option<PathBuf>,
}
