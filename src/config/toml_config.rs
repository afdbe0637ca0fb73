use crate::adapters::DEFAULT_BASE_URL;
use crate::config::{FIRST_SEASON, LAST_SEASON};
use crate::core::pipeline::DEFAULT_SEASON;
use crate::core::render::DisplayOptions;
use crate::core::ConfigProvider;
use crate::domain::model::{
    DataLayout, OutputFormat, PercentagePolicy, RoundOrdering, RoundRange,
};
use crate::utils::error::{EtlError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub ladder: LadderConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub display: Option<DisplayConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_input")]
    pub input: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub layout: Option<DataLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderConfig {
    #[serde(default = "default_season")]
    pub season: i32,
    #[serde(default = "default_first_round")]
    pub first_round: String,
    #[serde(default = "default_last_round")]
    pub last_round: String,
    #[serde(default)]
    pub round_order: RoundOrdering,
    #[serde(default)]
    pub percentage_policy: PercentagePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub output_formats: Vec<OutputFormat>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 0 表示不截斷
    pub max_rows: Option<usize>,
    pub width: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_input() -> String {
    DataLayout::GAMES_FILE.to_string()
}

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_season() -> i32 {
    DEFAULT_SEASON
}

fn default_first_round() -> String {
    "R1".to_string()
}

fn default_last_round() -> String {
    "R9".to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            data_dir: default_data_dir(),
            base_url: default_base_url(),
            layout: None,
        }
    }
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            season: default_season(),
            first_round: default_first_round(),
            last_round: default_last_round(),
            round_order: RoundOrdering::default(),
            percentage_policy: PercentagePolicy::default(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: Vec::new(),
            compression: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn data_dir(&self) -> &str {
        &self.source.data_dir
    }

    pub fn display_options(&self) -> DisplayOptions {
        let defaults = DisplayOptions::default();
        match &self.display {
            Some(display) => DisplayOptions {
                max_rows: match display.max_rows {
                    Some(0) => None,
                    Some(rows) => Some(rows),
                    None => defaults.max_rows,
                },
                width: display.width.unwrap_or(defaults.width),
            },
            None => defaults,
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_format(&self) -> LogFormat {
        self.monitoring
            .as_ref()
            .map(|m| m.log_format)
            .unwrap_or_default()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_name(&self) -> &str {
        &self.source.input
    }

    fn base_url(&self) -> &str {
        &self.source.base_url
    }

    fn layout(&self) -> Option<DataLayout> {
        self.source.layout
    }

    fn season(&self) -> i32 {
        self.ladder.season
    }

    fn round_range(&self) -> RoundRange {
        RoundRange::new(&self.ladder.first_round, &self.ladder.last_round)
            .with_ordering(self.ladder.round_order)
    }

    fn percentage_policy(&self) -> PercentagePolicy {
        self.ladder.percentage_policy
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.load.output_formats
    }

    fn compress_output(&self) -> bool {
        self.load
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("source.input", &self.source.input)?;
        validation::validate_file_extension("source.input", &self.source.input, &["txt"])?;
        validation::validate_path("source.data_dir", &self.source.data_dir)?;
        validation::validate_url("source.base_url", &self.source.base_url)?;
        validation::validate_range("ladder.season", self.ladder.season, FIRST_SEASON, LAST_SEASON)?;
        validation::validate_round_label("ladder.first_round", &self.ladder.first_round)?;
        validation::validate_round_label("ladder.last_round", &self.ladder.last_round)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;

        if let Some(width) = self.display.as_ref().and_then(|d| d.width) {
            validation::validate_positive_number("display.width", width, 20)?;
        }

        if self.compress_output() && self.load.output_formats.is_empty() {
            return Err(EtlError::ConfigValidationError {
                field: "load.compression".to_string(),
                message: "compression is enabled but no output_formats are configured".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[source]
input = "bg3.txt"
data_dir = "./data"
base_url = "https://afltables.com/afl/stats/biglists/"

[ladder]
season = 1990
first_round = "R1"
last_round = "R22"
round_order = "numeric"
percentage_policy = "reject"

[load]
output_path = "./ladders"
output_formats = ["csv", "json"]

[load.compression]
enabled = true

[display]
max_rows = 0
width = 120

[monitoring]
enabled = true
log_format = "json"
"#;

    #[test]
    fn test_full_config() {
        let config = TomlConfig::from_toml_str(FULL).unwrap();

        assert_eq!(config.season(), 1990);
        assert_eq!(config.data_dir(), "./data");
        assert_eq!(
            config.round_range(),
            RoundRange::new("R1", "R22").with_ordering(RoundOrdering::Numeric)
        );
        assert_eq!(config.percentage_policy(), PercentagePolicy::Reject);
        assert_eq!(config.output_formats(), &[OutputFormat::Csv, OutputFormat::Json]);
        assert!(config.compress_output());
        assert_eq!(
            config.display_options(),
            DisplayOptions { max_rows: None, width: 120 }
        );
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_format(), LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.input_name(), "bg3.txt");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.season(), 2016);
        assert_eq!(config.round_range(), RoundRange::default());
        assert_eq!(config.display_options(), DisplayOptions::default());
        assert!(!config.compress_output());
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("LADDER_TEST_DATA_DIR", "/tmp/feeds");
        let config = TomlConfig::from_toml_str(
            "[source]\ndata_dir = \"${LADDER_TEST_DATA_DIR}\"\ninput = \"${LADDER_TEST_UNSET_VAR}.txt\"\n",
        )
        .unwrap();

        assert_eq!(config.data_dir(), "/tmp/feeds");
        assert_eq!(config.input_name(), "${LADDER_TEST_UNSET_VAR}.txt");
    }

    #[test]
    fn test_invalid_values() {
        let config = TomlConfig::from_toml_str("[ladder]\nseason = 1066\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[load.compression]\nenabled = true\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(EtlError::ConfigValidationError { .. })
        ));

        assert!(TomlConfig::from_toml_str("[ladder]\nround_order = \"alphabetical\"\n").is_err());
    }
}
