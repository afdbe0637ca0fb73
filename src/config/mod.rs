pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::DEFAULT_BASE_URL;
#[cfg(feature = "cli")]
use crate::core::pipeline::DEFAULT_SEASON;
#[cfg(feature = "cli")]
use crate::core::render::DisplayOptions;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{
    DataLayout, OutputFormat, PercentagePolicy, RoundOrdering, RoundRange,
};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

pub const FIRST_SEASON: i32 = 1897;
pub const LAST_SEASON: i32 = 2100;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "ladder-etl")]
#[command(about = "Season ladder from the AFL Tables results feed")]
pub struct CliConfig {
    /// Feed file to read (bg3.txt = games, bg7.txt = attendance)
    #[arg(long, default_value = "bg3.txt")]
    pub input: String,

    /// Directory holding the feed files; missing files are downloaded here
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Override the layout inferred from the input file name
    #[arg(long, value_enum)]
    pub layout: Option<DataLayout>,

    #[arg(long, default_value_t = DEFAULT_SEASON)]
    pub season: i32,

    #[arg(long, default_value = "R1")]
    pub first_round: String,

    #[arg(long, default_value = "R9")]
    pub last_round: String,

    #[arg(long, value_enum, default_value_t = RoundOrdering::Lexicographic)]
    pub round_order: RoundOrdering,

    #[arg(long, value_enum, default_value_t = PercentagePolicy::Propagate)]
    pub percentage_policy: PercentagePolicy,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub output_formats: Vec<OutputFormat>,

    /// Bundle the output files into one ZIP archive
    #[arg(long)]
    pub zip: bool,

    /// Rows printed before the table is truncated (0 = all)
    #[arg(long, default_value_t = 20)]
    pub max_rows: usize,

    #[arg(long, default_value_t = 200)]
    pub width: usize,

    /// Only download bg3.txt and bg7.txt into the data directory
    #[arg(long)]
    pub fetch_only: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per stage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            max_rows: (self.max_rows > 0).then_some(self.max_rows),
            width: self.width,
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_name(&self) -> &str {
        &self.input
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn layout(&self) -> Option<DataLayout> {
        self.layout
    }

    fn season(&self) -> i32 {
        self.season
    }

    fn round_range(&self) -> RoundRange {
        RoundRange::new(&self.first_round, &self.last_round).with_ordering(self.round_order)
    }

    fn percentage_policy(&self) -> PercentagePolicy {
        self.percentage_policy
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.output_formats
    }

    fn compress_output(&self) -> bool {
        self.zip
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &["txt"])?;
        validation::validate_path("data_dir", &self.data_dir)?;
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_range("season", self.season, FIRST_SEASON, LAST_SEASON)?;
        validation::validate_round_label("first_round", &self.first_round)?;
        validation::validate_round_label("last_round", &self.last_round)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("width", self.width, 20)?;

        tracing::debug!("✅ CLI configuration validation passed");
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::pipeline::LadderRequest;

    #[test]
    fn test_defaults_match_original_tool() {
        let config = CliConfig::parse_from(["ladder-etl"]);
        assert_eq!(config.input, "bg3.txt");
        assert_eq!(config.season, 2016);
        assert_eq!(config.round_range(), RoundRange::default());
        assert_eq!(config.display_options(), DisplayOptions::default());
        assert!(config.output_formats.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_formats_and_overrides() {
        let config = CliConfig::parse_from([
            "ladder-etl",
            "--season",
            "1990",
            "--last-round",
            "R22",
            "--round-order",
            "numeric",
            "--output-formats",
            "csv,json",
            "--max-rows",
            "0",
            "--layout",
            "games",
        ]);
        assert_eq!(config.season, 1990);
        assert_eq!(config.output_formats, vec![OutputFormat::Csv, OutputFormat::Json]);
        assert_eq!(config.round_range().ordering, RoundOrdering::Numeric);
        assert_eq!(config.display_options().max_rows, None);
        assert_eq!(config.layout(), Some(DataLayout::Games));
    }

    #[test]
    fn test_custom_feed_name_needs_layout() {
        let config = CliConfig::parse_from(["ladder-etl", "--input", "games"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["ladder-etl", "--input", "mirror_2016.txt"]);
        assert!(config.validate().is_ok());
        assert!(LadderRequest::from_config(&config).unwrap_err().is_format_error());

        let config = CliConfig::parse_from([
            "ladder-etl",
            "--input",
            "mirror_2016.txt",
            "--layout",
            "games",
        ]);
        assert!(config.validate().is_ok());
        assert_eq!(LadderRequest::from_config(&config).unwrap().layout, DataLayout::Games);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = CliConfig::parse_from(["ladder-etl"]);
        config.season = 1800;
        assert!(config.validate().is_err());

        let mut config = CliConfig::parse_from(["ladder-etl"]);
        config.first_round = "first".to_string();
        assert!(config.validate().is_err());

        let mut config = CliConfig::parse_from(["ladder-etl"]);
        config.base_url = "ftp://afltables.com".to_string();
        assert!(config.validate().is_err());
    }
}
