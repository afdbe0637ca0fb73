pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use adapters::{download_sample_data, HttpFetcher};
pub use app::pipelines::LadderPipeline;
pub use crate::core::{etl::EtlEngine, pipeline::LadderRequest, render::DisplayOptions};
pub use domain::model::{
    DataLayout, Ladder, LadderEntry, OutputFormat, PercentagePolicy, RoundOrdering, RoundRange,
    TeamGameRecord,
};
pub use utils::error::{EtlError, Result};
