pub mod etl;
pub mod expander;
pub mod ladder;
pub mod parser;
pub mod pipeline;
pub mod render;

pub use crate::domain::model::{
    Ladder, LadderEntry, LadderRun, RawGameRow, TeamGameRecord, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Fetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
