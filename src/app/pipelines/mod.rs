pub mod ladder_pipeline;

pub use ladder_pipeline::LadderPipeline;
