// Adapters layer: concrete implementations for external systems.

pub mod fetch;

pub use fetch::{download_sample_data, HttpFetcher, DEFAULT_BASE_URL, SAMPLE_FILES};
