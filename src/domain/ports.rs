use crate::domain::model::{
    DataLayout, OutputFormat, PercentagePolicy, RoundRange, TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// Retrieves a named resource from wherever the feed is published.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, name: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_name(&self) -> &str;
    fn base_url(&self) -> &str;
    fn layout(&self) -> Option<DataLayout>;
    fn season(&self) -> i32;
    fn round_range(&self) -> RoundRange;
    fn percentage_policy(&self) -> PercentagePolicy;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[OutputFormat];
    fn compress_output(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<String>;
    async fn transform(&self, raw: String) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<Vec<String>>;
}
