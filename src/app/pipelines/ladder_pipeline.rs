use crate::adapters::download_sample_data;
use crate::core::pipeline::{run_stages, LadderRequest};
use crate::core::render::render_output;
use crate::core::{ConfigProvider, Fetcher, Pipeline, Storage, TransformResult};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Reads the feed from `data` (downloading it first when absent), computes
/// the ladder and writes the configured exports to `output`.
pub struct LadderPipeline<S: Storage, F: Fetcher, C: ConfigProvider> {
    data: S,
    output: S,
    fetcher: F,
    config: C,
}

impl<S: Storage, F: Fetcher, C: ConfigProvider> LadderPipeline<S, F, C> {
    pub fn new(data: S, output: S, fetcher: F, config: C) -> Self {
        Self {
            data,
            output,
            fetcher,
            config,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn output_location(&self, name: &str) -> String {
        format!("{}/{}", self.config.output_path(), name)
    }
}

fn zip_bundle(files: &[(String, String)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in files {
        zip.start_file(name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(content.as_bytes())?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, F: Fetcher, C: ConfigProvider> Pipeline for LadderPipeline<S, F, C> {
    async fn extract(&self) -> Result<String> {
        let name = self.config.input_name();

        if !self.data.exists(name).await {
            tracing::warn!("📭 {} not found locally, downloading sample data", name);
            download_sample_data(&self.fetcher, &self.data, &[name]).await?;
        }

        let bytes = self.data.read_file(name).await?;
        tracing::debug!("Read {} bytes from {}", bytes.len(), name);

        // 資料應為 ASCII，個別壞字元不中斷流程
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn transform(&self, raw: String) -> Result<TransformResult> {
        let request = LadderRequest::from_config(&self.config)?;
        tracing::debug!("Ladder request: {:?}", request);
        run_stages(&raw, &request)
    }

    async fn load(&self, result: &TransformResult) -> Result<Vec<String>> {
        let formats = self.config.output_formats();
        if formats.is_empty() {
            tracing::debug!("No output formats configured, nothing to write");
            return Ok(Vec::new());
        }

        let stem = format!("ladder_{}", result.ladder.season);
        let files = formats
            .iter()
            .map(|format| {
                let content = render_output(&result.ladder, *format)?;
                Ok((format!("{}.{}", stem, format.extension()), content))
            })
            .collect::<Result<Vec<_>>>()?;

        if self.config.compress_output() {
            let zip_name = format!("{}.zip", stem);
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let zip_data = zip_bundle(&files)?;
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.output.write_file(&zip_name, &zip_data).await?;
            return Ok(vec![self.output_location(&zip_name)]);
        }

        let mut written = Vec::with_capacity(files.len());
        for (name, content) in &files {
            self.output.write_file(name, content.as_bytes()).await?;
            written.push(self.output_location(name));
        }
        Ok(written)
    }
}
