use crate::domain::model::DataLayout;
use crate::domain::ports::{Fetcher, Storage};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://afltables.com/afl/stats/biglists/";

/// Results (`bg3.txt`) and attendance (`bg7.txt`) for every game since 1897.
pub const SAMPLE_FILES: [&str; 2] = [DataLayout::GAMES_FILE, DataLayout::ATTENDANCE_FILE];

/// Downloads feed files relative to a fixed base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|e| EtlError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        // join() replaces the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            base_url: base,
        })
    }

    pub fn url_for(&self, name: &str) -> Result<Url> {
        self.base_url.join(name).map_err(|e| EtlError::InvalidConfigValueError {
            field: "input".to_string(),
            value: name.to_string(),
            reason: format!("Cannot build download URL: {}", e),
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let url = self.url_for(name)?;
        tracing::info!("🌐 Downloading from {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("Download response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::FetchError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Fetches each named file and stores it verbatim under the same name.
pub async fn download_sample_data<F, S>(
    fetcher: &F,
    storage: &S,
    names: &[&str],
) -> Result<Vec<(String, usize)>>
where
    F: Fetcher,
    S: Storage,
{
    let mut written = Vec::with_capacity(names.len());
    for name in names {
        let data = fetcher.fetch(name).await?;
        storage.write_file(name, &data).await?;
        tracing::info!("Wrote {} bytes to {}", data.len(), name);
        written.push((name.to_string(), data.len()));
    }
    Ok(written)
}
