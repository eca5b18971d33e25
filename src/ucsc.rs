use std::fs::File;
use std::thread;
use std::time::Duration;

use camino::Utf8Path;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::domain::OrganismDb;
use crate::error::MirrorError;

/// Access to the UCSC goldenPath download area.
pub trait UcscClient: Send + Sync {
    /// Names of the files available under `goldenPath/{db}/database/`.
    fn list_database_files(&self, db: &OrganismDb) -> Result<Vec<String>, MirrorError>;

    /// Download one database dump to `destination`.
    fn download_file(
        &self,
        db: &OrganismDb,
        filename: &str,
        destination: &Utf8Path,
    ) -> Result<(), MirrorError>;
}

pub struct UcscHttpClient {
    client: Client,
    base_url: String,
    href: Regex,
}

impl UcscHttpClient {
    pub fn new() -> Result<Self, MirrorError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("track-mirror/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| MirrorError::UcscHttp(err.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|err| MirrorError::UcscHttp(err.to_string()))?;

        let href = Regex::new(r#"href="([^"/?]+)""#)
            .map_err(|err| MirrorError::UcscHttp(err.to_string()))?;

        Ok(Self {
            client,
            base_url: "https://hgdownload.soe.ucsc.edu/goldenPath".to_string(),
            href,
        })
    }

    fn database_url(&self, db: &OrganismDb) -> String {
        format!("{}/{}/database", self.base_url, db.as_str())
    }

    fn send_with_retries<F>(&self, mut make_req: F) -> Result<reqwest::blocking::Response, MirrorError>
    where
        F: FnMut() -> reqwest::blocking::RequestBuilder,
    {
        const MAX_RETRIES: usize = 3;
        const BASE_DELAY_MS: u64 = 200;
        let mut attempt = 0usize;
        loop {
            let response = make_req().send();
            match response {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if attempt < MAX_RETRIES && is_retryable_status(status) {
                        let delay = BASE_DELAY_MS * (attempt as u64 + 1);
                        thread::sleep(Duration::from_millis(delay));
                        attempt += 1;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(err) => {
                    if attempt < MAX_RETRIES && is_retryable_error(&err) {
                        let delay = BASE_DELAY_MS * (attempt as u64 + 1);
                        thread::sleep(Duration::from_millis(delay));
                        attempt += 1;
                        continue;
                    }
                    return Err(MirrorError::UcscHttp(err.to_string()));
                }
            }
        }
    }
}

impl UcscClient for UcscHttpClient {
    fn list_database_files(&self, db: &OrganismDb) -> Result<Vec<String>, MirrorError> {
        let url = format!("{}/", self.database_url(db));
        let response = self.send_with_retries(|| self.client.get(&url))?;
        if !response.status().is_success() {
            return Err(MirrorError::UcscStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        let index = response
            .text()
            .map_err(|err| MirrorError::UcscHttp(err.to_string()))?;
        let mut files: Vec<String> = self
            .href
            .captures_iter(&index)
            .map(|capture| capture[1].to_string())
            .filter(|name| name.ends_with(".txt.gz"))
            .collect();
        files.sort();
        files.dedup();
        debug!(db = %db, count = files.len(), "listed database dumps");
        Ok(files)
    }

    fn download_file(
        &self,
        db: &OrganismDb,
        filename: &str,
        destination: &Utf8Path,
    ) -> Result<(), MirrorError> {
        let url = format!("{}/{}", self.database_url(db), filename);
        let mut response = self.send_with_retries(|| self.client.get(&url))?;
        if !response.status().is_success() {
            return Err(MirrorError::UcscStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        let mut file = File::create(destination.as_std_path())
            .map_err(|err| MirrorError::Filesystem(format!("create {destination}: {err}")))?;
        std::io::copy(&mut response, &mut file)
            .map_err(|err| MirrorError::Filesystem(err.to_string()))?;
        debug!(%url, "downloaded dump");
        Ok(())
    }
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
