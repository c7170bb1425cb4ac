use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::domain::GeneSymbol;
use crate::error::ExtractError;

const GENETICS_BASE_URL: &str = "https://medlineplus.gov/download/genetics";

pub trait MedlineClient: Send + Sync {
    fn fetch_gene_record(&self, gene: &GeneSymbol) -> Result<Option<Value>, ExtractError>;
}

#[derive(Clone)]
pub struct MedlineHttpClient {
    client: Client,
    base_url: String,
}

impl MedlineHttpClient {
    pub fn new() -> Result<Self, ExtractError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!(
                "genereviews-extractor/{}",
                env!("CARGO_PKG_VERSION")
            ))
            .map_err(|err| ExtractError::Filesystem(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| ExtractError::MedlineHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: GENETICS_BASE_URL.to_string(),
        })
    }
}

impl MedlineClient for MedlineHttpClient {
    // The genetics download endpoint has no per-gene error body; anything
    // other than success means the gene has no MedlinePlus record.
    fn fetch_gene_record(&self, gene: &GeneSymbol) -> Result<Option<Value>, ExtractError> {
        let url = format!(
            "{}/gene/{}.json",
            self.base_url,
            gene.as_str().to_lowercase()
        );
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| ExtractError::MedlineHttp(err.to_string()))?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let record: Value = response
            .json()
            .map_err(|err| ExtractError::MedlineHttp(err.to_string()))?;
        Ok(Some(record))
    }
}
