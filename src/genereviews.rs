use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};

use crate::domain::NbkId;
use crate::error::ExtractError;

pub const MAPPING_URL: &str =
    "https://ftp.ncbi.nih.gov/pub/GeneReviews/NBKid_shortname_genesymbol.txt";
const BOOKS_BASE_URL: &str = "https://www.ncbi.nlm.nih.gov/books";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSections {
    pub disease_name: String,
    pub clinical_characteristics: String,
    pub evaluation_of_relatives: String,
    pub genetic_counseling: String,
}

pub trait GeneReviewsClient: Send + Sync {
    fn fetch_mapping_table(&self) -> Result<String, ExtractError>;
    fn fetch_article_html(&self, id: &NbkId) -> Result<String, ExtractError>;
}

#[derive(Clone)]
pub struct GeneReviewsHttpClient {
    client: Client,
    books_base_url: String,
    mapping_url: String,
}

impl GeneReviewsHttpClient {
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
            .map_err(|err| ExtractError::GeneReviewsHttp(err.to_string()))?;
        Ok(Self {
            client,
            books_base_url: BOOKS_BASE_URL.to_string(),
            mapping_url: MAPPING_URL.to_string(),
        })
    }
}

impl GeneReviewsClient for GeneReviewsHttpClient {
    fn fetch_mapping_table(&self) -> Result<String, ExtractError> {
        let response = self
            .client
            .get(&self.mapping_url)
            .send()
            .map_err(|err| ExtractError::MappingHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "mapping table request failed".to_string());
            return Err(ExtractError::MappingStatus { status, message });
        }
        response
            .text()
            .map_err(|err| ExtractError::MappingHttp(err.to_string()))
    }

    fn fetch_article_html(&self, id: &NbkId) -> Result<String, ExtractError> {
        let url = format!("{}/{}/", self.books_base_url, id.as_str());
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| ExtractError::GeneReviewsHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "GeneReviews request failed".to_string());
            return Err(ExtractError::GeneReviewsStatus { status, message });
        }
        response
            .text()
            .map_err(|err| ExtractError::GeneReviewsHttp(err.to_string()))
    }
}
