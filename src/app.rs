use std::str::FromStr;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::DiskCache;
use crate::domain::{GeneSymbol, NbkId};
use crate::error::ExtractError;
use crate::genereviews::{ArticleSections, GeneReviewsClient};
use crate::html;
use crate::mapping::GeneMapping;
use crate::medline::MedlineClient;

pub trait ProgressSink {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub delay: Duration,
    pub gene_info: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            gene_info: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseEntry {
    pub nbk_id: String,
    pub disease_name: String,
    pub clinical_characteristics: String,
    pub evaluation_of_relatives: String,
    pub genetic_counseling: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneResult {
    pub gene: String,
    pub diseases: Vec<DiseaseEntry>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub genes_processed: usize,
    pub timestamp: String,
    pub results: Vec<GeneResult>,
}

pub struct App<G: GeneReviewsClient, M: MedlineClient> {
    mapping: GeneMapping,
    cache: DiskCache,
    reviews: G,
    medline: M,
}

impl<G: GeneReviewsClient, M: MedlineClient> App<G, M> {
    pub fn new(mapping: GeneMapping, cache: DiskCache, reviews: G, medline: M) -> Self {
        Self {
            mapping,
            cache,
            reviews,
            medline,
        }
    }

    pub fn fetch_article(&self, id: &NbkId) -> Result<ArticleSections, ExtractError> {
        let cache_key = format!("genereview_{id}");
        if let Some(cached) = self.cache.get::<ArticleSections>(&cache_key) {
            return Ok(cached);
        }

        let body = self.reviews.fetch_article_html(id)?;
        let disease_name = match html::page_title(&body) {
            Some(title) => title.split(" - ").next().unwrap_or_default().to_string(),
            None => "Unknown Disease".to_string(),
        };
        let sections = ArticleSections {
            disease_name,
            clinical_characteristics: html::extract_section(&body, "Clinical Characteristics"),
            evaluation_of_relatives: html::extract_section(
                &body,
                "Evaluation of Relatives at Risk",
            ),
            genetic_counseling: html::extract_section(&body, "Genetic Counseling"),
        };
        self.cache.put(&cache_key, &sections)?;
        Ok(sections)
    }

    pub fn gene_info(&self, gene: &GeneSymbol) -> Result<Option<Value>, ExtractError> {
        let cache_key = format!("gene_{gene}");
        if let Some(cached) = self.cache.get::<Value>(&cache_key) {
            return Ok(Some(cached));
        }
        let Some(record) = self.medline.fetch_gene_record(gene)? else {
            return Ok(None);
        };
        self.cache.put(&cache_key, &record)?;
        Ok(Some(record))
    }

    // Failures never escape the gene boundary; they land in the result's
    // error field while already fetched articles are kept.
    pub fn gene_sections(&self, raw: &str, sink: &dyn ProgressSink) -> GeneResult {
        let display = raw.trim().to_uppercase();
        let gene = match GeneSymbol::from_str(&display) {
            Ok(gene) => gene,
            Err(err) => {
                sink.error(&format!("Error processing gene {display}: {err}"));
                return GeneResult {
                    gene: display,
                    diseases: Vec::new(),
                    error: Some(err.to_string()),
                };
            }
        };

        let documents = self.mapping.documents_for(&gene);
        if documents.is_empty() {
            return GeneResult {
                gene: gene.as_str().to_string(),
                diseases: Vec::new(),
                error: Some(format!("No GeneReviews entries found for gene {gene}")),
            };
        }

        let mut diseases = Vec::new();
        for id in documents {
            match self.fetch_article(id) {
                Ok(sections) => diseases.push(DiseaseEntry {
                    nbk_id: id.as_str().to_string(),
                    disease_name: sections.disease_name,
                    clinical_characteristics: sections.clinical_characteristics,
                    evaluation_of_relatives: sections.evaluation_of_relatives,
                    genetic_counseling: sections.genetic_counseling,
                }),
                Err(err) => {
                    sink.error(&format!(
                        "Error fetching GeneReviews content for {id}: {err}"
                    ));
                }
            }
        }

        let error = diseases
            .is_empty()
            .then(|| format!("Failed to fetch any GeneReviews content for {gene}"));
        GeneResult {
            gene: gene.as_str().to_string(),
            diseases,
            error,
        }
    }

    pub fn run_batch(
        &self,
        genes: &[String],
        options: &BatchOptions,
        sink: &dyn ProgressSink,
    ) -> BatchReport {
        let mut results = Vec::with_capacity(genes.len());
        for (index, gene) in genes.iter().enumerate() {
            sink.info(&format!("Processing gene: {gene}"));
            if options.gene_info {
                self.warm_gene_info(gene, sink);
            }
            results.push(self.gene_sections(gene, sink));
            // Stay polite to the Bookshelf servers between genes.
            if index + 1 < genes.len() && !options.delay.is_zero() {
                thread::sleep(options.delay);
            }
        }
        BatchReport {
            genes_processed: results.len(),
            timestamp: report_timestamp(),
            results,
        }
    }

    fn warm_gene_info(&self, raw: &str, sink: &dyn ProgressSink) {
        let Ok(gene) = GeneSymbol::from_str(raw) else {
            return;
        };
        if let Err(err) = self.gene_info(&gene) {
            sink.error(&format!("Error fetching gene info for {gene}: {err}"));
        }
    }
}

fn report_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
