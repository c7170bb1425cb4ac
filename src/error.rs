use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    #[error("invalid gene symbol: {0}")]
    InvalidGeneSymbol(String),

    #[error("invalid NBK document id: {0}")]
    InvalidNbkId(String),

    #[error("no genes given: pass --genes or --gene-file")]
    MissingGenes,

    #[error("failed to read gene list at {0}")]
    GeneListRead(PathBuf),

    #[error("mapping table request failed: {0}")]
    MappingHttp(String),

    #[error("mapping table returned status {status}: {message}")]
    MappingStatus { status: u16, message: String },

    #[error("GeneReviews request failed: {0}")]
    GeneReviewsHttp(String),

    #[error("GeneReviews returned status {status}: {message}")]
    GeneReviewsStatus { status: u16, message: String },

    #[error("MedlinePlus request failed: {0}")]
    MedlineHttp(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
