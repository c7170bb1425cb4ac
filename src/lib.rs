pub mod app;
pub mod cache;
pub mod domain;
pub mod error;
pub mod genelist;
pub mod genereviews;
pub mod html;
pub mod mapping;
pub mod medline;
pub mod output;
