use std::collections::HashMap;
use std::str::FromStr;

use crate::domain::{GeneSymbol, NbkId};
use crate::error::ExtractError;
use crate::genereviews::GeneReviewsClient;

#[derive(Debug, Clone, Default)]
pub struct GeneMapping {
    gene_to_documents: HashMap<GeneSymbol, Vec<NbkId>>,
    document_to_gene: HashMap<NbkId, GeneSymbol>,
}

impl GeneMapping {
    pub fn load<C: GeneReviewsClient>(client: &C) -> Result<Self, ExtractError> {
        let table = client.fetch_mapping_table()?;
        Ok(Self::parse(&table))
    }

    // Table rows are NBK id, short name, then a semicolon-separated gene
    // list. Rows without a gene list and tokens that fail validation are
    // skipped.
    pub fn parse(table: &str) -> Self {
        let mut mapping = Self::default();
        for line in table.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 2 {
                continue;
            }
            let Ok(document) = NbkId::from_str(fields[0]) else {
                continue;
            };
            let Some(genes) = fields.get(2) else {
                continue;
            };
            for token in genes.split(';') {
                let Ok(gene) = GeneSymbol::from_str(token) else {
                    continue;
                };
                mapping
                    .gene_to_documents
                    .entry(gene.clone())
                    .or_default()
                    .push(document.clone());
                // Later rows win; GeneReviews reuses NBK ids across
                // multi-gene entries and the feed lists them repeatedly.
                mapping.document_to_gene.insert(document.clone(), gene);
            }
        }
        mapping
    }

    pub fn gene_count(&self) -> usize {
        self.gene_to_documents.len()
    }

    pub fn documents_for(&self, gene: &GeneSymbol) -> &[NbkId] {
        self.gene_to_documents
            .get(gene)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn gene_for(&self, document: &NbkId) -> Option<&GeneSymbol> {
        self.document_to_gene.get(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_registers_each_gene_token() {
        let table = "NBK100\tshort-name\tBRCA1;brca2 \nNBK200\tother\tBRCA1";
        let mapping = GeneMapping::parse(table);

        let brca1: GeneSymbol = "BRCA1".parse().unwrap();
        let brca2: GeneSymbol = "BRCA2".parse().unwrap();
        let docs: Vec<&str> = mapping
            .documents_for(&brca1)
            .iter()
            .map(NbkId::as_str)
            .collect();
        assert_eq!(docs, vec!["NBK100", "NBK200"]);
        let docs: Vec<&str> = mapping
            .documents_for(&brca2)
            .iter()
            .map(NbkId::as_str)
            .collect();
        assert_eq!(docs, vec!["NBK100"]);
    }

    #[test]
    fn parse_skips_short_and_blank_lines() {
        let table = "\nNBK1\n\nNBK2\tname\tGENE1\n";
        let mapping = GeneMapping::parse(table);
        assert_eq!(mapping.gene_count(), 1);
    }

    #[test]
    fn reverse_lookup_keeps_last_gene() {
        let table = "NBK300\tname\tGENE1;GENE2";
        let mapping = GeneMapping::parse(table);
        let doc: NbkId = "NBK300".parse().unwrap();
        assert_eq!(mapping.gene_for(&doc).map(GeneSymbol::as_str), Some("GENE2"));
    }
}
