use std::fs;

use genereviews_extractor::app::{BatchReport, DiseaseEntry, GeneResult};
use genereviews_extractor::output::JsonOutput;

fn sample_report() -> BatchReport {
    BatchReport {
        genes_processed: 1,
        timestamp: "2025-01-15 10:30:00".to_string(),
        results: vec![GeneResult {
            gene: "GENE1".to_string(),
            diseases: vec![DiseaseEntry {
                nbk_id: "NBK001".to_string(),
                disease_name: "Disease X".to_string(),
                clinical_characteristics: "Early onset.".to_string(),
                evaluation_of_relatives: "Test sibs.".to_string(),
                genetic_counseling: "Autosomal dominant.".to_string(),
            }],
            error: None,
        }],
    }
}

#[test]
fn report_serializes_with_stable_field_names() {
    let json = serde_json::to_value(sample_report()).unwrap();

    assert_eq!(json["genes_processed"], 1);
    assert_eq!(json["timestamp"], "2025-01-15 10:30:00");
    assert_eq!(json["results"][0]["gene"], "GENE1");
    assert!(json["results"][0]["error"].is_null());

    let entry = &json["results"][0]["diseases"][0];
    assert_eq!(entry["nbk_id"], "NBK001");
    assert_eq!(entry["disease_name"], "Disease X");
    assert_eq!(entry["clinical_characteristics"], "Early onset.");
    assert_eq!(entry["evaluation_of_relatives"], "Test sibs.");
    assert_eq!(entry["genetic_counseling"], "Autosomal dominant.");
}

#[test]
fn write_report_creates_parent_directories() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("reports").join("batch.json");
    JsonOutput::write_report(&path, &sample_report()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let parsed: BatchReport = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.genes_processed, 1);
    assert_eq!(parsed.results[0].diseases[0].disease_name, "Disease X");
}

#[test]
fn write_report_overwrites_previous_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("batch.json");

    let mut report = sample_report();
    JsonOutput::write_report(&path, &report).unwrap();
    report.genes_processed = 7;
    JsonOutput::write_report(&path, &report).unwrap();

    let parsed: BatchReport =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.genes_processed, 7);
}
