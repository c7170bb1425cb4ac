use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::ExtractError;

pub fn read_gene_file(path: &Path) -> Result<Vec<String>, ExtractError> {
    let content = fs::read_to_string(path)
        .map_err(|_| ExtractError::GeneListRead(path.to_path_buf()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

// Case-insensitive, first occurrence wins, input order kept.
pub fn dedup_symbols(tokens: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for token in tokens {
        let normalized = token.trim().to_uppercase();
        if normalized.is_empty() {
            continue;
        }
        if seen.insert(normalized.clone()) {
            out.push(normalized);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_ignores_case_and_order_survives() {
        let tokens = vec![
            "BRCA1".to_string(),
            "brca1".to_string(),
            "TP53".to_string(),
        ];
        assert_eq!(dedup_symbols(&tokens), vec!["BRCA1", "TP53"]);
    }

    #[test]
    fn dedup_drops_blank_tokens() {
        let tokens = vec!["  ".to_string(), "mlh1".to_string()];
        assert_eq!(dedup_symbols(&tokens), vec!["MLH1"]);
    }
}
