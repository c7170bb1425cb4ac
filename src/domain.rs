use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneSymbol(String);

impl GeneSymbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GeneSymbol {
    type Err = ExtractError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        let is_valid = !normalized.is_empty()
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '@' | '.'));
        if !is_valid {
            return Err(ExtractError::InvalidGeneSymbol(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NbkId(String);

impl NbkId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NbkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NbkId {
    type Err = ExtractError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        let is_valid = !normalized.is_empty()
            && !normalized
                .chars()
                .any(|ch| ch.is_whitespace() || ch == '/');
        if !is_valid {
            return Err(ExtractError::InvalidNbkId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_gene_symbol_normalizes_case() {
        let gene: GeneSymbol = " brca1 ".parse().unwrap();
        assert_eq!(gene.as_str(), "BRCA1");
    }

    #[test]
    fn parse_gene_symbol_allows_family_markers() {
        let gene: GeneSymbol = "HBA@".parse().unwrap();
        assert_eq!(gene.as_str(), "HBA@");
    }

    #[test]
    fn parse_gene_symbol_rejects_empty() {
        let err = "   ".parse::<GeneSymbol>().unwrap_err();
        assert_matches!(err, ExtractError::InvalidGeneSymbol(_));
    }

    #[test]
    fn parse_gene_symbol_rejects_inner_whitespace() {
        let err = "BR CA1".parse::<GeneSymbol>().unwrap_err();
        assert_matches!(err, ExtractError::InvalidGeneSymbol(_));
    }

    #[test]
    fn parse_nbk_id_trims() {
        let id: NbkId = " NBK1247 ".parse().unwrap();
        assert_eq!(id.as_str(), "NBK1247");
    }

    #[test]
    fn parse_nbk_id_rejects_path_fragments() {
        let err = "NBK1247/section".parse::<NbkId>().unwrap_err();
        assert_matches!(err, ExtractError::InvalidNbkId(_));
    }
}
