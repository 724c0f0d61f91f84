//! Card glob expansion
//!
//! A glob is a comma separated list of subglobs. Each subglob is either a
//! card name (matched case-insensitively) or a filter expression over card
//! attributes:
//!
//! ```text
//! Worker's Village,Smithy
//! Silver,Cost==3 && Actions>=1 && Cards >= 1
//! ```
//!
//! Expansion never fails. Cards whose attributes cannot satisfy an
//! expression (missing attribute, text where a number is compared) are
//! skipped and reported in [`GlobExpansion::diagnostics`].

use councilroom_glob::{evaluate, parse_filter, EvalError, FilterExpr, ParseError};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::CardCatalog;
use crate::config::GlobConfig;

/// Why part of a glob could not be used
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GlobError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// A subglob or card that was skipped during expansion
#[derive(Debug, Clone, PartialEq)]
pub struct GlobDiagnostic {
    /// The subglob being expanded
    pub subglob: String,
    /// The card being evaluated, or `None` when the subglob did not parse
    pub card: Option<String>,
    pub error: GlobError,
}

impl std::fmt::Display for GlobDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.card {
            Some(card) => write!(f, "'{}' on {}: {}", self.subglob, card, self.error),
            None => write!(f, "'{}': {}", self.subglob, self.error),
        }
    }
}

/// Matched card names plus anything that was skipped
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobExpansion {
    pub cards: Vec<String>,
    #[serde(skip)]
    pub diagnostics: Vec<GlobDiagnostic>,
}

impl GlobExpansion {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Append another expansion, keeping duplicates
    pub fn append(&mut self, mut other: GlobExpansion) {
        self.cards.append(&mut other.cards);
        self.diagnostics.append(&mut other.diagnostics);
    }

    pub fn into_cards(self) -> Vec<String> {
        self.cards
    }
}

/// Expands globs against a card catalog
#[derive(Debug, Clone)]
pub struct GlobExpander<'a> {
    catalog: &'a CardCatalog,
    excluded_cards: Vec<String>,
}

impl<'a> GlobExpander<'a> {
    /// Create an expander with the default exclusion list
    pub fn new(catalog: &'a CardCatalog) -> Self {
        Self::with_config(catalog, &GlobConfig::default())
    }

    /// Create an expander with an explicit configuration
    pub fn with_config(catalog: &'a CardCatalog, config: &GlobConfig) -> Self {
        Self {
            catalog,
            excluded_cards: config.excluded_cards.clone(),
        }
    }

    pub fn catalog(&self) -> &'a CardCatalog {
        self.catalog
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.excluded_cards.iter().any(|excluded| excluded == name)
    }

    /// Expand one subglob.
    ///
    /// A literal name match returns that single card. Otherwise the subglob is
    /// evaluated as a filter against every non-excluded card in catalog order.
    pub fn expand_subglob(&self, subglob: &str) -> GlobExpansion {
        let subglob = subglob.trim();

        if let Some(card) = self.catalog.find_name(subglob) {
            return GlobExpansion {
                cards: vec![card.singular().to_string()],
                diagnostics: Vec::new(),
            };
        }

        match parse_filter(subglob) {
            Ok(expr) => self.filter(subglob, &expr),
            Err(e) => {
                tracing::debug!("Cannot parse card glob '{}': {}", subglob, e);
                GlobExpansion {
                    cards: Vec::new(),
                    diagnostics: vec![GlobDiagnostic {
                        subglob: subglob.to_string(),
                        card: None,
                        error: e.into(),
                    }],
                }
            }
        }
    }

    fn filter(&self, subglob: &str, expr: &FilterExpr) -> GlobExpansion {
        let mut expansion = GlobExpansion::default();

        for card in self.catalog {
            if self.is_excluded(card.singular()) {
                continue;
            }
            match evaluate(expr, card) {
                Ok(true) => expansion.cards.push(card.singular().to_string()),
                Ok(false) => {}
                Err(e) => {
                    tracing::debug!("Skipping {} for glob '{}': {}", card.singular(), subglob, e);
                    expansion.diagnostics.push(GlobDiagnostic {
                        subglob: subglob.to_string(),
                        card: Some(card.singular().to_string()),
                        error: e.into(),
                    });
                }
            }
        }

        expansion
    }

    /// Expand a comma separated glob, concatenating each subglob's matches
    pub fn expand_card_glob(&self, glob: &str) -> GlobExpansion {
        let mut expansion = GlobExpansion::default();
        for subglob in glob.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            expansion.append(self.expand_subglob(subglob));
        }
        expansion
    }
}

/// Expand one subglob with the default configuration
pub fn expand_subglob(subglob: &str, catalog: &CardCatalog) -> Vec<String> {
    GlobExpander::new(catalog).expand_subglob(subglob).into_cards()
}

/// Expand a comma separated glob with the default configuration
pub fn expand_card_glob(glob: &str, catalog: &CardCatalog) -> Vec<String> {
    GlobExpander::new(catalog).expand_card_glob(glob).into_cards()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CardRecord;

    fn catalog() -> CardCatalog {
        CardCatalog::new(vec![
            CardRecord::new("Village", [("Actions", "2"), ("Cards", "1"), ("Cost", "3")]),
            CardRecord::new("Smithy", [("Actions", "0"), ("Cards", "3"), ("Cost", "4")]),
            CardRecord::new("Festival", [("Actions", "2"), ("Cards", "0"), ("Cost", "5")]),
            CardRecord::new("Archivist", [("Actions", "1"), ("Cards", "0"), ("Cost", "5")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_literal_match_is_case_insensitive() {
        let catalog = catalog();
        for name in ["Smithy", "smithy", "SMITHY", "  Smithy  "] {
            assert_eq!(expand_subglob(name, &catalog), vec!["Smithy"]);
        }
    }

    #[test]
    fn test_expression_in_catalog_order() {
        let catalog = catalog();
        assert_eq!(
            expand_subglob("actions>=2", &catalog),
            vec!["Village", "Festival"]
        );
    }

    #[test]
    fn test_literal_beats_expression() {
        // A card literally named like an attribute is matched by name
        let catalog = CardCatalog::new(vec![
            CardRecord::new("Cards", [("Cards", "0")]),
            CardRecord::new("Smithy", [("Cards", "3")]),
        ])
        .unwrap();
        assert_eq!(expand_subglob("cards", &catalog), vec!["Cards"]);
    }

    #[test]
    fn test_excluded_cards_skip_expressions_only() {
        let catalog = catalog();
        assert_eq!(expand_subglob("cost==5", &catalog), vec!["Festival"]);
        assert_eq!(expand_subglob("archivist", &catalog), vec!["Archivist"]);

        let expander = GlobExpander::with_config(&catalog, &GlobConfig { excluded_cards: vec![] });
        assert_eq!(
            expander.expand_subglob("cost==5").cards,
            vec!["Festival", "Archivist"]
        );
    }

    #[test]
    fn test_glob_concatenates_with_duplicates() {
        let catalog = catalog();
        assert_eq!(
            expand_card_glob("Smithy, cards>=1", &catalog),
            vec!["Smithy", "Village", "Smithy"]
        );
    }

    #[test]
    fn test_empty_glob() {
        let catalog = catalog();
        assert!(expand_card_glob("", &catalog).is_empty());
        assert!(expand_card_glob("  ,  ", &catalog).is_empty());
    }

    #[test]
    fn test_parse_failure_is_a_diagnostic() {
        let catalog = catalog();
        let expansion = GlobExpander::new(&catalog).expand_card_glob("Smithy,Worker's Village");
        assert_eq!(expansion.cards, vec!["Smithy"]);
        assert_eq!(expansion.diagnostics.len(), 1);
        assert_eq!(expansion.diagnostics[0].card, None);
        assert!(matches!(expansion.diagnostics[0].error, GlobError::Parse(_)));
    }

    #[test]
    fn test_bad_cards_are_skipped() {
        let catalog = CardCatalog::new(vec![
            CardRecord::new("Village", [("Actions", "2")]),
            CardRecord::new("Golem", [("Actions", "?")]),
            CardRecord::new("Gold", [("Coins", "3")]),
            CardRecord::new("Festival", [("Actions", "2")]),
        ])
        .unwrap();
        let expansion = GlobExpander::new(&catalog).expand_subglob("actions>=2");

        assert_eq!(expansion.cards, vec!["Village", "Festival"]);
        let skipped: Vec<_> = expansion
            .diagnostics
            .iter()
            .map(|d| d.card.as_deref().unwrap())
            .collect();
        assert_eq!(skipped, vec!["Golem", "Gold"]);
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = GlobDiagnostic {
            subglob: "cards>1".to_string(),
            card: Some("Gold".to_string()),
            error: EvalError::VariableNotFound("cards".to_string()).into(),
        };
        assert_eq!(diagnostic.to_string(), "'cards>1' on Gold: Variable not found: cards");
    }
}
