//! Card catalog
//!
//! The catalog is the card list shipped alongside the statistics: one record
//! per card with its `Singular` name and string-valued attributes such as
//! `Cost`, `Actions` or the `Victory`/`Reaction` flags. It is loaded once and
//! never mutated.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use councilroom_glob::{EvalContext, Scalar};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column holding the card's unique name
pub const SINGULAR: &str = "Singular";

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Row {0} has no Singular column")]
    MissingSingular(usize),

    #[error("Row {0} has an empty Singular name")]
    EmptyName(usize),

    #[error("Duplicate card name: {0}")]
    DuplicateName(String),
}

/// One card and its attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(rename = "Singular")]
    singular: String,
    #[serde(flatten)]
    attributes: BTreeMap<String, String>,
}

impl CardRecord {
    /// Create a record from a name and attribute pairs
    pub fn new<I, K, V>(singular: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            singular: singular.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn singular(&self) -> &str {
        &self.singular
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Look up an attribute, preferring an exact key and falling back to a
    /// case-insensitive match.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case(SINGULAR) {
            return Some(&self.singular);
        }
        self.attributes
            .get(name)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    fn flag(&self, name: &str) -> bool {
        self.attribute(name) == Some("1")
    }

    pub fn is_victory(&self) -> bool {
        self.flag("Victory")
    }

    pub fn is_reaction(&self) -> bool {
        self.flag("Reaction")
    }

    pub fn is_action(&self) -> bool {
        self.flag("Action")
    }

    pub fn is_treasure(&self) -> bool {
        self.flag("Treasure")
    }

    pub fn is_attack(&self) -> bool {
        self.flag("Attack")
    }

    /// Number of `+Actions` the card gives. Variable, missing and zero
    /// counts are all reported as 1.
    pub fn num_actions(&self) -> u32 {
        self.attribute("Actions")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|&n| n != 0)
            .unwrap_or(1)
    }
}

impl EvalContext for CardRecord {
    fn variable(&self, name: &str) -> Option<Scalar> {
        self.attribute(name).map(Scalar::from_attribute)
    }
}

/// Ordered, immutable set of cards with a name index
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: Vec<CardRecord>,
    by_name: HashMap<String, usize>,
}

impl CardCatalog {
    /// Build a catalog, rejecting empty and duplicate names
    pub fn new(cards: Vec<CardRecord>) -> Result<Self, CatalogError> {
        let mut by_name = HashMap::with_capacity(cards.len());
        for (i, card) in cards.iter().enumerate() {
            if card.singular.trim().is_empty() {
                return Err(CatalogError::EmptyName(i));
            }
            if by_name.insert(card.singular.clone(), i).is_some() {
                return Err(CatalogError::DuplicateName(card.singular.clone()));
            }
        }
        Ok(Self { cards, by_name })
    }

    /// Parse a JSON array of card objects
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<CardRecord> = serde_json::from_str(json)?;
        Self::new(cards)
    }

    /// Parse CSV text with a header row containing `Singular`
    pub fn from_csv(text: &str) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let singular_col = headers
            .iter()
            .position(|h| h == SINGULAR)
            .ok_or(CatalogError::MissingSingular(0))?;

        let mut cards = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let record = result?;
            let singular = record
                .get(singular_col)
                .ok_or(CatalogError::MissingSingular(i + 1))?;
            let attributes = headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|(col, _)| *col != singular_col)
                .map(|(_, (k, v))| (k, v));
            cards.push(CardRecord::new(singular, attributes));
        }
        Self::new(cards)
    }

    /// Load a catalog file; `.csv` files are read as CSV, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let catalog = if is_csv {
            Self::from_csv(&text)?
        } else {
            Self::from_json(&text)?
        };
        tracing::info!("Loaded {} cards from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in catalog order
    pub fn cards(&self) -> &[CardRecord] {
        &self.cards
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardRecord> {
        self.cards.iter()
    }

    /// Exact lookup by `Singular` name
    pub fn get(&self, name: &str) -> Option<&CardRecord> {
        self.by_name.get(name).map(|&i| &self.cards[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// First card whose name equals `name` ignoring case and surrounding
    /// whitespace
    pub fn find_name(&self, name: &str) -> Option<&CardRecord> {
        let wanted = name.trim().to_lowercase();
        self.cards
            .iter()
            .find(|card| card.singular.to_lowercase() == wanted)
    }
}

impl<'a> IntoIterator for &'a CardCatalog {
    type Item = &'a CardRecord;
    type IntoIter = std::slice::Iter<'a, CardRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smithy() -> CardRecord {
        CardRecord::new(
            "Smithy",
            [("Actions", "0"), ("Cards", "3"), ("Cost", "4"), ("Victory", "0")],
        )
    }

    #[test]
    fn test_attribute_lookup_ignores_case() {
        let card = smithy();
        assert_eq!(card.attribute("Cards"), Some("3"));
        assert_eq!(card.attribute("cards"), Some("3"));
        assert_eq!(card.attribute("singular"), Some("Smithy"));
        assert_eq!(card.attribute("Buys"), None);
    }

    #[test]
    fn test_num_actions() {
        assert_eq!(smithy().num_actions(), 1);
        let village = CardRecord::new("Village", [("Actions", "2")]);
        assert_eq!(village.num_actions(), 2);
        let variable = CardRecord::new("Golem", [("Actions", "?")]);
        assert_eq!(variable.num_actions(), 1);
        let missing = CardRecord::new("Gold", Vec::<(String, String)>::new());
        assert_eq!(missing.num_actions(), 1);
    }

    #[test]
    fn test_flags() {
        let estate = CardRecord::new("Estate", [("Victory", "1"), ("Reaction", "0")]);
        assert!(estate.is_victory());
        assert!(!estate.is_reaction());
        assert!(!smithy().is_victory());
    }

    #[test]
    fn test_variable_binding() {
        let card = smithy();
        assert_eq!(card.variable("cards"), Some(Scalar::Number(3.0)));
        assert_eq!(
            card.variable("Singular"),
            Some(Scalar::Text("Smithy".to_string()))
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = CardCatalog::new(vec![smithy(), smithy()]);
        assert!(matches!(result, Err(CatalogError::DuplicateName(ref n)) if n == "Smithy"));
    }

    #[test]
    fn test_from_json() {
        let catalog = CardCatalog::from_json(
            r#"[{"Singular": "Smithy", "Cards": "3"}, {"Singular": "Village", "Actions": "2"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.cards()[1].singular(), "Village");
        assert_eq!(catalog.get("Smithy").unwrap().attribute("Cards"), Some("3"));
    }

    #[test]
    fn test_from_json_requires_singular() {
        assert!(CardCatalog::from_json(r#"[{"Cards": "3"}]"#).is_err());
    }

    #[test]
    fn test_from_csv() {
        let csv = "Singular,Plural,Actions,Victory\nSmithy,Smithies,0,0\nEstate,Estates,0,1\n";
        let catalog = CardCatalog::from_csv(csv).unwrap();
        assert_eq!(catalog.len(), 2);
        let estate = catalog.get("Estate").unwrap();
        assert!(estate.is_victory());
        assert_eq!(estate.attribute("Plural"), Some("Estates"));
        assert!(!estate.attributes().contains_key(SINGULAR));
    }

    #[test]
    fn test_from_csv_without_singular() {
        let csv = "Name,Actions\nSmithy,0\n";
        assert!(matches!(
            CardCatalog::from_csv(csv),
            Err(CatalogError::MissingSingular(0))
        ));
    }

    #[test]
    fn test_find_name() {
        let catalog = CardCatalog::new(vec![smithy()]).unwrap();
        assert_eq!(catalog.find_name("  SMITHY ").unwrap().singular(), "Smithy");
        assert!(catalog.find_name("Smith").is_none());
    }
}
