//! councilroom-core - Card catalog, glob expansion and win-rate summaries
//!
//! This crate ties the statistics and filter grammar crates to the Dominion
//! card list:
//!
//! - **Catalog**: [`CardCatalog`] loaded from the JSON or CSV card list
//! - **Glob expansion**: [`GlobExpander`] resolves selectors such as
//!   `Smithy, actions>=2` into card names
//! - **Quality**: supply win table rows and the card quality score
//! - **Series**: filtered win-rate series for the card graphs
//! - **Config**: TOML/JSON configuration with the site's default constants
//!
//! # Examples
//!
//! ```
//! use councilroom_core::{expand_card_glob, CardCatalog};
//!
//! let catalog = CardCatalog::from_json(
//!     r#"[{"Singular": "Smithy", "Actions": "0"},
//!         {"Singular": "Village", "Actions": "2"}]"#,
//! )
//! .unwrap();
//! assert_eq!(
//!     expand_card_glob("smithy, actions>=2", &catalog),
//!     vec!["Smithy", "Village"]
//! );
//! ```

pub mod catalog;
pub mod config;
pub mod expand;
pub mod quality;
pub mod series;

pub use catalog::*;
pub use config::*;
pub use expand::*;
pub use quality::*;
pub use series::*;

pub use councilroom_glob as glob;
pub use councilroom_stats as stats;
