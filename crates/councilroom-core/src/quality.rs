//! Card quality scores for the supply win table
//!
//! Each row of the table summarizes how often a card was gained when it was
//! in the supply and how the gainer fared, optionally conditioned on other
//! cards being present. The quality score is a linear model over those
//! numbers and a few card attributes.

use councilroom_stats::{percent, round_to, MeanVarStat};
use serde::{Deserialize, Serialize};

use crate::catalog::{CardCatalog, CardRecord};
use crate::config::QualityWeights;

/// Per-card aggregates from the supply win API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyWinStats {
    /// Win points per copy gained
    pub win_weighted_gain: MeanVarStat,
    /// Win points in games where at least one copy was gained
    pub win_given_any_gain: MeanVarStat,
    /// Win points in games where the card was available but never gained
    pub win_given_no_gain: MeanVarStat,
}

/// One entry of the supply win API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyWinEntry {
    pub card_name: String,
    /// Cards the statistics are conditioned on; empty for the base row
    #[serde(default)]
    pub condition: Vec<String>,
    pub stats: SupplyWinStats,
}

/// A rendered row of the supply win table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplyWinRow {
    pub card_name: String,
    pub condition: String,
    pub condition2: String,
    /// Games in which the card was available
    pub available: f64,
    /// Percent of those games in which it was gained
    pub percent_gained: f64,
    pub per_gain: String,
    pub any_gain: String,
    /// Average copies gained per available game
    pub num_gained: f64,
    pub quality: f64,
    /// Quality relative to the card's unconditioned row
    pub delta_quality: Option<f64>,
}

/// Score a card from its win rates when gained and when passed over
pub fn score_card(
    card: &CardRecord,
    win_given_any_gain: &MeanVarStat,
    win_given_no_gain: &MeanVarStat,
    weights: &QualityWeights,
) -> f64 {
    let win_rate_given_gain = win_given_any_gain.mean();
    let wagf = win_given_any_gain.freq() + 1.0;
    let wngf = win_given_no_gain.freq() + 1.0;
    let log_odds_any_gained = (wagf / (wagf + wngf)).ln();

    weights.win_rate * win_rate_given_gain
        + weights.log_odds_gained * log_odds_any_gained
        + weights.plus_actions * f64::from(card.num_actions())
        + weights.victory * f64::from(u8::from(card.is_victory()))
        + weights.reaction * f64::from(u8::from(card.is_reaction()))
}

/// Build table rows, least conditioned first.
///
/// Entries for cards missing from the catalog are dropped. A conditioned row
/// reports its quality relative to the same card's unconditioned row when one
/// precedes it.
pub fn supply_win_rows(
    entries: &[SupplyWinEntry],
    catalog: &CardCatalog,
    weights: &QualityWeights,
) -> Vec<SupplyWinRow> {
    let mut ordered: Vec<&SupplyWinEntry> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.condition.len());

    let mut base_qualities = std::collections::HashMap::new();
    let mut rows = Vec::with_capacity(ordered.len());

    for entry in ordered {
        let Some(card) = catalog.get(&entry.card_name) else {
            tracing::warn!("Supply win stats for unknown card {}", entry.card_name);
            continue;
        };
        let stats = &entry.stats;
        let available = stats.win_given_any_gain.freq() + stats.win_given_no_gain.freq();
        let quality = score_card(
            card,
            &stats.win_given_any_gain,
            &stats.win_given_no_gain,
            weights,
        );

        let condition = entry.condition.first().cloned().unwrap_or_default();
        let delta_quality = if condition.is_empty() {
            base_qualities.insert(entry.card_name.as_str(), quality);
            None
        } else {
            base_qualities
                .get(entry.card_name.as_str())
                .map(|base| round_to(quality - base, 2))
        };

        rows.push(SupplyWinRow {
            card_name: entry.card_name.clone(),
            condition,
            condition2: entry.condition.get(1).cloned().unwrap_or_default(),
            available,
            percent_gained: percent(stats.win_given_any_gain.freq(), available, 1),
            per_gain: stats.win_weighted_gain.render_mean_var(2),
            any_gain: stats.win_given_any_gain.render_mean_var(2),
            num_gained: round_to(stats.win_weighted_gain.freq() / available, 2),
            quality: round_to(quality, 2),
            delta_quality,
        });
    }

    rows
}
