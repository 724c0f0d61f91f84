//! Win-rate series for the card graphs
//!
//! The graph pages plot, per card, the win rate against some numeric key
//! (the turn a card was gained, or the accumulation advantage over the
//! opponent). Points with too few observations or too wide an error bar are
//! left out, and each series gets a quality score used to order the legend.

use std::collections::HashMap;

use councilroom_stats::{MeanVarStat, StatTuple};
use serde::{Deserialize, Serialize};

use crate::config::CouncilroomConfig;
use crate::expand::{GlobDiagnostic, GlobExpander};

/// How much each key contributes to a series' quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weighting {
    /// Every key counts the same
    AllTurnsSame,
    /// Keys are weighted by their value
    ProportionalToAccumDiff,
}

impl Weighting {
    pub fn weight(&self, key: f64) -> f64 {
        match self {
            Weighting::AllTurnsSame => 1.0,
            Weighting::ProportionalToAccumDiff => key,
        }
    }
}

/// A plotted point: key, mean and error bar half-width
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub key: f64,
    pub mean: f64,
    pub error_bar: f64,
}

/// One card's series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSeries {
    pub label: String,
    pub points: Vec<SeriesPoint>,
    pub quality: f64,
}

/// Per-card entry of the graph data file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardGraphStats {
    /// Games in which the card was available
    pub available: f64,
    /// Graph name to `{key: [freq, sum, sum_sq]}`
    #[serde(flatten)]
    pub graphs: HashMap<String, HashMap<String, StatTuple>>,
}

/// The graph data file: per-card statistics plus collection metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardGraphData {
    pub card_stats: HashMap<String, CardGraphStats>,
    #[serde(default)]
    pub num_games: u64,
    #[serde(default)]
    pub max_game_id: String,
}

/// Series for every card a glob selects, best quality first
#[derive(Debug, Clone, Default)]
pub struct SeriesSet {
    pub series: Vec<CardSeries>,
    /// Selected cards with no statistics
    pub missing: Vec<String>,
    pub diagnostics: Vec<GlobDiagnostic>,
}

impl SeriesSet {
    /// Lowest `mean - error` and highest `mean + error` over all points
    pub fn bounds(&self) -> Option<(f64, f64)> {
        series_bounds(&self.series)
    }
}

/// Build one card's series from `{key: raw tuple}` points.
///
/// Keys that are not numbers are ignored. `total_available` scales each
/// key's contribution to quality by how often the key occurred.
pub fn build_series(
    card: &str,
    points: &HashMap<String, StatTuple>,
    total_available: f64,
    weighting: Weighting,
    config: &CouncilroomConfig,
) -> CardSeries {
    let mut keyed: Vec<(f64, MeanVarStat)> = points
        .iter()
        .filter_map(|(key, raw)| match key.trim().parse::<f64>() {
            Ok(k) => Some((k, MeanVarStat::with_prior(*raw, config.prior.as_tuple()))),
            Err(_) => {
                tracing::debug!("Ignoring non-numeric key '{}' for {}", key, card);
                None
            }
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let series_config = &config.series;
    let mut series = Vec::new();
    let mut quality = 0.0;

    for (key, stat) in keyed {
        let error_bar = stat.standard_error() * series_config.error_bar_factor;
        if stat.freq() > series_config.min_freq && error_bar < series_config.max_error_bar {
            series.push(SeriesPoint {
                key,
                mean: stat.mean(),
                error_bar,
            });
        }
        let prob = stat.freq() / total_available;
        let goodness = stat.mean() - 1.0;
        quality += prob * goodness * weighting.weight(key);
    }

    CardSeries {
        label: card.to_string(),
        points: series,
        quality,
    }
}

/// Sort series by descending quality
pub fn rank_series(series: &mut [CardSeries]) {
    series.sort_by(|a, b| b.quality.total_cmp(&a.quality));
}

/// Lowest `mean - error` and highest `mean + error` over all points, or
/// `None` when no point survived filtering
pub fn series_bounds(series: &[CardSeries]) -> Option<(f64, f64)> {
    series
        .iter()
        .flat_map(|s| s.points.iter())
        .map(|p| (p.mean - p.error_bar, p.mean + p.error_bar))
        .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
}

/// Expand a glob and build the named graph's series for every selected card
pub fn collect_card_series(
    glob: &str,
    graph_name: &str,
    weighting: Weighting,
    expander: &GlobExpander<'_>,
    data: &CardGraphData,
    config: &CouncilroomConfig,
) -> SeriesSet {
    let expansion = expander.expand_card_glob(glob);
    let mut set = SeriesSet {
        diagnostics: expansion.diagnostics,
        ..SeriesSet::default()
    };

    for card in expansion.cards {
        let Some(stats) = data.card_stats.get(&card) else {
            tracing::debug!("No graph statistics for {}", card);
            set.missing.push(card);
            continue;
        };
        let empty = HashMap::new();
        let points = stats.graphs.get(graph_name).unwrap_or(&empty);
        set.series
            .push(build_series(&card, points, stats.available, weighting, config));
    }

    rank_series(&mut set.series);
    set
}
