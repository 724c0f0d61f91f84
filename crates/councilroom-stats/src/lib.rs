//! councilroom-stats - Summary statistics for win-rate aggregates
//!
//! The aggregate server precomputes `[freq, sum, sum_sq]` triples per card
//! and condition. This crate turns them into displayable numbers:
//!
//! - **MeanVarStat**: mean, bias-corrected variance, standard error
//! - **Prior smoothing**: [`simple_win_prior`] regularizes rare events
//! - **DiffStat**: difference between two means
//! - **Rendering**: `"mean ± stderr"` strings with fixed rounding
//!
//! # Examples
//!
//! ```
//! use councilroom_stats::{simple_win_prior, MeanVarStat};
//!
//! let stat = MeanVarStat::with_prior([5.0, 3.0, 2.0], simple_win_prior());
//! assert_eq!(stat.freq(), 7.0);
//! assert_eq!(stat.mean(), 5.0 / 7.0);
//! ```

pub mod mean_var;
pub mod render;

pub use mean_var::*;
pub use render::*;
