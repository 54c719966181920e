//! # Errors
//!
//! $$
//! \text{validation}: (\text{kind}, K, p) \mapsto \text{Ok} \;|\; \text{PayoffError}
//! $$
//!
use thiserror::Error;

use crate::quant::strategies::StrategyKind;

/// Errors raised while building a strategy or a price grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayoffError {
  /// Strike or premium count does not match the strategy's leg count.
  #[error("{strategy} expects {expected} {what}, got {got}")]
  InvalidArity {
    strategy: StrategyKind,
    what: &'static str,
    expected: usize,
    got: usize,
  },

  /// Strikes violate the ordering the strategy requires.
  #[error("{strategy} strikes must be strictly {expected}")]
  InvalidOrdering {
    strategy: StrategyKind,
    expected: &'static str,
  },

  #[error("unknown strategy `{0}`, expected call, put, call_spread, put_spread or double_bear")]
  UnknownStrategy(String),

  #[error("reference price collection is empty")]
  EmptyReference,

  /// Grid and PnL arrays of a curve differ in length.
  #[error("curve grid has {grid} points but PnL has {pnl}")]
  LengthMismatch { grid: usize, pnl: usize },
}
