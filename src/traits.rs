//! # Traits
//!
//! $$
//! \text{Trait contracts: }\mathcal{A}:\{S_T\}\to\{\Pi(S_T)\}
//! $$
//!
use std::fmt::Debug;
use std::fmt::Display;
use std::iter::Sum;
use std::ops::AddAssign;
use std::ops::SubAssign;

use ndarray::Array1;
use ndarray::ScalarOperand;

use crate::error::PayoffError;
use crate::quant::grid::PriceGrid;
use crate::quant::payoff::PayoffCurve;

pub trait FloatExt:
  num_traits::Float
  + num_traits::FromPrimitive
  + num_traits::Signed
  + Sum
  + Default
  + Debug
  + Display
  + Send
  + Sync
  + ScalarOperand
  + AddAssign
  + SubAssign
  + 'static
{
  fn from_usize_(n: usize) -> Self;
  fn from_f64_fast(v: f64) -> Self;
}

impl FloatExt for f64 {
  fn from_usize_(n: usize) -> Self {
    n as f64
  }

  fn from_f64_fast(v: f64) -> Self {
    v
  }
}

impl FloatExt for f32 {
  fn from_usize_(n: usize) -> Self {
    n as f32
  }

  fn from_f64_fast(v: f64) -> Self {
    v as f32
  }
}

/// Payoff-at-expiry trait.
pub trait PayoffExt<T: FloatExt> {
  /// PnL for every terminal price in `s_t`.
  fn pnl(&self, s_t: &Array1<T>) -> Array1<T>;

  /// Price the default grid is centred on.
  fn reference(&self) -> T;

  /// Evaluate on a caller-supplied grid.
  fn curve_on(&self, s_t: Array1<T>) -> Result<PayoffCurve<T>, PayoffError> {
    let pnl = self.pnl(&s_t);
    PayoffCurve::new(s_t, pnl)
  }

  /// Evaluate on the default grid around [`PayoffExt::reference`].
  fn curve(&self) -> Result<PayoffCurve<T>, PayoffError> {
    let grid = PriceGrid::<T>::default().build(self.reference());
    self.curve_on(grid)
  }
}
