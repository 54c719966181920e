//! # Price grid
//!
//! $$
//! S_T^{(i)} = \ell r + \frac{i}{n-1}(h-\ell)r,\qquad i=0,\dots,n-1
//! $$
//!
use ndarray::Array1;
use tracing::debug;

use crate::error::PayoffError;
use crate::traits::FloatExt;

pub const DEFAULT_LOW: f64 = 0.5;
pub const DEFAULT_HIGH: f64 = 1.5;
pub const DEFAULT_POINTS: usize = 400;

/// Price the grid is centred on: a spot, or a set of strikes reduced to their mean.
#[derive(Clone, Debug, PartialEq)]
pub enum ReferencePrice<T: FloatExt> {
  Spot(T),
  Strikes(Vec<T>),
}

impl<T: FloatExt> ReferencePrice<T> {
  /// Scalar reference. An empty strike set has no mean and yields `NaN`.
  pub fn value(&self) -> T {
    match self {
      ReferencePrice::Spot(s) => *s,
      ReferencePrice::Strikes(k) if k.is_empty() => T::nan(),
      ReferencePrice::Strikes(k) => k.iter().copied().sum::<T>() / T::from_usize_(k.len()),
    }
  }
}

impl<T: FloatExt> From<T> for ReferencePrice<T> {
  fn from(spot: T) -> Self {
    ReferencePrice::Spot(spot)
  }
}

impl<T: FloatExt> From<Vec<T>> for ReferencePrice<T> {
  fn from(strikes: Vec<T>) -> Self {
    ReferencePrice::Strikes(strikes)
  }
}

impl<T: FloatExt> From<&[T]> for ReferencePrice<T> {
  fn from(strikes: &[T]) -> Self {
    ReferencePrice::Strikes(strikes.to_vec())
  }
}

impl<T: FloatExt, const N: usize> From<[T; N]> for ReferencePrice<T> {
  fn from(strikes: [T; N]) -> Self {
    ReferencePrice::Strikes(strikes.to_vec())
  }
}

/// Terminal price grid settings.
#[derive(Clone, Copy, Debug)]
pub struct PriceGrid<T: FloatExt> {
  /// Lower bound as a fraction of the reference
  pub low: T,
  /// Upper bound as a fraction of the reference
  pub high: T,
  /// Number of points, both bounds included
  pub n: usize,
}

impl<T: FloatExt> Default for PriceGrid<T> {
  fn default() -> Self {
    Self {
      low: T::from_f64_fast(DEFAULT_LOW),
      high: T::from_f64_fast(DEFAULT_HIGH),
      n: DEFAULT_POINTS,
    }
  }
}

impl<T: FloatExt> PriceGrid<T> {
  pub fn new(low: T, high: T, n: usize) -> Self {
    Self { low, high, n }
  }

  pub fn low(mut self, low: T) -> Self {
    self.low = low;
    self
  }

  pub fn high(mut self, high: T) -> Self {
    self.high = high;
    self
  }

  pub fn n(mut self, n: usize) -> Self {
    self.n = n;
    self
  }

  /// Build the grid around `reference`.
  #[must_use]
  pub fn build(&self, reference: impl Into<ReferencePrice<T>>) -> Array1<T> {
    let r = reference.into().value();
    debug!(reference = %r, low = %self.low, high = %self.high, n = self.n, "building price grid");
    Array1::linspace(self.low * r, self.high * r, self.n)
  }

  /// Like [`PriceGrid::build`], but rejects an empty strike collection.
  pub fn try_build(
    &self,
    reference: impl Into<ReferencePrice<T>>,
  ) -> Result<Array1<T>, PayoffError> {
    let reference = reference.into();
    if matches!(&reference, ReferencePrice::Strikes(k) if k.is_empty()) {
      return Err(PayoffError::EmptyReference);
    }
    Ok(self.build(reference))
  }
}

/// Evenly spaced terminal prices over `[low * r, high * r]`.
///
/// `r` is the reference itself, or the mean when a strike collection is passed.
#[must_use]
pub fn price_grid<T: FloatExt>(
  reference: impl Into<ReferencePrice<T>>,
  low: T,
  high: T,
  n: usize,
) -> Array1<T> {
  PriceGrid::new(low, high, n).build(reference)
}
