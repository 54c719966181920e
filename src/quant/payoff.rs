//! # Payoff at expiry
//!
//! $$
//! \Pi(S_T)=q\left(\max(\phi(S_T-K),0)-p\right)
//! $$
//!
use ndarray::Array1;
use tracing::debug;

use super::strategies::Strategy;
use super::strategies::StrategyKind;
use super::OptionType;
use crate::error::PayoffError;
use crate::traits::FloatExt;
use crate::traits::PayoffExt;

/// Intrinsic value `max(phi (S_T - K), 0)` over the whole grid.
#[must_use]
pub fn intrinsic<T: FloatExt>(s_t: &Array1<T>, strike: T, option_type: OptionType) -> Array1<T> {
  match option_type {
    OptionType::Call => s_t.mapv(|s| (s - strike).max(T::zero())),
    OptionType::Put => s_t.mapv(|s| (strike - s).max(T::zero())),
  }
}

/// Single vanilla leg net of its premium, scaled by `position`.
#[must_use]
pub fn payoff_vanilla<T: FloatExt>(
  s_t: &Array1<T>,
  strike: T,
  premium: T,
  position: T,
  option_type: OptionType,
) -> Array1<T> {
  (intrinsic(s_t, strike, option_type) - premium) * position
}

/// Call PnL at expiry. `position` is +1 long, -1 short, or any volume.
#[must_use]
pub fn payoff_call<T: FloatExt>(s_t: &Array1<T>, strike: T, premium: T, position: T) -> Array1<T> {
  payoff_vanilla(s_t, strike, premium, position, OptionType::Call)
}

/// Put PnL at expiry. `position` is +1 long, -1 short, or any volume.
#[must_use]
pub fn payoff_put<T: FloatExt>(s_t: &Array1<T>, strike: T, premium: T, position: T) -> Array1<T> {
  payoff_vanilla(s_t, strike, premium, position, OptionType::Put)
}

/// A strategy held with a signed position multiplier.
#[derive(Clone, Debug, PartialEq)]
pub struct Payoff<T: FloatExt> {
  pub strategy: Strategy<T>,
  /// Scales the whole strategy PnL
  pub position: T,
}

impl<T: FloatExt> Payoff<T> {
  pub fn new(strategy: Strategy<T>, position: T) -> Self {
    Self { strategy, position }
  }

  /// Build from a strategy name, strikes and optional premiums.
  ///
  /// Missing premiums default to zero for every leg.
  pub fn from_name(
    name: &str,
    strikes: &[T],
    premiums: Option<&[T]>,
    position: T,
  ) -> Result<Self, PayoffError> {
    let kind: StrategyKind = name.parse()?;
    Self::from_parts(kind, strikes, premiums, position)
  }

  pub fn from_parts(
    kind: StrategyKind,
    strikes: &[T],
    premiums: Option<&[T]>,
    position: T,
  ) -> Result<Self, PayoffError> {
    let strategy = Strategy::from_parts(kind, strikes, premiums)?;
    debug!(strategy = %kind, position = %position, "payoff ready");
    Ok(Self::new(strategy, position))
  }
}

impl<T: FloatExt> PayoffExt<T> for Payoff<T> {
  fn pnl(&self, s_t: &Array1<T>) -> Array1<T> {
    self.strategy.pnl(s_t) * self.position
  }

  fn reference(&self) -> T {
    self.strategy.reference()
  }
}

/// Terminal prices and the PnL at each of them.
#[derive(Clone, Debug, PartialEq)]
pub struct PayoffCurve<T: FloatExt> {
  s_t: Array1<T>,
  pnl: Array1<T>,
}

impl<T: FloatExt> PayoffCurve<T> {
  /// Pair a grid with its PnL. Both must have the same length.
  pub fn new(s_t: Array1<T>, pnl: Array1<T>) -> Result<Self, PayoffError> {
    if s_t.len() != pnl.len() {
      return Err(PayoffError::LengthMismatch {
        grid: s_t.len(),
        pnl: pnl.len(),
      });
    }
    Ok(Self { s_t, pnl })
  }

  pub fn s_t(&self) -> &Array1<T> {
    &self.s_t
  }

  pub fn pnl(&self) -> &Array1<T> {
    &self.pnl
  }

  pub fn len(&self) -> usize {
    self.s_t.len()
  }

  pub fn is_empty(&self) -> bool {
    self.s_t.is_empty()
  }

  /// Largest PnL on the grid.
  pub fn max_profit(&self) -> Option<T> {
    self.pnl.iter().copied().reduce(T::max)
  }

  /// Smallest PnL on the grid.
  pub fn max_loss(&self) -> Option<T> {
    self.pnl.iter().copied().reduce(T::min)
  }

  /// Terminal prices where the PnL changes sign.
  ///
  /// A sign change between neighbours is located by linear interpolation.
  /// When the sign changes across a run of exact zeros, the run's first and
  /// last grid point are reported. Zeros that touch without a sign change
  /// are not breakevens.
  pub fn breakevens(&self) -> Vec<T> {
    let (x, y) = (&self.s_t, &self.pnl);
    let mut out: Vec<T> = Vec::new();
    let mut last: Option<usize> = None;

    for i in 0..y.len() {
      if y[i] == T::zero() || y[i].is_nan() {
        continue;
      }
      if let Some(j) = last {
        if y[j].is_sign_negative() != y[i].is_sign_negative() {
          if i == j + 1 {
            out.push(x[j] - y[j] * (x[i] - x[j]) / (y[i] - y[j]));
          } else {
            out.push(x[j + 1]);
            if i - 1 > j + 1 {
              out.push(x[i - 1]);
            }
          }
        }
      }
      last = Some(i);
    }
    out
  }

  /// Same curve in `f64`, for plotting.
  pub fn to_f64(&self) -> PayoffCurve<f64> {
    PayoffCurve {
      s_t: self.s_t.mapv(|v| v.to_f64().unwrap_or(f64::NAN)),
      pnl: self.pnl.mapv(|v| v.to_f64().unwrap_or(f64::NAN)),
    }
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;
  use crate::quant::grid::PriceGrid;
  use crate::quant::strategies::Leg;

  fn unit_grid() -> Array1<f64> {
    Array1::linspace(50.0, 150.0, 101)
  }

  #[test]
  fn call_at_the_money_loses_premium() {
    let s_t = array![100.0];
    assert_abs_diff_eq!(payoff_call(&s_t, 100.0, 4.0, 1.0)[0], -4.0);
    assert_abs_diff_eq!(payoff_call(&s_t, 100.0, 4.0, -2.0)[0], 8.0);
  }

  #[test]
  fn call_is_linear_far_above_strike() {
    let s_t = array![400.0, 500.0];
    let pnl = payoff_call(&s_t, 100.0, 3.0, 2.0);
    assert_abs_diff_eq!(pnl[0], 2.0 * (400.0 - 100.0 - 3.0));
    assert_abs_diff_eq!(pnl[1], 2.0 * (500.0 - 100.0 - 3.0));
  }

  #[test]
  fn put_mirrors_call() {
    let s_t = array![20.0, 100.0, 180.0];
    let pnl = payoff_put(&s_t, 100.0, 3.0, 1.0);
    assert_abs_diff_eq!(pnl[0], 100.0 - 20.0 - 3.0);
    assert_abs_diff_eq!(pnl[1], -3.0);
    assert_abs_diff_eq!(pnl[2], -3.0);
  }

  #[test]
  fn curve_has_grid_length_for_every_strategy() {
    let grid = PriceGrid::<f64>::default().n(257).build(100.0);
    let cases: [(&str, &[f64]); 5] = [
      ("call", &[100.0]),
      ("put", &[100.0]),
      ("call_spread", &[95.0, 105.0]),
      ("put_spread", &[95.0, 105.0]),
      ("double_bear", &[110.0, 100.0, 90.0, 80.0]),
    ];
    for (name, strikes) in cases {
      let payoff = Payoff::from_name(name, strikes, None, 1.0).unwrap();
      let curve = payoff.curve_on(grid.clone()).unwrap();
      assert_eq!(curve.len(), grid.len(), "{name}");
      assert_eq!(payoff.curve().unwrap().len(), 400, "{name}");
    }
  }

  #[test]
  fn default_curve_is_centred_on_strikes() {
    let payoff = Payoff::from_name("double_bear", &[110.0, 100.0, 90.0, 80.0], None, 1.0).unwrap();
    let curve = payoff.curve().unwrap();
    assert_abs_diff_eq!(curve.s_t()[0], 47.5, epsilon = 1e-12);
    assert_abs_diff_eq!(curve.s_t()[399], 142.5, epsilon = 1e-9);
  }

  #[test]
  fn call_spread_caps_at_strike_width() {
    let payoff = Payoff::from_name("call_spread", &[100.0, 110.0], None, 1.0).unwrap();
    let pnl = payoff.pnl(&array![105.0, 115.0]);
    assert_abs_diff_eq!(pnl[0], 5.0);
    assert_abs_diff_eq!(pnl[1], 10.0);

    let curve = payoff.curve_on(unit_grid()).unwrap();
    assert_abs_diff_eq!(curve.max_profit().unwrap(), 10.0);
    assert!(curve.pnl().iter().all(|&v| v <= 10.0));
  }

  #[test]
  fn call_spread_max_profit_beyond_upper_strike() {
    let payoff =
      Payoff::from_name("call_spread", &[100.0, 110.0], Some(&[4.0, 1.5]), 3.0).unwrap();
    let pnl = payoff.pnl(&array![140.0]);
    assert_abs_diff_eq!(pnl[0], 3.0 * ((110.0 - 100.0) - 4.0 + 1.5));
  }

  #[test]
  fn put_spread_value_below_lower_strike() {
    let payoff =
      Payoff::from_name("put_spread", &[100.0, 110.0], Some(&[1.5, 4.0]), 2.0).unwrap();
    let curve = payoff.curve_on(unit_grid()).unwrap();
    assert_abs_diff_eq!(curve.pnl()[0], 2.0 * ((100.0 - 110.0) - 1.5 + 4.0));
    // mirrored position collects the width
    let short = Payoff::from_name("put_spread", &[100.0, 110.0], None, -1.0).unwrap();
    assert_abs_diff_eq!(short.pnl(&array![60.0])[0], 10.0);
  }

  #[test]
  fn double_bear_reference_points() {
    let payoff = Payoff::from_name("double_bear", &[110.0, 100.0, 90.0, 80.0], None, 1.0).unwrap();
    let pnl = payoff.pnl(&array![150.0, 50.0, 95.0]);
    assert_abs_diff_eq!(pnl[0], -10.0);
    assert_abs_diff_eq!(pnl[1], 10.0);
    assert_abs_diff_eq!(pnl[2], 0.0);
  }

  #[test]
  fn double_bear_premiums_shift_every_point() {
    let premiums = [3.0, 1.0, 2.5, 0.5];
    let with = Payoff::from_name("double_bear", &[110.0, 100.0, 90.0, 80.0], Some(&premiums), 1.0)
      .unwrap()
      .pnl(&unit_grid());
    let without = Payoff::from_name("double_bear", &[110.0, 100.0, 90.0, 80.0], None, 1.0)
      .unwrap()
      .pnl(&unit_grid());
    let net = -3.0 + 1.0 - 2.5 + 0.5;
    for (a, b) in with.iter().zip(without.iter()) {
      assert_abs_diff_eq!(*a, *b + net, epsilon = 1e-12);
    }
  }

  #[test]
  fn omitted_premiums_equal_zero_premiums() {
    let grid = unit_grid();
    let omitted = Payoff::from_name("put_spread", &[90.0, 100.0], None, 1.0).unwrap();
    let zeros = Payoff::from_name("put_spread", &[90.0, 100.0], Some(&[0.0, 0.0]), 1.0).unwrap();
    assert_eq!(omitted, zeros);
    assert_eq!(omitted.pnl(&grid), zeros.pnl(&grid));
  }

  #[test]
  fn typed_strategy_matches_named_one() {
    let typed = Payoff::new(
      Strategy::call_spread(Leg::new(100.0, 4.0), Leg::new(110.0, 1.5)).unwrap(),
      1.0,
    );
    let named = Payoff::from_name("call_spread", &[100.0, 110.0], Some(&[4.0, 1.5]), 1.0).unwrap();
    assert_eq!(typed.pnl(&unit_grid()), named.pnl(&unit_grid()));
  }

  #[test]
  fn descending_call_spread_is_rejected() {
    let err = Payoff::from_name("call_spread", &[110.0, 100.0], None, 1.0).unwrap_err();
    assert!(matches!(err, PayoffError::InvalidOrdering { .. }));
  }

  #[test]
  fn breakevens_of_long_call() {
    let curve = Payoff::from_name("call", &[100.0], Some(&[5.0]), 1.0)
      .unwrap()
      .curve()
      .unwrap();
    let be = curve.breakevens();
    assert_eq!(be.len(), 1);
    assert_abs_diff_eq!(be[0], 105.0, epsilon = 1e-9);
    assert_abs_diff_eq!(curve.max_loss().unwrap(), -5.0);
  }

  #[test]
  fn breakevens_of_flat_zero_region() {
    let curve = Payoff::from_name("double_bear", &[110.0, 100.0, 90.0, 80.0], None, 1.0)
      .unwrap()
      .curve_on(unit_grid())
      .unwrap();
    assert_eq!(curve.breakevens(), vec![90.0, 100.0]);
    assert_abs_diff_eq!(curve.max_profit().unwrap(), 10.0);
    assert_abs_diff_eq!(curve.max_loss().unwrap(), -10.0);
  }

  #[test]
  fn zero_premium_call_has_no_breakeven() {
    let curve = Payoff::from_name("call", &[100.0], None, 1.0)
      .unwrap()
      .curve()
      .unwrap();
    assert!(curve.breakevens().is_empty());
  }

  #[test]
  fn zero_touch_is_not_a_breakeven() {
    let s_t = array![1.0, 2.0, 3.0, 4.0, 5.0];
    let touch = PayoffCurve::new(s_t.clone(), array![1.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
    assert!(touch.breakevens().is_empty());

    let cross = PayoffCurve::new(s_t, array![-1.0, 0.0, 1.0, 2.0, -2.0]).unwrap();
    assert_eq!(cross.breakevens(), vec![2.0, 4.5]);
  }

  #[test]
  fn mismatched_lengths_are_rejected() {
    let s_t = Array1::linspace(0.0, 1.0, 2);
    let err = PayoffCurve::<f64>::new(s_t, array![1.0, -1.0, 1.0]).unwrap_err();
    assert_eq!(err, PayoffError::LengthMismatch { grid: 2, pnl: 3 });
  }

  #[test]
  fn empty_curve_has_no_extremes() {
    let curve = PayoffCurve::<f64>::new(Array1::zeros(0), Array1::zeros(0)).unwrap();
    assert!(curve.is_empty());
    assert_eq!(curve.max_profit(), None);
    assert!(curve.breakevens().is_empty());
  }

  #[test]
  fn f32_curve_converts_for_plotting() {
    let curve = PayoffCurve::<f32>::new(array![1.0, 2.0], array![-0.5, 0.5]).unwrap();
    let wide = curve.to_f64();
    assert_eq!(wide.len(), 2);
    assert_abs_diff_eq!(wide.pnl()[1], 0.5);
  }
}
