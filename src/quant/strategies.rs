//! # Strategies
//!
//! $$
//! \Pi_{\mathrm{DB}}(S_T)=C_{K_1}-C_{K_2}+P_{K_3}-P_{K_4},\qquad K_1>K_2>K_3>K_4
//! $$
//!
use std::fmt::Display;
use std::str::FromStr;

use impl_new_derive::ImplNew;
use ndarray::Array1;
use tracing::debug;
use tracing::warn;

use super::payoff::payoff_vanilla;
use super::OptionType;
use crate::error::PayoffError;
use crate::traits::FloatExt;

/// Strategy names accepted at the string boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
  Call,
  Put,
  CallSpread,
  PutSpread,
  DoubleBear,
}

impl StrategyKind {
  pub const ALL: [StrategyKind; 5] = [
    StrategyKind::Call,
    StrategyKind::Put,
    StrategyKind::CallSpread,
    StrategyKind::PutSpread,
    StrategyKind::DoubleBear,
  ];

  /// Number of legs (strikes and premiums) the strategy takes.
  pub fn legs(self) -> usize {
    match self {
      StrategyKind::Call | StrategyKind::Put => 1,
      StrategyKind::CallSpread | StrategyKind::PutSpread => 2,
      StrategyKind::DoubleBear => 4,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      StrategyKind::Call => "call",
      StrategyKind::Put => "put",
      StrategyKind::CallSpread => "call_spread",
      StrategyKind::PutSpread => "put_spread",
      StrategyKind::DoubleBear => "double_bear",
    }
  }
}

impl Display for StrategyKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for StrategyKind {
  type Err = PayoffError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    StrategyKind::ALL
      .into_iter()
      .find(|k| k.name() == s)
      .ok_or_else(|| reject(PayoffError::UnknownStrategy(s.to_string())))
  }
}

/// One option leg: strike and the premium paid (long) or received (short).
#[derive(ImplNew, Clone, Copy, Debug, Default, PartialEq)]
pub struct Leg<T> {
  pub strike: T,
  pub premium: T,
}

impl<T: FloatExt> Leg<T> {
  /// Leg with zero premium.
  pub fn at(strike: T) -> Self {
    Self {
      strike,
      premium: T::zero(),
    }
  }

  /// Long PnL of this leg for one unit.
  fn pnl(&self, s_t: &Array1<T>, option_type: OptionType) -> Array1<T> {
    payoff_vanilla(s_t, self.strike, self.premium, T::one(), option_type)
  }
}

/// Closed set of supported strategies, each with exactly the legs it needs.
#[derive(Clone, Debug, PartialEq)]
pub enum Strategy<T: FloatExt> {
  Call(Leg<T>),
  Put(Leg<T>),
  /// Long call at the lower strike, short call at the upper strike
  CallSpread([Leg<T>; 2]),
  /// Long put at the lower strike, short put at the upper strike
  PutSpread([Leg<T>; 2]),
  /// Call spread long K1 short K2 plus put spread long K3 short K4, K1 > K2 > K3 > K4
  DoubleBear([Leg<T>; 4]),
}

impl<T: FloatExt> Strategy<T> {
  pub fn call(leg: Leg<T>) -> Self {
    Strategy::Call(leg)
  }

  pub fn put(leg: Leg<T>) -> Self {
    Strategy::Put(leg)
  }

  pub fn call_spread(lower: Leg<T>, upper: Leg<T>) -> Result<Self, PayoffError> {
    check_order(StrategyKind::CallSpread, &[lower, upper])?;
    Ok(Strategy::CallSpread([lower, upper]))
  }

  pub fn put_spread(lower: Leg<T>, upper: Leg<T>) -> Result<Self, PayoffError> {
    check_order(StrategyKind::PutSpread, &[lower, upper])?;
    Ok(Strategy::PutSpread([lower, upper]))
  }

  pub fn double_bear(legs: [Leg<T>; 4]) -> Result<Self, PayoffError> {
    check_order(StrategyKind::DoubleBear, &legs)?;
    Ok(Strategy::DoubleBear(legs))
  }

  /// Build from untyped strike and premium slices.
  ///
  /// Both slices must have the strategy's leg count; `None` premiums are zero.
  pub fn from_parts(
    kind: StrategyKind,
    strikes: &[T],
    premiums: Option<&[T]>,
  ) -> Result<Self, PayoffError> {
    let expected = kind.legs();
    if strikes.len() != expected {
      return Err(reject(PayoffError::InvalidArity {
        strategy: kind,
        what: "strikes",
        expected,
        got: strikes.len(),
      }));
    }
    if let Some(p) = premiums {
      if p.len() != expected {
        return Err(reject(PayoffError::InvalidArity {
          strategy: kind,
          what: "premiums",
          expected,
          got: p.len(),
        }));
      }
    }

    let legs: Vec<Leg<T>> = strikes
      .iter()
      .enumerate()
      .map(|(i, &k)| Leg::new(k, premiums.map_or(T::zero(), |p| p[i])))
      .collect();

    let strategy = match kind {
      StrategyKind::Call => Strategy::call(legs[0]),
      StrategyKind::Put => Strategy::put(legs[0]),
      StrategyKind::CallSpread => Strategy::call_spread(legs[0], legs[1])?,
      StrategyKind::PutSpread => Strategy::put_spread(legs[0], legs[1])?,
      StrategyKind::DoubleBear => Strategy::double_bear([legs[0], legs[1], legs[2], legs[3]])?,
    };
    debug!(strategy = %kind, legs = expected, "strategy built");
    Ok(strategy)
  }

  pub fn kind(&self) -> StrategyKind {
    match self {
      Strategy::Call(_) => StrategyKind::Call,
      Strategy::Put(_) => StrategyKind::Put,
      Strategy::CallSpread(_) => StrategyKind::CallSpread,
      Strategy::PutSpread(_) => StrategyKind::PutSpread,
      Strategy::DoubleBear(_) => StrategyKind::DoubleBear,
    }
  }

  pub fn legs(&self) -> &[Leg<T>] {
    match self {
      Strategy::Call(leg) | Strategy::Put(leg) => std::slice::from_ref(leg),
      Strategy::CallSpread(legs) | Strategy::PutSpread(legs) => legs,
      Strategy::DoubleBear(legs) => legs,
    }
  }

  pub fn strikes(&self) -> Vec<T> {
    self.legs().iter().map(|l| l.strike).collect()
  }

  /// Mean strike, the centre of the default price grid.
  pub fn reference(&self) -> T {
    let legs = self.legs();
    legs.iter().map(|l| l.strike).sum::<T>() / T::from_usize_(legs.len())
  }

  /// PnL of one unit of the strategy.
  pub fn pnl(&self, s_t: &Array1<T>) -> Array1<T> {
    use OptionType::Call;
    use OptionType::Put;

    match self {
      Strategy::Call(leg) => leg.pnl(s_t, Call),
      Strategy::Put(leg) => leg.pnl(s_t, Put),
      Strategy::CallSpread([lower, upper]) => lower.pnl(s_t, Call) - upper.pnl(s_t, Call),
      Strategy::PutSpread([lower, upper]) => lower.pnl(s_t, Put) - upper.pnl(s_t, Put),
      Strategy::DoubleBear([k1, k2, k3, k4]) => {
        k1.pnl(s_t, Call) - k2.pnl(s_t, Call) + k3.pnl(s_t, Put) - k4.pnl(s_t, Put)
      }
    }
  }
}

fn check_order<T: FloatExt>(kind: StrategyKind, legs: &[Leg<T>]) -> Result<(), PayoffError> {
  let (ok, expected) = match kind {
    StrategyKind::DoubleBear => (
      legs.windows(2).all(|w| w[0].strike > w[1].strike),
      "descending",
    ),
    _ => (
      legs.windows(2).all(|w| w[0].strike < w[1].strike),
      "ascending",
    ),
  };
  if ok {
    Ok(())
  } else {
    Err(reject(PayoffError::InvalidOrdering {
      strategy: kind,
      expected,
    }))
  }
}

fn reject(err: PayoffError) -> PayoffError {
  warn!(error = %err, "strategy rejected");
  err
}
