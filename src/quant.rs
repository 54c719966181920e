//! # Quant
//!
//! $$
//! \Pi(S_T)=\max(\phi(S_T-K),0)-p,\qquad \phi\in\{+1,-1\}
//! $$
//!
pub mod grid;
pub mod payoff;
pub mod strategies;

/// Option type.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum OptionType {
  #[default]
  Call,
  Put,
}
