//! # Payoff curves
//!
//! $$
//! \Pi(S_T)=q\sum_i \varepsilon_i\left(\max(\phi_i(S_T-K_i),0)-p_i\right)
//! $$
//!
//! Profit-and-loss at expiry for single options and simple multi-leg
//! strategies, evaluated over a grid of terminal prices and rendered with
//! [`plotly`].
//!
//! ```ignore
//! use payoff_curves::quant::payoff::Payoff;
//! use payoff_curves::traits::PayoffExt;
//!
//! let payoff = Payoff::from_name("call_spread", &[100.0, 110.0], None, 1.0)?;
//! let curve = payoff.curve()?;
//! payoff_curves::visualization::plot_payoff(&curve, Some("bull call"), None).show();
//! ```
pub mod error;
pub mod quant;
pub mod traits;
pub mod visualization;

pub use error::PayoffError;
