use anyhow::Result;
use payoff_curves::quant::payoff::Payoff;
use payoff_curves::quant::strategies::StrategyKind;
use payoff_curves::traits::PayoffExt;
use payoff_curves::visualization::PayoffPlotter;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let book: [(StrategyKind, &[f64], Option<&[f64]>, f64); 5] = [
    (StrategyKind::Call, &[100.0], Some(&[5.0]), 1.0),
    (StrategyKind::Put, &[100.0], Some(&[4.0]), -1.0),
    (StrategyKind::CallSpread, &[100.0, 110.0], Some(&[4.0, 1.5]), 1.0),
    (StrategyKind::PutSpread, &[90.0, 100.0], Some(&[1.5, 4.0]), -1.0),
    (StrategyKind::DoubleBear, &[110.0, 100.0, 90.0, 80.0], Some(&[1.0, 3.0, 3.0, 1.0]), 1.0),
  ];

  let mut plotter = PayoffPlotter::new().title("Payoff at expiry").height(600);
  for (kind, strikes, premiums, position) in book {
    let curve = Payoff::from_parts(kind, strikes, premiums, position)?.curve()?;
    info!(
      strategy = %kind,
      max_profit = ?curve.max_profit(),
      max_loss = ?curve.max_loss(),
      breakevens = ?curve.breakevens(),
      "payoff summary"
    );
    plotter = plotter.register(&curve, Some(kind.name()));
  }

  plotter.write_html("payoff.html");
  info!("wrote payoff.html");
  Ok(())
}
