//! # Visualization
//!
//! $$
//! \{(S_T^{(i)},\Pi(S_T^{(i)}))\}_{i=1}^n \mapsto \text{payoff chart with } y=0 \text{ reference}
//! $$
//!
use std::path::Path;

use plotly::Layout;
use plotly::Plot;
use plotly::Scatter;
use plotly::common::DashType;
use plotly::common::Line;
use plotly::common::Mode;
use plotly::layout::Axis;
use plotly::layout::Margin;
use tracing::debug;

use crate::quant::payoff::PayoffCurve;
use crate::traits::FloatExt;

pub const X_AXIS_TITLE: &str = "Price at Expiry";
pub const Y_AXIS_TITLE: &str = "PnL";

/// Anything a payoff curve can be drawn onto.
pub trait PayoffSink {
  fn draw(&mut self, curve: &PayoffCurve<f64>, label: Option<&str>);
}

/// Draw `curve` onto `sink`.
pub fn draw_payoff<T, S>(curve: &PayoffCurve<T>, label: Option<&str>, sink: &mut S)
where
  T: FloatExt,
  S: PayoffSink + ?Sized,
{
  sink.draw(&curve.to_f64(), label);
}

/// Draw `curve` onto an existing plotter, or onto a fresh one when `None`.
pub fn plot_payoff<T: FloatExt>(
  curve: &PayoffCurve<T>,
  label: Option<&str>,
  plotter: Option<PayoffPlotter>,
) -> PayoffPlotter {
  let mut plotter = plotter.unwrap_or_default();
  draw_payoff(curve, label, &mut plotter);
  plotter
}

struct CurveEntry {
  label: Option<String>,
  curve: PayoffCurve<f64>,
}

pub struct PayoffPlotter {
  entries: Vec<CurveEntry>,
  title: String,
  line_width: f64,
  show_legend: Option<bool>,
  height: usize,
}

impl Default for PayoffPlotter {
  fn default() -> Self {
    Self::new()
  }
}

impl PayoffSink for PayoffPlotter {
  fn draw(&mut self, curve: &PayoffCurve<f64>, label: Option<&str>) {
    self.entries.push(CurveEntry {
      label: label.map(str::to_string),
      curve: curve.clone(),
    });
  }
}

impl PayoffPlotter {
  pub fn new() -> Self {
    Self {
      entries: Vec::new(),
      title: String::new(),
      line_width: 2.0,
      show_legend: None,
      height: 500,
    }
  }

  pub fn title(mut self, title: &str) -> Self {
    self.title = title.into();
    self
  }

  pub fn line_width(mut self, w: f64) -> Self {
    self.line_width = w;
    self
  }

  /// Force the legend on or off. By default it is shown when any curve has a label.
  pub fn show_legend(mut self, show: bool) -> Self {
    self.show_legend = Some(show);
    self
  }

  pub fn height(mut self, height: usize) -> Self {
    self.height = height;
    self
  }

  pub fn register<T: FloatExt>(mut self, curve: &PayoffCurve<T>, label: Option<&str>) -> Self {
    draw_payoff(curve, label, &mut self);
    self
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn plot(&self) -> Plot {
    let show_legend = self
      .show_legend
      .unwrap_or_else(|| self.entries.iter().any(|e| e.label.is_some()));

    let mut plot = Plot::new();
    plot.set_layout(
      Layout::new()
        .title(self.title.as_str())
        .auto_size(true)
        .height(self.height)
        .margin(Margin::new().left(56).right(24).top(64).bottom(56))
        .show_legend(show_legend)
        .x_axis(Axis::new().title(X_AXIS_TITLE))
        .y_axis(Axis::new().title(Y_AXIS_TITLE)),
    );

    for (idx, entry) in self.entries.iter().enumerate() {
      let name = entry
        .label
        .clone()
        .unwrap_or_else(|| format!("curve {}", idx + 1));
      let trace = Scatter::new(entry.curve.s_t().to_vec(), entry.curve.pnl().to_vec())
        .mode(Mode::Lines)
        .line(Line::new().width(self.line_width))
        .name(name.as_str())
        .show_legend(entry.label.is_some());
      plot.add_trace(trace);
    }

    let (x_min, x_max) = self
      .entries
      .iter()
      .flat_map(|e| e.curve.s_t().iter().copied())
      .filter(|x| x.is_finite())
      .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
      });
    if x_min <= x_max {
      let zero = Scatter::new(vec![x_min, x_max], vec![0.0, 0.0])
        .mode(Mode::Lines)
        .line(
          Line::new()
            .width(self.line_width * 0.75)
            .color("black")
            .dash(DashType::Dash),
        )
        .name("y = 0")
        .show_legend(false);
      plot.add_trace(zero);
    }

    debug!(curves = self.entries.len(), "payoff plot assembled");
    plot
  }

  pub fn show(&self) {
    self.plot().show();
  }

  pub fn write_html(&self, path: impl AsRef<Path>) {
    self.plot().write_html(path);
  }
}
