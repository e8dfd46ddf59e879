//! The rendering seam between the quiz core and its front ends.
//!
//! The core never draws anything. Front ends implement [`Renderer`] for
//! their medium (terminal text, HTML) and the helpers here decide what gets
//! drawn: which spans of a question are math, and which graph records carry
//! plottable data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::StemquizConfig;
use crate::model::{GraphSpec, SeriesRecord};
use crate::segment::{SegmentKind, Segmenter};

/// Size of the area a chart is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
        }
    }
}

impl From<&StemquizConfig> for Dimensions {
    fn from(config: &StemquizConfig) -> Self {
        Self {
            width: config.chart_width,
            height: config.chart_height,
        }
    }
}

/// A medium that question content can be drawn to.
pub trait Renderer {
    /// One rendered fragment (a string of markup, a styled line, ...).
    type Fragment;

    /// Plain prose.
    fn render_text(&self, text: &str) -> Self::Fragment;

    /// An inline math expression, without its delimiters.
    fn render_math(&self, expression: &str) -> Self::Fragment;

    /// A graph. `None` when the kind is unsupported or the data is unusable;
    /// callers show nothing in that case.
    fn render_chart(&self, graph: &GraphSpec, dimensions: Dimensions) -> Option<Self::Fragment>;
}

/// Render mixed text, dispatching each segment to the matching hook.
pub fn render_rich_text<R: Renderer + ?Sized>(
    renderer: &R,
    segmenter: &Segmenter,
    text: &str,
) -> Vec<R::Fragment> {
    segmenter
        .segment(text)
        .map(|segment| match segment.kind {
            SegmentKind::Literal => renderer.render_text(segment.content),
            SegmentKind::Math => renderer.render_math(segment.content),
        })
        .collect()
}

/// Conventional attribute names for chart axes.
pub const X_KEY: &str = "x";
pub const Y_KEY: &str = "y";

/// A plottable point. `x` keeps its JSON value so bar charts can use
/// category labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: Value,
    pub y: f64,
}

impl ChartPoint {
    /// The x value as a label (strings unquoted).
    pub fn label(&self) -> String {
        match &self.x {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Records with an `x` value and a numeric `y`, in series order.
///
/// Records missing either are skipped.
pub fn chart_points(series: &[SeriesRecord]) -> Vec<ChartPoint> {
    series
        .iter()
        .filter_map(|record| {
            let x = record.get(X_KEY)?.clone();
            let y = record.get(Y_KEY)?.as_f64()?;
            Some(ChartPoint { x, y })
        })
        .collect()
}

/// Column headers for a table graph: the union of record keys in first-seen
/// order.
pub fn table_columns(series: &[SeriesRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in series {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// A table cell's display text. Missing cells are empty.
pub fn cell_text(record: &SeriesRecord, column: &str) -> String {
    match record.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
