//! Plain-text renderer for the interactive quiz.

use comfy_table::Table;

use stemquiz_core::config::StemquizConfig;
use stemquiz_core::model::{GraphKind, GraphSpec, Question, SeriesRecord};
use stemquiz_core::segment::Segmenter;
use stemquiz_core::traits::{
    cell_text, chart_points, render_rich_text, table_columns, Dimensions, Renderer,
};

/// Character cells per pixel of configured chart width.
const PIXELS_PER_COLUMN: u32 = 10;

#[derive(Debug, Clone, Default)]
pub struct TerminalRenderer {
    segmenter: Segmenter,
    dimensions: Dimensions,
}

impl TerminalRenderer {
    pub fn from_config(config: &StemquizConfig) -> Self {
        Self {
            segmenter: Segmenter::new(config.math_delimiter),
            dimensions: Dimensions::from(config),
        }
    }

    pub fn rich_text(&self, text: &str) -> String {
        render_rich_text(self, &self.segmenter, text).concat()
    }

    /// Question text, standalone math, graph and numbered options.
    pub fn question(&self, question: &Question) -> String {
        let mut out = self.rich_text(&question.question_text);
        out.push('\n');
        if let Some(latex) = &question.latex {
            out.push_str(&format!("\n    {latex}\n"));
        }
        if let Some(chart) = question
            .graph
            .as_ref()
            .and_then(|graph| self.render_chart(graph, self.dimensions))
        {
            out.push('\n');
            out.push_str(&chart);
            out.push('\n');
        }
        out.push('\n');
        for (idx, option) in question.options.iter().enumerate() {
            out.push_str(&format!("  {}) {}\n", idx + 1, self.rich_text(option)));
        }
        out
    }
}

impl Renderer for TerminalRenderer {
    type Fragment = String;

    fn render_text(&self, text: &str) -> String {
        text.to_string()
    }

    fn render_math(&self, expression: &str) -> String {
        format!("`{expression}`")
    }

    fn render_chart(&self, graph: &GraphSpec, dimensions: Dimensions) -> Option<String> {
        match graph.kind {
            GraphKind::Table => table(&graph.series),
            GraphKind::Unsupported => None,
            kind => bars(kind, &graph.series, dimensions),
        }
    }
}

fn table(series: &[SeriesRecord]) -> Option<String> {
    let columns = table_columns(series);
    if columns.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(columns.clone());
    for record in series {
        table.add_row(
            columns
                .iter()
                .map(|column| cell_text(record, column))
                .collect::<Vec<_>>(),
        );
    }
    Some(table.to_string())
}

/// One horizontal bar per point, scaled to the configured width.
fn bars(kind: GraphKind, series: &[SeriesRecord], dimensions: Dimensions) -> Option<String> {
    let points = chart_points(series);
    if points.is_empty() {
        return None;
    }

    let columns = (dimensions.width / PIXELS_PER_COLUMN).max(1) as f64;
    let largest = points.iter().map(|p| p.y.abs()).fold(0.0_f64, f64::max);
    let labels: Vec<String> = points.iter().map(|p| p.label()).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut out = format!("[{kind} chart]\n");
    for (label, point) in labels.iter().zip(&points) {
        let length = if largest > 0.0 {
            (point.y.abs() / largest * columns).round() as usize
        } else {
            0
        };
        let mark = if kind == GraphKind::Scatter {
            format!("{}*", " ".repeat(length.saturating_sub(1)))
        } else {
            "#".repeat(length)
        };
        out.push_str(&format!("{label:>label_width$} | {mark} {}\n", point.y));
    }
    Some(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph(kind: GraphKind, data: serde_json::Value) -> GraphSpec {
        GraphSpec {
            kind,
            series: serde_json::from_value(data).unwrap(),
        }
    }

    #[test]
    fn math_is_marked_inline() {
        let renderer = TerminalRenderer::default();
        assert_eq!(renderer.rich_text("Solve $x+1=2$."), "Solve `x+1=2`.");
    }

    #[test]
    fn bar_chart_scales_to_width() {
        let chart = TerminalRenderer::default()
            .render_chart(
                &graph(GraphKind::Bar, json!([{"x": "a", "y": 2}, {"x": "bb", "y": 4}])),
                Dimensions {
                    width: 80,
                    height: 60,
                },
            )
            .unwrap();
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], "[bar chart]");
        assert_eq!(lines[1], " a | #### 2");
        assert_eq!(lines[2], "bb | ######## 4");
    }

    #[test]
    fn table_graph_is_drawn_with_headers() {
        let chart = TerminalRenderer::default()
            .render_chart(
                &graph(GraphKind::Table, json!([{"sample": "A", "mass": 12}])),
                Dimensions::default(),
            )
            .unwrap();
        assert!(chart.contains("sample"));
        assert!(chart.contains("mass"));
        assert!(chart.contains("12"));
    }

    #[test]
    fn unsupported_graph_is_skipped() {
        assert!(TerminalRenderer::default()
            .render_chart(&graph(GraphKind::Unsupported, json!([])), Dimensions::default())
            .is_none());
    }
}
