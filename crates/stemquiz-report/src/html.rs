//! HTML renderer and results page.
//!
//! [`HtmlRenderer`] draws question content as markup: prose escaped, math
//! as MathJax spans, `line`/`bar`/`scatter` graphs as inline SVG and `table`
//! graphs as an HTML table. [`generate_html`] uses it to build a
//! self-contained results page (MathJax is the one external script).

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use stemquiz_core::config::StemquizConfig;
use stemquiz_core::model::{GraphKind, GraphSpec, QuestionSet, SeriesRecord};
use stemquiz_core::report::SessionReport;
use stemquiz_core::segment::Segmenter;
use stemquiz_core::traits::{
    cell_text, chart_points, render_rich_text, table_columns, ChartPoint, Dimensions, Renderer,
    X_KEY, Y_KEY,
};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Renders question content to HTML fragments.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    segmenter: Segmenter,
    dimensions: Dimensions,
}

impl HtmlRenderer {
    pub fn new(segmenter: Segmenter, dimensions: Dimensions) -> Self {
        Self {
            segmenter,
            dimensions,
        }
    }

    pub fn from_config(config: &StemquizConfig) -> Self {
        Self::new(
            Segmenter::new(config.math_delimiter),
            Dimensions::from(config),
        )
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Render text that may contain inline math.
    pub fn rich_text(&self, text: &str) -> String {
        render_rich_text(self, &self.segmenter, text).concat()
    }

    /// Render a standalone display-math expression.
    pub fn math_block(&self, latex: &str) -> String {
        format!(
            "<div class=\"math-block\">\\[{}\\]</div>",
            html_escape(latex)
        )
    }

    /// Render a graph at the configured size.
    pub fn chart(&self, graph: &GraphSpec) -> Option<String> {
        self.render_chart(graph, self.dimensions)
    }
}

impl Renderer for HtmlRenderer {
    type Fragment = String;

    fn render_text(&self, text: &str) -> String {
        html_escape(text)
    }

    fn render_math(&self, expression: &str) -> String {
        format!("<span class=\"math\">\\({}\\)</span>", html_escape(expression))
    }

    fn render_chart(&self, graph: &GraphSpec, dimensions: Dimensions) -> Option<String> {
        let svg = match graph.kind {
            GraphKind::Table => return table(&graph.series),
            GraphKind::Unsupported => {
                tracing::debug!("skipping unsupported graph");
                return None;
            }
            GraphKind::Line | GraphKind::Bar | GraphKind::Scatter => {
                let points = chart_points(&graph.series);
                if points.is_empty() {
                    tracing::debug!(kind = %graph.kind, "graph has no plottable points");
                    return None;
                }
                svg_chart(graph.kind, &points, dimensions)
            }
        };
        Some(svg)
    }
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

const MARGIN: f64 = 40.0;
const STROKE: &str = "#2563eb";

/// The plotting area inside the chart margins.
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn new(dimensions: Dimensions) -> Self {
        Self {
            left: MARGIN,
            top: MARGIN / 2.0,
            width: (f64::from(dimensions.width) - 1.5 * MARGIN).max(1.0),
            height: (f64::from(dimensions.height) - 1.5 * MARGIN).max(1.0),
        }
    }

    fn x(&self, t: f64) -> f64 {
        self.left + t * self.width
    }

    fn y(&self, t: f64) -> f64 {
        self.top + (1.0 - t) * self.height
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Position of `value` in `[min, max]` as a fraction.
fn unit(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.5
    }
}

/// Horizontal positions: numeric x values are scaled; anything else is laid
/// out as evenly spaced categories. Bars are always categorical.
fn x_positions(kind: GraphKind, points: &[ChartPoint]) -> Vec<f64> {
    let numeric: Option<Vec<f64>> = if kind == GraphKind::Bar {
        None
    } else {
        points.iter().map(|p| p.x.as_f64()).collect()
    };

    match numeric {
        Some(xs) => {
            let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
            let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            xs.iter().map(|&x| unit(x, min, max)).collect()
        }
        None => {
            let n = points.len() as f64;
            (0..points.len()).map(|i| (i as f64 + 0.5) / n).collect()
        }
    }
}

fn svg_chart(kind: GraphKind, points: &[ChartPoint], dimensions: Dimensions) -> String {
    let frame = Frame::new(dimensions);
    let y_min = points.iter().map(|p| p.y).fold(0.0_f64, f64::min);
    let y_max = points.iter().map(|p| p.y).fold(y_min, f64::max);
    let xs = x_positions(kind, points);
    let baseline = frame.y(unit(0.0, y_min, y_max));

    let mut svg = format!(
        "<svg class=\"chart chart-{kind}\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        w = dimensions.width,
        h = dimensions.height,
    );

    // Axes
    svg.push_str(&format!(
        "  <line class=\"axis\" x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"currentColor\"/>\n",
        frame.left, baseline, frame.x(1.0), baseline
    ));
    svg.push_str(&format!(
        "  <line class=\"axis\" x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"currentColor\"/>\n",
        frame.left, frame.top, frame.left, frame.bottom()
    ));
    for value in [y_min, y_max] {
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            frame.left - 6.0,
            frame.y(unit(value, y_min, y_max)),
            format_tick(value)
        ));
    }

    let coords: Vec<(f64, f64)> = xs
        .iter()
        .zip(points)
        .map(|(&t, p)| (frame.x(t), frame.y(unit(p.y, y_min, y_max))))
        .collect();

    match kind {
        GraphKind::Line => {
            let path: Vec<String> = coords
                .iter()
                .map(|(x, y)| format!("{x:.1},{y:.1}"))
                .collect();
            svg.push_str(&format!(
                "  <polyline fill=\"none\" stroke=\"{STROKE}\" stroke-width=\"2\" points=\"{}\"/>\n",
                path.join(" ")
            ));
            for (x, y) in &coords {
                svg.push_str(&format!(
                    "  <circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"3\" fill=\"{STROKE}\"/>\n"
                ));
            }
        }
        GraphKind::Scatter => {
            for (x, y) in &coords {
                svg.push_str(&format!(
                    "  <circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"4\" fill=\"{STROKE}\" fill-opacity=\"0.7\"/>\n"
                ));
            }
        }
        _ => {
            let bar_width = frame.width / points.len() as f64 * 0.7;
            for (x, y) in &coords {
                let top = y.min(baseline);
                svg.push_str(&format!(
                    "  <rect x=\"{:.1}\" y=\"{top:.1}\" width=\"{bar_width:.1}\" height=\"{:.1}\" fill=\"{STROKE}\" rx=\"2\"/>\n",
                    x - bar_width / 2.0,
                    (y - baseline).abs()
                ));
            }
        }
    }

    for ((x, _), point) in coords.iter().zip(points) {
        svg.push_str(&format!(
            "  <text x=\"{x:.1}\" y=\"{:.1}\" font-size=\"11\" fill=\"currentColor\" text-anchor=\"middle\">{}</text>\n",
            frame.bottom() + 16.0,
            html_escape(&point.label())
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn table(series: &[SeriesRecord]) -> Option<String> {
    let columns = table_columns(series);
    if columns.is_empty() {
        return None;
    }

    let mut html = String::from("<table class=\"graph-table\">\n<thead><tr>");
    for column in &columns {
        html.push_str(&format!("<th>{}</th>", html_escape(column)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for record in series {
        html.push_str("<tr>");
        for column in &columns {
            html.push_str(&format!(
                "<td>{}</td>",
                html_escape(&cell_text(record, column))
            ));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table>\n");
    Some(html)
}

// ---------------------------------------------------------------------------
// Results page
// ---------------------------------------------------------------------------

/// Line chart of time spent per question, labelled `Q1..Qn`.
fn time_chart(report: &SessionReport) -> GraphSpec {
    let series = report
        .summary
        .time_series
        .iter()
        .map(|point| {
            let mut record = SeriesRecord::new();
            record.insert(X_KEY.into(), Value::from(point.label.clone()));
            record.insert(Y_KEY.into(), Value::from(point.seconds));
            record
        })
        .collect();
    GraphSpec {
        kind: GraphKind::Line,
        series,
    }
}

/// Generate the results page for a finished session.
///
/// With the question set, answers show their question text and chosen
/// option, and a review section re-renders every question.
pub fn generate_html(
    report: &SessionReport,
    questions: Option<&QuestionSet>,
    renderer: &HtmlRenderer,
) -> String {
    let summary = &report.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>stemquiz results</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str(MATHJAX);
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Quiz Results</h1>\n");
    let source = report
        .source
        .as_deref()
        .map(|s| format!("Question set: <strong>{}</strong> | ", html_escape(s)))
        .unwrap_or_default();
    html.push_str(&format!(
        "<p class=\"meta\">{source}{} | {}</p>\n",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.id
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str(&format!(
        "<p class=\"score\">Correct Answers: <strong>{}/{}</strong></p>\n",
        summary.correct, report.question_count
    ));
    html.push_str(&format!(
        "<p>Average Time per Question: <strong>{:.2} seconds</strong></p>\n",
        summary.average_time_seconds
    ));
    if !summary.time_series.is_empty() {
        html.push_str("<h2>Time per question</h2>\n");
        if let Some(chart) = renderer.chart(&time_chart(report)) {
            html.push_str(&chart);
        }
    }

    for (title, groups) in [("Topic", &summary.per_topic), ("Concept", &summary.per_concept)] {
        if groups.is_empty() {
            continue;
        }
        html.push_str(&format!("<h2>By {}</h2>\n", title.to_lowercase()));
        html.push_str("<table class=\"summary\">\n");
        html.push_str(&format!(
            "<thead><tr><th>{title}</th><th>Correct</th><th>Accuracy</th><th>Avg Time</th></tr></thead>\n"
        ));
        html.push_str("<tbody>\n");
        for group in groups {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}/{}</td><td>{:.1}%</td><td>{:.2}s</td></tr>\n",
                html_escape(&group.name),
                group.correct,
                group.answered,
                group.accuracy() * 100.0,
                group.average_time_seconds,
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Answers
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Answers</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"answers\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">#</th><th onclick=\"sortTable(1)\">Question</th><th onclick=\"sortTable(2)\">Topic</th><th onclick=\"sortTable(3)\">Concept</th><th onclick=\"sortTable(4)\">Your Answer</th><th onclick=\"sortTable(5)\">Result</th><th onclick=\"sortTable(6)\">Time</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for (i, answer) in report.answers.iter().enumerate() {
        let question = questions.and_then(|set| set.iter().find(|q| q.id == answer.question_id));
        let question_cell = match question {
            Some(q) => renderer.rich_text(&q.question_text),
            None => format!("Question {}", answer.question_id),
        };
        let answer_cell = question
            .and_then(|q| q.options.get(answer.selected_index))
            .map(|option| renderer.rich_text(option))
            .unwrap_or_else(|| format!("Option {}", answer.selected_index + 1));
        let (class, result) = if answer.is_correct {
            ("pass", "Correct")
        } else {
            ("fail", "Incorrect")
        };

        html.push_str(&format!(
            "<tr class=\"{class}\"><td>{}</td><td>{question_cell}</td><td>{}</td><td>{}</td><td>{answer_cell}</td><td>{result}</td><td>{:.2}s</td></tr>\n",
            i + 1,
            html_escape(&answer.topic),
            html_escape(&answer.concept),
            answer.time_spent_seconds,
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Question review
    if let Some(set) = questions.filter(|set| !set.is_empty()) {
        html.push_str("<section class=\"review\">\n");
        html.push_str("<h2>Questions</h2>\n");
        for (i, question) in set.iter().enumerate() {
            html.push_str("<article class=\"question\">\n");
            html.push_str(&format!(
                "<h3>Question {}</h3>\n<p>{}</p>\n",
                i + 1,
                renderer.rich_text(&question.question_text)
            ));
            if let Some(latex) = &question.latex {
                html.push_str(&renderer.math_block(latex));
                html.push('\n');
            }
            if let Some(chart) = question.graph.as_ref().and_then(|g| renderer.chart(g)) {
                html.push_str(&chart);
            }
            html.push_str("<ol class=\"options\">\n");
            for (idx, option) in question.options.iter().enumerate() {
                let class = if question.is_correct(idx) {
                    " class=\"correct\""
                } else {
                    ""
                };
                html.push_str(&format!(
                    "<li{class}>{}</li>\n",
                    renderer.rich_text(option)
                ));
            }
            html.push_str("</ol>\n</article>\n");
        }
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the results page to a file.
pub fn write_html_report(
    report: &SessionReport,
    questions: Option<&QuestionSet>,
    renderer: &HtmlRenderer,
    path: &Path,
) -> Result<()> {
    let html = generate_html(report, questions, renderer);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

const MATHJAX: &str = "<script id=\"MathJax-script\" async src=\"https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js\"></script>\n";

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); max-width: 960px; }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { font-size: 1.25rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.results-table th { cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.question { border: 1px solid var(--border); border-radius: 8px; padding: 0 1rem 1rem; margin: 1rem 0; }
.options .correct { font-weight: bold; }
.math-block { margin: 0.5rem 0; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; display: block; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('answers');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, {numeric: true}) : vb.localeCompare(va, undefined, {numeric: true});
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
