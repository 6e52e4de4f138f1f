//! SVG chart and HTML wrapper rendering.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::domain::{iso, ChartType, Column, DateRange, PriceRow, PriceSeries, Symbol};

pub const IMAGE_FILE: &str = "chart.svg";
pub const HTML_FILE: &str = "chart.html";

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 70.0;
const Y_TICKS: usize = 5;
const X_TICKS: usize = 6;

const PALETTE: [&str; 4] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728"];

/// Title and labelling for one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartMeta {
    pub symbol: Symbol,
    pub chart_type: ChartType,
    pub start: String,
    pub end: String,
}

impl ChartMeta {
    /// Use the requested range for the title, or the series bounds when the
    /// whole series is charted.
    pub fn new(
        symbol: Symbol,
        chart_type: ChartType,
        range: Option<&DateRange>,
        series: &PriceSeries,
    ) -> Self {
        let (start, end) = match range {
            Some(range) => (range.start_iso(), range.end_iso()),
            None => {
                let first = series.rows().first().map(|row| iso(row.date()));
                let last = series.rows().last().map(|row| iso(row.date()));
                (first.unwrap_or_default(), last.unwrap_or_default())
            }
        };
        Self {
            symbol,
            chart_type,
            start,
            end,
        }
    }

    pub fn title(&self) -> String {
        format!("{} Stock Prices: {} to {}", self.symbol, self.start, self.end)
    }
}

/// Rendered chart image plus its HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifact {
    pub svg: String,
    pub html: String,
}

/// Where [`ChartArtifact::write_to`] put the files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub image: PathBuf,
    pub html: PathBuf,
}

impl ChartArtifact {
    pub fn render(series: &PriceSeries, meta: &ChartMeta) -> Self {
        Self {
            svg: render_svg(series, meta),
            html: render_html(meta, IMAGE_FILE),
        }
    }

    /// Write `chart.svg` and `chart.html` into `dir`, overwriting any
    /// previous chart there.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<ArtifactPaths> {
        std::fs::create_dir_all(dir)?;
        let image = dir.join(IMAGE_FILE);
        let html = dir.join(HTML_FILE);
        std::fs::write(&image, &self.svg)?;
        std::fs::write(&html, &self.html)?;
        Ok(ArtifactPaths { image, html })
    }
}

/// Line charts plot every present column; bar charts plot close.
pub fn render_svg(series: &PriceSeries, meta: &ChartMeta) -> String {
    let columns = match meta.chart_type {
        ChartType::Line => series.columns().to_vec(),
        ChartType::Bar => vec![Column::Close],
    };
    let plot = Plot::fit(series.rows(), &columns);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="32" text-anchor="middle" font-size="20">{}</text>"#,
        WIDTH / 2.0,
        escape(&meta.title())
    );

    plot.grid(&mut svg, series.rows());

    match meta.chart_type {
        ChartType::Line => {
            for (index, column) in columns.iter().enumerate() {
                plot.line(&mut svg, series.rows(), *column, PALETTE[index % PALETTE.len()]);
            }
            legend(&mut svg, &columns);
        }
        ChartType::Bar => plot.bars(&mut svg, series.rows(), Column::Close, PALETTE[0]),
    }

    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="14">Date</text>"#,
        MARGIN_LEFT + plot.width() / 2.0,
        HEIGHT - 15.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="20" y="{y}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {y})">Price (USD)</text>"#,
        y = MARGIN_TOP + plot.height() / 2.0
    );
    svg.push_str("</svg>\n");
    svg
}

pub fn render_html(meta: &ChartMeta, image_name: &str) -> String {
    let symbol = escape(meta.symbol.as_str());
    format!(
        r#"<!doctype html>
<html lang="en"><head><meta charset="utf-8">
<title>{symbol} Stock Chart</title></head>
<body><h2>{symbol} Stock Data: {start} to {end}</h2>
<img src="{image}" alt="chart"></body></html>
"#,
        start = escape(&meta.start),
        end = escape(&meta.end),
        image = escape(image_name),
    )
}

/// Minimal HTML/XML text escaping.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Data-to-pixel mapping for the plot area.
struct Plot {
    t_min: f64,
    t_max: f64,
    y_min: f64,
    y_max: f64,
    slots: usize,
}

impl Plot {
    fn fit(rows: &[PriceRow], columns: &[Column]) -> Self {
        let times = rows.iter().map(seconds);
        let t_min = times.clone().fold(f64::INFINITY, f64::min);
        let t_max = times.fold(f64::NEG_INFINITY, f64::max);

        let values = rows
            .iter()
            .flat_map(|row| columns.iter().filter_map(|column| row.value(*column)));
        let (mut y_min, mut y_max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !y_min.is_finite() || !y_max.is_finite() {
            (y_min, y_max) = (0.0, 1.0);
        }
        let pad = if y_max > y_min { (y_max - y_min) * 0.05 } else { 1.0 };

        Self {
            t_min: if t_min.is_finite() { t_min } else { 0.0 },
            t_max: if t_max.is_finite() { t_max } else { 0.0 },
            y_min: y_min - pad,
            y_max: y_max + pad,
            slots: rows.len().max(1),
        }
    }

    fn width(&self) -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn height(&self) -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, row: &PriceRow) -> f64 {
        let span = self.t_max - self.t_min;
        // Keep half a bar slot free on each side.
        let inset = self.width() / self.slots as f64 / 2.0;
        if span <= 0.0 {
            return MARGIN_LEFT + self.width() / 2.0;
        }
        MARGIN_LEFT + inset + (seconds(row) - self.t_min) / span * (self.width() - 2.0 * inset)
    }

    fn y(&self, value: f64) -> f64 {
        MARGIN_TOP + (self.y_max - value) / (self.y_max - self.y_min) * self.height()
    }

    fn grid(&self, svg: &mut String, rows: &[PriceRow]) {
        let bottom = MARGIN_TOP + self.height();
        let right = MARGIN_LEFT + self.width();

        for tick in 0..=Y_TICKS {
            let value = self.y_min + (self.y_max - self.y_min) * tick as f64 / Y_TICKS as f64;
            let y = self.y(value);
            let _ = writeln!(
                svg,
                r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{right}" y2="{y:.1}" stroke="#cccccc" stroke-dasharray="4 4"/>"##
            );
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{:.1}" text-anchor="end" font-size="12">{value:.2}</text>"#,
                MARGIN_LEFT - 8.0,
                y + 4.0
            );
        }

        if !rows.is_empty() {
            let step = (rows.len() as f64 / X_TICKS as f64).ceil().max(1.0) as usize;
            for row in rows.iter().step_by(step) {
                let x = self.x(row);
                let _ = writeln!(
                    svg,
                    r##"<line x1="{x:.1}" y1="{MARGIN_TOP}" x2="{x:.1}" y2="{bottom}" stroke="#cccccc" stroke-dasharray="4 4"/>"##
                );
                let _ = writeln!(
                    svg,
                    r#"<text x="{x:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
                    bottom + 20.0,
                    iso(row.date())
                );
            }
        }

        let _ = writeln!(
            svg,
            r#"<rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{}" height="{}" fill="none" stroke="black"/>"#,
            self.width(),
            self.height()
        );
    }

    /// Polyline with point markers; a missing value breaks the line.
    fn line(&self, svg: &mut String, rows: &[PriceRow], column: Column, color: &str) {
        let mut segments: Vec<Vec<(f64, f64)>> = vec![Vec::new()];
        for row in rows {
            match row.value(column) {
                Some(value) => {
                    if let Some(segment) = segments.last_mut() {
                        segment.push((self.x(row), self.y(value)));
                    }
                }
                None => segments.push(Vec::new()),
            }
        }

        for segment in segments.iter().filter(|segment| !segment.is_empty()) {
            let points = segment
                .iter()
                .map(|(x, y)| format!("{x:.1},{y:.1}"))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(
                svg,
                r#"<polyline points="{points}" fill="none" stroke="{color}" stroke-width="1.3"/>"#
            );
            for (x, y) in segment {
                let _ = writeln!(
                    svg,
                    r#"<circle cx="{x:.1}" cy="{y:.1}" r="3" fill="{color}"/>"#
                );
            }
        }
    }

    fn bars(&self, svg: &mut String, rows: &[PriceRow], column: Column, color: &str) {
        let bar_width = (self.width() / self.slots as f64 * 0.8).max(1.0);
        let baseline = self.y(self.y_min);
        for row in rows {
            let Some(value) = row.value(column) else {
                continue;
            };
            let top = self.y(value);
            let _ = writeln!(
                svg,
                r#"<rect x="{:.1}" y="{top:.1}" width="{bar_width:.1}" height="{:.1}" fill="{color}"/>"#,
                self.x(row) - bar_width / 2.0,
                (baseline - top).max(0.0)
            );
        }
    }
}

fn legend(svg: &mut String, columns: &[Column]) {
    for (index, column) in columns.iter().enumerate() {
        let y = MARGIN_TOP + 20.0 + index as f64 * 20.0;
        let color = PALETTE[index % PALETTE.len()];
        let _ = writeln!(
            svg,
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{color}" stroke-width="2"/>"#,
            MARGIN_LEFT + 12.0,
            MARGIN_LEFT + 36.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-size="12">{}</text>"#,
            MARGIN_LEFT + 42.0,
            y + 4.0,
            column.label()
        );
    }
}

fn seconds(row: &PriceRow) -> f64 {
    row.timestamp.assume_utc().unix_timestamp() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn series() -> PriceSeries {
        let rows = [
            (datetime!(2023-01-03 0:00), 10.0, 12.0),
            (datetime!(2023-01-04 0:00), 11.0, 13.0),
            (datetime!(2023-01-05 0:00), 12.0, 11.0),
        ]
        .into_iter()
        .map(|(timestamp, open, close)| PriceRow {
            open: Some(open),
            close: Some(close),
            ..PriceRow::new(timestamp)
        });
        PriceSeries::new(rows, [Column::Open, Column::Close], false)
    }

    fn meta(chart_type: ChartType) -> ChartMeta {
        let range = DateRange::new(date!(2023 - 01 - 01), date!(2023 - 01 - 31));
        ChartMeta::new(
            Symbol::parse("AAPL").expect("valid symbol"),
            chart_type,
            Some(&range),
            &series(),
        )
    }

    #[test]
    fn line_chart_draws_each_column_with_legend() {
        let svg = render_svg(&series(), &meta(ChartType::Line));

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("AAPL Stock Prices: 2023-01-01 to 2023-01-31"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 6);
        assert!(svg.contains(">Open</text>"));
        assert!(svg.contains(">Close</text>"));
    }

    #[test]
    fn bar_chart_draws_one_bar_per_close() {
        let svg = render_svg(&series(), &meta(ChartType::Bar));

        assert_eq!(svg.matches("<polyline").count(), 0);
        // Background + plot frame + three bars.
        assert_eq!(svg.matches("<rect").count(), 5);
    }

    #[test]
    fn title_uses_series_bounds_without_range() {
        let meta = ChartMeta::new(
            Symbol::parse("MSFT").expect("valid symbol"),
            ChartType::Line,
            None,
            &series(),
        );
        assert_eq!(meta.title(), "MSFT Stock Prices: 2023-01-03 to 2023-01-05");
    }

    #[test]
    fn html_wraps_image_and_escapes() {
        let html = render_html(&meta(ChartType::Line), "chart<1>.svg");
        assert!(html.contains(r#"<img src="chart&lt;1&gt;.svg" alt="chart">"#));
        assert!(html.contains("<h2>AAPL Stock Data: 2023-01-01 to 2023-01-31</h2>"));
    }

    #[test]
    fn artifact_writes_both_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let artifact = ChartArtifact::render(&series(), &meta(ChartType::Line));
        let paths = artifact.write_to(dir.path()).expect("write artifact");

        assert_eq!(paths.image, dir.path().join(IMAGE_FILE));
        let html = std::fs::read_to_string(&paths.html).expect("read html");
        assert!(html.contains("chart.svg"));
    }
}
