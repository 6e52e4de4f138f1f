//! Server-rendered index page.

use std::fmt::Write as _;

use tickchart_core::render::escape;
use tickchart_core::{ChartType, Granularity, SymbolMatch};

use crate::form::ChartForm;

/// What the page shows besides the form.
#[derive(Debug, Default)]
pub struct PageView<'a> {
    pub form: Option<&'a ChartForm>,
    pub chart_url: Option<String>,
    pub error: Option<String>,
}

const SEARCH_SCRIPT: &str = r#"<script>
const box = document.getElementById('symbol_text');
const list = document.getElementById('symbol_matches');
let pending;
box.addEventListener('input', () => {
  clearTimeout(pending);
  pending = setTimeout(async () => {
    const response = await fetch('/search_symbols?q=' + encodeURIComponent(box.value));
    const matches = await response.json();
    list.innerHTML = '';
    for (const match of matches) {
      const option = document.createElement('option');
      option.value = match.symbol;
      option.label = match.name;
      list.appendChild(option);
    }
  }, 300);
});
</script>"#;

pub fn render_index(symbols: &[SymbolMatch], view: &PageView<'_>) -> String {
    let selected = view.form.and_then(ChartForm::selected_symbol);
    let chart_type = view.form.map(|form| form.chart_type.trim()).unwrap_or_default();
    let time_series = view.form.map(|form| form.time_series.trim()).unwrap_or_default();

    let mut html = String::from(
        "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\n\
         <title>Stock Data Visualizer</title></head>\n<body>\n<h1>Stock Data Visualizer</h1>\n",
    );

    if let Some(error) = &view.error {
        let _ = writeln!(html, r#"<p class="error" role="alert">{}</p>"#, escape(error));
    }

    html.push_str("<form method=\"post\" action=\"/\">\n");

    html.push_str("<label for=\"symbol\">Symbol</label>\n<select id=\"symbol\" name=\"symbol\">\n<option value=\"\">-- choose --</option>\n");
    for entry in symbols {
        let is_selected = selected.as_deref() == Some(entry.symbol.as_str());
        let _ = writeln!(
            html,
            r#"<option value="{}"{}>{} - {}</option>"#,
            escape(&entry.symbol),
            if is_selected { " selected" } else { "" },
            escape(&entry.symbol),
            escape(&entry.name)
        );
    }
    html.push_str("</select>\n");

    let typed = view.form.map(|form| form.symbol_text.as_str()).unwrap_or_default();
    let _ = writeln!(
        html,
        r#"<label for="symbol_text">or type a symbol</label>
<input id="symbol_text" name="symbol_text" list="symbol_matches" autocomplete="off" value="{}">
<datalist id="symbol_matches"></datalist>"#,
        escape(typed)
    );

    html.push_str("<label for=\"chart_type\">Chart type</label>\n<select id=\"chart_type\" name=\"chart_type\">\n");
    for option in ChartType::ALL {
        push_option(&mut html, option.as_str(), option.label(), chart_type);
    }
    html.push_str("</select>\n");

    html.push_str("<label for=\"time_series\">Time series</label>\n<select id=\"time_series\" name=\"time_series\">\n");
    for option in Granularity::ALL {
        let current = if time_series.is_empty() {
            Granularity::Daily.as_str()
        } else {
            time_series
        };
        push_option(&mut html, option.as_str(), option.label(), current);
    }
    html.push_str("</select>\n");

    for (name, label, value) in [
        ("start_date", "Start date", view.form.map(|form| form.start_date.as_str())),
        ("end_date", "End date", view.form.map(|form| form.end_date.as_str())),
    ] {
        let _ = writeln!(
            html,
            r#"<label for="{name}">{label}</label>
<input id="{name}" name="{name}" placeholder="YYYY-MM-DD" value="{}">"#,
            escape(value.unwrap_or_default())
        );
    }

    html.push_str("<button type=\"submit\">Generate chart</button>\n</form>\n");

    if let Some(url) = &view.chart_url {
        let _ = writeln!(
            html,
            r#"<img id="chart" src="{}" alt="stock chart">"#,
            escape(url)
        );
    }

    html.push_str(SEARCH_SCRIPT);
    html.push_str("\n</body></html>\n");
    html
}

fn push_option(html: &mut String, value: &str, label: &str, current: &str) {
    let _ = writeln!(
        html,
        r#"<option value="{value}"{}>{label}</option>"#,
        if current.eq_ignore_ascii_case(value) { " selected" } else { "" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> Vec<SymbolMatch> {
        vec![
            SymbolMatch::new("AAPL", "Apple Inc."),
            SymbolMatch::new("AT&T", "AT&T <Inc>"),
        ]
    }

    #[test]
    fn empty_page_lists_symbols_and_defaults() {
        let html = render_index(&symbols(), &PageView::default());

        assert!(html.contains(r#"<option value="AAPL">AAPL - Apple Inc.</option>"#));
        assert!(html.contains("AT&amp;T - AT&amp;T &lt;Inc&gt;"));
        assert!(html.contains(r#"<option value="daily" selected>Daily</option>"#));
        assert!(!html.contains("<img"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn submitted_values_are_kept() {
        let form = ChartForm {
            symbol: String::from("AAPL"),
            chart_type: String::from("bar"),
            time_series: String::from("monthly"),
            start_date: String::from("2023-01-01"),
            ..ChartForm::default()
        };
        let html = render_index(
            &symbols(),
            &PageView {
                form: Some(&form),
                chart_url: Some(String::from("/static/chart.svg?t=1")),
                error: None,
            },
        );

        assert!(html.contains(r#"<option value="AAPL" selected>"#));
        assert!(html.contains(r#"<option value="bar" selected>Bar Chart</option>"#));
        assert!(html.contains(r#"<option value="monthly" selected>Monthly</option>"#));
        assert!(html.contains(r#"value="2023-01-01""#));
        assert!(html.contains(r#"<img id="chart" src="/static/chart.svg?t=1""#));
    }

    #[test]
    fn error_is_escaped() {
        let html = render_index(
            &[],
            &PageView {
                error: Some(String::from("bad <symbol>")),
                ..PageView::default()
            },
        );
        assert!(html.contains(r#"<p class="error" role="alert">bad &lt;symbol&gt;</p>"#));
    }
}
