//! HTML data docs for a validation run.

use quality_core::{LayerResult, ValidationResult, ValidationRun};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// File name written by [`write_data_docs`].
pub const DATA_DOCS_INDEX: &str = "index.html";

/// Renders a validation run as a standalone HTML page.
pub fn render_data_docs(run: &ValidationRun) -> String {
    let mut html = String::new();
    let status = status_label(run.passed());

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Data Quality Report</title>\n<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");
    let _ = writeln!(
        html,
        "<h1>Data Quality Report</h1>\n<p>Generated at {} &middot; <span class=\"{}\">{}</span></p>",
        run.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        status.to_lowercase(),
        status
    );

    for layer in &run.layers {
        render_layer(&mut html, layer);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_layer(html: &mut String, layer: &LayerResult) {
    let status = status_label(layer.passed);
    let _ = writeln!(
        html,
        "<h2>Layer {} <span class=\"{}\">{}</span></h2>",
        escape(&layer.layer_name),
        status.to_lowercase(),
        status
    );

    for result in layer.dataset_results.values() {
        render_dataset(html, result);
    }
}

fn render_dataset(html: &mut String, result: &ValidationResult) {
    let status = status_label(result.passed);
    let _ = writeln!(
        html,
        "<h3>{} <span class=\"{}\">{}</span></h3>",
        escape(&result.dataset_name),
        status.to_lowercase(),
        status
    );

    if result.failures.is_empty() {
        html.push_str("<p>All expectations met.</p>\n");
        return;
    }

    html.push_str("<table>\n<tr><th>Expectation</th><th>Column</th><th>Message</th></tr>\n");
    for failure in &result.failures {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            failure.expectation_kind,
            escape(failure.column.as_deref().unwrap_or("-")),
            escape(&failure.message)
        );
    }
    html.push_str("</table>\n");
}

/// Writes the rendered page to `dir/index.html`, creating `dir` if needed.
pub fn write_data_docs(run: &ValidationRun, dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(DATA_DOCS_INDEX);
    std::fs::write(&path, render_data_docs(run))?;
    Ok(path)
}

fn status_label(passed: bool) -> &'static str {
    if passed { "PASSED" } else { "FAILED" }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
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

const STYLE: &str = "body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; margin-bottom: 1em; }
th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }
.passed { color: #2e7d32; }
.failed { color: #c62828; }
";
