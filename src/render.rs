//! Turning an answer (or a failure) into something a person reads.

use crate::pipeline::Answer;
use crate::types::{Error, ResultSet, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Query header followed by one tuple per row
    #[default]
    Table,
    /// `{query, columns, rows}` object
    Json,
    /// Header row plus one record per row
    Csv,
}

/// Subheader shown above the rows.
pub fn query_header(query: &str) -> String {
    format!("Retrieving results from the database for the query: [{}]", query)
}

/// The one message every failure collapses into.
pub fn error_message(err: &Error) -> String {
    format!("Error: {}", err)
}

/// One line per row, rendered as tuples.
pub fn row_lines(result: &ResultSet) -> Vec<String> {
    result.iter().map(|row| row.to_string()).collect()
}

/// Render an answer in `format`.
///
/// # Errors
///
/// Only `Json` and `Csv` can fail (serializer errors)
pub fn render_answer(answer: &Answer, format: OutputFormat) -> Result<String> {
    render_result(&answer.query, &answer.result, format)
}

/// Render the rows of `query` in `format`.
pub fn render_result(query: &str, result: &ResultSet, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut out = query_header(query);
            out.push('\n');
            for line in row_lines(result) {
                let _ = writeln!(out, "{}", line);
            }
            Ok(out)
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct JsonOutput<'a> {
                query: &'a str,
                #[serde(flatten)]
                result: &'a ResultSet,
            }
            let mut out = serde_json::to_string_pretty(&JsonOutput { query, result })?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(&result.columns)?;
            for row in result.iter() {
                writer.write_record(row.values().iter().map(|v| v.to_plain_string()))?;
            }
            let bytes = writer
                .into_inner()
                .map_err(|e| Error::Internal(format!("CSV flush failed: {}", e)))?;
            String::from_utf8(bytes).map_err(|e| Error::Internal(e.to_string()))
        }
    }
}

/// Escape text for interpolation into HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Outcome shown under the form.
pub enum PageBody<'a> {
    Empty,
    Answer(&'a Answer),
    Failure(&'a Error),
}

/// Full HTML page: title, header, one text input, one button, outcome.
pub fn render_page(question: &str, body: PageBody<'_>) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Text To SQL</title>\n</head>\n<body>\n<h1>Talk to your Database!</h1>\n",
    );
    let _ = write!(
        html,
        "<form method=\"post\" action=\"/\">\n<label for=\"question\">Input:</label>\n\
         <input type=\"text\" id=\"question\" name=\"question\" value=\"{}\">\n\
         <button type=\"submit\">Enter</button>\n</form>\n",
        escape_html(question)
    );

    match body {
        PageBody::Empty => {}
        PageBody::Answer(answer) => {
            let _ = writeln!(html, "<h3>{}</h3>", escape_html(&query_header(&answer.query)));
            for line in row_lines(&answer.result) {
                let _ = writeln!(html, "<p>{}</p>", escape_html(&line));
            }
        }
        PageBody::Failure(err) => {
            let _ = writeln!(
                html,
                "<div class=\"error\">{}</div>",
                escape_html(&error_message(err))
            );
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}
