//! CSV export of a form's submissions.

use chrono::SecondsFormat;

use crate::models::{Form, Submission};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Renders submissions as CSV: id, timestamp, then one column per question in
/// form order.
///
/// Data cells are always quoted. Header cells are quoted only when they
/// contain a delimiter, quote or line break. Rows are newline-separated with
/// no trailing newline.
pub fn submissions_csv(form: &Form, submissions: &[Submission]) -> String {
    let mut lines = Vec::with_capacity(submissions.len() + 1);

    let mut header = vec![
        "Submission ID".to_string(),
        "Submitted At".to_string(),
    ];
    header.extend(form.questions.iter().map(|q| escape_header_cell(&q.text)));
    lines.push(header.join(","));

    for submission in submissions {
        let mut row = Vec::with_capacity(form.questions.len() + 2);
        row.push(quote_cell(&submission.id.to_string()));
        row.push(quote_cell(
            &submission
                .submitted_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ));
        row.extend(
            form.questions
                .iter()
                .map(|q| quote_cell(submission.answer_for(&q.id))),
        );
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// `Content-Disposition` filename: title with every non-alphanumeric ASCII
/// character replaced by `_`.
pub fn export_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_submissions.csv", stem)
}

fn quote_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn escape_header_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quote_cell(value)
    } else {
        value.to_string()
    }
}
