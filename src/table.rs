use std::borrow::Cow;
use std::fmt::Write as _;

const HIGHLIGHT_START: &str = "\u{1b}[1;31m";
const HIGHLIGHT_END: &str = "\u{1b}[0m";

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    render_rows(headers, rows, &[])
}

/// Renders like [`render_table`], painting every cell of the rows flagged in
/// `highlighted` bold red.
pub fn render_highlighted_table(
    headers: &[String],
    rows: &[Vec<String>],
    highlighted: &[bool],
) -> String {
    render_rows(headers, rows, highlighted)
}

fn render_rows(headers: &[String], rows: &[Vec<String>], highlighted: &[bool]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();

    let header_line = format_row(headers, &widths, false);
    let _ = writeln!(output, "{header_line}");

    let separator_cells = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let separator_line = format_row(&separator_cells, &widths, false);
    let _ = writeln!(output, "{separator_line}");

    for (idx, row) in rows.iter().enumerate() {
        let paint = highlighted.get(idx).copied().unwrap_or(false);
        let row_line = format_row(row, &widths, paint);
        let _ = writeln!(output, "{row_line}");
    }

    output
}

fn format_row(values: &[String], widths: &[usize], paint: bool) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        if idx >= widths.len() {
            break;
        }
        let sanitized = sanitize_cell(value);
        let display = display_width(sanitized.as_ref());
        let mut cell = if paint {
            format!("{HIGHLIGHT_START}{sanitized}{HIGHLIGHT_END}")
        } else {
            sanitized.into_owned()
        };
        let padding = widths
            .get(idx)
            .copied()
            .unwrap_or_default()
            .saturating_sub(display);
        if padding > 0 {
            cell.push_str(&" ".repeat(padding));
        }
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

// Cells are sanitized one char for one char, so the raw count is the width.
fn display_width(value: &str) -> usize {
    value.chars().count()
}

/// Replaces control characters (including ESC) with spaces so dataset text
/// cannot drive the terminal.
fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.chars().any(char::is_control) {
        Cow::Owned(
            value
                .chars()
                .map(|ch| if ch.is_control() { ' ' } else { ch })
                .collect(),
        )
    } else {
        Cow::Borrowed(value)
    }
}
