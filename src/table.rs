use std::borrow::Cow;
use std::fmt::Write as _;

/// Horizontal alignment for one table column. Numeric columns read better
/// right-aligned; anything textual stays left-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Renders an aligned, two-space-separated text table. Columns missing from
/// `alignments` default to [`Align::Left`].
pub fn render_table(headers: &[String], rows: &[Vec<String>], alignments: &[Align]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();

    let header_line = format_row(headers, &widths, alignments);
    let _ = writeln!(output, "{header_line}");

    let separator_cells = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let separator_line = format_row(&separator_cells, &widths, alignments);
    let _ = writeln!(output, "{separator_line}");

    for row in rows {
        let row_line = format_row(row, &widths, alignments);
        let _ = writeln!(output, "{row_line}");
    }

    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>], alignments: &[Align]) {
    let rendered = render_table(headers, rows, alignments);
    print!("{rendered}");
}

fn format_row(values: &[String], widths: &[usize], alignments: &[Align]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        if idx >= widths.len() {
            break;
        }
        let sanitized = sanitize_cell(value);
        let padding = widths[idx].saturating_sub(sanitized.chars().count());
        let align = alignments.get(idx).copied().unwrap_or(Align::Left);
        let cell = match align {
            Align::Left => {
                let mut cell = sanitized.into_owned();
                cell.push_str(&" ".repeat(padding));
                cell
            }
            Align::Right => {
                let mut cell = " ".repeat(padding);
                cell.push_str(sanitized.as_ref());
                cell
            }
        };
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        let mut sanitized = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                '\n' | '\r' | '\t' => sanitized.push(' '),
                other => sanitized.push(other),
            }
        }
        Cow::Owned(sanitized)
    } else {
        Cow::Borrowed(value)
    }
}
