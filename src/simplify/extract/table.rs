use super::super::compile::CompiledVocabulary;
use super::super::lines::LinePatterns;
use super::super::model::RawStep;
use std::ops::Range;

/// How the cells of a table span are delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TableLayout {
    /// `| a | b |` rows, optionally with a `|---|---|` separator.
    Pipe,
    /// A header line over a dashed separator; columns follow the dash runs.
    FixedWidth,
}

struct Row<'a> {
    source: &'a str,
    cells: Vec<String>,
}

/// One step per data row, taken from the action column.
pub(super) fn extract_table(
    lines: &[&str],
    layout: TableLayout,
    patterns: &LinePatterns,
    vocabulary: &CompiledVocabulary,
) -> Vec<RawStep> {
    let (header, rows) = match layout {
        TableLayout::Pipe => pipe_rows(lines, patterns),
        TableLayout::FixedWidth => fixed_width_rows(lines, patterns),
    };
    let width = rows
        .iter()
        .map(|row| row.cells.len())
        .chain(header.iter().map(Vec::len))
        .max()
        .unwrap_or(0);
    if width == 0 {
        return Vec::new();
    }
    let column = action_column(header.as_deref(), &rows, width, vocabulary);

    let mut steps = Vec::new();
    for row in &rows {
        let filled: Vec<&str> = row
            .cells
            .iter()
            .map(|cell| cell.as_str())
            .filter(|cell| !cell.is_empty())
            .collect();
        if filled.is_empty() {
            continue;
        }
        let text = match row.cells.get(column).map(String::as_str) {
            Some(cell) if !cell.is_empty() => cell.to_string(),
            _ => filled.join(" - "),
        };
        steps.push(RawStep::new(text, row.source));
    }
    steps
}

fn pipe_rows<'a>(
    lines: &[&'a str],
    patterns: &LinePatterns,
) -> (Option<Vec<String>>, Vec<Row<'a>>) {
    let mut rows: Vec<Row<'a>> = Vec::new();
    let mut header = None;
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        if patterns.is_markdown_separator(line) {
            // The row right above a separator is the header.
            if header.is_none() && rows.len() == 1 {
                header = rows.pop().map(|row| row.cells);
            }
            continue;
        }
        rows.push(Row {
            source: line.trim_end(),
            cells: split_pipe_cells(line),
        });
    }
    (header, rows)
}

fn split_pipe_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn fixed_width_rows<'a>(
    lines: &[&'a str],
    patterns: &LinePatterns,
) -> (Option<Vec<String>>, Vec<Row<'a>>) {
    let Some(separator_idx) = lines
        .iter()
        .position(|line| patterns.is_fixed_width_separator(line))
    else {
        return (None, Vec::new());
    };
    let columns = dash_runs(lines[separator_idx]);
    let header = separator_idx
        .checked_sub(1)
        .map(|idx| slice_columns(lines[idx], &columns));
    let rows = lines[separator_idx + 1..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Row {
            source: line.trim_end(),
            cells: slice_columns(line, &columns),
        })
        .collect();
    (header, rows)
}

/// Character ranges covered by each run of `-`/`=` in a separator line.
fn dash_runs(separator: &str) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;
    let mut count = 0;
    for (idx, ch) in separator.chars().enumerate() {
        match (ch == '-' || ch == '=', start) {
            (true, None) => start = Some(idx),
            (false, Some(begin)) => {
                runs.push(begin..idx);
                start = None;
            }
            _ => {}
        }
        count = idx + 1;
    }
    if let Some(begin) = start {
        runs.push(begin..count);
    }
    runs
}

/// Cut a line into cells: each column runs from its dash run to the next one,
/// the last column to the end of the line.
fn slice_columns(line: &str, columns: &[Range<usize>]) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let end = columns
                .get(idx + 1)
                .map(|next| next.start)
                .unwrap_or(chars.len())
                .min(chars.len());
            let start = column.start.min(end);
            chars[start..end].iter().collect::<String>().trim().to_string()
        })
        .collect()
}

fn action_column(
    header: Option<&[String]>,
    rows: &[Row<'_>],
    width: usize,
    vocabulary: &CompiledVocabulary,
) -> usize {
    let last = width - 1;
    let Some(header) = header else {
        return last;
    };
    for synonym in &vocabulary.action_columns {
        let found = header.iter().enumerate().find(|(idx, name)| {
            header_matches(name, synonym) && !is_numeric_column(rows, *idx)
        });
        if let Some((idx, _)) = found {
            return idx;
        }
    }
    last
}

fn header_matches(name: &str, synonym: &str) -> bool {
    let name = name.to_lowercase();
    name == synonym
        || name
            .split(|ch: char| !ch.is_alphanumeric())
            .any(|word| word == synonym)
}

/// A row-number column: every filled data cell is a number like `3` or `4a.`.
fn is_numeric_column(rows: &[Row<'_>], column: usize) -> bool {
    let mut filled = rows
        .iter()
        .filter_map(|row| row.cells.get(column))
        .filter(|cell| !cell.is_empty())
        .peekable();
    filled.peek().is_some() && filled.all(|cell| is_row_number(cell))
}

fn is_row_number(cell: &str) -> bool {
    let body = cell.trim_end_matches(['.', ')']);
    let digits = body.trim_end_matches(|ch: char| ch.is_ascii_alphabetic());
    !digits.is_empty()
        && body.len() - digits.len() <= 1
        && digits.chars().all(|ch| ch.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Vocabulary;

    fn extract(text: &str, layout: TableLayout) -> Vec<RawStep> {
        let lines: Vec<&str> = text.lines().collect();
        let vocabulary =
            CompiledVocabulary::new(&Vocabulary::default()).expect("compile vocabulary");
        extract_table(&lines, layout, &LinePatterns::new(), &vocabulary)
    }

    fn texts(steps: &[RawStep]) -> Vec<&str> {
        steps.iter().map(|step| step.text.as_str()).collect()
    }

    #[test]
    fn picks_the_action_column_over_row_numbers() {
        let text = "| Step | Action | Owner |\n|------|--------|-------|\n| 1 | Connect drive | IT |\n| 2 | Boot from USB | IT |";
        let steps = extract(text, TableLayout::Pipe);
        assert_eq!(texts(&steps), vec!["Connect drive", "Boot from USB"]);
        assert_eq!(steps[0].raw_source, vec!["| 1 | Connect drive | IT |".to_string()]);
    }

    #[test]
    fn step_column_wins_when_it_holds_text() {
        let text = "| # | Step |\n|---|---|\n| 1 | Open the lid |";
        assert_eq!(texts(&extract(text, TableLayout::Pipe)), vec!["Open the lid"]);
    }

    #[test]
    fn falls_back_to_the_last_column_and_to_joined_cells() {
        let text = "| Who | What |\n|---|---|\n| Clerk | File the form |\n| Manager |  |\n|  |  |";
        let steps = extract(text, TableLayout::Pipe);
        assert_eq!(texts(&steps), vec!["File the form", "Manager"]);
    }

    #[test]
    fn headerless_pipe_rows_use_the_last_column() {
        let text = "| 1 | Plug in |\n| 2 | Power on |";
        assert_eq!(
            texts(&extract(text, TableLayout::Pipe)),
            vec!["Plug in", "Power on"]
        );
    }

    #[test]
    fn fixed_width_columns_follow_the_dash_runs() {
        let text = "No   Task                 Owner\n---  -------------------  -----\n1    Collect the invoices Ann\n2    Enter totals         Bob";
        let steps = extract(text, TableLayout::FixedWidth);
        assert_eq!(texts(&steps), vec!["Collect the invoices", "Enter totals"]);
    }

    #[test]
    fn row_numbers_accept_suffixes() {
        assert!(is_row_number("4a."));
        assert!(is_row_number("12"));
        assert!(!is_row_number("ab"));
        assert!(!is_row_number("Step 1"));
    }
}
