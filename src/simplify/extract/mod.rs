//! Step extraction.
//!
//! List-shaped documents go through one list walker, prose through the
//! sentence splitter. Tables and mixed documents are first cut into spans so
//! each region runs the strategy that fits it.
mod list;
mod narrative;
mod table;

use self::list::extract_list;
use self::narrative::extract_narrative;
use self::table::{extract_table, TableLayout};
use super::lines::{Line, LinePatterns};
use super::model::{InputFormat, RawStep};
use super::Rules;
use crate::config::SimplifierConfig;

/// Region of a document handled by a single strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Table(TableLayout),
    List,
    Narrative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Span<'a> {
    kind: SpanKind,
    lines: Vec<&'a str>,
}

/// Ordered raw steps for `lines`, indexed in document order.
pub(super) fn extract(
    lines: &[&str],
    format: InputFormat,
    rules: &Rules,
    config: &SimplifierConfig,
) -> Vec<RawStep> {
    let mut steps = match format {
        InputFormat::Numbered | InputFormat::StepPrefix | InputFormat::Bullet => {
            extract_list(lines, &rules.lines, config)
        }
        InputFormat::Narrative => extract_narrative(lines, &rules.vocabulary, config),
        InputFormat::Table | InputFormat::Mixed => {
            let mut steps = Vec::new();
            for span in segment(lines, &rules.lines) {
                let kind = match span.kind {
                    // Prose around a table goes through the list walker.
                    SpanKind::Narrative if format == InputFormat::Table => SpanKind::List,
                    kind => kind,
                };
                steps.extend(extract_span(&span.lines, kind, rules, config));
            }
            steps
        }
    };
    reindex(&mut steps, &mut 0);
    steps
}

fn extract_span(
    lines: &[&str],
    kind: SpanKind,
    rules: &Rules,
    config: &SimplifierConfig,
) -> Vec<RawStep> {
    match kind {
        SpanKind::Table(layout) => extract_table(lines, layout, &rules.lines, &rules.vocabulary),
        SpanKind::List => extract_list(lines, &rules.lines, config),
        SpanKind::Narrative => extract_narrative(lines, &rules.vocabulary, config),
    }
}

/// Number steps in document order, parents before their sub-steps.
fn reindex(steps: &mut [RawStep], next: &mut usize) {
    for step in steps {
        step.index = *next;
        *next += 1;
        reindex(&mut step.sub_steps, next);
    }
}

fn starts_fixed_width_table(lines: &[&str], idx: usize, patterns: &LinePatterns) -> bool {
    !lines[idx].trim().is_empty()
        && lines
            .get(idx + 1)
            .is_some_and(|next| patterns.is_fixed_width_separator(next))
}

fn table_at(lines: &[&str], idx: usize, patterns: &LinePatterns) -> Option<TableLayout> {
    if patterns.is_pipe_row(lines[idx]) {
        Some(TableLayout::Pipe)
    } else if starts_fixed_width_table(lines, idx, patterns) {
        Some(TableLayout::FixedWidth)
    } else {
        None
    }
}

/// Cut lines into table, list and prose spans, in document order.
fn segment<'a>(lines: &[&'a str], patterns: &LinePatterns) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        if lines[idx].trim().is_empty() {
            idx += 1;
            continue;
        }
        let (kind, end) = if let Some(layout) = table_at(lines, idx, patterns) {
            (SpanKind::Table(layout), table_end(lines, idx, layout, patterns))
        } else if matches!(patterns.classify(lines[idx]), Line::Item(_)) {
            (SpanKind::List, list_end(lines, idx, patterns))
        } else {
            (SpanKind::Narrative, prose_end(lines, idx, patterns))
        };
        spans.push(Span {
            kind,
            lines: lines[idx..end].to_vec(),
        });
        idx = end;
    }
    spans
}

fn table_end(
    lines: &[&str],
    start: usize,
    layout: TableLayout,
    patterns: &LinePatterns,
) -> usize {
    match layout {
        TableLayout::Pipe => {
            let mut end = start;
            while end < lines.len()
                && (patterns.is_pipe_row(lines[end]) || patterns.is_markdown_separator(lines[end]))
            {
                end += 1;
            }
            end
        }
        TableLayout::FixedWidth => {
            // Header and separator, then rows up to the next blank line.
            let mut end = start + 2;
            while end < lines.len() && !lines[end].trim().is_empty() {
                end += 1;
            }
            end.min(lines.len())
        }
    }
}

/// A list span holds marker lines, their wrapped and nested lines, and blank
/// lines between items.
fn list_end(lines: &[&str], start: usize, patterns: &LinePatterns) -> usize {
    let base_indent = match patterns.classify(lines[start]) {
        Line::Item(item) => item.indent,
        _ => 0,
    };
    let mut end = start + 1;
    let mut after_item = true;
    while end < lines.len() {
        if table_at(lines, end, patterns).is_some() {
            break;
        }
        match patterns.classify(lines[end]) {
            Line::Item(_) => after_item = true,
            Line::Plain { indent, .. } => {
                if !after_item && indent <= base_indent {
                    break;
                }
            }
            Line::Blank => {
                let next = lines[end..]
                    .iter()
                    .position(|line| !line.trim().is_empty())
                    .map(|offset| end + offset);
                let continues = next.is_some_and(|next| {
                    table_at(lines, next, patterns).is_none()
                        && matches!(patterns.classify(lines[next]), Line::Item(_))
                });
                if !continues {
                    break;
                }
                after_item = false;
            }
        }
        end += 1;
    }
    end
}

/// Prose runs until a list item or a table begins.
fn prose_end(lines: &[&str], start: usize, patterns: &LinePatterns) -> usize {
    let mut end = start + 1;
    while end < lines.len() {
        if table_at(lines, end, patterns).is_some()
            || matches!(patterns.classify(lines[end]), Line::Item(_))
        {
            break;
        }
        end += 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(SpanKind, usize)> {
        let lines: Vec<&str> = text.lines().collect();
        segment(&lines, &LinePatterns::new())
            .into_iter()
            .map(|span| (span.kind, span.lines.len()))
            .collect()
    }

    #[test]
    fn segments_prose_lists_and_tables() {
        let text = "Read the intro first.\n\n1. Open the panel\n   with the key\n2. Pick a port\n\n| Step | Action |\n|---|---|\n| 1 | Test |\nThat is all.";
        assert_eq!(
            kinds(text),
            vec![
                (SpanKind::Narrative, 2),
                (SpanKind::List, 3),
                (SpanKind::Table(TableLayout::Pipe), 3),
                (SpanKind::Narrative, 1),
            ]
        );
    }

    #[test]
    fn list_spans_bridge_blank_lines_between_items() {
        let text = "- One\n\n- Two\n\nProse after.";
        assert_eq!(
            kinds(text),
            vec![(SpanKind::List, 3), (SpanKind::Narrative, 1)]
        );
    }

    #[test]
    fn fixed_width_tables_end_at_a_blank_line() {
        let text = "Step  Action\n----  ------\n1     Boot\n\nDone.";
        assert_eq!(
            kinds(text),
            vec![
                (SpanKind::Table(TableLayout::FixedWidth), 3),
                (SpanKind::Narrative, 1),
            ]
        );
    }

    #[test]
    fn reindex_walks_parents_before_children() {
        let mut parent = RawStep::new("Prepare", "- Prepare");
        parent.sub_steps.push(RawStep::new("Gather", "  - Gather"));
        let mut steps = vec![parent, RawStep::new("Assemble", "- Assemble")];
        reindex(&mut steps, &mut 0);
        assert_eq!(steps[0].index, 0);
        assert_eq!(steps[0].sub_steps[0].index, 1);
        assert_eq!(steps[1].index, 2);
    }
}
