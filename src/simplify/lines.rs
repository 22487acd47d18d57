use crate::util::indent_width;
use regex::Regex;

/// List marker families recognized at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MarkerKind {
    Numbered,
    StepPrefix,
    Bullet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ListItem<'a> {
    pub(super) kind: MarkerKind,
    pub(super) indent: usize,
    /// Text after the marker; empty for a marker-only line.
    pub(super) text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Line<'a> {
    Blank,
    Item(ListItem<'a>),
    Plain { indent: usize, text: &'a str },
}

/// Fixed line-shape patterns, compiled once per simplifier.
pub(super) struct LinePatterns {
    numbered: Regex,
    lettered: Regex,
    roman: Regex,
    step_prefix: Regex,
    bullet: Regex,
    markdown_separator: Regex,
    fixed_width_separator: Regex,
}

impl LinePatterns {
    pub(super) fn new() -> Self {
        LinePatterns {
            numbered: Regex::new(r"^\s*\d{1,4}[a-zA-Z]?[.):](?:\s+(.*?))?\s*$")
                .expect("regex for numbered items"),
            lettered: Regex::new(r"^\s*[a-z][.):](?:\s+(.*?))?\s*$")
                .expect("regex for lettered items"),
            roman: Regex::new(r"^\s*(?:ii|iii|iv|vi{1,3}|ix)[.):](?:\s+(.*?))?\s*$")
                .expect("regex for roman numeral items"),
            step_prefix: Regex::new(
                r"(?i)^\s*step\s+\d{1,4}[a-z]?(?:\s*[:.)\-]+|\s|$)\s*(.*?)\s*$",
            )
            .expect("regex for step prefixes"),
            bullet: Regex::new(r"^\s*[-*•](?:\s+(.*?))?\s*$").expect("regex for bullets"),
            markdown_separator: Regex::new(
                r"^\s*\|?\s*:?-{2,}:?\s*(?:\|\s*:?-{2,}:?\s*)+\|?\s*$",
            )
            .expect("regex for markdown table separators"),
            fixed_width_separator: Regex::new(r"^\s*[-=]{3,}(?:[ \t]+[-=]{3,})+\s*$")
                .expect("regex for fixed-width table separators"),
        }
    }

    pub(super) fn classify<'a>(&self, line: &'a str) -> Line<'a> {
        if line.trim().is_empty() {
            return Line::Blank;
        }
        let indent = indent_width(line);
        // Lettered and roman items vote with numbered ones.
        let matchers = [
            (MarkerKind::StepPrefix, &self.step_prefix),
            (MarkerKind::Numbered, &self.numbered),
            (MarkerKind::Numbered, &self.roman),
            (MarkerKind::Numbered, &self.lettered),
            (MarkerKind::Bullet, &self.bullet),
        ];
        for (kind, regex) in matchers {
            if let Some(caps) = regex.captures(line) {
                let text = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                return Line::Item(ListItem { kind, indent, text });
            }
        }
        Line::Plain {
            indent,
            text: line.trim(),
        }
    }

    /// `| a | b |` style row with at least two cells.
    pub(super) fn is_pipe_row(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.len() > 1
            && trimmed.starts_with('|')
            && trimmed.ends_with('|')
            && trimmed.matches('|').count() >= 3
    }

    pub(super) fn is_markdown_separator(&self, line: &str) -> bool {
        self.markdown_separator.is_match(line)
    }

    pub(super) fn is_fixed_width_separator(&self, line: &str) -> bool {
        self.fixed_width_separator.is_match(line)
    }
}
