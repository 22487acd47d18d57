//! Input format classification.
//!
//! Structural shapes are checked before prose so a document that is mostly a
//! list is never treated as narrative text.
use super::lines::{Line, LinePatterns, MarkerKind};
use super::model::InputFormat;

/// Share of top-level lines a pattern needs to count as significant in a mix.
const SIGNIFICANT_SHARE: f64 = 0.25;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct LineCounts {
    pub(super) top_level: usize,
    pub(super) numbered: usize,
    pub(super) step_prefix: usize,
    pub(super) bullet: usize,
}

impl LineCounts {
    fn structural(&self) -> usize {
        self.numbered + self.step_prefix + self.bullet
    }
}

pub(super) fn detect_format(text: &str, patterns: &LinePatterns) -> InputFormat {
    if has_table(text, patterns) {
        return InputFormat::Table;
    }
    let counts = count_top_level(text, patterns);
    if counts.top_level == 0 {
        return InputFormat::Narrative;
    }
    let majority = |count: usize| count * 2 > counts.top_level;
    if majority(counts.numbered) {
        return InputFormat::Numbered;
    }
    if majority(counts.step_prefix) {
        return InputFormat::StepPrefix;
    }
    if majority(counts.bullet) {
        return InputFormat::Bullet;
    }

    let significant = |count: usize| {
        count > 0 && count as f64 >= counts.top_level as f64 * SIGNIFICANT_SHARE
    };
    let significant_kinds = [counts.numbered, counts.step_prefix, counts.bullet]
        .into_iter()
        .filter(|count| significant(*count))
        .count();
    if significant_kinds >= 2 || significant(counts.structural()) {
        return InputFormat::Mixed;
    }
    InputFormat::Narrative
}

fn has_table(text: &str, patterns: &LinePatterns) -> bool {
    let mut previous: Option<&str> = None;
    for line in text.lines() {
        if patterns.is_pipe_row(line) {
            return true;
        }
        if patterns.is_fixed_width_separator(line)
            && previous.is_some_and(|header| !header.trim().is_empty())
        {
            return true;
        }
        previous = Some(line);
    }
    false
}

/// Count non-blank lines that are not nested under a preceding list item.
///
/// A line indented deeper than the last top-level marker line is a
/// continuation or sub-item and does not vote.
pub(super) fn count_top_level(text: &str, patterns: &LinePatterns) -> LineCounts {
    let mut counts = LineCounts::default();
    let mut marker_indent: Option<usize> = None;
    for raw in text.lines() {
        let (indent, kind) = match patterns.classify(raw) {
            Line::Blank => continue,
            Line::Item(item) => (item.indent, Some(item.kind)),
            Line::Plain { indent, .. } => (indent, None),
        };
        if marker_indent.is_some_and(|parent| indent > parent) {
            continue;
        }
        counts.top_level += 1;
        let Some(kind) = kind else {
            continue;
        };
        marker_indent = Some(indent);
        match kind {
            MarkerKind::Numbered => counts.numbered += 1,
            MarkerKind::StepPrefix => counts.step_prefix += 1,
            MarkerKind::Bullet => counts.bullet += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> InputFormat {
        detect_format(text, &LinePatterns::new())
    }

    #[test]
    fn empty_input_is_narrative() {
        assert_eq!(detect(""), InputFormat::Narrative);
        assert_eq!(detect("  \n\t\n"), InputFormat::Narrative);
    }

    #[test]
    fn majority_rule_for_numbered_lists() {
        assert_eq!(
            detect("1. Open the app\n2. Log in\nThen wait a bit"),
            InputFormat::Numbered
        );
        let one_of_three = detect("1. Open the app\nLog in\nThen wait a bit");
        assert_ne!(one_of_three, InputFormat::Numbered);
        assert!(matches!(
            one_of_three,
            InputFormat::Narrative | InputFormat::Mixed
        ));
    }

    #[test]
    fn detects_step_prefix_and_bullets() {
        let steps = "Step 1: Connect USB drive\nStep 2: Boot from USB\nStep 3: Select option";
        assert_eq!(detect(steps), InputFormat::StepPrefix);
        let bullets = "- First action\n- Second action\n  - nested detail\n- Third action";
        assert_eq!(detect(bullets), InputFormat::Bullet);
    }

    #[test]
    fn lettered_roman_and_colon_lists_are_numbered() {
        assert_eq!(
            detect("a. Open the app\nb. Log in\nc. Check if the page loads"),
            InputFormat::Numbered
        );
        assert_eq!(
            detect("i. Open the app\nii. Log in\niii. Save"),
            InputFormat::Numbered
        );
        assert_eq!(
            detect("1: Open the app\n2: Log in\n3: Save"),
            InputFormat::Numbered
        );
    }

    #[test]
    fn tables_pre_empt_lists() {
        let table = "1. Intro\n| Step | Action |\n|------|--------|\n| 1 | Connect drive |";
        assert_eq!(detect(table), InputFormat::Table);
        let fixed = "Step   Action\n----   ------\n1      Boot";
        assert_eq!(detect(fixed), InputFormat::Table);
    }

    #[test]
    fn nested_branch_lines_do_not_vote() {
        let rendered = "1. Start\n2. Check if ready?\n   - If yes: Go\n   - If no: Wait\n3. Is it late?\n   - If yes: Sleep\n   - If no:\n4. End";
        assert_eq!(detect(rendered), InputFormat::Numbered);
    }

    #[test]
    fn mixed_when_several_shapes_share_the_document() {
        let text = "1. Open the panel\n2. Pick a port\n- Check cables\n- Restart router\nThen call support.";
        assert_eq!(detect(text), InputFormat::Mixed);
    }

    #[test]
    fn prose_is_narrative() {
        let text = "First, open the application. Then, load the configuration files.\nNext, verify the user is authenticated.";
        assert_eq!(detect(text), InputFormat::Narrative);
    }
}
