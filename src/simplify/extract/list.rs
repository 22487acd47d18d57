use super::super::lines::{Line, LinePatterns, ListItem};
use super::super::model::RawStep;
use crate::config::SimplifierConfig;

#[derive(Default)]
struct ParseState {
    steps: Vec<RawStep>,
    /// Indents of the open item chain, outermost first.
    open: Vec<usize>,
    /// The previous line belonged to a list item, so a plain line continues it.
    continuation_open: bool,
}

impl ParseState {
    /// The deepest open item.
    fn current_mut(&mut self) -> Option<&mut RawStep> {
        let depth = self.open.len().checked_sub(1)?;
        let mut node = self.steps.last_mut()?;
        for _ in 0..depth {
            node = node.sub_steps.last_mut()?;
        }
        Some(node)
    }

    /// The list that holds the deepest open item.
    fn siblings_mut(&mut self) -> &mut Vec<RawStep> {
        let depth = self.open.len().saturating_sub(1);
        let mut level = &mut self.steps;
        for _ in 0..depth {
            let Some(last) = level.len().checked_sub(1) else {
                break;
            };
            level = &mut level[last].sub_steps;
        }
        level
    }

    fn finish(self) -> Vec<RawStep> {
        prune_empty(self.steps)
    }
}

/// Walk list-shaped lines: marker lines open items, deeper markers nest,
/// wrapped lines continue the item above them.
pub(super) fn extract_list(
    lines: &[&str],
    patterns: &LinePatterns,
    config: &SimplifierConfig,
) -> Vec<RawStep> {
    let mut state = ParseState::default();
    for raw in lines {
        let source = raw.trim_end();
        match patterns.classify(raw) {
            Line::Blank => handle_blank(&mut state),
            Line::Item(item) => handle_item(item, source, &mut state, config),
            Line::Plain { text, .. } => {
                if handle_continuation(text, source, &mut state, config) {
                    continue;
                }
                handle_standalone(text, source, &mut state);
            }
        }
    }
    state.finish()
}

fn handle_blank(state: &mut ParseState) {
    state.continuation_open = false;
}

fn handle_item(
    item: ListItem<'_>,
    source: &str,
    state: &mut ParseState,
    config: &SimplifierConfig,
) {
    let step = item_step(item, source);
    state.continuation_open = true;

    let nested = state.open.first().is_some_and(|top| item.indent > *top);
    if !nested {
        state.steps.push(step);
        state.open = vec![item.indent];
        return;
    }

    if !config.preserve_substeps {
        state.steps.push(step);
        state.open.truncate(1);
        return;
    }

    while state.open.len() > 1 && state.open.last().is_some_and(|last| *last >= item.indent) {
        state.open.pop();
    }
    if let Some(parent) = state.current_mut() {
        parent.sub_steps.push(step);
        state.open.push(item.indent);
    } else {
        state.steps.push(step);
        state.open = vec![item.indent];
    }
}

fn item_step(item: ListItem<'_>, source: &str) -> RawStep {
    if item.text.is_empty() {
        RawStep::unfilled()
    } else {
        RawStep::new(item.text, source)
    }
}

fn handle_continuation(
    text: &str,
    source: &str,
    state: &mut ParseState,
    config: &SimplifierConfig,
) -> bool {
    if !state.continuation_open {
        return false;
    }
    let merge = config.merge_multiline;
    let Some(current) = state.current_mut() else {
        return false;
    };
    if merge || current.text.is_empty() {
        current.push_continuation(text, source);
    } else {
        state.siblings_mut().push(RawStep::new(text, source));
    }
    true
}

fn handle_standalone(text: &str, source: &str, state: &mut ParseState) {
    state.steps.push(RawStep::new(text, source));
    state.open.clear();
    state.continuation_open = false;
}

/// Drop marker-only items that never received text, lifting their children.
fn prune_empty(steps: Vec<RawStep>) -> Vec<RawStep> {
    let mut kept = Vec::new();
    for mut step in steps {
        step.sub_steps = prune_empty(step.sub_steps);
        if step.text.is_empty() {
            kept.extend(step.sub_steps);
        } else {
            kept.push(step);
        }
    }
    kept
}
