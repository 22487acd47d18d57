use super::model::{NumberedStep, Step};

const BRANCH_INDENT: &str = "   - ";
/// Extra indent per detail level below the first.
const DETAIL_INDENT: &str = "   ";

/// Canonical text: one numbered line per step, branch and detail lines
/// indented under it, no trailing newline.
pub(super) fn render(steps: &[NumberedStep]) -> String {
    let mut out = String::new();
    for step in steps {
        if !out.is_empty() {
            out.push('\n');
        }
        append_step(&mut out, step);
    }
    out
}

fn append_step(out: &mut String, numbered: &NumberedStep) {
    out.push_str(&format!("{}. {}", numbered.number, numbered.step.text()));
    match &numbered.step {
        Step::Decision {
            yes_branch,
            no_branch,
            ..
        } => {
            append_branch(out, "If yes:", yes_branch);
            append_branch(out, "If no:", no_branch);
        }
        Step::Action { details, .. } => {
            for detail in details {
                out.push('\n');
                out.push_str(&DETAIL_INDENT.repeat(detail.depth.saturating_sub(1)));
                out.push_str(BRANCH_INDENT);
                out.push_str(&detail.text);
            }
        }
        Step::Start | Step::End => {}
    }
}

fn append_branch(out: &mut String, label: &str, branch: &str) {
    out.push('\n');
    out.push_str(BRANCH_INDENT);
    out.push_str(label);
    if !branch.is_empty() {
        out.push(' ');
        out.push_str(branch);
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::Detail;
    use super::*;

    fn numbered(number: usize, step: Step) -> NumberedStep {
        NumberedStep {
            number,
            step,
            sources: Vec::new(),
        }
    }

    #[test]
    fn renders_decisions_and_details() {
        let steps = vec![
            numbered(1, Step::Start),
            numbered(
                2,
                Step::Decision {
                    question: "Check if ready?".to_string(),
                    yes_branch: "Go".to_string(),
                    no_branch: String::new(),
                },
            ),
            numbered(
                3,
                Step::Action {
                    text: "Prepare".to_string(),
                    details: vec![
                        Detail::new(1, "Gather tools"),
                        Detail::new(2, "Find the screwdriver"),
                    ],
                },
            ),
            numbered(4, Step::End),
        ];
        assert_eq!(
            render(&steps),
            "1. Start\n2. Check if ready?\n   - If yes: Go\n   - If no:\n3. Prepare\n   - Gather tools\n      - Find the screwdriver\n4. End"
        );
    }

    #[test]
    fn empty_sequence_renders_nothing() {
        assert_eq!(render(&[]), "");
    }
}
