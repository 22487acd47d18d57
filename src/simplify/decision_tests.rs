use super::*;
use crate::config::MissingBranch;
use crate::vocabulary::Vocabulary;

fn rules() -> Rules {
    Rules::new(&Vocabulary::default()).expect("compile rules")
}

fn raw(text: &str) -> RawStep {
    RawStep::new(text, text)
}

fn with_subs(text: &str, subs: &[&str]) -> RawStep {
    let mut step = raw(text);
    step.sub_steps = subs.iter().map(|sub| raw(sub)).collect();
    step
}

fn detect_steps(steps: &[RawStep], config: &SimplifierConfig) -> Vec<Step> {
    let rules = rules();
    DecisionDetector::new(&rules, config)
        .detect_decisions(steps)
        .into_iter()
        .map(|detected| detected.step)
        .collect()
}

fn detect(texts: &[&str]) -> Vec<Step> {
    let steps: Vec<RawStep> = texts.iter().map(|text| raw(text)).collect();
    detect_steps(&steps, &SimplifierConfig::default())
}

fn decision(question: &str, yes: &str, no: &str) -> Step {
    Step::Decision {
        question: question.to_string(),
        yes_branch: yes.to_string(),
        no_branch: no.to_string(),
    }
}

#[test]
fn check_if_with_follow_up_outcomes() {
    let steps = detect(&[
        "Check if user is authenticated. If authenticated, load dashboard. Otherwise, redirect to login page.",
    ]);
    assert_eq!(
        steps,
        vec![decision(
            "Check if user is authenticated?",
            "load dashboard",
            "redirect to login page"
        )]
    );
}

#[test]
fn leading_if_with_semicolon_outcome() {
    let steps = detect(&["If successful, continue; if not, show error"]);
    assert_eq!(
        steps,
        vec![decision("Check if successful?", "continue", "show error")]
    );
}

#[test]
fn compound_marker_splits_off_preceding_action_and_inline_yes() {
    let steps = detect(&["Open the lid and check if it is clean, then close it"]);
    assert_eq!(
        steps,
        vec![
            Step::action("Open the lid"),
            decision("Check if it is clean?", "close it", ""),
        ]
    );
}

#[test]
fn indicator_before_marker_is_not_an_action() {
    let steps = detect(&["Next, check if the cache is warm"]);
    assert_eq!(steps, vec![decision("Check if the cache is warm?", "", "")]);
}

#[test]
fn trailing_if_makes_the_prefix_the_yes_branch() {
    let steps = detect(&["Retry the upload if the network drops"]);
    assert_eq!(
        steps,
        vec![decision(
            "Check if the network drops?",
            "Retry the upload",
            ""
        )]
    );
}

#[test]
fn question_with_rendered_branch_lines() {
    let step = with_subs("Is the printer online?", &["If yes: Print the page", "If no:"]);
    let steps = detect_steps(&[step], &SimplifierConfig::default());
    assert_eq!(
        steps,
        vec![decision("Is the printer online?", "Print the page", "")]
    );
}

#[test]
fn following_outcome_steps_are_consumed() {
    let steps = detect(&[
        "Receive customer inquiry",
        "Determine if inquiry is valid",
        "If valid, assign to specialist",
        "If invalid, send rejection email",
        "Close the ticket",
    ]);
    assert_eq!(
        steps,
        vec![
            Step::action("Receive customer inquiry"),
            decision(
                "Check if inquiry is valid?",
                "assign to specialist",
                "send rejection email"
            ),
            Step::action("Close the ticket"),
        ]
    );
}

#[test]
fn consumed_steps_donate_their_sources() {
    let rules = rules();
    let config = SimplifierConfig::default();
    let steps = [raw("Check if data is valid"), raw("Otherwise, show error")];
    let detected = DecisionDetector::new(&rules, &config).detect_decisions(&steps);
    assert_eq!(detected.len(), 1);
    assert_eq!(
        detected[0].sources,
        vec![
            "Check if data is valid".to_string(),
            "Otherwise, show error".to_string()
        ]
    );
}

#[test]
fn unrelated_conditions_start_their_own_decision() {
    let steps = detect(&["Check if the door is open", "If it is raining, take an umbrella"]);
    assert_eq!(
        steps,
        vec![
            decision("Check if the door is open?", "", ""),
            decision("Check if it is raining?", "take an umbrella", ""),
        ]
    );
}

#[test]
fn without_merging_following_steps_stay_separate() {
    let config = SimplifierConfig {
        merge_multiline: false,
        ..SimplifierConfig::default()
    };
    let steps = detect_steps(
        &[raw("Check if data is valid"), raw("Otherwise, show error")],
        &config,
    );
    assert_eq!(
        steps,
        vec![
            decision("Check if data is valid?", "", ""),
            Step::action("Otherwise, show error"),
        ]
    );
}

#[test]
fn other_clauses_follow_the_decision() {
    let steps = detect(&[
        "Check if the drive is detected. The installer waits. If not detected, restart",
    ]);
    assert_eq!(
        steps,
        vec![
            decision("Check if the drive is detected?", "", "restart"),
            Step::action("The installer waits."),
        ]
    );
}

#[test]
fn missing_branches_use_the_placeholder_policy() {
    let config = SimplifierConfig {
        missing_branch: MissingBranch::Placeholder,
        ..SimplifierConfig::default()
    };
    let steps = detect_steps(&[raw("Check if the tank is full")], &config);
    assert_eq!(
        steps,
        vec![decision("Check if the tank is full?", "Continue", "Continue")]
    );
}

#[test]
fn plain_steps_keep_their_sub_steps_as_details() {
    let mut step = with_subs("Prepare", &["Gather tools"]);
    step.sub_steps[0].sub_steps.push(raw("Find the screwdriver"));
    let steps = detect_steps(&[step], &SimplifierConfig::default());
    assert_eq!(
        steps,
        vec![Step::Action {
            text: "Prepare".to_string(),
            details: vec![
                Detail::new(1, "Gather tools"),
                Detail::new(2, "Find the screwdriver"),
            ],
        }]
    );
}

#[test]
fn sub_steps_that_are_not_outcomes_are_detected_on_their_own() {
    let step = with_subs(
        "Check if the form is complete",
        &["If yes: Submit it", "Retry if it times out"],
    );
    let steps = detect_steps(&[step], &SimplifierConfig::default());
    assert_eq!(
        steps,
        vec![
            decision("Check if the form is complete?", "Submit it", ""),
            decision("Check if it times out?", "Retry", ""),
        ]
    );
}

#[test]
fn outcome_phrases_after_a_comma_start_a_clause() {
    let rules = rules();
    let config = SimplifierConfig::default();
    let detector = DecisionDetector::new(&rules, &config);
    let clauses: Vec<&str> = detector
        .split_clauses("Load the data, otherwise abort. Done!")
        .into_iter()
        .map(|clause| clause.text)
        .collect();
    assert_eq!(clauses, vec!["Load the data", "otherwise abort", "Done"]);
}

#[test]
fn outcome_clauses_never_head_a_decision() {
    let steps = detect(&["Otherwise, call the help desk"]);
    assert_eq!(steps, vec![Step::action("Otherwise, call the help desk")]);
}
