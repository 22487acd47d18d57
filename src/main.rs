use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::EnvFilter;
use workflow_simplifier::util::display_path;
use workflow_simplifier::{Analysis, Simplifier, SimplifierConfig, StepKind};

mod cli;
use cli::{AnalyzeArgs, Command, RootArgs, SimplifyArgs};

const PREVIEW_LINES: usize = 10;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    let verbose = match &args.command {
        Command::Simplify(args) => args.verbose,
        Command::Analyze(args) => args.verbose,
    };
    init_tracing(verbose)?;

    match args.command {
        Command::Simplify(args) => cmd_simplify(args),
        Command::Analyze(args) => cmd_analyze(args),
    }
}

/// Log to stderr; `RUST_LOG` wins over the `-v` default.
fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("failed to configure tracing level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

fn cmd_simplify(args: SimplifyArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.flatten_substeps {
        config.preserve_substeps = false;
    }
    if args.no_auto_terminators {
        config.auto_terminators = false;
    }
    if args.no_merge_multiline {
        config.merge_multiline = false;
    }
    let simplifier = Simplifier::new(config).context("invalid configuration")?;
    let text = read_input(&args.input)?;
    let rendered = simplifier.simplify(&text);

    if args.stdout {
        println!("{rendered}");
        return Ok(());
    }

    let out = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));
    fs::write(&out, format!("{rendered}\n"))
        .with_context(|| format!("write {}", out.display()))?;
    let cwd = std::env::current_dir().ok();
    println!("Wrote simplified workflow to {}", display_path(&out, cwd.as_deref()));

    if args.verbose {
        let total = rendered.lines().count();
        println!();
        for line in rendered.lines().take(PREVIEW_LINES) {
            println!("{line}");
        }
        if total > PREVIEW_LINES {
            println!("... ({} more lines)", total - PREVIEW_LINES);
        }
    }
    Ok(())
}

fn cmd_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let simplifier = Simplifier::new(config).context("invalid configuration")?;
    let text = read_input(&args.input)?;
    let analysis = simplifier.analyze(&text);

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&analysis).context("serialize analysis")?;
        println!("{rendered}");
        return Ok(());
    }
    print_analysis(&analysis);
    Ok(())
}

fn print_analysis(analysis: &Analysis) {
    println!("format: {}", analysis.format);
    println!("raw steps: {}", analysis.raw_steps);
    println!("steps: {}", analysis.steps.len());
    for kind in [
        StepKind::Start,
        StepKind::Step,
        StepKind::Decision,
        StepKind::End,
    ] {
        println!("  {}: {}", kind.as_str(), analysis.count(kind));
    }

    let decisions: Vec<_> = analysis.decisions().collect();
    if !decisions.is_empty() {
        println!("decision points:");
        for step in decisions {
            println!("  {}. {}", step.number, step.text);
            if let Some([yes, no]) = &step.branches {
                println!("     yes: {}", or_dash(yes));
                println!("     no: {}", or_dash(no));
            }
        }
    }

    println!("workflow:");
    for step in &analysis.steps {
        println!("  {}. {}", step.number, step.text);
    }
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

fn load_config(path: Option<&Path>) -> Result<SimplifierConfig> {
    match path {
        Some(path) => SimplifierConfig::load(path)
            .with_context(|| format!("load config {}", path.display())),
        None => Ok(SimplifierConfig::default()),
    }
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// `<stem>_clean.txt` in the input's directory.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workflow".to_string());
    input.with_file_name(format!("{stem}_clean.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_sits_next_to_the_input() {
        assert_eq!(
            default_output_path(Path::new("docs/process.txt")),
            PathBuf::from("docs/process_clean.txt")
        );
        assert_eq!(
            default_output_path(Path::new("notes")),
            PathBuf::from("notes_clean.txt")
        );
    }
}
