//! Normalize messy workflow descriptions into numbered steps.
//!
//! Input may be a numbered or bulleted list, a table, free prose or a mix of
//! these. Output is a canonical numbered sequence bracketed by `Start` and
//! `End`, where conditional logic becomes explicit yes/no decision steps.
//!
//! ```
//! use workflow_simplifier::simplify;
//!
//! let text = "Check if user is authenticated. If authenticated, load dashboard.\n\
//!             Otherwise, redirect to login page.";
//! let out = simplify(text, None).unwrap();
//! assert!(out.starts_with("1. Start\n2. Check if user is authenticated?"));
//! ```
pub mod config;
pub mod simplify;
pub mod util;
pub mod vocabulary;

pub use config::{ConfigError, MissingBranch, SimplifierConfig};
pub use simplify::{
    simplify, simplify_to_structured, Analysis, InputFormat, RawStep, Simplifier, Step, StepKind,
    StructuredStep,
};
pub use vocabulary::{Vocabulary, VocabularyExtension};
