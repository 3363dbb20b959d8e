//! # trig_core - Trigonometric Equation Engine
//!
//! `trig_core` generates trigonometric equations of fourteen textbook
//! categories, solves them exactly and narrates the derivation step by step.
//! Everything it produces is JSON-serializable and typesets with Typst.
//!
//! ## Design Philosophy
//!
//! - **Exact**: solutions are computed over Q(√2, √3) and rational multiples
//!   of π, never by floating point root finding
//! - **Self-checking**: every solution family is substituted back into its
//!   equation before an instance is accepted
//! - **Reproducible**: a seed pins down a whole worksheet
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use trig_core::config::GeneratorConfig;
//! use trig_core::worksheet::Worksheet;
//!
//! let mut sheet = Worksheet::with_config("Warm-up", GeneratorConfig::seeded(1));
//! sheet.add_equations("1", 2).unwrap();
//!
//! let first = &sheet.problems[0];
//! println!("{}", first.equation_markup());
//! println!("{}", first.solution_markup());
//!
//! // Serialize to JSON for storage or transmission
//! let json = serde_json::to_string_pretty(&sheet).unwrap();
//! assert!(json.contains("\"problems\""));
//! ```
//!
//! ## Modules
//!
//! - [`algebra`] - exact numbers, angles, expressions and solution sets
//! - [`equations`] - the fourteen category generators and their registry
//! - [`instance`] - the generate → solve → narrate lifecycle
//! - [`worksheet`] - batches of instances
//! - [`pdf`] - Typst rendering
//! - [`file_io`] - atomic saves and versioned loads
//! - [`config`] - seeds and retry bounds
//! - [`errors`] - structured error types

pub mod algebra;
pub mod config;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod instance;
pub mod pdf;
pub mod worksheet;

// Re-export commonly used types at crate root for convenience
pub use config::GeneratorConfig;
pub use equations::{Category, ALL_CATEGORIES};
pub use errors::{TrigError, TrigResult};
pub use file_io::{load_worksheet, save_worksheet};
pub use instance::{EquationInstance, Step, StepKind};
pub use worksheet::{PlanEntry, Worksheet};
