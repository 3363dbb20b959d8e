//! # Worksheet Data Structures
//!
//! A `Worksheet` is an ordered batch of generated equations, ready to be
//! typeset. Worksheets serialize to `.tws` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Worksheet
//! ├── meta: WorksheetMetadata (version, title, timestamps)
//! ├── settings: WorksheetSettings (generator config, layout)
//! ├── problems: Vec<EquationInstance> (in request order)
//! └── failures: Vec<GenerationFailure> (requests that produced nothing)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use trig_core::config::GeneratorConfig;
//! use trig_core::worksheet::Worksheet;
//!
//! let mut sheet = Worksheet::with_config("Homework 3", GeneratorConfig::seeded(11));
//! sheet.add_equations("2", 3).unwrap();
//! sheet.add_equations("tan_cot_sum", 1).unwrap();
//! assert_eq!(sheet.len(), 4);
//!
//! // Unknown keys add nothing
//! assert!(sheet.add_equations("99", 5).is_err());
//! assert_eq!(sheet.len(), 4);
//! ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::equations::Category;
use crate::errors::{TrigError, TrigResult};
use crate::instance::EquationInstance;

/// Current schema version for .tws files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Worksheet file extension
pub const FILE_EXTENSION: &str = "tws";

/// Root worksheet container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub meta: WorksheetMetadata,

    pub settings: WorksheetSettings,

    /// Generated equations in the order they were requested
    pub problems: Vec<EquationInstance>,

    /// Requests that failed after exhausting their attempts
    #[serde(default)]
    pub failures: Vec<GenerationFailure>,
}

impl Worksheet {
    /// Create an empty worksheet with default settings (fresh entropy).
    pub fn new(title: impl Into<String>) -> Self {
        Worksheet::with_config(title, GeneratorConfig::default())
    }

    /// Create an empty worksheet that generates with `config`.
    ///
    /// With a seeded config the whole worksheet is reproducible: the n-th
    /// requested instance always draws from the same random stream.
    pub fn with_config(title: impl Into<String>, config: GeneratorConfig) -> Self {
        let now = Utc::now();
        Worksheet {
            meta: WorksheetMetadata {
                version: SCHEMA_VERSION.to_string(),
                title: title.into(),
                created: now,
                modified: now,
            },
            settings: WorksheetSettings {
                generator: config,
                ..WorksheetSettings::default()
            },
            problems: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Generate `count` equations of the category `key` (a number `"1"`..`"14"`
    /// or a slug).
    ///
    /// An unknown key is logged and reported as `UnknownCategory` without
    /// adding anything. A single instance that cannot be generated is logged
    /// and recorded in `failures`; the remaining instances are still
    /// generated. Returns the number of equations added.
    pub fn add_equations(&mut self, key: &str, count: usize) -> TrigResult<usize> {
        let category = Category::from_key(key).inspect_err(|_| {
            warn!(key, "equation category not found in registry");
        })?;
        Ok(self.add_category(category, count))
    }

    /// Add several `(key, count)` requests in order.
    ///
    /// All keys are resolved first, so a typo leaves the worksheet untouched.
    pub fn add_plan(&mut self, plan: &[PlanEntry]) -> TrigResult<usize> {
        let mut resolved = Vec::with_capacity(plan.len());
        for entry in plan {
            let category = Category::from_key(&entry.key).inspect_err(|_| {
                warn!(key = entry.key.as_str(), "equation category not found in registry");
            })?;
            resolved.push((category, entry.count));
        }
        Ok(resolved
            .into_iter()
            .map(|(category, count)| self.add_category(category, count))
            .sum())
    }

    fn add_category(&mut self, category: Category, count: usize) -> usize {
        let config = self.settings.generator;
        let mut added = 0;
        for _ in 0..count {
            let index = self.draws();
            let mut rng = config.rng_for(index);
            match category.generate(&mut rng, &config) {
                Ok(instance) => {
                    self.problems.push(instance);
                    added += 1;
                }
                Err(error) => {
                    warn!(category = category.key(), index, %error, "equation generation failed");
                    self.failures.push(GenerationFailure {
                        category,
                        index,
                        error,
                    });
                }
            }
        }
        info!(category = category.key(), requested = count, added, "equations added");
        self.touch();
        added
    }

    /// Instances requested so far, successful or not; the next stream index
    fn draws(&self) -> u64 {
        (self.problems.len() + self.failures.len()) as u64
    }

    /// Remove every problem and failure.
    pub fn clear(&mut self) {
        self.problems.clear();
        self.failures.clear();
        self.touch();
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

impl Default for Worksheet {
    fn default() -> Self {
        Worksheet::new("Trigonometric Equations")
    }
}

/// Worksheet metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorksheetMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Title printed at the top of the document
    pub title: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Generation and layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorksheetSettings {
    /// Seed and attempt bound used for every request
    pub generator: GeneratorConfig,

    /// Print the narrated derivation under each problem
    #[serde(default = "default_true")]
    pub show_steps: bool,

    /// Start every problem on a new page
    #[serde(default = "default_true")]
    pub page_breaks: bool,

    /// Print only equations and answers, as a compact key
    #[serde(default)]
    pub answer_key_only: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WorksheetSettings {
    fn default() -> Self {
        WorksheetSettings {
            generator: GeneratorConfig::default(),
            show_steps: true,
            page_breaks: true,
            answer_key_only: false,
        }
    }
}

/// A request that produced no equation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationFailure {
    pub category: Category,
    /// Stream index the instance would have used
    pub index: u64,
    pub error: TrigError,
}

// =============================================================================
// Plans
// =============================================================================

/// One `KEY[:COUNT]` request, e.g. `"6:3"` or `"symmetric"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub key: String,
    pub count: usize,
}

impl PlanEntry {
    pub fn new(key: impl Into<String>, count: usize) -> Self {
        PlanEntry { key: key.into(), count }
    }
}

impl FromStr for PlanEntry {
    type Err = TrigError;

    /// Parse `KEY` (count 1) or `KEY:COUNT`. The key itself is checked
    /// later, when the plan is added.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, count) = match s.split_once(':') {
            Some((key, count)) => {
                let count = count
                    .trim()
                    .parse::<usize>()
                    .map_err(|e| TrigError::invalid_input("count", count, e.to_string()))?;
                (key, count)
            }
            None => (s, 1),
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(TrigError::invalid_input("key", s, "Category key is empty"));
        }
        Ok(PlanEntry::new(key, count))
    }
}
