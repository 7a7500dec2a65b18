//! # amalgamate
//!
//! Concatenates the Arbiter C++ library into one header and one source file,
//! so downstream projects can vendor two files instead of the whole tree.
//!
//! ## Features
//!
//! - Curated, ordered inclusion plans for the header and the source
//! - Begin/end markers naming each included file
//! - License text embedded as a block comment
//! - Optional bundled JSON and XML libraries, curl transport and a custom
//!   outer namespace, all selected through [`FeatureFlags`]
//! - Both artifacts are built in memory; nothing is written unless every
//!   input was read
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```no_run
//! use amalgamate::{AmalgamationConfig, GitRevision, Plans, amalgamate};
//!
//! let config = AmalgamationConfig::default();
//! let revision = GitRevision::new(&config.top_dir);
//!
//! match amalgamate(&config, &Plans::arbiter(), &revision) {
//!     Ok(report) => println!("wrote {}", report.source_path.display()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! ### As a CLI Tool
//!
//! ```bash
//! # Default layout: dist/arbiter.cpp and dist/arbiter.hpp
//! arbiter-amalgamate
//!
//! # Use an external JSON library and enable curl
//! arbiter-amalgamate --no-json --curl -s out/arbiter.cpp
//! ```

pub mod accumulator;
pub mod driver;
pub mod error;
pub mod fs_utils;
pub mod plan;
pub mod revision;

pub const PROJECT_NAME: &str = "Arbiter";
pub const PROJECT_URL: &str = "https://github.com/connormanning/arbiter";

// Re-export main types and functions for convenience
pub use accumulator::Accumulator;
pub use driver::{AmalgamationConfig, AmalgamationReport, Artifact, amalgamate, assemble, check};
pub use error::{AmalgamateError, Result};
pub use plan::{FeatureFlags, Gate, InclusionPlan, PlanEntry, Plans};
pub use revision::{FixedRevision, GitRevision, RevisionError, RevisionSource};
