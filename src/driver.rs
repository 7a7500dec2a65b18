use crate::accumulator::Accumulator;
use crate::error::{AmalgamateError, Result};
use crate::plan::{AMALGAMATION_MACRO, FeatureFlags, InclusionPlan, Plans};
use crate::revision::RevisionSource;
use crate::{PROJECT_NAME, PROJECT_URL};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration for an amalgamation run
#[derive(Debug, Clone)]
pub struct AmalgamationConfig {
    /// Directory relative input paths are resolved against
    pub top_dir: PathBuf,
    /// Output path of the amalgamated source
    pub target_source_path: PathBuf,
    /// Path used in the generated `#include`, relative to the source's directory
    pub header_include_path: String,
    /// License file, relative to `top_dir`
    pub license_path: String,
    pub flags: FeatureFlags,
}

impl Default for AmalgamationConfig {
    fn default() -> Self {
        Self {
            top_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            target_source_path: PathBuf::from("dist/arbiter.cpp"),
            header_include_path: "arbiter.hpp".to_string(),
            license_path: "LICENSE".to_string(),
            flags: FeatureFlags::default(),
        }
    }
}

impl AmalgamationConfig {
    /// Output path of the amalgamated header: `header_include_path` next to
    /// the source.
    pub fn header_path(&self) -> PathBuf {
        self.target_source_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.header_include_path)
    }
}

/// The two output artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Header,
    Source,
}

impl Artifact {
    fn label(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Source => "source",
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmalgamationReport {
    pub header_path: PathBuf,
    pub source_path: PathBuf,
    pub header_files: usize,
    pub source_files: usize,
}

/// Builds both artifacts in memory and, once both are complete, writes them.
///
/// An unavailable revision is logged and replaced by an empty string.
///
/// # Errors
///
/// - `AmalgamateError::MissingInputFile` / `ReadFailure` if any planned file
///   can't be read. Nothing is written in that case.
/// - `AmalgamateError::OutputCollision` if the header and source resolve to
///   the same path.
/// - `AmalgamateError::OutputWriteFailure` if an output can't be written.
pub fn amalgamate(
    config: &AmalgamationConfig,
    plans: &Plans,
    revision_source: &dyn RevisionSource,
) -> Result<AmalgamationReport> {
    let header_path = config.header_path();
    if header_path == config.target_source_path {
        return Err(AmalgamateError::OutputCollision { path: header_path });
    }

    let revision = revision_source.read_revision().unwrap_or_else(|e| {
        warn!(error = %e, "Could not determine repository revision, leaving it empty");
        String::new()
    });

    let (header, header_files) = assemble(config, Artifact::Header, &plans.header, &revision)?;
    let (source, source_files) = assemble(config, Artifact::Source, &plans.source, &revision)?;

    info!(path = %header_path.display(), "Writing amalgamated header");
    header.write_to(&header_path)?;

    let source_path = config.target_source_path.clone();
    info!(path = %source_path.display(), "Writing amalgamated source");
    source.write_to(&source_path)?;

    Ok(AmalgamationReport {
        header_path,
        source_path,
        header_files,
        source_files,
    })
}

/// Builds one artifact: its preamble, then every enabled plan entry in order.
/// Returns the accumulator and the number of plan files it holds.
///
/// # Errors
///
/// Fails on the first planned file that can't be read.
pub fn assemble(
    config: &AmalgamationConfig,
    artifact: Artifact,
    plan: &InclusionPlan,
    revision: &str,
) -> Result<(Accumulator, usize)> {
    info!("Amalgamating {}...", artifact.label());
    let mut acc = Accumulator::new(&config.top_dir);

    match artifact {
        Artifact::Header => write_header_preamble(&mut acc, config, revision)?,
        Artifact::Source => write_source_preamble(&mut acc, config)?,
    }

    let included = append_plan(&mut acc, plan, &config.flags)?;
    Ok((acc, included))
}

/// Appends every entry of `plan` whose gate is open, returning how many.
fn append_plan(acc: &mut Accumulator, plan: &InclusionPlan, flags: &FeatureFlags) -> Result<usize> {
    let mut included = 0;
    for entry in plan.entries() {
        if !entry.gate.is_open(flags) {
            debug!(path = %entry.path, gate = ?entry.gate, "Skipping file");
            continue;
        }
        debug!(path = %entry.path, "Adding file");
        acc.add_file(&entry.path, entry.wrap_in_comment)?;
        included += 1;
    }
    Ok(included)
}

fn write_license(acc: &mut Accumulator, config: &AmalgamationConfig) -> Result<()> {
    let license = InclusionPlan::new().commented(&config.license_path);
    append_plan(acc, &license, &config.flags).map(|_| ())
}

fn write_banner(acc: &mut Accumulator, kind: &str, header_include_path: &str) {
    acc.add_text(format!(
        "/// {PROJECT_NAME} amalgamated {kind} ({PROJECT_URL})."
    ));
    acc.add_text(format!(
        "/// It is intended to be used with #include \"{header_include_path}\""
    ));
}

fn write_header_preamble(
    acc: &mut Accumulator,
    config: &AmalgamationConfig,
    revision: &str,
) -> Result<()> {
    write_banner(acc, "header", &config.header_include_path);
    acc.add_text(format!("\n// Git SHA: {revision}"));
    write_license(acc, config)?;
    acc.add_text("#pragma once");
    acc.add_text("/// If defined, indicates that the source file is amalgamated");
    acc.add_text("/// to prevent private header inclusion.");
    acc.add_text(format!("#define {AMALGAMATION_MACRO}"));
    for define in config.flags.definitions() {
        acc.add_text(define);
    }
    Ok(())
}

fn write_source_preamble(acc: &mut Accumulator, config: &AmalgamationConfig) -> Result<()> {
    write_banner(acc, "source", &config.header_include_path);
    write_license(acc, config)?;
    acc.add_text("");
    acc.add_text(format!("#include \"{}\"", config.header_include_path));
    acc.add_text(format!(
        "\n#ifndef {AMALGAMATION_MACRO}\n#error \"Compile with -I PATH_TO_ARBITER_DIRECTORY\"\n#endif\n"
    ));
    acc.add_text("");
    Ok(())
}

/// Lists the license and enabled plan files that are missing under the top
/// directory. Writes nothing.
pub fn check(config: &AmalgamationConfig, plans: &Plans) -> Vec<String> {
    let planned = std::iter::once(config.license_path.as_str()).chain(
        plans
            .header
            .enabled(&config.flags)
            .chain(plans.source.enabled(&config.flags))
            .map(|entry| entry.path.as_str()),
    );

    let mut missing = Vec::new();
    for path in planned {
        if config.top_dir.join(path).is_file() {
            debug!(path, "Found");
        } else if !missing.iter().any(|m| m == path) {
            warn!(path, "Missing input file");
            missing.push(path.to_string());
        }
    }
    missing
}
