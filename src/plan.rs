//! Curated inclusion plans and the feature flags that gate them.
//!
//! The order of entries follows the library's own dependency order: a file
//! only relies on types and macros from files listed before it. Nothing here
//! infers that order; it is maintained by hand.

use serde::Serialize;

/// Defined by the amalgamated header; the library's headers skip their own
/// includes when it is set.
pub const AMALGAMATION_MACRO: &str = "ARBITER_IS_AMALGAMATION";
pub const CUSTOM_NAMESPACE_MACRO: &str = "ARBITER_CUSTOM_NAMESPACE";
pub const EXTERNAL_JSON_MACRO: &str = "ARBITER_EXTERNAL_JSON";
pub const EXTERNAL_XML_MACRO: &str = "ARBITER_EXTERNAL_XML";
pub const CURL_MACRO: &str = "ARBITER_CURL";

/// Which feature flag governs a plan entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gate {
    /// Always included
    Always,
    /// Included only with the bundled JSON library
    Json,
    /// Included only with the bundled XML library
    Xml,
}

impl Gate {
    pub fn is_open(self, flags: &FeatureFlags) -> bool {
        match self {
            Self::Always => true,
            Self::Json => flags.bundled_json,
            Self::Xml => flags.bundled_xml,
        }
    }
}

/// Toggles that select optional plan entries and extra definitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    /// Ship the bundled JSON library instead of expecting an external one
    pub bundled_json: bool,
    /// Ship the bundled XML library instead of expecting an external one
    pub bundled_xml: bool,
    /// Define the curl transport macro
    pub curl: bool,
    /// Wrap the library in an extra outer namespace
    pub custom_namespace: Option<String>,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            bundled_json: true,
            bundled_xml: true,
            curl: false,
            custom_namespace: None,
        }
    }
}

impl FeatureFlags {
    /// The namespace override, if one is set and not blank.
    pub fn namespace(&self) -> Option<&str> {
        self.custom_namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
    }

    /// Preprocessor definitions implied by these flags, in emission order.
    pub fn definitions(&self) -> Vec<String> {
        let mut defines = Vec::new();
        if let Some(namespace) = self.namespace() {
            defines.push(format!("#define {CUSTOM_NAMESPACE_MACRO} {namespace}"));
        }
        if !self.bundled_json {
            defines.push(format!("#define {EXTERNAL_JSON_MACRO}"));
        }
        if !self.bundled_xml {
            defines.push(format!("#define {EXTERNAL_XML_MACRO}"));
        }
        if self.curl {
            defines.push(format!("#define {CURL_MACRO}"));
        }
        defines
    }
}

/// One curated file: its path relative to the top directory, the flag that
/// governs it, and whether its content is wrapped in a block comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub path: String,
    pub gate: Gate,
    pub wrap_in_comment: bool,
}

/// Ordered list of files for one artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InclusionPlan {
    entries: Vec<PlanEntry>,
}

impl InclusionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an ungated file.
    #[must_use]
    pub fn file(self, path: &str) -> Self {
        self.gated(path, Gate::Always)
    }

    /// Adds a file governed by `gate`.
    #[must_use]
    pub fn gated(mut self, path: &str, gate: Gate) -> Self {
        self.entries.push(PlanEntry {
            path: path.to_string(),
            gate,
            wrap_in_comment: false,
        });
        self
    }

    /// Adds a file whose content is emitted inside a block comment.
    #[must_use]
    pub fn commented(mut self, path: &str) -> Self {
        self.entries.push(PlanEntry {
            path: path.to_string(),
            gate: Gate::Always,
            wrap_in_comment: true,
        });
        self
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Entries whose gate is open under `flags`, in plan order.
    pub fn enabled<'a>(&'a self, flags: &'a FeatureFlags) -> impl Iterator<Item = &'a PlanEntry> {
        self.entries.iter().filter(move |entry| entry.gate.is_open(flags))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Header files of the Arbiter library.
    pub fn arbiter_header() -> Self {
        Self::new()
            .gated("arbiter/third/json/json.hpp", Gate::Json)
            .file("arbiter/util/exports.hpp")
            .file("arbiter/util/types.hpp")
            .file("arbiter/util/curl.hpp")
            .file("arbiter/util/http.hpp")
            .file("arbiter/util/ini.hpp")
            .file("arbiter/util/md5.hpp")
            .file("arbiter/util/sha256.hpp")
            .file("arbiter/util/time.hpp")
            .file("arbiter/util/transforms.hpp")
            .file("arbiter/util/util.hpp")
            .file("arbiter/util/json.hpp")
            .gated("arbiter/third/xml/rapidxml.hpp", Gate::Xml)
            .gated("arbiter/third/xml/xml.hpp", Gate::Xml)
            .file("arbiter/util/crypto.hpp")
            .file("arbiter/driver.hpp")
            .file("arbiter/drivers/fs.hpp")
            .file("arbiter/drivers/test.hpp")
            .file("arbiter/drivers/http.hpp")
            .file("arbiter/drivers/s3.hpp")
            .file("arbiter/drivers/google.hpp")
            .file("arbiter/drivers/dropbox.hpp")
            .file("arbiter/drivers/az.hpp")
            .file("arbiter/drivers/onedrive.hpp")
            .file("arbiter/endpoint.hpp")
            .file("arbiter/arbiter.hpp")
    }

    /// Source files of the Arbiter library.
    pub fn arbiter_source() -> Self {
        Self::new()
            .file("arbiter/arbiter.cpp")
            .file("arbiter/driver.cpp")
            .file("arbiter/endpoint.cpp")
            .file("arbiter/drivers/fs.cpp")
            .file("arbiter/drivers/http.cpp")
            .file("arbiter/drivers/s3.cpp")
            .file("arbiter/drivers/google.cpp")
            .file("arbiter/drivers/dropbox.cpp")
            .file("arbiter/drivers/az.cpp")
            .file("arbiter/drivers/onedrive.cpp")
            .file("arbiter/util/crypto.cpp")
            .file("arbiter/util/curl.cpp")
            .file("arbiter/util/http.cpp")
            .file("arbiter/util/ini.cpp")
            .file("arbiter/util/md5.cpp")
            .file("arbiter/util/sha256.cpp")
            .file("arbiter/util/time.cpp")
            .file("arbiter/util/transforms.cpp")
            .file("arbiter/util/util.cpp")
    }
}

/// The pair of plans a run works from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plans {
    pub header: InclusionPlan,
    pub source: InclusionPlan,
}

impl Plans {
    pub fn new(header: InclusionPlan, source: InclusionPlan) -> Self {
        Self { header, source }
    }

    pub fn arbiter() -> Self {
        Self::new(InclusionPlan::arbiter_header(), InclusionPlan::arbiter_source())
    }
}

impl Default for Plans {
    fn default() -> Self {
        Self::arbiter()
    }
}
