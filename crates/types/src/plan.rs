//! Resolved plan and installed-version records

use crate::request::AddonSelection;
use crate::version::VersionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One artifact the pipeline must fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// Artifact name; matches an entry of
    /// [`InstallationRequest::artifact_names`](crate::InstallationRequest::artifact_names).
    pub name: String,
    /// Download URL.
    pub url: String,
    /// Local destination path.
    pub destination: PathBuf,
    /// Size in bytes, when the manifest publishes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// SHA-1 digest, when the manifest publishes it. Upstream version
    /// manifests still use SHA-1 for content digests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
}

impl ArtifactSpec {
    /// Create an artifact spec with no size/digest metadata.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            destination: destination.into(),
            size: None,
            sha1: None,
        }
    }
}

/// The external processor invocation an add-on installer requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    /// Extra environment variables for the child process.
    pub envs: Vec<(String, String)>,
}

impl ProcessSpec {
    /// Create a process spec with no arguments or environment.
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
            envs: Vec::new(),
        }
    }

    /// Append an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append an environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

/// Output of metadata resolution: everything the remaining steps need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPlan {
    /// Version the plan was resolved for.
    pub version: VersionId,
    /// Artifacts to fetch, one per requested artifact name.
    pub artifacts: Vec<ArtifactSpec>,
    /// Processor invocation, present iff the request needs one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<ProcessSpec>,
}

impl ResolvedPlan {
    /// Create a plan with no artifacts or processor.
    pub fn new(version: impl Into<VersionId>) -> Self {
        Self {
            version: version.into(),
            artifacts: Vec::new(),
            process: None,
        }
    }

    /// Append an artifact.
    #[must_use]
    pub fn with_artifact(mut self, artifact: ArtifactSpec) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Set the processor invocation.
    #[must_use]
    pub fn with_process(mut self, process: ProcessSpec) -> Self {
        self.process = Some(process);
        self
    }

    /// Look up an artifact by name.
    #[must_use]
    pub fn artifact(&self, name: &str) -> Option<&ArtifactSpec> {
        self.artifacts.iter().find(|a| a.name == name)
    }
}

/// The record the finalizer persists for a completed install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledVersion {
    pub name: String,
    pub version: VersionId,
    pub addons: Vec<AddonSelection>,
    pub installed_at: DateTime<Utc>,
}
