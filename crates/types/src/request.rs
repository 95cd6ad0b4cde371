//! Installation request types
//!
//! An [`InstallationRequest`] is the immutable description of one install:
//! the target version, optional add-ons, and optional patch artifacts. It is
//! created by the caller and owned by the pipeline run that consumes it.

use crate::version::VersionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the primary game artifact within a step plan.
pub const CLIENT_ARTIFACT: &str = "client";

/// Supported add-on providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddonProvider {
    FabricLoader,
    QuiltLoader,
    Forge,
    NeoForge,
    OptiFine,
}

impl AddonProvider {
    /// Stable lowercase slug, used in step labels and artifact names.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            Self::FabricLoader => "fabric-loader",
            Self::QuiltLoader => "quilt-loader",
            Self::Forge => "forge",
            Self::NeoForge => "neoforge",
            Self::OptiFine => "optifine",
        }
    }

    /// Whether installing this add-on requires the external-process step.
    ///
    /// The loader families ship plain artifacts; the Forge family and
    /// OptiFine ship installers that must run in a headless JVM.
    #[must_use]
    pub fn requires_processor(&self) -> bool {
        matches!(self, Self::Forge | Self::NeoForge | Self::OptiFine)
    }
}

impl fmt::Display for AddonProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// One selected add-on: a provider plus the provider-specific version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonSelection {
    pub provider: AddonProvider,
    pub version: String,
}

impl AddonSelection {
    /// Create a new add-on selection.
    pub fn new(provider: AddonProvider, version: impl Into<String>) -> Self {
        Self {
            provider,
            version: version.into(),
        }
    }
}

/// Immutable description of what to install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationRequest {
    /// Target upstream version.
    pub version: VersionId,
    /// Local name for the installed version (the user may customize it).
    pub install_name: String,
    /// Selected add-ons, in selection order.
    pub addons: Vec<AddonSelection>,
    /// Optional patch/override artifact identifiers.
    pub patches: Vec<String>,
}

impl InstallationRequest {
    /// Create a request for a bare version with no add-ons.
    pub fn new(version: impl Into<VersionId>, install_name: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            install_name: install_name.into(),
            addons: Vec::new(),
            patches: Vec::new(),
        }
    }

    /// Add an add-on selection.
    #[must_use]
    pub fn with_addon(mut self, addon: AddonSelection) -> Self {
        self.addons.push(addon);
        self
    }

    /// Add a patch artifact identifier.
    #[must_use]
    pub fn with_patch(mut self, patch: impl Into<String>) -> Self {
        self.patches.push(patch.into());
        self
    }

    /// Names of the artifacts this request needs, in plan order: the client
    /// first, then one per add-on, then one per patch.
    #[must_use]
    pub fn artifact_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(1 + self.addons.len() + self.patches.len());
        names.push(CLIENT_ARTIFACT.to_string());
        for addon in &self.addons {
            names.push(addon.provider.slug().to_string());
        }
        for patch in &self.patches {
            names.push(patch.clone());
        }
        names
    }

    /// Whether any selected add-on needs the external-process step.
    #[must_use]
    pub fn requires_processor(&self) -> bool {
        self.addons.iter().any(|a| a.provider.requires_processor())
    }
}
