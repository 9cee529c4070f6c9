//! Signing config resolution
//!
//! The descriptor references signing configs by name only; the configs
//! themselves (keystores, credentials) live in an external registry this
//! tool never reads. Resolution checks that the reference is not dangling
//! and hands back a by-name handle for the orchestrator.

use crate::error::{DescriptorError, Result};
use crate::model::BuildDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Non-owning handle to a signing config, resolved for one variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfigRef {
    /// The build variant that was resolved
    pub variant: String,
    /// The signing config name the variant borrows
    pub name: String,
}

/// Names of signing configs declared by the external build environment
///
/// The `debug` config is always present: the orchestrator synthesizes it
/// even when no signing block is written down.
#[derive(Debug, Clone)]
pub struct SigningRegistry {
    names: BTreeSet<String>,
}

impl Default for SigningRegistry {
    fn default() -> Self {
        Self::new(["debug"])
    }
}

impl SigningRegistry {
    /// Build a registry from declared config names; `debug` is added
    /// unconditionally
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        set.insert("debug".to_string());
        Self { names: set }
    }

    /// Whether a config name is declared
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Declared config names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Resolve the signing config a variant borrows
    ///
    /// Fails with [`DescriptorError::UnknownVariant`] when the descriptor
    /// does not declare the variant, and with
    /// [`DescriptorError::UnknownSigningConfig`] when the referenced name is
    /// not in this registry.
    pub fn resolve(
        &self,
        descriptor: &BuildDescriptor,
        variant: &str,
    ) -> Result<SigningConfigRef> {
        let name = descriptor.signing_config_name(variant).ok_or_else(|| {
            DescriptorError::UnknownVariant {
                variant: variant.to_string(),
            }
        })?;

        if !self.contains(name) {
            return Err(DescriptorError::UnknownSigningConfig {
                name: name.to_string(),
                variant: variant.to_string(),
            });
        }

        Ok(SigningConfigRef {
            variant: variant.to_string(),
            name: name.to_string(),
        })
    }
}
