//! Descriptor file loading
//!
//! The on-disk format is TOML with kebab-case keys. Loading parses the file
//! and runs the full invariant check before handing the descriptor out, so a
//! `BuildDescriptor` obtained from [`load`] is always valid.

use crate::error::{DescriptorError, Result};
use crate::model::BuildDescriptor;
use crate::validate;
use std::path::Path;

/// Load and validate a descriptor file
///
/// Fails with [`DescriptorError::Parse`] on malformed TOML and with
/// [`DescriptorError::Validation`] when any invariant is violated.
pub fn load(path: impl AsRef<Path>) -> Result<BuildDescriptor> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content, &path.display().to_string())
}

/// Parse descriptor TOML, then validate
///
/// `origin` is used in parse diagnostics so errors name the source file.
pub fn from_toml_str(content: &str, origin: &str) -> Result<BuildDescriptor> {
    let descriptor = parse(content, origin)?;
    validate::check(&descriptor).to_result()?;
    Ok(descriptor)
}

/// Parse descriptor TOML without running the invariant check
///
/// Callers that want the full [`validate::check`] report rather than the
/// first-error short circuit of [`from_toml_str`] parse with this and run
/// the check themselves.
pub fn parse(content: &str, origin: &str) -> Result<BuildDescriptor> {
    toml::from_str(content).map_err(|e| DescriptorError::Parse {
        path: origin.to_string(),
        message: e.message().to_string(),
    })
}

/// Write a descriptor to a file in its canonical TOML form
pub fn save(descriptor: &BuildDescriptor, path: impl AsRef<Path>) -> Result<()> {
    let content = descriptor.to_toml_string()?;
    std::fs::write(path, content)?;
    Ok(())
}
