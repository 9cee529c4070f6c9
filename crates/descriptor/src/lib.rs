//! Android build descriptor handling for the AppShell mobile shell
//!
//! This crate provides the declarative build descriptor used by the Android
//! embedding of the AppShell application:
//!
//! - **Model**: the `BuildDescriptor` entity (SDK bounds, identity fields,
//!   compatibility options, signing references, dependency coordinates)
//! - **Loading**: TOML-based descriptor files with validation on load
//! - **Validation**: SDK ordering, package identifier syntax, compatibility
//!   level consistency
//! - **Signing**: by-name resolution of variant signing configs against an
//!   external registry
//! - **Gradle import**: extraction of a descriptor from an existing
//!   `build.gradle.kts`
//!
//! The descriptor is read once per build invocation, immutable afterwards,
//! and handed to an external build orchestrator. Nothing here compiles,
//! packages, or resolves dependencies.
//!
//! # Example
//!
//! ```rust,no_run
//! use appshell_descriptor::loader;
//!
//! let descriptor = loader::load("android-descriptor.toml")?;
//! assert!(descriptor.min_sdk <= descriptor.target_sdk);
//! # Ok::<(), appshell_descriptor::DescriptorError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod gradle;
pub mod loader;
pub mod model;
pub mod signing;
pub mod validate;

pub use error::{DescriptorError, Result};
pub use model::{BuildDescriptor, BuildType, CompatOptions, Dependency, DependencyScope};
pub use signing::{SigningConfigRef, SigningRegistry};
pub use validate::{ValidationIssue, ValidationReport};
