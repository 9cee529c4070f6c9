//! The build descriptor data model
//!
//! One entity, `BuildDescriptor`: a flat tree of declarations read once per
//! build invocation and immutable for its duration. Field names follow the
//! kebab-case convention of the on-disk TOML format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declarative build descriptor for the Android embedding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildDescriptor {
    /// Reverse-domain namespace of the generated code
    pub namespace: String,
    /// Reverse-domain application identifier used for packaging
    pub application_id: String,
    /// SDK level the application is compiled against
    pub compile_sdk: u32,
    /// Lowest SDK level the application supports
    pub min_sdk: u32,
    /// SDK level the application targets
    pub target_sdk: u32,
    /// NDK release used by native plugins, opaque beyond semver syntax
    pub ndk_version: String,
    /// Release counter; must be positive, monotonicity is enforced by the
    /// publishing pipeline rather than locally
    pub version_code: u32,
    /// Display version, conventionally semver
    pub version_name: String,
    /// Whether the application splits across multiple dex containers
    pub multidex_enabled: bool,
    /// Relative path to the shared cross-platform source root
    pub source_path: String,
    /// Plugin identifiers activated by the build orchestrator, in order
    #[serde(default)]
    pub plugins: Vec<String>,
    /// Language compatibility options
    pub compat: CompatOptions,
    /// Build variants and their signing references
    #[serde(default)]
    pub build_types: BTreeMap<String, BuildType>,
    /// Build-time and runtime dependency coordinates, in order
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// Language-level compatibility settings
///
/// The three version tokens must denote the same compatibility level; the
/// validator enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CompatOptions {
    /// Source language level
    pub source_compatibility: String,
    /// Bytecode target level
    pub target_compatibility: String,
    /// Kotlin JVM target level
    pub jvm_target: String,
    /// Whether newer library APIs are desugared for older runtimes
    pub desugaring_enabled: bool,
}

/// Per-variant build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildType {
    /// Name of the signing config this variant borrows; a non-owning
    /// reference into an external registry, not a copy
    pub signing_config: String,
}

/// Scope of a declared dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyScope {
    /// Consumed at build time to rewrite bytecode (core library desugaring)
    CompileTimeAugmentation,
    /// Packaged into the application
    Runtime,
}

impl DependencyScope {
    /// Human-readable scope name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CompileTimeAugmentation => "compile-time augmentation",
            Self::Runtime => "runtime",
        }
    }
}

/// A dependency coordinate declared by the descriptor
///
/// Resolution of the coordinate is the external resolver's job; the
/// descriptor only carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Dependency {
    /// Where the artifact participates in the build
    pub scope: DependencyScope,
    /// `group:artifact` coordinate
    pub coordinate: String,
    /// Exact version
    pub version: String,
}

impl BuildDescriptor {
    /// Serialize the descriptor back to its on-disk TOML form
    pub fn to_toml_string(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::DescriptorError::Parse {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Signing config name referenced by a variant, if the variant exists
    pub fn signing_config_name(&self, variant: &str) -> Option<&str> {
        self.build_types
            .get(variant)
            .map(|bt| bt.signing_config.as_str())
    }
}

/// Descriptor mirroring the checked-in Android project, for tests
#[cfg(test)]
pub(crate) fn sample() -> BuildDescriptor {
    BuildDescriptor {
        namespace: "com.appshell.mobile".to_string(),
        application_id: "com.appshell.mobile".to_string(),
        compile_sdk: 35,
        min_sdk: 28,
        target_sdk: 35,
        ndk_version: "27.0.12077973".to_string(),
        version_code: 1,
        version_name: "1.0.0".to_string(),
        multidex_enabled: true,
        source_path: "../..".to_string(),
        plugins: vec![
            "com.android.application".to_string(),
            "kotlin-android".to_string(),
        ],
        compat: CompatOptions {
            source_compatibility: "11".to_string(),
            target_compatibility: "11".to_string(),
            jvm_target: "11".to_string(),
            desugaring_enabled: true,
        },
        build_types: BTreeMap::from([(
            "release".to_string(),
            BuildType {
                signing_config: "debug".to_string(),
            },
        )]),
        dependencies: vec![
            Dependency {
                scope: DependencyScope::CompileTimeAugmentation,
                coordinate: "com.android.tools:desugar_jdk_libs".to_string(),
                version: "2.0.4".to_string(),
            },
            Dependency {
                scope: DependencyScope::Runtime,
                coordinate: "androidx.multidex:multidex".to_string(),
                version: "2.0.1".to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip_is_field_for_field_equal() {
        let descriptor = sample();
        let serialized = descriptor.to_toml_string().unwrap();
        let reparsed: BuildDescriptor = toml::from_str(&serialized).unwrap();
        assert_eq!(descriptor, reparsed);
    }

    #[test]
    fn test_signing_config_name_lookup() {
        let descriptor = sample();
        assert_eq!(descriptor.signing_config_name("release"), Some("debug"));
        assert_eq!(descriptor.signing_config_name("beta"), None);
    }

    #[test]
    fn test_scope_serializes_as_kebab_case() {
        let json = serde_json::to_string(&DependencyScope::CompileTimeAugmentation).unwrap();
        assert_eq!(json, "\"compile-time-augmentation\"");
    }
}
