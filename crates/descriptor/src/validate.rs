//! Descriptor invariant checking
//!
//! Validation collects every error and warning in one pass so the user sees
//! all problems at once; `ValidationReport::to_result` converts the outcome
//! to the crate error type, naming offending fields.
//!
//! Invariants enforced as errors:
//! - `min-sdk <= target-sdk <= compile-sdk`
//! - `namespace` and `application-id` are reverse-domain identifiers
//! - `source-compatibility`, `target-compatibility`, and `jvm-target` denote
//!   the same language level
//! - `version-code` is positive
//!
//! Conditions surfaced as warnings only:
//! - `multidex-enabled` when `min-sdk >= 21` (redundant, not invalid)
//! - `ndk-version` not parseable as semver (the field is opaque here)

use crate::error::{DescriptorError, Result};
use crate::model::BuildDescriptor;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Dot-separated segments, each starting with a letter, at least two of them
static PACKAGE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$").unwrap()
});

/// SDK level at which a single dex container stopped being a constraint
const NATIVE_MULTIDEX_SDK: u32 = 21;

/// A single validation finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Descriptor field the finding applies to
    pub field: String,
    /// What is wrong or worth knowing
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validating a descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Whether the descriptor satisfied every invariant
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Invariant violations
    pub fn errors(&self) -> &[ValidationIssue] {
        &self.errors
    }

    /// Non-blocking findings
    pub fn warnings(&self) -> &[ValidationIssue] {
        &self.warnings
    }

    fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn warning(&mut self, field: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Convert to a `Result`, keeping the first offending field in the error
    /// and every message in the diagnostic text
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        let field = self.errors[0].field.clone();
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        Err(DescriptorError::Validation {
            field,
            message: messages.join("; "),
        })
    }
}

/// Check every descriptor invariant, collecting errors and warnings
pub fn check(descriptor: &BuildDescriptor) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_identifier(&mut report, "namespace", &descriptor.namespace);
    check_identifier(&mut report, "application-id", &descriptor.application_id);
    check_sdk_levels(&mut report, descriptor);
    check_compat_levels(&mut report, descriptor);

    if descriptor.version_code == 0 {
        report.error("version-code", "must be a positive integer");
    }

    if descriptor.source_path.trim().is_empty() {
        report.error("source-path", "must point at the shared source root");
    }

    if descriptor.multidex_enabled && descriptor.min_sdk >= NATIVE_MULTIDEX_SDK {
        report.warning(
            "multidex-enabled",
            format!(
                "redundant: min-sdk {} already supports multiple dex containers natively",
                descriptor.min_sdk
            ),
        );
    }

    if semver::Version::parse(&descriptor.ndk_version).is_err() {
        report.warning(
            "ndk-version",
            format!("`{}` is not a semantic version", descriptor.ndk_version),
        );
    }

    for (variant, build_type) in &descriptor.build_types {
        if build_type.signing_config.trim().is_empty() {
            report.error(
                "build-types",
                format!("variant `{variant}` has an empty signing-config reference"),
            );
        }
    }

    for (index, dependency) in descriptor.dependencies.iter().enumerate() {
        if !dependency.coordinate.contains(':') {
            report.error(
                "dependencies",
                format!(
                    "entry {index}: `{}` is not a group:artifact coordinate",
                    dependency.coordinate
                ),
            );
        }
    }

    report
}

fn check_identifier(report: &mut ValidationReport, field: &str, value: &str) {
    if value.trim().is_empty() {
        report.error(field, "is required");
    } else if !PACKAGE_ID.is_match(value) {
        report.error(
            field,
            format!("`{value}` is not a valid reverse-domain identifier"),
        );
    }
}

fn check_sdk_levels(report: &mut ValidationReport, descriptor: &BuildDescriptor) {
    if descriptor.min_sdk > descriptor.target_sdk {
        report.error(
            "min-sdk",
            format!(
                "{} exceeds target-sdk {}",
                descriptor.min_sdk, descriptor.target_sdk
            ),
        );
    }
    if descriptor.target_sdk > descriptor.compile_sdk {
        report.error(
            "target-sdk",
            format!(
                "{} exceeds compile-sdk {}",
                descriptor.target_sdk, descriptor.compile_sdk
            ),
        );
    }
}

fn check_compat_levels(report: &mut ValidationReport, descriptor: &BuildDescriptor) {
    let compat = &descriptor.compat;
    if compat.source_compatibility != compat.target_compatibility
        || compat.target_compatibility != compat.jvm_target
    {
        report.error(
            "compat",
            format!(
                "source-compatibility `{}`, target-compatibility `{}`, and jvm-target `{}` \
                 must denote the same language level",
                compat.source_compatibility, compat.target_compatibility, compat.jvm_target
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model;

    #[test]
    fn test_sample_descriptor_is_valid() {
        let report = check(&model::sample());
        assert!(report.is_valid(), "errors: {:?}", report.errors());
    }

    #[test]
    fn test_sdk_ordering_holds_for_valid_descriptor() {
        let descriptor = model::sample();
        assert!(check(&descriptor).is_valid());
        assert!(descriptor.min_sdk <= descriptor.target_sdk);
        assert!(descriptor.target_sdk <= descriptor.compile_sdk);
    }

    #[test]
    fn test_target_sdk_above_compile_sdk_is_rejected() {
        let mut descriptor = model::sample();
        descriptor.target_sdk = 36;
        descriptor.compile_sdk = 35;
        let report = check(&descriptor);
        assert!(!report.is_valid());
        assert_eq!(report.errors()[0].field, "target-sdk");
    }

    #[test]
    fn test_min_sdk_above_target_sdk_is_rejected() {
        let mut descriptor = model::sample();
        descriptor.min_sdk = 36;
        let report = check(&descriptor);
        assert!(!report.is_valid());
        assert_eq!(report.errors()[0].field, "min-sdk");
    }

    #[test]
    fn test_leading_digit_segment_in_application_id_is_rejected() {
        let mut descriptor = model::sample();
        descriptor.application_id = "com.1example.app".to_string();
        let report = check(&descriptor);
        assert!(!report.is_valid());
        assert!(report.errors().iter().any(|e| e.field == "application-id"));
    }

    #[test]
    fn test_single_segment_namespace_is_rejected() {
        let mut descriptor = model::sample();
        descriptor.namespace = "mobile".to_string();
        let report = check(&descriptor);
        assert!(report.errors().iter().any(|e| e.field == "namespace"));
    }

    #[test]
    fn test_mismatched_compat_levels_are_rejected() {
        let mut descriptor = model::sample();
        descriptor.compat.jvm_target = "17".to_string();
        let report = check(&descriptor);
        assert!(report.errors().iter().any(|e| e.field == "compat"));
    }

    #[test]
    fn test_zero_version_code_is_rejected() {
        let mut descriptor = model::sample();
        descriptor.version_code = 0;
        let report = check(&descriptor);
        assert!(report.errors().iter().any(|e| e.field == "version-code"));
    }

    #[test]
    fn test_multidex_with_modern_min_sdk_is_warning_not_error() {
        let descriptor = model::sample();
        let report = check(&descriptor);
        assert!(report.is_valid());
        assert!(report
            .warnings()
            .iter()
            .any(|w| w.field == "multidex-enabled"));
    }

    #[test]
    fn test_multidex_with_legacy_min_sdk_has_no_warning() {
        let mut descriptor = model::sample();
        descriptor.min_sdk = 19;
        let report = check(&descriptor);
        assert!(!report
            .warnings()
            .iter()
            .any(|w| w.field == "multidex-enabled"));
    }

    #[test]
    fn test_non_semver_ndk_version_is_warning_only() {
        let mut descriptor = model::sample();
        descriptor.ndk_version = "r27".to_string();
        let report = check(&descriptor);
        assert!(report.is_valid());
        assert!(report.warnings().iter().any(|w| w.field == "ndk-version"));
    }

    #[test]
    fn test_malformed_dependency_coordinate_is_rejected() {
        let mut descriptor = model::sample();
        descriptor.dependencies[0].coordinate = "desugar_jdk_libs".to_string();
        let report = check(&descriptor);
        assert!(report.errors().iter().any(|e| e.field == "dependencies"));
    }

    #[test]
    fn test_to_result_names_the_first_offending_field() {
        let mut descriptor = model::sample();
        descriptor.target_sdk = 40;
        let err = check(&descriptor).to_result().unwrap_err();
        match err {
            crate::DescriptorError::Validation { field, .. } => {
                assert_eq!(field, "target-sdk");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
