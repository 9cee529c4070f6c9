//! Gradle Kotlin DSL import
//!
//! Extracts a [`BuildDescriptor`] from an existing `build.gradle.kts`
//! application module so a project can be converted to the native TOML
//! format. Extraction is regex-based field lifting, not a Gradle evaluator:
//! only the declarative subset an application descriptor uses is recognized,
//! and any required field the file does not declare is a parse error naming
//! that field.

use crate::error::{DescriptorError, Result};
use crate::model::{BuildDescriptor, BuildType, CompatOptions, Dependency, DependencyScope};
use crate::validate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;

static PLUGIN_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"id\("([^"]+)"\)"#).unwrap());
static STRING_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*(\w+)\s*=\s*"([^"]+)""#).unwrap());
static INT_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(\w+)\s*=\s*(\d+)\b").unwrap());
static BOOL_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(\w+)\s*=\s*(true|false)\b").unwrap());
/// `sourceCompatibility = JavaVersion.VERSION_11` and the `.toString()`
/// variant used for `jvmTarget`
static JAVA_VERSION_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(\w+)\s*=\s*JavaVersion\.VERSION_(\d+(?:_\d+)?)").unwrap()
});
static SIGNING_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)(\w+)\s*\{[^{}]*signingConfig\s*=\s*signingConfigs\.getByName\("([^"]+)"\)"#)
        .unwrap()
});
static DEPENDENCY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*(coreLibraryDesugaring|implementation)\("([^"]+)"\)"#).unwrap()
});
static FLUTTER_SOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)flutter\s*\{[^}]*source\s*=\s*"([^"]+)""#).unwrap());

/// Import a `build.gradle.kts` file and validate the result
pub fn import(path: impl AsRef<Path>) -> Result<BuildDescriptor> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let descriptor = extract(&content, &path.display().to_string())?;
    validate::check(&descriptor).to_result()?;
    Ok(descriptor)
}

/// Extract a descriptor from Gradle Kotlin DSL text without validating it
pub fn extract(content: &str, origin: &str) -> Result<BuildDescriptor> {
    let strings = capture_pairs(&STRING_FIELD, content);
    let ints = capture_pairs(&INT_FIELD, content);
    let bools = capture_pairs(&BOOL_FIELD, content);
    let java_levels = capture_pairs(&JAVA_VERSION_FIELD, content);

    let plugins: Vec<String> = PLUGIN_ID
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect();

    let mut build_types = BTreeMap::new();
    for captures in SIGNING_REF.captures_iter(content) {
        build_types.insert(
            captures[1].to_string(),
            BuildType {
                signing_config: captures[2].to_string(),
            },
        );
    }

    let mut dependencies = Vec::new();
    for captures in DEPENDENCY.captures_iter(content) {
        let scope = match &captures[1] {
            "coreLibraryDesugaring" => DependencyScope::CompileTimeAugmentation,
            _ => DependencyScope::Runtime,
        };
        dependencies.push(split_coordinate(&captures[2], origin, scope)?);
    }

    let source_path = FLUTTER_SOURCE
        .captures(content)
        .map(|c| c[1].to_string())
        .ok_or_else(|| missing(origin, "flutter.source"))?;

    let compat = CompatOptions {
        source_compatibility: require(&java_levels, "sourceCompatibility", origin)?,
        target_compatibility: require(&java_levels, "targetCompatibility", origin)?,
        jvm_target: require(&java_levels, "jvmTarget", origin)?,
        desugaring_enabled: bools
            .get("isCoreLibraryDesugaringEnabled")
            .copied()
            .unwrap_or(false),
    };

    Ok(BuildDescriptor {
        namespace: require(&strings, "namespace", origin)?,
        application_id: require(&strings, "applicationId", origin)?,
        compile_sdk: require(&ints, "compileSdk", origin)?,
        min_sdk: require(&ints, "minSdk", origin)?,
        target_sdk: require(&ints, "targetSdk", origin)?,
        ndk_version: require(&strings, "ndkVersion", origin)?,
        version_code: require(&ints, "versionCode", origin)?,
        version_name: require(&strings, "versionName", origin)?,
        multidex_enabled: bools.get("multiDexEnabled").copied().unwrap_or(false),
        source_path,
        plugins,
        compat,
        build_types,
        dependencies,
    })
}

fn capture_pairs<T: std::str::FromStr>(pattern: &Regex, content: &str) -> BTreeMap<String, T> {
    pattern
        .captures_iter(content)
        .filter_map(|c| c[2].parse().ok().map(|v| (c[1].to_string(), v)))
        .collect()
}

fn require<T: Clone>(fields: &BTreeMap<String, T>, name: &str, origin: &str) -> Result<T> {
    fields.get(name).cloned().ok_or_else(|| missing(origin, name))
}

fn missing(origin: &str, field: &str) -> DescriptorError {
    DescriptorError::Parse {
        path: origin.to_string(),
        message: format!("required field `{field}` not found"),
    }
}

fn split_coordinate(
    raw: &str,
    origin: &str,
    scope: DependencyScope,
) -> Result<Dependency> {
    let mut parts = raw.rsplitn(2, ':');
    let version = parts.next().unwrap_or_default();
    let coordinate = parts.next().ok_or_else(|| DescriptorError::Parse {
        path: origin.to_string(),
        message: format!("dependency `{raw}` is not a group:artifact:version coordinate"),
    })?;
    if !coordinate.contains(':') {
        return Err(DescriptorError::Parse {
            path: origin.to_string(),
            message: format!("dependency `{raw}` is not a group:artifact:version coordinate"),
        });
    }
    Ok(Dependency {
        scope,
        coordinate: coordinate.to_string(),
        version: version.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
plugins {
    id("com.android.application")
    id("kotlin-android")
    id("dev.flutter.flutter-gradle-plugin")
}

android {
    namespace = "com.appshell.mobile"
    compileSdk = 35
    ndkVersion = "27.0.12077973"

    compileOptions {
        sourceCompatibility = JavaVersion.VERSION_11
        targetCompatibility = JavaVersion.VERSION_11
        isCoreLibraryDesugaringEnabled = true
    }

    kotlinOptions {
        jvmTarget = JavaVersion.VERSION_11.toString()
    }

    defaultConfig {
        applicationId = "com.appshell.mobile"
        minSdk = 28
        targetSdk = 35
        versionCode = 1
        versionName = "1.0.0"
        multiDexEnabled = true
    }

    buildTypes {
        release {
            signingConfig = signingConfigs.getByName("debug")
        }
    }
}

flutter {
    source = "../.."
}

dependencies {
    coreLibraryDesugaring("com.android.tools:desugar_jdk_libs:2.0.4")
    implementation("androidx.multidex:multidex:2.0.1")
}
"#;

    #[test]
    fn test_extract_all_fields() {
        let descriptor = extract(SAMPLE, "build.gradle.kts").unwrap();
        assert_eq!(descriptor.namespace, "com.appshell.mobile");
        assert_eq!(descriptor.application_id, "com.appshell.mobile");
        assert_eq!(descriptor.compile_sdk, 35);
        assert_eq!(descriptor.min_sdk, 28);
        assert_eq!(descriptor.target_sdk, 35);
        assert_eq!(descriptor.ndk_version, "27.0.12077973");
        assert_eq!(descriptor.version_code, 1);
        assert_eq!(descriptor.version_name, "1.0.0");
        assert!(descriptor.multidex_enabled);
        assert_eq!(descriptor.source_path, "../..");
        assert_eq!(
            descriptor.plugins,
            vec![
                "com.android.application",
                "kotlin-android",
                "dev.flutter.flutter-gradle-plugin"
            ]
        );
    }

    #[test]
    fn test_extract_compat_options() {
        let descriptor = extract(SAMPLE, "build.gradle.kts").unwrap();
        assert_eq!(descriptor.compat.source_compatibility, "11");
        assert_eq!(descriptor.compat.target_compatibility, "11");
        assert_eq!(descriptor.compat.jvm_target, "11");
        assert!(descriptor.compat.desugaring_enabled);
    }

    #[test]
    fn test_extract_signing_reference() {
        let descriptor = extract(SAMPLE, "build.gradle.kts").unwrap();
        assert_eq!(descriptor.signing_config_name("release"), Some("debug"));
    }

    #[test]
    fn test_extract_dependencies_with_scopes() {
        let descriptor = extract(SAMPLE, "build.gradle.kts").unwrap();
        assert_eq!(descriptor.dependencies.len(), 2);
        assert_eq!(
            descriptor.dependencies[0].scope,
            DependencyScope::CompileTimeAugmentation
        );
        assert_eq!(
            descriptor.dependencies[0].coordinate,
            "com.android.tools:desugar_jdk_libs"
        );
        assert_eq!(descriptor.dependencies[0].version, "2.0.4");
        assert_eq!(descriptor.dependencies[1].scope, DependencyScope::Runtime);
        assert_eq!(
            descriptor.dependencies[1].coordinate,
            "androidx.multidex:multidex"
        );
    }

    #[test]
    fn test_missing_required_field_names_it() {
        let trimmed = SAMPLE.replace("applicationId = \"com.appshell.mobile\"", "");
        let err = extract(&trimmed, "build.gradle.kts").unwrap_err();
        match err {
            DescriptorError::Parse { message, .. } => {
                assert!(message.contains("applicationId"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_two_part_dependency_is_rejected() {
        let err = split_coordinate(
            "multidex:2.0.1",
            "build.gradle.kts",
            DependencyScope::Runtime,
        )
        .unwrap_err();
        assert!(matches!(err, DescriptorError::Parse { .. }));
    }

    #[test]
    fn test_import_validates_extracted_descriptor() {
        let broken = SAMPLE.replace("minSdk = 28", "minSdk = 36");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(broken.as_bytes()).unwrap();
        let err = import(file.path()).unwrap_err();
        assert!(matches!(err, DescriptorError::Validation { .. }));
    }

    #[test]
    fn test_imported_descriptor_round_trips_through_toml() {
        let descriptor = extract(SAMPLE, "build.gradle.kts").unwrap();
        let serialized = descriptor.to_toml_string().unwrap();
        let reparsed = crate::loader::from_toml_str(&serialized, "round-trip").unwrap();
        assert_eq!(descriptor, reparsed);
    }
}
