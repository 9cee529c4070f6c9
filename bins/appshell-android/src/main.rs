//! AppShell Android descriptor CLI
//!
//! Loads, validates, converts, and inspects the declarative build descriptor
//! consumed by the external build orchestrator.

mod output;

use anyhow::Result;
use appshell_descriptor::error::exit_codes;
use appshell_descriptor::{gradle, loader, DescriptorError, SigningRegistry};
use clap::{Parser, Subcommand};
use output::Status;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "appshell-android")]
#[command(about = "Build descriptor tools for AppShell Android")]
#[command(version)]
struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a descriptor and report every validation finding
    Validate {
        /// Descriptor file (TOML)
        file: PathBuf,
    },

    /// Print a loaded descriptor
    Show {
        /// Descriptor file (TOML)
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a build.gradle.kts application module to the native format
    Import {
        /// Gradle Kotlin DSL file
        file: PathBuf,
        /// Where to write the converted descriptor; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve the signing config a build variant borrows
    Signing {
        /// Descriptor file (TOML)
        file: PathBuf,
        /// Build variant to resolve
        #[arg(long, default_value = "release")]
        variant: String,
        /// Signing config names declared by the build environment;
        /// `debug` is always assumed present
        #[arg(long = "known")]
        known: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let exit_code = match cli.command {
        Commands::Validate { file } => run_validate(&file, cli.quiet),
        Commands::Show { file, json } => run_show(&file, json),
        Commands::Import { file, output } => run_import(&file, output.as_deref(), cli.quiet),
        Commands::Signing {
            file,
            variant,
            known,
        } => run_signing(&file, &variant, known),
    };

    std::process::exit(exit_code);
}

fn error_exit_code(err: &DescriptorError) -> i32 {
    match err {
        DescriptorError::Validation { .. }
        | DescriptorError::UnknownSigningConfig { .. }
        | DescriptorError::UnknownVariant { .. } => exit_codes::VALIDATION_ERROR,
        DescriptorError::Parse { .. } | DescriptorError::Io(_) => exit_codes::CONFIG_ERROR,
    }
}

fn run_validate(file: &Path, quiet: bool) -> i32 {
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            Status::error(&format!("Cannot read {}: {}", file.display(), e));
            return exit_codes::CONFIG_ERROR;
        }
    };

    // Parse without validating so the full report can be printed
    let descriptor = match loader::parse(&content, &file.display().to_string()) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            Status::error(&e.to_string());
            return exit_codes::CONFIG_ERROR;
        }
    };

    let report = appshell_descriptor::validate::check(&descriptor);

    for warning in report.warnings() {
        if !quiet {
            Status::warning(&warning.to_string());
        }
    }

    if report.is_valid() {
        if !quiet {
            Status::success(&format!("{} is valid", file.display()));
        }
        exit_codes::SUCCESS
    } else {
        for error in report.errors() {
            Status::error(&error.to_string());
        }
        exit_codes::VALIDATION_ERROR
    }
}

fn run_show(file: &Path, json: bool) -> i32 {
    let descriptor = match loader::load(file) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            Status::error(&e.to_string());
            return error_exit_code(&e);
        }
    };

    if json {
        match serde_json::to_string_pretty(&descriptor) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                Status::error(&format!("Serialization failed: {e}"));
                return exit_codes::FAILURE;
            }
        }
        return exit_codes::SUCCESS;
    }

    println!("{}", file.display());
    Status::field("namespace", &descriptor.namespace);
    Status::field("application-id", &descriptor.application_id);
    Status::field(
        "sdk",
        &format!(
            "min {} / target {} / compile {}",
            descriptor.min_sdk, descriptor.target_sdk, descriptor.compile_sdk
        ),
    );
    Status::field("ndk-version", &descriptor.ndk_version);
    Status::field(
        "version",
        &format!("{} ({})", descriptor.version_name, descriptor.version_code),
    );
    Status::field(
        "compat",
        &format!(
            "level {} / desugaring {}",
            descriptor.compat.jvm_target,
            if descriptor.compat.desugaring_enabled {
                "on"
            } else {
                "off"
            }
        ),
    );
    Status::field(
        "multidex",
        if descriptor.multidex_enabled { "on" } else { "off" },
    );
    Status::field("source-path", &descriptor.source_path);
    Status::field("plugins", &descriptor.plugins.join(", "));
    for (variant, build_type) in &descriptor.build_types {
        Status::field(
            &format!("build-type {variant}"),
            &format!("signing-config {}", build_type.signing_config),
        );
    }
    for dependency in &descriptor.dependencies {
        Status::field(
            dependency.scope.display_name(),
            &format!("{}:{}", dependency.coordinate, dependency.version),
        );
    }

    exit_codes::SUCCESS
}

fn run_import(file: &Path, output: Option<&Path>, quiet: bool) -> i32 {
    let descriptor = match gradle::import(file) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            Status::error(&e.to_string());
            return error_exit_code(&e);
        }
    };

    let rendered = match descriptor.to_toml_string() {
        Ok(rendered) => rendered,
        Err(e) => {
            Status::error(&e.to_string());
            return exit_codes::FAILURE;
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, rendered) {
                Status::error(&format!("Cannot write {}: {}", path.display(), e));
                return exit_codes::FAILURE;
            }
            if !quiet {
                Status::success(&format!(
                    "Imported {} -> {}",
                    file.display(),
                    path.display()
                ));
            }
        }
        None => print!("{rendered}"),
    }

    exit_codes::SUCCESS
}

fn run_signing(file: &Path, variant: &str, known: Vec<String>) -> i32 {
    let descriptor = match loader::load(file) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            Status::error(&e.to_string());
            return error_exit_code(&e);
        }
    };

    let registry = SigningRegistry::new(known);

    match registry.resolve(&descriptor, variant) {
        Ok(resolved) => {
            Status::success(&format!(
                "Variant `{}` signs with `{}`",
                resolved.variant, resolved.name
            ));
            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::error(&e.to_string());
            error_exit_code(&e)
        }
    }
}
