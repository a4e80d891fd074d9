//! `kissbuf` command line entry point.

use anyhow::{Context, Result};
use clap::Parser;
use kissbuf_codegen::{GeneratorConfig, generate_to_dir};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "kissbuf")]
#[command(
    about = "Generate little-endian C encode/decode routines from typedef struct declarations.",
    long_about = None
)]
struct Cli {
    /// Header containing the `typedef struct` declarations.
    header: PathBuf,

    /// Directory the generated units are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// JSON generator configuration (registry, file names, opaque types).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Type copied verbatim with `sizeof` instead of being rejected.
    #[arg(long = "opaque", value_name = "TYPE")]
    opaque: Vec<String>,

    /// Include name of the declaration header in generated code
    /// (defaults to the header's file name).
    #[arg(long)]
    source_header: Option<String>,

    /// File name of the implementation unit.
    #[arg(long, value_name = "NAME")]
    implementation: Option<String>,

    /// File name of the interface unit.
    #[arg(long, value_name = "NAME")]
    interface: Option<String>,
}

impl Cli {
    /// Builds the generator configuration: file, then command line overrides.
    fn generator_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(source_header) = &self.source_header {
            config.source_header = Some(source_header.clone());
        }
        if let Some(implementation) = &self.implementation {
            config.implementation_file = implementation.clone();
        }
        if let Some(interface) = &self.interface {
            config.interface_file = interface.clone();
        }
        config.opaque_types.extend(self.opaque.iter().cloned());

        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.generator_config()?;
    let files = generate_to_dir(&cli.header, &cli.out_dir, &config)
        .with_context(|| format!("failed to generate codecs for {}", cli.header.display()))?;

    tracing::info!(
        implementation = %files.implementation.display(),
        interface = %files.interface.display(),
        "generation complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_defaults_leave_source_header_to_generation() {
        let cli = Cli::try_parse_from(["kissbuf", "include/shapes.h"]).expect("Failed to parse");
        let config = cli.generator_config().expect("Failed to build config");

        assert_eq!(config.source_header, None);
        assert_eq!(config.implementation_file, "generated_serde.c");
        assert_eq!(cli.out_dir, PathBuf::from("."));
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "kissbuf",
            "example.h",
            "--opaque",
            "timeval",
            "--opaque",
            "struct_tm",
            "--implementation",
            "wire.c",
            "--interface",
            "wire.h",
            "--source-header",
            "types/example.h",
        ])
        .expect("Failed to parse");
        let config = cli.generator_config().expect("Failed to build config");

        assert!(config.opaque_types.contains("timeval"));
        assert!(config.opaque_types.contains("struct_tm"));
        assert_eq!(config.implementation_file, "wire.c");
        assert_eq!(config.include_guard(), "WIRE_H");
        assert_eq!(config.source_header.as_deref(), Some("types/example.h"));
    }

    #[test]
    fn test_config_file_loaded() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("kissbuf.json");
        std::fs::write(&path, r#"{"interface_file": "codec.h"}"#).expect("Failed to write");

        let cli = Cli::try_parse_from([
            OsString::from("kissbuf"),
            OsString::from("example.h"),
            OsString::from("--config"),
            path.into_os_string(),
        ])
        .expect("Failed to parse");
        let config = cli.generator_config().expect("Failed to build config");
        assert_eq!(config.interface_file, "codec.h");
    }

    #[test]
    fn test_config_without_source_header_includes_input_header() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let header = dir.path().join("shapes.h");
        std::fs::write(
            &header,
            "typedef struct { int16_t x; int16_t y; } Point;\n\
             typedef struct { timeval t; Point p; } Stamped;",
        )
        .expect("Failed to write header");
        let config_path = dir.path().join("kissbuf.json");
        std::fs::write(&config_path, r#"{"opaque_types": ["timeval"]}"#)
            .expect("Failed to write config");

        let cli = Cli {
            header,
            out_dir: dir.path().join("out"),
            config: Some(config_path),
            opaque: Vec::new(),
            source_header: None,
            implementation: None,
            interface: None,
        };
        run(&cli).expect("Failed to run");

        let implementation = std::fs::read_to_string(dir.path().join("out/generated_serde.c"))
            .expect("Failed to read implementation");
        let interface = std::fs::read_to_string(dir.path().join("out/generated_serde.h"))
            .expect("Failed to read interface");
        assert!(implementation.contains("#include \"shapes.h\""));
        assert!(interface.contains("#include \"shapes.h\""));
        assert!(!interface.contains("example.h"));
    }

    #[test]
    fn test_run_reports_missing_header() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let cli = Cli {
            header: dir.path().join("missing.h"),
            out_dir: dir.path().join("out"),
            config: None,
            opaque: Vec::new(),
            source_header: None,
            implementation: None,
            interface: None,
        };

        let err = run(&cli).expect_err("missing header should fail");
        assert!(format!("{err:#}").contains("failed to generate codecs"));
        assert!(!dir.path().join("out").exists());
    }
}
