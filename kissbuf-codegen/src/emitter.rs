//! Writing generated units to disk.

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::generator::GeneratedUnits;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths of the files written by [`Emitter::emit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFiles {
    /// Path of the implementation unit.
    pub implementation: PathBuf,
    /// Path of the interface unit.
    pub interface: PathBuf,
}

/// Writes generated units into an output directory.
#[derive(Debug, Clone)]
pub struct Emitter {
    out_dir: PathBuf,
}

impl Emitter {
    /// Creates an emitter targeting `out_dir`.
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Writes both units, creating the output directory if needed.
    ///
    /// Existing files with the configured names are overwritten.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if the directory or a file cannot be written.
    pub fn emit(
        &self,
        config: &GeneratorConfig,
        units: &GeneratedUnits,
    ) -> Result<EmittedFiles, CodegenError> {
        fs::create_dir_all(&self.out_dir)?;

        let implementation = self.out_dir.join(&config.implementation_file);
        let interface = self.out_dir.join(&config.interface_file);

        write_unit(&interface, &units.interface)?;
        write_unit(&implementation, &units.implementation)?;

        Ok(EmittedFiles {
            implementation,
            interface,
        })
    }
}

fn write_unit(path: &Path, contents: &str) -> Result<(), CodegenError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote generated unit");
    Ok(())
}
