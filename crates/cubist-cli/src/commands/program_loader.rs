use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use cubist_core::Program;
use cubist_lib::RuleRegistry;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}': {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: cubist_lib::Error,
    },

    #[error("'{}' is empty", path.display())]
    Empty { path: PathBuf },
}

/// Reads a file, or stdin when the path is "-".
pub fn read_input(path: &Path) -> Result<String, LoadError> {
    let read = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        fs::read_to_string(path)
    };
    let text = read.map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if text.trim().is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(text)
}

pub fn load_program(path: &Path) -> Result<Program, LoadError> {
    let json = read_input(path)?;
    let program = cubist_lib::load_program(&json).map_err(|source| LoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        declarations = program.declarations.len(),
        "program loaded"
    );
    Ok(program)
}

/// The registry at `path`, or the built-in one.
pub fn load_rules(path: Option<&Path>) -> Result<RuleRegistry, LoadError> {
    let Some(path) = path else {
        return Ok(RuleRegistry::built_in());
    };
    let json = read_input(path)?;
    RuleRegistry::from_json(&json).map_err(|source| LoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Report target for a program path: the file stem, or "stdin".
pub fn default_target(path: &Path) -> String {
    if path.as_os_str() == "-" {
        return "stdin".to_string();
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
