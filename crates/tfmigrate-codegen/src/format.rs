//! Validation and canonical formatting of generated sources.

use crate::SynthesisError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tfmigrate_go::{first_syntax_error, parse_go};

/// When to pipe generated sources through `gofmt`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GofmtMode {
    /// Use `gofmt` if it is on `PATH`.
    #[default]
    Auto,
    /// Fail if `gofmt` is missing.
    Always,
    Never,
}

/// Parse `source` and reject it if the tree contains any error node.
pub fn validate(artifact: &str, source: &str) -> Result<(), SynthesisError> {
    let tree = parse_go(source)?;
    match first_syntax_error(&tree) {
        Some(at) => Err(SynthesisError::InvalidSource {
            artifact: artifact.to_string(),
            line: at.line,
            column: at.column,
        }),
        None => Ok(()),
    }
}

/// Final stage of every rendered artifact.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    mode: GofmtMode,
    program: Option<PathBuf>,
}

impl Formatter {
    pub fn new(mode: GofmtMode) -> Self {
        Self {
            mode,
            program: None,
        }
    }

    /// Use `program` instead of looking up `gofmt` on `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Validate `source`, then format it if a formatter is in use.
    pub fn finish(&self, artifact: &str, source: String) -> Result<String, SynthesisError> {
        validate(artifact, &source)?;
        match self.locate()? {
            Some(gofmt) => run_gofmt(&gofmt, artifact, &source),
            None => Ok(source),
        }
    }

    fn locate(&self) -> Result<Option<PathBuf>, SynthesisError> {
        if self.mode == GofmtMode::Never {
            return Ok(None);
        }
        let program = self
            .program
            .clone()
            .unwrap_or_else(|| PathBuf::from("gofmt"));
        match which::which(&program) {
            Ok(path) => Ok(Some(path)),
            Err(_) if self.mode == GofmtMode::Auto => {
                tracing::debug!(
                    program = %program.display(),
                    "gofmt not found, keeping generated layout"
                );
                Ok(None)
            }
            Err(_) => Err(SynthesisError::GofmtNotFound),
        }
    }
}

fn run_gofmt(program: &Path, artifact: &str, source: &str) -> Result<String, SynthesisError> {
    let spawn_err = |source| SynthesisError::Spawn {
        program: program.to_path_buf(),
        source,
    };
    let mut child = Command::new(program)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_err)?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(source.as_bytes()).map_err(spawn_err)?;
    }
    let output = child.wait_with_output().map_err(spawn_err)?;

    if !output.status.success() {
        return Err(SynthesisError::Gofmt {
            artifact: artifact.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    tracing::debug!(artifact, "formatted with gofmt");
    String::from_utf8(output.stdout).map_err(|_| SynthesisError::Gofmt {
        artifact: artifact.to_string(),
        stderr: "output is not valid UTF-8".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_broken_source() {
        let err = validate("main.go", "package main\n\nfunc main() {\n").unwrap_err();
        let SynthesisError::InvalidSource { artifact, .. } = &err else {
            panic!("expected invalid source, got {err}");
        };
        assert_eq!(artifact, "main.go");
        assert!(validate("main.go", "package main\n\nfunc main() {}\n").is_ok());
    }

    #[test]
    fn test_never_keeps_layout() {
        let source = "package main\n\nfunc main() {}\n".to_string();
        let out = Formatter::new(GofmtMode::Never)
            .finish("main.go", source.clone())
            .unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn test_always_requires_gofmt() {
        let err = Formatter::new(GofmtMode::Always)
            .with_program("/nonexistent/bin/gofmt")
            .finish("main.go", "package main\n".to_string())
            .unwrap_err();
        assert!(matches!(err, SynthesisError::GofmtNotFound));
    }

    #[test]
    fn test_auto_without_gofmt_keeps_layout() {
        let out = Formatter::new(GofmtMode::Auto)
            .with_program("/nonexistent/bin/gofmt")
            .finish("main.go", "package main\n".to_string())
            .unwrap();
        assert_eq!(out, "package main\n");
    }
}
