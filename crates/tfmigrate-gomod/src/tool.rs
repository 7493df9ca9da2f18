//! External `go` invocations.

use crate::ToolError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A located `go` binary.
#[derive(Debug, Clone)]
pub struct GoTool {
    program: PathBuf,
}

impl GoTool {
    /// Find `program` (default `go`) on `PATH`.
    pub fn locate(program: Option<&Path>) -> Result<Self, ToolError> {
        let name = program.unwrap_or_else(|| Path::new("go"));
        let program = which::which(name).map_err(|_| ToolError::NotFound {
            program: name.display().to_string(),
        })?;
        tracing::debug!(program = %program.display(), "located go toolchain");
        Ok(Self { program })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `go mod download <module>@<version>` in `root`.
    pub fn download(&self, root: &Path, module: &str, version: &str) -> Result<(), ToolError> {
        self.run(root, &["mod", "download", &format!("{module}@{version}")])
    }

    /// `go mod vendor` in `root`.
    pub fn vendor(&self, root: &Path) -> Result<(), ToolError> {
        self.run(root, &["mod", "vendor"])
    }

    fn run(&self, root: &Path, args: &[&str]) -> Result<(), ToolError> {
        let command = format!("go {}", args.join(" "));
        tracing::info!(%command, dir = %root.display(), "running");
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(root)
            .output()
            .map_err(|source| ToolError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;
        if output.status.success() {
            return Ok(());
        }
        Err(ToolError::Failed {
            command,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
