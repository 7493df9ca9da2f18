//! `go.mod` reading and requirement editing.
//!
//! Edits are line-based so everything the migrator does not touch (comments,
//! `replace` blocks, spacing) survives byte for byte.

use crate::ModuleError;
use crate::version::GoVersion;
use std::fmt;
use std::path::{Path, PathBuf};

/// One `require` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Require {
    pub path: String,
    pub version: String,
    /// Marked `// indirect`.
    pub indirect: bool,
    line: usize,
}

/// A requirement added or raised by [`GoMod::ensure_requires`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequireChange {
    Added {
        path: String,
        version: String,
    },
    Upgraded {
        path: String,
        from: String,
        to: String,
    },
}

impl fmt::Display for RequireChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { path, version } => write!(f, "require {path} {version}"),
            Self::Upgraded { path, from, to } => write!(f, "upgrade {path} {from} -> {to}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Top,
    Require,
    Other,
}

/// A parsed `go.mod`.
#[derive(Debug, Clone)]
pub struct GoMod {
    lines: Vec<String>,
    trailing_newline: bool,
    module: Option<String>,
    go_version: Option<String>,
    requires: Vec<Require>,
    /// Line index of the `)` closing the first `require (` block.
    first_block_end: Option<usize>,
}

impl GoMod {
    /// Read and parse `<root>/go.mod`.
    pub fn read(path: &Path) -> Result<Self, ModuleError> {
        let content = std::fs::read_to_string(path).map_err(|source| ModuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|(line, message)| ModuleError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        })
    }

    /// Parse `go.mod` content. Errors carry a 1-based line number.
    pub fn parse(content: &str) -> Result<Self, (usize, String)> {
        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        let mut gomod = Self {
            lines,
            trailing_newline: content.is_empty() || content.ends_with('\n'),
            module: None,
            go_version: None,
            requires: Vec::new(),
            first_block_end: None,
        };

        let mut section = Section::Top;
        for (i, raw) in gomod.lines.iter().enumerate() {
            let (code, comment) = split_comment(raw);
            let code = code.trim();
            if code.is_empty() {
                continue;
            }

            if section != Section::Top {
                if code == ")" {
                    if section == Section::Require && gomod.first_block_end.is_none() {
                        gomod.first_block_end = Some(i);
                    }
                    section = Section::Top;
                } else if section == Section::Require {
                    gomod.requires.push(parse_require(code, comment, i)?);
                }
                continue;
            }

            let (verb, rest) = code.split_once(char::is_whitespace).unwrap_or((code, ""));
            let rest = rest.trim();
            match verb {
                "module" => gomod.module = Some(unquote(rest).to_string()),
                "go" => gomod.go_version = Some(rest.to_string()),
                "require" if rest == "(" => section = Section::Require,
                "require" => gomod.requires.push(parse_require(rest, comment, i)?),
                _ if rest.ends_with('(') => section = Section::Other,
                _ => {}
            }
        }

        if section != Section::Top {
            return Err((gomod.lines.len(), "unterminated block".to_string()));
        }
        Ok(gomod)
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn go_version(&self) -> Option<&str> {
        self.go_version.as_deref()
    }

    pub fn requires(&self) -> &[Require] {
        &self.requires
    }

    /// Required version of `path`, if any.
    pub fn require(&self, path: &str) -> Option<&Require> {
        self.requires.iter().find(|r| r.path == path)
    }

    /// Make sure every `(path, version)` is required at `version` or later.
    ///
    /// Missing modules are appended to the first `require ( ... )` block, or
    /// a new block is added at the end. Lower versions are raised in place.
    /// Requirements whose current version cannot be parsed are left alone.
    pub fn ensure_requires(&mut self, wanted: &[(&str, &str)]) -> Vec<RequireChange> {
        let mut changes = Vec::new();
        let mut missing = Vec::new();

        for &(path, version) in wanted {
            let Some(index) = self.requires.iter().position(|r| r.path == path) else {
                missing.push((path, version));
                continue;
            };
            let current = &self.requires[index];
            let (Some(have), Some(want)) =
                (GoVersion::parse(&current.version), GoVersion::parse(version))
            else {
                tracing::warn!(
                    path,
                    version = %current.version,
                    "unparseable version left unchanged"
                );
                continue;
            };
            if have >= want {
                continue;
            }
            let from = current.version.clone();
            let line = current.line;
            self.lines[line] = replace_version(&self.lines[line], path, &from, version);
            self.requires[index].version = version.to_string();
            changes.push(RequireChange::Upgraded {
                path: path.to_string(),
                from,
                to: version.to_string(),
            });
        }

        if missing.is_empty() {
            return changes;
        }

        let new_lines: Vec<String> = missing
            .iter()
            .map(|(path, version)| format!("\t{path} {version}"))
            .collect();
        match self.first_block_end {
            Some(end) => {
                let count = new_lines.len();
                self.lines.splice(end..end, new_lines);
                self.shift_lines(end, count);
                self.first_block_end = Some(end + count);
                for (offset, (path, version)) in missing.iter().enumerate() {
                    self.requires.push(Require {
                        path: path.to_string(),
                        version: version.to_string(),
                        indirect: false,
                        line: end + offset,
                    });
                }
            }
            None => {
                if self.lines.last().is_some_and(|l| !l.trim().is_empty()) {
                    self.lines.push(String::new());
                }
                self.lines.push("require (".to_string());
                let start = self.lines.len();
                self.lines.extend(new_lines);
                self.first_block_end = Some(self.lines.len());
                self.lines.push(")".to_string());
                self.trailing_newline = true;
                for (offset, (path, version)) in missing.iter().enumerate() {
                    self.requires.push(Require {
                        path: path.to_string(),
                        version: version.to_string(),
                        indirect: false,
                        line: start + offset,
                    });
                }
            }
        }

        changes.extend(missing.into_iter().map(|(path, version)| RequireChange::Added {
            path: path.to_string(),
            version: version.to_string(),
        }));
        changes
    }

    fn shift_lines(&mut self, from: usize, by: usize) {
        for req in &mut self.requires {
            if req.line >= from {
                req.line += by;
            }
        }
    }
}

impl fmt::Display for GoMod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))?;
        if self.trailing_newline && !self.lines.is_empty() {
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Nearest ancestor of `start` (inclusive) containing `go.mod`.
pub fn find_module_root(start: &Path) -> Result<PathBuf, ModuleError> {
    let absolute = std::path::absolute(start).map_err(|source| ModuleError::Io {
        path: start.to_path_buf(),
        source,
    })?;
    let mut current = if absolute.is_file() {
        absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| absolute.clone())
    } else {
        absolute
    };

    loop {
        if current.join("go.mod").is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ModuleError::NotFound(start.to_path_buf()));
        }
    }
}

fn split_comment(line: &str) -> (&str, &str) {
    match line.find("//") {
        Some(pos) => (&line[..pos], &line[pos + 2..]),
        None => (line, ""),
    }
}

fn parse_require(code: &str, comment: &str, line: usize) -> Result<Require, (usize, String)> {
    let mut fields = code.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(path), Some(version), None) => Ok(Require {
            path: unquote(path).to_string(),
            version: unquote(version).to_string(),
            indirect: comment.trim() == "indirect" || comment.trim().starts_with("indirect;"),
            line,
        }),
        _ => Err((line + 1, format!("malformed require: {code}"))),
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

fn replace_version(line: &str, path: &str, from: &str, to: &str) -> String {
    // replace the version token that follows the module path
    match line.find(path) {
        Some(at) => {
            let split = at + path.len();
            let (head, tail) = line.split_at(split);
            format!("{head}{}", tail.replacen(from, to, 1))
        }
        None => line.replacen(from, to, 1),
    }
}
