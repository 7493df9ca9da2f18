use std::path::PathBuf;

/// Failure to produce a well-formed artifact.
///
/// `InvalidSource` always indicates a renderer bug, never bad input: the
/// model handed to the renderer has already been validated.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("invalid generated source for {artifact} at {line}:{column}")]
    InvalidSource {
        artifact: String,
        line: usize,
        column: usize,
    },

    #[error("provider alias {alias:?} collides with a generated import")]
    AliasCollision { alias: String },

    #[error("entry point does not reference a provider package")]
    MissingProviderImport,

    #[error("gofmt not found on PATH (output.gofmt = \"always\")")]
    GofmtNotFound,

    #[error("gofmt failed on {artifact}: {stderr}")]
    Gofmt { artifact: String, stderr: String },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] tfmigrate_go::GoError),
}
