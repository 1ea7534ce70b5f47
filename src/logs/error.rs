use thiserror::Error;

/// Failures reported by a log producer while opening a stream.
#[derive(Debug, Error)]
pub enum TailError {
    #[error("container `{container}` not found")]
    UnknownContainer { container: String },

    #[error("failed to spawn log stream for `{container}` with command `{command}`: {source}")]
    Spawn {
        container: String,
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("log stream for `{container}` is missing its output pipes")]
    MissingStdio { container: String },

    #[error("log stream rejected: {details}")]
    Rejected { details: String },
}

#[derive(Debug, Error)]
pub enum LogsError {
    #[error("Resource {kind} is not tailable")]
    NotTailable { kind: String },

    #[error(transparent)]
    Start {
        #[from]
        source: TailError,
    },
}
