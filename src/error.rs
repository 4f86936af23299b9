// Error types for host fact sources and process actions

/// Failure reading a raw OS fact. Never escapes a sampling pass: the
/// assembler logs it and leaves the affected field at its zero value.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A procfs/sysfs file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// A procfs/sysfs file had unexpected contents.
    #[error("failed to parse {path}: {detail}")]
    Parse { path: String, detail: String },

    /// The fact is not exposed on this platform or by this source.
    #[error("{what} is not available on this platform")]
    Unsupported { what: &'static str },
}

/// Failure of an imperative host action. These are surfaced to the caller
/// and never retried.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("no process with pid {0}")]
    ProcessNotFound(u32),

    #[error("failed to signal process {0}")]
    SignalFailed(u32),
}
