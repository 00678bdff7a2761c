/// Reports a recoverable condition at `$level`, or returns it as an error when
/// `$level` is at or above the state's `fail_level`.
///
/// `$state` must expose a `fail_level: log::Level` field.
#[macro_export]
macro_rules! log_or_err {
    ($state:expr, $level:expr, $err:expr $(,)?) => {{
        if $level <= $state.fail_level {
            return Err($err.into());
        } else {
            match $level {
                ::log::Level::Error => ::log::error!("{}", $err),
                ::log::Level::Warn => ::log::warn!("{}", $err),
                ::log::Level::Info => ::log::info!("{}", $err),
                ::log::Level::Debug => ::log::debug!("{}", $err),
                ::log::Level::Trace => ::log::trace!("{}", $err),
            }
        }
    }};
}

#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("Could not classify playlist: no known extension and no content marker")]
    Unclassified,

    #[error("Unknown playlist dialect name: {0:?}")]
    UnknownDialect(String),

    #[error("Failed to peek stream content: {0}")]
    Peek(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("Record {index} exceeds {limit} bytes and was discarded")]
    RecordOverflow { index: usize, limit: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum DemuxError {
    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error("Upstream read failed after {emitted} entries: {source}")]
    Io {
        emitted: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Sink rejected entry at position {position}: {source}")]
    Sink {
        position: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("Strict mode: {0}")]
    Strict(#[from] SplitError),
}
