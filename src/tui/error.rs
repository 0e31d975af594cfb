use thiserror;

/// The Result type for the terminal front end.
pub(crate) type Result<T> = std::result::Result<T, TuiError>;

pub struct TuiError {
    bt: std::backtrace::Backtrace,
    pub(crate) inner: InnerError,
}

impl TuiError {
    pub(crate) fn is_terminal_too_small(&self) -> bool {
        matches!(self.inner, InnerError::TerminalTooSmall(..))
    }
}

impl std::fmt::Debug for TuiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{0:?}\n{1}", self.inner, self.bt)
    }
}

impl std::fmt::Display for TuiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{0}\n{1}", self.inner, self.bt)
    }
}

impl std::error::Error for TuiError {}

impl From<std::io::Error> for TuiError {
    fn from(inner: std::io::Error) -> TuiError {
        InnerError::StdIOError(inner).into()
    }
}

impl From<anyhow::Error> for TuiError {
    fn from(inner: anyhow::Error) -> TuiError {
        InnerError::AnyhowError { source: inner }.into()
    }
}

impl From<InnerError> for TuiError {
    fn from(inner: InnerError) -> Self {
        Self {
            bt: std::backtrace::Backtrace::capture(),
            inner,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum InnerError {
    #[error("terminal too small, required minimum size {0} x {1}")]
    TerminalTooSmall(usize, usize),

    #[error("io error")]
    StdIOError(#[from] std::io::Error),

    #[error("{source:?}")]
    AnyhowError {
        #[from]
        source: anyhow::Error,
    },
}
