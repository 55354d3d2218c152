use std::fmt::{self, Display, Formatter};

/// Classification of a spigot fault.
///
/// `InvalidArgument` and `StateConflict` are caller-usage faults: they are
/// raised synchronously, before any database round trip where possible, and
/// retrying them is pointless. `Session` carries whatever the underlying
/// session implementation raised, unchanged. `Advance` is the single fault
/// kind surfaced by lazy row iteration so consumers of [`crate::Rows`] never
/// need to know the backend's native fault type.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// A required argument was absent or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The call broke a protocol rule (missing bindings, empty batch, ...).
    #[error("illegal state: {0}")]
    StateConflict(String),
    /// Advancing or mapping a row of a lazy result failed.
    #[error("row advance failed: {0}")]
    Advance(#[source] Box<Error>),
    /// Fault raised by the underlying database session.
    #[error(transparent)]
    Session(#[from] anyhow::Error),
}

/// A spigot fault: a primary [`ErrorKind`] plus the ordered list of secondary
/// faults that occurred while cleaning up after it (rollback, autocommit or
/// isolation restore, resource close). Secondary faults never replace the
/// primary one and are never dropped.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    suppressed: Vec<Error>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            suppressed: Vec::new(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    pub fn state_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StateConflict(message.into()))
    }

    pub fn advance(cause: Error) -> Self {
        Self::new(ErrorKind::Advance(Box::new(cause)))
    }

    pub fn session(error: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorKind::Session(error.into()))
    }

    /// Fault raised by a session implementation, from a bare message.
    pub fn msg(message: impl Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::new(ErrorKind::Session(anyhow::Error::msg(message)))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidArgument(..))
    }

    pub fn is_state_conflict(&self) -> bool {
        matches!(self.kind, ErrorKind::StateConflict(..))
    }

    pub fn is_advance(&self) -> bool {
        matches!(self.kind, ErrorKind::Advance(..))
    }

    pub fn is_session(&self) -> bool {
        matches!(self.kind, ErrorKind::Session(..))
    }

    /// Faults that occurred while cleaning up after this one, oldest first.
    pub fn suppressed(&self) -> &[Error] {
        &self.suppressed
    }

    /// Attach a cleanup-time fault to this one.
    pub fn suppress(&mut self, error: Error) {
        self.suppressed.push(error);
    }

    pub fn with_suppressed(mut self, error: Error) -> Self {
        self.suppress(error);
        self
    }
}

/// Records a cleanup step's outcome into `result`: a cleanup fault becomes
/// the primary fault when none is in flight yet, otherwise it is suppressed
/// onto the existing one. A successful step leaves `result` untouched.
pub(crate) fn chain_cleanup<T>(
    result: &mut std::result::Result<T, Error>,
    step: std::result::Result<(), Error>,
) {
    if let Err(next) = step {
        match result {
            Ok(..) => *result = Err(next),
            Err(primary) => primary.suppress(next),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)?;
        for error in &self.suppressed {
            write!(f, "; suppressed: {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Self::session(error)
    }
}
