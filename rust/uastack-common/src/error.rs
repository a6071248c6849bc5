use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_handle() -> Error {
        Error(ErrorKind::InvalidHandle.into())
    }

    pub fn invalid_state(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidState { name: name.into() }.into())
    }

    /// Capacity ceiling hit: `requested` bytes of capacity were needed, but the
    /// buffer may not grow past `limit`.
    pub fn out_of_memory(requested: usize, limit: usize) -> Error {
        Error(ErrorKind::OutOfMemory { requested, limit }.into())
    }

    /// The allocator refused to provide `requested` bytes.
    pub fn alloc_failed(requested: usize) -> Error {
        Self::out_of_memory(requested, 0)
    }

    pub fn end_of_stream(requested: usize, available: usize) -> Error {
        Error(
            ErrorKind::EndOfStream {
                requested,
                available,
            }
            .into(),
        )
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }

    pub fn is_invalid_arg(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidArgument { .. })
    }

    pub fn is_invalid_handle(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidHandle)
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidState { .. })
    }

    pub fn is_out_of_memory(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfMemory { .. })
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self.kind(), ErrorKind::EndOfStream { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid handle: the buffer was released or never initialized")]
    InvalidHandle,

    #[error("invalid state for {name}")]
    InvalidState { name: String },

    #[error(
        "out of memory: {requested} bytes requested{}",
        if *limit == 0 { String::new() } else { format!(", limit is {limit}") })]
    OutOfMemory { requested: usize, limit: usize },

    #[error("unexpected end of stream: {requested} bytes requested, {available} available")]
    EndOfStream { requested: usize, available: usize },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        // Errors that made a round trip through `std::io` are unwrapped.
        match e.downcast::<Error>() {
            Ok(err) => err,
            Err(e) => Error::io("", e),
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        let kind = match e.kind() {
            ErrorKind::InvalidArgument { .. } => std::io::ErrorKind::InvalidInput,
            ErrorKind::OutOfMemory { .. } => std::io::ErrorKind::OutOfMemory,
            ErrorKind::EndOfStream { .. } => std::io::ErrorKind::UnexpectedEof,
            ErrorKind::Io { source, .. } => source.kind(),
            ErrorKind::InvalidHandle | ErrorKind::InvalidState { .. } => {
                std::io::ErrorKind::Other
            }
        };
        std::io::Error::new(kind, e)
    }
}

impl From<std::convert::Infallible> for Error {
    fn from(e: std::convert::Infallible) -> Self {
        match e {}
    }
}
