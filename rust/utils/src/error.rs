use std::{error::Error as StdError, fmt::Display};

/// Transport-level failure, optionally wrapped in layers of context.
#[derive(Debug)]
pub enum Error {
    Context {
        msg: String,
        source: Box<Error>,
    },
    Internal {
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Context { msg, .. } => write!(f, "{}", msg),
            Error::Internal { source } => write!(f, "{}", source),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Context { source, .. } => Some(source.as_ref()),
            Error::Internal { source } => Some(source.as_ref()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn internal(e: impl StdError + Send + Sync + 'static) -> Self {
        Self::Internal {
            source: Box::new(e),
        }
    }

    pub fn internal_msg(msg: impl Into<String>) -> Self {
        Self::internal(StringError(msg.into()))
    }
}

#[derive(Debug)]
struct StringError(String);

impl Display for StringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for StringError {}

pub trait IntoInternal<T> {
    fn internal(self) -> Result<T>;
}

impl<T, E: StdError + Send + Sync + 'static> IntoInternal<T> for std::result::Result<T, E> {
    fn internal(self) -> Result<T> {
        self.map_err(Error::internal)
    }
}

pub trait ContextExt<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T> ContextExt<T> for Result<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::Context {
            msg: context.into(),
            source: Box::new(e),
        })
    }
}

/// Attaches lazily built context to a foreign error, wrapping it as internal first.
pub trait ResultExt<T> {
    fn error_with_context<C: Into<String>, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T, E: StdError + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn error_with_context<C: Into<String>, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Context {
            msg: f().into(),
            source: Box::new(Error::internal(e)),
        })
    }
}
