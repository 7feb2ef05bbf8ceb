use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every fallible operation in this crate resolves to one of these.
///
/// Store operations only ever produce [`Error::Transport`] or
/// [`Error::Query`]; [`Error::Config`] can only come out of
/// [`StoreConfig`](crate::StoreConfig) construction, before any request is
/// made.
#[derive(Debug, Error)]
pub enum Error {
    /// The service could not be reached, the connection failed mid-request,
    /// or a successful response carried an unreadable body.
    #[error("record store request failed: {0}")]
    Transport(String),

    /// The service answered and rejected the query.
    #[error("record store rejected the query (http {status}): {message}")]
    Query { status: u16, message: String },

    /// The environment configuration is missing or malformed.
    #[error("invalid store configuration: {0}")]
    Config(String),
}
