use http::header::InvalidHeaderValue;

/// A specialized `Result` type for cookie operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by a [`CookieSet`](crate::http::CookieSet) and the
/// response writer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// A mutating operation was called on a read-only cookie set.
  #[error("cannot {operation}: the cookie set is read-only")]
  ReadOnly {
    /// the rejected operation, e.g. `add`
    operation: &'static str,
  },

  /// A cookie name or attribute would break `Set-Cookie` syntax.
  #[error("invalid cookie `{name}`: {reason}")]
  InvalidCookie { name: String, reason: &'static str },

  /// A cookie could not be encoded as a `Set-Cookie` header value.
  #[error("cookie `{name}` is not a valid header value")]
  InvalidHeader {
    name: String,
    #[source]
    source: InvalidHeaderValue,
  },
}
