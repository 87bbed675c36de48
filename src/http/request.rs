use crate::http::{Cookie, CookieSet, HeaderMap, HeaderValue, Method, Request, Uri};
use http::header::COOKIE;

/// The HTTP request header consists of a method, uri, cookie set, and a set of
/// header fields.
pub struct RequestHeader {
  method: Method,
  uri: Uri,
  headers: HeaderMap<HeaderValue>,
  cookies: CookieSet,
}

impl RequestHeader {
  /// Captures the header of `req`, parsing its `Cookie` headers into a
  /// read-only [`CookieSet`].
  pub fn from_request(req: &Request) -> Self {
    Self {
      method: req.method().clone(),
      uri: req.uri().clone(),
      headers: req.headers().clone(),
      cookies: cookies_from_headers(req.headers()),
    }
  }

  pub fn method(&self) -> &Method {
    &self.method
  }

  pub fn uri(&self) -> &Uri {
    &self.uri
  }

  pub fn headers(&self) -> &HeaderMap<HeaderValue> {
    &self.headers
  }

  /// The cookies sent by the client. The set is read-only.
  pub fn cookies(&self) -> &CookieSet {
    &self.cookies
  }
}

/// Parses the value of a `Cookie` request header.
///
/// Pairs are separated by `;` and percent-decoded; malformed pairs are
/// skipped.
pub fn parse_cookie_header(header: &str) -> Vec<Cookie> {
  cookie::Cookie::split_parse_encoded(header)
    .filter_map(|pair| match pair {
      Ok(raw) => Some(Cookie::from(&raw)),
      Err(err) => {
        tracing::debug!(error = %err, "skipping malformed cookie pair");
        None
      }
    })
    .collect()
}

/// Builds a read-only [`CookieSet`] from every `Cookie` header in `headers`.
pub fn cookies_from_headers(headers: &HeaderMap<HeaderValue>) -> CookieSet {
  let parsed = headers
    .get_all(COOKIE)
    .iter()
    .filter_map(|value| match value.to_str() {
      Ok(value) => Some(value),
      Err(_) => {
        tracing::debug!("skipping non-ASCII cookie header");
        None
      }
    })
    .flat_map(parse_cookie_header);

  let mut cookies = CookieSet::read_only();
  cookies.replace_all(parsed);
  tracing::debug!(count = cookies.len(), "parsed request cookies");
  cookies
}

pub fn cookies_from_request(req: &Request) -> CookieSet {
  cookies_from_headers(req.headers())
}
