use crate::error::{Error, Result};
use crate::http::{Cookie, CookieSet, HeaderMap, HeaderValue, Response};
use http::header::SET_COOKIE;
use std::fmt;
use time::OffsetDateTime;

type CookieFilter = Box<dyn Fn(&Cookie) -> bool + Send + Sync>;

/// Renders a [`CookieSet`] into the `Set-Cookie` headers of a response.
///
/// ```
/// use turbofish_cookies::http::{Body, Cookie, CookieSet, Response, ResponseCookies};
///
/// let mut cookies = CookieSet::new();
/// cookies.add(Cookie::new("sid", "abc"))?;
/// cookies.add(Cookie::new("tracking", "xyz"))?;
///
/// let mut res = Response::new(Body::empty());
/// let written = ResponseCookies::new()
///   .filter(|cookie| cookie.name != "tracking")
///   .apply(cookies, &mut res)?;
/// assert_eq!(written, 1);
/// # Ok::<(), turbofish_cookies::Error>(())
/// ```
#[derive(Default)]
pub struct ResponseCookies {
  /// application policy deciding which live cookies are sent
  filter: Option<CookieFilter>,
}

impl ResponseCookies {
  pub fn new() -> Self {
    Self::default()
  }

  /// Only emit cookies accepted by `filter`. Tombstones are always emitted.
  pub fn filter<F>(mut self, filter: F) -> Self
  where
    F: Fn(&Cookie) -> bool + Send + Sync + 'static,
  {
    self.filter = Some(Box::new(filter));
    self
  }

  fn accepts(&self, cookie: &Cookie, now: OffsetDateTime) -> bool {
    cookie.is_tombstone_at(now) || self.filter.as_ref().map_or(true, |filter| filter(cookie))
  }

  /// Appends one `Set-Cookie` header per accepted cookie, in insertion order,
  /// and returns how many were written.
  pub fn write(&self, cookies: &CookieSet, headers: &mut HeaderMap<HeaderValue>) -> Result<usize> {
    let now = OffsetDateTime::now_utc();
    let mut written = 0;

    for (name, cookie) in cookies {
      if !self.accepts(cookie, now) {
        tracing::trace!(cookie = %name, "cookie filtered out of response");
        continue;
      }
      headers.append(SET_COOKIE, header_value_at(cookie, now)?);
      written += 1;
    }

    tracing::debug!(count = written, "wrote response cookies");
    Ok(written)
  }

  /// Writes `cookies` into `res`, consuming the set.
  pub fn apply(&self, cookies: CookieSet, res: &mut Response) -> Result<usize> {
    self.write(&cookies, res.headers_mut())
  }
}

impl fmt::Debug for ResponseCookies {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ResponseCookies")
      .field("filter", &self.filter.is_some())
      .finish()
  }
}

/// Renders `cookie` as a `Set-Cookie` header value. The name and value are
/// percent-encoded; names that are not tokens are rejected.
pub fn set_cookie_header(cookie: &Cookie) -> Result<HeaderValue> {
  header_value_at(cookie, OffsetDateTime::now_utc())
}

/// Appends a `Set-Cookie` header for every cookie in `cookies`.
pub fn write_cookies(cookies: &CookieSet, headers: &mut HeaderMap<HeaderValue>) -> Result<usize> {
  ResponseCookies::new().write(cookies, headers)
}

fn header_value_at(cookie: &Cookie, now: OffsetDateTime) -> Result<HeaderValue> {
  HeaderValue::from_str(&cookie.encode_at(now)?).map_err(|source| {
    Error::InvalidHeader {
      name: cookie.name.clone(),
      source,
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::http::Body;
  use time::Duration;

  fn rendered(headers: &HeaderMap) -> Vec<&str> {
    headers
      .get_all(SET_COOKIE)
      .iter()
      .map(|value| value.to_str().unwrap())
      .collect()
  }

  #[test]
  fn writes_one_header_per_cookie_in_order() {
    let mut cookies = CookieSet::new();
    cookies.add(Cookie::new("b", "2")).unwrap();
    cookies.add(Cookie::new("a", "1")).unwrap();

    let mut headers = HeaderMap::new();
    assert_eq!(write_cookies(&cookies, &mut headers).unwrap(), 2);

    let values = rendered(&headers);
    assert!(values[0].starts_with("b=2"));
    assert!(values[1].starts_with("a=1"));
  }

  #[test]
  fn renders_all_attributes() {
    let cookie = Cookie::new("sid", "abc")
      .expire(OffsetDateTime::now_utc() + Duration::days(1))
      .domain("example.com".to_string())
      .path("/app".to_string())
      .secure(true);

    let value = set_cookie_header(&cookie).unwrap();
    let value = value.to_str().unwrap();
    assert!(value.starts_with("sid=abc"));
    assert!(value.contains("Domain=example.com"));
    assert!(value.contains("Path=/app"));
    assert!(value.contains("Secure"));
    assert!(value.contains("HttpOnly"));
    assert!(value.contains("SameSite=Lax"));
    assert!(value.contains("Expires="));
    assert!(value.contains("Max-Age="));
  }

  #[test]
  fn tombstones_expire_in_the_past() {
    let mut cookies = CookieSet::new();
    cookies.add(Cookie::new("sid", "abc")).unwrap();
    cookies.mark_for_deletion("sid").unwrap();

    let mut headers = HeaderMap::new();
    write_cookies(&cookies, &mut headers).unwrap();

    let values = rendered(&headers);
    assert_eq!(values.len(), 1);
    assert!(values[0].starts_with("sid=;") || values[0] == "sid=");
    assert!(values[0].contains("Max-Age=0"));
    assert!(values[0].contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
  }

  #[test]
  fn discarded_cookies_are_not_written() {
    let mut cookies = CookieSet::new();
    cookies.add(Cookie::new("sid", "abc")).unwrap();
    cookies.discard("sid").unwrap();

    let mut headers = HeaderMap::new();
    assert_eq!(write_cookies(&cookies, &mut headers).unwrap(), 0);
    assert!(!headers.contains_key(SET_COOKIE));
  }

  #[test]
  fn filter_keeps_tombstones() {
    let mut cookies = CookieSet::new();
    cookies.add(Cookie::new("keep", "1")).unwrap();
    cookies.add(Cookie::new("drop", "2")).unwrap();
    cookies.add(Cookie::new("gone", "3")).unwrap();
    cookies.mark_for_deletion("gone").unwrap();

    let mut res = Response::new(Body::empty());
    let written = ResponseCookies::new()
      .filter(|cookie| cookie.name == "keep")
      .apply(cookies, &mut res)
      .unwrap();

    assert_eq!(written, 2);
    let values = rendered(res.headers());
    assert!(values[0].starts_with("keep=1"));
    assert!(values[1].starts_with("gone="));
  }

  #[test]
  fn invalid_name_is_an_error() {
    let cookie = Cookie::new("a=b", "v");
    let err = set_cookie_header(&cookie).unwrap_err();
    assert!(matches!(err, Error::InvalidCookie { ref name, .. } if name == "a=b"));
  }

  #[test]
  fn value_with_separators_stays_one_attribute() {
    let cookie = Cookie::new("sid", "x; Domain=evil.com; Path=/admin");
    let value = set_cookie_header(&cookie).unwrap();
    let value = value.to_str().unwrap();

    assert!(!value.contains("Domain=evil.com"));
    assert_eq!(value.matches("Path=").count(), 1);
    assert!(value.contains("Path=/;") || value.ends_with("Path=/"));
  }

  #[test]
  fn one_bad_cookie_fails_the_write() {
    let mut cookies = CookieSet::new();
    cookies.add(Cookie::new("ok", "1")).unwrap();
    cookies.add(Cookie::new("bad name", "2")).unwrap();

    let mut headers = HeaderMap::new();
    assert!(write_cookies(&cookies, &mut headers).is_err());
  }
}
