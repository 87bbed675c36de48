use crate::config::Config;
use crate::error::{Error, Result};
use std::fmt;
use time::{Duration, OffsetDateTime};

#[doc(inline)]
pub use cookie::SameSite;

/// The expiry written on tombstones.
///
/// Browsers only need a point in the past; the epoch renders as
/// `Thu, 01 Jan 1970 00:00:00 GMT`.
pub const TOMBSTONE_EXPIRY: OffsetDateTime = OffsetDateTime::UNIX_EPOCH;

/// A single HTTP cookie.
///
/// A cookie with an empty value and an expiry in the past is a *tombstone*:
/// writing it to a response tells the client to delete the cookie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cookie {
  /// the name, unique within a `CookieSet`
  pub name: String,

  pub value: String,

  /// when the cookie expires; `None` is a session cookie
  pub expire: Option<OffsetDateTime>,

  pub domain: Option<String>,

  pub path: Option<String>,

  /// only send the cookie over HTTPS
  pub secure: bool,

  /// hide the cookie from client-side scripts
  pub http_only: bool,

  pub same_site: Option<SameSite>,
}

impl Cookie {
  /// Creates a session cookie with the default attributes: path `/`,
  /// `HttpOnly` and `SameSite=Lax`.
  pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self::with_config(name, value, &Config::default())
  }

  /// Creates a session cookie carrying the attribute defaults of `config`.
  pub fn with_config(name: impl Into<String>, value: impl Into<String>, config: &Config) -> Self {
    Self {
      name: name.into(),
      value: value.into(),
      expire: None,
      domain: config.domain.clone(),
      path: config.path.clone(),
      secure: config.secure,
      http_only: config.http_only,
      same_site: config.same_site,
    }
  }

  /// Sets the expiry time
  pub fn expire(mut self, expire: impl Into<Option<OffsetDateTime>>) -> Self {
    self.expire = expire.into();
    self
  }

  pub fn domain(mut self, domain: impl Into<Option<String>>) -> Self {
    self.domain = domain.into();
    self
  }

  pub fn path(mut self, path: impl Into<Option<String>>) -> Self {
    self.path = path.into();
    self
  }

  pub fn secure(mut self, secure: bool) -> Self {
    self.secure = secure;
    self
  }

  pub fn http_only(mut self, http_only: bool) -> Self {
    self.http_only = http_only;
    self
  }

  pub fn same_site(mut self, same_site: impl Into<Option<SameSite>>) -> Self {
    self.same_site = same_site.into();
    self
  }

  /// Turns the cookie into a tombstone, keeping its scope attributes so the
  /// client matches the cookie it already holds.
  pub fn into_tombstone(mut self) -> Self {
    self.value.clear();
    self.expire = Some(TOMBSTONE_EXPIRY);
    self
  }

  /// Returns true if the cookie has an expiry before `now`.
  pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
    self.expire.map_or(false, |expire| expire < now)
  }

  pub fn is_expired(&self) -> bool {
    self.is_expired_at(OffsetDateTime::now_utc())
  }

  /// Returns true if the cookie signals deletion rather than storage.
  pub fn is_tombstone_at(&self, now: OffsetDateTime) -> bool {
    self.value.is_empty() && self.is_expired_at(now)
  }

  pub fn is_tombstone(&self) -> bool {
    self.is_tombstone_at(OffsetDateTime::now_utc())
  }

  /// Returns true if the cookie holds a value and has not expired at `now`.
  pub fn is_live_at(&self, now: OffsetDateTime) -> bool {
    !self.value.is_empty() && !self.is_expired_at(now)
  }

  /// Converts into a `cookie::Cookie`, deriving `Max-Age` from the expiry
  /// relative to `now`.
  pub fn to_raw_at(&self, now: OffsetDateTime) -> cookie::Cookie<'static> {
    let mut raw = cookie::Cookie::build((self.name.clone(), self.value.clone()))
      .secure(self.secure)
      .http_only(self.http_only)
      .build();

    if let Some(expire) = self.expire {
      let max_age = if expire > now { expire - now } else { Duration::ZERO };
      raw.set_expires(expire);
      raw.set_max_age(max_age);
    }
    if let Some(domain) = &self.domain {
      raw.set_domain(domain.clone());
    }
    if let Some(path) = &self.path {
      raw.set_path(path.clone());
    }
    if let Some(same_site) = self.same_site {
      raw.set_same_site(same_site);
    }

    raw
  }

  /// Checks that the name is an RFC 6265 token and that `Domain` and `Path`
  /// cannot smuggle in extra attributes. Values need no check since they are
  /// percent-encoded on output.
  pub fn validate(&self) -> Result<()> {
    let invalid = |reason| Error::InvalidCookie {
      name: self.name.clone(),
      reason,
    };

    if self.name.is_empty() {
      return Err(invalid("name is empty"));
    }
    if !self.name.bytes().all(is_token_byte) {
      return Err(invalid("name is not a token"));
    }
    if self.domain.as_deref().map_or(false, breaks_attribute) {
      return Err(invalid("domain contains `;` or a control character"));
    }
    if self.path.as_deref().map_or(false, breaks_attribute) {
      return Err(invalid("path contains `;` or a control character"));
    }
    Ok(())
  }

  /// Renders the `Set-Cookie` value at `now`, percent-encoding the name and
  /// value.
  pub fn encode_at(&self, now: OffsetDateTime) -> Result<String> {
    self.validate()?;
    Ok(self.to_raw_at(now).encoded().to_string())
  }
}

fn is_token_byte(b: u8) -> bool {
  b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
}

fn breaks_attribute(attr: &str) -> bool {
  attr.bytes().any(|b| b == b';' || b.is_ascii_control())
}

impl<'c> From<&cookie::Cookie<'c>> for Cookie {
  fn from(raw: &cookie::Cookie<'c>) -> Self {
    Self {
      name: raw.name().to_string(),
      value: raw.value().to_string(),
      expire: raw.expires_datetime(),
      domain: raw.domain().map(str::to_string),
      path: raw.path().map(str::to_string),
      secure: raw.secure().unwrap_or(false),
      http_only: raw.http_only().unwrap_or(false),
      same_site: raw.same_site(),
    }
  }
}

/// Renders the cookie as a percent-encoded `Set-Cookie` header value without
/// validating it; see [`Cookie::validate`].
impl fmt::Display for Cookie {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.to_raw_at(OffsetDateTime::now_utc()).encoded())
  }
}
