use crate::http::SameSite;

/// Construction-time options for a [`CookieSet`](crate::http::CookieSet).
///
/// The attribute defaults are applied to cookies created through
/// [`CookieSet::cookie`](crate::http::CookieSet::cookie) and to the tombstones
/// written for names the set has never seen.
#[derive(Clone, Debug)]
pub struct Config {
  pub(crate) read_only: bool,
  pub(crate) path: Option<String>,
  pub(crate) domain: Option<String>,
  pub(crate) secure: bool,
  pub(crate) http_only: bool,
  pub(crate) same_site: Option<SameSite>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      read_only: false,
      path: Some("/".to_string()),
      domain: None,
      secure: false,
      http_only: true,
      same_site: Some(SameSite::Lax),
    }
  }
}

impl Config {
  pub fn builder() -> Self {
    Self::default()
  }

  /// Rejects every mutation on the set (default is false)
  pub fn read_only(mut self, read_only: bool) -> Self {
    self.read_only = read_only;
    self
  }

  /// Sets the default cookie path (default is "/")
  pub fn path(mut self, path: impl Into<Option<String>>) -> Self {
    self.path = path.into();
    self
  }

  /// Sets the default cookie domain
  pub fn domain(mut self, domain: impl Into<Option<String>>) -> Self {
    self.domain = domain.into();
    self
  }

  /// Only send cookies over HTTPS (default is false)
  pub fn secure(mut self, secure: bool) -> Self {
    self.secure = secure;
    self
  }

  /// Hide cookies from client-side scripts (default is true)
  pub fn http_only(mut self, http_only: bool) -> Self {
    self.http_only = http_only;
    self
  }

  /// Sets the default `SameSite` policy (default is `Lax`)
  pub fn same_site(mut self, same_site: impl Into<Option<SameSite>>) -> Self {
    self.same_site = same_site.into();
    self
  }

  pub fn is_read_only(&self) -> bool {
    self.read_only
  }
}
