use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::Cookie;
use std::collections::HashMap;
use std::iter::FromIterator;
use std::mem;
use std::ops::Index;
use std::{slice, vec};
use time::OffsetDateTime;

/// How [`CookieSet::remove`] gets rid of a cookie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveMode {
  /// Replace the entry with a tombstone so the client deletes it too.
  FromBrowser,
  /// Drop the entry without telling the client.
  Discard,
}

impl Default for RemoveMode {
  fn default() -> Self {
    RemoveMode::FromBrowser
  }
}

/// The cookies of a single request/response cycle.
///
/// Entries are keyed by name, with at most one cookie per name, and iterate in
/// insertion order. Replacing a cookie keeps its original position.
///
/// A set built with [`Config::read_only`] rejects every mutation with
/// [`Error::ReadOnly`]. Sets read from a request are read-only:
/// ```
/// use turbofish_cookies::http::{parse_cookie_header, CookieSet, Cookie};
///
/// let mut cookies = CookieSet::read_only();
/// cookies.replace_all(parse_cookie_header("sid=abc"));
///
/// assert!(cookies.has("sid"));
/// assert!(cookies.add(Cookie::new("theme", "dark")).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CookieSet {
  /// entries in insertion order
  entries: Vec<Cookie>,

  /// positions in `entries`, by cookie name
  index: HashMap<String, usize>,

  config: Config,
}

impl CookieSet {
  /// Creates an empty, writable set with the default cookie attributes.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates an empty set that rejects every mutation.
  pub fn read_only() -> Self {
    Self::with_config(Config::builder().read_only(true))
  }

  pub fn with_config(config: Config) -> Self {
    Self {
      entries: Vec::new(),
      index: HashMap::new(),
      config,
    }
  }

  pub fn is_read_only(&self) -> bool {
    self.config.read_only
  }

  /// Returns a writable copy of this set, keeping its entries and defaults.
  pub fn to_writable(&self) -> Self {
    let mut set = self.clone();
    set.config.read_only = false;
    set
  }

  /// Creates a cookie carrying this set's default attributes. The cookie is
  /// not added to the set.
  pub fn cookie(&self, name: impl Into<String>, value: impl Into<String>) -> Cookie {
    Cookie::with_config(name, value, &self.config)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Returns the cookie named `name`, including tombstones and expired cookies.
  pub fn get(&self, name: &str) -> Option<&Cookie> {
    self.index.get(name).map(|&i| &self.entries[i])
  }

  pub fn value(&self, name: &str) -> Option<&str> {
    self.get(name).map(|cookie| cookie.value.as_str())
  }

  /// Returns the value of the cookie named `name`, or `default` when absent.
  pub fn value_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
    self.value(name).unwrap_or(default)
  }

  /// Returns true if a cookie named `name` exists, holds a value and has not
  /// expired.
  ///
  /// Cookies marked for deletion stay in the set until the response is
  /// written, but are not reported here.
  pub fn has(&self, name: &str) -> bool {
    self.has_at(name, OffsetDateTime::now_utc())
  }

  pub fn has_at(&self, name: &str, now: OffsetDateTime) -> bool {
    self.get(name).map_or(false, |cookie| cookie.is_live_at(now))
  }

  /// Inserts `cookie`, replacing and returning any cookie of the same name.
  pub fn add(&mut self, cookie: Cookie) -> Result<Option<Cookie>> {
    self.ensure_writable("add")?;
    tracing::trace!(cookie = %cookie.name, "adding cookie");
    Ok(self.insert(cookie))
  }

  /// Replaces the cookie named `name` with a tombstone, so the client deletes
  /// it once the response is written.
  ///
  /// A name the set has never seen gets a tombstone with the default
  /// attributes.
  pub fn mark_for_deletion(&mut self, name: &str) -> Result<()> {
    let cookie = match self.get(name) {
      Some(cookie) => cookie.clone(),
      None => self.cookie(name, ""),
    };
    self.mark_cookie_for_deletion(cookie)
  }

  /// Stores a tombstone for `cookie`, replacing any entry of the same name.
  ///
  /// The tombstone keeps the domain and path of `cookie`, which lets callers
  /// delete a cookie whose scope differs from the one in the set.
  pub fn mark_cookie_for_deletion(&mut self, cookie: Cookie) -> Result<()> {
    self.ensure_writable("mark_for_deletion")?;
    tracing::trace!(cookie = %cookie.name, "marking cookie for deletion");
    self.insert(cookie.into_tombstone());
    Ok(())
  }

  /// Drops the cookie named `name` without telling the client.
  pub fn discard(&mut self, name: &str) -> Result<Option<Cookie>> {
    self.ensure_writable("discard")?;

    let position = match self.index.remove(name) {
      Some(position) => position,
      None => return Ok(None),
    };
    tracing::trace!(cookie = %name, "discarding cookie");

    let cookie = self.entries.remove(position);
    for i in self.index.values_mut() {
      if *i > position {
        *i -= 1;
      }
    }
    Ok(Some(cookie))
  }

  /// Removes the cookie named `name`, either by tombstone or by discarding it.
  pub fn remove(&mut self, name: &str, mode: RemoveMode) -> Result<()> {
    match mode {
      RemoveMode::FromBrowser => self.mark_for_deletion(name),
      RemoveMode::Discard => self.discard(name).map(drop),
    }
  }

  pub fn remove_all(&mut self) -> Result<()> {
    self.ensure_writable("remove_all")?;
    self.clear();
    Ok(())
  }

  /// Returns a snapshot of the set keyed by cookie name.
  pub fn to_map(&self) -> HashMap<String, Cookie> {
    self
      .entries
      .iter()
      .map(|cookie| (cookie.name.clone(), cookie.clone()))
      .collect()
  }

  /// Replaces the whole content of the set.
  ///
  /// This ignores the read-only latch: it is how a set is filled from the
  /// incoming request before application code sees it. Later duplicates win.
  pub fn replace_all(&mut self, cookies: impl IntoIterator<Item = Cookie>) {
    self.clear();
    for cookie in cookies {
      self.insert(cookie);
    }
  }

  /// Iterates over `(name, cookie)` pairs in insertion order.
  pub fn iter(&self) -> Iter<'_> {
    Iter {
      inner: self.entries.iter(),
    }
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|cookie| cookie.name.as_str())
  }

  fn ensure_writable(&self, operation: &'static str) -> Result<()> {
    if self.config.read_only {
      tracing::warn!(operation, "rejected mutation of a read-only cookie set");
      return Err(Error::ReadOnly { operation });
    }
    Ok(())
  }

  fn insert(&mut self, cookie: Cookie) -> Option<Cookie> {
    match self.index.get(&cookie.name) {
      Some(&i) => Some(mem::replace(&mut self.entries[i], cookie)),
      None => {
        self.index.insert(cookie.name.clone(), self.entries.len());
        self.entries.push(cookie);
        None
      }
    }
  }

  fn clear(&mut self) {
    self.entries.clear();
    self.index.clear();
  }
}

impl<'a> Index<&'a str> for CookieSet {
  type Output = Cookie;

  /// # Panics
  ///
  /// Panics if there is no cookie named `name`.
  fn index(&self, name: &'a str) -> &Cookie {
    match self.get(name) {
      Some(cookie) => cookie,
      None => panic!("no cookie named `{}`", name),
    }
  }
}

/// Collects into a writable set with the default attributes.
impl FromIterator<Cookie> for CookieSet {
  fn from_iter<I: IntoIterator<Item = Cookie>>(iter: I) -> Self {
    let mut set = CookieSet::new();
    set.replace_all(iter);
    set
  }
}

/// An iterator over the `(name, cookie)` pairs of a [`CookieSet`].
pub struct Iter<'a> {
  inner: slice::Iter<'a, Cookie>,
}

impl<'a> Iterator for Iter<'a> {
  type Item = (&'a str, &'a Cookie);

  fn next(&mut self) -> Option<Self::Item> {
    self.inner.next().map(|cookie| (cookie.name.as_str(), cookie))
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.inner.size_hint()
  }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a CookieSet {
  type Item = (&'a str, &'a Cookie);
  type IntoIter = Iter<'a>;

  fn into_iter(self) -> Iter<'a> {
    self.iter()
  }
}

/// Consumes the set, yielding its cookies in insertion order.
impl IntoIterator for CookieSet {
  type Item = Cookie;
  type IntoIter = vec::IntoIter<Cookie>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}
