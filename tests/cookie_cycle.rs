use http::header::{COOKIE, SET_COOKIE};
use time::{Duration, OffsetDateTime};
use turbofish_cookies::http::{
  cookies_from_request, Body, Request, RequestHeader, Response, ResponseCookies,
};
use turbofish_cookies::{Config, Cookie, CookieSet, Error};

fn request(cookie_header: &str) -> Request {
  hyper::Request::builder()
    .uri("/")
    .header(COOKIE, cookie_header)
    .body(Body::empty())
    .unwrap()
}

fn set_cookies(res: &Response) -> Vec<String> {
  res
    .headers()
    .get_all(SET_COOKIE)
    .iter()
    .map(|value| value.to_str().unwrap().to_string())
    .collect()
}

#[test]
fn login_then_logout() {
  let req = request("sid=old; theme=dark");
  let incoming = RequestHeader::from_request(&req);
  assert!(incoming.cookies().has("sid"));
  assert_eq!(incoming.cookies().value_or("theme", "light"), "dark");

  let mut outgoing = CookieSet::with_config(Config::builder().secure(true));
  outgoing.mark_for_deletion("sid").unwrap();
  let fresh = outgoing
    .cookie("sid", "new")
    .expire(OffsetDateTime::now_utc() + Duration::hours(2));
  outgoing.add(fresh).unwrap();
  assert!(outgoing.has("sid"));

  let mut res = Response::new(Body::empty());
  let written = ResponseCookies::new().apply(outgoing, &mut res).unwrap();
  assert_eq!(written, 1);

  let headers = set_cookies(&res);
  assert!(headers[0].starts_with("sid=new"));
  assert!(headers[0].contains("Secure"));
}

#[test]
fn request_cookies_are_read_only() {
  let mut cookies = cookies_from_request(&request("sid=abc"));
  let err = cookies.add(Cookie::new("sid", "forged")).unwrap_err();

  assert!(matches!(err, Error::ReadOnly { .. }));
  assert_eq!(cookies.value("sid"), Some("abc"));
  assert_eq!(cookies.len(), 1);
}

#[test]
fn forwarding_request_cookies_with_deletions() {
  let incoming = cookies_from_request(&request("a=1; b=2; c=3"));

  let mut outgoing = incoming.to_writable();
  outgoing.discard("a").unwrap();
  outgoing.mark_for_deletion("b").unwrap();

  assert!(!outgoing.has("a"));
  assert!(!outgoing.has("b"));
  assert!(outgoing.get("b").is_some());
  assert!(outgoing.has("c"));

  let mut res = Response::new(Body::empty());
  ResponseCookies::new().apply(outgoing, &mut res).unwrap();

  let headers = set_cookies(&res);
  assert_eq!(headers.len(), 2);
  assert!(headers[0].starts_with("b="));
  assert!(headers[0].contains("Max-Age=0"));
  assert!(headers[1].starts_with("c=3"));
}
