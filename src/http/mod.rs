mod cookie;
mod cookies;
mod request;
mod response;

#[doc(inline)]
pub use self::cookie::{Cookie, SameSite, TOMBSTONE_EXPIRY};

#[doc(inline)]
pub use cookies::{CookieSet, Iter, RemoveMode};

#[doc(inline)]
pub use request::{cookies_from_headers, cookies_from_request, parse_cookie_header, RequestHeader};

#[doc(inline)]
pub use response::{set_cookie_header, write_cookies, ResponseCookies};

#[doc(inline)]
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};

#[doc(inline)]
pub use hyper::Body;

/// The type of an incoming web request.
pub type Request = hyper::Request<Body>;

/// An HTTP Response.
pub type Response = hyper::Response<Body>;
