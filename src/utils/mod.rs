pub mod hostname;
pub mod http;
pub mod rate_limiter;

pub use hostname::{is_valid_domain, qualify_fragment, within_apex};
pub use http::{CurlTransport, HttpClient, HttpResponse};
pub use rate_limiter::RateLimiter;
