//! Map HTTP statuses, curl errors and fetch errors onto retry kinds.

use super::policy::ErrorKind;
use crate::error::FetchError;

pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Permanent,
    }
}

pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Permanent
}

pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http(code) => classify_http_status(*code),
        FetchError::Decode(_) | FetchError::NotUtf8 | FetchError::Task(_) => ErrorKind::Permanent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttling_statuses() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
        assert_eq!(classify_http_status(503), ErrorKind::Throttled);
    }

    #[test]
    fn server_errors_are_transient() {
        assert_eq!(classify(&FetchError::Http(500)), ErrorKind::Http5xx(500));
        assert!(classify(&FetchError::Http(502)).is_transient());
    }

    #[test]
    fn client_errors_and_bad_bodies_are_permanent() {
        assert_eq!(classify(&FetchError::Http(404)), ErrorKind::Permanent);
        assert_eq!(classify(&FetchError::NotUtf8), ErrorKind::Permanent);
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(classify(&FetchError::Decode(decode)), ErrorKind::Permanent);
    }
}
