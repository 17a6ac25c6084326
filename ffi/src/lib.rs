//! C-ABI wrapper around `animals-core`.
//!
//! # Overview
//! Exposes the provider fetch through `extern "C"` functions so a mobile
//! host with a C FFI can build the request, execute it with its own HTTP
//! stack, and hand the response back for classification, without linking
//! to serde or any Rust runtime directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `animals_build_fetch_animals` / `animals_parse_fetch_animals` mirror
//!   the core client 1:1.
//! - `FfiAnimalsResult` carries both the parsed payload and the view state
//!   the host should render, so the presenter's mapping lives in one place.
//! - The C caller owns all returned pointers and must call the matching
//!   `animals_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use animals_core::{date, ApiError, HttpResponse};

use types::*;

/// Read a borrowed C string. Invalid UTF-8 reads as "".
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string.
unsafe fn read_c_str<'a>(ptr: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `AnimalsClient` bound to `base_url`.
///
/// Returns null if `base_url` is null, is not valid UTF-8, or if an internal
/// panic occurs. The caller must free the returned pointer with
/// `animals_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn animals_client_new(base_url: *const c_char) -> *mut FfiAnimalsClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let Ok(url) = unsafe { CStr::from_ptr(base_url) }.to_str() else {
            tracing::warn!("base_url is not valid UTF-8");
            return std::ptr::null_mut();
        };
        let client = animals_core::AnimalsClient::new(url);
        Box::into_raw(Box::new(FfiAnimalsClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `animals_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn animals_client_free(client: *mut FfiAnimalsClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Build the `GET provider.json` request.
///
/// `valid_date` is a timestamp in `yyyy-MM-ddTHH:mm±HH:MM` or RFC 3339 form.
/// A null `valid_date` builds the request without a query string.
/// Returns null if `client` is null or `valid_date` cannot be parsed.
/// The caller must free the returned pointer with `animals_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn animals_build_fetch_animals(
    client: *const FfiAnimalsClient,
    valid_date: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let valid_date = if valid_date.is_null() {
            None
        } else {
            match date::parse(unsafe { read_c_str(valid_date) }) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::debug!(error = %e, "rejecting valid_date");
                    return std::ptr::null_mut();
                }
            }
        };
        match client.inner.build_fetch_animals(valid_date) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body reads
/// as an empty string.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { read_c_str(resp.body) }.to_string()
    };
    HttpResponse::new(resp.status, body)
}

/// Classify the response to a fetch request.
///
/// 404 yields `error_code = Ok` with no animals and `view_state = Empty`;
/// 400 yields `error_code = BadRequest`.
/// The caller must free the result with `animals_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn animals_parse_fetch_animals(
    client: *const FfiAnimalsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiAnimalsResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiAnimalsResult::null_arg("client");
        }
        if response.is_null() {
            return FfiAnimalsResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let core_resp = ffi_response_to_core(resp);
        let status = core_resp.status;
        FfiAnimalsResult::from_outcome(client.inner.parse_fetch_animals(core_resp), status)
    })
    .unwrap_or_else(|_| FfiAnimalsResult::panic("panic in animals_parse_fetch_animals"))
}

/// Report that the host could not complete the HTTP round-trip.
///
/// Returns an error result with `error_code = Transport` and
/// `view_state = Error`. `message` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn animals_transport_failure(message: *const c_char) -> *mut FfiAnimalsResult {
    catch_unwind(|| {
        let message = if message.is_null() {
            "unknown transport failure".to_string()
        } else {
            unsafe { read_c_str(message) }.to_string()
        };
        FfiAnimalsResult::from_outcome(Err(ApiError::Transport(message)), 0)
    })
    .unwrap_or_else(|_| FfiAnimalsResult::panic("panic in animals_transport_failure"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a C string allocated by this library, ignoring null.
fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free an `FfiHttpRequest` returned by `animals_build_fetch_animals`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn animals_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        let headers = unsafe { from_raw_parts(req.headers, req.headers_len) };
        for h in headers.iter() {
            free_c_string(h.key);
            free_c_string(h.value);
        }
    });
}

/// Free an `FfiAnimalsResult` returned by any function in this library.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn animals_free_result(result: *mut FfiAnimalsResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.valid_date);
        free_c_string(result.message_key);
        let items = unsafe { from_raw_parts(result.animals.items, result.animals.len) };
        for animal in items.iter() {
            free_c_string(animal.name);
            free_c_string(animal.image_key);
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn animals_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn new_client() -> *mut FfiAnimalsClient {
        let url = CString::new("http://localhost:9292").unwrap();
        animals_client_new(url.as_ptr())
    }

    fn c_str<'a>(ptr: *const c_char) -> &'a str {
        assert!(!ptr.is_null());
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
    }

    fn parse(client: *const FfiAnimalsClient, status: u16, body: &str) -> *mut FfiAnimalsResult {
        let body = CString::new(body).unwrap();
        let resp = FfiHttpResponse {
            status,
            body: body.as_ptr(),
        };
        animals_parse_fetch_animals(client, &resp)
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        assert!(!client.is_null());
        animals_client_free(client);
    }

    #[test]
    fn client_new_null_returns_null() {
        let client = animals_client_new(std::ptr::null());
        assert!(client.is_null());
    }

    #[test]
    fn client_new_invalid_utf8_returns_null() {
        let url = CString::new(vec![b'h', b't', 0xff, 0xfe]).unwrap();
        let client = animals_client_new(url.as_ptr());
        assert!(client.is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        animals_client_free(std::ptr::null_mut());
    }

    #[test]
    fn build_fetch_animals_with_date() {
        let client = new_client();
        let date = CString::new("2017-02-01T20:23+11:00").unwrap();
        let req = animals_build_fetch_animals(client, date.as_ptr());
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Get));
        assert_eq!(
            c_str(req_ref.path),
            "http://localhost:9292/provider.json?valid_date=2017-02-01T20%3A23%2B11%3A00"
        );
        assert_eq!(req_ref.headers_len, 1);
        let header = unsafe { &*req_ref.headers };
        assert_eq!(c_str(header.key), "accept");
        assert_eq!(c_str(header.value), "application/json");

        animals_free_request(req);
        animals_client_free(client);
    }

    #[test]
    fn build_fetch_animals_null_date_omits_query() {
        let client = new_client();
        let req = animals_build_fetch_animals(client, std::ptr::null());
        assert!(!req.is_null());
        let req_ref = unsafe { &*req };
        assert_eq!(c_str(req_ref.path), "http://localhost:9292/provider.json");

        animals_free_request(req);
        animals_client_free(client);
    }

    #[test]
    fn build_fetch_animals_invalid_date_returns_null() {
        let client = new_client();
        let date = CString::new("next tuesday").unwrap();
        let req = animals_build_fetch_animals(client, date.as_ptr());
        assert!(req.is_null());
        animals_client_free(client);
    }

    #[test]
    fn build_fetch_animals_null_client_returns_null() {
        let req = animals_build_fetch_animals(std::ptr::null(), std::ptr::null());
        assert!(req.is_null());
    }

    #[test]
    fn parse_loaded() {
        let client = new_client();
        let result = parse(
            client,
            200,
            r#"{"test":"NO","valid_date":"2017-02-01T12:23+11:00","animals":[
                {"name":"Buddy","image":"dog"},
                {"name":"Cathy","image":"cat"}
            ]}"#,
        );
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(r.http_status, 200);
        assert_eq!(r.view_state, FfiViewState::Loaded);
        assert!(r.message_key.is_null());
        assert_eq!(c_str(r.valid_date), "2017-02-01T12:23+11:00");

        assert_eq!(r.animals.len, 2);
        let items = unsafe { std::slice::from_raw_parts(r.animals.items, r.animals.len as usize) };
        assert_eq!(c_str(items[0].name), "Buddy");
        assert_eq!(c_str(items[0].image_key), "dog");
        assert_eq!(c_str(items[1].name), "Cathy");
        assert_eq!(c_str(items[1].image_key), "cat");

        animals_free_result(result);
        animals_client_free(client);
    }

    #[test]
    fn parse_empty_list_is_empty_state() {
        let client = new_client();
        let result = parse(client, 200, r#"{"animals":[]}"#);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.view_state, FfiViewState::Empty);
        assert_eq!(c_str(r.message_key), "empty_message");
        assert!(r.valid_date.is_null());
        assert!(r.animals.items.is_null());
        assert_eq!(r.animals.len, 0);

        animals_free_result(result);
        animals_client_free(client);
    }

    #[test]
    fn parse_not_found_is_empty_state() {
        let client = new_client();
        let result = parse(client, 404, "");
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.http_status, 404);
        assert_eq!(r.view_state, FfiViewState::Empty);

        animals_free_result(result);
        animals_client_free(client);
    }

    #[test]
    fn parse_bad_request() {
        let client = new_client();
        let result = parse(client, 400, "\"valid_date is required\"");
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::BadRequest);
        assert_eq!(r.http_status, 400);
        assert!(c_str(r.error_message).contains("valid_date is required"));
        assert_eq!(r.view_state, FfiViewState::Error);
        assert_eq!(c_str(r.message_key), "error_message");

        animals_free_result(result);
        animals_client_free(client);
    }

    #[test]
    fn parse_server_error() {
        let client = new_client();
        let result = parse(client, 503, "down");
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.http_status, 503);
        assert_eq!(r.view_state, FfiViewState::Error);

        animals_free_result(result);
        animals_client_free(client);
    }

    #[test]
    fn parse_bad_json() {
        let client = new_client();
        let result = parse(client, 200, "not json");
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Deserialization);
        assert_eq!(r.view_state, FfiViewState::Error);

        animals_free_result(result);
        animals_client_free(client);
    }

    #[test]
    fn parse_null_body_reads_as_empty() {
        let client = new_client();
        let resp = FfiHttpResponse {
            status: 404,
            body: std::ptr::null(),
        };
        let result = animals_parse_fetch_animals(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);

        animals_free_result(result);
        animals_client_free(client);
    }

    #[test]
    fn parse_null_client_returns_null_arg() {
        let result = parse(std::ptr::null(), 200, "{}");
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);
        assert_eq!(c_str(r.error_message), "null argument: client");

        animals_free_result(result);
    }

    #[test]
    fn parse_null_response_returns_null_arg() {
        let client = new_client();
        let result = animals_parse_fetch_animals(client, std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);

        animals_free_result(result);
        animals_client_free(client);
    }

    #[test]
    fn transport_failure_is_error_state() {
        let msg = CString::new("connection refused").unwrap();
        let result = animals_transport_failure(msg.as_ptr());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Transport);
        assert_eq!(c_str(r.error_message), "transport failed: connection refused");
        assert_eq!(r.view_state, FfiViewState::Error);

        animals_free_result(result);
    }

    #[test]
    fn free_request_null_is_safe() {
        animals_free_request(std::ptr::null_mut());
    }

    #[test]
    fn free_result_null_is_safe() {
        animals_free_result(std::ptr::null_mut());
    }

    #[test]
    fn free_string_null_is_safe() {
        animals_free_string(std::ptr::null_mut());
    }
}
