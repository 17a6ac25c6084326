//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use animals_core::{date, Animal, ApiError, HttpMethod, MessageKey, ServiceResponse, ViewState};

/// Opaque handle to an `AnimalsClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiAnimalsClient {
    pub(crate) inner: animals_core::AnimalsClient,
}

/// Convert a Rust string into an owned C string. Interior NULs yield "".
pub(crate) fn into_c_string(value: String) -> *mut c_char {
    CString::new(value).unwrap_or_default().into_raw()
}

/// Hand a `Vec` to C as a pointer + length. Empty vectors become null.
/// Reclaim with `from_raw_parts`.
fn into_raw_parts<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let mut items = items.into_boxed_slice();
    let len = items.len() as u32;
    let ptr = items.as_mut_ptr();
    std::mem::forget(items);
    (ptr, len)
}

/// Take back ownership of a buffer produced by `into_raw_parts`.
///
/// # Safety
/// `ptr` and `len` must come from a single `into_raw_parts` call and must
/// not have been reclaimed already.
pub(crate) unsafe fn from_raw_parts<T>(ptr: *mut T, len: u32) -> Box<[T]> {
    if ptr.is_null() || len == 0 {
        return Box::new([]);
    }
    unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len as usize)) }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `animals_build_fetch_animals`. The C caller executes the request
/// and passes the response back through `animals_parse_fetch_animals`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: animals_core::HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: into_c_string(k),
                value: into_c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_parts(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: into_c_string(req.path),
            headers,
            headers_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request, then
/// passes a pointer to `animals_parse_fetch_animals`. The FFI layer reads but
/// does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiAnimalsResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    BadRequest = 1,
    Http = 2,
    Deserialization = 3,
    InvalidDate = 4,
    Transport = 5,
    Panic = 6,
    NullArg = 7,
}

/// The view state a host should render for a result.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiViewState {
    Loading = 0,
    Loaded = 1,
    Empty = 2,
    Error = 3,
}

/// A single animal exposed to C.
#[repr(C)]
pub struct FfiAnimal {
    pub name: *mut c_char,
    pub image_key: *mut c_char,
}

/// A list of animals exposed to C.
#[repr(C)]
pub struct FfiAnimalList {
    pub items: *mut FfiAnimal,
    pub len: u32,
}

/// Result envelope for `animals_parse_fetch_animals`.
///
/// On success `error_code` is `Ok`, `error_message` is null, `animals`
/// holds the records in provider order, and `valid_date` is the provider's
/// timestamp (null if absent, e.g. after a 404).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `animals` is empty.
/// `view_state` and `message_key` tell the host what to render either way;
/// `message_key` is null for `Loaded`.
#[repr(C)]
pub struct FfiAnimalsResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub valid_date: *mut c_char,
    pub animals: FfiAnimalList,
    pub view_state: FfiViewState,
    pub message_key: *mut c_char,
}

/// Map a core view state to its C tag and message key.
fn view_fields(state: &ViewState) -> (FfiViewState, *mut c_char) {
    let tag = match state {
        ViewState::Loading => FfiViewState::Loading,
        ViewState::Loaded(_) => FfiViewState::Loaded,
        ViewState::Empty(_) => FfiViewState::Empty,
        ViewState::Error(_) => FfiViewState::Error,
    };
    let key = match state.message_key() {
        Some(key) => into_c_string(key.as_str().to_string()),
        None => std::ptr::null_mut(),
    };
    (tag, key)
}

impl FfiAnimalsResult {
    /// Build a result from the outcome of a fetch, including its view state.
    pub(crate) fn from_outcome(
        outcome: Result<ServiceResponse, ApiError>,
        http_status: u16,
    ) -> *mut Self {
        let state = ViewState::from_outcome(outcome.clone());
        let result = match outcome {
            Ok(response) => Self::success(response, http_status, &state),
            Err(err) => Self::from_error(err),
        };
        Box::into_raw(Box::new(result))
    }

    fn success(response: ServiceResponse, http_status: u16, state: &ViewState) -> Self {
        let valid_date = match response.valid_date.map(date::format) {
            Some(Ok(formatted)) => into_c_string(formatted),
            _ => std::ptr::null_mut(),
        };
        let items: Vec<FfiAnimal> = response.animals.into_iter().map(FfiAnimal::from).collect();
        let (items, len) = into_raw_parts(items);
        let (view_state, message_key) = view_fields(state);

        FfiAnimalsResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status,
            valid_date,
            animals: FfiAnimalList { items, len },
            view_state,
            message_key,
        }
    }

    fn failure(error_code: FfiErrorCode, http_status: u16, msg: String) -> Self {
        let (view_state, message_key) = view_fields(&ViewState::Error(MessageKey::Error));
        FfiAnimalsResult {
            error_code,
            error_message: into_c_string(msg),
            http_status,
            valid_date: std::ptr::null_mut(),
            animals: FfiAnimalList {
                items: std::ptr::null_mut(),
                len: 0,
            },
            view_state,
            message_key,
        }
    }

    fn from_error(err: ApiError) -> Self {
        let (error_code, http_status) = match &err {
            ApiError::BadRequest { .. } => (FfiErrorCode::BadRequest, 400u16),
            ApiError::Http { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::InvalidDate(_) => (FfiErrorCode::InvalidDate, 0),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
        };
        Self::failure(error_code, http_status, err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        let result = Self::failure(FfiErrorCode::NullArg, 0, format!("null argument: {name}"));
        Box::into_raw(Box::new(result))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        let result = Self::failure(FfiErrorCode::Panic, 0, msg.to_string());
        Box::into_raw(Box::new(result))
    }
}

impl From<Animal> for FfiAnimal {
    fn from(animal: Animal) -> Self {
        FfiAnimal {
            name: into_c_string(animal.name),
            image_key: into_c_string(animal.image_key),
        }
    }
}
