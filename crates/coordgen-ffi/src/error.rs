use crate::status::coordgen_status_t;
use coordgen::CoordgenError;
use std::any::Any;
use std::cell::RefCell;
use std::ffi::{CString, c_char};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use thiserror::Error;
use tracing::debug;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

#[derive(Debug, Error)]
pub(crate) enum FfiError {
    #[error("Null pointer passed for '{0}' with a non-zero length")]
    NullPointer(&'static str),

    #[error("Length {count} of '{what}' is too large to address")]
    CountOverflow { what: &'static str, count: usize },

    #[error(transparent)]
    Coordgen(#[from] CoordgenError),

    #[error("Panic inside coordgen: {0}")]
    Panic(String),
}

impl FfiError {
    pub(crate) fn status(&self) -> coordgen_status_t {
        match self {
            Self::NullPointer(_) => coordgen_status_t::COORDGEN_STATUS_NULL_POINTER,
            Self::CountOverflow { .. } => coordgen_status_t::COORDGEN_STATUS_INVALID_ARITY,
            Self::Coordgen(err) => err.kind().into(),
            Self::Panic(_) => coordgen_status_t::COORDGEN_STATUS_PANIC,
        }
    }
}

pub(crate) fn set_last_error(message: impl Into<String>) {
    let message = CString::new(message.into()).unwrap_or_else(|err| {
        let mut bytes = err.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
}

pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Runs the body of an exported function.
///
/// Clears the last error, converts a panic into `COORDGEN_STATUS_PANIC`, and
/// records the message of any failure for [`coordgen_last_error_message`].
pub(crate) fn guard<F>(body: F) -> coordgen_status_t
where
    F: FnOnce() -> Result<(), FfiError>,
{
    clear_last_error();
    let outcome = panic::catch_unwind(AssertUnwindSafe(body))
        .unwrap_or_else(|payload| Err(FfiError::Panic(panic_message(payload.as_ref()))));

    match outcome {
        Ok(()) => coordgen_status_t::COORDGEN_STATUS_OK,
        Err(err) => {
            let status = err.status();
            debug!(?status, error = %err, "Call failed at the C boundary.");
            set_last_error(err.to_string());
            status
        }
    }
}

/// Message describing the last failure on the calling thread, or null.
///
/// The string stays valid until the next fallible call into the library on
/// the same thread. The caller must not free it.
#[unsafe(no_mangle)]
pub extern "C" fn coordgen_last_error_message() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(ptr::null(), |message| message.as_ptr())
    })
}
