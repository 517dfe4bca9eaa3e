//! # Coordgen C ABI
//!
//! `extern "C"` bindings over the [`coordgen`] library, built as a `cdylib` and
//! a `staticlib`.
//!
//! Every exported function follows the same rules:
//!
//! 1. **Fallible calls return [`coordgen_status_t`](status::coordgen_status_t).**
//!    The message of the last failure on the calling thread is available from
//!    [`coordgen_last_error_message`](error::coordgen_last_error_message).
//! 2. **Panics never unwind into the caller.** They are caught and reported as
//!    `COORDGEN_STATUS_PANIC`.
//! 3. **Pointers are validated.** An input pointer may be null only when its
//!    length is zero; anything else is `COORDGEN_STATUS_NULL_POINTER`.
//!
//! ## Buffer Ownership
//!
//! [`coordgen_generate_coordinates`](generate::coordgen_generate_coordinates)
//! fills a buffer the caller owns, sized with
//! [`coordgen_required_length`](generate::coordgen_required_length).
//! [`coordgen_generate_coordinates_owned`](generate::coordgen_generate_coordinates_owned)
//! allocates the buffer itself; the caller must hand it back to
//! [`coordgen_release_coordinates`](generate::coordgen_release_coordinates)
//! exactly once. Releasing twice, releasing a pointer from another allocator, or
//! reading a released buffer is undefined behaviour.
//!
//! ## Thread Safety
//!
//! Calls are independent and may run concurrently from several threads; each
//! call builds its own layout engine.

pub mod error;
pub mod generate;
pub mod logging;
pub mod status;

pub use error::coordgen_last_error_message;
pub use generate::{
    coordgen_generate_coordinates, coordgen_generate_coordinates_owned,
    coordgen_release_coordinates, coordgen_required_length,
};
pub use logging::coordgen_enable_logging;
pub use status::coordgen_status_t;
