//! # Workflows Module
//!
//! This module provides the public entry points that take a molecule from flat
//! arrays to flat coordinates.
//!
//! ## Overview
//!
//! Every entry point runs the same pipeline: build a
//! [`MoleculeGraph`](crate::core::models::molecule::MoleculeGraph) from the
//! input arrays, run a layout engine over it, and copy the resulting positions
//! out as interleaved `f32` pairs. The entry points differ only in who owns the
//! output buffer.
//!
//! ## Architecture
//!
//! - **Entry Points** ([`generate`]) - Caller-allocated and callee-allocated variants,
//!   plus the tuple-returning [`gen_coords`](generate::gen_coords)
//! - **Coordinate Extraction** ([`extract`]) - Copying positions into flat buffers
//! - **Error Handling** ([`error`]) - The aggregated [`CoordgenError`](error::CoordgenError)
//!   and its flat [`ErrorKind`](error::ErrorKind)
//!
//! ## Buffer Ownership
//!
//! - [`generate_coordinates`](generate::generate_coordinates) writes into a slice
//!   the caller owns. Its length must equal
//!   [`required_len`](extract::required_len), and it is never modified on error.
//! - [`generate_coordinates_owned`](generate::generate_coordinates_owned) returns
//!   an [`OwnedCoordinates`](generate::OwnedCoordinates) that the caller releases
//!   once with [`release_coordinates`](generate::release_coordinates).

pub mod error;
pub mod extract;
pub mod generate;
