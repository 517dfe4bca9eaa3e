//! # Coordgen Core Library
//!
//! Two-dimensional depiction coordinates for small molecules, computed from flat
//! atom and bond arrays.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers so that the data model, the layout
//! logic and the boundary entry points can be tested on their own.
//!
//! - **[`core`]: The Foundation.** The molecule graph (`MoleculeGraph`), its
//!   construction and validation from flat arrays, and plane geometry helpers.
//!
//! - **[`engine`]: The Logic Core.** The `LayoutEngine` contract, the scoped
//!   engine lifecycle, and the built-in deterministic `Sketcher`.
//!
//! - **[`workflows`]: The Public API.** Entry points that build a graph, lay it
//!   out and hand the coordinates back, either into a caller-owned buffer or in a
//!   freshly allocated one.
//!
//! ## Quick Start
//!
//! ```
//! use coordgen::generate_coordinates;
//!
//! // N-C single bond.
//! let mut coords = [0.0f32; 4];
//! generate_coordinates(2, &[7, 6], 1, &[0, 1, 1], &mut coords).unwrap();
//! assert!(coords.iter().all(|v| v.is_finite()));
//! ```

pub mod core;
pub mod engine;
pub mod workflows;

pub use crate::core::models::builder::{
    BuildError, FlatMolecule, Validation, build_graph, build_graph_with,
};
pub use crate::core::models::molecule::MoleculeGraph;
pub use crate::engine::config::{ConfigError, LayoutConfig};
pub use crate::engine::error::EngineError;
pub use crate::engine::layout::{LayoutEngine, run_layout};
pub use crate::engine::sketcher::Sketcher;
pub use crate::workflows::error::{CoordgenError, ErrorKind};
pub use crate::workflows::extract::required_len;
pub use crate::workflows::generate::{
    OwnedCoordinates, gen_coords, generate_coordinates, generate_coordinates_owned,
    generate_coordinates_owned_with, generate_coordinates_with, release_coordinates,
};
