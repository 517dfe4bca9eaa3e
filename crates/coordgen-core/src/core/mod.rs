//! # Core Module
//!
//! This module provides the molecular data model and the small geometric toolkit
//! the layout engine is built on.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, bonds, the molecule graph and
//!   its construction from flat arrays
//! - **Geometry Helpers** ([`utils`]) - Angles, directions, centroids and bounding boxes
//!   in the depiction plane

pub mod models;
pub mod utils;
