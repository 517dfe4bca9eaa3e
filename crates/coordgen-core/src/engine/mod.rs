//! # Engine Module
//!
//! This module turns a [`MoleculeGraph`](crate::core::models::molecule::MoleculeGraph)
//! into 2D depiction coordinates.
//!
//! ## Overview
//!
//! Layout is driven through the [`LayoutEngine`](layout::LayoutEngine) trait. An
//! engine is initialized with a molecule, asked once to generate coordinates, and
//! torn down afterwards. [`run_layout`](layout::run_layout) wraps that sequence,
//! guarantees the teardown, and checks that every atom ends up with a finite
//! position.
//!
//! ## Architecture
//!
//! - **Engine Contract** ([`layout`]) - The `LayoutEngine` trait, scoped sessions and `run_layout`
//! - **Built-in Engine** ([`sketcher`]) - Deterministic placement plus spring relaxation
//! - **Configuration** ([`config`]) - Layout parameters, TOML loading and validation
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Key Capabilities
//!
//! - **Pluggable engines** behind a small, synchronous trait
//! - **Guaranteed teardown** on success, failure and unwinding
//! - **Deterministic output** for identical input and configuration
//! - **Disconnected molecules** laid out fragment by fragment without overlap

pub mod config;
pub mod error;
pub mod layout;
pub(crate) mod placement;
pub(crate) mod relaxation;
pub mod sketcher;
