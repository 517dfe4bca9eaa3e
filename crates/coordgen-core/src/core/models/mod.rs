//! # Core Models Module
//!
//! This module contains the data structures used to represent a molecule on its
//! way from flat input arrays to laid-out 2D coordinates.
//!
//! ## Overview
//!
//! A molecule is modelled as an object graph: atoms are nodes carrying an atomic
//! number and (after layout) a position, and bonds are undirected edges carrying
//! a bond order. The graph keeps the insertion order of its atoms, which is the
//! order coordinates are reported back in.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom nodes with atomic number and optional 2D position
//! - [`topology`] - Bonds and bond orders
//! - [`molecule`] - The [`MoleculeGraph`](molecule::MoleculeGraph) container
//! - [`builder`] - Construction of a graph from flat, foreign-style arrays
//! - [`ids`] - Slot map keys for atoms
//!
//! ## Usage
//!
//! ```
//! use coordgen::core::models::builder::build_graph;
//!
//! // N-C single bond: atoms [7, 6], one bond (0, 1, order 1).
//! let molecule = build_graph(2, &[7u8, 6], 1, &[0u16, 1, 1]).unwrap();
//! assert_eq!(molecule.len(), 2);
//! assert_eq!(molecule.bond_count(), 1);
//! ```

pub mod atom;
pub mod builder;
pub mod ids;
pub mod molecule;
pub mod topology;
