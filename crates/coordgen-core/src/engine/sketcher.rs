use super::config::LayoutConfig;
use super::error::EngineError;
use super::layout::LayoutEngine;
use super::placement::{LayoutTopology, place_fragment};
use super::relaxation::relax;
use crate::core::models::molecule::MoleculeGraph;
use crate::core::utils::geometry::{bounding_box, translate};
use nalgebra::{Point2, Vector2};
use tracing::{debug, instrument, warn};

/// Deterministic 2D depiction engine.
///
/// Each connected fragment is grown breadth-first from its most connected
/// atom, refined with spring relaxation, and the fragments are then packed
/// left to right. The same molecule and configuration always give the same
/// coordinates.
#[derive(Debug, Clone, Default)]
pub struct Sketcher {
    config: LayoutConfig,
    topology: Option<LayoutTopology>,
}

impl Sketcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            config,
            topology: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }
}

impl LayoutEngine for Sketcher {
    fn initialize(&mut self, molecule: &MoleculeGraph) -> Result<(), EngineError> {
        self.config
            .validate()
            .map_err(|e| EngineError::layout_failed(e.to_string()))?;
        let topology = LayoutTopology::from_molecule(molecule);
        debug!(
            atoms = topology.len(),
            fragments = topology.fragments.len(),
            "Sketcher initialized."
        );
        self.topology = Some(topology);
        Ok(())
    }

    #[instrument(skip_all, name = "sketcher")]
    fn generate_coordinates(&mut self, molecule: &mut MoleculeGraph) -> Result<(), EngineError> {
        let topology = self
            .topology
            .as_ref()
            .ok_or_else(|| EngineError::layout_failed("sketcher used before initialize"))?;
        if topology.len() != molecule.len() {
            return Err(EngineError::layout_failed(format!(
                "molecule has {} atoms but the sketcher was initialized with {}",
                molecule.len(),
                topology.len()
            )));
        }

        let bond_length = self.config.bond_length;
        let gap = self.config.fragment_spacing * bond_length;
        let mut layout = vec![Point2::origin(); topology.len()];
        let mut cursor = 0.0;

        for (fragment_idx, fragment) in topology.fragments.iter().enumerate() {
            let mut positions = place_fragment(topology, fragment, bond_length);
            let report = relax(&mut positions, topology, fragment, &self.config);
            if !report.converged {
                warn!(
                    fragment = fragment_idx,
                    iterations = report.iterations,
                    max_displacement = report.max_displacement,
                    "Relaxation stopped at the iteration limit."
                );
            }
            if positions.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
                return Err(EngineError::layout_failed(format!(
                    "fragment {} diverged during relaxation",
                    fragment_idx
                )));
            }

            let Some((min, max)) = bounding_box(&positions) else {
                continue;
            };
            let offset = Vector2::new(cursor - min.x, -(min.y + max.y) / 2.0);
            translate(&mut positions, &offset);
            cursor += (max.x - min.x) + gap;

            for (&atom, position) in fragment.iter().zip(positions) {
                layout[atom] = position;
            }
        }

        if let Some((min, max)) = bounding_box(&layout) {
            let center = (min.coords + max.coords) / 2.0;
            translate(&mut layout, &-center);
        }

        for (index, position) in layout.into_iter().enumerate() {
            molecule
                .id_at(index)
                .and_then(|id| molecule.set_position(id, position))
                .ok_or_else(|| {
                    EngineError::layout_failed(format!("atom {} disappeared during layout", index))
                })?;
        }

        debug!(
            atoms = molecule.len(),
            fragments = topology.fragments.len(),
            "Sketcher produced coordinates."
        );
        Ok(())
    }

    fn teardown(&mut self) {
        self.topology = None;
    }
}
