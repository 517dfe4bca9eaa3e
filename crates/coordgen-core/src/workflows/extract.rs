use super::error::CoordgenError;
use crate::core::models::molecule::MoleculeGraph;
use crate::engine::error::EngineError;

/// Length of an interleaved `[x0, y0, x1, y1, ...]` buffer for `atom_count` atoms.
pub fn required_len(atom_count: usize) -> usize {
    atom_count.saturating_mul(2)
}

fn gather(molecule: &MoleculeGraph) -> Result<Vec<(f32, f32)>, CoordgenError> {
    molecule
        .atoms_iter()
        .enumerate()
        .map(|(index, (_, atom))| {
            atom.position
                .filter(|p| p.x.is_finite() && p.y.is_finite())
                .map(|p| (p.x as f32, p.y as f32))
                .ok_or_else(|| {
                    CoordgenError::from(EngineError::layout_failed(format!(
                        "atom {} has no position to extract",
                        index
                    )))
                })
        })
        .collect()
}

/// Writes every atom's position into `out` as interleaved `f32` pairs, in atom
/// insertion order.
///
/// # Errors
///
/// Returns [`CoordgenError::LengthMismatch`] if `out` is not exactly
/// [`required_len`] long, or a layout failure if an atom has no finite
/// position. `out` is not modified on error.
pub fn write_interleaved(molecule: &MoleculeGraph, out: &mut [f32]) -> Result<(), CoordgenError> {
    let expected = required_len(molecule.len());
    if out.len() != expected {
        return Err(CoordgenError::LengthMismatch {
            expected,
            found: out.len(),
        });
    }

    let pairs = gather(molecule)?;
    for (slot, (x, y)) in out.chunks_exact_mut(2).zip(pairs) {
        slot[0] = x;
        slot[1] = y;
    }
    Ok(())
}

/// Collects every atom's position into a fresh interleaved buffer.
pub fn to_interleaved(molecule: &MoleculeGraph) -> Result<Vec<f32>, CoordgenError> {
    Ok(gather(molecule)?
        .into_iter()
        .flat_map(|(x, y)| [x, y])
        .collect())
}

/// Collects every atom's position as `(x, y)` tuples.
pub fn to_pairs(molecule: &MoleculeGraph) -> Result<Vec<(f32, f32)>, CoordgenError> {
    gather(molecule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::build_graph;
    use crate::workflows::error::ErrorKind;
    use nalgebra::Point2;

    fn positioned(coords: &[(f64, f64)]) -> MoleculeGraph {
        let atoms = vec![6u8; coords.len()];
        let mut molecule = build_graph(atoms.len(), &atoms, 0, &[] as &[u16]).unwrap();
        for (index, &(x, y)) in coords.iter().enumerate() {
            let id = molecule.id_at(index).unwrap();
            molecule.set_position(id, Point2::new(x, y));
        }
        molecule
    }

    #[test]
    fn required_len_is_two_per_atom() {
        assert_eq!(required_len(0), 0);
        assert_eq!(required_len(3), 6);
        assert_eq!(required_len(usize::MAX), usize::MAX);
    }

    #[test]
    fn write_interleaved_uses_atom_order() {
        let molecule = positioned(&[(-25.0, 0.0), (25.0, 1.5)]);
        let mut out = [0.0f32; 4];
        write_interleaved(&molecule, &mut out).unwrap();
        assert_eq!(out, [-25.0, 0.0, 25.0, 1.5]);
    }

    #[test]
    fn write_interleaved_rejects_wrong_length_without_writing() {
        let molecule = positioned(&[(1.0, 2.0), (3.0, 4.0)]);
        for len in [3, 5] {
            let mut out = vec![9.0f32; len];
            let err = write_interleaved(&molecule, &mut out).unwrap_err();
            assert_eq!(
                err,
                CoordgenError::LengthMismatch {
                    expected: 4,
                    found: len
                }
            );
            assert!(out.iter().all(|&v| v == 9.0));
        }
    }

    #[test]
    fn missing_position_fails_without_writing() {
        let mut molecule = positioned(&[(1.0, 2.0), (3.0, 4.0)]);
        let id = molecule.id_at(1).unwrap();
        molecule.atom_mut(id).unwrap().position = None;

        let mut out = [9.0f32; 4];
        let err = write_interleaved(&molecule, &mut out).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LayoutFailed);
        assert_eq!(out, [9.0; 4]);
        assert!(to_interleaved(&molecule).is_err());
    }

    #[test]
    fn to_interleaved_narrows_to_f32() {
        let molecule = positioned(&[(0.1, -0.2)]);
        assert_eq!(to_interleaved(&molecule).unwrap(), vec![0.1f32, -0.2f32]);
        assert_eq!(to_pairs(&molecule).unwrap(), vec![(0.1f32, -0.2f32)]);
    }
}
