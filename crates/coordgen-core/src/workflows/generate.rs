use super::error::CoordgenError;
use super::extract::{required_len, to_interleaved, to_pairs, write_interleaved};
use crate::core::models::builder::{FlatMolecule, Validation};
use crate::core::models::molecule::MoleculeGraph;
use crate::engine::layout::{LayoutEngine, run_layout};
use crate::engine::sketcher::Sketcher;
use tracing::{debug, info, instrument, trace};

/// A coordinate buffer allocated by this crate and handed to the caller.
///
/// Holds `2 × atom_count` interleaved `f32` values. The buffer has a single
/// owner; give it back with [`release_coordinates`] (or simply drop it).
#[derive(Debug, PartialEq)]
pub struct OwnedCoordinates {
    values: Box<[f32]>,
}

impl OwnedCoordinates {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn atom_count(&self) -> usize {
        self.values.len() / 2
    }

    /// Iterates the buffer as `(x, y)` pairs in atom order.
    pub fn pairs(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.values.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Gives up ownership as a raw pointer and length, for handing across a
    /// foreign boundary.
    ///
    /// The allocation is leaked until it is rebuilt with
    /// [`OwnedCoordinates::from_raw_parts`].
    pub fn into_raw_parts(self) -> (*mut f32, usize) {
        let len = self.values.len();
        let ptr = Box::into_raw(self.values).cast::<f32>();
        (ptr, len)
    }

    /// Rebuilds a buffer from the parts returned by [`into_raw_parts`](Self::into_raw_parts).
    ///
    /// # Safety
    ///
    /// `ptr` and `len` must come from a single earlier call to
    /// `into_raw_parts`, and the buffer must not have been rebuilt since.
    pub unsafe fn from_raw_parts(ptr: *mut f32, len: usize) -> Self {
        let slice = std::ptr::slice_from_raw_parts_mut(ptr, len);
        Self {
            values: unsafe { Box::from_raw(slice) },
        }
    }
}

impl AsRef<[f32]> for OwnedCoordinates {
    fn as_ref(&self) -> &[f32] {
        self.as_slice()
    }
}

fn lay_out<E, A, B>(
    engine: &mut E,
    validation: Validation,
    input: &FlatMolecule<'_, A, B>,
) -> Result<MoleculeGraph, CoordgenError>
where
    E: LayoutEngine + ?Sized,
    A: Copy + Into<i64>,
    B: Copy + Into<i64>,
{
    let mut molecule = input.build(validation)?;
    debug!(
        atoms = molecule.len(),
        bonds = molecule.bond_count(),
        "Molecule graph ready for layout."
    );
    run_layout(&mut molecule, engine)?;
    Ok(molecule)
}

/// Computes 2D coordinates into a caller-allocated buffer.
///
/// Uses the built-in [`Sketcher`] and structural validation.
///
/// # Arguments
///
/// * `atom_count` - The number of atoms.
/// * `atomic_numbers` - `atom_count` atomic numbers.
/// * `bond_count` - The number of bonds.
/// * `bond_triples` - `3 * bond_count` values, `(atom1, atom2, order)` per bond.
/// * `out_coords` - Exactly [`required_len`]`(atom_count)` floats; receives
///   `x` at `2i` and `y` at `2i + 1` for atom `i`.
///
/// # Errors
///
/// [`CoordgenError::LengthMismatch`] if `out_coords` has the wrong length,
/// otherwise any build or layout error. `out_coords` is left untouched on
/// every error.
#[instrument(skip_all, name = "generate_coordinates", fields(atoms = atom_count, bonds = bond_count))]
pub fn generate_coordinates(
    atom_count: usize,
    atomic_numbers: &[u8],
    bond_count: usize,
    bond_triples: &[u16],
    out_coords: &mut [f32],
) -> Result<(), CoordgenError> {
    generate_coordinates_with(
        &mut Sketcher::new(),
        Validation::Structural,
        FlatMolecule::new(atom_count, atomic_numbers, bond_count, bond_triples),
        out_coords,
    )
}

/// [`generate_coordinates`] with an explicit engine and validation level.
pub fn generate_coordinates_with<E, A, B>(
    engine: &mut E,
    validation: Validation,
    input: FlatMolecule<'_, A, B>,
    out_coords: &mut [f32],
) -> Result<(), CoordgenError>
where
    E: LayoutEngine + ?Sized,
    A: Copy + Into<i64>,
    B: Copy + Into<i64>,
{
    let expected = required_len(input.atom_count);
    if out_coords.len() != expected {
        return Err(CoordgenError::LengthMismatch {
            expected,
            found: out_coords.len(),
        });
    }

    let molecule = lay_out(engine, validation, &input)?;
    write_interleaved(&molecule, out_coords)?;
    info!(atoms = molecule.len(), "Coordinates written to caller buffer.");
    Ok(())
}

/// Computes 2D coordinates into a buffer allocated here.
///
/// Accepts wide integers; values that do not fit the atomic number (`u8`) or
/// bond order (`u16`) storage are rejected. Nothing is allocated on failure.
///
/// # Return
///
/// An [`OwnedCoordinates`] of length `2 × atom_count`, to be passed to
/// [`release_coordinates`] once the caller is done with it.
#[instrument(skip_all, name = "generate_coordinates_owned", fields(atoms = atom_count, bonds = bond_count))]
pub fn generate_coordinates_owned(
    atom_count: usize,
    atomic_numbers: &[i32],
    bond_count: usize,
    bond_triples: &[i32],
) -> Result<OwnedCoordinates, CoordgenError> {
    generate_coordinates_owned_with(
        &mut Sketcher::new(),
        Validation::Structural,
        FlatMolecule::new(atom_count, atomic_numbers, bond_count, bond_triples),
    )
}

/// [`generate_coordinates_owned`] with an explicit engine and validation level.
pub fn generate_coordinates_owned_with<E, A, B>(
    engine: &mut E,
    validation: Validation,
    input: FlatMolecule<'_, A, B>,
) -> Result<OwnedCoordinates, CoordgenError>
where
    E: LayoutEngine + ?Sized,
    A: Copy + Into<i64>,
    B: Copy + Into<i64>,
{
    let molecule = lay_out(engine, validation, &input)?;
    let values = to_interleaved(&molecule)?.into_boxed_slice();
    info!(atoms = molecule.len(), "Coordinates allocated for caller.");
    Ok(OwnedCoordinates { values })
}

/// Releases a buffer returned by [`generate_coordinates_owned`].
pub fn release_coordinates(coordinates: OwnedCoordinates) {
    trace!(len = coordinates.len(), "Releasing coordinate buffer.");
    drop(coordinates);
}

/// Lays out a molecule given as atomic numbers and `[atom1, atom2, order]` bonds.
///
/// Input is validated strictly: no parallel bonds, bond orders `1..=3` and
/// real elements only.
///
/// # Return
///
/// One `(x, y)` pair per atom, in the order of `atoms`.
///
/// # Examples
///
/// ```
/// use coordgen::gen_coords;
///
/// let coords = gen_coords(&[7, 6], &[[0, 1, 1]]).unwrap();
/// assert_eq!(coords.len(), 2);
/// assert_ne!(coords[0], coords[1]);
/// ```
#[instrument(skip_all, name = "gen_coords", fields(atoms = atoms.len(), bonds = bonds.len()))]
pub fn gen_coords(atoms: &[u8], bonds: &[[u16; 3]]) -> Result<Vec<(f32, f32)>, CoordgenError> {
    let input = FlatMolecule::from_slices(atoms, bonds.as_flattened());
    let molecule = lay_out(&mut Sketcher::new(), Validation::Strict, &input)?;
    to_pairs(&molecule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::BuildError;
    use crate::engine::config::LayoutConfig;
    use crate::engine::error::EngineError;
    use crate::workflows::error::ErrorKind;

    #[test]
    fn nitrogen_carbon_scenario_fills_caller_buffer() {
        let mut coords = [f32::NAN; 4];
        generate_coordinates(2, &[7, 6], 1, &[0, 1, 1], &mut coords).unwrap();
        assert!(coords.iter().all(|v| v.is_finite()));
        assert_ne!((coords[0], coords[1]), (coords[2], coords[3]));
        assert_eq!(coords, [-25.0, 0.0, 25.0, 0.0]);
    }

    #[test]
    fn caller_buffer_results_are_deterministic() {
        let atoms = [6, 6, 6, 8, 7];
        let bonds = [0, 1, 1, 1, 2, 1, 2, 3, 2, 1, 4, 1];
        let mut first = [0.0f32; 10];
        let mut second = [0.0f32; 10];
        generate_coordinates(5, &atoms, 4, &bonds, &mut first).unwrap();
        generate_coordinates(5, &atoms, 4, &bonds, &mut second).unwrap();
        assert_eq!(first.map(f32::to_bits), second.map(f32::to_bits));
    }

    #[test]
    fn undersized_buffer_is_rejected_untouched() {
        let mut coords = [7.0f32; 3];
        let err = generate_coordinates(2, &[7, 6], 1, &[0, 1, 1], &mut coords).unwrap_err();
        assert_eq!(
            err,
            CoordgenError::LengthMismatch {
                expected: 4,
                found: 3
            }
        );
        assert_eq!(coords, [7.0; 3]);
    }

    #[test]
    fn out_of_range_bond_writes_nothing() {
        let mut coords = [7.0f32; 4];
        let err = generate_coordinates(2, &[7, 6], 1, &[0, 2, 1], &mut coords).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRangeBondIndex);
        assert_eq!(coords, [7.0; 4]);

        let err = generate_coordinates_owned(2, &[7, 6], 1, &[0, -1, 1]).unwrap_err();
        assert_eq!(
            err,
            CoordgenError::from(BuildError::OutOfRangeBondIndex {
                bond_idx: 0,
                atom: 1,
                provided: -1,
                atom_count: 2
            })
        );
    }

    #[test]
    fn empty_input_is_an_error_for_both_variants() {
        let mut coords: [f32; 0] = [];
        let err = generate_coordinates(0, &[], 0, &[], &mut coords).unwrap_err();
        assert_eq!(err, CoordgenError::from(EngineError::EmptyInput));

        let err = generate_coordinates_owned(0, &[], 0, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn declared_counts_must_match_arrays() {
        let mut coords = [0.0f32; 4];
        let err = generate_coordinates(2, &[7], 1, &[0, 1, 1], &mut coords).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArity);
    }

    #[test]
    fn owned_buffer_has_two_values_per_atom() {
        let coords = generate_coordinates_owned(3, &[6, 6, 8], 2, &[0, 1, 1, 1, 2, 2]).unwrap();
        assert_eq!(coords.len(), 6);
        assert_eq!(coords.atom_count(), 3);
        assert!(coords.as_slice().iter().all(|v| v.is_finite()));
        assert_eq!(coords.pairs().count(), 3);
        release_coordinates(coords);
    }

    #[test]
    fn owned_variant_rejects_values_that_do_not_fit_storage() {
        let err = generate_coordinates_owned(1, &[300], 0, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAtomicNumber);

        let err = generate_coordinates_owned(2, &[6, 6], 1, &[0, 1, 70_000]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBondOrder);
    }

    #[test]
    fn both_variants_agree() {
        let mut caller = [0.0f32; 6];
        generate_coordinates(3, &[6, 7, 8], 2, &[0, 1, 1, 1, 2, 1], &mut caller).unwrap();
        let owned = generate_coordinates_owned(3, &[6, 7, 8], 2, &[0, 1, 1, 1, 2, 1]).unwrap();
        assert_eq!(owned.as_slice(), &caller);
    }

    #[test]
    fn raw_parts_round_trip_preserves_buffer() {
        let coords = generate_coordinates_owned(2, &[7, 6], 1, &[0, 1, 1]).unwrap();
        let expected = coords.as_slice().to_vec();
        let (ptr, len) = coords.into_raw_parts();
        assert_eq!(len, 4);
        let rebuilt = unsafe { OwnedCoordinates::from_raw_parts(ptr, len) };
        assert_eq!(rebuilt.as_slice(), expected.as_slice());
        release_coordinates(rebuilt);
    }

    #[test]
    fn configured_engine_can_be_injected() {
        let config = LayoutConfig::builder().bond_length(1.0).build().unwrap();
        let mut sketcher = Sketcher::with_config(config);
        let mut coords = [0.0f32; 4];
        generate_coordinates_with(
            &mut sketcher,
            Validation::Structural,
            FlatMolecule::from_slices(&[7u8, 6], &[0u16, 1, 1]),
            &mut coords,
        )
        .unwrap();
        assert_eq!(coords, [-0.5, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn gen_coords_returns_one_pair_per_atom() {
        let coords = gen_coords(&[6, 6, 8], &[[0, 1, 1], [1, 2, 2]]).unwrap();
        assert_eq!(coords.len(), 3);
        assert!(coords.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
    }

    #[test]
    fn gen_coords_validates_strictly() {
        let err = gen_coords(&[6, 6], &[[0, 1, 1], [1, 0, 2]]).unwrap_err();
        assert_eq!(
            err,
            CoordgenError::from(BuildError::ParallelBonds { bond1: 0, bond2: 1 })
        );

        let err = gen_coords(&[0, 6], &[[0, 1, 1]]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAtomicNumber);

        let err = gen_coords(&[6, 6], &[[0, 1, 4]]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBondOrder);

        // The same bond order passes structural validation.
        assert!(generate_coordinates_owned(2, &[6, 6], 1, &[0, 1, 4]).is_ok());
    }
}
