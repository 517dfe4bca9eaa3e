use super::atom::Atom;
use super::molecule::MoleculeGraph;
use super::topology::BondOrder;
use std::collections::HashMap;
use thiserror::Error;
use tracing::trace;

/// Number of integers describing one bond: `(atom1, atom2, order)`.
pub const BOND_TRIPLE_LEN: usize = 3;

/// How much of the input is checked before the graph is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// Array arity, bond index range and storage width only.
    #[default]
    Structural,
    /// Everything in `Structural`, plus parallel bonds, multiplicities outside
    /// `1..=3` and atomic numbers outside `1..=118`.
    Strict,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("The {what} array holds {found} values, but {expected} were declared")]
    InvalidArity {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error(
        "Bond {bond_idx} references atom index {provided} at position {atom}, but only {atom_count} atoms exist"
    )]
    OutOfRangeBondIndex {
        bond_idx: usize,
        atom: u8,
        provided: i64,
        atom_count: usize,
    },

    #[error("Atom {atom_idx} has atomic number {provided}, which is not a valid element")]
    InvalidAtomicNumber { atom_idx: usize, provided: i64 },

    #[error("Bond {bond_idx} has multiplicity {provided}, which is not a valid bond order")]
    InvalidBondOrder { bond_idx: usize, provided: i64 },

    #[error("Bond {bond1} and bond {bond2} connect the same two atoms")]
    ParallelBonds { bond1: usize, bond2: usize },
}

/// A borrowed, flat description of a molecule as handed over by a foreign caller.
///
/// The declared counts are kept next to the slices so that a disagreement
/// between a count and its array can be reported instead of silently trusted.
#[derive(Debug, Clone, Copy)]
pub struct FlatMolecule<'a, A, B> {
    pub atom_count: usize,
    pub atomic_numbers: &'a [A],
    pub bond_count: usize,
    pub bond_triples: &'a [B],
}

impl<'a, A, B> FlatMolecule<'a, A, B>
where
    A: Copy + Into<i64>,
    B: Copy + Into<i64>,
{
    pub fn new(
        atom_count: usize,
        atomic_numbers: &'a [A],
        bond_count: usize,
        bond_triples: &'a [B],
    ) -> Self {
        Self {
            atom_count,
            atomic_numbers,
            bond_count,
            bond_triples,
        }
    }

    /// Derives both counts from the slice lengths.
    ///
    /// A bond array whose length is not a multiple of three still fails the
    /// arity check when built.
    pub fn from_slices(atomic_numbers: &'a [A], bond_triples: &'a [B]) -> Self {
        Self::new(
            atomic_numbers.len(),
            atomic_numbers,
            bond_triples.len() / BOND_TRIPLE_LEN,
            bond_triples,
        )
    }

    pub fn build(&self, validation: Validation) -> Result<MoleculeGraph, BuildError> {
        build_graph_with(
            self.atom_count,
            self.atomic_numbers,
            self.bond_count,
            self.bond_triples,
            validation,
        )
    }
}

/// Builds a molecule graph from flat atom and bond arrays with structural validation.
///
/// See [`build_graph_with`] for the full contract.
pub fn build_graph<A, B>(
    atom_count: usize,
    atomic_numbers: &[A],
    bond_count: usize,
    bond_triples: &[B],
) -> Result<MoleculeGraph, BuildError>
where
    A: Copy + Into<i64>,
    B: Copy + Into<i64>,
{
    build_graph_with(
        atom_count,
        atomic_numbers,
        bond_count,
        bond_triples,
        Validation::Structural,
    )
}

/// Builds a molecule graph from flat atom and bond arrays.
///
/// One atom is created per entry of `atomic_numbers`, in order, followed by one
/// bond per consecutive `(atom1, atom2, order)` triple of `bond_triples`. Atom
/// indices are 0-based positions in `atomic_numbers`.
///
/// The input integer types are generic so that narrow (`u8`/`u16`) and wide
/// (`i32`) calling conventions share one code path; values are narrowed into
/// the graph's storage types and rejected if they don't fit.
///
/// # Arguments
///
/// * `atom_count` - The declared number of atoms.
/// * `atomic_numbers` - One atomic number per atom.
/// * `bond_count` - The declared number of bonds.
/// * `bond_triples` - `3 * bond_count` integers.
/// * `validation` - The validation level to apply.
///
/// # Errors
///
/// With [`Validation::Structural`], checks run in input order: array arity,
/// then atomic number width (per atom), then bond index range and order width
/// (per bond, first atom before second). With [`Validation::Strict`], the
/// bonds are checked first (parallel bonds, then index range, then
/// multiplicity, per bond) and atomic numbers last. The first failure is
/// returned in both cases.
pub fn build_graph_with<A, B>(
    atom_count: usize,
    atomic_numbers: &[A],
    bond_count: usize,
    bond_triples: &[B],
    validation: Validation,
) -> Result<MoleculeGraph, BuildError>
where
    A: Copy + Into<i64>,
    B: Copy + Into<i64>,
{
    check_arity(atom_count, atomic_numbers.len(), bond_count, bond_triples.len())?;

    let (atoms, bonds) = match validation {
        Validation::Structural => {
            let atoms = resolve_atoms(atomic_numbers, validation)?;
            let bonds = resolve_bonds(atom_count, bond_triples, validation)?;
            (atoms, bonds)
        }
        Validation::Strict => {
            let bonds = resolve_bonds(atom_count, bond_triples, validation)?;
            let atoms = resolve_atoms(atomic_numbers, validation)?;
            (atoms, bonds)
        }
    };

    let mut molecule = MoleculeGraph::with_capacity(atoms.len(), bonds.len());
    let ids: Vec<_> = atoms
        .into_iter()
        .map(|atomic_number| molecule.add_atom(Atom::new(atomic_number)))
        .collect();
    for bond in bonds {
        // Indices were range-checked above.
        molecule.add_bond(ids[bond.atoms[0]], ids[bond.atoms[1]], bond.order);
    }

    trace!(
        atoms = molecule.len(),
        bonds = molecule.bond_count(),
        "Molecule graph built."
    );
    Ok(molecule)
}

struct ResolvedBond {
    atoms: [usize; 2],
    order: BondOrder,
}

fn check_arity(
    atom_count: usize,
    atoms_len: usize,
    bond_count: usize,
    bonds_len: usize,
) -> Result<(), BuildError> {
    if atoms_len != atom_count {
        return Err(BuildError::InvalidArity {
            what: "atomic number",
            expected: atom_count,
            found: atoms_len,
        });
    }
    let expected = bond_count.saturating_mul(BOND_TRIPLE_LEN);
    if bonds_len != expected {
        return Err(BuildError::InvalidArity {
            what: "bond triple",
            expected,
            found: bonds_len,
        });
    }
    Ok(())
}

fn resolve_atoms<A>(atomic_numbers: &[A], validation: Validation) -> Result<Vec<u8>, BuildError>
where
    A: Copy + Into<i64>,
{
    atomic_numbers
        .iter()
        .enumerate()
        .map(|(atom_idx, &raw)| {
            let provided: i64 = raw.into();
            let invalid = BuildError::InvalidAtomicNumber { atom_idx, provided };
            let atomic_number = u8::try_from(provided).map_err(|_| invalid.clone())?;
            if validation == Validation::Strict && !Atom::new(atomic_number).is_known_element() {
                return Err(invalid);
            }
            Ok(atomic_number)
        })
        .collect()
}

fn resolve_bonds<B>(
    atom_count: usize,
    bond_triples: &[B],
    validation: Validation,
) -> Result<Vec<ResolvedBond>, BuildError>
where
    B: Copy + Into<i64>,
{
    let strict = validation == Validation::Strict;
    let mut seen_pairs: HashMap<[i64; 2], usize> = HashMap::new();
    let mut bonds = Vec::with_capacity(bond_triples.len() / BOND_TRIPLE_LEN);

    for (bond_idx, triple) in bond_triples.chunks_exact(BOND_TRIPLE_LEN).enumerate() {
        let raw_atoms: [i64; 2] = [triple[0].into(), triple[1].into()];
        let raw_order: i64 = triple[2].into();

        if strict {
            let mut pair = raw_atoms;
            pair.sort_unstable();
            if let Some(bond1) = seen_pairs.insert(pair, bond_idx) {
                return Err(BuildError::ParallelBonds {
                    bond1,
                    bond2: bond_idx,
                });
            }
        }

        let mut atoms = [0usize; 2];
        for (position, (&provided, slot)) in raw_atoms.iter().zip(atoms.iter_mut()).enumerate() {
            *slot = usize::try_from(provided)
                .ok()
                .filter(|&index| index < atom_count)
                .ok_or(BuildError::OutOfRangeBondIndex {
                    bond_idx,
                    atom: position as u8,
                    provided,
                    atom_count,
                })?;
        }

        let invalid_order = BuildError::InvalidBondOrder {
            bond_idx,
            provided: raw_order,
        };
        let multiplicity = u16::try_from(raw_order).map_err(|_| invalid_order.clone())?;
        let order = BondOrder::from(multiplicity);
        if strict && !order.is_standard() {
            return Err(invalid_order);
        }

        bonds.push(ResolvedBond { atoms, order });
    }

    Ok(bonds)
}
