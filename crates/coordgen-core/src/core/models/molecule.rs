use super::atom::Atom;
use super::ids::AtomId;
use super::topology::{Bond, BondOrder};
use nalgebra::Point2;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::VecDeque;

/// Represents a molecule as an object graph of atoms and bonds.
///
/// This is the structure handed to a layout engine. Atoms are stored in a slot
/// map for stable, cheap-to-copy identifiers, while a separate ordered list
/// records the sequence in which atoms were added. That insertion order is the
/// coordinate output order: position *i* of any extracted coordinate buffer
/// belongs to the *i*-th atom added here.
#[derive(Debug, Clone, Default)]
pub struct MoleculeGraph {
    /// Primary storage for atoms using a slot map for efficient ID management.
    atoms: SlotMap<AtomId, Atom>,
    /// Atom IDs in insertion order.
    order: Vec<AtomId>,
    /// Reverse lookup from atom ID to its insertion index.
    index: SecondaryMap<AtomId, usize>,
    /// List of all bonds, in insertion order.
    bonds: Vec<Bond>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
}

impl MoleculeGraph {
    /// Creates a new, empty molecule graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty molecule graph with room for the given numbers of atoms and bonds.
    ///
    /// # Arguments
    ///
    /// * `atoms` - The expected number of atoms.
    /// * `bonds` - The expected number of bonds.
    pub fn with_capacity(atoms: usize, bonds: usize) -> Self {
        Self {
            atoms: SlotMap::with_capacity_and_key(atoms),
            order: Vec::with_capacity(atoms),
            index: SecondaryMap::with_capacity(atoms),
            bonds: Vec::with_capacity(bonds),
            bond_adjacency: SecondaryMap::with_capacity(atoms),
        }
    }

    /// Returns the number of atoms in the graph.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the graph contains no atoms.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the number of bonds in the graph.
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Appends an atom to the graph.
    ///
    /// # Return
    ///
    /// The ID of the new atom. Its insertion index is `self.len() - 1`
    /// immediately after the call.
    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let atom_id = self.atoms.insert(atom);
        self.index.insert(atom_id, self.order.len());
        self.order.push(atom_id);
        self.bond_adjacency.insert(atom_id, Vec::new());
        atom_id
    }

    /// Adds a bond between two atoms.
    ///
    /// Every call records a bond, so repeated pairs are kept as given. The
    /// adjacency cache, however, lists each neighbor once and ignores
    /// self-loops, since layout only cares about distinct neighbors.
    ///
    /// # Arguments
    ///
    /// * `atom1_id` - ID of the first atom.
    /// * `atom2_id` - ID of the second atom.
    /// * `order` - The order of the bond.
    ///
    /// # Return
    ///
    /// Returns `Some(())` if successful, otherwise `None` (if either atom doesn't exist).
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Option<()> {
        if !self.atoms.contains_key(atom1_id) || !self.atoms.contains_key(atom2_id) {
            return None;
        }

        self.bonds.push(Bond::new(atom1_id, atom2_id, order));

        if atom1_id != atom2_id && !self.bond_adjacency[atom1_id].contains(&atom2_id) {
            self.bond_adjacency[atom1_id].push(atom2_id);
            self.bond_adjacency[atom2_id].push(atom1_id);
        }
        Some(())
    }

    /// Retrieves an immutable reference to an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Retrieves a mutable reference to an atom by its ID.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Retrieves the atom added at the given insertion index.
    pub fn atom_at(&self, index: usize) -> Option<&Atom> {
        self.order.get(index).and_then(|&id| self.atoms.get(id))
    }

    /// Returns the ID of the atom added at the given insertion index.
    pub fn id_at(&self, index: usize) -> Option<AtomId> {
        self.order.get(index).copied()
    }

    /// Returns the insertion index of an atom.
    pub fn index_of(&self, id: AtomId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns all atom IDs in insertion order.
    pub fn atom_ids(&self) -> &[AtomId] {
        &self.order
    }

    /// Returns an iterator over all atoms in insertion order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(AtomId, &Atom)` pairs.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.order.iter().map(move |&id| (id, &self.atoms[id]))
    }

    /// Returns a slice of all bonds in insertion order.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Returns the distinct neighbors of an atom; empty if the atom doesn't exist.
    pub fn neighbors(&self, id: AtomId) -> &[AtomId] {
        self.bond_adjacency
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the number of distinct neighbors of an atom.
    pub fn degree(&self, id: AtomId) -> usize {
        self.neighbors(id).len()
    }

    /// Assigns a 2D position to an atom.
    ///
    /// # Return
    ///
    /// Returns `Some(())` if successful, otherwise `None` (if the atom doesn't exist).
    pub fn set_position(&mut self, id: AtomId, position: Point2<f64>) -> Option<()> {
        self.atoms.get_mut(id)?.position = Some(position);
        Some(())
    }

    /// Forgets every assigned position.
    pub fn clear_positions(&mut self) {
        for (_, atom) in self.atoms.iter_mut() {
            atom.position = None;
        }
    }

    /// Returns `true` if every atom carries a finite position.
    pub fn is_fully_positioned(&self) -> bool {
        self.atoms.values().all(Atom::has_finite_position)
    }

    /// Splits the graph into its connected components.
    ///
    /// Fragments are ordered by their lowest insertion index, and atoms within a
    /// fragment appear in breadth-first order starting from that atom.
    ///
    /// # Return
    ///
    /// One vector of atom IDs per connected component.
    pub fn fragments(&self) -> Vec<Vec<AtomId>> {
        let mut visited: SecondaryMap<AtomId, ()> = SecondaryMap::with_capacity(self.len());
        let mut fragments = Vec::new();

        for &start in &self.order {
            if visited.contains_key(start) {
                continue;
            }
            visited.insert(start, ());

            let mut fragment = Vec::new();
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                fragment.push(current);
                for &neighbor in self.neighbors(current) {
                    if visited.insert(neighbor, ()).is_none() {
                        queue.push_back(neighbor);
                    }
                }
            }
            fragments.push(fragment);
        }

        fragments
    }
}
