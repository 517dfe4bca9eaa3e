use crate::core::models::molecule::MoleculeGraph;
use crate::core::models::topology::BondOrder;
use crate::core::utils::geometry::{angle_of, direction};
use nalgebra::Point2;
use std::collections::{HashMap, HashSet, VecDeque};
use std::f64::consts::{PI, TAU};

/// Index-based snapshot of a molecule's connectivity.
#[derive(Debug, Clone, Default)]
pub(crate) struct LayoutTopology {
    pub neighbors: Vec<Vec<usize>>,
    pub fragments: Vec<Vec<usize>>,
    orders: HashMap<(usize, usize), BondOrder>,
    ring_bonds: HashSet<(usize, usize)>,
}

impl LayoutTopology {
    pub fn from_molecule(molecule: &MoleculeGraph) -> Self {
        let neighbors: Vec<Vec<usize>> = molecule
            .atom_ids()
            .iter()
            .map(|&id| {
                molecule
                    .neighbors(id)
                    .iter()
                    .filter_map(|&n| molecule.index_of(n))
                    .collect()
            })
            .collect();

        let fragments = molecule
            .fragments()
            .into_iter()
            .map(|fragment| {
                fragment
                    .into_iter()
                    .filter_map(|id| molecule.index_of(id))
                    .collect()
            })
            .collect();

        let mut orders = HashMap::new();
        for bond in molecule.bonds() {
            if let (Some(a), Some(b)) = (
                molecule.index_of(bond.atom1_id),
                molecule.index_of(bond.atom2_id),
            ) {
                if a != b {
                    // First bond between a pair wins.
                    orders.entry(pair_key(a, b)).or_insert(bond.order);
                }
            }
        }

        let ring_bonds = orders
            .keys()
            .copied()
            .filter(|&(a, b)| connected_without(&neighbors, a, b))
            .collect();

        Self {
            neighbors,
            fragments,
            orders,
            ring_bonds,
        }
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.neighbors[atom].len()
    }

    pub fn order(&self, a: usize, b: usize) -> Option<BondOrder> {
        self.orders.get(&pair_key(a, b)).copied()
    }

    /// A bond is a ring bond when its atoms stay connected without it.
    pub fn is_ring_bond(&self, a: usize, b: usize) -> bool {
        self.ring_bonds.contains(&pair_key(a, b))
    }

    pub fn is_ring_atom(&self, atom: usize) -> bool {
        self.neighbors[atom]
            .iter()
            .any(|&n| self.is_ring_bond(atom, n))
    }

    /// An atom with exactly two neighbors is drawn linear when it carries a
    /// triple bond or two double bonds (e.g. alkynes, nitriles, allenes).
    pub fn is_linear(&self, atom: usize) -> bool {
        let neighbors = &self.neighbors[atom];
        if neighbors.len() != 2 {
            return false;
        }
        let orders: Vec<BondOrder> = neighbors
            .iter()
            .filter_map(|&n| self.order(atom, n))
            .collect();
        orders.contains(&BondOrder::Triple)
            || (orders.len() == 2 && orders.iter().all(|&o| o == BondOrder::Double))
    }

    /// Ideal angle between two bonds meeting at `atom`.
    pub fn ideal_bond_angle(&self, atom: usize) -> f64 {
        match self.degree(atom) {
            2 if self.is_linear(atom) => PI,
            0..=3 => TAU / 3.0,
            n => TAU / n as f64,
        }
    }
}

fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

/// Breadth-first search from `from` to `to` that ignores the direct edge between them.
fn connected_without(neighbors: &[Vec<usize>], from: usize, to: usize) -> bool {
    let mut visited = vec![false; neighbors.len()];
    visited[from] = true;
    let mut queue = VecDeque::from([from]);
    while let Some(atom) = queue.pop_front() {
        for &next in &neighbors[atom] {
            if atom == from && next == to {
                continue;
            }
            if next == to {
                return true;
            }
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }
    false
}

/// Places a fragment by breadth-first growth from its most connected atom.
///
/// Every bond is drawn at `bond_length`. Chains zig-zag at 120°, ring bonds
/// curl towards the ring atoms already placed, linear atoms continue
/// straight, and branch points spread their bonds evenly. Ring closures that
/// do not come out exact (fused or strained rings) are left to relaxation.
///
/// # Return
///
/// Positions for the fragment's atoms, in the order of `fragment`.
pub(crate) fn place_fragment(
    topology: &LayoutTopology,
    fragment: &[usize],
    bond_length: f64,
) -> Vec<Point2<f64>> {
    let local: HashMap<usize, usize> = fragment
        .iter()
        .enumerate()
        .map(|(local_idx, &atom)| (atom, local_idx))
        .collect();
    let mut positions: Vec<Option<Point2<f64>>> = vec![None; fragment.len()];

    let Some(&root) = fragment
        .iter()
        .max_by_key(|&&atom| (topology.degree(atom), std::cmp::Reverse(atom)))
    else {
        return Vec::new();
    };

    positions[local[&root]] = Some(Point2::origin());
    let mut queue: VecDeque<(usize, Option<usize>)> = VecDeque::from([(root, None)]);

    while let Some((atom, parent)) = queue.pop_front() {
        let Some(origin) = positions[local[&atom]] else {
            continue;
        };
        let others: Vec<usize> = topology.neighbors[atom]
            .iter()
            .copied()
            .filter(|&n| Some(n) != parent)
            .collect();

        let angles = match parent.and_then(|p| positions[local[&p]].map(|pos| (p, pos))) {
            None => root_angles(topology, atom, others.len()),
            Some((parent, parent_pos)) => {
                let back = angle_of(&(parent_pos - origin));
                let surroundings = Surroundings {
                    topology,
                    fragment,
                    positions: &positions,
                    skip: [local[&atom], local[&parent]],
                    origin,
                    bond_length,
                };
                if others.len() == 1 {
                    vec![chain_angle(topology, (atom, others[0]), back, &surroundings)]
                } else {
                    let placed: Vec<Option<Point2<f64>>> =
                        others.iter().map(|n| positions[local[n]]).collect();
                    branch_angles(topology, atom, (&others[..], &placed[..]), back, &surroundings)
                }
            }
        };

        for (&neighbor, angle) in others.iter().zip(angles) {
            let slot = &mut positions[local[&neighbor]];
            if slot.is_none() {
                *slot = Some(origin + direction(angle) * bond_length);
                queue.push_back((neighbor, Some(atom)));
            }
        }
    }

    positions
        .into_iter()
        .map(|p| p.unwrap_or_else(Point2::origin))
        .collect()
}

fn root_angles(topology: &LayoutTopology, atom: usize, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        2 if topology.is_linear(atom) => vec![0.0, PI],
        2 => vec![PI / 6.0, 5.0 * PI / 6.0],
        n => (0..n).map(|k| TAU * k as f64 / n as f64).collect(),
    }
}

/// What has been drawn so far around the atom being expanded.
struct Surroundings<'a> {
    topology: &'a LayoutTopology,
    fragment: &'a [usize],
    positions: &'a [Option<Point2<f64>>],
    /// The atom and its parent, which are equidistant from every candidate.
    skip: [usize; 2],
    origin: Point2<f64>,
    bond_length: f64,
}

impl Surroundings<'_> {
    /// Distance from the end of a bond drawn at `angle` to the nearest placed
    /// atom. With `rings_only`, substituents and chain atoms are ignored.
    fn clearance(&self, angle: f64, rings_only: bool) -> f64 {
        let end = self.origin + direction(angle) * self.bond_length;
        self.positions
            .iter()
            .enumerate()
            .filter(|(local_idx, _)| !self.skip.contains(local_idx))
            .filter(|(local_idx, _)| {
                !rings_only || self.topology.is_ring_atom(self.fragment[*local_idx])
            })
            .filter_map(|(_, p)| *p)
            .map(|p| (p - end).norm())
            .fold(f64::INFINITY, f64::min)
    }
}

/// Direction of the single outgoing bond of a chain atom.
///
/// Linear atoms continue straight ahead. Otherwise acyclic bonds take the
/// 120° candidate farther from everything placed, giving a trans zig-zag;
/// ring bonds take the candidate nearer to the ring atoms placed so far so
/// the ring closes on itself.
fn chain_angle(
    topology: &LayoutTopology,
    (atom, child): (usize, usize),
    back: f64,
    surroundings: &Surroundings<'_>,
) -> f64 {
    if topology.is_linear(atom) {
        return back + PI;
    }
    let ring = topology.is_ring_bond(atom, child);
    let left = back + TAU / 3.0;
    let right = back - TAU / 3.0;
    let left_clearance = surroundings.clearance(left, ring);
    let right_clearance = surroundings.clearance(right, ring);
    let prefer_right = if ring {
        right_clearance + 1e-9 < left_clearance
    } else {
        right_clearance > left_clearance + 1e-9
    };
    if prefer_right { right } else { left }
}

/// Directions for the bonds leaving a branch point, aligned with `others`.
///
/// The free slots are spread evenly around the atom. A neighbor that is
/// already placed claims the slot pointing closest to it; unplaced ring
/// neighbors then claim the slots that curl towards the ring, and
/// substituents take what is left in slot order.
fn branch_angles(
    topology: &LayoutTopology,
    atom: usize,
    (others, placed): (&[usize], &[Option<Point2<f64>>]),
    back: f64,
    surroundings: &Surroundings<'_>,
) -> Vec<f64> {
    let total = others.len() + 1;
    let mut free: Vec<f64> = (1..total)
        .map(|k| back + TAU * k as f64 / total as f64)
        .collect();
    let mut angles: Vec<Option<f64>> = vec![None; others.len()];

    for (angle, position) in angles.iter_mut().zip(placed) {
        if let Some(position) = *position {
            let toward = angle_of(&(position - surroundings.origin));
            *angle = take_best(&mut free, |slot| angle_gap(slot, toward));
        }
    }
    for (angle, &neighbor) in angles.iter_mut().zip(others) {
        if angle.is_none() && topology.is_ring_bond(atom, neighbor) {
            *angle = take_best(&mut free, |slot| surroundings.clearance(slot, true));
        }
    }
    for angle in angles.iter_mut().filter(|a| a.is_none()) {
        *angle = take_best(&mut free, |_| 0.0);
    }

    angles
        .into_iter()
        .map(|angle| angle.unwrap_or(back + PI))
        .collect()
}

/// Removes and returns the lowest-scoring slot; the earliest wins ties.
fn take_best(free: &mut Vec<f64>, score: impl Fn(f64) -> f64) -> Option<f64> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &slot) in free.iter().enumerate() {
        let value = score(slot);
        if best.is_none_or(|(_, lowest)| value + 1e-9 < lowest) {
            best = Some((idx, value));
        }
    }
    best.map(|(idx, _)| free.remove(idx))
}

/// Unsigned difference between two angles, in `0..=PI`.
fn angle_gap(a: f64, b: f64) -> f64 {
    let gap = (a - b).rem_euclid(TAU);
    gap.min(TAU - gap)
}
