use super::config::LayoutConfig;
use super::placement::LayoutTopology;
use crate::core::utils::geometry::separation_direction;
use nalgebra::{Point2, Vector2};
use std::collections::{HashMap, HashSet};
use tracing::trace;

const COINCIDENT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RelaxationReport {
    pub iterations: usize,
    pub converged: bool,
    pub max_displacement: f64,
}

#[derive(Debug, Clone, Copy)]
struct Spring {
    a: usize,
    b: usize,
    target: f64,
    stiffness: f64,
}

/// Springs for one fragment, in fragment-local indices.
///
/// Bonds pull towards `bond_length`. Atoms with two or three neighbors also
/// get a softer spring between each pair of those neighbors, sized so the
/// angle between the two bonds settles at the atom's ideal bond angle.
fn build_springs(
    topology: &LayoutTopology,
    fragment: &[usize],
    config: &LayoutConfig,
) -> (Vec<Spring>, HashSet<(usize, usize)>) {
    let local: HashMap<usize, usize> = fragment
        .iter()
        .enumerate()
        .map(|(local_idx, &atom)| (atom, local_idx))
        .collect();
    let local_neighbors = |atom: usize| -> Vec<usize> {
        topology.neighbors[atom]
            .iter()
            .filter_map(|n| local.get(n).copied())
            .collect()
    };

    let mut springs = Vec::new();
    let mut constrained = HashSet::new();

    for (a, &atom) in fragment.iter().enumerate() {
        for b in local_neighbors(atom) {
            if a < b && constrained.insert((a, b)) {
                springs.push(Spring {
                    a,
                    b,
                    target: config.bond_length,
                    stiffness: config.spring_constant,
                });
            }
        }
    }

    for &center in fragment {
        if !(2..=3).contains(&topology.degree(center)) {
            continue;
        }
        let half_angle = topology.ideal_bond_angle(center) / 2.0;
        let target = 2.0 * config.bond_length * half_angle.sin();
        let around = local_neighbors(center);
        for (i, &first) in around.iter().enumerate() {
            for &second in &around[i + 1..] {
                let key = (first.min(second), first.max(second));
                if constrained.insert(key) {
                    springs.push(Spring {
                        a: key.0,
                        b: key.1,
                        target,
                        stiffness: config.spring_constant / 2.0,
                    });
                }
            }
        }
    }

    (springs, constrained)
}

/// Unit vector from `a` to `b` and their distance.
fn separation(positions: &[Point2<f64>], a: usize, b: usize) -> (Vector2<f64>, f64) {
    let delta = positions[b] - positions[a];
    let dist = delta.norm();
    if dist > COINCIDENT_EPSILON {
        (delta / dist, dist)
    } else {
        (separation_direction(a, b), 0.0)
    }
}

/// Refines a placed fragment in place with spring and repulsion steps.
///
/// `positions` is indexed like `fragment`. Every step moves each atom by at
/// most `max_step × bond_length`; iteration stops once no atom moves more
/// than `convergence_threshold` or after `max_iterations` steps.
pub(crate) fn relax(
    positions: &mut [Point2<f64>],
    topology: &LayoutTopology,
    fragment: &[usize],
    config: &LayoutConfig,
) -> RelaxationReport {
    let n = positions.len();
    if n < 2 {
        return RelaxationReport {
            iterations: 0,
            converged: true,
            max_displacement: 0.0,
        };
    }

    let (springs, constrained) = build_springs(topology, fragment, config);
    let step_limit = config.max_step * config.bond_length;
    let cutoff = config.repulsion_cutoff * config.bond_length;

    let mut report = RelaxationReport {
        iterations: 0,
        converged: false,
        max_displacement: f64::INFINITY,
    };
    let mut displacement = vec![Vector2::zeros(); n];

    for iteration in 1..=config.max_iterations {
        displacement.iter_mut().for_each(|d| *d = Vector2::zeros());

        for spring in &springs {
            let (unit, dist) = separation(positions, spring.a, spring.b);
            let shift = unit * (0.5 * spring.stiffness * (dist - spring.target));
            displacement[spring.a] += shift;
            displacement[spring.b] -= shift;
        }

        for a in 0..n {
            for b in a + 1..n {
                if constrained.contains(&(a, b)) {
                    continue;
                }
                let (unit, dist) = separation(positions, a, b);
                if dist < cutoff {
                    let shift = unit * (0.5 * config.repulsion_constant * (cutoff - dist));
                    displacement[a] -= shift;
                    displacement[b] += shift;
                }
            }
        }

        let mut max_displacement = 0.0_f64;
        for (position, step) in positions.iter_mut().zip(&displacement) {
            let length = step.norm();
            let step = if length > step_limit {
                step * (step_limit / length)
            } else {
                *step
            };
            *position += step;
            max_displacement = max_displacement.max(step.norm());
        }

        report.iterations = iteration;
        report.max_displacement = max_displacement;
        if max_displacement < config.convergence_threshold {
            report.converged = true;
            break;
        }
    }

    trace!(
        atoms = n,
        springs = springs.len(),
        iterations = report.iterations,
        converged = report.converged,
        "Relaxation finished."
    );
    report
}
