use nalgebra::Point2;

/// Largest atomic number of a known element.
pub const MAX_ATOMIC_NUMBER: u8 = 118;

/// Represents an atom node in a molecule graph.
///
/// An atom carries exactly what a 2D depiction needs: its element (as an
/// atomic number) and, once a layout engine has run, its position in the
/// drawing plane. The position is `None` until layout assigns it, so the
/// "not yet laid out" state can never be mistaken for a real coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atomic number identifying the element (e.g., 6 for carbon).
    pub atomic_number: u8,
    /// The 2D depiction coordinates, populated by a layout engine.
    pub position: Option<Point2<f64>>,
}

impl Atom {
    /// Creates a new `Atom` with the given atomic number and no position.
    ///
    /// # Arguments
    ///
    /// * `atomic_number` - The atomic number of the element.
    pub fn new(atomic_number: u8) -> Self {
        Self {
            atomic_number,
            position: None,
        }
    }

    /// Returns `true` if the atomic number belongs to a known element (`1..=118`).
    pub fn is_known_element(&self) -> bool {
        (1..=MAX_ATOMIC_NUMBER).contains(&self.atomic_number)
    }

    /// Returns `true` if the atom has a position and both components are finite.
    pub fn has_finite_position(&self) -> bool {
        self.position
            .is_some_and(|p| p.x.is_finite() && p.y.is_finite())
    }
}
