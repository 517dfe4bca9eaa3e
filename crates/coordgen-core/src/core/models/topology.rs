use super::ids::AtomId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Other(u16), // Any multiplicity outside 1..=3, kept verbatim
}

impl BondOrder {
    pub fn multiplicity(self) -> u16 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Other(n) => n,
        }
    }

    pub fn is_standard(self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<u16> for BondOrder {
    fn from(multiplicity: u16) -> Self {
        match multiplicity {
            1 => Self::Single,
            2 => Self::Double,
            3 => Self::Triple,
            n => Self::Other(n),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "Single"),
            Self::Double => write!(f, "Double"),
            Self::Triple => write!(f, "Triple"),
            Self::Other(n) => write!(f, "Order({})", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1_id: AtomId, // ID of the first atom
    pub atom2_id: AtomId, // ID of the second atom
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Self {
        Self {
            atom1_id,
            atom2_id,
            order,
        }
    }
}
