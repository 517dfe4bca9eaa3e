use coordgen::ErrorKind;

/// Result code returned by every fallible `coordgen_*` function.
#[allow(non_camel_case_types)]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum coordgen_status_t {
    COORDGEN_STATUS_OK = 0,
    COORDGEN_STATUS_INVALID_ARITY = 1,
    COORDGEN_STATUS_OUT_OF_RANGE_BOND_INDEX = 2,
    COORDGEN_STATUS_EMPTY_INPUT = 3,
    COORDGEN_STATUS_LAYOUT_FAILED = 4,
    COORDGEN_STATUS_LENGTH_MISMATCH = 5,
    COORDGEN_STATUS_INVALID_ATOMIC_NUMBER = 6,
    COORDGEN_STATUS_INVALID_BOND_ORDER = 7,
    COORDGEN_STATUS_PARALLEL_BONDS = 8,
    COORDGEN_STATUS_NULL_POINTER = 9,
    COORDGEN_STATUS_PANIC = 10,
}

impl From<ErrorKind> for coordgen_status_t {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidArity => Self::COORDGEN_STATUS_INVALID_ARITY,
            ErrorKind::OutOfRangeBondIndex => Self::COORDGEN_STATUS_OUT_OF_RANGE_BOND_INDEX,
            ErrorKind::EmptyInput => Self::COORDGEN_STATUS_EMPTY_INPUT,
            ErrorKind::LayoutFailed => Self::COORDGEN_STATUS_LAYOUT_FAILED,
            ErrorKind::LengthMismatch => Self::COORDGEN_STATUS_LENGTH_MISMATCH,
            ErrorKind::InvalidAtomicNumber => Self::COORDGEN_STATUS_INVALID_ATOMIC_NUMBER,
            ErrorKind::InvalidBondOrder => Self::COORDGEN_STATUS_INVALID_BOND_ORDER,
            ErrorKind::ParallelBonds => Self::COORDGEN_STATUS_PARALLEL_BONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(coordgen_status_t::COORDGEN_STATUS_OK as i32, 0);
        assert_eq!(coordgen_status_t::COORDGEN_STATUS_LENGTH_MISMATCH as i32, 5);
        assert_eq!(coordgen_status_t::COORDGEN_STATUS_PANIC as i32, 10);
    }

    #[test]
    fn every_error_kind_maps_to_a_distinct_failure_status() {
        let kinds = [
            ErrorKind::InvalidArity,
            ErrorKind::OutOfRangeBondIndex,
            ErrorKind::EmptyInput,
            ErrorKind::LayoutFailed,
            ErrorKind::LengthMismatch,
            ErrorKind::InvalidAtomicNumber,
            ErrorKind::InvalidBondOrder,
            ErrorKind::ParallelBonds,
        ];
        let statuses: std::collections::HashSet<coordgen_status_t> =
            kinds.into_iter().map(coordgen_status_t::from).collect();
        assert_eq!(statuses.len(), kinds.len());
        assert!(!statuses.contains(&coordgen_status_t::COORDGEN_STATUS_OK));
    }
}
