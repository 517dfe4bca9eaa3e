use crate::core::models::builder::BuildError;
use crate::engine::error::EngineError;
use thiserror::Error;

/// Flat classification of every failure a coordinate request can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArity,
    OutOfRangeBondIndex,
    EmptyInput,
    LayoutFailed,
    LengthMismatch,
    InvalidAtomicNumber,
    InvalidBondOrder,
    ParallelBonds,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoordgenError {
    #[error("Invalid molecule input: {source}")]
    Build {
        #[from]
        source: BuildError,
    },

    #[error("Layout engine error: {source}")]
    Engine {
        #[from]
        source: EngineError,
    },

    #[error("Coordinate buffer holds {found} values, but {expected} are required")]
    LengthMismatch { expected: usize, found: usize },
}

impl CoordgenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Build { source } => match source {
                BuildError::InvalidArity { .. } => ErrorKind::InvalidArity,
                BuildError::OutOfRangeBondIndex { .. } => ErrorKind::OutOfRangeBondIndex,
                BuildError::InvalidAtomicNumber { .. } => ErrorKind::InvalidAtomicNumber,
                BuildError::InvalidBondOrder { .. } => ErrorKind::InvalidBondOrder,
                BuildError::ParallelBonds { .. } => ErrorKind::ParallelBonds,
            },
            Self::Engine { source } => match source {
                EngineError::EmptyInput => ErrorKind::EmptyInput,
                EngineError::LayoutFailed { .. } => ErrorKind::LayoutFailed,
            },
            Self::LengthMismatch { .. } => ErrorKind::LengthMismatch,
        }
    }
}
