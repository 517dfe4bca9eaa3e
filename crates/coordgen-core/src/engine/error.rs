use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Cannot lay out a molecule with no atoms")]
    EmptyInput,

    #[error("Layout failed: {reason}")]
    LayoutFailed { reason: String },
}

impl EngineError {
    pub fn layout_failed(reason: impl Into<String>) -> Self {
        Self::LayoutFailed {
            reason: reason.into(),
        }
    }
}
