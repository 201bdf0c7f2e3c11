use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ViewError {
    #[error("index {index} is out of bounds for a proxy view of {len} elements")]
    IndexOutOfRange { index: usize, len: usize },
}
