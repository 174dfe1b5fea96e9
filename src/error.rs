use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// An unchecked lookup was made outside `[first_index, last_index]`.
    #[error("index {index} is out of bounds for a workflow of length {len}")]
    IndexOutOfBounds { index: isize, len: usize },

    #[error("failed to encode workflow diagnostics")]
    Encode(#[from] serde_json::Error),
}
