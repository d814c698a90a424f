use thiserror::Error;

/// Reasons a tree operation can be rejected.
///
/// A rejected operation never modifies the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    /// No key was supplied.
    #[error("key must not be absent")]
    InvalidKey,

    /// The key is already stored in the tree.
    #[error("key is already present")]
    DuplicateKey,

    /// The key is not stored in the tree.
    #[error("key not found")]
    KeyNotFound,
}

pub type Result<T> = std::result::Result<T, TreeError>;
