//! Resolution errors.

/// A name that resolved to nothing, not even after autoloading.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Undefined symbol: {name}")]
    Undefined { name: String },
}
