/// Error returned when a value cannot be canonicalized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// The input (or one of its members) has no conversion into [`crate::Value`].
    #[error("unsupported type at {path}: {detail}")]
    UnsupportedType {
        /// Location of the offending member.
        path: String,
        /// Type name or serializer message describing the failure.
        detail: String,
    },
    /// A shared node was reached again while it was still being converted.
    #[error("cyclic structure detected at {0}")]
    CyclicStructure(String),
    /// The encoder could not represent the value.
    #[error("encoding failed: {0}")]
    Encoding(String),
}
