//! Database ID type definition.

/// Alias for the integer type used for mapping to transaction row IDs.
pub type TransactionId = i64;
