//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod assignment;
pub mod attendance;
pub mod course;
pub mod enrollment;
pub mod live_session;
pub mod product;
pub mod submission;
pub mod user;

use sea_orm::prelude::{Json, Uuid};
use serde::de::DeserializeOwned;

/// Decode a JSON column, falling back to the empty value when the stored
/// document no longer matches the expected shape.
pub(crate) fn decode_column<T: DeserializeOwned + Default>(
    value: Json,
    table: &'static str,
    column: &'static str,
    id: Uuid,
) -> T {
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(table, column, %id, error = %e, "Undecodable JSON column, using empty value");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_column_reads_valid_document() {
        let files: Vec<String> =
            decode_column(serde_json::json!(["a.pdf"]), "submissions", "files", Uuid::nil());
        assert_eq!(files, vec!["a.pdf".to_string()]);
    }

    #[test]
    fn test_decode_column_corrupt_document_is_empty() {
        let files: Vec<String> =
            decode_column(serde_json::json!({"oops": 1}), "submissions", "files", Uuid::nil());
        assert!(files.is_empty());
    }
}
