//! The soft-delete lifecycle.
//!
//! A record never leaves its table when it is "deleted": a `deleted` flag
//! and a `deletedAt` stamp are set, every active view excludes it, and a
//! restore removes exactly those two attributes. Purging is the only real
//! delete. The update expressions here are shared by the trash handler so
//! the flag semantics stay in one place.

use aws_sdk_dynamodb::types::AttributeValue;

use crate::dynamodb::maps::AttributeValueHashMap;

pub const DELETED_ATTR: &str = "deleted";
pub const DELETED_AT_ATTR: &str = "deletedAt";

/// SET expression for the trash action; see [`expression_names`].
pub const TRASH_UPDATE_EXPR: &str = "SET #deleted = :deleted, #deletedAt = :deletedAt";
/// REMOVE expression for the restore action.
pub const RESTORE_UPDATE_EXPR: &str = "REMOVE #deleted, #deletedAt";

/// The attribute-name placeholders used by both expressions.
pub fn expression_names() -> [(&'static str, &'static str); 2] {
    [("#deleted", DELETED_ATTR), ("#deletedAt", DELETED_AT_ATTR)]
}

pub fn is_deleted(row: &AttributeValueHashMap) -> bool {
    matches!(row.get(DELETED_ATTR), Some(AttributeValue::Bool(true)))
}

pub fn mark_deleted(row: &mut AttributeValueHashMap, deleted_at: &str) {
    row.insert(DELETED_ATTR.to_string(), AttributeValue::Bool(true));
    row.insert(DELETED_AT_ATTR.to_string(), AttributeValue::S(deleted_at.to_string()));
}

pub fn clear_deleted(row: &mut AttributeValueHashMap) {
    row.remove(DELETED_ATTR);
    row.remove(DELETED_AT_ATTR);
}

pub fn exclude_deleted(rows: Vec<AttributeValueHashMap>) -> Vec<AttributeValueHashMap> {
    rows.into_iter().filter(|row| !is_deleted(row)).collect()
}

/// Splits rows into (active, trash).
pub fn partition_trash(
    rows: Vec<AttributeValueHashMap>,
) -> (Vec<AttributeValueHashMap>, Vec<AttributeValueHashMap>) {
    rows.into_iter().partition(|row| !is_deleted(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> AttributeValueHashMap {
        let mut map = AttributeValueHashMap::new();
        map.insert("id".to_string(), AttributeValue::S(id.to_string()));
        map.insert("status".to_string(), AttributeValue::S("pending".to_string()));
        map
    }

    #[test]
    fn soft_delete_and_restore_are_exact_inverses() {
        let original = row("q-1");
        let mut deleted = original.clone();

        mark_deleted(&mut deleted, "2024-06-01T12:00:00Z");
        assert!(is_deleted(&deleted));
        assert_eq!(
            deleted.get(DELETED_AT_ATTR),
            Some(&AttributeValue::S("2024-06-01T12:00:00Z".to_string()))
        );

        clear_deleted(&mut deleted);
        assert_eq!(deleted, original);
    }

    #[test]
    fn partition_moves_deleted_rows_to_trash() {
        let mut trashed = row("q-2");
        mark_deleted(&mut trashed, "2024-06-01T12:00:00Z");
        let rows = vec![row("q-1"), trashed, row("q-3")];

        let (active, trash) = partition_trash(rows);
        assert_eq!(active.len(), 2);
        assert_eq!(trash.len(), 1);
        assert_eq!(trash[0].get("id"), Some(&AttributeValue::S("q-2".to_string())));
    }

    #[test]
    fn missing_flag_means_active() {
        let mut map = row("q-4");
        assert!(!is_deleted(&map));
        map.insert(DELETED_ATTR.to_string(), AttributeValue::Bool(false));
        assert!(!is_deleted(&map));
        assert_eq!(exclude_deleted(vec![map]).len(), 1);
    }
}
