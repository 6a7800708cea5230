/// Unique constraint guarding one click per `(page, tag, device_id)`.
pub const CLICK_LOG_UNIQUE_CONSTRAINT: &str = "click_logs_page_tag_device_key";

/// Returns true if `e` is a unique violation on the named constraint.
pub fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}

/// Returns true if `e` reports a duplicate click claim.
pub fn is_duplicate_claim(e: &sqlx::Error) -> bool {
    is_unique_violation_on(e, CLICK_LOG_UNIQUE_CONSTRAINT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_duplicates() {
        assert!(!is_duplicate_claim(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation_on(
            &sqlx::Error::PoolTimedOut,
            CLICK_LOG_UNIQUE_CONSTRAINT
        ));
    }
}
