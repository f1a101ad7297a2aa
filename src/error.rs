use core::fmt;

/// Error returned by [`HashMap::put`] when the request is rejected.
///
/// [`HashMap::put`]: crate::HashMap::put
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// The value was absent. A missing value cannot be stored because lookups
    /// use absence to report a missing key.
    MissingValue,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::MissingValue => f.write_str("cannot insert an absent value"),
        }
    }
}

impl core::error::Error for InsertError {}

/// Error returned by [`Cursor`] operations that require a current entry.
///
/// [`Cursor`]: crate::entry_view::Cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// The cursor has not yielded an entry yet, or the entry it last yielded
    /// was already removed.
    NotPositioned,
    /// The entry the cursor last yielded is no longer in the map. This is a
    /// bug in the map, not a recoverable condition.
    Inconsistent,
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorError::NotPositioned => {
                f.write_str("cursor has no current entry; call next() first")
            }
            CursorError::Inconsistent => {
                f.write_str("snapshot entry is missing from the backing table")
            }
        }
    }
}

impl core::error::Error for CursorError {}

/// Error returned by [`ResizePolicy::new`] for thresholds that would let the
/// table fill up or thrash between growing and shrinking.
///
/// [`ResizePolicy::new`]: crate::hash_table::ResizePolicy::new
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    /// `max_load_percent` must be in `1..=90`.
    LoadOutOfRange(usize),
    /// `shrink_divisor` must be at least 3 and `shrink_divisor *
    /// max_load_percent` must exceed 200.
    ShrinkTooEager {
        /// The requested shrink divisor.
        shrink_divisor: usize,
        /// The requested maximum load percentage.
        max_load_percent: usize,
    },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::LoadOutOfRange(percent) => {
                write!(f, "max load of {percent}% is outside 1..=90")
            }
            PolicyError::ShrinkTooEager {
                shrink_divisor,
                max_load_percent,
            } => write!(
                f,
                "shrink divisor {shrink_divisor} with max load {max_load_percent}% would \
                 shrink into the grow threshold"
            ),
        }
    }
}

impl core::error::Error for PolicyError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            InsertError::MissingValue.to_string(),
            "cannot insert an absent value"
        );
        assert!(
            CursorError::NotPositioned
                .to_string()
                .contains("call next() first")
        );
        assert_eq!(
            PolicyError::LoadOutOfRange(95).to_string(),
            "max load of 95% is outside 1..=90"
        );
    }
}
