//! Analysis steps run on loaded data: explode, count, join, sort
//!
//! Each step takes a frame by reference and returns a new one, so a
//! pipeline reads top to bottom:
//!
//! ```rust
//! use ballpark::frame::analysis::{explode, head, value_counts};
//! use ballpark::Table;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let fans = Table::from_records(serde_json::from_value(json!([
//!     {"user_id": 1, "followed_team_ids": [119, 147]},
//!     {"user_id": 2, "followed_team_ids": [119]}
//! ]))?);
//!
//! let followed = explode(&fans.to_dataframe()?, "followed_team_ids")?;
//! let top = head(&value_counts(&followed, &["followed_team_ids"])?, 1);
//! let top = Table::from_dataframe(&top)?;
//!
//! assert_eq!(top.get(0, "followed_team_ids"), Some(&json!(119)));
//! assert_eq!(top.get(0, "count"), Some(&json!(2)));
//! # Ok(())
//! # }
//! ```

use polars::prelude::*;

/// Name of the column produced by [`value_counts`]
pub const COUNT_COLUMN: &str = "count";

/// Suffix polars gives to right-hand columns that collide in [`left_join`]
pub const RIGHT_SUFFIX: &str = "_right";

const ROW_INDEX: &str = "__ballpark_row";

/// One row per element of the list in `column`
///
/// An empty or null list yields a single row holding null.
pub fn explode(df: &DataFrame, column: &str) -> PolarsResult<DataFrame> {
    df.explode([column])
}

/// Count distinct combinations of `columns`
///
/// Rows with a null in any of the columns are left out. The result is
/// sorted by descending count, ties in first-seen order.
pub fn value_counts(df: &DataFrame, columns: &[&str]) -> PolarsResult<DataFrame> {
    if columns.is_empty() {
        return Err(PolarsError::InvalidOperation(
            "value_counts needs at least one column".into(),
        ));
    }

    let keys: Vec<Expr> = columns.iter().map(|c| col(*c)).collect();
    let present = keys
        .iter()
        .cloned()
        .map(|key| key.is_not_null())
        .reduce(|acc, next| acc.and(next))
        .unwrap_or_else(|| lit(true));

    df.clone()
        .lazy()
        .filter(present)
        .group_by_stable(keys)
        .agg([len().alias(COUNT_COLUMN)])
        .sort(
            [COUNT_COLUMN],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()
}

/// Cast `column` to 64-bit integers
///
/// Ids that arrive as floats (`119.0`) join against integer ids after
/// this. Values that cannot be cast become null.
pub fn cast_integer(df: &DataFrame, column: &str) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .with_column(col(column).cast(DataType::Int64))
        .collect()
}

/// Keep every left row in order, attaching each matching right row
///
/// Key columns must share a type; see [`cast_integer`]. The right key
/// column is merged into the left one, and other right-hand columns whose
/// names collide with a left column get the `_right` suffix.
pub fn left_join(
    left: &DataFrame,
    right: &DataFrame,
    left_on: &str,
    right_on: &str,
) -> PolarsResult<DataFrame> {
    let joined = left
        .clone()
        .lazy()
        .with_row_index(ROW_INDEX, None)
        .join(
            right.clone().lazy(),
            [col(left_on)],
            [col(right_on)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([ROW_INDEX], SortMultipleOptions::default().with_maintain_order(true))
        .collect()?;

    joined.drop(ROW_INDEX)
}

/// Stable sort on one column; nulls always sort last
pub fn sort_by(df: &DataFrame, column: &str, descending: bool) -> PolarsResult<DataFrame> {
    df.sort(
        [column],
        SortMultipleOptions::default()
            .with_order_descending(descending)
            .with_nulls_last(true)
            .with_maintain_order(true),
    )
}

/// The first `n` rows
pub fn head(df: &DataFrame, n: usize) -> DataFrame {
    df.head(Some(n))
}

/// Project onto `columns`, in the given order
pub fn select(df: &DataFrame, columns: &[&str]) -> PolarsResult<DataFrame> {
    df.select(columns.iter().copied())
}

/// Rename one column, keeping its position
pub fn rename(df: &DataFrame, from: &str, to: &str) -> PolarsResult<DataFrame> {
    let mut out = df.clone();
    out.rename(from, to.into())?;
    Ok(out)
}

/// First ten characters of a timestamp string column, i.e. its date
///
/// The result lands in `alias`, which may be `column` itself.
pub fn truncate_to_date(df: &DataFrame, column: &str, alias: &str) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .with_column(col(column).str().slice(lit(0), lit(10)).alias(alias))
        .collect()
}
