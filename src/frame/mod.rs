//! Tabular results - union-of-keys tables, their polars counterparts, and
//! the analysis steps callers run after a load (explode, count, join, sort)

pub mod analysis;
pub mod dataframe;
pub mod table;
pub mod writer;

pub use analysis::{COUNT_COLUMN, RIGHT_SUFFIX};
pub use table::Table;
pub use writer::{OutputFormat, TableWriter};
