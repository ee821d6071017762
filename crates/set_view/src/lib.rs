pub mod builder;
pub mod error;
pub mod pipeline;
pub mod table;

pub use builder::{build_rows, build_view, EditionStatus, RowViewModel, SetView};
pub use error::{ErrorCategory, ViewError};
pub use pipeline::{FetchTicket, LoadOutcome, SetViewPipeline, ViewEvent, ViewState};
pub use table::{
    set_columns, ColumnKey, ColumnSpec, SortDirection, SortSpec, TableConfig, TableModel,
    TableSink,
};

#[cfg(test)]
#[path = "tests/fixtures.rs"]
mod fixtures;
