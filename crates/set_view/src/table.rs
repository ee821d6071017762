//! Column schema and configuration handed to the table sink, plus the
//! sink-side model that owns sorting and pagination.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::RowViewModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKey {
    #[serde(rename = "playOrder")]
    PlayOrder,
    #[serde(rename = "playID")]
    PlayId,
    #[serde(rename = "retired")]
    Retired,
    #[serde(rename = "fullName")]
    FullName,
    #[serde(rename = "playType")]
    PlayType,
    #[serde(rename = "totalMinted")]
    TotalMinted,
}

impl ColumnKey {
    pub const ALL: [ColumnKey; 6] = [
        ColumnKey::PlayOrder,
        ColumnKey::PlayId,
        ColumnKey::Retired,
        ColumnKey::FullName,
        ColumnKey::PlayType,
        ColumnKey::TotalMinted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlayOrder => "playOrder",
            Self::PlayId => "playID",
            Self::Retired => "retired",
            Self::FullName => "fullName",
            Self::PlayType => "playType",
            Self::TotalMinted => "totalMinted",
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKey {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TableError::UnknownColumn(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub key: ColumnKey,
    pub label: &'static str,
    /// `None` leaves alignment to the sink.
    pub align: Option<Align>,
    pub sortable: bool,
}

/// Columns of the set table, in display order.
pub fn set_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec {
            key: ColumnKey::PlayOrder,
            label: "Creation Order",
            align: Some(Align::Left),
            sortable: true,
        },
        ColumnSpec {
            key: ColumnKey::PlayId,
            label: "Play ID",
            align: Some(Align::Left),
            sortable: true,
        },
        ColumnSpec {
            key: ColumnKey::Retired,
            label: "Retired",
            align: Some(Align::Left),
            sortable: true,
        },
        ColumnSpec {
            key: ColumnKey::FullName,
            label: "Full Name",
            align: Some(Align::Left),
            sortable: true,
        },
        ColumnSpec {
            key: ColumnKey::PlayType,
            label: "Play Type",
            align: None,
            sortable: true,
        },
        ColumnSpec {
            key: ColumnKey::TotalMinted,
            label: "Total Minted",
            align: Some(Align::Left),
            sortable: true,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(TableError::UnknownDirection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: ColumnKey,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub page_size: usize,
    pub length_menu: Vec<usize>,
    pub empty_message: String,
    pub default_sort: SortSpec,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            length_menu: vec![10, 20, 50],
            empty_message: "No data available!".to_string(),
            default_sort: SortSpec {
                column: ColumnKey::PlayOrder,
                direction: SortDirection::Desc,
            },
        }
    }
}

impl TableConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Result<Self, TableError> {
        self.check_page_size(page_size)?;
        self.page_size = page_size;
        Ok(self)
    }

    pub fn with_default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = sort;
        self
    }

    fn check_page_size(&self, page_size: usize) -> Result<(), TableError> {
        if self.length_menu.contains(&page_size) {
            Ok(())
        } else {
            Err(TableError::UnsupportedPageSize {
                requested: page_size,
                allowed: self.length_menu.clone(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("unknown sort direction '{0}', expected asc or desc")]
    UnknownDirection(String),
    #[error("column '{0}' is not sortable")]
    NotSortable(ColumnKey),
    #[error("page size {requested} is not one of {allowed:?}")]
    UnsupportedPageSize {
        requested: usize,
        allowed: Vec<usize>,
    },
    #[error("page {page} is out of range (table has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },
}

/// Receives the full row set; sorting, paging and drawing are its business.
pub trait TableSink {
    fn render(&mut self, columns: &[ColumnSpec], config: &TableConfig, rows: &[RowViewModel]);
}

/// Display text of one cell.
pub fn cell_text(row: &RowViewModel, key: ColumnKey) -> String {
    match key {
        ColumnKey::PlayOrder => row.play_order.to_string(),
        ColumnKey::PlayId => row.play_id.to_string(),
        ColumnKey::Retired => row.status_label().to_string(),
        ColumnKey::FullName => row.full_name.clone(),
        ColumnKey::PlayType => row.play_type.clone(),
        ColumnKey::TotalMinted => row.total_minted.to_string(),
    }
}

fn compare_rows(a: &RowViewModel, b: &RowViewModel, key: ColumnKey) -> Ordering {
    match key {
        ColumnKey::PlayOrder => a.play_order.cmp(&b.play_order),
        ColumnKey::PlayId => a.play_id.cmp(&b.play_id),
        ColumnKey::Retired => a.status_label().cmp(b.status_label()),
        ColumnKey::FullName => a.full_name.cmp(&b.full_name),
        ColumnKey::PlayType => a.play_type.cmp(&b.play_type),
        ColumnKey::TotalMinted => a.total_minted.cmp(&b.total_minted),
    }
}

/// Client-side sorted, paginated view over an already fetched row set.
#[derive(Debug, Clone)]
pub struct TableModel {
    columns: Vec<ColumnSpec>,
    config: TableConfig,
    rows: Vec<RowViewModel>,
    order: Vec<usize>,
    sort: SortSpec,
    page_size: usize,
    page: usize,
}

impl TableModel {
    pub fn new(columns: Vec<ColumnSpec>, config: TableConfig, rows: Vec<RowViewModel>) -> Self {
        let sort = config.default_sort;
        let page_size = config.page_size.max(1);
        let mut model = Self {
            columns,
            config,
            order: (0..rows.len()).collect(),
            rows,
            sort,
            page_size,
            page: 0,
        };
        model.apply_sort();
        model
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn empty_message(&self) -> &str {
        &self.config.empty_message
    }

    /// Always at least one, so an empty table still has a (blank) first page.
    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).max(1)
    }

    pub fn sort_by(&mut self, column: ColumnKey, direction: SortDirection) -> Result<(), TableError> {
        self.ensure_sortable(column)?;
        self.sort = SortSpec { column, direction };
        self.apply_sort();
        self.page = 0;
        Ok(())
    }

    /// Same column flips direction; another column starts ascending.
    pub fn toggle_sort(&mut self, column: ColumnKey) -> Result<SortDirection, TableError> {
        let direction = if self.sort.column == column {
            self.sort.direction.toggled()
        } else {
            SortDirection::Asc
        };
        self.sort_by(column, direction)?;
        Ok(direction)
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), TableError> {
        self.config.check_page_size(page_size)?;
        self.page_size = page_size;
        self.page = 0;
        Ok(())
    }

    pub fn set_page(&mut self, page: usize) -> Result<(), TableError> {
        let page_count = self.page_count();
        if page >= page_count {
            return Err(TableError::PageOutOfRange { page, page_count });
        }
        self.page = page;
        Ok(())
    }

    pub fn current_page(&self) -> Vec<&RowViewModel> {
        self.order
            .iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .map(|&index| &self.rows[index])
            .collect()
    }

    fn ensure_sortable(&self, column: ColumnKey) -> Result<(), TableError> {
        match self.columns.iter().find(|spec| spec.key == column) {
            Some(spec) if spec.sortable => Ok(()),
            Some(_) => Err(TableError::NotSortable(column)),
            None => Err(TableError::UnknownColumn(column.as_str().to_string())),
        }
    }

    fn apply_sort(&mut self) {
        let SortSpec { column, direction } = self.sort;
        let rows = &self.rows;
        // ties keep fetch order whatever the previous sort was
        self.order = (0..rows.len()).collect();
        self.order.sort_by(|&a, &b| {
            let ordering = compare_rows(&rows[a], &rows[b], column);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

#[cfg(test)]
#[path = "tests/table_tests.rs"]
mod tests;
