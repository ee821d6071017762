use set_view::{
    table::{cell_text, Align, TableError},
    ColumnSpec, RowViewModel, TableConfig, TableModel, TableSink,
};

const COLUMN_GAP: &str = "  ";

/// Plain-text table sink. Sorting and paging happen here, on the rows the
/// pipeline handed over.
pub struct TerminalTable {
    page: usize,
    lines: Vec<String>,
    error: Option<TableError>,
}

impl TerminalTable {
    /// `page` is zero-based.
    pub fn new(page: usize) -> Self {
        Self {
            page,
            lines: Vec::new(),
            error: None,
        }
    }

    pub fn into_output(self) -> Result<String, TableError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.lines.join("\n")),
        }
    }

    fn draw(&mut self, model: &TableModel) {
        let columns = model.columns();
        let page = model.current_page();

        let widths: Vec<usize> = columns
            .iter()
            .map(|spec| {
                page.iter()
                    .map(|row| cell_text(row, spec.key).chars().count())
                    .chain(std::iter::once(spec.label.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header = columns
            .iter()
            .zip(&widths)
            .map(|(spec, width)| pad(spec.label, *width, spec.align))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        let rule = widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        self.lines.push(header.trim_end().to_string());
        self.lines.push(rule);

        if model.is_empty() {
            self.lines.push(model.empty_message().to_string());
            return;
        }

        for row in &page {
            let line = columns
                .iter()
                .zip(&widths)
                .map(|(spec, width)| pad(&cell_text(row, spec.key), *width, spec.align))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP);
            self.lines.push(line.trim_end().to_string());
        }

        let sort = model.sort();
        self.lines.push(String::new());
        self.lines.push(format!(
            "page {} of {} ({} rows, {} per page, sorted by {} {:?})",
            model.page() + 1,
            model.page_count(),
            model.len(),
            model.page_size(),
            sort.column,
            sort.direction,
        ));
    }
}

impl TableSink for TerminalTable {
    fn render(&mut self, columns: &[ColumnSpec], config: &TableConfig, rows: &[RowViewModel]) {
        self.lines.clear();
        self.error = None;

        let mut model = TableModel::new(columns.to_vec(), config.clone(), rows.to_vec());
        if let Err(error) = model.set_page(self.page) {
            self.error = Some(error);
            return;
        }
        self.draw(&model);
    }
}

fn pad(text: &str, width: usize, align: Option<Align>) -> String {
    match align {
        Some(Align::Right) => format!("{text:>width$}"),
        Some(Align::Center) => format!("{text:^width$}"),
        Some(Align::Left) | None => format!("{text:<width$}"),
    }
}
