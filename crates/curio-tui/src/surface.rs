// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use curio_app::{RenderSurface, RenderedRow, SortColumn};

/// Rows appended so far by the pager, plus the count shown in the title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSurface {
    rows: Vec<RenderedRow>,
    displayed_count: usize,
}

impl TableSurface {
    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    pub fn displayed_count(&self) -> usize {
        self.displayed_count
    }
}

impl RenderSurface for TableSurface {
    fn append_row(&mut self, row: RenderedRow) {
        self.rows.push(row);
    }

    fn clear(&mut self) {
        self.rows.clear();
    }

    fn set_displayed_count(&mut self, count: usize) {
        self.displayed_count = count;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TableColumn {
    pub label: &'static str,
    pub sort: Option<SortColumn>,
    pub width: u16,
}

pub(crate) const COLUMNS: [TableColumn; 11] = [
    TableColumn {
        label: "#",
        sort: None,
        width: 11,
    },
    TableColumn {
        label: "name",
        sort: Some(SortColumn::Name),
        width: 36,
    },
    TableColumn {
        label: "gcode",
        sort: Some(SortColumn::Gcode),
        width: 16,
    },
    TableColumn {
        label: "scode",
        sort: Some(SortColumn::Scode),
        width: 18,
    },
    TableColumn {
        label: "price",
        sort: Some(SortColumn::Price),
        width: 20,
    },
    TableColumn {
        label: "status",
        sort: Some(SortColumn::SaleStatus),
        width: 12,
    },
    TableColumn {
        label: "release",
        sort: Some(SortColumn::ReleaseDate),
        width: 11,
    },
    TableColumn {
        label: "jan",
        sort: Some(SortColumn::Jancode),
        width: 13,
    },
    TableColumn {
        label: "maker",
        sort: Some(SortColumn::MakerName),
        width: 18,
    },
    TableColumn {
        label: "item",
        sort: Some(SortColumn::ItemCondition),
        width: 9,
    },
    TableColumn {
        label: "box",
        sort: Some(SortColumn::BoxCondition),
        width: 8,
    },
];

pub(crate) fn cell_text(row: &RenderedRow, column: usize) -> String {
    match column {
        0 => row.ordinal.clone(),
        1 => row.name.clone(),
        2 => row.gcode.text.clone(),
        3 => row.scode.text.clone(),
        4 => format!("{} · {}", row.source_price, row.display_price),
        5 => row.sale_status.clone(),
        6 => row.release_date.clone(),
        7 => row.jancode.text.clone(),
        8 => row.maker_name.clone(),
        9 => row.item_condition.clone(),
        10 => row.box_condition.clone(),
        _ => String::new(),
    }
}

/// Link targets of a row, for the detail line.
pub(crate) fn row_links(row: &RenderedRow) -> Vec<String> {
    [&row.gcode, &row.scode, &row.jancode]
        .into_iter()
        .filter_map(|cell| cell.url.clone())
        .filter(|url| !url.is_empty())
        .chain((!row.image_url.is_empty()).then(|| row.image_url.clone()))
        .collect()
}
