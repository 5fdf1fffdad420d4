// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Item, RenderedRow, RowFormat, render_row};

pub const DEFAULT_BATCH_SIZE: usize = 50;

pub trait RenderSurface {
    fn append_row(&mut self, row: RenderedRow);
    fn clear(&mut self);
    fn set_displayed_count(&mut self, count: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    cursor: usize,
    batch_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl Pager {
    pub fn new(batch_size: usize) -> Self {
        Self {
            cursor: 0,
            batch_size: batch_size.max(1),
        }
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub const fn has_more(&self, len: usize) -> bool {
        self.cursor < len
    }

    pub fn render_next_batch<S: RenderSurface>(
        &mut self,
        items: &[Item],
        view: &[usize],
        format: &RowFormat,
        surface: &mut S,
    ) -> usize {
        let total = view.len();
        if self.cursor >= total {
            return 0;
        }

        let end = self.cursor.saturating_add(self.batch_size).min(total);
        for (offset, index) in view[self.cursor..end].iter().enumerate() {
            let position = self.cursor + offset + 1;
            surface.append_row(render_row(&items[*index], position, total, format));
        }
        let rendered = end - self.cursor;
        self.cursor = end;
        surface.set_displayed_count(total);
        rendered
    }

    pub fn reset_and_render_first<S: RenderSurface>(
        &mut self,
        items: &[Item],
        view: &[usize],
        format: &RowFormat,
        surface: &mut S,
    ) -> usize {
        surface.clear();
        self.cursor = 0;
        surface.set_displayed_count(view.len());
        self.render_next_batch(items, view, format, surface)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Pager, RenderSurface};
    use crate::{Item, RenderedRow, RowFormat};

    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub rows: Vec<RenderedRow>,
        pub displayed_count: Option<usize>,
        pub clears: usize,
    }

    impl RenderSurface for RecordingSurface {
        fn append_row(&mut self, row: RenderedRow) {
            self.rows.push(row);
        }

        fn clear(&mut self) {
            self.rows.clear();
            self.clears += 1;
        }

        fn set_displayed_count(&mut self, count: usize) {
            self.displayed_count = Some(count);
        }
    }

    fn items(count: usize) -> Vec<Item> {
        (0..count)
            .map(|index| Item {
                name: format!("item-{index}"),
                ..Item::default()
            })
            .collect()
    }

    #[test]
    fn batches_of_fifty_cover_one_hundred_twenty_rows() {
        let items = items(120);
        let view: Vec<usize> = (0..items.len()).collect();
        let format = RowFormat::default();
        let mut surface = RecordingSurface::default();
        let mut pager = Pager::new(50);

        assert_eq!(pager.render_next_batch(&items, &view, &format, &mut surface), 50);
        assert_eq!(pager.render_next_batch(&items, &view, &format, &mut surface), 50);
        assert_eq!(pager.render_next_batch(&items, &view, &format, &mut surface), 20);
        assert_eq!(pager.cursor(), 120);
        assert!(!pager.has_more(view.len()));

        surface.displayed_count = None;
        assert_eq!(pager.render_next_batch(&items, &view, &format, &mut surface), 0);
        assert_eq!(surface.rows.len(), 120);
        assert_eq!(surface.displayed_count, None);
    }

    #[test]
    fn ordinals_count_against_total_filtered_rows() {
        let items = items(10);
        let view = vec![9, 3, 5];
        let mut surface = RecordingSurface::default();
        let mut pager = Pager::new(2);

        pager.render_next_batch(&items, &view, &RowFormat::default(), &mut surface);
        pager.render_next_batch(&items, &view, &RowFormat::default(), &mut surface);

        let labels: Vec<(&str, &str)> = surface
            .rows
            .iter()
            .map(|row| (row.ordinal.as_str(), row.name.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![("1 / 3", "item-9"), ("2 / 3", "item-3"), ("3 / 3", "item-5")]
        );
        assert_eq!(surface.displayed_count, Some(3));
    }

    #[test]
    fn reset_clears_and_renders_first_batch() {
        let items = items(80);
        let view: Vec<usize> = (0..items.len()).collect();
        let format = RowFormat::default();
        let mut surface = RecordingSurface::default();
        let mut pager = Pager::new(50);

        pager.render_next_batch(&items, &view, &format, &mut surface);
        pager.render_next_batch(&items, &view, &format, &mut surface);
        assert_eq!(surface.rows.len(), 80);

        let rendered = pager.reset_and_render_first(&items, &view[..10], &format, &mut surface);
        assert_eq!(rendered, 10);
        assert_eq!(surface.rows.len(), 10);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.displayed_count, Some(10));
        assert_eq!(pager.cursor(), 10);
    }

    #[test]
    fn reset_with_empty_view_reports_zero() {
        let items = items(3);
        let mut surface = RecordingSurface {
            displayed_count: Some(3),
            ..RecordingSurface::default()
        };
        let mut pager = Pager::new(50);

        let rendered = pager.reset_and_render_first(&items, &[], &RowFormat::default(), &mut surface);
        assert_eq!(rendered, 0);
        assert!(surface.rows.is_empty());
        assert_eq!(surface.displayed_count, Some(0));
    }

    #[test]
    fn zero_batch_size_still_advances() {
        let pager = Pager::new(0);
        assert_eq!(pager.batch_size(), 1);
    }
}
