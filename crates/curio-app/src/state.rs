// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    FilterSnapshot, Item, Pager, RenderSurface, RowFormat, SortSpec, filter, sort_view,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemStore {
    items: Vec<Item>,
    loaded: bool,
}

impl ItemStore {
    /// Returns false (and keeps the current data) if the store was already
    /// populated.
    pub fn populate(&mut self, items: Vec<Item>) -> bool {
        if self.loaded {
            return false;
        }
        self.items = items;
        self.loaded = true;
        true
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    store: ItemStore,
    view: Vec<usize>,
    pager: Pager,
    sort: Option<SortSpec>,
}

impl CatalogState {
    pub fn new(batch_size: usize) -> Self {
        Self {
            pager: Pager::new(batch_size),
            ..Self::default()
        }
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn populate(&mut self, items: Vec<Item>) -> bool {
        self.store.populate(items)
    }

    pub fn view(&self) -> &[usize] {
        &self.view
    }

    pub fn view_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.view.iter().map(|index| &self.store.items()[*index])
    }

    pub const fn pager(&self) -> &Pager {
        &self.pager
    }

    pub const fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more(self.view.len())
    }

    pub fn refresh<S: RenderSurface>(
        &mut self,
        snapshot: &FilterSnapshot,
        format: &RowFormat,
        surface: &mut S,
    ) -> usize {
        self.view = filter(self.store.items(), snapshot, format.rate);
        self.sort = None;
        self.pager
            .reset_and_render_first(self.store.items(), &self.view, format, surface)
    }

    pub fn apply_sort<S: RenderSurface>(
        &mut self,
        spec: SortSpec,
        format: &RowFormat,
        surface: &mut S,
    ) -> usize {
        sort_view(self.store.items(), &mut self.view, spec);
        self.sort = Some(spec);
        self.pager
            .reset_and_render_first(self.store.items(), &self.view, format, surface)
    }

    pub fn render_next_batch<S: RenderSurface>(
        &mut self,
        format: &RowFormat,
        surface: &mut S,
    ) -> usize {
        self.pager
            .render_next_batch(self.store.items(), &self.view, format, surface)
    }
}
