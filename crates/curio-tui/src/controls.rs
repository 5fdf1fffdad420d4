// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use curio_app::{
    BoolFacet, DebouncedControl, FilterSnapshot, Grade, SnapshotProvider, parse_price_bound,
};

/// One checkbox in the facet panel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FacetOption {
    ItemCondition(Option<Grade>),
    BoxCondition(Option<Grade>),
    Flag(BoolFacet),
}

impl FacetOption {
    /// Panel order: item grades, box grades, then boolean flags. `None`
    /// stands for "new" (no grade recorded).
    pub fn all() -> Vec<Self> {
        let mut options = Vec::new();
        options.extend(
            Grade::ITEM_GRADES
                .iter()
                .cloned()
                .map(Some)
                .chain([None])
                .map(Self::ItemCondition),
        );
        options.extend(
            Grade::BOX_GRADES
                .iter()
                .cloned()
                .map(Some)
                .chain([None])
                .map(Self::BoxCondition),
        );
        options.extend(BoolFacet::ALL.into_iter().map(Self::Flag));
        options
    }

    pub fn group(&self) -> &'static str {
        match self {
            Self::ItemCondition(_) => "item",
            Self::BoxCondition(_) => "box",
            Self::Flag(_) => "flags",
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::ItemCondition(grade) | Self::BoxCondition(grade) => grade
                .as_ref()
                .map(|grade| grade.as_str().to_owned())
                .unwrap_or_else(|| "New".to_owned()),
            Self::Flag(facet) => facet.label().to_owned(),
        }
    }
}

/// Current values of every filter input in the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterControls {
    pub query: String,
    pub min_price: String,
    pub max_price: String,
    pub checked: BTreeSet<FacetOption>,
}

impl FilterControls {
    pub fn text(&self, control: DebouncedControl) -> &str {
        match control {
            DebouncedControl::Query => &self.query,
            DebouncedControl::MinPrice => &self.min_price,
            DebouncedControl::MaxPrice => &self.max_price,
        }
    }

    pub fn text_mut(&mut self, control: DebouncedControl) -> &mut String {
        match control {
            DebouncedControl::Query => &mut self.query,
            DebouncedControl::MinPrice => &mut self.min_price,
            DebouncedControl::MaxPrice => &mut self.max_price,
        }
    }

    /// Returns whether the option is checked after the toggle.
    pub fn toggle(&mut self, option: &FacetOption) -> bool {
        if self.checked.remove(option) {
            return false;
        }
        self.checked.insert(option.clone());
        true
    }

    pub fn is_checked(&self, option: &FacetOption) -> bool {
        self.checked.contains(option)
    }
}

impl SnapshotProvider for FilterControls {
    fn snapshot(&self) -> FilterSnapshot {
        let mut snapshot = FilterSnapshot {
            query: self.query.clone(),
            min_price: parse_price_bound(&self.min_price, 0.0),
            max_price: parse_price_bound(&self.max_price, f64::INFINITY),
            ..FilterSnapshot::default()
        };
        for option in &self.checked {
            match option {
                FacetOption::ItemCondition(grade) => {
                    snapshot.item_conditions.insert(grade.clone());
                }
                FacetOption::BoxCondition(grade) => {
                    snapshot.box_conditions.insert(grade.clone());
                }
                FacetOption::Flag(facet) => {
                    snapshot.facets.insert(*facet);
                }
            }
        }
        snapshot
    }
}
