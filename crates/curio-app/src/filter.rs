// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::{BoolFacet, ConversionRate, Grade, Item, cents_to_amount};

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSnapshot {
    pub query: String,
    pub item_conditions: BTreeSet<Option<Grade>>,
    pub box_conditions: BTreeSet<Option<Grade>>,
    pub facets: BTreeSet<BoolFacet>,
    pub min_price: f64,
    pub max_price: f64,
}

impl Default for FilterSnapshot {
    fn default() -> Self {
        Self {
            query: String::new(),
            item_conditions: BTreeSet::new(),
            box_conditions: BTreeSet::new(),
            facets: BTreeSet::new(),
            min_price: 0.0,
            max_price: f64::INFINITY,
        }
    }
}

pub trait SnapshotProvider {
    fn snapshot(&self) -> FilterSnapshot;
}

impl SnapshotProvider for FilterSnapshot {
    fn snapshot(&self) -> FilterSnapshot {
        self.clone()
    }
}

pub fn parse_price_bound(raw: &str, default: f64) -> f64 {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return default;
    }
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => default,
    }
}

pub fn filter(items: &[Item], snapshot: &FilterSnapshot, rate: ConversionRate) -> Vec<usize> {
    let query = snapshot.query.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| matches_with_query(item, snapshot, &query, rate))
        .map(|(index, _)| index)
        .collect()
}

pub fn matches(item: &Item, snapshot: &FilterSnapshot, rate: ConversionRate) -> bool {
    matches_with_query(item, snapshot, &snapshot.query.to_lowercase(), rate)
}

fn matches_with_query(
    item: &Item,
    snapshot: &FilterSnapshot,
    lowered_query: &str,
    rate: ConversionRate,
) -> bool {
    matches_text(item, lowered_query)
        && matches_condition(item.item_condition.as_ref(), &snapshot.item_conditions)
        && matches_condition(item.box_condition.as_ref(), &snapshot.box_conditions)
        && matches_facets(item, &snapshot.facets)
        && matches_price(item, snapshot.min_price, snapshot.max_price, rate)
}

pub fn matches_text(item: &Item, lowered_query: &str) -> bool {
    if lowered_query.is_empty() {
        return true;
    }

    let contains = |value: &str| value.to_lowercase().contains(lowered_query);
    contains(&item.name)
        || contains(&item.gcode)
        || contains(&item.scode)
        || item.jancode.as_deref().is_some_and(contains)
        || item.tags.iter().any(|tag| contains(tag))
        || contains(&item.maker_name)
        || contains(&item.modeler_name)
        || contains(&item.description)
}

pub fn matches_condition(condition: Option<&Grade>, selected: &BTreeSet<Option<Grade>>) -> bool {
    selected.is_empty() || selected.contains(&condition.cloned())
}

pub fn matches_facets(item: &Item, selected: &BTreeSet<BoolFacet>) -> bool {
    selected.iter().all(|facet| facet.value(item))
}

pub fn matches_price(item: &Item, min: f64, max: f64, rate: ConversionRate) -> bool {
    let price = cents_to_amount(item.display_price_cents(rate));
    price >= min && price <= max
}
