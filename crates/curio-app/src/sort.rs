// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use crate::{Grade, Item};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Gcode,
    Scode,
    Price,
    SaleStatus,
    ReleaseDate,
    Jancode,
    MakerName,
    ItemCondition,
    BoxCondition,
}

impl SortColumn {
    pub const ALL: [Self; 10] = [
        Self::Name,
        Self::Gcode,
        Self::Scode,
        Self::Price,
        Self::SaleStatus,
        Self::ReleaseDate,
        Self::Jancode,
        Self::MakerName,
        Self::ItemCondition,
        Self::BoxCondition,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Gcode => "gcode",
            Self::Scode => "scode",
            Self::Price => "price",
            Self::SaleStatus => "sale_status",
            Self::ReleaseDate => "release_date",
            Self::Jancode => "jancode",
            Self::MakerName => "maker_name",
            Self::ItemCondition => "item_condition",
            Self::BoxCondition => "box_condition",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Absent values sort first, except for `item_condition` where an absent or
/// unrecognized grade ranks above `A`.
pub fn compare(left: &Item, right: &Item, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => left.name.cmp(&right.name),
        SortColumn::Gcode => left.gcode.cmp(&right.gcode),
        SortColumn::Scode => left.scode.cmp(&right.scode),
        SortColumn::Price => left.price.cmp(&right.price),
        SortColumn::SaleStatus => left.sale_status.cmp(&right.sale_status),
        // `None < Some(_)`: an unknown date behaves as the lowest date.
        SortColumn::ReleaseDate => left.release_date.cmp(&right.release_date),
        SortColumn::Jancode => left.jancode.cmp(&right.jancode),
        SortColumn::MakerName => left.maker_name.cmp(&right.maker_name),
        SortColumn::ItemCondition => Grade::item_rank(left.item_condition.as_ref())
            .cmp(&Grade::item_rank(right.item_condition.as_ref())),
        SortColumn::BoxCondition => grade_label(left.box_condition.as_ref())
            .cmp(grade_label(right.box_condition.as_ref())),
    }
}

fn grade_label(grade: Option<&Grade>) -> &str {
    grade.map(Grade::as_str).unwrap_or("")
}

pub fn compare_directed(left: &Item, right: &Item, spec: SortSpec) -> Ordering {
    let ordering = compare(left, right, spec.column);
    match spec.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

pub fn sort_view(items: &[Item], view: &mut [usize], spec: SortSpec) {
    view.sort_by(|left, right| compare_directed(&items[*left], &items[*right], spec));
}

#[cfg(test)]
mod tests {
    use super::{SortColumn, SortDirection, SortSpec, compare, sort_view};
    use crate::{Amount, Grade, Item};
    use std::cmp::Ordering;
    use time::{Date, Month};

    fn graded(name: &str, grade: Option<Grade>) -> Item {
        Item {
            name: name.to_owned(),
            item_condition: grade,
            ..Item::default()
        }
    }

    fn sorted_names(items: &[Item], spec: SortSpec) -> Vec<String> {
        let mut view: Vec<usize> = (0..items.len()).collect();
        sort_view(items, &mut view, spec);
        view.iter().map(|index| items[*index].name.clone()).collect()
    }

    #[test]
    fn item_condition_follows_grading_scale() {
        let items = vec![
            graded("a", Some(Grade::A)),
            graded("j", Some(Grade::J)),
            graded("new", None),
            graded("b+", Some(Grade::BPlus)),
        ];
        let spec = SortSpec {
            column: SortColumn::ItemCondition,
            direction: SortDirection::Asc,
        };
        assert_eq!(sorted_names(&items, spec), vec!["j", "b+", "a", "new"]);
    }

    #[test]
    fn unrecognized_grade_ties_with_absent() {
        let unknown = graded("unknown", Some(Grade::Other("S".to_owned())));
        let absent = graded("absent", None);
        assert_eq!(
            compare(&unknown, &absent, SortColumn::ItemCondition),
            Ordering::Equal
        );
        assert_eq!(
            compare(&graded("a", Some(Grade::A)), &absent, SortColumn::ItemCondition),
            Ordering::Less
        );
    }

    #[test]
    fn absent_release_date_sorts_first_ascending() -> anyhow::Result<()> {
        let items = vec![
            Item {
                name: "late".to_owned(),
                release_date: Some(Date::from_calendar_date(2025, Month::June, 1)?),
                ..Item::default()
            },
            Item {
                name: "unknown".to_owned(),
                ..Item::default()
            },
            Item {
                name: "early".to_owned(),
                release_date: Some(Date::from_calendar_date(2019, Month::January, 15)?),
                ..Item::default()
            },
        ];

        let asc = SortSpec {
            column: SortColumn::ReleaseDate,
            direction: SortDirection::Asc,
        };
        assert_eq!(sorted_names(&items, asc), vec!["unknown", "early", "late"]);

        let desc = SortSpec {
            direction: SortDirection::Desc,
            ..asc
        };
        assert_eq!(sorted_names(&items, desc), vec!["late", "early", "unknown"]);
        Ok(())
    }

    #[test]
    fn price_sorts_numerically_with_missing_first() {
        let items = vec![
            Item {
                name: "ten-thousand".to_owned(),
                price: Some(Amount::from_whole(10_000)),
                ..Item::default()
            },
            Item {
                name: "nine".to_owned(),
                price: Some(Amount::from_whole(9)),
                ..Item::default()
            },
            Item {
                name: "none".to_owned(),
                ..Item::default()
            },
        ];
        let spec = SortSpec {
            column: SortColumn::Price,
            direction: SortDirection::Asc,
        };
        assert_eq!(sorted_names(&items, spec), vec!["none", "nine", "ten-thousand"]);
    }

    #[test]
    fn ties_keep_prior_relative_order_in_both_directions() {
        let items = vec![
            graded("first-b", Some(Grade::B)),
            graded("only-a", Some(Grade::A)),
            graded("second-b", Some(Grade::B)),
        ];
        let asc = SortSpec {
            column: SortColumn::ItemCondition,
            direction: SortDirection::Asc,
        };
        assert_eq!(
            sorted_names(&items, asc),
            vec!["first-b", "second-b", "only-a"]
        );
        assert_eq!(
            sorted_names(
                &items,
                SortSpec {
                    direction: SortDirection::Desc,
                    ..asc
                }
            ),
            vec!["only-a", "first-b", "second-b"]
        );
    }

    #[test]
    fn desc_reverses_asc_when_keys_are_distinct() {
        let items: Vec<Item> = ["delta", "alpha", "charlie", "bravo"]
            .into_iter()
            .map(|name| Item {
                name: name.to_owned(),
                ..Item::default()
            })
            .collect();
        let asc = SortSpec {
            column: SortColumn::Name,
            direction: SortDirection::Asc,
        };
        let mut forward = sorted_names(&items, asc);
        let backward = sorted_names(
            &items,
            SortSpec {
                direction: SortDirection::Desc,
                ..asc
            },
        );
        forward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn every_column_yields_a_transitive_order() {
        let items = vec![
            Item {
                name: "b".to_owned(),
                jancode: Some("2".to_owned()),
                box_condition: Some(Grade::N),
                sale_status: "Released".to_owned(),
                ..Item::default()
            },
            Item {
                name: "a".to_owned(),
                price: Some(Amount::from_whole(50)),
                box_condition: Some(Grade::A),
                ..Item::default()
            },
            Item {
                name: "c".to_owned(),
                jancode: Some("1".to_owned()),
                item_condition: Some(Grade::C),
                sale_status: "Pre-order".to_owned(),
                ..Item::default()
            },
        ];

        for column in SortColumn::ALL {
            let mut view: Vec<usize> = (0..items.len()).collect();
            sort_view(
                &items,
                &mut view,
                SortSpec {
                    column,
                    direction: SortDirection::Asc,
                },
            );
            for window in view.windows(2) {
                assert_ne!(
                    compare(&items[window[0]], &items[window[1]], column),
                    Ordering::Greater,
                    "column {}",
                    column.as_str()
                );
            }
        }
    }

    #[test]
    fn column_ids_round_trip() {
        for column in SortColumn::ALL {
            assert_eq!(SortColumn::parse(column.as_str()), Some(column));
        }
        assert_eq!(SortColumn::parse("image_url"), None);
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
    }
}
