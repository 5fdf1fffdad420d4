// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    CatalogState, DEFAULT_BATCH_SIZE, Item, RenderSurface, RowFormat, SnapshotProvider,
    SortColumn, SortDirection, SortSpec,
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_SCROLL_THRESHOLD: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebouncedControl {
    Query,
    MinPrice,
    MaxPrice,
}

impl DebouncedControl {
    pub const ALL: [Self; 3] = [Self::Query, Self::MinPrice, Self::MaxPrice];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Query => "search",
            Self::MinPrice => "min price",
            Self::MaxPrice => "max price",
        }
    }
}

/// Timer handle for one debounced control. Scheduling again supersedes the
/// pending token; only the latest token fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceSlot {
    token: u64,
    pending: bool,
}

impl DebounceSlot {
    pub fn schedule(&mut self) -> u64 {
        self.token = self.token.wrapping_add(1);
        self.pending = true;
        self.token
    }

    pub fn fire(&mut self, token: u64) -> bool {
        if self.pending && token == self.token {
            self.pending = false;
            return true;
        }
        false
    }

    pub const fn is_pending(&self) -> bool {
        self.pending
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceTimers {
    query: DebounceSlot,
    min_price: DebounceSlot,
    max_price: DebounceSlot,
}

impl DebounceTimers {
    pub fn slot(&self, control: DebouncedControl) -> &DebounceSlot {
        match control {
            DebouncedControl::Query => &self.query,
            DebouncedControl::MinPrice => &self.min_price,
            DebouncedControl::MaxPrice => &self.max_price,
        }
    }

    fn slot_mut(&mut self, control: DebouncedControl) -> &mut DebounceSlot {
        match control {
            DebouncedControl::Query => &mut self.query,
            DebouncedControl::MinPrice => &mut self.min_price,
            DebouncedControl::MaxPrice => &mut self.max_price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub offset: usize,
    pub viewport: usize,
    pub content: usize,
}

impl ScrollMetrics {
    pub fn near_bottom(&self, threshold: usize) -> bool {
        self.offset.saturating_add(self.viewport).saturating_add(threshold) >= self.content
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub batch_size: usize,
    pub debounce: Duration,
    pub scroll_threshold: usize,
    pub format: RowFormat,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            format: RowFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerCommand {
    DatasetLoaded(Vec<Item>),
    InputEdited(DebouncedControl),
    DebounceElapsed { control: DebouncedControl, token: u64 },
    CheckboxToggled,
    HeaderClicked(SortColumn),
    Scrolled(ScrollMetrics),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    DatasetReady {
        items: usize,
    },
    DatasetIgnored,
    RefreshScheduled {
        control: DebouncedControl,
        token: u64,
        delay: Duration,
    },
    Refreshed {
        total: usize,
        rendered: usize,
    },
    Sorted {
        spec: SortSpec,
        rendered: usize,
    },
    BatchRendered {
        rendered: usize,
        total: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    state: CatalogState,
    timers: DebounceTimers,
    settings: ControllerSettings,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ControllerSettings::default())
    }
}

impl Controller {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            state: CatalogState::new(settings.batch_size),
            timers: DebounceTimers::default(),
            settings,
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn timers(&self) -> &DebounceTimers {
        &self.timers
    }

    pub fn dispatch<P, S>(
        &mut self,
        command: ControllerCommand,
        provider: &P,
        surface: &mut S,
    ) -> Vec<ControllerEvent>
    where
        P: SnapshotProvider,
        S: RenderSurface,
    {
        match command {
            ControllerCommand::DatasetLoaded(items) => {
                let count = items.len();
                if !self.state.populate(items) {
                    warn!("dataset already loaded; ignoring {count} late items");
                    return vec![ControllerEvent::DatasetIgnored];
                }
                info!(items = count, "dataset loaded");
                vec![
                    ControllerEvent::DatasetReady { items: count },
                    self.refresh(provider, surface),
                ]
            }
            ControllerCommand::InputEdited(control) => {
                let token = self.timers.slot_mut(control).schedule();
                vec![ControllerEvent::RefreshScheduled {
                    control,
                    token,
                    delay: self.settings.debounce,
                }]
            }
            ControllerCommand::DebounceElapsed { control, token } => {
                if !self.timers.slot_mut(control).fire(token) {
                    debug!(control = control.label(), token, "superseded debounce token");
                    return Vec::new();
                }
                vec![self.refresh(provider, surface)]
            }
            ControllerCommand::CheckboxToggled => vec![self.refresh(provider, surface)],
            ControllerCommand::HeaderClicked(column) => {
                let direction = match self.state.sort() {
                    Some(current) if current.column == column => current.direction.toggled(),
                    _ => SortDirection::Asc,
                };
                let spec = SortSpec { column, direction };
                let rendered = self
                    .state
                    .apply_sort(spec, &self.settings.format, surface);
                debug!(
                    column = column.as_str(),
                    direction = direction.as_str(),
                    "view sorted"
                );
                vec![ControllerEvent::Sorted { spec, rendered }]
            }
            ControllerCommand::Scrolled(metrics) => {
                if !metrics.near_bottom(self.settings.scroll_threshold) || !self.state.has_more() {
                    return Vec::new();
                }
                let rendered = self
                    .state
                    .render_next_batch(&self.settings.format, surface);
                vec![ControllerEvent::BatchRendered {
                    rendered,
                    total: self.state.view().len(),
                }]
            }
        }
    }

    fn refresh<P, S>(&mut self, provider: &P, surface: &mut S) -> ControllerEvent
    where
        P: SnapshotProvider,
        S: RenderSurface,
    {
        let snapshot = provider.snapshot();
        let rendered = self
            .state
            .refresh(&snapshot, &self.settings.format, surface);
        let total = self.state.view().len();
        debug!(total, rendered, "view refreshed");
        ControllerEvent::Refreshed { total, rendered }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Controller, ControllerCommand, ControllerEvent, ControllerSettings, DebounceSlot,
        DebouncedControl, ScrollMetrics,
    };
    use crate::pager::tests::RecordingSurface;
    use crate::{Amount, FilterSnapshot, Grade, Item, SortColumn, SortDirection, SortSpec};
    use std::time::Duration;

    fn catalog(count: usize) -> Vec<Item> {
        (0..count)
            .map(|index| Item {
                name: format!("figure-{index:03}"),
                price: Some(Amount::from_whole(1000 * (index as i64 + 1))),
                ..Item::default()
            })
            .collect()
    }

    fn loaded(count: usize) -> (Controller, RecordingSurface) {
        let mut controller = Controller::default();
        let mut surface = RecordingSurface::default();
        controller.dispatch(
            ControllerCommand::DatasetLoaded(catalog(count)),
            &FilterSnapshot::default(),
            &mut surface,
        );
        (controller, surface)
    }

    fn bottom() -> ScrollMetrics {
        ScrollMetrics {
            offset: 1000,
            viewport: 10,
            content: 1010,
        }
    }

    #[test]
    fn dataset_load_runs_one_refresh() {
        let mut controller = Controller::default();
        let mut surface = RecordingSurface::default();
        let events = controller.dispatch(
            ControllerCommand::DatasetLoaded(catalog(120)),
            &FilterSnapshot::default(),
            &mut surface,
        );

        assert_eq!(
            events,
            vec![
                ControllerEvent::DatasetReady { items: 120 },
                ControllerEvent::Refreshed {
                    total: 120,
                    rendered: 50
                },
            ]
        );
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.rows.len(), 50);
        assert_eq!(surface.displayed_count, Some(120));
    }

    #[test]
    fn second_dataset_is_ignored() {
        let (mut controller, mut surface) = loaded(3);
        let events = controller.dispatch(
            ControllerCommand::DatasetLoaded(catalog(9)),
            &FilterSnapshot::default(),
            &mut surface,
        );
        assert_eq!(events, vec![ControllerEvent::DatasetIgnored]);
        assert_eq!(controller.state().store().len(), 3);
    }

    #[test]
    fn debounced_edits_only_fire_latest_token() {
        let (mut controller, mut surface) = loaded(5);
        let snapshot = FilterSnapshot {
            query: "figure-004".to_owned(),
            ..FilterSnapshot::default()
        };

        let first = controller.dispatch(
            ControllerCommand::InputEdited(DebouncedControl::Query),
            &snapshot,
            &mut surface,
        );
        let second = controller.dispatch(
            ControllerCommand::InputEdited(DebouncedControl::Query),
            &snapshot,
            &mut surface,
        );
        let (stale, latest) = match (&first[..], &second[..]) {
            (
                [ControllerEvent::RefreshScheduled { token: stale, delay, .. }],
                [ControllerEvent::RefreshScheduled { token: latest, .. }],
            ) => {
                assert_eq!(*delay, Duration::from_millis(500));
                (*stale, *latest)
            }
            other => panic!("unexpected events: {other:?}"),
        };
        assert!(controller.timers().slot(DebouncedControl::Query).is_pending());

        let ignored = controller.dispatch(
            ControllerCommand::DebounceElapsed {
                control: DebouncedControl::Query,
                token: stale,
            },
            &snapshot,
            &mut surface,
        );
        assert!(ignored.is_empty());
        assert_eq!(surface.rows.len(), 5);

        let fired = controller.dispatch(
            ControllerCommand::DebounceElapsed {
                control: DebouncedControl::Query,
                token: latest,
            },
            &snapshot,
            &mut surface,
        );
        assert_eq!(
            fired,
            vec![ControllerEvent::Refreshed {
                total: 1,
                rendered: 1
            }]
        );
        assert_eq!(surface.rows[0].name, "figure-004");

        let repeated = controller.dispatch(
            ControllerCommand::DebounceElapsed {
                control: DebouncedControl::Query,
                token: latest,
            },
            &snapshot,
            &mut surface,
        );
        assert!(repeated.is_empty());
    }

    #[test]
    fn debounce_slots_are_independent_per_control() {
        let (mut controller, mut surface) = loaded(2);
        let snapshot = FilterSnapshot::default();
        controller.dispatch(
            ControllerCommand::InputEdited(DebouncedControl::MinPrice),
            &snapshot,
            &mut surface,
        );
        let max = controller.dispatch(
            ControllerCommand::InputEdited(DebouncedControl::MaxPrice),
            &snapshot,
            &mut surface,
        );
        let [ControllerEvent::RefreshScheduled { token, .. }] = max.as_slice() else {
            panic!("expected a scheduled refresh, got {max:?}");
        };

        let events = controller.dispatch(
            ControllerCommand::DebounceElapsed {
                control: DebouncedControl::MaxPrice,
                token: *token,
            },
            &snapshot,
            &mut surface,
        );
        assert_eq!(events.len(), 1);
        assert!(controller.timers().slot(DebouncedControl::MinPrice).is_pending());
        assert!(!controller.timers().slot(DebouncedControl::MaxPrice).is_pending());
    }

    #[test]
    fn debounce_slot_supersedes_pending_token() {
        let mut slot = DebounceSlot::default();
        let old = slot.schedule();
        let new = slot.schedule();
        assert!(!slot.fire(old));
        assert!(slot.fire(new));
        assert!(!slot.fire(new));
    }

    #[test]
    fn checkbox_toggle_refreshes_immediately() {
        let mut controller = Controller::default();
        let mut surface = RecordingSurface::default();
        let mut items = catalog(4);
        items[2].item_condition = Some(Grade::B);
        controller.dispatch(
            ControllerCommand::DatasetLoaded(items),
            &FilterSnapshot::default(),
            &mut surface,
        );

        let snapshot = FilterSnapshot {
            item_conditions: [Some(Grade::B)].into_iter().collect(),
            ..FilterSnapshot::default()
        };
        let events = controller.dispatch(ControllerCommand::CheckboxToggled, &snapshot, &mut surface);
        assert_eq!(
            events,
            vec![ControllerEvent::Refreshed {
                total: 1,
                rendered: 1
            }]
        );
        assert_eq!(surface.displayed_count, Some(1));
    }

    #[test]
    fn header_clicks_toggle_direction_on_same_column() {
        let (mut controller, mut surface) = loaded(3);
        let snapshot = FilterSnapshot::default();
        let mut click = |column| {
            match controller.dispatch(
                ControllerCommand::HeaderClicked(column),
                &snapshot,
                &mut surface,
            )
            .as_slice()
            {
                [ControllerEvent::Sorted { spec, .. }] => *spec,
                other => panic!("unexpected events: {other:?}"),
            }
        };

        assert_eq!(
            click(SortColumn::Price),
            SortSpec {
                column: SortColumn::Price,
                direction: SortDirection::Asc
            }
        );
        assert_eq!(click(SortColumn::Price).direction, SortDirection::Desc);
        assert_eq!(click(SortColumn::Price).direction, SortDirection::Asc);
        assert_eq!(
            click(SortColumn::Name),
            SortSpec {
                column: SortColumn::Name,
                direction: SortDirection::Asc
            }
        );
    }

    #[test]
    fn sort_rerenders_from_the_start() {
        let (mut controller, mut surface) = loaded(60);
        controller.dispatch(
            ControllerCommand::Scrolled(bottom()),
            &FilterSnapshot::default(),
            &mut surface,
        );
        assert_eq!(surface.rows.len(), 60);

        controller.dispatch(
            ControllerCommand::HeaderClicked(SortColumn::Price),
            &FilterSnapshot::default(),
            &mut surface,
        );
        controller.dispatch(
            ControllerCommand::HeaderClicked(SortColumn::Price),
            &FilterSnapshot::default(),
            &mut surface,
        );
        assert_eq!(surface.rows.len(), 50);
        assert_eq!(surface.rows[0].name, "figure-059");
        assert_eq!(surface.rows[0].ordinal, "1 / 60");
        assert_eq!(controller.state().pager().cursor(), 50);
    }

    #[test]
    fn scroll_near_bottom_extends_until_exhausted() {
        let (mut controller, mut surface) = loaded(120);
        let snapshot = FilterSnapshot::default();

        let far = ScrollMetrics {
            offset: 0,
            viewport: 10,
            content: 1000,
        };
        assert!(
            controller
                .dispatch(ControllerCommand::Scrolled(far), &snapshot, &mut surface)
                .is_empty()
        );

        let second = controller.dispatch(ControllerCommand::Scrolled(bottom()), &snapshot, &mut surface);
        assert_eq!(
            second,
            vec![ControllerEvent::BatchRendered {
                rendered: 50,
                total: 120
            }]
        );
        let third = controller.dispatch(ControllerCommand::Scrolled(bottom()), &snapshot, &mut surface);
        assert_eq!(
            third,
            vec![ControllerEvent::BatchRendered {
                rendered: 20,
                total: 120
            }]
        );
        assert!(
            controller
                .dispatch(ControllerCommand::Scrolled(bottom()), &snapshot, &mut surface)
                .is_empty()
        );
        assert_eq!(surface.rows.len(), 120);
    }

    #[test]
    fn near_bottom_honors_threshold() {
        let metrics = ScrollMetrics {
            offset: 700,
            viewport: 100,
            content: 1000,
        };
        assert!(metrics.near_bottom(200));
        assert!(!metrics.near_bottom(199));
    }

    #[test]
    fn custom_batch_size_is_used() {
        let mut controller = Controller::new(ControllerSettings {
            batch_size: 7,
            ..ControllerSettings::default()
        });
        let mut surface = RecordingSurface::default();
        controller.dispatch(
            ControllerCommand::DatasetLoaded(catalog(10)),
            &FilterSnapshot::default(),
            &mut surface,
        );
        assert_eq!(surface.rows.len(), 7);
    }
}
