use log::debug;

use crate::config::PagerConfig;
use crate::errors::PagerError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    /// Pointer is down but has not moved past the activation distance.
    Pressed,
    /// Row follows the pointer.
    Dragging,
    /// Row is animating towards `target`.
    Settling { target: f64 },
}

/// Outcome of a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureStart {
    Tracking,
    /// The press landed on a horizontally scrollable child.
    Cancelled,
    /// The pager is disabled.
    Ignored,
}

/// A change of the active page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageChange {
    pub from: usize,
    pub to: usize,
    /// Vertical scroll offset to restore on the newly active page.
    pub restore_scroll: f64,
}

#[derive(Debug, Clone)]
pub struct Pager {
    config: PagerConfig,
    width: f64,
    active: usize,
    offset: f64,
    phase: Phase,
    disabled: bool,
    scroll_offsets: Vec<f64>,
}

impl Pager {
    pub fn new(page_count: usize, width: f64, config: PagerConfig) -> Result<Self, PagerError> {
        if page_count == 0 {
            return Err(PagerError::NoPages);
        }
        if !width.is_finite() || width < 0.0 {
            return Err(PagerError::InvalidWidth(width));
        }
        Ok(Self {
            config,
            width,
            active: 0,
            offset: 0.0,
            phase: Phase::Idle,
            disabled: false,
            scroll_offsets: vec![0.0; page_count],
        })
    }

    pub fn page_count(&self) -> usize {
        self.scroll_offsets.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current horizontal offset of the row (zero or negative).
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Resting offset of page `index`.
    pub fn page_offset(&self, index: usize) -> f64 {
        -(index as f64) * self.width
    }

    fn last_index(&self) -> usize {
        self.page_count() - 1
    }

    /// Disabling drops any gesture in progress and settles on the active page.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled && matches!(self.phase, Phase::Pressed | Phase::Dragging) {
            self.settle(self.active);
        }
    }

    /// Container resized. Outside a drag the row snaps onto the active page.
    pub fn set_width(&mut self, width: f64) -> Result<(), PagerError> {
        if !width.is_finite() || width < 0.0 {
            return Err(PagerError::InvalidWidth(width));
        }
        self.width = width;
        if self.phase != Phase::Dragging {
            self.settle(self.active);
        }
        Ok(())
    }

    /// The active page was changed from outside (navigation click).
    ///
    /// Out-of-range indexes are clamped. While dragging the row keeps
    /// following the pointer; the release settles relative to the new page.
    pub fn set_active(&mut self, index: usize) -> Option<PageChange> {
        let index = index.min(self.last_index());
        let change = self.activate(index);
        if self.phase != Phase::Dragging {
            self.settle(index);
        }
        change
    }

    pub fn pointer_down(&mut self, on_horizontal_scroller: bool) -> GestureStart {
        if self.disabled {
            return GestureStart::Ignored;
        }
        if on_horizontal_scroller {
            return GestureStart::Cancelled;
        }
        self.phase = Phase::Pressed;
        GestureStart::Tracking
    }

    /// Pointer moved `dx` pixels since the press. Returns the row offset.
    pub fn pointer_move(&mut self, dx: f64) -> f64 {
        match self.phase {
            Phase::Pressed if dx.abs() >= self.config.activation_distance => {
                self.phase = Phase::Dragging;
            }
            Phase::Dragging => {}
            _ => return self.offset,
        }

        let base = self.page_offset(self.active);
        let past_first = self.active == 0 && dx > 0.0;
        let past_last = self.active == self.last_index() && dx < 0.0;
        let movement = if past_first || past_last {
            dx * self.config.edge_resistance
        } else {
            dx
        };
        self.offset = base + movement;
        self.offset
    }

    /// Pointer lifted after moving `dx` pixels with horizontal velocity `vx`.
    pub fn release(&mut self, dx: f64, vx: f64) -> Option<PageChange> {
        match self.phase {
            Phase::Dragging => {}
            Phase::Pressed => {
                self.phase = Phase::Idle;
                return None;
            }
            _ => return None,
        }

        let distance = dx.abs();
        let far_enough = distance > self.config.threshold * self.width;
        let fast_enough = vx.abs() > self.config.velocity_threshold;

        let mut target = self.active;
        if distance > self.config.min_distance && (far_enough || fast_enough) {
            if dx > 0.0 && self.active > 0 {
                target = self.active - 1;
            } else if dx < 0.0 && self.active < self.last_index() {
                target = self.active + 1;
            }
        }

        let change = self.activate(target);
        self.settle(target);
        change
    }

    /// The host finished the settle animation.
    pub fn settle_complete(&mut self) {
        if let Phase::Settling { target } = self.phase {
            self.offset = target;
            self.phase = Phase::Idle;
        }
    }

    /// Remember the vertical scroll offset of `page`.
    pub fn record_scroll(&mut self, page: usize, top: f64) {
        if let Some(slot) = self.scroll_offsets.get_mut(page) {
            *slot = top;
        }
    }

    pub fn saved_scroll(&self, page: usize) -> f64 {
        self.scroll_offsets.get(page).copied().unwrap_or(0.0)
    }

    fn activate(&mut self, index: usize) -> Option<PageChange> {
        if index == self.active {
            return None;
        }
        let from = self.active;
        self.active = index;
        debug!("Pager moved from page {} to {}", from, index);
        Some(PageChange {
            from,
            to: index,
            restore_scroll: self.saved_scroll(index),
        })
    }

    fn settle(&mut self, index: usize) {
        let target = self.page_offset(index);
        if (self.offset - target).abs() < f64::EPSILON {
            self.offset = target;
            self.phase = Phase::Idle;
        } else {
            self.phase = Phase::Settling { target };
        }
    }
}
