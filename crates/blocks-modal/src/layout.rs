#![forbid(unsafe_code)]

//! Responsive layout resolution.
//!
//! A modal has a base [`ModalLayout`] plus optional per-breakpoint overrides.
//! On each viewport width change the overrides are scanned in ascending
//! width order and the first one whose breakpoint width is `>= width` wins.
//! If none match, the base layout stands.
//!
//! ```text
//! base = right, overrides = { sm(600): bottom-sheet, xl(1200): center }
//!
//!   width   0 ..= 600  -> bottom-sheet
//!   width 601 ..= 1200 -> center
//!   width 1201 ..      -> right
//! ```
//!
//! # Invariants
//!
//! 1. Overrides are sorted once, at construction. Equal widths keep the
//!    order they were declared in.
//! 2. [`needs_reattach`] depends only on the two layout families.

use blocks_core::{Breakpoint, BreakpointTable};

use crate::types::{LayoutFamily, ModalLayout};

/// Breakpoint overrides resolved to pixel widths and sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakpointOverrides {
    entries: Vec<Override>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Override {
    width: u32,
    breakpoint: Breakpoint,
    layout: ModalLayout,
}

impl BreakpointOverrides {
    /// Resolve `rules` against `table`. A breakpoint listed twice keeps its
    /// last layout.
    pub fn new(rules: &[(Breakpoint, ModalLayout)], table: &BreakpointTable) -> Self {
        let mut entries: Vec<Override> = Vec::with_capacity(rules.len());
        for &(breakpoint, layout) in rules {
            match entries.iter_mut().find(|o| o.breakpoint == breakpoint) {
                Some(existing) => existing.layout = layout,
                None => entries.push(Override {
                    width: table.width(breakpoint),
                    breakpoint,
                    layout,
                }),
            }
        }
        entries.sort_by_key(|o| o.width);
        Self { entries }
    }

    /// Effective layout for `width`.
    #[must_use]
    pub fn resolve(&self, base: ModalLayout, width: u32) -> ModalLayout {
        self.entries
            .iter()
            .find(|o| width <= o.width)
            .map_or(base, |o| o.layout)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `(breakpoint, width, layout)` in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (Breakpoint, u32, ModalLayout)> + '_ {
        self.entries.iter().map(|o| (o.breakpoint, o.width, o.layout))
    }
}

/// Whether moving between two layout families requires the content view
/// to be detached and reinserted.
#[must_use]
pub const fn needs_reattach(prev: LayoutFamily, next: LayoutFamily) -> bool {
    !matches!(
        (prev, next),
        (LayoutFamily::Side, LayoutFamily::Side) | (LayoutFamily::Centered, LayoutFamily::Centered)
    )
}

/// What a layout change implies for the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTransition {
    pub from: ModalLayout,
    pub to: ModalLayout,
    pub reattach: bool,
    pub enter_bottom_sheet: bool,
    pub leave_bottom_sheet: bool,
}

impl LayoutTransition {
    #[must_use]
    pub fn between(from: ModalLayout, to: ModalLayout) -> Self {
        let was_sheet = from == ModalLayout::BottomSheet;
        let is_sheet = to == ModalLayout::BottomSheet;
        Self {
            from,
            to,
            reattach: needs_reattach(from.family(), to.family()),
            enter_bottom_sheet: is_sheet && !was_sheet,
            leave_bottom_sheet: was_sheet && !is_sheet,
        }
    }

    #[must_use]
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

/// The single child-view slot a container owns.
///
/// The slot only tracks attachment; the host performs the actual view
/// moves when told a relayout was a reattach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentSlot {
    attached: Option<LayoutFamily>,
    reattachments: u32,
}

impl ContentSlot {
    pub fn attach(&mut self, family: LayoutFamily) {
        self.attached = Some(family);
    }

    /// Detach and report the family the view was in.
    pub fn detach(&mut self) -> Option<LayoutFamily> {
        self.attached.take()
    }

    /// Move the view into `family` if the move crosses families. Returns
    /// true when a detach/reattach cycle happened.
    pub fn move_to(&mut self, family: LayoutFamily) -> bool {
        match self.attached {
            Some(current) if needs_reattach(current, family) => {
                self.detach();
                self.attach(family);
                self.reattachments += 1;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    #[must_use]
    pub fn family(&self) -> Option<LayoutFamily> {
        self.attached
    }

    /// Number of cross-family moves so far.
    #[must_use]
    pub fn reattachments(&self) -> u32 {
        self.reattachments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BreakpointTable {
        BreakpointTable::default()
    }

    #[test]
    fn resolution_picks_smallest_matching_breakpoint() {
        let o = BreakpointOverrides::new(
            &[
                (Breakpoint::Xl, ModalLayout::Center),
                (Breakpoint::Sm, ModalLayout::BottomSheet),
            ],
            &table(),
        );
        assert_eq!(o.resolve(ModalLayout::Right, 500), ModalLayout::BottomSheet);
        assert_eq!(o.resolve(ModalLayout::Right, 600), ModalLayout::BottomSheet);
        assert_eq!(o.resolve(ModalLayout::Right, 800), ModalLayout::Center);
        assert_eq!(o.resolve(ModalLayout::Right, 1300), ModalLayout::Right);
    }

    #[test]
    fn empty_overrides_keep_base() {
        let o = BreakpointOverrides::default();
        assert_eq!(o.resolve(ModalLayout::Left, 10), ModalLayout::Left);
        assert!(o.is_empty());
    }

    #[test]
    fn duplicate_breakpoint_keeps_last_layout() {
        let o = BreakpointOverrides::new(
            &[
                (Breakpoint::Md, ModalLayout::Left),
                (Breakpoint::Md, ModalLayout::BottomSheet),
            ],
            &table(),
        );
        assert_eq!(o.len(), 1);
        assert_eq!(o.resolve(ModalLayout::Center, 700), ModalLayout::BottomSheet);
    }

    #[test]
    fn reattach_only_across_families() {
        assert!(needs_reattach(LayoutFamily::Side, LayoutFamily::Centered));
        assert!(needs_reattach(LayoutFamily::Centered, LayoutFamily::Side));
        assert!(!needs_reattach(LayoutFamily::Side, LayoutFamily::Side));
        assert!(!needs_reattach(LayoutFamily::Centered, LayoutFamily::Centered));
    }

    #[test]
    fn transition_flags() {
        let t = LayoutTransition::between(ModalLayout::Center, ModalLayout::BottomSheet);
        assert!(t.enter_bottom_sheet);
        assert!(!t.reattach);

        let t = LayoutTransition::between(ModalLayout::BottomSheet, ModalLayout::Right);
        assert!(t.leave_bottom_sheet);
        assert!(t.reattach);

        let t = LayoutTransition::between(ModalLayout::Left, ModalLayout::Left);
        assert!(!t.is_change());
    }

    #[test]
    fn slot_moves_only_across_families() {
        let mut slot = ContentSlot::default();
        assert!(!slot.move_to(LayoutFamily::Side));
        slot.attach(LayoutFamily::Centered);
        assert!(!slot.move_to(LayoutFamily::Centered));
        assert!(slot.move_to(LayoutFamily::Side));
        assert_eq!(slot.family(), Some(LayoutFamily::Side));
        assert_eq!(slot.reattachments(), 1);
        assert_eq!(slot.detach(), Some(LayoutFamily::Side));
        assert!(!slot.is_attached());
    }
}
