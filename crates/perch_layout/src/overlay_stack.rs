//! Overlay Stack Registry
//!
//! Tracks which floating surfaces are open, the order they were opened in and
//! which parent each one was opened from. The registry hands out z-indices so
//! that the most recently activated overlay always paints on top, and answers
//! the questions outside-click and escape handling need:
//!
//! - is this overlay the topmost one?
//! - does it have open children (a submenu, a nested dropdown)?
//! - which overlay should an outside click or escape key dismiss?
//!
//! The registry is an ordinary value. Hosts that share one registry between
//! several sessions wrap it in a [`SharedOverlayStack`].
//!
//! # Example
//!
//! ```rust
//! use perch_layout::overlay_stack::{OverlayId, OverlayStack};
//!
//! let mut stack = OverlayStack::new();
//! let menu = OverlayId::from_raw(1);
//! let submenu = OverlayId::from_raw(2);
//!
//! stack.activate(menu, None);
//! stack.activate(submenu, Some(menu));
//!
//! assert!(stack.is_topmost(submenu));
//! assert!(!stack.closes_on_outside_interaction(menu));
//!
//! // Closing the menu takes the submenu with it
//! let removed = stack.deactivate(menu);
//! assert_eq!(removed.as_slice(), &[menu, submenu]);
//! assert!(stack.is_empty());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use perch_core::{Point, Rect};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Default z-index of the first overlay
pub const DEFAULT_BASE_Z_INDEX: i32 = 6;

/// Default z-index gap between consecutive overlays
pub const DEFAULT_Z_STEP: i32 = 2;

// =============================================================================
// OverlayId
// =============================================================================

/// Identity of one floating surface in the registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayId(u64);

impl OverlayId {
    /// Reconstruct an id from a raw value
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Ids removed by one [`OverlayStack::deactivate`] call
pub type RemovedOverlays = SmallVec<[OverlayId; 4]>;

// =============================================================================
// Configuration
// =============================================================================

/// Z-index allocation for the registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// z-index of the first overlay
    pub base_z_index: i32,
    /// Gap between consecutive overlays
    pub z_step: i32,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            base_z_index: DEFAULT_BASE_Z_INDEX,
            z_step: DEFAULT_Z_STEP,
        }
    }
}

// =============================================================================
// OverlayEntry
// =============================================================================

/// One active overlay
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayEntry {
    pub id: OverlayId,
    /// Overlay this one was opened from
    pub parent: Option<OverlayId>,
    pub z_index: i32,
    /// Last committed content box in viewport coordinates
    pub content_rect: Option<Rect>,
}

// =============================================================================
// OverlayStack
// =============================================================================

/// Registry of active overlays in activation order
#[derive(Clone, Debug, Default)]
pub struct OverlayStack {
    /// Active overlays, oldest first
    entries: IndexMap<OverlayId, OverlayEntry>,
    config: StackConfig,
    /// Next z slot; reset when the registry empties
    next_slot: i32,
    /// Next id handed out by `allocate_id`
    next_id: u64,
}

impl OverlayStack {
    /// Create an empty registry with default z-index allocation
    pub fn new() -> Self {
        Self::with_config(StackConfig::default())
    }

    pub fn with_config(config: StackConfig) -> Self {
        Self {
            entries: IndexMap::new(),
            config,
            next_slot: 0,
            next_id: 1,
        }
    }

    pub fn config(&self) -> StackConfig {
        self.config
    }

    /// Wrap the registry for sharing between sessions
    pub fn into_shared(self) -> SharedOverlayStack {
        Rc::new(RefCell::new(self))
    }

    /// Hand out an id not currently in the registry
    pub fn allocate_id(&mut self) -> OverlayId {
        loop {
            let id = OverlayId(self.next_id);
            self.next_id += 1;
            if !self.entries.contains_key(&id) {
                return id;
            }
        }
    }

    /// Register `id` as the topmost overlay and return its z-index
    ///
    /// An id already in the registry is moved to the top with a fresh
    /// z-index, unless it is already topmost, in which case it keeps its
    /// z-index. A parent that is unknown, the id itself or one of its
    /// dependents is dropped.
    pub fn activate(&mut self, id: OverlayId, parent: Option<OverlayId>) -> i32 {
        let parent = parent.and_then(|parent| self.checked_parent(id, parent));

        if self.is_topmost(id) {
            if let Some(entry) = self.entries.get_mut(&id) {
                entry.parent = parent;
                tracing::debug!(
                    "stack: {:?} already topmost, keeping z-index {}",
                    id,
                    entry.z_index
                );
                return entry.z_index;
            }
        }

        self.entries.shift_remove(&id);

        let z_index = self.slot_z_index();
        self.next_slot = self.next_slot.saturating_add(1);
        self.entries.insert(
            id,
            OverlayEntry {
                id,
                parent,
                z_index,
                content_rect: None,
            },
        );

        tracing::debug!(
            "stack: activated {:?} (parent {:?}) at z-index {}, {} active",
            id,
            parent,
            z_index,
            self.entries.len()
        );
        z_index
    }

    fn checked_parent(&self, id: OverlayId, parent: OverlayId) -> Option<OverlayId> {
        if parent == id {
            tracing::warn!("stack: {:?} cannot be its own parent, ignoring", id);
            return None;
        }
        if !self.entries.contains_key(&parent) {
            tracing::warn!(
                "stack: parent {:?} of {:?} is not active, ignoring",
                parent,
                id
            );
            return None;
        }
        if self.dependents(id).contains(&parent) {
            tracing::warn!(
                "stack: parent {:?} is a dependent of {:?}, ignoring",
                parent,
                id
            );
            return None;
        }
        Some(parent)
    }

    /// Remove `id` and every overlay opened from it, directly or transitively
    ///
    /// Returns the removed ids, `id` first. Unknown ids are a no-op.
    pub fn deactivate(&mut self, id: OverlayId) -> RemovedOverlays {
        if !self.entries.contains_key(&id) {
            tracing::warn!("stack: deactivate on inactive overlay {:?}, ignoring", id);
            return RemovedOverlays::new();
        }

        let mut removed = RemovedOverlays::new();
        removed.push(id);
        removed.extend(self.dependents(id));

        for removed_id in &removed {
            self.entries.shift_remove(removed_id);
        }
        if self.entries.is_empty() {
            self.next_slot = 0;
        }

        tracing::debug!(
            "stack: deactivated {:?} ({} removed), {} active",
            id,
            removed.len(),
            self.entries.len()
        );
        removed
    }

    /// All overlays opened from `id`, directly or transitively, in activation order
    pub fn dependents(&self, id: OverlayId) -> IndexSet<OverlayId> {
        let mut found: IndexSet<OverlayId> = IndexSet::new();
        loop {
            let before = found.len();
            for entry in self.entries.values() {
                if entry.id == id {
                    continue;
                }
                if let Some(parent) = entry.parent {
                    if parent == id || found.contains(&parent) {
                        found.insert(entry.id);
                    }
                }
            }
            if found.len() == before {
                break;
            }
        }

        self.entries
            .keys()
            .filter(|key| found.contains(*key))
            .copied()
            .collect()
    }

    /// Whether any overlay was opened directly from `id`
    pub fn has_open_dependents(&self, id: OverlayId) -> bool {
        self.entries.values().any(|entry| entry.parent == Some(id))
    }

    /// z-index of the next activation slot, saturating at `i32::MAX`
    fn slot_z_index(&self) -> i32 {
        self.next_slot
            .checked_mul(self.config.z_step)
            .and_then(|offset| self.config.base_z_index.checked_add(offset))
            .unwrap_or_else(|| {
                tracing::warn!(
                    "stack: z-index overflows at slot {} (base {}, step {}), saturating",
                    self.next_slot,
                    self.config.base_z_index,
                    self.config.z_step
                );
                i32::MAX
            })
    }

    /// Most recently activated overlay
    pub fn topmost(&self) -> Option<OverlayId> {
        self.entries.last().map(|(id, _)| *id)
    }

    pub fn is_topmost(&self, id: OverlayId) -> bool {
        self.topmost() == Some(id)
    }

    pub fn is_active(&self, id: OverlayId) -> bool {
        self.entries.contains_key(&id)
    }

    /// z-index of the topmost overlay, or the base z-index when empty
    pub fn topmost_z_index(&self) -> i32 {
        self.entries
            .last()
            .map(|(_, entry)| entry.z_index)
            .unwrap_or(self.config.base_z_index)
    }

    pub fn z_index_of(&self, id: OverlayId) -> Option<i32> {
        self.entries.get(&id).map(|entry| entry.z_index)
    }

    pub fn parent_of(&self, id: OverlayId) -> Option<OverlayId> {
        self.entries.get(&id).and_then(|entry| entry.parent)
    }

    /// An outside interaction should close `id` only when it is topmost
    /// and nothing was opened from it
    pub fn closes_on_outside_interaction(&self, id: OverlayId) -> bool {
        self.is_topmost(id) && !self.has_open_dependents(id)
    }

    /// Record the committed content box used for outside-interaction hit testing
    ///
    /// Returns false for inactive ids.
    pub fn set_content_rect(&mut self, id: OverlayId, rect: Rect) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.content_rect = Some(rect);
                true
            }
            None => false,
        }
    }

    /// Overlay a pointer press at `point` should dismiss
    ///
    /// That is the topmost overlay, when the point lies outside its content
    /// and outside the content of every overlay opened from it. Overlays
    /// without a recorded content box count as not containing the point.
    pub fn outside_interaction_target(&self, point: Point) -> Option<OverlayId> {
        let topmost = self.topmost()?;
        let inside = std::iter::once(topmost)
            .chain(self.dependents(topmost))
            .filter_map(|id| self.entries.get(&id).and_then(|entry| entry.content_rect))
            .any(|rect| rect.contains(point));

        if inside {
            None
        } else {
            Some(topmost)
        }
    }

    /// Overlay an escape key press should dismiss
    pub fn escape_target(&self) -> Option<OverlayId> {
        self.topmost()
    }

    pub fn get(&self, id: OverlayId) -> Option<&OverlayEntry> {
        self.entries.get(&id)
    }

    /// Active overlays, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &OverlayEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// SharedOverlayStack
// =============================================================================

/// Registry shared between the sessions of one UI thread
pub type SharedOverlayStack = Rc<RefCell<OverlayStack>>;

/// Create a new shared registry with default z-index allocation
pub fn shared_overlay_stack() -> SharedOverlayStack {
    OverlayStack::new().into_shared()
}

// =============================================================================
// Tests
// =============================================================================
