//! Event-driven state machines
//!
//! Lifecycle enums implement [`StateTransitions`] as a flat transition table:
//!
//! ```rust
//! use perch_core::StateTransitions;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Toggle {
//!     Off,
//!     On,
//! }
//!
//! const FLIP: u32 = 1;
//!
//! impl StateTransitions for Toggle {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (Toggle::Off, FLIP) => Some(Toggle::On),
//!             (Toggle::On, FLIP) => Some(Toggle::Off),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! assert_eq!(Toggle::Off.on_event(FLIP), Some(Toggle::On));
//! assert_eq!(Toggle::Off.on_event(2), None);
//! ```

use std::hash::Hash;

/// State type driven by `u32` events
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}
