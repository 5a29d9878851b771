//! Perch Core Types
//!
//! This crate provides the value types shared by every part of the Perch
//! overlay engine:
//!
//! - **Geometry**: host-reported [`Bounds`] and rounded, immutable [`Rect`] snapshots
//! - **Dimensions**: the per-activation measurement snapshot
//! - **Directions**: which activator corner a floating surface is anchored to
//! - **Style Values**: [`Length`] and [`Position`] for the content style patch
//! - **State Machines**: the [`StateTransitions`] trait used by session lifecycles
//!
//! # Example
//!
//! ```rust
//! use perch_core::{Direction, Horizontal, Rect, Vertical};
//!
//! let activator = Rect::new(50.0, 100.0, 40.0, 20.0);
//! assert_eq!(activator.bottom, 120.0);
//!
//! let direction = Direction::default();
//! assert_eq!(direction.horiz, Horizontal::Right);
//! assert_eq!(direction.vert, Vertical::Bottom);
//! ```

pub mod dimensions;
pub mod direction;
pub mod error;
pub mod fsm;
pub mod geometry;
pub mod length;
pub mod position;

pub use dimensions::Dimensions;
pub use direction::{AnchorFlags, Direction, Horizontal, Vertical};
pub use error::Error;
pub use fsm::StateTransitions;
pub use geometry::{Bounds, Point, Rect};
pub use length::Length;
pub use position::{ContentStyle, Position};
