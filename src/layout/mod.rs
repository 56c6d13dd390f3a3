//! Composite layout — pure geometry, no I/O.
//!
//! The module is split into:
//! - **Calculations**: pure functions for spacing, block sizes and font sizes
//! - **Plan**: the [`DrawPlan`] data structures handed to a renderer
//! - **Engine**: [`compute_layout`] / [`LayoutEngine`], combining both
//!
//! Nothing here touches pixels. Everything that needs real images lives in
//! [`imaging`](crate::imaging).

pub mod calculations;
mod engine;
mod plan;

pub use engine::{LayoutEngine, LayoutError, LayoutStyle, compute_layout};
pub use plan::{
    Color, Dimensions, DrawOp, DrawPlan, FillOp, Font, FontWeight, ImageOp, ImageSlot,
    InvalidColor, TextOp,
};
