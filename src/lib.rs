//! # covercard
//!
//! Search a music catalog, pick one result, and export a composite image
//! combining the item's cover art, its scannable code and a QR code linking
//! to it, laid out for any output resolution.
//!
//! # Architecture: Pure Layout, Impure Edges
//!
//! ```text
//! search ──► results.json ──► select ──► selection.json
//!                                              │
//!                    ┌─────────────────────────┘
//!                    ▼
//! compose:  load cover ┐
//!           load code  ├─► compute_layout ─► DrawPlan ─► render ─► PNG
//!           make QR    ┘      (pure)
//! ```
//!
//! The interesting part is [`layout`]: a pure function from three image
//! sizes, the item's text and a target size to an ordered list of draw
//! operations. Everything around it (HTTP, decoding, fonts, files) feeds it
//! or executes its output. This split exists for two reasons:
//!
//! - **Testability**: every layout rule is checked with plain numbers, no
//!   pixels or network involved.
//! - **Inspectability**: `covercard layout` prints the plan as JSON, so a
//!   surprising composite can be debugged without looking at pixels.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `CatalogItem`, `ItemType`, `SearchResponse` |
//! | [`resolution`] | Output size presets and custom overrides |
//! | [`layout`] | The layout engine: spacing, cover, code fit, overflow shrink, QR floor, text |
//! | [`imaging`] | Image loading, QR generation, plan rendering, PNG encoding |
//! | [`cache`] | On-disk cache for downloaded images |
//! | [`catalog`] | Catalog search client and result normalization |
//! | [`history`] | Recent searches |
//! | [`selection`] | Last results and the current selection |
//! | [`compose`] | Validation, parallel source loading, layout, render |
//! | [`config`] | `covercard.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Selection
//!
//! The selected item is passed into [`compose::compose`] as an argument
//! rather than read from shared state. Between CLI invocations it lives in a
//! JSON file in the state directory; inside the library it is just a value.
//!
//! ## Fail Fast, Then Fan Out
//!
//! Composition checks the things it can check without the network (a
//! selection exists, the size is positive and within
//! [`resolution::MAX_SIDE`]) before any request is made. The
//! three sources are then fetched in parallel with `rayon::join`, and the
//! first error (cover, then code, then QR) aborts the attempt. No partial
//! output is written and nothing is retried.
//!
//! ## Timeouts on Every Fetch
//!
//! All HTTP requests carry `network.timeout_secs`. A stalled image host
//! fails the composition with an error instead of hanging the process.
//!
//! ## Known Limitation: Text Width
//!
//! The layout engine does not measure text. A long title at an extreme
//! aspect ratio can run past the right edge; the renderer clips it at the
//! canvas boundary.

pub mod cache;
pub mod catalog;
pub mod compose;
pub mod config;
pub mod history;
pub mod imaging;
pub mod layout;
pub mod output;
pub mod resolution;
pub mod selection;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
