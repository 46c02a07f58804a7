//! # Core Application Logic
//!
//! This module contains FeelTok's business logic.
//! It knows nothing about any specific UI technology or transport.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Store (feed posts)   │
//!                    │  • Layout (masonry)     │
//!                    │  • Action → update()    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │  Backend   │
//!           │  Adapter   │              │   (REST)   │
//!           │ (ratatui)  │              │            │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`model`]: Plain data records (`Post`, `Comment`, `RemoteWrite`, ...)
//! - [`store`]: `FeedStateStore`, the local source of truth for the feed
//! - [`layout`]: `FeedLayoutEngine`, greedy masonry column assignment
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: Config file, env and CLI resolution

pub mod action;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod state;
pub mod store;

pub use error::FeedError;
pub use layout::{CardHeights, FeedLayoutEngine, HeightEstimator};
pub use store::FeedStateStore;
