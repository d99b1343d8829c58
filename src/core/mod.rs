//! # Core Application Logic
//!
//! This module contains the kiosk's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • EmotionLabel         │
//!                    │  • Catalog (static)     │
//!                    │  • CaptureFlow (FSM)    │
//!                    │  • App + update()       │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  capture   │      │  analysis  │
//!     │  Adapter   │      │  (camera)  │      │   (HTTP)   │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`emotion`]: The closed `EmotionLabel` set and its parser
//! - [`catalog`]: Static recommendations and menu grid
//! - [`flow`]: The capture/analyze state machine
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum, everything that can happen in the app
//! - [`config`]: Layered configuration

pub mod action;
pub mod catalog;
pub mod config;
pub mod emotion;
pub mod flow;
pub mod state;
