//! Chord sheet layout WASM API
//!
//! This module provides the JavaScript-facing API of the layout engine.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization and error handling
//! - `layout`: Layout and display list entry points, plus the JS text measurer

pub mod helpers;
pub mod layout;

pub use layout::{compute_display_list, compute_paragraph_layouts, JsMeasurer};
