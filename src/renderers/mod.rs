//! Renderers module for chord sheet output
//!
//! This module contains the chord symbol seam used while measuring and the
//! display list builder that positions laid out rows on pages.

pub mod chord;
pub mod display_list;

// Re-export commonly used types
pub use chord::{BasicChordRenderer, ChordContext, ChordRenderOptions, ChordRenderer};
pub use display_list::{DisplayList, DisplayListBuilder, ElementKind, RenderElement, RenderPage};
