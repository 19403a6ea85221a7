//! Models module for the chord sheet layout engine
//!
//! This module contains the song AST handed over by the chord-sheet parsers.

pub mod core;
pub mod tags;

// Re-export commonly used types
pub use self::core::*;
pub use tags::TagKind;
