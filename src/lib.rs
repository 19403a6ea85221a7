//! Chord Sheet Layout WASM Module
//!
//! Measured line breaking and column-aware pagination for chord sheets.
//! A parsed song goes in; rows that fit the column, with column breaks placed
//! between them, come out.

pub mod api;
pub mod error;
pub mod layout;
pub mod models;
pub mod renderers;

// Re-export commonly used types
pub use error::{LayoutError, Result};
pub use layout::{
    ColumnSpace, FontSpec, FontStyle, LayoutConfig, LayoutCursor, LayoutEngine, LayoutFonts, LineLayout, LineType,
    MeasuredItem, MonospaceMeasurer, HeuristicMeasurer, CachedMeasurer, ParagraphLayoutResult, ParagraphSplitter,
    SplitDecision, SplitStrategy, TextMeasurer,
};
pub use models::{ChordLyricsPair, Line, Paragraph, SectionType, Song, SongItem, Tag, TagKind};
pub use renderers::{BasicChordRenderer, ChordContext, ChordRenderOptions, ChordRenderer, DisplayList, DisplayListBuilder};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    init_logging();

    log::info!("Chord sheet layout WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logging() {
    // A second init (module re-instantiation) keeps the existing logger
    let _ = console_log::init_with_level(log::Level::Debug);
}

#[cfg(not(feature = "console_log"))]
fn init_logging() {}
