//! Chord sheet layout engine
//!
//! This module turns a parsed song into rows that fit a column, and decides
//! where column breaks go. Renderers consume the resulting layout stream.

pub mod config;
pub mod cursor;
pub mod engine;
pub mod item_processor;
pub mod items;
pub mod line_breaker;
pub mod line_factory;
pub mod lyrics;
pub mod measurer;
pub mod paragraph_splitter;

pub use config::{FontSpec, FontStyle, LayoutConfig, LayoutFonts};
pub use cursor::LayoutCursor;
pub use engine::LayoutEngine;
pub use item_processor::ItemProcessor;
pub use items::{AtomicItem, LineLayout, LineType, MeasuredItem, ParagraphLayoutResult};
pub use line_breaker::LineBreaker;
pub use line_factory::LayoutFactory;
pub use measurer::{CachedMeasurer, HeuristicMeasurer, MonospaceMeasurer, TextMeasurer};
pub use paragraph_splitter::{ColumnSpace, ParagraphSplitter, SplitDecision, SplitStrategy};
