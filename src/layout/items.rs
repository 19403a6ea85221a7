//! Layout stream types
//!
//! This module defines the output structure of the layout engine. Renderers
//! consume `ParagraphLayoutResult`s in order: every LineLayout is one row,
//! and a singleton group holding a column-break Tag row is a column break.

use serde::{Deserialize, Serialize};

use super::cursor::LayoutCursor;
use crate::models::{ChordLyricsPair, SectionType};

/// The smallest unit the line breaker moves around
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AtomicItem {
    /// Chord row text (already rendered) over a lyric fragment
    ChordLyricsPair(ChordLyricsPair),
    /// Permitted wrap point inside a structural line
    SoftBreak,
    Comment { text: String },
    SectionLabel { text: String },
    ColumnBreakMarker,
}

impl AtomicItem {
    pub fn as_pair(&self) -> Option<&ChordLyricsPair> {
        match self {
            AtomicItem::ChordLyricsPair(pair) => Some(pair),
            _ => None,
        }
    }
}

/// An atomic item together with its measured geometry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MeasuredItem {
    /// `None` is a zero-width alignment placeholder; never rendered
    pub item: Option<AtomicItem>,

    pub width: f32,

    /// Height of the chord row text, when there is one
    pub chord_height: Option<f32>,
}

impl MeasuredItem {
    pub fn new(item: AtomicItem, width: f32) -> Self {
        Self {
            item: Some(item),
            width: width.max(0.0),
            chord_height: None,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            item: None,
            width: 0.0,
            chord_height: None,
        }
    }

    pub fn soft_break() -> Self {
        Self::new(AtomicItem::SoftBreak, 0.0)
    }

    pub fn column_break() -> Self {
        Self::new(AtomicItem::ColumnBreakMarker, 0.0)
    }

    pub fn is_placeholder(&self) -> bool {
        self.item.is_none()
    }

    pub fn is_soft_break(&self) -> bool {
        matches!(self.item, Some(AtomicItem::SoftBreak))
    }

    pub fn is_column_break(&self) -> bool {
        matches!(self.item, Some(AtomicItem::ColumnBreakMarker))
    }

    pub fn pair(&self) -> Option<&ChordLyricsPair> {
        self.item.as_ref().and_then(AtomicItem::as_pair)
    }

    /// Lyric text, empty for anything that is not a chord/lyrics pair
    pub fn lyrics(&self) -> &str {
        self.pair().map_or("", |pair| pair.lyrics.as_str())
    }

    /// Chord row text (annotation or rendered chord)
    pub fn chord_text(&self) -> &str {
        match self.pair() {
            Some(pair) => pair.annotation.as_deref().unwrap_or(pair.chords.as_str()),
            None => "",
        }
    }
}

/// Row classification, by priority
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    ChordLyricsPair,
    Comment,
    SectionLabel,
    Tag,
    Empty,
}

/// One rendered row
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LineLayout {
    pub line_type: LineType,

    pub items: Vec<MeasuredItem>,

    pub line_height: f32,

    /// Index of the structural line inside its paragraph
    pub source_line: usize,

    /// Deduplicated audio sync timestamps, in source order
    #[serde(default)]
    pub timestamps: Vec<f64>,

    /// Set when a single unsplittable item is wider than the column
    #[serde(default)]
    pub overflow: bool,
}

impl LineLayout {
    /// The only valid column-break encoding: a Tag row holding one marker
    pub fn column_break(source_line: usize) -> Self {
        Self {
            line_type: LineType::Tag,
            items: vec![MeasuredItem::column_break()],
            line_height: 0.0,
            source_line,
            timestamps: Vec::new(),
            overflow: false,
        }
    }

    pub fn total_width(&self) -> f32 {
        self.items.iter().map(|item| item.width).sum()
    }

    pub fn is_chord_lyrics(&self) -> bool {
        self.line_type == LineType::ChordLyricsPair
    }

    pub fn is_column_break(&self) -> bool {
        self.line_type == LineType::Tag
            && self.items.len() == 1
            && self.items.iter().all(MeasuredItem::is_column_break)
    }

    /// Concatenated lyric text of the row
    pub fn lyrics_text(&self) -> String {
        self.items.iter().map(MeasuredItem::lyrics).collect()
    }
}

/// True when a unit is a column break group
pub fn is_break_group(group: &[LineLayout]) -> bool {
    matches!(group, [row] if row.is_column_break())
}

/// Summed height of a unit's rows
pub fn group_height(group: &[LineLayout]) -> f32 {
    group.iter().map(|row| row.line_height).sum()
}

/// Layout of one paragraph
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ParagraphLayoutResult {
    /// Row groups: one per structural line, or a singleton column break
    pub units: Vec<Vec<LineLayout>>,

    pub add_spacing_after: bool,

    pub section_type: SectionType,

    #[serde(default)]
    pub timestamps: Vec<f64>,

    /// Simulated cursor at the start of the paragraph
    pub start_cursor: LayoutCursor,
}

impl ParagraphLayoutResult {
    /// All rows in order, break rows included
    pub fn rows(&self) -> impl Iterator<Item = &LineLayout> {
        self.units.iter().flatten()
    }

    pub fn break_count(&self) -> usize {
        self.units.iter().filter(|group| is_break_group(group)).count()
    }
}

/// Append timestamps not already present, keeping first-seen order
pub(crate) fn merge_timestamps(target: &mut Vec<f64>, source: &[f64]) {
    for timestamp in source {
        if !target.contains(timestamp) {
            target.push(*timestamp);
        }
    }
}
