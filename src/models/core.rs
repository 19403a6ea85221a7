//! Song AST consumed by the layout engine
//!
//! These types mirror the paragraph → line → item tree produced by the
//! chord-sheet parsers. The layout engine only ever reads them; every text
//! transform applied during layout works on copies.

use serde::{Deserialize, Serialize};

use super::tags::TagKind;

/// A parsed song: metadata needed for chord rendering plus the body paragraphs
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Song {
    /// Song key (e.g. "G"), forwarded to the chord renderer
    pub key: Option<String>,

    /// Capo position, forwarded to the chord renderer
    pub capo: Option<i32>,

    /// Body paragraphs in source order
    pub paragraphs: Vec<Paragraph>,
}

impl Song {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            key: None,
            capo: None,
            paragraphs,
        }
    }
}

/// Section classification for a paragraph
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    #[default]
    None,
    Verse,
    Chorus,
    Bridge,
    Tab,
    Grid,
    /// Lines with mixed section types
    Indeterminate,
}

/// A contiguous run of structural lines sharing one section type
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Paragraph {
    pub section_type: SectionType,
    pub lines: Vec<Line>,
}

impl Paragraph {
    pub fn new(section_type: SectionType, lines: Vec<Line>) -> Self {
        Self {
            section_type,
            lines,
        }
    }
}

/// One structural line of the song
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Line {
    pub items: Vec<SongItem>,

    /// Audio sync timestamps in seconds
    pub timestamps: Vec<f64>,
}

impl Line {
    pub fn new(items: Vec<SongItem>) -> Self {
        Self {
            items,
            timestamps: Vec::new(),
        }
    }

    /// Builder-style helper attaching line-level timestamps
    pub fn with_timestamps(mut self, timestamps: Vec<f64>) -> Self {
        self.timestamps = timestamps;
        self
    }
}

/// A chord symbol (possibly empty) above a lyric fragment (possibly empty)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ChordLyricsPair {
    pub chords: String,
    pub lyrics: String,

    /// Free text shown in place of the chord (ChordPro `[*text]`)
    pub annotation: Option<String>,

    pub timestamps: Vec<f64>,
}

impl ChordLyricsPair {
    pub fn new(chords: impl Into<String>, lyrics: impl Into<String>) -> Self {
        Self {
            chords: chords.into(),
            lyrics: lyrics.into(),
            annotation: None,
            timestamps: Vec::new(),
        }
    }

    /// True when something is shown in the chord row
    pub fn has_chord_row_text(&self) -> bool {
        !self.chords.is_empty() || self.annotation.as_deref().is_some_and(|a| !a.is_empty())
    }
}

/// A ChordPro directive such as `{comment: Intro}` or `{column_break}`
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn kind(&self) -> TagKind {
        TagKind::from_name(&self.name)
    }
}

/// Items a structural line is made of
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SongItem {
    ChordLyricsPair(ChordLyricsPair),
    Tag(Tag),
    Comment { text: String },
    SoftLineBreak,
}

impl SongItem {
    pub fn pair(chords: impl Into<String>, lyrics: impl Into<String>) -> Self {
        SongItem::ChordLyricsPair(ChordLyricsPair::new(chords, lyrics))
    }

    pub fn tag(name: impl Into<String>, value: impl Into<String>) -> Self {
        SongItem::Tag(Tag::new(name, value))
    }

    pub fn comment(text: impl Into<String>) -> Self {
        SongItem::Comment { text: text.into() }
    }

    /// True when this item puts text in the chord row
    pub fn carries_chord(&self) -> bool {
        match self {
            SongItem::ChordLyricsPair(pair) => pair.has_chord_row_text(),
            SongItem::Tag(_) | SongItem::Comment { .. } | SongItem::SoftLineBreak => false,
        }
    }
}
