//! ChordPro directive classification
//!
//! Only the directives that influence body layout are distinguished; every
//! other tag (metadata, section ends) renders nothing.

/// What a tag means for layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `{comment}`, `{comment_italic}`, `{comment_box}`
    Comment,
    /// `{start_of_*}`; rendered as a section label when it has a value
    SectionStart,
    /// `{end_of_*}`
    SectionEnd,
    /// `{column_break}`
    ColumnBreak,
    /// Anything else (title, key, capo, ...)
    Other,
}

const COMMENT_TAGS: &[&str] = &["comment", "c", "comment_italic", "ci", "comment_box", "cb"];

const SECTION_START_TAGS: &[&str] = &[
    "start_of_verse",
    "sov",
    "start_of_chorus",
    "soc",
    "start_of_bridge",
    "sob",
    "start_of_tab",
    "sot",
    "start_of_grid",
    "sog",
];

const SECTION_END_TAGS: &[&str] = &[
    "end_of_verse",
    "eov",
    "end_of_chorus",
    "eoc",
    "end_of_bridge",
    "eob",
    "end_of_tab",
    "eot",
    "end_of_grid",
    "eog",
];

const COLUMN_BREAK_TAGS: &[&str] = &["column_break", "colb"];

impl TagKind {
    /// Classify a directive name (case-insensitive, surrounding whitespace ignored)
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        let name = name.as_str();

        if COMMENT_TAGS.contains(&name) {
            TagKind::Comment
        } else if SECTION_START_TAGS.contains(&name) {
            TagKind::SectionStart
        } else if SECTION_END_TAGS.contains(&name) {
            TagKind::SectionEnd
        } else if COLUMN_BREAK_TAGS.contains(&name) {
            TagKind::ColumnBreak
        } else {
            TagKind::Other
        }
    }
}
