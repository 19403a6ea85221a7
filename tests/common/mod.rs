// Shared helpers for integration tests
#![allow(dead_code)]

use chordsheet_layout::{
    BasicChordRenderer, FontSpec, LayoutConfig, LayoutEngine, Line, LineLayout, MonospaceMeasurer, Paragraph,
    ParagraphLayoutResult, SectionType, Song, SongItem,
};

/// Build a line from inline chord notation: `"Let it [Am]be"`
pub fn chord_line(source: &str) -> Line {
    let mut items = Vec::new();
    let mut rest = source;

    if let Some(open) = rest.find('[') {
        if open > 0 {
            items.push(SongItem::pair("", &rest[..open]));
        }
        rest = &rest[open..];
    } else {
        return Line::new(vec![SongItem::pair("", source)]);
    }

    while let Some(stripped) = rest.strip_prefix('[') {
        let close = stripped.find(']').expect("unclosed chord");
        let chord = &stripped[..close];
        let after = &stripped[close + 1..];
        let next = after.find('[').unwrap_or(after.len());
        items.push(SongItem::pair(chord, &after[..next]));
        rest = &after[next..];
    }

    Line::new(items)
}

pub fn paragraph(section_type: SectionType, lines: &[&str]) -> Paragraph {
    Paragraph::new(section_type, lines.iter().map(|line| chord_line(line)).collect())
}

/// 8px per character for every font, no padding, one column
pub fn test_config(column_width: f32) -> LayoutConfig {
    let mut config = LayoutConfig {
        column_width,
        chord_spacing: 1,
        line_padding: 0.0,
        chord_lyric_spacing: 0.0,
        min_y: 0.0,
        paragraph_spacing: 0.0,
        column_bottom_y: 1000.0,
        ..LayoutConfig::default()
    };
    config.fonts.chord = FontSpec::new("Test", 8.0);
    config.fonts.lyrics = FontSpec::new("Test", 8.0);
    config.fonts.comment = FontSpec::new("Test", 8.0);
    config.fonts.section_label = FontSpec::new("Test", 8.0);
    config
}

pub fn layout(song: &Song, config: &LayoutConfig) -> Vec<ParagraphLayoutResult> {
    let measurer = MonospaceMeasurer::fixed(8.0);
    LayoutEngine::new(song, config, &measurer, &BasicChordRenderer)
        .expect("valid test config")
        .compute_paragraph_layouts()
}

pub fn content_rows(result: &ParagraphLayoutResult) -> Vec<&LineLayout> {
    result.rows().filter(|row| !row.is_column_break()).collect()
}

/// Chord row texts in order, spacing trimmed
pub fn chords(rows: &[&LineLayout]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.items.iter())
        .map(|item| item.chord_text().trim().to_string())
        .filter(|chord| !chord.is_empty())
        .collect()
}

/// Lyrics joined across rows, ignoring case, commas and whitespace layout
pub fn normalized_lyrics<'a>(rows: impl IntoIterator<Item = &'a LineLayout>) -> String {
    let joined: String = rows.into_iter().map(|row| format!("{} ", row.lyrics_text())).collect();
    normalize(&joined)
}

pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace(',', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
