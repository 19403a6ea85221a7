//! Display list for positioned chord sheet output
//!
//! The builder walks the layout stream with the same `LayoutCursor` the
//! engine used, so page and column transitions land exactly where the
//! engine decided. JavaScript (or any other backend) only has to draw the
//! positioned text.

use serde::{Deserialize, Serialize};

use crate::layout::config::{FontSpec, LayoutConfig};
use crate::layout::cursor::LayoutCursor;
use crate::layout::items::{is_break_group, AtomicItem, LineLayout, LineType, ParagraphLayoutResult};

/// All pages of a laid out song
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    pub pages: Vec<RenderPage>,
}

impl DisplayList {
    pub fn element_count(&self) -> usize {
        self.pages.iter().map(|page| page.elements.len()).sum()
    }
}

/// One page worth of positioned text
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RenderPage {
    /// 1-based page number
    pub number: usize,

    pub elements: Vec<RenderElement>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Chord,
    Lyrics,
    Comment,
    SectionLabel,
}

/// A single positioned run of text
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RenderElement {
    pub kind: ElementKind,

    pub text: String,

    /// Left edge in pixels
    pub x: f32,

    /// Top edge in pixels
    pub y: f32,

    /// Width of the item box the text sits in
    pub width: f32,

    /// CSS font shorthand for the text role
    pub font: String,

    /// 1-based column index on the page
    pub column: usize,
}

/// Places the rows of a layout stream on pages
pub struct DisplayListBuilder<'a> {
    config: &'a LayoutConfig,
}

impl<'a> DisplayListBuilder<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, paragraphs: &[ParagraphLayoutResult]) -> DisplayList {
        let mut cursor = LayoutCursor::start(self.config);
        let mut pages = vec![RenderPage {
            number: cursor.page,
            elements: Vec::new(),
        }];

        for paragraph in paragraphs {
            if cursor != paragraph.start_cursor {
                log::warn!(
                    "Paragraph expected to start at {:?}, renderer is at {:?}",
                    paragraph.start_cursor,
                    cursor
                );
            }

            for group in &paragraph.units {
                if is_break_group(group) {
                    if cursor.advance_column(self.config) {
                        pages.push(RenderPage {
                            number: cursor.page,
                            elements: Vec::new(),
                        });
                    }
                    continue;
                }

                let mut top = cursor.y;
                for row in group {
                    if let Some(page) = pages.last_mut() {
                        self.place_row(row, top, &cursor, &mut page.elements);
                    }
                    top += row.line_height;
                }
                cursor.advance_group(group, self.config);
            }

            if paragraph.add_spacing_after {
                cursor.advance_y(self.config.paragraph_spacing);
            }
        }

        log::debug!("Display list built: {} page(s)", pages.len());
        DisplayList { pages }
    }

    fn place_row(&self, row: &LineLayout, top: f32, cursor: &LayoutCursor, out: &mut Vec<RenderElement>) {
        let fonts = &self.config.fonts;
        let text_top = top + self.config.line_padding;
        // Text sharing a chord/lyric row sits on the lyric line
        let bottom_aligned = |font: &FontSpec| top + row.line_height - font.line_box();
        let mut x = cursor.x(self.config);

        for measured in &row.items {
            let element = |kind: ElementKind, text: &str, y: f32, font: &FontSpec| RenderElement {
                kind,
                text: text.to_string(),
                x,
                y,
                width: measured.width,
                font: font.css(),
                column: cursor.column,
            };

            match &measured.item {
                Some(AtomicItem::ChordLyricsPair(_)) => {
                    let chord = measured.chord_text();
                    if !chord.trim().is_empty() {
                        out.push(element(ElementKind::Chord, chord, text_top, &fonts.chord));
                    }
                    let lyrics = measured.lyrics();
                    if !lyrics.trim().is_empty() {
                        out.push(element(ElementKind::Lyrics, lyrics, bottom_aligned(&fonts.lyrics), &fonts.lyrics));
                    }
                }
                Some(AtomicItem::Comment { text }) => {
                    let y = if row.line_type == LineType::Comment {
                        text_top
                    } else {
                        bottom_aligned(&fonts.comment)
                    };
                    out.push(element(ElementKind::Comment, text, y, &fonts.comment));
                }
                Some(AtomicItem::SectionLabel { text }) => {
                    let y = if row.line_type == LineType::SectionLabel {
                        text_top
                    } else {
                        bottom_aligned(&fonts.section_label)
                    };
                    out.push(element(ElementKind::SectionLabel, text, y, &fonts.section_label));
                }
                Some(AtomicItem::SoftBreak | AtomicItem::ColumnBreakMarker) | None => {}
            }

            x += measured.width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::FontSpec;
    use crate::layout::engine::LayoutEngine;
    use crate::layout::measurer::MonospaceMeasurer;
    use crate::models::{Line, Paragraph, SectionType, Song, SongItem};
    use crate::renderers::chord::BasicChordRenderer;

    fn config() -> LayoutConfig {
        let mut config = LayoutConfig {
            column_width: 200.0,
            column_count: 2,
            column_spacing: 20.0,
            margin_left: 10.0,
            line_padding: 0.0,
            chord_lyric_spacing: 0.0,
            min_y: 0.0,
            column_bottom_y: 40.0,
            paragraph_spacing: 0.0,
            ..LayoutConfig::default()
        };
        config.fonts.chord = FontSpec::new("Test", 8.0);
        config.fonts.lyrics = FontSpec::new("Test", 10.0);
        config.fonts.comment = FontSpec::new("Test", 8.0);
        config.fonts.section_label = FontSpec::new("Test", 8.0);
        config
    }

    fn display_list(song: &Song, config: &LayoutConfig) -> DisplayList {
        let measurer = MonospaceMeasurer::fixed(8.0);
        let engine = LayoutEngine::new(song, config, &measurer, &BasicChordRenderer).unwrap();
        DisplayListBuilder::new(config).build(&engine.compute_paragraph_layouts())
    }

    #[test]
    fn test_chords_sit_above_lyrics() {
        let song = Song::new(vec![Paragraph::new(
            SectionType::Verse,
            vec![Line::new(vec![SongItem::pair("Am", "let "), SongItem::pair("G", "it be")])],
        )]);
        let list = display_list(&song, &config());
        let elements = &list.pages[0].elements;

        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0].kind, ElementKind::Chord);
        assert_eq!((elements[0].x, elements[0].y), (10.0, 0.0));
        assert_eq!(elements[1].kind, ElementKind::Lyrics);
        assert_eq!(elements[1].y, 8.0);
        // "let " is 32px wide
        assert_eq!(elements[2].x, 42.0);
        assert_eq!(elements[3].text, "it be");
    }

    #[test]
    fn test_columns_and_pages_follow_engine_breaks() {
        // Each paragraph is one 18px row; two fit per 40px column
        let paragraphs = (0..5)
            .map(|i| Paragraph::new(SectionType::Verse, vec![Line::new(vec![SongItem::pair("C", format!("row {}", i))])]))
            .collect();
        let list = display_list(&Song::new(paragraphs), &config());

        assert_eq!(list.pages.len(), 2);
        let columns: Vec<usize> = list.pages[0].elements.iter().map(|e| e.column).collect();
        assert_eq!(columns, vec![1, 1, 1, 1, 2, 2, 2, 2]);
        assert_eq!(list.pages[0].elements[4].x, 230.0);
        assert_eq!(list.pages[1].number, 2);
        assert_eq!(list.pages[1].elements[1].text, "row 4");
    }

    #[test]
    fn test_comment_inside_lyric_line_is_rendered() {
        let song = Song::new(vec![Paragraph::new(
            SectionType::Verse,
            vec![Line::new(vec![SongItem::pair("C", "hello "), SongItem::comment("softly")])],
        )]);
        let list = display_list(&song, &config());
        let elements = &list.pages[0].elements;

        let texts: Vec<&str> = elements.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["C", "hello ", "softly"]);
        let comment = &elements[2];
        assert_eq!(comment.kind, ElementKind::Comment);
        // After the 48px "hello ", on the lyric line of the 18px row
        assert_eq!(comment.x, 58.0);
        assert_eq!(comment.y, 10.0);
    }

    #[test]
    fn test_fractional_row_heights_stay_in_step_with_engine() {
        let mut config = config();
        config.column_bottom_y = 1000.0;
        config.paragraph_spacing = 3.3;
        config.fonts.lyrics = FontSpec::new("Test", 10.0).with_line_height(1.17);
        let paragraphs = (0..6)
            .map(|i| {
                Paragraph::new(
                    SectionType::Verse,
                    vec![
                        Line::new(vec![SongItem::pair("C", format!("first {}", i))]),
                        Line::new(vec![SongItem::pair("", format!("second {}", i))]),
                    ],
                )
            })
            .collect();
        let song = Song::new(paragraphs);

        let measurer = MonospaceMeasurer::fixed(8.0);
        let engine = LayoutEngine::new(&song, &config, &measurer, &BasicChordRenderer).unwrap();
        let layouts = engine.compute_paragraph_layouts();
        let list = DisplayListBuilder::new(&config).build(&layouts);

        let chords: Vec<&RenderElement> =
            list.pages[0].elements.iter().filter(|e| e.kind == ElementKind::Chord).collect();
        assert_eq!(chords.len(), layouts.len());
        for (chord, layout) in chords.iter().zip(&layouts) {
            assert_eq!(chord.y, layout.start_cursor.y);
        }
    }

    #[test]
    fn test_placeholders_are_not_rendered() {
        let mut config = config();
        config.display_lyrics_only = true;
        let song = Song::new(vec![Paragraph::new(
            SectionType::Verse,
            vec![Line::new(vec![SongItem::pair("C", "wo-"), SongItem::pair("G", "rd"), SongItem::pair("F", " - ")])],
        )]);
        let list = display_list(&song, &config);
        let texts: Vec<&str> = list.pages[0].elements.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["wo", "rd"]);
        assert!(list.pages[0].elements.iter().all(|e| e.kind == ElementKind::Lyrics));
    }
}
