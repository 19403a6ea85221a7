//! Song-level layout computation
//!
//! This module contains the main entry point for layout calculations. It
//! walks the song paragraph by paragraph, turns structural lines into rows
//! and simulates the column cursor to decide where column breaks go.

use super::config::LayoutConfig;
use super::cursor::LayoutCursor;
use super::item_processor::ItemProcessor;
use super::items::{is_break_group, merge_timestamps, AtomicItem, LineLayout, LineType, MeasuredItem, ParagraphLayoutResult};
use super::line_breaker::LineBreaker;
use super::line_factory::LayoutFactory;
use super::measurer::TextMeasurer;
use super::paragraph_splitter::{chord_lyric_row_count, ColumnSpace, ParagraphSplitter};
use crate::error::Result;
use crate::models::{Line, Paragraph, Song};
use crate::renderers::chord::{ChordContext, ChordRenderer};

/// Rows of one paragraph before column fitting
type Units = Vec<Vec<LineLayout>>;

/// Main layout engine for computing paragraph layouts
pub struct LayoutEngine<'a> {
    song: &'a Song,
    config: &'a LayoutConfig,
    measurer: &'a dyn TextMeasurer,
    chord_renderer: &'a dyn ChordRenderer,
}

impl<'a> LayoutEngine<'a> {
    /// Create an engine; the configuration is validated here, once
    pub fn new(
        song: &'a Song,
        config: &'a LayoutConfig,
        measurer: &'a dyn TextMeasurer,
        chord_renderer: &'a dyn ChordRenderer,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            song,
            config,
            measurer,
            chord_renderer,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        self.config
    }

    /// Compute the layout of every renderable paragraph
    ///
    /// The cursor lives only for the duration of the call, so repeated calls
    /// return identical results.
    pub fn compute_paragraph_layouts(&self) -> Vec<ParagraphLayoutResult> {
        let context = ChordContext {
            key: self.song.key.clone(),
            capo: self.song.capo,
        };
        let processor = ItemProcessor::new(self.config, self.measurer, self.chord_renderer, context);
        let breaker = LineBreaker::new(&processor);
        let factory = LayoutFactory::new(self.config);
        let column_width = self.config.resolved_column_width();

        let mut cursor = LayoutCursor::start(self.config);
        let mut results: Vec<ParagraphLayoutResult> = Vec::new();

        log::debug!(
            "Laying out {} paragraphs in {} column(s) of {:.1}px",
            self.song.paragraphs.len(),
            self.config.column_count,
            column_width
        );

        for (index, paragraph) in self.song.paragraphs.iter().enumerate() {
            let units = self.paragraph_units(paragraph, &processor, &breaker, &factory, column_width);

            let content_rows: Vec<&LineLayout> = units.iter().flatten().filter(|row| !row.is_column_break()).collect();
            let chord_lyric_rows = content_rows.iter().filter(|row| row.is_chord_lyrics()).count();
            let other_rows = content_rows.len() - chord_lyric_rows;

            if units.is_empty() {
                log::trace!("Paragraph {} has no rows, skipping", index);
                continue;
            }
            if self.config.display_lyrics_only && chord_lyric_rows == 0 && other_rows == 1 {
                log::debug!("Paragraph {} is a lone non-lyric row in lyrics-only mode, skipping", index);
                continue;
            }

            let start_cursor = cursor;
            let placed = self.place_paragraph(units, &mut cursor);

            let mut timestamps = Vec::new();
            for row in placed.iter().flatten() {
                merge_timestamps(&mut timestamps, &row.timestamps);
            }

            log::debug!(
                "Paragraph {} ({:?}): {} chord/lyric rows, {} other rows, {} column breaks, ends at column {} page {} y={:.1}",
                index,
                paragraph.section_type,
                chord_lyric_rows,
                other_rows,
                placed.iter().filter(|group| is_break_group(group)).count(),
                cursor.column,
                cursor.page,
                cursor.y
            );

            cursor.advance_y(self.config.paragraph_spacing);
            results.push(ParagraphLayoutResult {
                units: placed,
                add_spacing_after: true,
                section_type: paragraph.section_type,
                timestamps,
                start_cursor,
            });
        }

        if let Some(last) = results.last_mut() {
            last.add_spacing_after = false;
        }

        results
    }

    /// Rows of every structural line, explicit column breaks as singleton groups
    fn paragraph_units(
        &self,
        paragraph: &Paragraph,
        processor: &ItemProcessor,
        breaker: &LineBreaker,
        factory: &LayoutFactory,
        column_width: f32,
    ) -> Units {
        let mut units = Vec::new();

        for (source_line, line) in paragraph.lines.iter().enumerate() {
            let measured = processor.process_items(&line.items);
            let mut stamped = false;

            for segment in measured.split_inclusive(MeasuredItem::is_column_break) {
                let (content, has_break) = match segment.split_last() {
                    Some((last, rest)) if last.is_column_break() => (rest, true),
                    _ => (segment, false),
                };

                let line_timestamps: &[f64] = if stamped { &[] } else { &line.timestamps };
                let rows = self.line_rows(content.to_vec(), line, breaker, factory, column_width, source_line, line_timestamps);
                if !rows.is_empty() {
                    stamped = true;
                    units.push(rows);
                }

                if has_break {
                    units.push(vec![factory.column_break(source_line)]);
                }
            }

            log::trace!("Line {}: {} items measured", source_line, measured.len());
        }

        units
    }

    /// Break a run of items into rows; structural text rows stack one item per row
    #[allow(clippy::too_many_arguments)]
    fn line_rows(
        &self,
        items: Vec<MeasuredItem>,
        line: &Line,
        breaker: &LineBreaker,
        factory: &LayoutFactory,
        column_width: f32,
        source_line: usize,
        line_timestamps: &[f64],
    ) -> Vec<LineLayout> {
        let has_pairs = items.iter().any(|item| item.pair().is_some());

        let rows = if has_pairs {
            breaker.break_line(items, column_width, source_line, line_timestamps)
        } else {
            items
                .into_iter()
                .filter(|item| matches!(item.item, Some(AtomicItem::Comment { .. } | AtomicItem::SectionLabel { .. })))
                .enumerate()
                .map(|(index, item)| {
                    let timestamps = if index == 0 { line_timestamps } else { &[] };
                    let mut row = factory.create_line_layout(vec![item], source_line, timestamps);
                    if row.total_width() > column_width {
                        log::warn!(
                            "Line {} text ({:.1}px) is wider than the {:.1}px column",
                            source_line,
                            row.total_width(),
                            column_width
                        );
                        row.overflow = true;
                    }
                    row
                })
                .collect()
        };

        if rows.len() > 1 {
            log::trace!("Line {} with {} items broke into {} rows", source_line, line.items.len(), rows.len());
        }

        rows.into_iter().filter(|row| row.line_type != LineType::Empty).collect()
    }

    /// Fit a paragraph's units into columns, advancing the cursor
    fn place_paragraph(&self, units: Units, cursor: &mut LayoutCursor) -> Units {
        let mut placed = Vec::with_capacity(units.len());
        let mut segment = Vec::new();

        for group in units {
            if is_break_group(&group) {
                self.place_segment(std::mem::take(&mut segment), cursor, &mut placed);
                cursor.advance_column(self.config);
                placed.push(group);
            } else {
                segment.push(group);
            }
        }
        self.place_segment(segment, cursor, &mut placed);

        placed
    }

    /// Fit one break-free segment, re-fitting the remainder after each split
    fn place_segment(&self, mut units: Units, cursor: &mut LayoutCursor, placed: &mut Units) {
        while !units.is_empty() {
            let space = ColumnSpace {
                cursor_y: cursor.y,
                column_top_y: cursor.column_top_y(self.config),
                column_bottom_y: self.config.column_bottom_y,
            };
            let chord_lyric_rows = chord_lyric_row_count(&units);

            let mut fitted = ParagraphSplitter::split_paragraph(units, space, chord_lyric_rows);
            let remainder = match fitted.iter().position(|group| is_break_group(group)) {
                Some(position) => fitted.split_off(position + 1),
                None => Vec::new(),
            };

            for group in &fitted {
                if cursor.advance_group(group, self.config) {
                    log::debug!("Starting page {}", cursor.page);
                }
            }
            placed.extend(fitted);
            units = remainder;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::FontSpec;
    use crate::layout::measurer::MonospaceMeasurer;
    use crate::models::{SectionType, SongItem};
    use crate::renderers::chord::BasicChordRenderer;

    fn config() -> LayoutConfig {
        let mut config = LayoutConfig {
            column_width: 200.0,
            chord_spacing: 1,
            line_padding: 0.0,
            chord_lyric_spacing: 0.0,
            min_y: 0.0,
            column_bottom_y: 100.0,
            paragraph_spacing: 10.0,
            ..LayoutConfig::default()
        };
        config.fonts.chord = FontSpec::new("Test", 8.0);
        config.fonts.lyrics = FontSpec::new("Test", 8.0);
        config.fonts.comment = FontSpec::new("Test", 8.0);
        config.fonts.section_label = FontSpec::new("Test", 8.0);
        config
    }

    fn verse(lines: usize) -> Paragraph {
        let lines = (0..lines)
            .map(|i| Line::new(vec![SongItem::pair("C", format!("line {}", i))]))
            .collect();
        Paragraph::new(SectionType::Verse, lines)
    }

    fn layout(song: &Song, config: &LayoutConfig) -> Vec<ParagraphLayoutResult> {
        let measurer = MonospaceMeasurer::fixed(8.0);
        let engine = LayoutEngine::new(song, config, &measurer, &BasicChordRenderer).unwrap();
        engine.compute_paragraph_layouts()
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let mut config = config();
        config.fonts.lyrics.size = 0.0;
        let song = Song::new(vec![verse(1)]);
        let measurer = MonospaceMeasurer::fixed(8.0);
        assert!(LayoutEngine::new(&song, &config, &measurer, &BasicChordRenderer).is_err());
    }

    #[test]
    fn test_spacing_after_all_but_last() {
        let song = Song::new(vec![verse(1), verse(1), verse(1)]);
        let results = layout(&song, &config());

        assert_eq!(results.len(), 3);
        assert!(results[0].add_spacing_after);
        assert!(results[1].add_spacing_after);
        assert!(!results[2].add_spacing_after);
        // chord row 8 + lyrics row 8, then 10 spacing
        assert_eq!(results[1].start_cursor.y, 26.0);
    }

    #[test]
    fn test_empty_paragraphs_are_skipped() {
        let empty = Paragraph::new(SectionType::None, vec![Line::new(vec![SongItem::tag("title", "x")])]);
        let song = Song::new(vec![verse(1), empty, verse(1)]);
        assert_eq!(layout(&song, &config()).len(), 2);
    }

    #[test]
    fn test_explicit_column_break_inside_paragraph() {
        let mut paragraph = verse(2);
        paragraph.lines.insert(1, Line::new(vec![SongItem::tag("column_break", "")]));
        let song = Song::new(vec![paragraph]);

        let results = layout(&song, &config());
        let units = &results[0].units;
        assert_eq!(units.len(), 3);
        assert!(is_break_group(&units[1]));
        assert_eq!(results[0].break_count(), 1);
    }

    #[test]
    fn test_oversized_paragraph_spans_columns() {
        // 20 rows of 16px in 100px columns
        let song = Song::new(vec![verse(20)]);
        let results = layout(&song, &config());
        let units = &results[0].units;

        let mut column_height = 0.0;
        for group in units {
            if is_break_group(group) {
                column_height = 0.0;
            } else {
                column_height += group.iter().map(|row| row.line_height).sum::<f32>();
                assert!(column_height <= 100.0);
            }
        }
        assert!(results[0].break_count() >= 3);
        let rows = units.iter().flatten().filter(|row| row.is_chord_lyrics()).count();
        assert_eq!(rows, 20);
    }

    #[test]
    fn test_comment_wider_than_column_is_flagged() {
        let comment = |text: &str| {
            Song::new(vec![Paragraph::new(SectionType::None, vec![Line::new(vec![SongItem::comment(text)])])])
        };

        let mut narrow = config();
        narrow.column_width = 6.0;
        let results = layout(&comment("W"), &narrow);
        let rows: Vec<&LineLayout> = results[0].rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line_type, LineType::Comment);
        assert!(rows[0].overflow);

        let results = layout(&comment("fits"), &config());
        assert!(!results[0].rows().any(|row| row.overflow));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let song = Song::new(vec![verse(4), verse(7), verse(2)]);
        let config = config();
        let measurer = MonospaceMeasurer::fixed(8.0);
        let engine = LayoutEngine::new(&song, &config, &measurer, &BasicChordRenderer).unwrap();
        assert_eq!(engine.compute_paragraph_layouts(), engine.compute_paragraph_layouts());
    }
}
