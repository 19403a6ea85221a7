//! Line breaking: one structural line → rows that fit the column
//!
//! Soft breaks (from commas or explicit soft line breaks) are preferred and
//! chosen to balance the two halves. Without soft breaks, rows are filled
//! greedily and a single item that is too wide on its own is word-wrapped.

use super::item_processor::ItemProcessor;
use super::items::{LineLayout, MeasuredItem};
use super::line_factory::LayoutFactory;
use super::lyrics::{capitalize_first, trim_trailing_comma};

/// Items of one row plus the unsplittable-overflow flag
type PendingRow = (Vec<MeasuredItem>, bool);

pub struct LineBreaker<'p, 'a> {
    processor: &'p ItemProcessor<'a>,
    factory: LayoutFactory<'p>,
}

impl<'p, 'a> LineBreaker<'p, 'a> {
    pub fn new(processor: &'p ItemProcessor<'a>) -> Self {
        Self {
            processor,
            factory: LayoutFactory::new(processor.config()),
        }
    }

    /// Break one structural line's measured items into rows
    ///
    /// Line-level timestamps go on the first row; item timestamps travel
    /// with their items.
    pub fn break_line(
        &self,
        items: Vec<MeasuredItem>,
        available_width: f32,
        source_line: usize,
        line_timestamps: &[f64],
    ) -> Vec<LineLayout> {
        let mut pending = Vec::new();
        self.break_items(merge_soft_breaks(items), available_width, &mut pending);

        pending
            .into_iter()
            .enumerate()
            .map(|(index, (items, overflow))| {
                let timestamps = if index == 0 { line_timestamps } else { &[] };
                let mut row = self.factory.create_line_layout(items, source_line, timestamps);
                row.overflow = overflow;
                row
            })
            .collect()
    }

    fn break_items(&self, items: Vec<MeasuredItem>, width: f32, rows: &mut Vec<PendingRow>) {
        if items.is_empty() {
            return;
        }

        let total: f32 = items.iter().map(|item| item.width).sum();
        if total <= width {
            rows.push((items, false));
            return;
        }

        if let Some(index) = balanced_soft_break(&items, total) {
            let mut left = items;
            let mut right = left.split_off(index + 1);
            left.pop();

            self.trim_last_comma(&mut left);
            self.capitalize_first_lyric(&mut right);

            self.break_items(left, width, rows);
            self.break_items(right, width, rows);
            return;
        }

        let break_index = first_overflow(&items, width);
        let leading_width: f32 = items[..break_index].iter().map(|item| item.width).sum();

        if leading_width > 0.0 {
            let mut head = items;
            let rest = head.split_off(break_index);
            self.trim_last_comma(&mut head);
            rows.push((head, false));
            self.break_items(rest, width, rows);
            return;
        }

        // The overflowing item starts the row on its own
        let mut items = items;
        match self.processor.split_measured_item(&items[break_index], width) {
            Some((head, tail)) => {
                items[break_index] = head;
                items.insert(break_index + 1, tail);
                self.break_items(items, width, rows);
            }
            None => {
                let rest = items.split_off(break_index + 1);
                log::warn!(
                    "Item {:?} ({:.1}px) is wider than the {:.1}px column and cannot be split",
                    items[break_index].item,
                    items[break_index].width,
                    width
                );
                rows.push((items, true));
                self.break_items(rest, width, rows);
            }
        }
    }

    /// Drop the trailing comma of the last lyric before a break
    fn trim_last_comma(&self, items: &mut [MeasuredItem]) {
        let Some(item) = items.iter_mut().rev().find(|item| item.pair().is_some()) else {
            return;
        };
        let Some(pair) = item.pair() else {
            return;
        };

        let trimmed = trim_trailing_comma(&pair.lyrics);
        if trimmed != pair.lyrics {
            let mut edited = pair.clone();
            edited.lyrics = trimmed;
            *item = self.processor.remeasure_pair(edited);
        }
    }

    /// Uppercase the first lyric letter after a break
    fn capitalize_first_lyric(&self, items: &mut [MeasuredItem]) {
        let Some(item) = items.iter_mut().find(|item| !item.lyrics().trim().is_empty()) else {
            return;
        };
        let Some(pair) = item.pair() else {
            return;
        };

        let capitalized = capitalize_first(&pair.lyrics);
        if capitalized != pair.lyrics {
            let mut edited = pair.clone();
            edited.lyrics = capitalized;
            *item = self.processor.remeasure_pair(edited);
        }
    }
}

/// Collapse runs of soft breaks into one
pub fn merge_soft_breaks(items: Vec<MeasuredItem>) -> Vec<MeasuredItem> {
    let mut merged: Vec<MeasuredItem> = Vec::with_capacity(items.len());
    for item in items {
        let repeated = item.is_soft_break() && merged.last().is_some_and(MeasuredItem::is_soft_break);
        if !repeated {
            merged.push(item);
        }
    }
    merged
}

/// Soft break whose preceding width is closest to half the total
///
/// The first break wins an exact tie.
pub fn balanced_soft_break(items: &[MeasuredItem], total_width: f32) -> Option<usize> {
    let target = total_width / 2.0;
    let mut best: Option<(usize, f32)> = None;
    let mut cumulative = 0.0;

    for (index, item) in items.iter().enumerate() {
        if item.is_soft_break() {
            let distance = (cumulative - target).abs();
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((index, distance));
            }
        }
        cumulative += item.width;
    }

    best.map(|(index, _)| index)
}

/// Index of the first item that no longer fits
fn first_overflow(items: &[MeasuredItem], width: f32) -> usize {
    let mut cumulative = 0.0;
    for (index, item) in items.iter().enumerate() {
        cumulative += item.width;
        if cumulative > width {
            return index;
        }
    }
    items.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::{FontSpec, LayoutConfig};
    use crate::layout::items::AtomicItem;
    use crate::layout::measurer::MonospaceMeasurer;
    use crate::models::{ChordLyricsPair, SongItem};
    use crate::renderers::chord::{BasicChordRenderer, ChordContext};

    fn config() -> LayoutConfig {
        let mut config = LayoutConfig {
            chord_spacing: 1,
            ..LayoutConfig::default()
        };
        config.fonts.chord = FontSpec::new("Test", 8.0);
        config.fonts.lyrics = FontSpec::new("Test", 8.0);
        config
    }

    fn lyric(text: &str) -> MeasuredItem {
        MeasuredItem::new(
            AtomicItem::ChordLyricsPair(ChordLyricsPair::new("", text)),
            text.chars().count() as f32 * 8.0,
        )
    }

    fn break_line(items: &[SongItem], width: f32) -> Vec<LineLayout> {
        let config = config();
        let measurer = MonospaceMeasurer::fixed(8.0);
        let processor = ItemProcessor::new(&config, &measurer, &BasicChordRenderer, ChordContext::default());
        let measured = processor.process_items(items);
        LineBreaker::new(&processor).break_line(measured, width, 0, &[])
    }

    #[test]
    fn test_merge_soft_breaks() {
        let merged = merge_soft_breaks(vec![
            lyric("a"),
            MeasuredItem::soft_break(),
            MeasuredItem::soft_break(),
            lyric("b"),
            MeasuredItem::soft_break(),
        ]);
        assert_eq!(merged.len(), 4);
        assert!(merged[1].is_soft_break());
        assert!(!merged[2].is_soft_break());
    }

    #[test]
    fn test_balanced_break_prefers_middle() {
        // Breaks after 10, 60 and 90 of 100: 60 is closest to 50
        let mut items = Vec::new();
        for width in [10.0, 50.0, 30.0, 10.0] {
            items.push(MeasuredItem::new(AtomicItem::ChordLyricsPair(ChordLyricsPair::new("", "x")), width));
            items.push(MeasuredItem::soft_break());
        }
        items.pop();
        assert_eq!(balanced_soft_break(&items, 100.0), Some(3));
        assert_eq!(balanced_soft_break(&[lyric("abc")], 24.0), None);
    }

    #[test]
    fn test_balanced_break_tie_goes_to_first() {
        let items = vec![
            MeasuredItem::new(AtomicItem::ChordLyricsPair(ChordLyricsPair::new("", "x")), 40.0),
            MeasuredItem::soft_break(),
            MeasuredItem::new(AtomicItem::ChordLyricsPair(ChordLyricsPair::new("", "x")), 20.0),
            MeasuredItem::soft_break(),
            MeasuredItem::new(AtomicItem::ChordLyricsPair(ChordLyricsPair::new("", "x")), 40.0),
        ];
        // Cumulative 40 and 60 are both 10 away from 50
        assert_eq!(balanced_soft_break(&items, 100.0), Some(1));
    }

    #[test]
    fn test_line_that_fits_is_one_row() {
        let rows = break_line(&[SongItem::pair("C", "short line")], 200.0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].lyrics_text(), "short line");
        assert!(!rows[0].overflow);
    }

    #[test]
    fn test_soft_break_trims_comma_and_capitalizes() {
        let rows = break_line(&[SongItem::pair("G", "I was walking, she was talking")], 160.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].lyrics_text(), "I was walking");
        assert_eq!(rows[1].lyrics_text(), "She was talking");
        assert_eq!(rows[0].items[0].chord_text(), "G");
        assert_eq!(rows[0].total_width(), 104.0);
    }

    #[test]
    fn test_greedy_break_without_soft_breaks() {
        let rows = break_line(
            &[
                SongItem::pair("C", "one "),
                SongItem::pair("D", "two "),
                SongItem::pair("E", "three "),
                SongItem::pair("F", "four"),
            ],
            80.0,
        );
        let texts: Vec<String> = rows.iter().map(LineLayout::lyrics_text).collect();
        assert_eq!(texts, vec!["one two ", "three four"]);
        assert!(rows.iter().all(|row| row.total_width() <= 80.0));
    }

    #[test]
    fn test_greedy_break_trims_comma_at_row_end() {
        let measured = vec![lyric("stay,"), lyric("go")];
        let config = config();
        let measurer = MonospaceMeasurer::fixed(8.0);
        let processor = ItemProcessor::new(&config, &measurer, &BasicChordRenderer, ChordContext::default());

        let rows = LineBreaker::new(&processor).break_line(measured, 50.0, 0, &[]);
        assert_eq!(rows[0].lyrics_text(), "stay");
        assert_eq!(rows[0].total_width(), 32.0);
        assert_eq!(rows[1].lyrics_text(), "go");
    }

    #[test]
    fn test_overlong_word_is_split_without_losing_characters() {
        let rows = break_line(&[SongItem::pair("A", "Supercalifragilistic")], 100.0);
        assert!(rows.len() >= 2);
        assert!(rows.iter().all(|row| row.total_width() <= 100.0));
        let text: String = rows.iter().map(LineLayout::lyrics_text).collect();
        assert_eq!(text, "Supercalifragilistic");
        assert_eq!(rows[0].items[0].chord_text(), "A");
        assert_eq!(rows[1].items[0].chord_text(), "");
    }

    #[test]
    fn test_unsplittable_item_is_flagged_not_dropped() {
        let rows = break_line(&[SongItem::pair("Cmaj7sus4add9", "la"), SongItem::pair("", " la")], 40.0);
        assert_eq!(rows[0].lyrics_text(), "la");
        assert!(rows[0].overflow);
        assert!(rows[0].total_width() > 40.0);
        assert_eq!(rows[1].lyrics_text(), " la");
        assert!(!rows[1].overflow);
    }

    #[test]
    fn test_line_timestamps_only_on_first_row() {
        let config = config();
        let measurer = MonospaceMeasurer::fixed(8.0);
        let processor = ItemProcessor::new(&config, &measurer, &BasicChordRenderer, ChordContext::default());
        let measured = processor.process_items(&[SongItem::pair("", "first, second")]);

        let rows = LineBreaker::new(&processor).break_line(measured, 60.0, 4, &[12.0]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamps, vec![12.0]);
        assert!(rows[1].timestamps.is_empty());
        assert!(rows.iter().all(|row| row.source_line == 4));
    }
}
