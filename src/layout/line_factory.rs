//! Row assembly: measured items → classified, height-computed LineLayout

use super::config::LayoutConfig;
use super::items::{merge_timestamps, AtomicItem, LineLayout, LineType, MeasuredItem};

/// Builds rows with the configured vertical metrics
pub struct LayoutFactory<'a> {
    config: &'a LayoutConfig,
}

impl<'a> LayoutFactory<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Classify, size and stamp one row
    pub fn create_line_layout(
        &self,
        items: Vec<MeasuredItem>,
        source_line: usize,
        line_timestamps: &[f64],
    ) -> LineLayout {
        let line_type = classify(&items);
        let line_height = self.line_height(line_type, &items);

        let mut timestamps = Vec::new();
        merge_timestamps(&mut timestamps, line_timestamps);
        for item in &items {
            if let Some(pair) = item.pair() {
                merge_timestamps(&mut timestamps, &pair.timestamps);
            }
        }

        LineLayout {
            line_type,
            items,
            line_height,
            source_line,
            timestamps,
            overflow: false,
        }
    }

    /// The only valid column-break row
    pub fn column_break(&self, source_line: usize) -> LineLayout {
        LineLayout::column_break(source_line)
    }

    fn line_height(&self, line_type: LineType, items: &[MeasuredItem]) -> f32 {
        let config = self.config;
        let fonts = &config.fonts;

        match line_type {
            LineType::ChordLyricsPair => {
                let has_chords = items.iter().any(|item| !item.chord_text().is_empty());
                let has_lyrics = items.iter().any(|item| !item.lyrics().is_empty());
                let chord_height = items
                    .iter()
                    .filter_map(|item| item.chord_height)
                    .fold(None, |tallest: Option<f32>, h| Some(tallest.map_or(h, |t| t.max(h))))
                    .unwrap_or(fonts.chord.size)
                    * fonts.chord.line_height.unwrap_or(1.0);

                match (has_chords, has_lyrics) {
                    (true, true) => {
                        config.line_padding + chord_height + config.chord_lyric_spacing + fonts.lyrics.line_box()
                    }
                    (true, false) => config.line_padding + chord_height,
                    (false, _) => config.line_padding + fonts.lyrics.line_box(),
                }
            }
            LineType::Comment => config.line_padding + fonts.comment.line_box(),
            LineType::SectionLabel => config.line_padding + fonts.section_label.line_box(),
            LineType::Tag | LineType::Empty => 0.0,
        }
    }
}

fn classify(items: &[MeasuredItem]) -> LineType {
    let has_pair_content = items
        .iter()
        .any(|item| !item.chord_text().is_empty() || !item.lyrics().is_empty());
    let has = |pred: fn(&AtomicItem) -> bool| items.iter().filter_map(|item| item.item.as_ref()).any(pred);

    if has_pair_content {
        LineType::ChordLyricsPair
    } else if has(|item| matches!(item, AtomicItem::Comment { .. })) {
        LineType::Comment
    } else if has(|item| matches!(item, AtomicItem::SectionLabel { .. })) {
        LineType::SectionLabel
    } else if has(|item| matches!(item, AtomicItem::ColumnBreakMarker)) {
        LineType::Tag
    } else {
        LineType::Empty
    }
}
