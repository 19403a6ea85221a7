//! Item processing: song AST items → measured atomic items
//!
//! One structural line at a time, this module renders chords, applies the
//! lyrics-only transforms, splits comma-joined phrases into breakable pieces
//! and measures everything with the configured fonts.

use super::config::{FontSpec, LayoutConfig};
use super::items::{AtomicItem, MeasuredItem};
use super::lyrics::{remove_hyphens, split_on_commas};
use super::measurer::TextMeasurer;
use crate::models::{ChordLyricsPair, SongItem, Tag, TagKind};
use crate::renderers::chord::{ChordContext, ChordRenderOptions, ChordRenderer};

/// Measures the items of structural lines
pub struct ItemProcessor<'a> {
    config: &'a LayoutConfig,
    measurer: &'a dyn TextMeasurer,
    chord_renderer: &'a dyn ChordRenderer,
    context: ChordContext,
    options: ChordRenderOptions,
}

impl<'a> ItemProcessor<'a> {
    pub fn new(
        config: &'a LayoutConfig,
        measurer: &'a dyn TextMeasurer,
        chord_renderer: &'a dyn ChordRenderer,
        context: ChordContext,
    ) -> Self {
        let options = ChordRenderOptions {
            use_unicode_modifier: config.use_unicode_modifiers,
            normalize_chords: config.normalize_chords,
            decapo: config.decapo,
        };

        Self {
            config,
            measurer,
            chord_renderer,
            context,
            options,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        self.config
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer
    }

    fn lyrics_only(&self) -> bool {
        self.config.display_lyrics_only
    }

    /// Measure all items of one structural line
    pub fn process_items(&self, items: &[SongItem]) -> Vec<MeasuredItem> {
        let mut measured = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            match item {
                SongItem::ChordLyricsPair(pair) => {
                    let next_has_chord = items.get(index + 1).is_some_and(SongItem::carries_chord);
                    self.process_pair(pair, next_has_chord, &mut measured);
                }
                SongItem::Tag(tag) => self.process_tag(tag, &mut measured),
                SongItem::Comment { text } => self.push_wrapped_comment(text, &mut measured),
                SongItem::SoftLineBreak => measured.push(MeasuredItem::soft_break()),
            }
        }

        measured
    }

    fn process_pair(&self, pair: &ChordLyricsPair, next_has_chord: bool, out: &mut Vec<MeasuredItem>) {
        let chord_row = self.chord_row_text(pair);
        let lyrics = if self.lyrics_only() {
            remove_hyphens(&pair.lyrics)
        } else {
            pair.lyrics.clone()
        };

        let mut fragments = split_on_commas(&lyrics);
        if fragments.is_empty() {
            fragments.push("");
        }
        let last = fragments.len() - 1;

        for (index, fragment) in fragments.into_iter().enumerate() {
            if index > 0 {
                out.push(MeasuredItem::soft_break());
            }

            if self.lyrics_only() && fragment.is_empty() {
                out.push(MeasuredItem::placeholder());
                continue;
            }

            let mut piece = ChordLyricsPair::new("", fragment);
            if index == 0 {
                piece.timestamps = pair.timestamps.clone();
            }
            let chord_text = if index == 0 { chord_row.as_str() } else { "" };

            let is_annotation = pair.annotation.as_deref().is_some_and(|a| !a.is_empty());
            out.push(self.measure_pair(piece, chord_text, is_annotation, index == last && next_has_chord));
        }
    }

    /// Annotation, else rendered chord; nothing in lyrics-only mode
    fn chord_row_text(&self, pair: &ChordLyricsPair) -> String {
        if self.lyrics_only() {
            return String::new();
        }
        if let Some(annotation) = pair.annotation.as_deref().filter(|a| !a.is_empty()) {
            return annotation.to_string();
        }
        if pair.chords.trim().is_empty() {
            return String::new();
        }
        self.chord_renderer
            .render_chord(&pair.chords, &self.context, &self.options)
    }

    fn measure_pair(
        &self,
        mut pair: ChordLyricsPair,
        chord_text: &str,
        is_annotation: bool,
        next_has_chord: bool,
    ) -> MeasuredItem {
        let fonts = &self.config.fonts;
        let mut chord_text = chord_text.to_string();
        let mut chord_width = self.measurer.measure_width(&chord_text, &fonts.chord);
        let lyrics_width = self.measurer.measure_width(&pair.lyrics, &fonts.lyrics);

        if !self.lyrics_only() && !chord_text.is_empty() && next_has_chord {
            let space_width = self.measurer.measure_width(" ", &fonts.lyrics);
            if chord_width >= lyrics_width - space_width {
                chord_text.push_str(&" ".repeat(self.config.chord_spacing));
                chord_width = self.measurer.measure_width(&chord_text, &fonts.chord);
            }
        }

        let chord_height = if chord_text.is_empty() {
            None
        } else {
            Some(self.measurer.measure_height(&chord_text, &fonts.chord))
        };

        if is_annotation && !chord_text.is_empty() {
            pair.annotation = Some(chord_text);
        } else {
            pair.chords = chord_text;
        }

        MeasuredItem {
            item: Some(AtomicItem::ChordLyricsPair(pair)),
            width: chord_width.max(lyrics_width).max(0.0),
            chord_height,
        }
    }

    fn process_tag(&self, tag: &Tag, out: &mut Vec<MeasuredItem>) {
        match tag.kind() {
            TagKind::Comment => self.push_wrapped_comment(&tag.value, out),
            TagKind::SectionStart if !tag.value.trim().is_empty() => {
                let font = &self.config.fonts.section_label;
                for line in self.measurer.wrap_to_width(tag.value.trim(), self.config.resolved_column_width(), font) {
                    let width = self.measurer.measure_width(&line, font);
                    out.push(MeasuredItem::new(AtomicItem::SectionLabel { text: line }, width));
                }
            }
            TagKind::ColumnBreak => out.push(MeasuredItem::column_break()),
            TagKind::SectionStart | TagKind::SectionEnd | TagKind::Other => {
                log::trace!("Tag {{{}}} renders nothing in the body", tag.name);
            }
        }
    }

    fn push_wrapped_comment(&self, text: &str, out: &mut Vec<MeasuredItem>) {
        let font = &self.config.fonts.comment;
        for line in self.measurer.wrap_to_width(text.trim(), self.config.resolved_column_width(), font) {
            let width = self.measurer.measure_width(&line, font);
            out.push(MeasuredItem::new(AtomicItem::Comment { text: line }, width));
        }
    }

    /// Measure a freshly edited copy of a pair
    ///
    /// The chord row text is taken as-is (already rendered and spaced).
    pub fn remeasure_pair(&self, pair: ChordLyricsPair) -> MeasuredItem {
        let fonts = &self.config.fonts;
        let chord_text = pair.annotation.as_deref().unwrap_or(pair.chords.as_str());
        let chord_width = self.measurer.measure_width(chord_text, &fonts.chord);
        let chord_height = if chord_text.is_empty() {
            None
        } else {
            Some(self.measurer.measure_height(chord_text, &fonts.chord))
        };
        let lyrics_width = self.measurer.measure_width(&pair.lyrics, &fonts.lyrics);

        MeasuredItem {
            item: Some(AtomicItem::ChordLyricsPair(pair)),
            width: chord_width.max(lyrics_width).max(0.0),
            chord_height,
        }
    }

    /// Split one too-wide item at the measurer's first wrap point
    ///
    /// Returns the leading fragment (keeping the chord) and the chordless
    /// remainder, or `None` when the item cannot be made narrower.
    pub fn split_measured_item(&self, item: &MeasuredItem, max_width: f32) -> Option<(MeasuredItem, MeasuredItem)> {
        let fonts = &self.config.fonts;

        match item.item.as_ref()? {
            AtomicItem::ChordLyricsPair(pair) => {
                let (head, tail) = self.split_text(&pair.lyrics, max_width, &fonts.lyrics)?;

                let mut first = pair.clone();
                first.lyrics = head;
                let rest = ChordLyricsPair::new("", tail);

                Some((self.remeasure_pair(first), self.remeasure_pair(rest)))
            }
            AtomicItem::Comment { text } => {
                let (head, tail) = self.split_text(text, max_width, &fonts.comment)?;
                Some((
                    MeasuredItem::new(AtomicItem::Comment { text: head.clone() }, self.measurer.measure_width(&head, &fonts.comment)),
                    MeasuredItem::new(AtomicItem::Comment { text: tail.clone() }, self.measurer.measure_width(&tail, &fonts.comment)),
                ))
            }
            AtomicItem::SectionLabel { text } => {
                let font = &fonts.section_label;
                let (head, tail) = self.split_text(text, max_width, font)?;
                Some((
                    MeasuredItem::new(AtomicItem::SectionLabel { text: head.clone() }, self.measurer.measure_width(&head, font)),
                    MeasuredItem::new(AtomicItem::SectionLabel { text: tail.clone() }, self.measurer.measure_width(&tail, font)),
                ))
            }
            AtomicItem::SoftBreak | AtomicItem::ColumnBreakMarker => None,
        }
    }

    /// Cut `text` where the measurer's first wrapped line ends
    ///
    /// The head is an exact prefix of `text` and leading whitespace counts
    /// toward its width; only whitespace at the cut is dropped from the tail.
    fn split_text(&self, text: &str, max_width: f32, font: &FontSpec) -> Option<(String, String)> {
        let body = text.trim_start();
        let lead = &text[..text.len() - body.len()];
        if body.is_empty() {
            return None;
        }

        let budget = max_width - self.measurer.measure_width(lead, font);
        if budget <= 0.0 {
            // Leading whitespace alone fills the row
            return (!lead.is_empty()).then(|| (lead.to_string(), body.to_string()));
        }

        let wrapped = self.measurer.wrap_to_width(body, budget, font);
        if wrapped.len() < 2 {
            return None;
        }

        let head_glyphs = wrapped[0].chars().filter(|ch| !ch.is_whitespace()).count();
        let mut seen = 0;
        let mut cut = body.len();
        for (index, ch) in body.char_indices() {
            if ch.is_whitespace() {
                continue;
            }
            seen += 1;
            if seen == head_glyphs {
                cut = index + ch.len_utf8();
                break;
            }
        }

        let tail = body[cut..].trim_start();
        if cut == 0 || tail.is_empty() {
            return None;
        }
        Some((format!("{}{}", lead, &body[..cut]), tail.to_string()))
    }
}
