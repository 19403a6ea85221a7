//! Text measurement
//!
//! The layout engine never looks at glyphs; everything it knows about text
//! geometry comes through `TextMeasurer`. Implementations must be pure for a
//! given (text, font) pair so repeated passes produce identical layouts.

use std::cell::RefCell;
use std::collections::HashMap;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::config::{FontSpec, FontStyle};

/// Measures and wraps text under a font
pub trait TextMeasurer {
    /// Advance width of `text` in pixels
    fn measure_width(&self, text: &str, font: &FontSpec) -> f32;

    /// Height of one line of `text` in pixels
    fn measure_height(&self, text: &str, font: &FontSpec) -> f32 {
        if text.is_empty() {
            0.0
        } else {
            font.size
        }
    }

    /// Wrap `text` into lines no wider than `max_width`
    ///
    /// Words are kept whole unless a single word alone is wider than
    /// `max_width`; such a word is split between characters.
    fn wrap_to_width(&self, text: &str, max_width: f32, font: &FontSpec) -> Vec<String> {
        wrap_words(self, text, max_width, font)
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f32 {
        (**self).measure_width(text, font)
    }

    fn measure_height(&self, text: &str, font: &FontSpec) -> f32 {
        (**self).measure_height(text, font)
    }

    fn wrap_to_width(&self, text: &str, max_width: f32, font: &FontSpec) -> Vec<String> {
        (**self).wrap_to_width(text, max_width, font)
    }
}

/// Greedy word wrap on top of `measure_width`
pub fn wrap_words<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    max_width: f32,
    font: &FontSpec,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if measurer.measure_width(&candidate, font) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if measurer.measure_width(word, font) <= max_width {
            current = word.to_string();
        } else {
            let mut pieces = split_characters(measurer, word, max_width, font);
            // The tail of a split word may still share its line with the next word
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Split one word into pieces that fit, at least one character each
fn split_characters<M: TextMeasurer + ?Sized>(
    measurer: &M,
    word: &str,
    max_width: f32,
    font: &FontSpec,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();

    for ch in word.chars() {
        piece.push(ch);
        if piece.chars().count() > 1 && measurer.measure_width(&piece, font) > max_width {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }

    if !piece.is_empty() {
        pieces.push(piece);
    }

    pieces
}

/// Advance used by `MonospaceMeasurer` for one display column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// Fraction of the font size
    Em(f32),
    /// Fixed pixels regardless of font size
    Px(f32),
}

/// Fixed-pitch measurer based on Unicode display width
///
/// Wide (east asian) characters count as two columns, combining marks as none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    advance: Advance,
}

impl MonospaceMeasurer {
    /// Column advance as a fraction of the font size
    pub fn new(advance_em: f32) -> Self {
        Self {
            advance: Advance::Em(advance_em),
        }
    }

    /// Column advance in pixels for every font
    pub fn fixed(px_per_column: f32) -> Self {
        Self {
            advance: Advance::Px(px_per_column),
        }
    }

    fn column_advance(&self, font: &FontSpec) -> f32 {
        match self.advance {
            Advance::Em(em) => em * font.size,
            Advance::Px(px) => px,
        }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f32 {
        text.width() as f32 * self.column_advance(font)
    }
}

/// Proportional width estimate from per-glyph em classes
///
/// Useful where no real font metrics are available (e.g. headless hosts).
/// Estimates are stable across sizes and families rather than exact.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeuristicMeasurer;

impl HeuristicMeasurer {
    fn glyph_em(ch: char) -> f32 {
        match ch {
            ' ' | '\u{00A0}' => 0.28,
            '\t' => 1.12,
            'i' | 'l' | 'j' | 'I' | '|' | '!' => 0.24,
            '.' | ',' | ':' | ';' | '\'' | '"' | '`' => 0.26,
            '-' | '\u{2010}' | '\u{2013}' => 0.33,
            '\u{2014}' => 0.9,
            '(' | ')' | '[' | ']' | '{' | '}' => 0.32,
            'f' | 't' | 'r' => 0.33,
            '\u{266F}' | '\u{266D}' | '\u{266E}' => 0.5,
            'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.8,
            c if c.is_ascii_digit() => 0.55,
            c if c.is_ascii_uppercase() => 0.66,
            c if c.is_ascii_lowercase() => 0.53,
            c if c.is_whitespace() => 0.28,
            c if c.is_ascii_punctuation() => 0.45,
            c => 0.56 * c.width().unwrap_or(1).max(1) as f32,
        }
    }

    fn family_scale(font: &FontSpec) -> f32 {
        let family = font.family.to_ascii_lowercase();
        let mut scale = if family.contains("mono") || family.contains("courier") {
            1.08
        } else if family.contains("serif") && !family.contains("sans") {
            1.02
        } else {
            1.0
        };
        if font.weight >= 600 {
            scale += 0.04;
        }
        if font.style == FontStyle::Italic {
            scale -= 0.01;
        }
        scale
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f32 {
        let ems: f32 = text.chars().map(Self::glyph_em).sum();
        ems * font.size * Self::family_scale(font)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FontKey {
    family: String,
    size_bits: u32,
    weight: u16,
    style: FontStyle,
}

impl From<&FontSpec> for FontKey {
    fn from(font: &FontSpec) -> Self {
        Self {
            family: font.family.clone(),
            size_bits: font.size.to_bits(),
            weight: font.weight,
            style: font.style,
        }
    }
}

/// Memoizing wrapper around another measurer
///
/// Widths are pure per (text, font), so the cache is never invalidated.
/// Not `Sync`: each layout pass on another thread needs its own instance.
#[derive(Debug, Default)]
pub struct CachedMeasurer<M> {
    inner: M,
    widths: RefCell<HashMap<(String, FontKey), f32>>,
}

impl<M: TextMeasurer> CachedMeasurer<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            widths: RefCell::new(HashMap::new()),
        }
    }

    /// Number of distinct (text, font) pairs measured so far
    pub fn cached_entries(&self) -> usize {
        self.widths.borrow().len()
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: TextMeasurer> TextMeasurer for CachedMeasurer<M> {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f32 {
        let key = (text.to_string(), FontKey::from(font));
        if let Some(width) = self.widths.borrow().get(&key) {
            return *width;
        }

        let width = self.inner.measure_width(text, font);
        self.widths.borrow_mut().insert(key, width);
        width
    }

    fn measure_height(&self, text: &str, font: &FontSpec) -> f32 {
        self.inner.measure_height(text, font)
    }
}
