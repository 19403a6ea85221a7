//! Chord symbol rendering seam
//!
//! Transposition and chord normalization belong to the music theory layer.
//! The layout engine only needs the final chord string, so it talks to that
//! layer through `ChordRenderer`. `BasicChordRenderer` covers the purely
//! typographic part (unicode accidentals) and passes everything else through.

use serde::{Deserialize, Serialize};

const SHARP: char = '\u{266F}';
const FLAT: char = '\u{266D}';

/// Song-level information a chord renderer may need
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ChordContext {
    pub key: Option<String>,
    pub capo: Option<i32>,
}

/// Flags forwarded from the layout configuration
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChordRenderOptions {
    pub use_unicode_modifier: bool,
    pub normalize_chords: bool,
    pub decapo: bool,
}

/// Turns a raw chord symbol into display text; must be pure
pub trait ChordRenderer {
    fn render_chord(&self, raw: &str, context: &ChordContext, options: &ChordRenderOptions) -> String;
}

impl<F> ChordRenderer for F
where
    F: Fn(&str, &ChordContext, &ChordRenderOptions) -> String,
{
    fn render_chord(&self, raw: &str, context: &ChordContext, options: &ChordRenderOptions) -> String {
        self(raw, context, options)
    }
}

/// Passes chords through, optionally swapping `#`/`b` for ♯/♭
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicChordRenderer;

impl ChordRenderer for BasicChordRenderer {
    fn render_chord(&self, raw: &str, _context: &ChordContext, options: &ChordRenderOptions) -> String {
        let chord = raw.trim();
        if options.use_unicode_modifier {
            with_unicode_accidentals(chord)
        } else {
            chord.to_string()
        }
    }
}

/// `#` is always a sharp; `b` is a flat after a note letter or before a degree
fn with_unicode_accidentals(chord: &str) -> String {
    let chars: Vec<char> = chord.chars().collect();

    chars
        .iter()
        .enumerate()
        .map(|(i, &ch)| match ch {
            '#' => SHARP,
            'b' => {
                let after_note = i > 0 && matches!(chars[i - 1], 'A'..='G');
                let before_degree = chars.get(i + 1).is_some_and(|next| next.is_ascii_digit());
                if after_note || before_degree {
                    FLAT
                } else {
                    ch
                }
            }
            _ => ch,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unicode() -> ChordRenderOptions {
        ChordRenderOptions {
            use_unicode_modifier: true,
            ..ChordRenderOptions::default()
        }
    }

    #[test]
    fn test_passthrough_without_modifiers() {
        let rendered = BasicChordRenderer.render_chord(" Bb7 ", &ChordContext::default(), &ChordRenderOptions::default());
        assert_eq!(rendered, "Bb7");
    }

    #[test]
    fn test_unicode_accidentals() {
        let context = ChordContext::default();
        assert_eq!(BasicChordRenderer.render_chord("F#m", &context, &unicode()), "F♯m");
        assert_eq!(BasicChordRenderer.render_chord("Ebmaj7", &context, &unicode()), "E♭maj7");
        assert_eq!(BasicChordRenderer.render_chord("C/Bb", &context, &unicode()), "C/B♭");
        assert_eq!(BasicChordRenderer.render_chord("C7b9", &context, &unicode()), "C7♭9");
        assert_eq!(BasicChordRenderer.render_chord("Cdim", &context, &unicode()), "Cdim");
    }

    #[test]
    fn test_closures_are_renderers() {
        let upper = |raw: &str, _: &ChordContext, _: &ChordRenderOptions| raw.to_uppercase();
        assert_eq!(upper.render_chord("am", &ChordContext::default(), &unicode()), "AM");
    }
}
