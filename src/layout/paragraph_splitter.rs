//! Column splitting for paragraphs that overflow the current column
//!
//! How a paragraph may be cut depends on how many chord/lyric rows it has:
//! short paragraphs move as a whole, four-row paragraphs split in the middle,
//! and longer ones split as late as possible while keeping at least two
//! chord/lyric rows on each side of the break.

use serde::{Deserialize, Serialize};

use super::items::LineLayout;

/// Rows added together in f32 may miss an exact fit by rounding noise
const FIT_TOLERANCE: f32 = 0.001;

/// Fewest chord/lyric rows allowed on either side of a mid-paragraph split
const MIN_ROWS_PER_SIDE: usize = 2;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Never split; break before the paragraph
    Atomic,
    /// Split after the second chord/lyric row
    AfterSecondRow,
    /// Split at the latest boundary that fits and keeps both sides balanced
    LatestFitting,
}

impl SplitStrategy {
    pub fn for_chord_lyric_rows(count: usize) -> Self {
        match count {
            0..=3 => SplitStrategy::Atomic,
            4 => SplitStrategy::AfterSecondRow,
            _ => SplitStrategy::LatestFitting,
        }
    }
}

/// What to do with a paragraph at the current cursor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitDecision {
    /// Lay the paragraph out unchanged
    Keep,
    /// Break before the paragraph
    MoveToNextColumn,
    /// Break after the row at this flattened index
    SplitAfter(usize),
}

/// Vertical situation the paragraph is being placed into
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSpace {
    pub cursor_y: f32,
    pub column_top_y: f32,
    pub column_bottom_y: f32,
}

impl ColumnSpace {
    fn fits(&self, height: f32) -> bool {
        self.cursor_y + height <= self.column_bottom_y + FIT_TOLERANCE
    }

    fn at_top(&self) -> bool {
        self.cursor_y <= self.column_top_y
    }
}

pub struct ParagraphSplitter;

impl ParagraphSplitter {
    pub fn decide(units: &[Vec<LineLayout>], space: ColumnSpace, chord_lyric_rows: usize) -> SplitDecision {
        let rows: Vec<&LineLayout> = units.iter().flatten().collect();
        let total: f32 = rows.iter().map(|row| row.line_height).sum();

        if space.fits(total) {
            return SplitDecision::Keep;
        }

        let fallback = if space.at_top() {
            SplitDecision::Keep
        } else {
            SplitDecision::MoveToNextColumn
        };

        match SplitStrategy::for_chord_lyric_rows(chord_lyric_rows) {
            SplitStrategy::Atomic => fallback,
            SplitStrategy::AfterSecondRow => {
                let Some(index) = nth_chord_lyric_row(&rows, MIN_ROWS_PER_SIDE) else {
                    return fallback;
                };
                if space.fits(height_through(&rows, index)) {
                    SplitDecision::SplitAfter(index)
                } else {
                    fallback
                }
            }
            SplitStrategy::LatestFitting => {
                let mut best = None;
                let mut before = 0;
                let mut height = 0.0;

                for (index, row) in rows.iter().enumerate().take(rows.len().saturating_sub(1)) {
                    height += row.line_height;
                    if row.is_chord_lyrics() {
                        before += 1;
                    }
                    let after = chord_lyric_rows.saturating_sub(before);
                    if before >= MIN_ROWS_PER_SIDE && after >= MIN_ROWS_PER_SIDE && space.fits(height) {
                        best = Some(index);
                    }
                }

                best.map_or(fallback, SplitDecision::SplitAfter)
            }
        }
    }

    /// Apply the decision, inserting at most one column break
    pub fn split_paragraph(
        units: Vec<Vec<LineLayout>>,
        space: ColumnSpace,
        chord_lyric_rows: usize,
    ) -> Vec<Vec<LineLayout>> {
        match Self::decide(&units, space, chord_lyric_rows) {
            SplitDecision::Keep => units,
            SplitDecision::MoveToNextColumn => {
                let source_line = first_source_line(&units);
                let mut out = Vec::with_capacity(units.len() + 1);
                out.push(vec![LineLayout::column_break(source_line)]);
                out.extend(units);
                out
            }
            SplitDecision::SplitAfter(index) => {
                let (mut head, tail) = split_units_after(units, index);
                head.push(vec![LineLayout::column_break(first_source_line(&tail))]);
                head.extend(tail);
                head
            }
        }
    }
}

/// Cut groups after the row at flattened `index`
///
/// A group cut mid-way becomes two groups, so flattening both halves gives
/// back the original rows.
pub fn split_units_after(units: Vec<Vec<LineLayout>>, index: usize) -> (Vec<Vec<LineLayout>>, Vec<Vec<LineLayout>>) {
    let mut head = Vec::new();
    let mut tail = Vec::new();
    let mut seen = 0;

    for mut group in units {
        let len = group.len();
        if seen + len <= index + 1 {
            head.push(group);
        } else if seen > index {
            tail.push(group);
        } else {
            let rest = group.split_off(index + 1 - seen);
            head.push(group);
            tail.push(rest);
        }
        seen += len;
    }

    (head, tail)
}

pub fn chord_lyric_row_count(units: &[Vec<LineLayout>]) -> usize {
    units.iter().flatten().filter(|row| row.is_chord_lyrics()).count()
}

fn nth_chord_lyric_row(rows: &[&LineLayout], n: usize) -> Option<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.is_chord_lyrics())
        .nth(n.checked_sub(1)?)
        .map(|(index, _)| index)
}

fn height_through(rows: &[&LineLayout], index: usize) -> f32 {
    rows[..=index].iter().map(|row| row.line_height).sum()
}

fn first_source_line(units: &[Vec<LineLayout>]) -> usize {
    units.iter().flatten().next().map_or(0, |row| row.source_line)
}
