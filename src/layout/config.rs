//! Layout configuration
//!
//! `LayoutConfig` carries every geometric constant shared by the engine's
//! simulated cursor and the renderers. It is validated once, when a
//! `LayoutEngine` is built; layout passes assume a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Font style
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Measurement key for text: identical specs always measure identically
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FontSpec {
    pub family: String,

    /// Font size in pixels
    pub size: f32,

    /// Numeric weight (400 = regular, 700 = bold)
    pub weight: u16,

    pub style: FontStyle,

    /// Line-height factor applied to `size` when stacking rows
    pub line_height: Option<f32>,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Helvetica".to_string(),
            size: 12.0,
            weight: 400,
            style: FontStyle::Normal,
            line_height: None,
        }
    }
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = 700;
        self
    }

    pub fn italic(mut self) -> Self {
        self.style = FontStyle::Italic;
        self
    }

    pub fn with_line_height(mut self, factor: f32) -> Self {
        self.line_height = Some(factor);
        self
    }

    /// Size scaled by the line-height factor (default 1)
    pub fn line_box(&self) -> f32 {
        self.size * self.line_height.unwrap_or(1.0)
    }

    /// CSS shorthand, e.g. `italic 700 12px Helvetica`
    pub fn css(&self) -> String {
        let style = match self.style {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        };
        format!("{} {} {}px {}", style, self.weight, self.size, self.family)
    }

    fn validate(&self, role: &'static str) -> Result<()> {
        let invalid = |reason: String| LayoutError::InvalidFont { role, reason };

        if self.family.trim().is_empty() {
            return Err(invalid("family is empty".to_string()));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(invalid(format!("size must be positive, got {}", self.size)));
        }
        if let Some(factor) = self.line_height {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(invalid(format!("line height must be positive, got {}", factor)));
            }
        }
        Ok(())
    }
}

/// Fonts per text role
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LayoutFonts {
    pub chord: FontSpec,
    pub lyrics: FontSpec,
    pub comment: FontSpec,
    pub section_label: FontSpec,
}

impl Default for LayoutFonts {
    fn default() -> Self {
        Self {
            chord: FontSpec::new("Helvetica", 9.0).bold(),
            lyrics: FontSpec::new("Helvetica", 12.0),
            comment: FontSpec::new("Helvetica", 10.0).italic(),
            section_label: FontSpec::new("Helvetica", 12.0).bold(),
        }
    }
}

/// Configuration for layout calculations
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of the content area holding all columns
    pub width: f32,

    /// X of the content area's left edge
    pub margin_left: f32,

    pub fonts: LayoutFonts,

    /// Spaces appended to a chord that would collide with the next one
    pub chord_spacing: usize,

    /// Vertical gap between the chord row and the lyric row
    pub chord_lyric_spacing: f32,

    /// Vertical padding added to every non-empty row
    pub line_padding: f32,

    /// Column top Y
    pub min_y: f32,

    /// Column top Y on the first page (e.g. below a title header)
    pub first_page_min_y: Option<f32>,

    /// Explicit column width; 0 derives it from `width`
    pub column_width: f32,

    pub column_count: usize,

    pub column_spacing: f32,

    pub min_column_width: Option<f32>,

    pub max_column_width: Option<f32>,

    /// Vertical gap after each paragraph
    pub paragraph_spacing: f32,

    /// Column bottom Y
    pub column_bottom_y: f32,

    pub display_lyrics_only: bool,

    /// Render chords as played without capo
    pub decapo: bool,

    pub use_unicode_modifiers: bool,

    pub normalize_chords: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 525.0,
            margin_left: 35.0,
            fonts: LayoutFonts::default(),
            chord_spacing: 2,
            chord_lyric_spacing: 0.0,
            line_padding: 2.0,
            min_y: 50.0,
            first_page_min_y: None,
            column_width: 0.0,
            column_count: 1,
            column_spacing: 25.0,
            min_column_width: None,
            max_column_width: None,
            paragraph_spacing: 10.0,
            column_bottom_y: 800.0,
            display_lyrics_only: false,
            decapo: false,
            use_unicode_modifiers: false,
            normalize_chords: true,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        log::debug!("Loading layout configuration from {}", path.display());

        if is_yaml {
            Self::from_yaml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    /// Width available to one column's rows
    ///
    /// An explicit `column_width` wins; otherwise the content width is shared
    /// evenly between the columns. Either way the result is clamped to the
    /// optional min/max bounds.
    pub fn resolved_column_width(&self) -> f32 {
        let mut width = if self.column_width > 0.0 {
            self.column_width
        } else {
            let columns = self.column_count.max(1) as f32;
            (self.width - self.column_spacing * (columns - 1.0)) / columns
        };

        if let Some(max) = self.max_column_width {
            width = width.min(max);
        }
        if let Some(min) = self.min_column_width {
            width = width.max(min);
        }
        width
    }

    /// Column top Y for a 1-based page number
    pub fn column_top_y(&self, page: usize) -> f32 {
        match (page, self.first_page_min_y) {
            (1, Some(y)) => y,
            _ => self.min_y,
        }
    }

    /// X of the left edge of a 1-based column
    pub fn column_x(&self, column: usize) -> f32 {
        let index = column.saturating_sub(1) as f32;
        self.margin_left + index * (self.resolved_column_width() + self.column_spacing)
    }

    /// Check everything a layout pass relies on
    pub fn validate(&self) -> Result<()> {
        self.fonts.chord.validate("chord")?;
        self.fonts.lyrics.validate("lyrics")?;
        self.fonts.comment.validate("comment")?;
        self.fonts.section_label.validate("section label")?;

        let finite = [
            ("width", self.width),
            ("margin_left", self.margin_left),
            ("chord_lyric_spacing", self.chord_lyric_spacing),
            ("line_padding", self.line_padding),
            ("min_y", self.min_y),
            ("column_width", self.column_width),
            ("column_spacing", self.column_spacing),
            ("paragraph_spacing", self.paragraph_spacing),
            ("column_bottom_y", self.column_bottom_y),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(LayoutError::InvalidConfig(format!("{} is not finite", name)));
            }
        }

        for (name, value) in [
            ("chord_lyric_spacing", self.chord_lyric_spacing),
            ("line_padding", self.line_padding),
            ("column_spacing", self.column_spacing),
            ("paragraph_spacing", self.paragraph_spacing),
        ] {
            if value < 0.0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if self.column_count == 0 {
            return Err(LayoutError::InvalidConfig("column_count must be at least 1".to_string()));
        }

        if let (Some(min), Some(max)) = (self.min_column_width, self.max_column_width) {
            if min > max {
                return Err(LayoutError::InvalidConfig(format!(
                    "min_column_width {} exceeds max_column_width {}",
                    min, max
                )));
            }
        }

        let column_width = self.resolved_column_width();
        if !column_width.is_finite() || column_width <= 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "column width must be positive, got {}",
                column_width
            )));
        }

        let top = self.first_page_min_y.map_or(self.min_y, |y| y.max(self.min_y));
        if !top.is_finite() || self.column_bottom_y <= top {
            return Err(LayoutError::InvalidConfig(format!(
                "column_bottom_y {} must lie below the column top {}",
                self.column_bottom_y, top
            )));
        }

        Ok(())
    }
}
