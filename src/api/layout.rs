//! Layout entry points for JavaScript
//!
//! Both functions take the parsed song and a layout configuration as plain
//! JS objects. Text is measured by an optional JS callback
//! `(text, cssFont) => width`, typically backed by a canvas 2D context;
//! without one the built-in heuristic measurer is used.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, deserialize_or_default, layout_error, serialize};
use crate::layout::config::{FontSpec, LayoutConfig};
use crate::layout::engine::LayoutEngine;
use crate::layout::items::ParagraphLayoutResult;
use crate::layout::measurer::{CachedMeasurer, HeuristicMeasurer, TextMeasurer};
use crate::models::Song;
use crate::renderers::chord::BasicChordRenderer;
use crate::renderers::display_list::DisplayListBuilder;

/// Text measurer backed by a JavaScript callback
///
/// A callback that throws or returns something other than a finite number
/// falls back to the heuristic width for that string.
pub struct JsMeasurer {
    callback: js_sys::Function,
    fallback: HeuristicMeasurer,
}

impl JsMeasurer {
    pub fn new(callback: js_sys::Function) -> Self {
        Self {
            callback,
            fallback: HeuristicMeasurer,
        }
    }
}

impl TextMeasurer for JsMeasurer {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let measured = self
            .callback
            .call2(&JsValue::NULL, &JsValue::from_str(text), &JsValue::from_str(&font.css()))
            .ok()
            .and_then(|value| value.as_f64())
            .filter(|width| width.is_finite() && *width >= 0.0);

        match measured {
            Some(width) => width as f32,
            None => {
                log::warn!("measure callback failed for {:?}, using heuristic width", text);
                self.fallback.measure_width(text, font)
            }
        }
    }
}

fn run_layout(
    song: JsValue,
    config: JsValue,
    measure: Option<js_sys::Function>,
) -> Result<(LayoutConfig, Vec<ParagraphLayoutResult>), JsValue> {
    let song: Song = deserialize(song, "Failed to deserialize song")?;
    let config: LayoutConfig = deserialize_or_default(config, "Failed to deserialize layout config")?;

    let measurer: Box<dyn TextMeasurer> = match measure {
        Some(callback) => Box::new(CachedMeasurer::new(JsMeasurer::new(callback))),
        None => Box::new(HeuristicMeasurer),
    };

    let engine = LayoutEngine::new(&song, &config, measurer.as_ref(), &BasicChordRenderer).map_err(layout_error)?;
    let layouts = engine.compute_paragraph_layouts();

    log::info!("Laid out {} of {} paragraphs", layouts.len(), song.paragraphs.len());
    Ok((config, layouts))
}

// ============================================================================
// Layout
// ============================================================================

/// Compute the paragraph layout stream for a song
#[wasm_bindgen(js_name = computeParagraphLayouts)]
pub fn compute_paragraph_layouts(
    song: JsValue,
    config: JsValue,
    measure: Option<js_sys::Function>,
) -> Result<JsValue, JsValue> {
    let (_, layouts) = run_layout(song, config, measure)?;
    serialize(&layouts, "Failed to serialize paragraph layouts")
}

/// Compute positioned text for every page of a song
#[wasm_bindgen(js_name = computeDisplayList)]
pub fn compute_display_list(
    song: JsValue,
    config: JsValue,
    measure: Option<js_sys::Function>,
) -> Result<JsValue, JsValue> {
    let (config, layouts) = run_layout(song, config, measure)?;
    let display_list = DisplayListBuilder::new(&config).build(&layouts);
    serialize(&display_list, "Failed to serialize display list")
}
