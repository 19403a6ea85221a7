//! Column/page cursor shared by the engine and renderers
//!
//! The engine simulates where rows will land to decide split points; a
//! renderer later places the same rows for real. Both walk the layout stream
//! with this one type, so their positions cannot drift apart.

use serde::{Deserialize, Serialize};

use super::config::LayoutConfig;
use super::items::{group_height, is_break_group, LineLayout};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LayoutCursor {
    /// 1-based column index on the current page
    pub column: usize,

    /// 1-based page number
    pub page: usize,

    /// Y of the next row's top edge
    pub y: f32,
}

impl LayoutCursor {
    /// Top of the first column of the first page
    pub fn start(config: &LayoutConfig) -> Self {
        Self {
            column: 1,
            page: 1,
            y: config.column_top_y(1),
        }
    }

    pub fn column_top_y(&self, config: &LayoutConfig) -> f32 {
        config.column_top_y(self.page)
    }

    pub fn at_column_top(&self, config: &LayoutConfig) -> bool {
        self.y <= self.column_top_y(config)
    }

    pub fn x(&self, config: &LayoutConfig) -> f32 {
        config.column_x(self.column)
    }

    pub fn advance_y(&mut self, dy: f32) {
        self.y += dy;
    }

    /// Move to the top of the next column; returns true when a new page starts
    pub fn advance_column(&mut self, config: &LayoutConfig) -> bool {
        let new_page = self.column >= config.column_count;
        if new_page {
            self.column = 1;
            self.page += 1;
        } else {
            self.column += 1;
        }
        self.y = config.column_top_y(self.page);
        new_page
    }

    /// Apply one unit of the layout stream
    pub fn advance_group(&mut self, group: &[LineLayout], config: &LayoutConfig) -> bool {
        if is_break_group(group) {
            self.advance_column(config)
        } else {
            self.advance_y(group_height(group));
            false
        }
    }
}
