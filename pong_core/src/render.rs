//! Projection of field coordinates onto a character grid.
//!
//! Pure arithmetic shared by the text frontends. Paddles always project to the
//! same number of rows regardless of where they sit, so they never appear to
//! stretch or shrink while moving.

use glam::Vec2;

use crate::config::Config;
use crate::types::Paddle;

/// Inclusive cell rectangle
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CellRect {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl CellRect {
    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn contains(&self, col: usize, row: usize) -> bool {
        (self.left..=self.right).contains(&col) && (self.top..=self.bottom).contains(&row)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct RenderHelper {
    cols: usize,
    rows: usize,
    field_width: f32,
    field_height: f32,
    paddle_rows: usize,
    paddle_cols: usize,
}

impl RenderHelper {
    /// Grid of `cols` x `rows` cells covering the whole field. Both must be non-zero.
    pub fn new(cols: usize, rows: usize, config: &Config) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);

        let paddle_rows = cells_for(config.paddle_height, config.field_height, rows);
        let paddle_cols = cells_for(config.paddle_width, config.field_width, cols);

        RenderHelper {
            cols,
            rows,
            field_width: config.field_width,
            field_height: config.field_height,
            paddle_rows: paddle_rows.clamp(1, rows),
            paddle_cols: paddle_cols.clamp(1, cols),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Paddle height in rows; the same at every position
    pub fn paddle_height_cells(&self) -> usize {
        self.paddle_rows
    }

    pub fn get_paddle_rect(&self, paddle: &Paddle) -> CellRect {
        // Map the paddle's travel range onto the free rows so the extremes line up
        let travel = self.field_height - paddle.height;
        let free_rows = self.rows - self.paddle_rows;
        let top = if travel > 0.0 {
            let share = (paddle.y / travel).clamp(0.0, 1.0);
            (share * free_rows as f32).round() as usize
        } else {
            0
        };

        let max_left = self.cols - self.paddle_cols;
        let left = self.col_of(paddle.x).min(max_left);

        CellRect {
            left,
            right: left + self.paddle_cols - 1,
            top,
            bottom: top + self.paddle_rows - 1,
        }
    }

    /// Cell holding the ball center, clamped to the grid
    pub fn get_ball_position(&self, pos: Vec2) -> (usize, usize) {
        (self.col_of(pos.x), self.row_of(pos.y))
    }

    /// Column of the field's vertical center line
    pub fn center_col(&self) -> usize {
        self.cols / 2
    }

    fn col_of(&self, x: f32) -> usize {
        let col = (x / self.field_width * self.cols as f32).floor().max(0.0) as usize;
        col.min(self.cols - 1)
    }

    fn row_of(&self, y: f32) -> usize {
        let row = (y / self.field_height * self.rows as f32).floor().max(0.0) as usize;
        row.min(self.rows - 1)
    }
}

/// Whole cells covering `part` of a `whole` spread over `cells`
fn cells_for(part: f32, whole: f32, cells: usize) -> usize {
    (part / whole * cells as f32).round() as usize
}
