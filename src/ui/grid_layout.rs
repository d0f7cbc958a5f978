use crate::models::{GridDirection, ImageType, PosterSize};

// Rows: Smallest..XLarge. Columns: Poster, Thumb, Banner.
const VERTICAL_COLUMNS: [[usize; 3]; 5] = [
    [15, 11, 6],
    [13, 9, 5],
    [11, 7, 4],
    [7, 5, 3],
    [5, 3, 2],
];

const HORIZONTAL_ROWS: [[usize; 3]; 5] = [
    [5, 7, 13],
    [4, 6, 11],
    [3, 5, 9],
    [2, 4, 7],
    [1, 2, 5],
];

fn poster_index(size: PosterSize) -> usize {
    match size {
        PosterSize::Smallest => 0,
        PosterSize::Small => 1,
        PosterSize::Med => 2,
        PosterSize::Large => 3,
        PosterSize::XLarge => 4,
    }
}

fn image_index(image_type: ImageType) -> usize {
    match image_type {
        ImageType::Poster => 0,
        ImageType::Thumb => 1,
        ImageType::Banner => 2,
    }
}

/// Column count of a vertically scrolling grid
pub fn columns(size: PosterSize, image_type: ImageType) -> usize {
    VERTICAL_COLUMNS[poster_index(size)][image_index(image_type)]
}

/// Row count of a horizontally scrolling grid
pub fn rows(size: PosterSize, image_type: ImageType) -> usize {
    HORIZONTAL_ROWS[poster_index(size)][image_index(image_type)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub direction: GridDirection,
    /// Columns when vertical, rows when horizontal
    pub lines: usize,
}

impl GridLayout {
    pub fn new(direction: GridDirection, size: PosterSize, image_type: ImageType) -> Self {
        let lines = match direction {
            GridDirection::Vertical => columns(size, image_type),
            GridDirection::Horizontal => rows(size, image_type),
        };
        Self { direction, lines }
    }

    /// True when `last_visible` sits within `lines_from_end` rows (or columns)
    /// of the end of `loaded` cells
    pub fn is_near_end(&self, last_visible: usize, loaded: usize, lines_from_end: usize) -> bool {
        loaded > 0
            && last_visible.saturating_add(self.lines.saturating_mul(lines_from_end)) >= loaded
    }
}
