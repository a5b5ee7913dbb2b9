use crate::fonts::FontEntry;
use crate::model::PageGeometry;

/// Where the i-th record lands: page, grid position and the cell's
/// bottom-left corner in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSlot {
    pub page: usize,
    pub row: usize,
    pub col: usize,
    pub x: f32,
    pub y: f32,
}

/// Placement is a pure function of the record index and the geometry.
/// Cells fill left-to-right, then top-to-bottom, then onto the next page.
pub fn cell_slot(index: usize, geo: &PageGeometry) -> CellSlot {
    let capacity = geo.capacity();
    debug_assert!(capacity > 0, "geometry needs at least one column and row");
    let page = index / capacity;
    let pos = index % capacity;
    let row = pos / geo.cols;
    let col = pos % geo.cols;

    let x = geo.margin_left + col as f32 * (geo.cell_width + geo.gap_h);
    let y = geo.page_height
        - geo.margin_top
        - (row + 1) as f32 * geo.cell_height
        - row as f32 * geo.gap_v;

    CellSlot { page, row, col, x, y }
}

pub(crate) struct WrappedLine {
    pub(crate) text: String,
    pub(crate) width: f32,
}

/// Greedy word-wrap of one field into lines no wider than `max_width`.
/// A single word wider than the limit is emitted on its own line anyway;
/// overflow is the caller's accepted failure mode, not an error.
pub(crate) fn wrap_text(
    text: &str,
    entry: &FontEntry,
    font_size: f32,
    max_width: f32,
) -> Vec<WrappedLine> {
    let space_w = entry.space_width(font_size);
    let mut lines: Vec<WrappedLine> = Vec::new();
    let mut current = String::new();
    let mut current_w = 0.0f32;

    for word in text.split_whitespace() {
        let ww = entry.text_width(word, font_size);
        if current.is_empty() {
            current.push_str(word);
            current_w = ww;
        } else if current_w + space_w + ww > max_width {
            lines.push(WrappedLine {
                text: std::mem::take(&mut current),
                width: current_w,
            });
            current.push_str(word);
            current_w = ww;
        } else {
            current.push(' ');
            current.push_str(word);
            current_w += space_w + ww;
        }
    }

    if !current.is_empty() {
        lines.push(WrappedLine {
            text: current,
            width: current_w,
        });
    }
    lines
}
