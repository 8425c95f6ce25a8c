// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use unicode_width::UnicodeWidthStr;

/// Blank cells between the longest candidate and the next column.
pub const GRID_COLUMN_GAP: usize = 2;

/// Lay `candidates` out left justified, row-major, in as many columns as fit in
/// `viewport_columns` (at least one). Every cell is padded to the column width, which is
/// the widest candidate plus [`GRID_COLUMN_GAP`]. Returns one string per display row.
#[must_use]
pub fn layout_grid(candidates: &[String], viewport_columns: u16) -> Vec<String> {
    let Some(widest) = candidates.iter().map(|it| it.width()).max() else {
        return vec![];
    };
    let cell_width = widest + GRID_COLUMN_GAP;
    let cells_per_row = (usize::from(viewport_columns) / cell_width).max(1);

    candidates
        .chunks(cells_per_row)
        .map(|row| {
            let mut line = String::with_capacity(cell_width * row.len());
            for candidate in row {
                line.push_str(candidate);
                line.push_str(&" ".repeat(cell_width - candidate.width()));
            }
            line
        })
        .collect()
}
