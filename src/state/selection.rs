// src/state/selection.rs
use eframe::egui::Color32;

use crate::data::RowId;

/// Hard cap on simultaneous selections; further clicks are ignored
/// until something is deselected.
pub const MAX_SELECTIONS: usize = 5;

// d3.schemeCategory10.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

/// Palette color for a selection position. Colors belong to positions,
/// not rows: removing a selection shifts the colors of everything after
/// it.
pub fn color(index: usize) -> Color32 {
    PALETTE[index % PALETTE.len()]
}

/// Ordered set of selected rows, shared by the scatterplot, the radar
/// chart, and the legend.
#[derive(Debug, Default)]
pub struct Selection {
    rows: Vec<RowId>,
}

impl Selection {
    /// Click semantics: deselect if present, otherwise select unless
    /// the cap is reached, in which case the click is a no-op.
    pub fn toggle(&mut self, row: RowId) {
        if let Some(pos) = self.rows.iter().position(|&r| r == row) {
            self.rows.remove(pos);
        } else if self.rows.len() < MAX_SELECTIONS {
            self.rows.push(row);
        }
    }

    pub fn remove(&mut self, row: RowId) {
        self.rows.retain(|&r| r != row);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &[RowId] {
        &self.rows
    }

    pub fn is_selected(&self, row: RowId) -> bool {
        self.rows.contains(&row)
    }

    pub fn color_of(&self, row: RowId) -> Option<Color32> {
        self.rows.iter().position(|&r| r == row).map(color)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_selects_and_deselects() {
        let mut sel = Selection::default();
        sel.toggle(3);
        assert!(sel.is_selected(3));
        sel.toggle(3);
        assert!(!sel.is_selected(3));
        assert!(sel.is_empty());
    }

    #[test]
    fn selection_caps_at_five() {
        let mut sel = Selection::default();
        for row in 0..7 {
            sel.toggle(row);
        }
        assert_eq!(sel.len(), MAX_SELECTIONS);
        assert_eq!(sel.rows(), &[0, 1, 2, 3, 4]);
        assert!(!sel.is_selected(5));
    }

    #[test]
    fn full_selection_still_allows_deselection() {
        let mut sel = Selection::default();
        for row in 0..5 {
            sel.toggle(row);
        }
        sel.toggle(2);
        assert_eq!(sel.len(), 4);
        sel.toggle(9);
        assert!(sel.is_selected(9));
    }

    #[test]
    fn colors_shift_when_an_earlier_selection_is_removed() {
        let mut sel = Selection::default();
        sel.toggle(10);
        sel.toggle(20);
        sel.toggle(30);
        assert_eq!(sel.color_of(30), Some(PALETTE[2]));

        sel.remove(10);
        assert_eq!(sel.color_of(20), Some(PALETTE[0]));
        assert_eq!(sel.color_of(30), Some(PALETTE[1]));
        assert_eq!(sel.color_of(10), None);
    }

    #[test]
    fn palette_wraps_past_ten() {
        assert_eq!(color(0), PALETTE[0]);
        assert_eq!(color(10), PALETTE[0]);
        assert_eq!(color(13), PALETTE[3]);
    }
}
