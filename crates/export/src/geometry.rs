//! Fixed page geometry for exported transcripts.
//!
//! All lengths are millimetres; font sizes are points.

/// Points per millimetre.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Advance width of every Courier glyph, as a fraction of the font size.
const COURIER_ADVANCE_EM: f64 = 0.6;

/// Page size, margins and typography of the exported document.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
    pub font_size_pt: f64,
    pub line_height_mm: f64,
    pub title_font_size_pt: f64,
    /// Vertical space reserved for the title on the first page.
    pub title_block_mm: f64,
    /// Gap left after each message.
    pub message_spacing_mm: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometry {
    /// A4 portrait with a 15 mm margin and 11 pt body text.
    pub fn a4() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 15.0,
            font_size_pt: 11.0,
            line_height_mm: 6.0,
            title_font_size_pt: 16.0,
            title_block_mm: 15.0,
            message_spacing_mm: 4.0,
        }
    }

    pub fn usable_width_mm(&self) -> f64 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn usable_height_mm(&self) -> f64 {
        self.height_mm - 2.0 * self.margin_mm
    }

    /// Lowest y (from the top edge) that content may reach.
    pub fn bottom_limit_mm(&self) -> f64 {
        self.height_mm - self.margin_mm
    }

    /// Width of one body-text glyph in millimetres.
    pub fn char_width_mm(&self) -> f64 {
        self.font_size_pt * COURIER_ADVANCE_EM / PT_PER_MM
    }

    /// How many body-text characters fit on one line (at least one).
    pub fn chars_per_line(&self) -> usize {
        ((self.usable_width_mm() / self.char_width_mm()).floor() as usize).max(1)
    }

    /// How many body-text lines fit between the top and bottom margins.
    pub fn lines_per_page(&self) -> usize {
        ((self.usable_height_mm() / self.line_height_mm).floor() as usize).max(1)
    }
}
