//! Text-reflow export: re-typeset the transcript onto A4 pages.

use crate::document::{PdfDocument, PlacedLine};
use crate::geometry::{PageGeometry, PT_PER_MM};
use crate::wrap::wrap_text;
use kitty_core::{ChatTurn, Role, DEFAULT_ASSISTANT_NAME};

/// Title drawn at the top of the first page.
pub const DEFAULT_TITLE: &str = "Learn from Kitty - Chat Transcript";

/// File name used when saving an exported transcript.
pub const EXPORT_FILENAME: &str = "learn-from-kitty-chat.pdf";

/// Lays out chat turns as wrapped text with greedy pagination.
#[derive(Debug, Clone)]
pub struct TextExporter {
    geometry: PageGeometry,
    title: String,
    assistant_name: String,
}

impl Default for TextExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExporter {
    /// A4 layout, default title and assistant name.
    pub fn new() -> Self {
        Self {
            geometry: PageGeometry::a4(),
            title: DEFAULT_TITLE.to_string(),
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
        }
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Name used to label assistant turns.
    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    /// Label prefixed to a turn's content.
    fn label(&self, role: Role) -> String {
        match role {
            Role::User => "You:".to_string(),
            Role::Assistant => format!("{}:", self.assistant_name),
        }
    }

    /// Lay out `turns` in order and return the paginated document.
    ///
    /// The synthetic greeting is skipped. A message that does not fit in the
    /// space left on a page always starts on a new page; a message taller
    /// than a whole page then continues over as many pages as it needs.
    pub fn export(&self, turns: &[ChatTurn]) -> PdfDocument {
        let g = &self.geometry;
        let mut doc = PdfDocument::new(g.clone());

        doc.place_line(PlacedLine {
            x_mm: g.margin_mm,
            y_mm: g.margin_mm + g.title_font_size_pt / PT_PER_MM,
            text: self.title.clone(),
            font_size_pt: g.title_font_size_pt,
            bold: true,
        });

        let width = g.chars_per_line();
        let bottom = g.bottom_limit_mm();
        let mut cursor = g.margin_mm + g.title_block_mm;

        for turn in turns.iter().filter(|t| !t.greeting) {
            let labelled = format!("{} {}", self.label(turn.role), turn.content);
            let lines = wrap_text(&labelled, width);
            let block_height = lines.len() as f64 * g.line_height_mm;

            if cursor + block_height > bottom {
                doc.add_page();
                cursor = g.margin_mm;
            }

            for line in lines {
                if cursor + g.line_height_mm > bottom {
                    doc.add_page();
                    cursor = g.margin_mm;
                }
                cursor += g.line_height_mm;
                doc.place_line(PlacedLine {
                    x_mm: g.margin_mm,
                    y_mm: cursor,
                    text: line,
                    font_size_pt: g.font_size_pt,
                    bold: false,
                });
            }

            cursor += g.message_spacing_mm;
        }

        log::debug!(
            "Laid out {} turn(s) over {} page(s)",
            turns.len(),
            doc.page_count()
        );
        doc
    }
}
