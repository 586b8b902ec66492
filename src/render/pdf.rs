use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use super::layout::{layout_document, FontWeight, PAGE_HEIGHT_PT, PAGE_WIDTH_PT};
use super::{RenderError, TripDocument};

const MM_PER_PT: f32 = 25.4 / 72.0;
const LAYER: &str = "Layer 1";

fn mm(pt: f32) -> Mm {
    Mm(pt * MM_PER_PT)
}

/// Deterministic output location; re-rendering a trip overwrites its file.
pub fn output_path(output_dir: &Path, trip_id: &str) -> PathBuf {
    output_dir.join(format!("itinerary_{}.pdf", trip_id))
}

/// Writes the trip document as a US-letter PDF and returns its path.
pub fn render_itinerary_pdf(doc: &TripDocument, output_dir: &Path) -> Result<PathBuf, RenderError> {
    if doc.id.is_empty() || doc.id.contains(['/', '\\']) || doc.id == "." || doc.id == ".." {
        return Err(RenderError::InvalidDocument(format!("unusable trip id {:?}", doc.id)));
    }

    fs::create_dir_all(output_dir).map_err(|source| RenderError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let path = output_path(output_dir, &doc.id);

    let pages = layout_document(doc);
    let (pdf, first_page, first_layer) = PdfDocument::new(
        "Your Travel Itinerary",
        mm(PAGE_WIDTH_PT),
        mm(PAGE_HEIGHT_PT),
        LAYER,
    );
    let regular = pdf
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let bold = pdf
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    let mut first = Some((first_page, first_layer));
    for page in &pages {
        let (page_index, layer_index) = match first.take() {
            Some(indices) => indices,
            None => pdf.add_page(mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), LAYER),
        };
        let layer = pdf.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            let font: &IndirectFontRef = match line.weight {
                FontWeight::Regular => &regular,
                FontWeight::Bold => &bold,
            };
            layer.use_text(line.text.clone(), line.size, mm(line.x), mm(line.y), font);
        }
    }

    let file = File::create(&path).map_err(|source| RenderError::Io {
        path: path.clone(),
        source,
    })?;
    pdf.save(&mut BufWriter::new(file))
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    info!(trip_id = %doc.id, pages = pages.len(), path = %path.display(), "itinerary PDF written");
    Ok(path)
}
