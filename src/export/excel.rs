//! Excel del documento tabular (rust_xlsxwriter vía la librería común)

use crate::error::{BrigadaError, Result};
use brigada_common::export::excel_core::generate_excel_buffer;
use brigada_common::TableDocument;
use std::path::Path;

pub fn generate_excel(document: &TableDocument, output_path: &Path) -> Result<()> {
    let buffer = generate_excel_buffer(document).map_err(BrigadaError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
