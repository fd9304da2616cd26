//! Planilla Excel del documento tabular
//!
//! Misma estructura que el PDF: encabezado, tabla con rejilla y firmas.

use crate::document::TableDocument;
use crate::layout::{CellAlign, BRIGADE_RED, HEAD_BLUE};
use rust_xlsxwriter::*;

/// Ancho de columna Excel aproximado a partir de mm
fn mm_to_excel_width(mm: f32) -> f64 {
    (mm as f64 / 2.0).max(6.0)
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::RGB(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
}

/// Genera la planilla en memoria
pub fn generate_excel_buffer(document: &TableDocument) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Documento")
        .map_err(|e| format!("Error al nombrar la hoja: {}", e))?;

    let institution_format = Format::new().set_bold().set_font_size(14.0);
    let brigade_format = Format::new()
        .set_bold()
        .set_font_size(12.0)
        .set_font_color(rgb(BRIGADE_RED));
    let title_format = Format::new().set_bold().set_font_size(11.0);
    let issued_format = Format::new()
        .set_font_size(9.0)
        .set_font_color(Color::RGB(0x646464));
    let head_format = Format::new()
        .set_bold()
        .set_font_size(9.0)
        .set_font_color(Color::White)
        .set_background_color(rgb(HEAD_BLUE))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new()
        .set_font_size(9.0)
        .set_text_wrap()
        .set_border(FormatBorder::Thin);
    let centered_format = cell_format.clone().set_align(FormatAlign::Center);

    for (col, column) in document.columns.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, mm_to_excel_width(column.width_mm))
            .map_err(|e| format!("Error de ancho de columna: {}", e))?;
    }

    let header = &document.header;
    let lines = [
        (header.institution.clone(), &institution_format),
        (header.brigade.clone(), &brigade_format),
        (header.title.to_uppercase(), &title_format),
        (header.issued_line(), &issued_format),
    ];
    for (row, (text, format)) in lines.iter().enumerate() {
        worksheet
            .write_string_with_format(row as u32, 0, text, format)
            .map_err(|e| format!("Error al escribir el encabezado: {}", e))?;
    }

    let head_row: u32 = 5;
    for (col, column) in document.columns.iter().enumerate() {
        worksheet
            .write_string_with_format(head_row, col as u16, column.title, &head_format)
            .map_err(|e| format!("Error al escribir títulos: {}", e))?;
    }

    for (i, cells) in document.rows.iter().enumerate() {
        let row = head_row + 1 + i as u32;
        for (col, (value, column)) in cells.iter().zip(document.columns.iter()).enumerate() {
            let format = match column.align {
                CellAlign::Center => &centered_format,
                CellAlign::Left => &cell_format,
            };
            worksheet
                .write_string_with_format(row, col as u16, value, format)
                .map_err(|e| format!("Error al escribir la fila {}: {}", i + 1, e))?;
        }
    }

    // Firmas: tres filas por debajo de la tabla
    let signature_row = head_row + document.rows.len() as u32 + 4;
    let last_col = document.columns.len().saturating_sub(1) as u16;
    for (i, label) in document.signatures.iter().enumerate() {
        let col = if document.signatures.len() == 1 {
            last_col
        } else {
            (i as u16 * 2).min(last_col)
        };
        worksheet
            .write_string(signature_row, col, "__________________________")
            .map_err(|e| format!("Error al escribir firmas: {}", e))?;
        worksheet
            .write_string(signature_row + 1, col, label)
            .map_err(|e| format!("Error al escribir firmas: {}", e))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Error al guardar la planilla: {}", e))
}
