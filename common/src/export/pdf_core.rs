//! PDF export core: paginación de la tabla y ubicación de firmas.
//!
//! Coordenadas en mm desde el borde superior. Sin dependencias de printpdf
//! para poder probar el diseño sin generar archivos.

use crate::layout::{
    approx_char_width_mm, ColumnSpec, A4_HEIGHT_MM, A4_WIDTH_MM, BOTTOM_MARGIN_MM,
    CELL_PADDING_MM, CONTINUATION_START_Y_MM, HEAD_ROW_HEIGHT_MM, MARGIN_MM, ROW_HEIGHT_MM,
    SIGNATURE_BLOCK_MM, SIGNATURE_GAP_MM, SIGNATURE_LINE_MM, TABLE_START_Y_MM,
};
use std::ops::Range;

/// Filas de la tabla que caen en una página
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice {
    pub rows: Range<usize>,
    /// Borde superior de la fila de títulos
    pub table_top_mm: f32,
    /// La primera página lleva el encabezado institucional
    pub first: bool,
}

impl PageSlice {
    /// Borde inferior de la última fila dibujada
    pub fn table_bottom_mm(&self) -> f32 {
        self.table_top_mm + HEAD_ROW_HEIGHT_MM + self.rows.len() as f32 * ROW_HEIGHT_MM
    }
}

/// Dónde van las líneas de firma
#[derive(Debug, Clone, PartialEq)]
pub struct SignaturePlacement {
    /// No entran bajo la tabla: van en una hoja nueva
    pub new_page: bool,
    pub line_y_mm: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct TableLayout {
    pub columns: &'static [ColumnSpec],
}

impl TableLayout {
    pub fn new(columns: &'static [ColumnSpec]) -> Self {
        Self { columns }
    }

    pub fn table_width_mm(&self) -> f32 {
        self.columns.iter().map(|c| c.width_mm).sum()
    }

    /// Borde izquierdo de la columna `index`
    pub fn column_x_mm(&self, index: usize) -> f32 {
        MARGIN_MM
            + self
                .columns
                .iter()
                .take(index)
                .map(|c| c.width_mm)
                .sum::<f32>()
    }

    fn rows_fitting(start_y_mm: f32) -> usize {
        let available = A4_HEIGHT_MM - BOTTOM_MARGIN_MM - start_y_mm - HEAD_ROW_HEIGHT_MM;
        (available / ROW_HEIGHT_MM).floor().max(1.0) as usize
    }

    /// Reparte las filas en páginas; siempre hay al menos una
    pub fn paginate(&self, row_count: usize) -> Vec<PageSlice> {
        let mut pages = Vec::new();
        let mut start = 0;
        loop {
            let first = pages.is_empty();
            let top = if first { TABLE_START_Y_MM } else { CONTINUATION_START_Y_MM };
            let end = (start + Self::rows_fitting(top)).min(row_count);
            pages.push(PageSlice {
                rows: start..end,
                table_top_mm: top,
                first,
            });
            if end >= row_count {
                break;
            }
            start = end;
        }
        pages
    }

    pub fn signature_placement(&self, last_page: &PageSlice) -> SignaturePlacement {
        let bottom = last_page.table_bottom_mm();
        if bottom + SIGNATURE_BLOCK_MM > A4_HEIGHT_MM - BOTTOM_MARGIN_MM {
            SignaturePlacement {
                new_page: true,
                line_y_mm: CONTINUATION_START_Y_MM + SIGNATURE_GAP_MM,
            }
        } else {
            SignaturePlacement {
                new_page: false,
                line_y_mm: bottom + SIGNATURE_GAP_MM,
            }
        }
    }
}

/// X de la línea de firma `index` entre `count` (una sola va a la derecha)
pub fn signature_x_mm(count: usize, index: usize) -> f32 {
    let right = A4_WIDTH_MM - MARGIN_MM - SIGNATURE_LINE_MM;
    if count <= 1 {
        return right;
    }
    let left = MARGIN_MM + 10.0;
    let step = (right - left) / (count - 1) as f32;
    left + step * index as f32
}

/// Recorta el texto para que entre en la celda
pub fn fit_text(text: &str, width_mm: f32, font_pt: f32) -> String {
    let usable = width_mm - CELL_PADDING_MM * 2.0;
    let max_chars = (usable / approx_char_width_mm(font_pt)).floor() as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Texto de una celda: las columnas numéricas nunca se recortan
pub fn cell_text(value: &str, column: &ColumnSpec, font_pt: f32) -> String {
    if column.numeric {
        value.to_string()
    } else {
        fit_text(value, column.width_mm, font_pt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{MANIFEST_COLUMNS, TABLE_FONT_PT};

    #[test]
    fn test_paginate_empty_has_one_page() {
        let layout = TableLayout::new(MANIFEST_COLUMNS);
        let pages = layout.paginate(0);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].rows.is_empty());
        assert!(pages[0].first);
    }

    #[test]
    fn test_paginate_covers_all_rows_in_order() {
        let layout = TableLayout::new(MANIFEST_COLUMNS);
        let pages = layout.paginate(100);
        assert!(pages.len() > 1);
        assert_eq!(pages[0].rows.start, 0);
        for pair in pages.windows(2) {
            assert_eq!(pair[0].rows.end, pair[1].rows.start);
            assert!(!pair[1].first);
        }
        assert_eq!(pages.last().unwrap().rows.end, 100);
        for page in &pages {
            assert!(page.table_bottom_mm() <= A4_HEIGHT_MM - BOTTOM_MARGIN_MM + 0.01);
        }
    }

    #[test]
    fn test_signatures_move_to_new_page_when_full() {
        let layout = TableLayout::new(MANIFEST_COLUMNS);
        let short = layout.paginate(3);
        assert!(!layout.signature_placement(&short[0]).new_page);

        let full = layout.paginate(TableLayout::rows_fitting(TABLE_START_Y_MM));
        assert_eq!(full.len(), 1);
        assert!(layout.signature_placement(&full[0]).new_page);
    }

    #[test]
    fn test_column_positions() {
        let layout = TableLayout::new(MANIFEST_COLUMNS);
        assert!((layout.column_x_mm(0) - MARGIN_MM).abs() < 0.01);
        assert!((layout.column_x_mm(1) - (MARGIN_MM + 15.0)).abs() < 0.01);
    }

    #[test]
    fn test_signature_x() {
        assert!(signature_x_mm(2, 0) < signature_x_mm(2, 1));
        assert_eq!(signature_x_mm(1, 0), signature_x_mm(2, 1));
    }

    #[test]
    fn test_quantity_cell_is_never_ellipsized() {
        let quantity = &MANIFEST_COLUMNS[0];
        assert_eq!(cell_text("4294967295", quantity, TABLE_FONT_PT), "4294967295");
        assert_eq!(cell_text("99999", quantity, TABLE_FONT_PT), "99999");

        let description = &MANIFEST_COLUMNS[1];
        let long = "Autobomba forestal 4x4 con equipo de bombeo de alta presión y tanque";
        assert!(cell_text(long, description, TABLE_FONT_PT).ends_with("..."));
    }

    #[test]
    fn test_fit_text() {
        assert_eq!(fit_text("Casco", 50.0, TABLE_FONT_PT), "Casco");
        let long = "Autobomba forestal 4x4 con equipo de bombeo de alta presión";
        let fitted = fit_text(long, 20.0, TABLE_FONT_PT);
        assert!(fitted.ends_with("..."));
        assert!(fitted.chars().count() < long.chars().count());
    }
}
