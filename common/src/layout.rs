//! Diseño de página de los documentos tabulares (remito e informe)
//!
//! Todo se expresa en mm medidos desde el borde superior de la hoja;
//! el renderizador PDF convierte a su origen inferior izquierdo.

/// A4 (mm)
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Margen lateral e inferior (mm)
pub const MARGIN_MM: f32 = 14.0;
pub const BOTTOM_MARGIN_MM: f32 = 20.0;

/// Encabezado institucional: líneas de base (mm desde arriba)
pub const INSTITUTION_Y_MM: f32 = 22.0;
pub const BRIGADE_Y_MM: f32 = 28.0;
pub const TITLE_Y_MM: f32 = 40.0;
pub const ISSUED_Y_MM: f32 = 46.0;
pub const TABLE_START_Y_MM: f32 = 55.0;
/// En páginas de continuación la tabla arranca en el margen
pub const CONTINUATION_START_Y_MM: f32 = 20.0;

/// Tamaños de letra (pt)
pub const INSTITUTION_FONT_PT: f32 = 18.0;
pub const BRIGADE_FONT_PT: f32 = 14.0;
pub const TITLE_FONT_PT: f32 = 12.0;
pub const ISSUED_FONT_PT: f32 = 10.0;
pub const TABLE_FONT_PT: f32 = 9.0;

/// Filas de la tabla (mm)
pub const ROW_HEIGHT_MM: f32 = 7.0;
pub const HEAD_ROW_HEIGHT_MM: f32 = 8.0;
pub const CELL_PADDING_MM: f32 = 1.5;

/// Firmas: distancia desde el final de la tabla y largo de la línea (mm)
pub const SIGNATURE_GAP_MM: f32 = 40.0;
pub const SIGNATURE_LINE_MM: f32 = 60.0;
pub const SIGNATURE_BLOCK_MM: f32 = SIGNATURE_GAP_MM + 8.0;

/// Colores RGB (0-255)
pub const BRIGADE_RED: (u8, u8, u8) = (206, 17, 38);
pub const HEAD_BLUE: (u8, u8, u8) = (26, 43, 73);
pub const ISSUED_GREY: (u8, u8, u8) = (100, 100, 100);

/// Ancho útil (182mm)
pub const USABLE_WIDTH_MM: f32 = A4_WIDTH_MM - MARGIN_MM * 2.0;

/// mm → pt
pub const MM_TO_PT: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAlign {
    Left,
    Center,
}

/// Columna de tabla
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub title: &'static str,
    pub width_mm: f32,
    pub align: CellAlign,
    /// Cantidades: se muestran completas, nunca recortadas
    pub numeric: bool,
}

/// Remito: Cant. / Descripción / Marca/Modelo / Serial / Origen
pub const MANIFEST_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { title: "Cant.", width_mm: 15.0, align: CellAlign::Center, numeric: true },
    ColumnSpec { title: "Descripción", width_mm: 72.0, align: CellAlign::Left, numeric: false },
    ColumnSpec { title: "Marca/Modelo", width_mm: 50.0, align: CellAlign::Left, numeric: false },
    ColumnSpec { title: "Serial / Origen", width_mm: 45.0, align: CellAlign::Left, numeric: false },
];

/// Informe de inventario por categoría
pub const INVENTORY_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { title: "Cant.", width_mm: 15.0, align: CellAlign::Center, numeric: true },
    ColumnSpec { title: "Descripción", width_mm: 62.0, align: CellAlign::Left, numeric: false },
    ColumnSpec { title: "Marca/Modelo", width_mm: 45.0, align: CellAlign::Left, numeric: false },
    ColumnSpec { title: "Serial / Patente", width_mm: 35.0, align: CellAlign::Left, numeric: false },
    ColumnSpec { title: "Estado", width_mm: 25.0, align: CellAlign::Left, numeric: false },
];

#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// Ancho aproximado de un carácter Helvetica (mm) para un tamaño dado
#[inline]
pub fn approx_char_width_mm(font_pt: f32) -> f32 {
    font_pt * 0.5 / MM_TO_PT
}
