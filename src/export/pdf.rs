use crate::error::{BrigadaError, Result};
use brigada_common::export::pdf_core::{cell_text, signature_x_mm, TableLayout};
use brigada_common::layout::{
    approx_char_width_mm, CellAlign, A4_HEIGHT_MM, A4_WIDTH_MM, BRIGADE_FONT_PT, BRIGADE_RED,
    BRIGADE_Y_MM, CELL_PADDING_MM, HEAD_BLUE, HEAD_ROW_HEIGHT_MM, INSTITUTION_FONT_PT,
    INSTITUTION_Y_MM, ISSUED_FONT_PT, ISSUED_GREY, ISSUED_Y_MM, MARGIN_MM, ROW_HEIGHT_MM,
    SIGNATURE_LINE_MM, TABLE_FONT_PT, TITLE_FONT_PT, TITLE_Y_MM,
};
use brigada_common::{DocumentHeader, TableDocument};
use printpdf::path::PaintMode;
use printpdf::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const LAYER_NAME: &str = "Capa 1";
const BLACK: (u8, u8, u8) = (0, 0, 0);
const WHITE: (u8, u8, u8) = (255, 255, 255);

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, None))
}

/// mm desde arriba → coordenada PDF (origen abajo a la izquierda)
fn from_top(mm: f32) -> Mm {
    Mm(A4_HEIGHT_MM - mm)
}

fn hline(layer: &PdfLayerReference, x1: f32, x2: f32, y_top: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), from_top(y_top)), false),
            (Point::new(Mm(x2), from_top(y_top)), false),
        ],
        is_closed: false,
    });
}

fn vline(layer: &PdfLayerReference, x: f32, y1_top: f32, y2_top: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x), from_top(y1_top)), false),
            (Point::new(Mm(x), from_top(y2_top)), false),
        ],
        is_closed: false,
    });
}

fn draw_header(layer: &PdfLayerReference, header: &DocumentHeader, fonts: &Fonts) {
    layer.set_fill_color(rgb(BLACK));
    layer.use_text(
        header.institution.as_str(),
        INSTITUTION_FONT_PT,
        Mm(MARGIN_MM),
        from_top(INSTITUTION_Y_MM),
        &fonts.bold,
    );

    layer.set_fill_color(rgb(BRIGADE_RED));
    layer.use_text(
        header.brigade.as_str(),
        BRIGADE_FONT_PT,
        Mm(MARGIN_MM),
        from_top(BRIGADE_Y_MM),
        &fonts.bold,
    );

    layer.set_fill_color(rgb(BLACK));
    layer.use_text(
        header.title.to_uppercase(),
        TITLE_FONT_PT,
        Mm(MARGIN_MM),
        from_top(TITLE_Y_MM),
        &fonts.bold,
    );

    layer.set_fill_color(rgb(ISSUED_GREY));
    layer.use_text(
        header.issued_line(),
        ISSUED_FONT_PT,
        Mm(MARGIN_MM),
        from_top(ISSUED_Y_MM),
        &fonts.regular,
    );
}

/// X del texto dentro de la celda según la alineación
fn text_x(cell_x: f32, width: f32, text: &str, align: CellAlign) -> f32 {
    match align {
        CellAlign::Left => cell_x + CELL_PADDING_MM,
        CellAlign::Center => {
            let text_width = text.chars().count() as f32 * approx_char_width_mm(TABLE_FONT_PT);
            cell_x + ((width - text_width) / 2.0).max(CELL_PADDING_MM)
        }
    }
}

fn draw_table(
    layer: &PdfLayerReference,
    layout: &TableLayout,
    rows: &[Vec<String>],
    top: f32,
    fonts: &Fonts,
) {
    let left = MARGIN_MM;
    let right = MARGIN_MM + layout.table_width_mm();
    let head_bottom = top + HEAD_ROW_HEIGHT_MM;
    let bottom = head_bottom + rows.len() as f32 * ROW_HEIGHT_MM;

    // Fila de títulos con fondo azul
    layer.set_fill_color(rgb(HEAD_BLUE));
    layer.add_rect(
        Rect::new(Mm(left), from_top(head_bottom), Mm(right), from_top(top))
            .with_mode(PaintMode::Fill),
    );
    layer.set_fill_color(rgb(WHITE));
    for (i, column) in layout.columns.iter().enumerate() {
        let x = layout.column_x_mm(i);
        layer.use_text(
            column.title,
            TABLE_FONT_PT,
            Mm(text_x(x, column.width_mm, column.title, column.align)),
            from_top(head_bottom - 2.5),
            &fonts.bold,
        );
    }

    layer.set_fill_color(rgb(BLACK));
    for (n, cells) in rows.iter().enumerate() {
        let row_bottom = head_bottom + (n + 1) as f32 * ROW_HEIGHT_MM;
        for (i, (value, column)) in cells.iter().zip(layout.columns.iter()).enumerate() {
            let text = cell_text(value, column, TABLE_FONT_PT);
            let x = layout.column_x_mm(i);
            layer.use_text(
                text.as_str(),
                TABLE_FONT_PT,
                Mm(text_x(x, column.width_mm, &text, column.align)),
                from_top(row_bottom - 2.2),
                &fonts.regular,
            );
        }
    }

    // Rejilla
    layer.set_outline_color(rgb((120, 120, 120)));
    layer.set_outline_thickness(0.3);
    hline(layer, left, right, top);
    hline(layer, left, right, head_bottom);
    for n in 1..=rows.len() {
        hline(layer, left, right, head_bottom + n as f32 * ROW_HEIGHT_MM);
    }
    for i in 0..=layout.columns.len() {
        let x = if i == layout.columns.len() { right } else { layout.column_x_mm(i) };
        vline(layer, x, top, bottom);
    }
}

fn draw_signatures(layer: &PdfLayerReference, labels: &[String], line_y: f32, fonts: &Fonts) {
    layer.set_outline_color(rgb(BLACK));
    layer.set_outline_thickness(0.5);
    layer.set_fill_color(rgb(BLACK));
    for (i, label) in labels.iter().enumerate() {
        let x = signature_x_mm(labels.len(), i);
        hline(layer, x, x + SIGNATURE_LINE_MM, line_y);
        let label_width = label.chars().count() as f32 * approx_char_width_mm(ISSUED_FONT_PT);
        layer.use_text(
            label.as_str(),
            ISSUED_FONT_PT,
            Mm(x + (SIGNATURE_LINE_MM - label_width).max(0.0) / 2.0),
            from_top(line_y + 5.0),
            &fonts.regular,
        );
    }
}

/// Dibuja el documento tabular y lo guarda en `output_path`
pub fn generate_pdf(document: &TableDocument, output_path: &Path) -> Result<()> {
    let (doc, page1, layer1) = PdfDocument::new(
        document.header.title.as_str(),
        Mm(A4_WIDTH_MM),
        Mm(A4_HEIGHT_MM),
        LAYER_NAME,
    );

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| BrigadaError::PdfGeneration(format!("fuente: {:?}", e)))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| BrigadaError::PdfGeneration(format!("fuente: {:?}", e)))?,
    };

    let layout = TableLayout::new(document.columns);
    let pages = layout.paginate(document.rows.len());

    let mut current_layer = doc.get_page(page1).get_layer(layer1);
    for (i, slice) in pages.iter().enumerate() {
        if i > 0 {
            let (page, layer) = doc.add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER_NAME);
            current_layer = doc.get_page(page).get_layer(layer);
        }
        if slice.first {
            draw_header(&current_layer, &document.header, &fonts);
        }
        draw_table(
            &current_layer,
            &layout,
            &document.rows[slice.rows.clone()],
            slice.table_top_mm,
            &fonts,
        );
    }

    if let Some(last) = pages.last() {
        let placement = layout.signature_placement(last);
        if placement.new_page {
            let (page, layer) = doc.add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER_NAME);
            current_layer = doc.get_page(page).get_layer(layer);
        }
        draw_signatures(&current_layer, &document.signatures, placement.line_y_mm, &fonts);
    }

    let file = File::create(output_path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| BrigadaError::PdfGeneration(format!("no se pudo guardar: {:?}", e)))?;

    Ok(())
}
