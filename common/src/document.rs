//! Documento tabular genérico: encabezado institucional + tabla + firmas.
//!
//! El remito y el informe de inventario se arman acá y los escritores
//! (PDF / Excel) sólo saben dibujar un `TableDocument`.

use crate::layout::{ColumnSpec, INVENTORY_COLUMNS, MANIFEST_COLUMNS};
use crate::manifest::{ManifestLine, ManifestRow};
use crate::types::{Category, InventoryItem};
use chrono::{NaiveDate, NaiveDateTime};

pub const DEFAULT_INSTITUTION: &str = "ASOCIACIÓN BOMBEROS VOLUNTARIOS";
pub const DEFAULT_BRIGADE: &str = "BUTA RANQUIL - CENTRAL 27";

pub const MANIFEST_TITLE: &str = "Remito de salida de material";
pub const MANIFEST_SIGNATURES: [&str; 2] = ["Entrega", "Recibe"];
pub const INVENTORY_SIGNATURES: [&str; 1] = ["Firma Responsable"];

/// Encabezado institucional
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentHeader {
    pub institution: String,
    pub brigade: String,
    pub title: String,
    pub issued_at: NaiveDateTime,
}

impl DocumentHeader {
    pub fn new(title: impl Into<String>, issued_at: NaiveDateTime) -> Self {
        Self {
            institution: DEFAULT_INSTITUTION.to_string(),
            brigade: DEFAULT_BRIGADE.to_string(),
            title: title.into(),
            issued_at,
        }
    }

    pub fn with_institution(mut self, institution: &str, brigade: &str) -> Self {
        self.institution = institution.to_string();
        self.brigade = brigade.to_string();
        self
    }

    /// "Fecha de emisión: 19/10/2026 14:30"
    pub fn issued_line(&self) -> String {
        format!(
            "Fecha de emisión: {}",
            self.issued_at.format("%d/%m/%Y %H:%M")
        )
    }
}

#[derive(Debug, Clone)]
pub struct TableDocument {
    pub header: DocumentHeader,
    pub columns: &'static [ColumnSpec],
    pub rows: Vec<Vec<String>>,
    pub signatures: Vec<String>,
    /// Nombre de archivo sin extensión
    pub file_stem: String,
}

/// Remito de salida a partir de las líneas confirmadas
pub fn manifest_document(lines: &[ManifestLine], header: DocumentHeader) -> TableDocument {
    let rows = lines.iter().map(|l| ManifestRow::from(l).cells()).collect();
    let file_stem = manifest_file_stem(header.issued_at);
    TableDocument {
        header,
        columns: MANIFEST_COLUMNS,
        rows,
        signatures: MANIFEST_SIGNATURES.iter().map(|s| s.to_string()).collect(),
        file_stem,
    }
}

/// Listado de inventario de una categoría
pub fn inventory_document(
    items: &[InventoryItem],
    category: Category,
    header: DocumentHeader,
) -> TableDocument {
    let rows = items
        .iter()
        .map(|item| {
            let brand_model = item.brand_model();
            vec![
                item.quantity.to_string(),
                item.name.clone(),
                if brand_model.is_empty() { "-".into() } else { brand_model },
                item.serial.clone().filter(|s| !s.trim().is_empty()).unwrap_or_else(|| "-".into()),
                item.status_label().to_string(),
            ]
        })
        .collect();
    let file_stem = inventory_file_stem(category, header.issued_at.date());
    TableDocument {
        header,
        columns: INVENTORY_COLUMNS,
        rows,
        signatures: INVENTORY_SIGNATURES.iter().map(|s| s.to_string()).collect(),
        file_stem,
    }
}

/// Título del informe de una categoría
pub fn inventory_title(category: Category) -> String {
    format!("Listado de Inventario: {}", category.label())
}

/// `Remito_Salida_2026-10-19_14-30-05`
pub fn manifest_file_stem(issued_at: NaiveDateTime) -> String {
    format!("Remito_Salida_{}", issued_at.format("%Y-%m-%d_%H-%M-%S"))
}

/// `Inventario_Movilidad_2026-10-19`
pub fn inventory_file_stem(category: Category, date: NaiveDate) -> String {
    format!("Inventario_{}_{}", category.id(), date.format("%Y-%m-%d"))
}
