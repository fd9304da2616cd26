//! Líneas del remito de salida

use crate::types::InventoryItem;
use serde::{Deserialize, Serialize};

/// Ítem + cantidad de salida elegida por el operador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestLine {
    #[serde(flatten)]
    pub item: InventoryItem,

    #[serde(rename = "cantidadSalida")]
    pub dispatch_quantity: u32,
}

/// Fila de la tabla del remito: cantidad / descripción / marca-modelo / serial u origen
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestRow {
    pub quantity: u32,
    pub description: String,
    pub brand_model: String,
    pub serial_or_origin: String,
}

fn or_dash(value: String) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value
    }
}

impl From<&ManifestLine> for ManifestRow {
    fn from(line: &ManifestLine) -> Self {
        let item = &line.item;
        let serial_or_origin = item
            .serial
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| item.origin.label().to_string());

        Self {
            quantity: line.dispatch_quantity,
            description: or_dash(item.name.clone()),
            brand_model: or_dash(item.brand_model()),
            serial_or_origin: or_dash(serial_or_origin),
        }
    }
}

impl ManifestRow {
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.quantity.to_string(),
            self.description.clone(),
            self.brand_model.clone(),
            self.serial_or_origin.clone(),
        ]
    }
}
