//! Tipos del catálogo de inventario
//!
//! Los nombres de campo en el cable siguen las columnas de la tabla
//! `inventario` del backend (en castellano); en Rust se usan nombres propios.
//!
//! - InventoryItem: un bien o grupo de bienes registrado
//! - Category: macro-categoría, con su matriz de campos opcionales
//! - ItemDraft: formulario de alta, validado contra la categoría

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro-categoría del inventario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Movilidad")]
    Vehicles,
    #[serde(rename = "Estructural")]
    Structural,
    #[serde(rename = "Indumentaria")]
    Apparel,
    #[serde(rename = "Comunicaciones")]
    Communications,
    #[serde(rename = "Materiales")]
    Materials,
    #[serde(rename = "Mobiliario")]
    Furniture,
}

/// Campo opcional del formulario, dependiente de la categoría
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Size,
    Color,
    Serial,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Vehicles,
        Category::Structural,
        Category::Apparel,
        Category::Communications,
        Category::Materials,
        Category::Furniture,
    ];

    /// Identificador almacenado en `categoria_macro`
    pub fn id(&self) -> &'static str {
        match self {
            Category::Vehicles => "Movilidad",
            Category::Structural => "Estructural",
            Category::Apparel => "Indumentaria",
            Category::Communications => "Comunicaciones",
            Category::Materials => "Materiales",
            Category::Furniture => "Mobiliario",
        }
    }

    /// Etiqueta para pantalla e informes
    pub fn label(&self) -> &'static str {
        match self {
            Category::Vehicles => "Parque Automotor",
            Category::Structural => "Estructural / Fuego",
            Category::Apparel => "Indumentaria Diaria",
            Category::Communications => "Comunicaciones",
            Category::Materials => "Materiales y Herramientas",
            Category::Furniture => "Muebles y Oficina",
        }
    }

    /// Campos opcionales que admite el alta en esta categoría
    pub fn optional_fields(&self) -> &'static [ItemField] {
        match self {
            Category::Apparel | Category::Structural => &[ItemField::Size, ItemField::Color],
            Category::Vehicles | Category::Communications => &[ItemField::Serial],
            Category::Materials => &[ItemField::Size],
            Category::Furniture => &[],
        }
    }

    pub fn allows(&self, field: ItemField) -> bool {
        self.optional_fields().contains(&field)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.id().to_lowercase() == wanted)
            .ok_or_else(|| {
                let ids: Vec<&str> = Category::ALL.iter().map(|c| c.id()).collect();
                format!("Categoría desconocida: {}. Opciones: {}", s, ids.join(", "))
            })
    }
}

impl ItemField {
    /// Columna en la tabla `inventario`
    pub fn column(&self) -> &'static str {
        match self {
            ItemField::Size => "talle",
            ItemField::Color => "color",
            ItemField::Serial => "serial",
        }
    }

    /// Etiqueta del formulario; la medida de materiales se rotula distinto
    pub fn label(&self, category: Category) -> &'static str {
        match (self, category) {
            (ItemField::Size, Category::Materials) => "Medida / Diámetro",
            (ItemField::Size, _) => "Talle / Medida",
            (ItemField::Color, _) => "Color",
            (ItemField::Serial, _) => "Serial / Patente",
        }
    }
}

/// Origen de la adquisición (texto libre con valores conocidos)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Origin {
    #[default]
    Purchase,
    Donation,
    Loan,
    Ministry,
    Other(String),
}

impl Origin {
    pub fn label(&self) -> &str {
        match self {
            Origin::Purchase => "Compra",
            Origin::Donation => "Donacion",
            Origin::Loan => "Prestamo",
            Origin::Ministry => "Ministerio",
            Origin::Other(s) => s,
        }
    }
}

impl From<String> for Origin {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "compra" => Origin::Purchase,
            "donacion" | "donación" => Origin::Donation,
            "prestamo" | "préstamo" => Origin::Loan,
            "ministerio" => Origin::Ministry,
            _ => Origin::Other(s.trim().to_string()),
        }
    }
}

impl From<Origin> for String {
    fn from(o: Origin) -> Self {
        o.label().to_string()
    }
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("El origen no puede estar vacío".into());
        }
        Ok(Origin::from(s.to_string()))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn default_quantity() -> u32 {
    1
}

/// Ítem del inventario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "marca", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(rename = "modelo", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(rename = "talle", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Existencia registrada; una salida no la modifica
    #[serde(rename = "cantidad", default = "default_quantity")]
    pub quantity: u32,

    #[serde(rename = "origen", default)]
    pub origin: Origin,

    #[serde(rename = "categoria_macro")]
    pub category: Category,

    #[serde(rename = "fecha_alta", default)]
    pub acquired_on: Option<NaiveDate>,

    /// Fecha de baja: el ítem queda inactivo sin borrarse
    #[serde(rename = "fecha_baja", default)]
    pub decommissioned_on: Option<NaiveDate>,

    /// Foto del ítem (URL pública del almacenamiento)
    #[serde(rename = "imagen_url", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl InventoryItem {
    pub fn is_active(&self) -> bool {
        self.decommissioned_on.is_none()
    }

    /// "Estado" de los informes
    pub fn status_label(&self) -> &'static str {
        if self.is_active() {
            "Operativo"
        } else {
            "Baja"
        }
    }

    /// Marca y modelo en una sola columna
    pub fn brand_model(&self) -> String {
        let parts: Vec<&str> = [self.brand.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        parts.join(" ")
    }

    pub fn field_value(&self, field: ItemField) -> Option<&str> {
        match field {
            ItemField::Size => self.size.as_deref(),
            ItemField::Color => self.color.as_deref(),
            ItemField::Serial => self.serial.as_deref(),
        }
    }

    /// Coincidencia de búsqueda global (el término ya viene en minúsculas)
    pub fn matches_search(&self, term_lower: &str) -> bool {
        [
            Some(self.name.as_str()),
            self.brand.as_deref(),
            self.model.as_deref(),
            self.serial.as_deref(),
            self.color.as_deref(),
            self.size.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|v| v.to_lowercase().contains(term_lower))
    }
}

/// Formulario de alta
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "marca", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(rename = "modelo", skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(rename = "talle", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(rename = "cantidad", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    #[serde(rename = "origen", skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,

    #[serde(rename = "categoria_macro", skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(rename = "fecha_alta", skip_serializing_if = "Option::is_none")]
    pub acquired_on: Option<NaiveDate>,

    /// Foto del ítem (URL pública del almacenamiento)
    #[serde(rename = "imagen_url", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ItemDraft {
    /// Valida el alta contra la matriz de la categoría y completa los valores
    /// por defecto (cantidad 1, origen Compra, fecha de alta = hoy).
    pub fn validated(self, today: NaiveDate) -> Result<ItemDraft> {
        let category = self
            .category
            .ok_or_else(|| Error::Validation("Falta la categoría".into()))?;

        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::Validation("La descripción / nombre es obligatoria".into()));
        }

        let draft = ItemDraft {
            name,
            brand: clean(self.brand),
            model: clean(self.model),
            size: clean(self.size),
            serial: clean(self.serial),
            color: clean(self.color),
            quantity: Some(self.quantity.unwrap_or(1)),
            origin: Some(self.origin.unwrap_or_default()),
            category: Some(category),
            acquired_on: Some(self.acquired_on.unwrap_or(today)),
            photo_url: clean(self.photo_url),
        };

        for field in [ItemField::Size, ItemField::Color, ItemField::Serial] {
            if draft.field_value(field).is_some() && !category.allows(field) {
                return Err(Error::Validation(format!(
                    "El campo «{}» no corresponde a la categoría {}",
                    field.label(category),
                    category.label()
                )));
            }
        }

        Ok(draft)
    }

    fn field_value(&self, field: ItemField) -> Option<&str> {
        match field {
            ItemField::Size => self.size.as_deref(),
            ItemField::Color => self.color.as_deref(),
            ItemField::Serial => self.serial.as_deref(),
        }
    }

    /// Convierte un alta ya validada en ítem con el id asignado por el almacén
    pub fn into_item(self, id: i64) -> Result<InventoryItem> {
        let category = self
            .category
            .ok_or_else(|| Error::Validation("Falta la categoría".into()))?;
        Ok(InventoryItem {
            id,
            name: self.name,
            brand: self.brand,
            model: self.model,
            size: self.size,
            serial: self.serial,
            color: self.color,
            quantity: self.quantity.unwrap_or(1),
            origin: self.origin.unwrap_or_default(),
            category,
            acquired_on: self.acquired_on,
            decommissioned_on: None,
            photo_url: self.photo_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn test_category_roundtrip_ids() {
        for cat in Category::ALL {
            assert_eq!(cat.id().parse::<Category>().unwrap(), cat);
        }
        assert_eq!("movilidad".parse::<Category>().unwrap(), Category::Vehicles);
        assert!("Cocina".parse::<Category>().is_err());
    }

    #[test]
    fn test_field_matrix() {
        assert!(Category::Apparel.allows(ItemField::Color));
        assert!(Category::Structural.allows(ItemField::Size));
        assert!(!Category::Vehicles.allows(ItemField::Size));
        assert!(Category::Communications.allows(ItemField::Serial));
        assert_eq!(Category::Materials.optional_fields(), &[ItemField::Size]);
        assert!(Category::Furniture.optional_fields().is_empty());
        assert_eq!(ItemField::Size.label(Category::Materials), "Medida / Diámetro");
    }

    #[test]
    fn test_item_from_table_row() {
        let json = r#"{
            "id": 4,
            "nombre": "Casco Bullard",
            "marca": "Bullard",
            "modelo": null,
            "talle": "L",
            "cantidad": 10,
            "origen": "Donación",
            "categoria_macro": "Estructural",
            "fecha_alta": "2024-05-02",
            "fecha_baja": null
        }"#;
        let item: InventoryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.name, "Casco Bullard");
        assert_eq!(item.origin, Origin::Donation);
        assert_eq!(item.category, Category::Structural);
        assert!(item.is_active());
        assert_eq!(item.brand_model(), "Bullard");
        assert_eq!(item.photo_url, None);
    }

    #[test]
    fn test_photo_url_column() {
        let json = r#"{
            "id": 9,
            "nombre": "Autobomba Unidad 3",
            "cantidad": 1,
            "origen": "Ministerio",
            "categoria_macro": "Movilidad",
            "serial": "AB123CD",
            "imagen_url": "https://cdn.example/inventario/unidad3.jpg"
        }"#;
        let item: InventoryItem = serde_json::from_str(json).unwrap();
        assert_eq!(
            item.photo_url.as_deref(),
            Some("https://cdn.example/inventario/unidad3.jpg")
        );

        let row = serde_json::to_value(&item).unwrap();
        assert_eq!(row["imagen_url"], "https://cdn.example/inventario/unidad3.jpg");
        assert!(row.get("imagenes").is_none());
    }

    #[test]
    fn test_draft_without_photo_omits_column() {
        let draft = ItemDraft {
            name: "Hacha".into(),
            category: Some(Category::Materials),
            ..Default::default()
        };
        let body = serde_json::to_value(&draft).unwrap();
        let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"nombre"));
        assert!(keys.contains(&"categoria_macro"));

        let with_photo = ItemDraft {
            photo_url: Some("  https://cdn.example/hacha.jpg ".into()),
            ..draft
        };
        let validated = with_photo.validated(today()).unwrap();
        assert_eq!(validated.photo_url.as_deref(), Some("https://cdn.example/hacha.jpg"));
    }

    #[test]
    fn test_unknown_origin_is_kept() {
        let origin = Origin::from("Municipio".to_string());
        assert_eq!(origin, Origin::Other("Municipio".into()));
        assert_eq!(String::from(origin), "Municipio");
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        let draft = ItemDraft {
            name: "Manguera 45mm".into(),
            brand: Some("Armtex".into()),
            category: Some(Category::Materials),
            ..Default::default()
        };
        let item = draft.validated(today()).unwrap().into_item(1).unwrap();
        assert!(item.matches_search("armt"));
        assert!(item.matches_search("manguera"));
        assert!(!item.matches_search("casco"));
    }

    #[test]
    fn test_draft_defaults() {
        let draft = ItemDraft {
            name: "  Escritorio  ".into(),
            brand: Some("   ".into()),
            category: Some(Category::Furniture),
            ..Default::default()
        };
        let validated = draft.validated(today()).unwrap();
        assert_eq!(validated.name, "Escritorio");
        assert_eq!(validated.brand, None);
        assert_eq!(validated.quantity, Some(1));
        assert_eq!(validated.origin, Some(Origin::Purchase));
        assert_eq!(validated.acquired_on, Some(today()));
    }

    #[test]
    fn test_draft_rejects_field_outside_category() {
        let draft = ItemDraft {
            name: "Autobomba".into(),
            color: Some("Rojo".into()),
            category: Some(Category::Vehicles),
            ..Default::default()
        };
        let err = draft.validated(today()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(format!("{}", err).contains("Color"));
    }

    #[test]
    fn test_draft_requires_name_and_category() {
        let no_name = ItemDraft {
            category: Some(Category::Apparel),
            ..Default::default()
        };
        assert!(no_name.validated(today()).is_err());

        let no_category = ItemDraft {
            name: "Remera".into(),
            ..Default::default()
        };
        assert!(no_category.validated(today()).is_err());
    }
}
