//! Brigada Common Library
//!
//! Tipos y máquinas de estado del inventario del cuartel, sin E/S:
//! catálogo, selección, diálogo de salida y diseño de documentos.

pub mod types;
pub mod selection;
pub mod checkout;
pub mod manifest;
pub mod document;
pub mod layout;
pub mod error;
pub mod export;

pub use types::{Category, InventoryItem, ItemDraft, ItemField, Origin};
pub use selection::SelectionSet;
pub use checkout::{normalize_quantity, CheckoutDialog, CheckoutState, QuantityPolicy};
pub use manifest::{ManifestLine, ManifestRow};
pub use document::{DocumentHeader, TableDocument};
pub use error::{Error, Result};
