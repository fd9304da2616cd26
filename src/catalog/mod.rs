//! Catálogo de inventario
//!
//! `CatalogStore` es la frontera con el almacenamiento: un archivo JSON local
//! (`JsonCatalog`) o la tabla `inventario` del backend alojado (`RestCatalog`).

pub mod browser;
pub mod file;
pub mod remote;

pub use browser::{debounced_fetch, CatalogBrowser, FetchGeneration, FetchTicket};
pub use file::JsonCatalog;
pub use remote::RestCatalog;

use crate::error::{BrigadaError, Result};
use async_trait::async_trait;
use brigada_common::{Category, InventoryItem, ItemDraft};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Largo mínimo (exclusivo) para que el término active la búsqueda global
pub const MIN_SEARCH_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogOrder {
    /// Fecha de alta descendente (sin fecha al final)
    #[default]
    AcquiredDesc,
    /// Alfabético, para la galería pública
    NameAsc,
}

/// Filtro de consulta del catálogo
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub include_decommissioned: bool,
    pub order: CatalogOrder,
}

impl CatalogQuery {
    pub fn for_category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Default::default()
        }
    }

    pub fn for_search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Default::default()
        }
    }

    /// Flota pública: móviles activos por nombre
    pub fn fleet() -> Self {
        Self {
            category: Some(Category::Vehicles),
            order: CatalogOrder::NameAsc,
            ..Default::default()
        }
    }

    /// Término efectivo (minúsculas) si supera el largo mínimo
    pub fn effective_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|t| t.chars().count() > MIN_SEARCH_CHARS)
            .map(str::to_lowercase)
    }

    /// Con búsqueda activa se ignora la categoría (búsqueda global)
    pub fn matches(&self, item: &InventoryItem) -> bool {
        if !self.include_decommissioned && !item.is_active() {
            return false;
        }
        match (self.effective_search(), self.category) {
            (Some(term), _) => item.matches_search(&term),
            (None, Some(category)) => item.category == category,
            (None, None) => true,
        }
    }

    pub fn describe(&self) -> String {
        match (self.effective_search(), self.category) {
            (Some(term), _) => format!("búsqueda «{}»", term),
            (None, Some(category)) => category.label().to_string(),
            (None, None) => "todo el inventario".to_string(),
        }
    }
}

/// Ordena según la consulta; desempata por id descendente
pub fn sort_items(items: &mut [InventoryItem], order: CatalogOrder) {
    match order {
        CatalogOrder::AcquiredDesc => items.sort_by(|a, b| {
            let by_date = match (a.acquired_on, b.acquired_on) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_date.then(b.id.cmp(&a.id))
        }),
        CatalogOrder::NameAsc => items.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(b.id.cmp(&a.id))
        }),
    }
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<InventoryItem>>;

    async fn get(&self, id: i64) -> Result<InventoryItem>;

    /// Guarda un alta ya validada; el almacén asigna el id
    async fn insert(&self, draft: ItemDraft) -> Result<InventoryItem>;

    async fn set_decommission_date(&self, id: i64, date: NaiveDate) -> Result<InventoryItem>;

    async fn delete(&self, id: i64) -> Result<()>;
}

/// Alta de un ítem: valida contra la categoría y lo guarda
pub async fn register<S: CatalogStore + ?Sized>(
    store: &S,
    draft: ItemDraft,
    today: NaiveDate,
) -> Result<InventoryItem> {
    let draft = draft.validated(today)?;
    let item = store.insert(draft).await?;
    tracing::info!(id = item.id, categoria = %item.category, "ítem registrado");
    Ok(item)
}

/// Baja: marca la fecha sin borrar el registro
pub async fn decommission<S: CatalogStore + ?Sized>(
    store: &S,
    id: i64,
    date: NaiveDate,
) -> Result<InventoryItem> {
    let item = store.get(id).await?;
    if !item.is_active() {
        return Err(BrigadaError::AlreadyDecommissioned(id));
    }
    let item = store.set_decommission_date(id, date).await?;
    tracing::info!(id, fecha = %date, "ítem dado de baja");
    Ok(item)
}
