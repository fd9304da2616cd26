//! Catálogo en archivo JSON local (arreglo de filas de `inventario`)

use super::{sort_items, CatalogQuery, CatalogStore};
use crate::error::{BrigadaError, Result};
use async_trait::async_trait;
use brigada_common::{InventoryItem, ItemDraft};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug)]
pub struct JsonCatalog {
    path: PathBuf,
    /// Serializa lectura-modificación-escritura dentro del proceso
    lock: Mutex<()>,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Archivo ausente = catálogo vacío
    fn load(&self) -> Result<Vec<InventoryItem>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn save(&self, items: &[InventoryItem]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(writer, items)?;
        Ok(())
    }

    fn modify<T>(&self, f: impl FnOnce(&mut Vec<InventoryItem>) -> Result<T>) -> Result<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| BrigadaError::Catalog("bloqueo del catálogo envenenado".into()))?;
        let mut items = self.load()?;
        let out = f(&mut items)?;
        self.save(&items)?;
        Ok(out)
    }
}

#[async_trait]
impl CatalogStore for JsonCatalog {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<InventoryItem>> {
        let mut items: Vec<InventoryItem> = self
            .load()?
            .into_iter()
            .filter(|item| query.matches(item))
            .collect();
        sort_items(&mut items, query.order);
        Ok(items)
    }

    async fn get(&self, id: i64) -> Result<InventoryItem> {
        self.load()?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(BrigadaError::ItemNotFound(id))
    }

    async fn insert(&self, draft: ItemDraft) -> Result<InventoryItem> {
        self.modify(|items| {
            let id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
            let item = draft.into_item(id)?;
            items.push(item.clone());
            Ok(item)
        })
    }

    async fn set_decommission_date(&self, id: i64, date: NaiveDate) -> Result<InventoryItem> {
        self.modify(|items| {
            let item = items
                .iter_mut()
                .find(|item| item.id == id)
                .ok_or(BrigadaError::ItemNotFound(id))?;
            item.decommissioned_on = Some(date);
            Ok(item.clone())
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.modify(|items| {
            let before = items.len();
            items.retain(|item| item.id != id);
            if items.len() == before {
                return Err(BrigadaError::ItemNotFound(id));
            }
            Ok(())
        })
    }
}
