//! Vista filtrada del catálogo.
//!
//! Cada cambio de filtro emite un ticket con un número de generación. Una
//! consulta sólo se aplica si su ticket sigue siendo el último emitido, así
//! una respuesta lenta de un filtro anterior nunca pisa la más nueva.

use super::{CatalogQuery, CatalogStore};
use crate::error::Result;
use brigada_common::{Category, InventoryItem};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Contador compartido de generaciones de consulta
#[derive(Debug, Clone, Default)]
pub struct FetchGeneration(Arc<AtomicU64>);

impl FetchGeneration {
    /// Emite un ticket nuevo; todos los anteriores quedan vencidos
    pub fn issue(&self) -> FetchTicket {
        let generation = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        FetchTicket {
            generation,
            latest: Arc::clone(&self.0),
        }
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

/// Espera el período de calma y consulta; `None` si el ticket quedó vencido
/// antes de consultar o mientras llegaba la respuesta.
pub async fn debounced_fetch<S: CatalogStore + ?Sized>(
    store: &S,
    query: &CatalogQuery,
    ticket: &FetchTicket,
    quiet: Duration,
) -> Result<Option<Vec<InventoryItem>>> {
    if !quiet.is_zero() {
        tokio::time::sleep(quiet).await;
    }
    if !ticket.is_current() {
        tracing::debug!(generation = ticket.generation(), "consulta reemplazada antes de enviarse");
        return Ok(None);
    }

    let items = store.fetch(query).await?;

    if !ticket.is_current() {
        tracing::debug!(generation = ticket.generation(), "respuesta vencida descartada");
        return Ok(None);
    }
    Ok(Some(items))
}

pub struct CatalogBrowser<S: CatalogStore + ?Sized> {
    store: Arc<S>,
    generations: FetchGeneration,
    quiet: Duration,
    query: CatalogQuery,
    visible: Vec<InventoryItem>,
    /// Filtro con el que se obtuvo `visible`
    shown_query: CatalogQuery,
}

impl<S: CatalogStore + ?Sized> CatalogBrowser<S> {
    pub fn new(store: Arc<S>, initial: CatalogQuery, quiet: Duration) -> Self {
        Self {
            store,
            generations: FetchGeneration::default(),
            quiet,
            shown_query: initial.clone(),
            query: initial,
            visible: Vec::new(),
        }
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn visible(&self) -> &[InventoryItem] {
        &self.visible
    }

    /// Filtro que corresponde a la lista visible. Difiere de [`Self::query`]
    /// cuando la última consulta falló o quedó vencida.
    pub fn shown_query(&self) -> &CatalogQuery {
        &self.shown_query
    }

    /// Manija para que otros productores de filtros venzan consultas en curso
    pub fn generations(&self) -> FetchGeneration {
        self.generations.clone()
    }

    /// Cambiar de pestaña limpia la búsqueda
    pub fn set_category(&mut self, category: Category) {
        self.query.category = Some(category);
        self.query.search = None;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.query.search = if term.trim().is_empty() { None } else { Some(term) };
    }

    /// Vuelve a consultar con el filtro actual.
    ///
    /// `Ok(false)` si la respuesta quedó vencida. Si la consulta falla se
    /// conserva la lista anterior y se devuelve el error.
    pub async fn refresh(&mut self) -> Result<bool> {
        let ticket = self.generations.issue();
        let outcome = debounced_fetch(self.store.as_ref(), &self.query, &ticket, self.quiet).await;
        match outcome {
            Ok(Some(items)) => {
                tracing::debug!(count = items.len(), filtro = %self.query.describe(), "catálogo actualizado");
                self.visible = items;
                self.shown_query = self.query.clone();
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                tracing::warn!(error = %e, "no se pudo consultar el catálogo; se mantiene la lista anterior");
                Err(e)
            }
        }
    }
}
