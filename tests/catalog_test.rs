//! Catálogo local, filtros y descarte de respuestas vencidas

use async_trait::async_trait;
use brigada_common::{Category, InventoryItem, ItemDraft, Origin};
use brigada_inventario::catalog::{
    self, debounced_fetch, CatalogBrowser, CatalogQuery, CatalogStore, FetchGeneration, JsonCatalog,
};
use brigada_inventario::error::{BrigadaError, Result};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn draft(name: &str, category: Category) -> ItemDraft {
    ItemDraft {
        name: name.to_string(),
        category: Some(category),
        ..Default::default()
    }
}

fn item(id: i64, name: &str, category: Category) -> InventoryItem {
    InventoryItem {
        id,
        name: name.to_string(),
        brand: None,
        model: None,
        size: None,
        serial: None,
        color: None,
        quantity: 1,
        origin: Origin::Purchase,
        category,
        acquired_on: None,
        decommissioned_on: None,
        photo_url: None,
    }
}

#[tokio::test]
async fn test_json_catalog_register_and_fetch() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = JsonCatalog::new(dir.path().join("inventario.json"));

    let first = catalog::register(&store, draft("Hacha", Category::Materials), date(2024, 1, 5))
        .await
        .unwrap();
    let second = catalog::register(&store, draft("Casco Bullard", Category::Structural), date(2025, 3, 1))
        .await
        .unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(first.origin, Origin::Purchase);
    assert_eq!(first.acquired_on, Some(date(2024, 1, 5)));

    let materials = store.fetch(&CatalogQuery::for_category(Category::Materials)).await.unwrap();
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0].name, "Hacha");

    // búsqueda global: ignora la categoría
    let query = CatalogQuery {
        category: Some(Category::Materials),
        search: Some("bull".into()),
        ..Default::default()
    };
    let found = store.fetch(&query).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 2);
}

#[tokio::test]
async fn test_register_rejects_field_outside_category() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = JsonCatalog::new(dir.path().join("inventario.json"));

    let mut chair = draft("Silla", Category::Furniture);
    chair.serial = Some("X-1".into());
    let result = catalog::register(&store, chair, date(2026, 1, 1)).await;
    assert!(matches!(result, Err(BrigadaError::Common(_))));
    assert!(store.fetch(&CatalogQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_decommission_and_delete() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = JsonCatalog::new(dir.path().join("inventario.json"));
    let truck = catalog::register(&store, draft("Unidad 3", Category::Vehicles), date(2020, 6, 1))
        .await
        .unwrap();

    let retired = catalog::decommission(&store, truck.id, date(2026, 2, 2)).await.unwrap();
    assert!(!retired.is_active());
    assert!(matches!(
        catalog::decommission(&store, truck.id, date(2026, 2, 3)).await,
        Err(BrigadaError::AlreadyDecommissioned(_))
    ));

    // la flota sólo muestra activos
    assert!(store.fetch(&CatalogQuery::fleet()).await.unwrap().is_empty());

    store.delete(truck.id).await.unwrap();
    assert!(matches!(store.get(truck.id).await, Err(BrigadaError::ItemNotFound(_))));
    assert!(matches!(store.delete(truck.id).await, Err(BrigadaError::ItemNotFound(_))));
}

/// Almacén de prueba: puede fallar o emitir un filtro nuevo en plena consulta
struct ScriptedStore {
    items: Mutex<Vec<InventoryItem>>,
    fail: AtomicBool,
    supersede: Mutex<Option<FetchGeneration>>,
}

impl ScriptedStore {
    fn new(items: Vec<InventoryItem>) -> Self {
        Self {
            items: Mutex::new(items),
            fail: AtomicBool::new(false),
            supersede: Mutex::new(None),
        }
    }
}

#[async_trait]
impl CatalogStore for ScriptedStore {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<InventoryItem>> {
        if let Some(generations) = self.supersede.lock().unwrap().take() {
            generations.issue();
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(BrigadaError::Catalog("sin conexión".into()));
        }
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| query.matches(i))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<InventoryItem> {
        Err(BrigadaError::ItemNotFound(id))
    }

    async fn insert(&self, _draft: ItemDraft) -> Result<InventoryItem> {
        Err(BrigadaError::Catalog("sólo lectura".into()))
    }

    async fn set_decommission_date(&self, id: i64, _date: NaiveDate) -> Result<InventoryItem> {
        Err(BrigadaError::ItemNotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        Err(BrigadaError::ItemNotFound(id))
    }
}

#[tokio::test]
async fn test_superseded_ticket_is_never_applied() {
    let store = ScriptedStore::new(vec![item(1, "Hacha", Category::Materials)]);
    let generations = FetchGeneration::default();

    let stale = generations.issue();
    let fresh = generations.issue();
    let query = CatalogQuery::for_category(Category::Materials);

    assert!(debounced_fetch(&store, &query, &stale, Duration::ZERO).await.unwrap().is_none());
    let applied = debounced_fetch(&store, &query, &fresh, Duration::ZERO).await.unwrap();
    assert_eq!(applied.map(|v| v.len()), Some(1));
}

#[tokio::test]
async fn test_response_arriving_after_new_filter_is_discarded() {
    let store = Arc::new(ScriptedStore::new(vec![item(1, "Hacha", Category::Materials)]));
    let mut browser = CatalogBrowser::new(
        Arc::clone(&store),
        CatalogQuery::for_category(Category::Materials),
        Duration::ZERO,
    );

    *store.supersede.lock().unwrap() = Some(browser.generations());
    assert!(!browser.refresh().await.unwrap());
    assert!(browser.visible().is_empty());

    assert!(browser.refresh().await.unwrap());
    assert_eq!(browser.visible().len(), 1);
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_list() {
    let store = Arc::new(ScriptedStore::new(vec![
        item(1, "Hacha", Category::Materials),
        item(2, "Casco", Category::Structural),
    ]));
    let mut browser = CatalogBrowser::new(
        Arc::clone(&store),
        CatalogQuery::for_category(Category::Materials),
        Duration::ZERO,
    );
    browser.refresh().await.unwrap();
    assert_eq!(browser.visible()[0].id, 1);

    store.fail.store(true, Ordering::SeqCst);
    browser.set_category(Category::Structural);
    assert!(browser.refresh().await.is_err());
    assert_eq!(browser.visible().len(), 1);
    assert_eq!(browser.visible()[0].id, 1);
}

#[tokio::test]
async fn test_failed_fetch_keeps_label_of_previous_list() {
    let store = Arc::new(ScriptedStore::new(vec![
        item(1, "Hacha", Category::Materials),
        item(2, "Casco", Category::Structural),
    ]));
    let mut browser = CatalogBrowser::new(
        Arc::clone(&store),
        CatalogQuery::for_category(Category::Materials),
        Duration::ZERO,
    );
    browser.refresh().await.unwrap();
    assert_eq!(browser.shown_query().category, Some(Category::Materials));

    store.fail.store(true, Ordering::SeqCst);
    browser.set_category(Category::Structural);
    assert!(browser.refresh().await.is_err());
    assert_eq!(browser.query().category, Some(Category::Structural));
    assert_eq!(browser.shown_query().category, Some(Category::Materials));
    assert_eq!(
        browser.shown_query().describe(),
        CatalogQuery::for_category(Category::Materials).describe()
    );

    store.fail.store(false, Ordering::SeqCst);
    assert!(browser.refresh().await.unwrap());
    assert_eq!(browser.shown_query().category, Some(Category::Structural));
    assert_eq!(browser.visible()[0].id, 2);
}

#[tokio::test]
async fn test_debounce_lets_only_last_keystroke_through() {
    let store = ScriptedStore::new(vec![item(1, "Casco Bullard", Category::Structural)]);
    let generations = FetchGeneration::default();
    let query = CatalogQuery::for_search("cas");

    let typed_c = generations.issue();
    let typed_ca = generations.issue();
    let typed_cas = generations.issue();
    let quiet = Duration::from_millis(20);

    let (a, b, c) = tokio::join!(
        debounced_fetch(&store, &query, &typed_c, quiet),
        debounced_fetch(&store, &query, &typed_ca, quiet),
        debounced_fetch(&store, &query, &typed_cas, quiet),
    );
    assert!(a.unwrap().is_none());
    assert!(b.unwrap().is_none());
    assert_eq!(c.unwrap().map(|v| v.len()), Some(1));
}
