//! Catálogo en el backend alojado (API REST estilo PostgREST).
//!
//! Filtros: `categoria_macro=eq.X`, búsqueda `or=(campo.ilike.*t*,...)`,
//! `fecha_baja=is.null` para activos; orden por `fecha_alta` descendente.

use super::{CatalogOrder, CatalogQuery, CatalogStore};
use crate::error::{BrigadaError, Result};
use async_trait::async_trait;
use brigada_common::{InventoryItem, ItemDraft};
use chrono::NaiveDate;
use regex::Regex;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::json;
use std::time::Duration;

const TABLE: &str = "inventario";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Columnas que cubre la búsqueda global
const SEARCH_COLUMNS: &[&str] = &["nombre", "marca", "modelo", "serial", "color", "talle"];

#[derive(Debug, Clone)]
pub struct RestCatalog {
    http: Client,
    base_url: String,
    api_key: String,
}

/// Quita los caracteres con significado en la sintaxis de filtros
pub fn sanitize_search(term: &str) -> String {
    lazy_static::lazy_static! {
        static ref RESERVED: Regex = Regex::new(r#"[,()*%:"\\]"#).unwrap();
    }
    RESERVED.replace_all(term, "").trim().to_string()
}

/// Parámetros de consulta para `fetch`
pub fn fetch_params(query: &CatalogQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];

    match (query.effective_search().map(|t| sanitize_search(&t)), query.category) {
        (Some(term), _) if !term.is_empty() => {
            let clauses: Vec<String> = SEARCH_COLUMNS
                .iter()
                .map(|col| format!("{}.ilike.*{}*", col, term))
                .collect();
            params.push(("or".into(), format!("({})", clauses.join(","))));
        }
        (_, Some(category)) => {
            params.push(("categoria_macro".into(), format!("eq.{}", category.id())));
        }
        _ => {}
    }

    if !query.include_decommissioned {
        params.push(("fecha_baja".into(), "is.null".into()));
    }

    let order = match query.order {
        CatalogOrder::AcquiredDesc => "fecha_alta.desc.nullslast,id.desc",
        CatalogOrder::NameAsc => "nombre.asc,id.desc",
    };
    params.push(("order".into(), order.into()));
    params
}

/// Cuerpo del POST de alta: arreglo de una fila con las columnas de la tabla
pub fn insert_body(draft: &ItemDraft) -> serde_json::Value {
    json!([draft])
}

fn id_filter(id: i64) -> [(&'static str, String); 1] {
    [("id", format!("eq.{}", id))]
}

impl RestCatalog {
    pub fn new(base_url: &str, api_key: String) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn returning(builder: RequestBuilder) -> RequestBuilder {
        builder.header("Prefer", "return=representation")
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "el backend rechazó la operación");
        Err(BrigadaError::Backend {
            status: status.as_u16(),
            body,
        })
    }

    async fn rows(builder: RequestBuilder) -> Result<Vec<InventoryItem>> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json::<Vec<InventoryItem>>().await?)
    }
}

#[async_trait]
impl CatalogStore for RestCatalog {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<InventoryItem>> {
        let params = fetch_params(query);
        tracing::debug!(?params, "consulta de catálogo");
        Self::rows(self.request(Method::GET).query(&params)).await
    }

    async fn get(&self, id: i64) -> Result<InventoryItem> {
        let builder = self
            .request(Method::GET)
            .query(&[("select", "*")])
            .query(&id_filter(id));
        Self::rows(builder)
            .await?
            .into_iter()
            .next()
            .ok_or(BrigadaError::ItemNotFound(id))
    }

    async fn insert(&self, draft: ItemDraft) -> Result<InventoryItem> {
        let builder = Self::returning(self.request(Method::POST)).json(&insert_body(&draft));
        Self::rows(builder)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BrigadaError::Catalog("el backend no devolvió el ítem creado".into()))
    }

    async fn set_decommission_date(&self, id: i64, date: NaiveDate) -> Result<InventoryItem> {
        let builder = Self::returning(self.request(Method::PATCH))
            .query(&id_filter(id))
            .json(&json!({ "fecha_baja": date }));
        Self::rows(builder)
            .await?
            .into_iter()
            .next()
            .ok_or(BrigadaError::ItemNotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let builder = Self::returning(self.request(Method::DELETE)).query(&id_filter(id));
        if Self::rows(builder).await?.is_empty() {
            return Err(BrigadaError::ItemNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brigada_common::Category;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_category_params() {
        let params = fetch_params(&CatalogQuery::for_category(Category::Vehicles));
        assert_eq!(param(&params, "categoria_macro"), Some("eq.Movilidad"));
        assert_eq!(param(&params, "fecha_baja"), Some("is.null"));
        assert_eq!(param(&params, "order"), Some("fecha_alta.desc.nullslast,id.desc"));
        assert_eq!(param(&params, "or"), None);
    }

    #[test]
    fn test_search_params_override_category() {
        let query = CatalogQuery {
            category: Some(Category::Materials),
            search: Some("Casco".into()),
            include_decommissioned: true,
            ..Default::default()
        };
        let params = fetch_params(&query);
        let or = param(&params, "or").unwrap();
        assert!(or.starts_with("(nombre.ilike.*casco*,"));
        assert!(or.contains("serial.ilike.*casco*"));
        assert_eq!(param(&params, "categoria_macro"), None);
        assert_eq!(param(&params, "fecha_baja"), None);
    }

    #[test]
    fn test_fleet_order() {
        let params = fetch_params(&CatalogQuery::fleet());
        assert_eq!(param(&params, "order"), Some("nombre.asc,id.desc"));
    }

    #[test]
    fn test_insert_body_uses_table_columns() {
        let draft = ItemDraft {
            name: "Handy Motorola".into(),
            serial: Some("MT-778".into()),
            category: Some(Category::Communications),
            photo_url: Some("https://cdn.example/handy.jpg".into()),
            ..Default::default()
        };
        let body = insert_body(&draft);
        let row = &body[0];
        assert_eq!(row["nombre"], "Handy Motorola");
        assert_eq!(row["categoria_macro"], "Comunicaciones");
        assert_eq!(row["imagen_url"], "https://cdn.example/handy.jpg");
        assert!(row.get("imagenes").is_none());

        let plain = insert_body(&ItemDraft {
            photo_url: None,
            ..draft
        });
        assert!(plain[0].get("imagen_url").is_none());
    }

    #[test]
    fn test_sanitize_search() {
        assert_eq!(sanitize_search("a,b(c)*"), "abc");
        assert_eq!(sanitize_search(" 45mm "), "45mm");
    }

    #[test]
    fn test_table_url_trims_slash() {
        let catalog = RestCatalog::new("https://cuartel.example/", "k".into()).unwrap();
        assert_eq!(catalog.table_url(), "https://cuartel.example/rest/v1/inventario");
    }
}
