use crate::error::{BrigadaError, Result};
use brigada_common::{DocumentHeader, QuantityPolicy};
use brigada_common::document::{DEFAULT_BRIGADE, DEFAULT_INSTITUTION};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const API_KEY_ENV: &str = "BRIGADA_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catálogo local (JSON) cuando no hay backend configurado
    pub catalog_file: PathBuf,
    /// URL base del backend alojado (ej. https://xyz.supabase.co)
    pub backend_url: Option<String>,
    pub api_key: Option<String>,
    pub institution: String,
    pub brigade: String,
    pub output_dir: PathBuf,
    pub quantity_policy: QuantityPolicy,
    pub search_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_file: PathBuf::from("inventario.json"),
            backend_url: None,
            api_key: None,
            institution: DEFAULT_INSTITUTION.into(),
            brigade: DEFAULT_BRIGADE.into(),
            output_dir: PathBuf::from("."),
            quantity_policy: QuantityPolicy::ClampToStock,
            search_debounce_ms: 300,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BrigadaError::Config("No se encontró el directorio personal".into()))?;
        Ok(home.join(".config").join("brigada").join("config.json"))
    }

    /// La variable de entorno tiene prioridad sobre el archivo
    pub fn get_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key.clone().ok_or(BrigadaError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn set_backend_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BrigadaError::Config(format!("URL inválida: {}", url)));
        }
        self.backend_url = Some(url);
        self.save()
    }

    pub fn set_catalog_file(&mut self, path: PathBuf) -> Result<()> {
        self.catalog_file = path;
        self.save()
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Encabezado institucional para un documento
    pub fn document_header(&self, title: impl Into<String>, issued_at: NaiveDateTime) -> DocumentHeader {
        DocumentHeader::new(title, issued_at).with_institution(&self.institution, &self.brigade)
    }
}
