use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrigadaError {
    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("Falta la clave del backend. Configúrela con `brigada config --set-api-key CLAVE` o BRIGADA_API_KEY")]
    MissingApiKey,

    #[error("Error del catálogo: {0}")]
    Catalog(String),

    #[error("El backend respondió {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Error de red: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No existe el ítem {0}")]
    ItemNotFound(i64),

    #[error("El ítem {0} ya está dado de baja")]
    AlreadyDecommissioned(i64),

    #[error("Error de JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Error de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error al generar el PDF: {0}")]
    PdfGeneration(String),

    #[error("Error al generar el Excel: {0}")]
    ExcelGeneration(String),

    #[error("Error de interacción: {0}")]
    Dialog(#[from] dialoguer::Error),

    #[error(transparent)]
    Common(#[from] brigada_common::Error),
}

pub type Result<T> = std::result::Result<T, BrigadaError>;
