//! Errores del dominio

use thiserror::Error;

/// Error común a la librería
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("No hay ítems seleccionados para el remito")]
    EmptySelection,

    #[error("El diálogo de salida no está abierto")]
    DialogClosed,

    #[error("El ítem {0} no forma parte del remito")]
    NotInManifest(i64),

    #[error("Dato inválido: {0}")]
    Validation(String),
}

/// Alias de Result
pub type Result<T> = std::result::Result<T, Error>;
