use crate::export::ExportFormat;
use brigada_common::{Category, Origin};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brigada")]
#[command(about = "Inventario del cuartel y remitos de salida de material", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log detallado
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Permite cantidades de salida mayores a la existencia
    #[arg(long, global = true)]
    pub permitir_exceso: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lista el inventario de una categoría o una búsqueda
    Listar {
        /// Categoría (Movilidad, Estructural, Indumentaria, Comunicaciones, Materiales, Mobiliario)
        #[arg(short, long)]
        categoria: Option<Category>,

        /// Búsqueda global (más de 2 letras)
        #[arg(short, long)]
        buscar: Option<String>,

        /// Incluye los ítems dados de baja
        #[arg(long)]
        incluir_bajas: bool,
    },

    /// Flota de móviles activos
    Flota,

    /// Registra un ítem nuevo
    Alta {
        #[arg(short, long)]
        categoria: Category,

        /// Descripción / nombre
        #[arg(short, long)]
        nombre: String,

        #[arg(long)]
        marca: Option<String>,

        #[arg(long)]
        modelo: Option<String>,

        /// Talle o medida / diámetro
        #[arg(long)]
        talle: Option<String>,

        #[arg(long)]
        color: Option<String>,

        /// Serial o patente
        #[arg(long)]
        serial: Option<String>,

        #[arg(long)]
        cantidad: Option<u32>,

        /// Compra, Donacion, Prestamo, Ministerio u otro texto
        #[arg(long)]
        origen: Option<Origin>,

        /// Fecha de alta (AAAA-MM-DD, por defecto hoy)
        #[arg(long)]
        fecha: Option<NaiveDate>,

        /// URL de la foto ya subida
        #[arg(long)]
        imagen: Option<String>,
    },

    /// Da de baja un ítem (conserva el registro)
    Baja {
        #[arg(required = true)]
        id: i64,

        /// Fecha de baja (AAAA-MM-DD, por defecto hoy)
        #[arg(long)]
        fecha: Option<NaiveDate>,
    },

    /// Elimina un ítem del catálogo
    Eliminar {
        #[arg(required = true)]
        id: i64,

        /// No pedir confirmación
        #[arg(short, long)]
        si: bool,
    },

    /// Sesión interactiva: filtrar, seleccionar y generar el remito
    Seleccionar {
        /// Categoría inicial
        #[arg(short, long, default_value = "Movilidad")]
        categoria: Category,

        /// Formato de salida (pdf/excel/ambos)
        #[arg(short, long, default_value = "pdf")]
        formato: ExportFormat,

        /// Carpeta de salida (por defecto la configurada)
        #[arg(short, long)]
        salida: Option<PathBuf>,
    },

    /// Genera un remito sin interacción
    Remito {
        /// Ids de los ítems, en orden
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i64>,

        /// Cantidad de salida de un ítem (ID=N), repetible
        #[arg(long = "cantidad", value_parser = parse_quantity_arg)]
        cantidades: Vec<(i64, String)>,

        /// Formato de salida (pdf/excel/ambos)
        #[arg(short, long, default_value = "pdf")]
        formato: ExportFormat,

        /// Carpeta de salida (por defecto la configurada)
        #[arg(short, long)]
        salida: Option<PathBuf>,
    },

    /// Informe de inventario de una categoría
    Informe {
        #[arg(short, long)]
        categoria: Category,

        /// Formato de salida (pdf/excel/ambos)
        #[arg(short, long, default_value = "pdf")]
        formato: ExportFormat,

        /// Carpeta de salida (por defecto la configurada)
        #[arg(short, long)]
        salida: Option<PathBuf>,
    },

    /// Muestra o edita la configuración
    Config {
        /// Clave del backend
        #[arg(long)]
        set_api_key: Option<String>,

        /// URL base del backend alojado
        #[arg(long)]
        set_backend_url: Option<String>,

        /// Catálogo JSON local
        #[arg(long)]
        set_catalog_file: Option<PathBuf>,

        #[arg(long)]
        show: bool,
    },
}

/// `ID=N` de `--cantidad`; el valor queda crudo y se normaliza al aplicarlo
pub fn parse_quantity_arg(s: &str) -> Result<(i64, String), String> {
    let (id, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("Se esperaba ID=CANTIDAD, se recibió «{}»", s))?;
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("Id inválido: «{}»", id.trim()))?;
    Ok((id, raw.trim().to_string()))
}
