pub mod pdf;
pub mod excel;

use crate::error::Result;
use brigada_common::TableDocument;
use std::path::{Path, PathBuf};

/// Escribe un documento tabular (remito o informe) en un formato concreto
pub trait ManifestWriter {
    fn extension(&self) -> &'static str;

    fn label(&self) -> &'static str;

    fn write(&self, document: &TableDocument, output_path: &Path) -> Result<()>;
}

pub struct PdfWriter;

impl ManifestWriter for PdfWriter {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn label(&self) -> &'static str {
        "PDF"
    }

    fn write(&self, document: &TableDocument, output_path: &Path) -> Result<()> {
        pdf::generate_pdf(document, output_path)
    }
}

pub struct ExcelWriter;

impl ManifestWriter for ExcelWriter {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn label(&self) -> &'static str {
        "Excel"
    }

    fn write(&self, document: &TableDocument, output_path: &Path) -> Result<()> {
        excel::generate_excel(document, output_path)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Pdf,
    Excel,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" | "ambos" => Ok(ExportFormat::Both),
            _ => Err(format!("Formato desconocido: {}. Use pdf, excel o ambos", s)),
        }
    }
}

impl ExportFormat {
    pub fn writers(&self) -> Vec<Box<dyn ManifestWriter>> {
        match self {
            ExportFormat::Pdf => vec![Box::new(PdfWriter)],
            ExportFormat::Excel => vec![Box::new(ExcelWriter)],
            ExportFormat::Both => vec![Box::new(PdfWriter), Box::new(ExcelWriter)],
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Pdf => write!(f, "pdf"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "ambos"),
        }
    }
}

/// Destino de los documentos generados
#[derive(Clone, Debug)]
pub struct Exporter {
    pub format: ExportFormat,
    pub output_dir: PathBuf,
}

impl Exporter {
    pub fn new(format: ExportFormat, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            format,
            output_dir: output_dir.into(),
        }
    }

    /// Genera los archivos pedidos y devuelve sus rutas
    pub fn export(&self, document: &TableDocument) -> Result<Vec<PathBuf>> {
        export_with(document, &self.format.writers(), &self.output_dir)
    }
}

/// Escribe con cada `writer` bajo un mismo nombre libre. Si un formato
/// falla se borran los archivos ya escritos de este documento.
fn export_with(
    document: &TableDocument,
    writers: &[Box<dyn ManifestWriter>],
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let extensions: Vec<&str> = writers.iter().map(|w| w.extension()).collect();
    let stem = available_stem(output_dir, &document.file_stem, &extensions);
    let mut written = Vec::new();

    for writer in writers {
        let path = output_path_for(output_dir, &stem, writer.extension());
        println!("- Generando {}...", writer.label());
        if let Err(e) = writer.write(document, &path) {
            discard_partial(&written);
            // el propio writer puede haber dejado el archivo a medias
            discard_partial(std::slice::from_ref(&path));
            return Err(e);
        }
        println!("✔ {}: {}", writer.label(), path.display());
        written.push(path);
    }

    tracing::debug!(archivos = written.len(), filas = document.rows.len(), "documento exportado");
    Ok(written)
}

fn discard_partial(paths: &[PathBuf]) {
    for path in paths {
        if !path.exists() {
            continue;
        }
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!(archivo = %path.display(), "archivo parcial eliminado"),
            Err(e) => tracing::warn!(archivo = %path.display(), error = %e, "no se pudo eliminar el archivo parcial"),
        }
    }
}

/// Nombre base sin archivos previos en ninguna de las extensiones:
/// `Remito_..._14-30-05`, luego `_2`, `_3`...
fn available_stem(dir: &Path, stem: &str, extensions: &[&str]) -> String {
    let base = sanitize_file_stem(stem);
    let taken = |candidate: &str| {
        extensions
            .iter()
            .any(|ext| output_path_for(dir, candidate, ext).exists())
    };
    if !taken(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn output_path_for(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", sanitize_file_stem(stem), extension))
}

/// Deja sólo caracteres seguros para nombres de archivo
pub fn sanitize_file_stem(stem: &str) -> String {
    lazy_static::lazy_static! {
        static ref UNSAFE: regex::Regex = regex::Regex::new(r"[^A-Za-z0-9_\-]+").unwrap();
    }
    let cleaned = UNSAFE.replace_all(stem, "_");
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        "documento".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrigadaError;
    use brigada_common::layout::MANIFEST_COLUMNS;
    use brigada_common::DocumentHeader;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_format_parse() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("ambos".parse::<ExportFormat>().unwrap(), ExportFormat::Both);
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_writers_per_format() {
        let exts: Vec<&str> = ExportFormat::Both.writers().iter().map(|w| w.extension()).collect();
        assert_eq!(exts, vec!["pdf", "xlsx"]);
        assert_eq!(ExportFormat::default().writers().len(), 1);
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("Remito_Salida_2026-10-19_14-30-05"), "Remito_Salida_2026-10-19_14-30-05");
        assert_eq!(sanitize_file_stem("Inventario/Estructural: fuego"), "Inventario_Estructural_fuego");
        assert_eq!(sanitize_file_stem("///"), "documento");
    }

    struct FailingWriter;

    impl ManifestWriter for FailingWriter {
        fn extension(&self) -> &'static str {
            "xlsx"
        }

        fn label(&self) -> &'static str {
            "Excel"
        }

        fn write(&self, _document: &TableDocument, output_path: &Path) -> Result<()> {
            std::fs::write(output_path, b"PK")?;
            Err(BrigadaError::ExcelGeneration("disco lleno".into()))
        }
    }

    struct StubWriter;

    impl ManifestWriter for StubWriter {
        fn extension(&self) -> &'static str {
            "pdf"
        }

        fn label(&self) -> &'static str {
            "PDF"
        }

        fn write(&self, _document: &TableDocument, output_path: &Path) -> Result<()> {
            std::fs::write(output_path, b"%PDF")?;
            Ok(())
        }
    }

    fn document(stem: &str) -> TableDocument {
        let issued = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap();
        TableDocument {
            header: DocumentHeader::new("Remito", issued),
            columns: MANIFEST_COLUMNS,
            rows: Vec::new(),
            signatures: Vec::new(),
            file_stem: stem.into(),
        }
    }

    #[test]
    fn test_same_second_gets_suffix() {
        let dir = tempdir().unwrap();
        let doc = document("Remito_Salida_2026-10-19_14-30-05");
        let writers: Vec<Box<dyn ManifestWriter>> = vec![Box::new(StubWriter)];

        let first = export_with(&doc, &writers, dir.path()).unwrap();
        let second = export_with(&doc, &writers, dir.path()).unwrap();
        let third = export_with(&doc, &writers, dir.path()).unwrap();

        assert_eq!(first, vec![dir.path().join("Remito_Salida_2026-10-19_14-30-05.pdf")]);
        assert_eq!(second, vec![dir.path().join("Remito_Salida_2026-10-19_14-30-05_2.pdf")]);
        assert_eq!(third, vec![dir.path().join("Remito_Salida_2026-10-19_14-30-05_3.pdf")]);
    }

    #[test]
    fn test_suffix_considers_every_format() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Remito.xlsx"), b"PK").unwrap();
        assert_eq!(available_stem(dir.path(), "Remito", &["pdf", "xlsx"]), "Remito_2");
        assert_eq!(available_stem(dir.path(), "Remito", &["pdf"]), "Remito");
    }

    #[test]
    fn test_failed_format_removes_written_files() {
        let dir = tempdir().unwrap();
        let doc = document("Remito");
        let writers: Vec<Box<dyn ManifestWriter>> = vec![Box::new(StubWriter), Box::new(FailingWriter)];

        let result = export_with(&doc, &writers, dir.path());
        assert!(matches!(result, Err(BrigadaError::ExcelGeneration(_))));
        assert!(!dir.path().join("Remito.pdf").exists());
        assert!(!dir.path().join("Remito.xlsx").exists());

        // el reintento reusa el mismo nombre
        let retry: Vec<Box<dyn ManifestWriter>> = vec![Box::new(StubWriter)];
        let written = export_with(&doc, &retry, dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("Remito.pdf")]);
    }

    #[test]
    fn test_output_path() {
        let path = output_path_for(Path::new("salida"), "Remito", "pdf");
        assert_eq!(path, Path::new("salida").join("Remito.pdf"));
    }
}
