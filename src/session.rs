//! Sesión de salida de material
//!
//! Reúne la selección y el diálogo de remito de una sesión de trabajo. La
//! selección sobrevive a los cambios de filtro y a la confirmación; sólo se
//! vacía cuando el usuario lo pide.

use crate::catalog::CatalogStore;
use crate::error::Result;
use crate::export::Exporter;
use brigada_common::document::manifest_document;
use brigada_common::{
    CheckoutDialog, DocumentHeader, InventoryItem, ManifestLine, QuantityPolicy, SelectionSet,
};
use std::path::PathBuf;

pub const EMPTY_SELECTION_NOTICE: &str = "Seleccione al menos un ítem para generar el remito";

#[derive(Debug, Default)]
pub struct CheckoutSession {
    selection: SelectionSet,
    dialog: CheckoutDialog,
}

impl CheckoutSession {
    pub fn new(policy: QuantityPolicy) -> Self {
        Self {
            selection: SelectionSet::new(),
            dialog: CheckoutDialog::new(policy),
        }
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn dialog(&self) -> &CheckoutDialog {
        &self.dialog
    }

    pub fn toggle(&mut self, item: &InventoryItem) {
        self.selection.toggle(item);
    }

    pub fn select_all_visible(&mut self, visible: &[InventoryItem]) {
        self.selection.select_all_visible(visible);
    }

    /// Rótulo de la acción de remito con el conteo en vivo
    pub fn checkout_label(&self) -> String {
        format!("Generar remito ({})", self.selection.len())
    }

    /// Abre el diálogo. Con la selección vacía avisa y devuelve `false`
    /// sin cambiar de estado.
    pub fn open_checkout(&mut self) -> bool {
        if self.selection.is_empty() {
            println!("ℹ {}", EMPTY_SELECTION_NOTICE);
            return false;
        }
        match self.dialog.open(&self.selection) {
            Ok(()) => {
                tracing::debug!(items = self.selection.len(), "diálogo de remito abierto");
                true
            }
            Err(e) => {
                println!("ℹ {}", e);
                false
            }
        }
    }

    pub fn set_quantity(&mut self, id: i64, raw: &str) -> Result<u32> {
        Ok(self.dialog.set_quantity(id, raw, &self.selection)?)
    }

    /// Quitar desde el diálogo también desmarca el ítem
    pub fn remove(&mut self, id: i64) -> Result<()> {
        Ok(self.dialog.remove(id, &mut self.selection)?)
    }

    pub fn cancel(&mut self) {
        self.dialog.cancel();
    }

    pub fn pending_lines(&self) -> Result<Vec<ManifestLine>> {
        Ok(self.dialog.pending_lines(&self.selection)?)
    }

    /// Confirma entregando las líneas a `render`; el diálogo cierra sólo si
    /// `render` tuvo éxito.
    pub fn confirm_with<T, F>(&mut self, render: F) -> Result<T>
    where
        F: FnOnce(&[ManifestLine]) -> Result<T>,
    {
        self.dialog.confirm(&self.selection, render)
    }

    /// Confirma y escribe el remito con `exporter`
    pub fn confirm_to_files(
        &mut self,
        exporter: &Exporter,
        header: DocumentHeader,
    ) -> Result<Vec<PathBuf>> {
        self.confirm_with(|lines| {
            let document = manifest_document(lines, header);
            let written = exporter.export(&document)?;
            tracing::info!(lineas = lines.len(), "remito generado");
            Ok(written)
        })
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

/// Remito no interactivo: busca los ids, aplica las cantidades pedidas y
/// genera los archivos.
pub async fn scripted_manifest<S: CatalogStore + ?Sized>(
    store: &S,
    policy: QuantityPolicy,
    ids: &[i64],
    quantities: &[(i64, String)],
    exporter: &Exporter,
    header: DocumentHeader,
) -> Result<Vec<PathBuf>> {
    let mut session = CheckoutSession::new(policy);
    for &id in ids {
        let item = store.get(id).await?;
        if !session.selection().is_selected(id) {
            session.toggle(&item);
        }
    }

    if !session.open_checkout() {
        return Ok(Vec::new());
    }

    for (id, raw) in quantities {
        let applied = session.set_quantity(*id, raw)?;
        if raw.trim() != applied.to_string() {
            println!("  ítem {}: cantidad «{}» → {}", id, raw, applied);
        }
    }

    session.confirm_to_files(exporter, header)
}
