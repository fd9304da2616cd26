//! Conjunto de selección para el próximo remito
//!
//! La selección se mantiene al cambiar de categoría o de búsqueda: guarda una
//! copia de cada ítem, así las entradas sobreviven aunque el ítem ya no esté
//! en la lista visible. El orden de inserción es el orden del remito.

use crate::types::InventoryItem;

#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    entries: Vec<InventoryItem>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega el ítem si no está, lo quita si ya estaba
    pub fn toggle(&mut self, item: &InventoryItem) {
        if !self.remove(item.id) {
            self.entries.push(item.clone());
        }
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// "Seleccionar todo" acotado a la vista actual.
    ///
    /// Si todos los visibles ya están marcados los desmarca; si no, agrega los
    /// que falten. Nunca toca entradas elegidas bajo otro filtro.
    pub fn select_all_visible(&mut self, visible: &[InventoryItem]) {
        if visible.is_empty() {
            return;
        }

        if visible.iter().all(|item| self.is_selected(item.id)) {
            self.entries
                .retain(|e| !visible.iter().any(|item| item.id == e.id));
        } else {
            for item in visible {
                if !self.is_selected(item.id) {
                    self.entries.push(item.clone());
                }
            }
        }
    }

    /// Quita una entrada; devuelve si existía
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn get(&self, id: i64) -> Option<&InventoryItem> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryItem> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.id).collect()
    }
}
