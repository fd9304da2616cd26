//! Diálogo de salida (remito)
//!
//! Máquina de estados: Cerrado → Abierto → (confirmado | cancelado) → Cerrado.
//! Al abrir, cada ítem seleccionado arranca con cantidad 1. Las cantidades
//! mal escritas se normalizan a 1, nunca se rechazan.

use crate::error::{Error, Result};
use crate::manifest::ManifestLine;
use crate::selection::SelectionSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tope de la cantidad de salida respecto de la existencia
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityPolicy {
    /// 1 <= cantidad <= existencia (con existencia 0 el tope es 1)
    #[default]
    ClampToStock,
    /// Sin tope superior
    Permissive,
}

impl QuantityPolicy {
    pub fn resolve(&self, raw: &str, on_hand: u32) -> u32 {
        let quantity = normalize_quantity(raw);
        match self {
            QuantityPolicy::ClampToStock => quantity.min(on_hand.max(1)),
            QuantityPolicy::Permissive => quantity,
        }
    }
}

/// Tope de una cantidad tipeada; los enteros más grandes se saturan acá
pub const MAX_DISPATCH_QUANTITY: u32 = 99_999;

/// Interpreta la cantidad tipeada.
///
/// Sólo se acepta un entero simple (dígitos, sin signo ni decimales) mayor o
/// igual a 1. Cualquier otra entrada (`""`, `"0"`, `"-3"`, `"2.5"`, `"abc"`)
/// vale 1. Un entero mayor que [`MAX_DISPATCH_QUANTITY`] se satura al tope,
/// sin importar cuántos dígitos tenga.
pub fn normalize_quantity(raw: &str) -> u32 {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 1;
    }
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return 1;
    }
    if significant.len() > MAX_DISPATCH_QUANTITY.to_string().len() {
        return MAX_DISPATCH_QUANTITY;
    }
    significant
        .parse::<u32>()
        .map(|n| n.min(MAX_DISPATCH_QUANTITY))
        .unwrap_or(1)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CheckoutState {
    #[default]
    Closed,
    Open(HashMap<i64, u32>),
}

#[derive(Debug, Clone, Default)]
pub struct CheckoutDialog {
    state: CheckoutState,
    policy: QuantityPolicy,
}

impl CheckoutDialog {
    pub fn new(policy: QuantityPolicy) -> Self {
        Self {
            state: CheckoutState::Closed,
            policy,
        }
    }

    pub fn policy(&self) -> QuantityPolicy {
        self.policy
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, CheckoutState::Open(_))
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Abre el diálogo; con la selección vacía se rechaza sin cambiar de estado
    pub fn open(&mut self, selection: &SelectionSet) -> Result<()> {
        if selection.is_empty() {
            return Err(Error::EmptySelection);
        }
        let quantities = selection.iter().map(|item| (item.id, 1)).collect();
        self.state = CheckoutState::Open(quantities);
        Ok(())
    }

    pub fn quantity(&self, id: i64) -> Option<u32> {
        match &self.state {
            CheckoutState::Open(quantities) => quantities.get(&id).copied(),
            CheckoutState::Closed => None,
        }
    }

    /// Fija la cantidad de un ítem pendiente; devuelve el valor resultante
    pub fn set_quantity(&mut self, id: i64, raw: &str, selection: &SelectionSet) -> Result<u32> {
        let policy = self.policy;
        let CheckoutState::Open(quantities) = &mut self.state else {
            return Err(Error::DialogClosed);
        };
        let item = selection.get(id).ok_or(Error::NotInManifest(id))?;
        let slot = quantities.get_mut(&id).ok_or(Error::NotInManifest(id))?;
        *slot = policy.resolve(raw, item.quantity);
        Ok(*slot)
    }

    /// Quita el ítem del remito pendiente y lo desmarca de la selección
    pub fn remove(&mut self, id: i64, selection: &mut SelectionSet) -> Result<()> {
        let CheckoutState::Open(quantities) = &mut self.state else {
            return Err(Error::DialogClosed);
        };
        if quantities.remove(&id).is_none() {
            return Err(Error::NotInManifest(id));
        }
        selection.remove(id);
        Ok(())
    }

    /// Cierra sin tocar la selección
    pub fn cancel(&mut self) {
        self.state = CheckoutState::Closed;
    }

    /// Líneas del remito en orden de selección
    pub fn pending_lines(&self, selection: &SelectionSet) -> Result<Vec<ManifestLine>> {
        let CheckoutState::Open(quantities) = &self.state else {
            return Err(Error::DialogClosed);
        };
        let lines: Vec<ManifestLine> = selection
            .iter()
            .map(|item| ManifestLine {
                item: item.clone(),
                dispatch_quantity: quantities.get(&item.id).copied().unwrap_or(1),
            })
            .collect();
        if lines.is_empty() {
            return Err(Error::EmptySelection);
        }
        Ok(lines)
    }

    /// Confirma: entrega las líneas a `render` y cierra sólo si tuvo éxito.
    ///
    /// Si `render` falla, el diálogo sigue abierto con sus cantidades y la
    /// selección queda intacta para reintentar.
    pub fn confirm<T, E, F>(&mut self, selection: &SelectionSet, render: F) -> std::result::Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&[ManifestLine]) -> std::result::Result<T, E>,
    {
        let lines = self.pending_lines(selection)?;
        let output = render(&lines)?;
        self.state = CheckoutState::Closed;
        Ok(output)
    }
}
