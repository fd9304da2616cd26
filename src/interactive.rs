//! Sesión interactiva de selección y remito (dialoguer)

use crate::catalog::{CatalogBrowser, CatalogStore};
use crate::error::Result;
use crate::export::Exporter;
use crate::session::CheckoutSession;
use brigada_common::document::MANIFEST_TITLE;
use brigada_common::{Category, DocumentHeader, InventoryItem};
use dialoguer::{Confirm, Input, MultiSelect, Select};

/// Acciones del menú principal
enum MenuAction {
    Category,
    Search,
    Toggle,
    SelectAll,
    Checkout,
    Quit,
}

/// Acciones dentro del diálogo de remito
enum DialogAction {
    EditQuantity,
    Remove,
    Confirm,
    Cancel,
}

/// Línea de lista para un ítem
pub fn item_line(item: &InventoryItem, selected: bool) -> String {
    let mark = if selected { "[x]" } else { "[ ]" };
    let brand_model = item.brand_model();
    let mut line = format!("{} #{} {} (x{})", mark, item.id, item.name, item.quantity);
    if !brand_model.is_empty() {
        line.push_str(&format!(" - {}", brand_model));
    }
    if !item.is_active() {
        line.push_str(" [BAJA]");
    }
    line
}

fn print_visible<S: CatalogStore + ?Sized>(browser: &CatalogBrowser<S>, session: &CheckoutSession) {
    println!("\n{} - {} ítems", browser.shown_query().describe(), browser.visible().len());
    for item in browser.visible() {
        println!("  {}", item_line(item, session.selection().is_selected(item.id)));
    }
    println!();
}

async fn refresh<S: CatalogStore + ?Sized>(browser: &mut CatalogBrowser<S>) {
    if let Err(e) = browser.refresh().await {
        eprintln!("⚠ No se pudo actualizar el catálogo: {} (se muestra la lista anterior)", e);
    }
}

fn prompt_menu(session: &CheckoutSession) -> Result<MenuAction> {
    let items = [
        "Cambiar categoría".to_string(),
        "Buscar".to_string(),
        "Marcar / desmarcar ítems".to_string(),
        "Seleccionar todos los visibles".to_string(),
        session.checkout_label(),
        "Salir".to_string(),
    ];
    let choice = Select::new()
        .with_prompt("Acción")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(match choice {
        0 => MenuAction::Category,
        1 => MenuAction::Search,
        2 => MenuAction::Toggle,
        3 => MenuAction::SelectAll,
        4 => MenuAction::Checkout,
        _ => MenuAction::Quit,
    })
}

fn prompt_category(current: Option<Category>) -> Result<Category> {
    let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    let default = current
        .and_then(|c| Category::ALL.iter().position(|x| *x == c))
        .unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Categoría")
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(Category::ALL[choice])
}

/// Marca con MultiSelect y aplica la diferencia como toggles
fn prompt_toggle(visible: &[InventoryItem], session: &mut CheckoutSession) -> Result<()> {
    if visible.is_empty() {
        println!("No hay ítems visibles");
        return Ok(());
    }
    let labels: Vec<String> = visible.iter().map(|i| item_line(i, false)).collect();
    let defaults: Vec<bool> = visible
        .iter()
        .map(|i| session.selection().is_selected(i.id))
        .collect();
    let chosen = MultiSelect::new()
        .with_prompt("Espacio marca, Enter confirma")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    for (index, item) in visible.iter().enumerate() {
        if chosen.contains(&index) != defaults[index] {
            session.toggle(item);
        }
    }
    Ok(())
}

fn print_pending(session: &CheckoutSession) -> Result<()> {
    println!("\nRemito pendiente:");
    for line in session.pending_lines()? {
        println!(
            "  #{} {} - cantidad {} (existencia {})",
            line.item.id, line.item.name, line.dispatch_quantity, line.item.quantity
        );
    }
    Ok(())
}

fn pick_pending(session: &CheckoutSession, prompt: &str) -> Result<Option<i64>> {
    let lines = session.pending_lines()?;
    let labels: Vec<String> = lines
        .iter()
        .map(|l| format!("#{} {} (x{})", l.item.id, l.item.name, l.dispatch_quantity))
        .collect();
    let choice = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|i| lines[i].item.id))
}

/// Diálogo de remito abierto hasta confirmar con éxito o cancelar
fn run_checkout_dialog(
    session: &mut CheckoutSession,
    exporter: &Exporter,
    header_for: &dyn Fn() -> DocumentHeader,
) -> Result<()> {
    loop {
        print_pending(session)?;
        let choice = Select::new()
            .with_prompt("Remito")
            .items(&["Editar cantidad", "Quitar ítem", "Confirmar y generar", "Cancelar"])
            .default(2)
            .interact()?;
        let action = match choice {
            0 => DialogAction::EditQuantity,
            1 => DialogAction::Remove,
            2 => DialogAction::Confirm,
            _ => DialogAction::Cancel,
        };

        match action {
            DialogAction::EditQuantity => {
                if let Some(id) = pick_pending(session, "Ítem")? {
                    let current = session.dialog().quantity(id).unwrap_or(1);
                    let raw: String = Input::new()
                        .with_prompt("Cantidad")
                        .default(current.to_string())
                        .interact_text()?;
                    let applied = session.set_quantity(id, &raw)?;
                    println!("  → {}", applied);
                }
            }
            DialogAction::Remove => {
                if let Some(id) = pick_pending(session, "Quitar")? {
                    session.remove(id)?;
                    if session.selection().is_empty() {
                        println!("ℹ No quedan ítems en el remito");
                        session.cancel();
                        return Ok(());
                    }
                }
            }
            DialogAction::Confirm => match session.confirm_to_files(exporter, header_for()) {
                Ok(paths) => {
                    println!("✔ Remito generado ({} archivo/s)", paths.len());
                    let clear = Confirm::new()
                        .with_prompt("¿Limpiar selección?")
                        .default(false)
                        .interact()?;
                    if clear {
                        session.clear_selection();
                    }
                    return Ok(());
                }
                Err(e) => {
                    eprintln!("✖ No se pudo generar el remito: {}", e);
                }
            },
            DialogAction::Cancel => {
                session.cancel();
                return Ok(());
            }
        }
    }
}

/// Bucle principal de la sesión
pub async fn run_interactive<S: CatalogStore + ?Sized>(
    browser: &mut CatalogBrowser<S>,
    session: &mut CheckoutSession,
    exporter: &Exporter,
    header_for: &dyn Fn() -> DocumentHeader,
) -> Result<()> {
    refresh(browser).await;

    loop {
        print_visible(browser, session);

        match prompt_menu(session)? {
            MenuAction::Category => {
                let category = prompt_category(browser.query().category)?;
                browser.set_category(category);
                refresh(browser).await;
            }
            MenuAction::Search => {
                let term: String = Input::new()
                    .with_prompt("Buscar (más de 2 letras, vacío para volver)")
                    .allow_empty(true)
                    .interact_text()?;
                browser.set_search(term);
                refresh(browser).await;
            }
            MenuAction::Toggle => {
                let visible = browser.visible().to_vec();
                prompt_toggle(&visible, session)?;
            }
            MenuAction::SelectAll => {
                session.select_all_visible(browser.visible());
            }
            MenuAction::Checkout => {
                if session.open_checkout() {
                    run_checkout_dialog(session, exporter, header_for)?;
                }
            }
            MenuAction::Quit => break,
        }
    }

    Ok(())
}

/// Encabezado del remito con la hora de confirmación
pub fn manifest_header(config: &crate::config::Config) -> DocumentHeader {
    config.document_header(MANIFEST_TITLE, chrono::Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brigada_common::Origin;

    #[test]
    fn test_item_line() {
        let mut item = InventoryItem {
            id: 7,
            name: "Casco".into(),
            brand: Some("Bullard".into()),
            model: None,
            size: None,
            serial: None,
            color: None,
            quantity: 10,
            origin: Origin::Donation,
            category: Category::Structural,
            acquired_on: None,
            decommissioned_on: None,
            photo_url: None,
        };
        assert_eq!(item_line(&item, true), "[x] #7 Casco (x10) - Bullard");
        item.decommissioned_on = chrono::NaiveDate::from_ymd_opt(2025, 3, 1);
        assert!(item_line(&item, false).ends_with("[BAJA]"));
    }
}
