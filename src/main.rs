use brigada_common::document::{inventory_document, inventory_title};
use brigada_common::{InventoryItem, ItemDraft, QuantityPolicy};
use brigada_inventario::catalog::{self, CatalogBrowser, CatalogQuery, CatalogStore, JsonCatalog, RestCatalog};
use brigada_inventario::{cli, config, error, export, interactive, logging, session};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use dialoguer::Confirm;
use error::Result;
use export::Exporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Almacén según la configuración: backend alojado o archivo local
fn open_store(config: &Config) -> Result<Arc<dyn CatalogStore>> {
    match &config.backend_url {
        Some(url) => {
            let key = config.get_api_key()?;
            tracing::debug!(url = %url, "usando backend alojado");
            Ok(Arc::new(RestCatalog::new(url, key)?))
        }
        None => {
            tracing::debug!(archivo = %config.catalog_file.display(), "usando catálogo local");
            Ok(Arc::new(JsonCatalog::new(config.catalog_file.clone())))
        }
    }
}

/// Spinner mientras corre una operación contra el catálogo
async fn with_spinner<T>(message: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = fut.await;
    spinner.finish_and_clear();
    result
}

fn print_items(items: &[InventoryItem]) {
    for item in items {
        println!("  {}", interactive::item_line(item, false));
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    let config = Config::load()?;

    let policy = if cli.permitir_exceso {
        QuantityPolicy::Permissive
    } else {
        config.quantity_policy
    };

    match cli.command {
        Commands::Listar { categoria, buscar, incluir_bajas } => {
            let store = open_store(&config)?;
            let query = CatalogQuery {
                category: categoria,
                search: buscar,
                include_decommissioned: incluir_bajas,
                ..Default::default()
            };
            let items = with_spinner("Consultando catálogo...", store.fetch(&query)).await?;
            println!("{} - {} ítems", query.describe(), items.len());
            print_items(&items);
        }

        Commands::Flota => {
            let store = open_store(&config)?;
            let items = with_spinner("Consultando flota...", store.fetch(&CatalogQuery::fleet())).await?;
            println!("🚒 Flota activa: {} móviles", items.len());
            for item in &items {
                let plate = item.serial.as_deref().unwrap_or("-");
                println!("  {} - {} ({})", item.name, item.brand_model(), plate);
            }
        }

        Commands::Alta {
            categoria,
            nombre,
            marca,
            modelo,
            talle,
            color,
            serial,
            cantidad,
            origen,
            fecha,
            imagen,
        } => {
            let store = open_store(&config)?;
            let draft = ItemDraft {
                name: nombre,
                brand: marca,
                model: modelo,
                size: talle,
                serial,
                color,
                quantity: cantidad,
                origin: origen,
                category: Some(categoria),
                acquired_on: fecha,
                photo_url: imagen,
            };
            let item = catalog::register(store.as_ref(), draft, today()).await?;
            println!("✔ Alta registrada: #{} {} ({})", item.id, item.name, item.category.label());
        }

        Commands::Baja { id, fecha } => {
            let store = open_store(&config)?;
            let date = fecha.unwrap_or_else(today);
            let item = catalog::decommission(store.as_ref(), id, date).await?;
            println!("✔ Baja registrada: #{} {} ({})", item.id, item.name, date.format("%d/%m/%Y"));
        }

        Commands::Eliminar { id, si } => {
            let store = open_store(&config)?;
            let item = store.get(id).await?;
            let confirmed = si
                || Confirm::new()
                    .with_prompt(format!("¿Eliminar definitivamente #{} {}?", item.id, item.name))
                    .default(false)
                    .interact()?;
            if confirmed {
                store.delete(id).await?;
                tracing::info!(id, "ítem eliminado");
                println!("✔ Ítem #{} eliminado", id);
            } else {
                println!("Operación cancelada");
            }
        }

        Commands::Seleccionar { categoria, formato, salida } => {
            println!("🧯 brigada - salida de material\n");
            let store = open_store(&config)?;
            let mut browser = CatalogBrowser::new(
                store,
                CatalogQuery::for_category(categoria),
                config.search_debounce(),
            );
            let mut session = session::CheckoutSession::new(policy);
            let exporter = Exporter::new(formato, salida.unwrap_or_else(|| config.output_dir.clone()));
            let header_for = || interactive::manifest_header(&config);
            interactive::run_interactive(&mut browser, &mut session, &exporter, &header_for).await?;
        }

        Commands::Remito { ids, cantidades, formato, salida } => {
            let store = open_store(&config)?;
            let exporter = Exporter::new(formato, salida.unwrap_or_else(|| config.output_dir.clone()));
            let paths = session::scripted_manifest(
                store.as_ref(),
                policy,
                &ids,
                &cantidades,
                &exporter,
                interactive::manifest_header(&config),
            )
            .await?;
            if !paths.is_empty() {
                println!("\n✅ Remito generado");
            }
        }

        Commands::Informe { categoria, formato, salida } => {
            let store = open_store(&config)?;
            let query = CatalogQuery {
                include_decommissioned: true,
                ..CatalogQuery::for_category(categoria)
            };
            let items = with_spinner("Consultando catálogo...", store.fetch(&query)).await?;
            let header = config.document_header(inventory_title(categoria), chrono::Local::now().naive_local());
            let document = inventory_document(&items, categoria, header);
            let exporter = Exporter::new(formato, salida.unwrap_or_else(|| config.output_dir.clone()));
            exporter.export(&document)?;
            println!("\n✅ Informe generado ({} ítems)", items.len());
        }

        Commands::Config { set_api_key, set_backend_url, set_catalog_file, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ Clave del backend guardada");
            }

            if let Some(url) = set_backend_url {
                config.set_backend_url(url)?;
                println!("✔ Backend configurado");
            }

            if let Some(path) = set_catalog_file {
                config.set_catalog_file(path)?;
                println!("✔ Catálogo local configurado");
            }

            if show {
                println!("Configuración:");
                println!("  Institución: {}", config.institution);
                println!("  Cuartel: {}", config.brigade);
                println!("  Catálogo local: {}", config.catalog_file.display());
                println!("  Backend: {}", config.backend_url.as_deref().unwrap_or("(no configurado)"));
                println!("  Clave: {}", if config.api_key.is_some() { "configurada" } else { "sin configurar" });
                println!("  Salida: {}", config.output_dir.display());
                println!("  Cantidades: {:?}", config.quantity_policy);
                println!("  Espera de búsqueda: {} ms", config.search_debounce_ms);
            }
        }
    }

    Ok(())
}
