//! Inicialización de logs de diagnóstico (stderr).
//!
//! Los mensajes al operador siguen saliendo por println!; acá sólo va el
//! rastro técnico (consultas al backend, respuestas descartadas, etc).

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` manda; si no está, `info` o `debug` con --verbose
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "brigada_inventario=debug,brigada=debug"
    } else {
        "brigada_inventario=info,brigada=info"
    };
    let filter = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default_directive.to_string());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
