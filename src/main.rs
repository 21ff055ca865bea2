//! Binary entry point: resolve configuration, load the catalog file, drive the
//! Ratatui menu until the user exits, then write the catalog back.
use book_catalog::{logging, run_app, session, App, BookStore, Config};
use tracing::info;

/// Only a failed save, or a menu loop that broke before the user chose Exit,
/// ends the process with an error; logging problems are shown in the footer.
fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    let logging_warning = logging::init(&config).err().map(|err| {
        logging::init_discarding();
        format!("Logging is disabled: {err:#}.")
    });
    info!(catalog = %config.catalog_file.display(), "starting book catalog");

    let mut store = BookStore::new();
    let outcome = store.load(&config.catalog_file);

    let mut app = App::new(store);
    app.report_load(&outcome);
    if let Some(warning) = &logging_warning {
        app.report_warning(warning);
    }
    let run_result = run_app(&mut app);

    let store = app.into_store();
    session::save_on_exit(&store, &config.catalog_file, run_result)?;
    println!("Saved {} books to {}. Goodbye!", store.len(), config.catalog_file.display());
    Ok(())
}
