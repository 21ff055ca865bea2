use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, warn};

use crate::store::BookStore;

/// Write the catalog back after the menu loop has finished. Only a loop that
/// ended through the Exit action saves; when the loop failed the file on disk
/// is left as it was and the loop's error is returned.
pub fn save_on_exit(store: &BookStore, path: &Path, loop_result: Result<()>) -> Result<()> {
    if let Err(err) = loop_result {
        warn!(error = %err, path = %path.display(), "menu loop failed, catalog not saved");
        return Err(err.context(format!(
            "the catalog was not saved; {} is unchanged",
            path.display()
        )));
    }

    store
        .save(path)
        .inspect_err(|err| error!(error = %err, "failed to save catalog"))
        .with_context(|| format!("could not save {} books to {}", store.len(), path.display()))
}
