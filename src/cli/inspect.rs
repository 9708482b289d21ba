//! `gsurvweb inspect <FILE>`
//!
//! Runs a workbook through the same loader the server uses and prints the
//! sheets it would hand to a workflow.

use anyhow::{bail, Result};
use gsurv_data::{DataSource, DatasetLoader, LoadOutcome};
use std::path::Path;

/// Parse `file` and print its sheet summary
pub fn run(file: &Path) -> Result<()> {
    let loader = DatasetLoader::xlsx();
    let source = DataSource::LocalPath(file.to_path_buf());

    match loader.load(Some(&source)) {
        LoadOutcome::Loaded {
            dataset, file_id, ..
        } => {
            println!("{} ({})", file.display(), file_id.short());
            for sheet in dataset.summary().sheets {
                println!("  {sheet}");
                println!("    columns: {}", sheet.columns.join(", "));
            }
            Ok(())
        }
        LoadOutcome::Failed { message } => bail!(message),
        LoadOutcome::Absent => bail!("no input"),
    }
}
