use std::path::{Path, PathBuf};

use copydesk_logging::desk_info;

use crate::filename::variant_filename;
use crate::persist::{AtomicFileWriter, PersistError};

/// Saves one final variant as UTF-8 Markdown under `dir`, replacing any
/// earlier export of the same job and variant.
pub fn export_variant(
    dir: &Path,
    job_id: &str,
    variant: &str,
    content: &str,
) -> Result<PathBuf, PersistError> {
    let filename = variant_filename(job_id, variant);
    let path = AtomicFileWriter::new(dir).write(&filename, content)?;
    desk_info!(
        "exported variant {} of job {} ({} bytes) to {:?}",
        variant,
        job_id,
        content.len(),
        path
    );
    Ok(path)
}
