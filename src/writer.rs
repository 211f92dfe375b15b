use std::{io::Write as _, path::Path};

use crate::{
    error::{ExportError, ExportResult},
    scene::SceneDocument,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Indent the emitted JSON; compact when false.
    pub pretty: bool,
}

pub fn to_json_string(doc: &SceneDocument, opts: WriteOptions) -> ExportResult<String> {
    let out = if opts.pretty {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string(doc)
    };
    out.map_err(|e| ExportError::serde(e.to_string()))
}

/// Serialize `doc` and replace the contents of `path` with it.
///
/// The text goes to a temporary file next to `path` that is renamed over the target once fully
/// flushed, so readers see either the old file or the complete new one. An existing target keeps
/// its permissions, and a symlinked target is updated through the link.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn write_document(
    doc: &SceneDocument,
    path: impl AsRef<Path>,
    opts: WriteOptions,
) -> ExportResult<()> {
    let json = to_json_string(doc, opts)?;
    write_json(path.as_ref(), &json)
}

pub(crate) fn write_json(path: &Path, json: &str) -> ExportResult<()> {
    let fail = |e: std::io::Error| ExportError::persistence(path, e);

    // Symlinks are followed so the file they point at receives the new contents.
    let existing = std::fs::canonicalize(path)
        .ok()
        .and_then(|real| std::fs::metadata(&real).ok().map(|meta| (real, meta)))
        .filter(|(_, meta)| meta.is_file());
    let target = existing.as_ref().map_or(path, |(real, _)| real.as_path());
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        // Same mode a plain create would get once the umask is applied.
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(fail)?;
    if let Some((_, meta)) = &existing {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(fail)?;
    }

    tmp.write_all(json.as_bytes()).map_err(fail)?;
    tmp.as_file().sync_all().map_err(fail)?;
    tmp.persist(target).map_err(|e| fail(e.error))?;

    tracing::info!(bytes = json.len(), "wrote scene document");
    Ok(())
}
