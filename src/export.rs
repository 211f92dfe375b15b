use std::path::PathBuf;

use crate::{
    assemble::SceneAssembler,
    error::{ExportError, ExportResult},
    ids::IdGenerator,
    path_guard::validate_output_path,
    writer::{WriteOptions, to_json_string, write_json},
};

pub const MSG_DISABLED: &str = "Set the write flag to true to write the JSON file to disk.";
pub const MSG_WRITTEN: &str = "JSON file written successfully!";

/// Everything a host supplies for one export.
#[derive(Clone, Debug, Default)]
pub struct ExportRequest {
    /// Nothing is validated, assembled or written unless this is set.
    pub write: bool,
    pub path: PathBuf,
    pub geometry_fragments: Vec<String>,
    pub material_fragments: Vec<String>,
    pub options: WriteOptions,
}

#[derive(Debug)]
pub enum ExportOutcome {
    Disabled,
    Written {
        path: PathBuf,
        json: String,
    },
    /// The document was assembled but could not be persisted; its JSON is still available.
    WriteFailed {
        json: String,
        error: ExportError,
    },
}

impl ExportOutcome {
    pub fn message(&self) -> String {
        match self {
            Self::Disabled => MSG_DISABLED.to_owned(),
            Self::Written { .. } => MSG_WRITTEN.to_owned(),
            Self::WriteFailed { error, .. } => {
                format!("Something went wrong while trying to write the file to disk: {error}")
            }
        }
    }

    pub fn json(&self) -> Option<&str> {
        match self {
            Self::Disabled => None,
            Self::Written { json, .. } | Self::WriteFailed { json, .. } => Some(json),
        }
    }
}

/// Validate the destination, assemble the scene and persist it.
///
/// Path, fragment and assembly problems are returned as errors before anything touches the
/// filesystem; a storage failure is reported through [`ExportOutcome::WriteFailed`].
#[tracing::instrument(skip_all, fields(path = %req.path.display(), write = req.write))]
pub fn export_scene(
    req: &ExportRequest,
    ids: &mut dyn IdGenerator,
) -> ExportResult<ExportOutcome> {
    if !req.write {
        return Ok(ExportOutcome::Disabled);
    }

    let path = validate_output_path(&req.path)?;
    let doc = SceneAssembler::new(ids).assemble(
        req.geometry_fragments.as_slice(),
        req.material_fragments.as_slice(),
    )?;
    let json = to_json_string(&doc, req.options)?;

    match write_json(path.as_path(), &json) {
        Ok(()) => Ok(ExportOutcome::Written {
            path: path.into_path_buf(),
            json,
        }),
        Err(error) => {
            tracing::error!(%error, "scene assembled but not persisted");
            Ok(ExportOutcome::WriteFailed { json, error })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ids::SequentialIds, path_guard::PathError};

    fn request(path: PathBuf) -> ExportRequest {
        ExportRequest {
            write: true,
            path,
            geometry_fragments: vec![r#"{"uuid":"g1"}"#.to_owned()],
            material_fragments: vec![r#"{"uuid":"m1"}"#.to_owned()],
            options: WriteOptions::default(),
        }
    }

    #[test]
    fn disabled_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request(dir.path().join("scene.json"));
        req.write = false;

        let out = export_scene(&req, &mut SequentialIds::default()).unwrap();
        assert!(matches!(out, ExportOutcome::Disabled));
        assert_eq!(out.message(), MSG_DISABLED);
        assert!(out.json().is_none());
        assert!(!req.path.exists());
    }

    #[test]
    fn writes_and_returns_json() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path().join("scene.json"));

        let out = export_scene(&req, &mut SequentialIds::default()).unwrap();
        assert_eq!(out.message(), MSG_WRITTEN);
        let on_disk = std::fs::read_to_string(&req.path).unwrap();
        assert_eq!(out.json(), Some(on_disk.as_str()));
    }

    #[test]
    fn bad_path_fails_before_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request(dir.path().join("scene.txt"));
        req.geometry_fragments = vec!["not json".to_owned()];

        let err = export_scene(&req, &mut SequentialIds::default()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Path(PathError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn storage_failure_keeps_json() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by the final rename.
        let target = dir.path().join("scene.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();

        let out = export_scene(&request(target), &mut SequentialIds::default()).unwrap();
        match &out {
            ExportOutcome::WriteFailed { json, error } => {
                assert!(json.contains("\"g1\""));
                assert!(matches!(error, ExportError::Persistence { .. }));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(out.message().contains("Something went wrong"));
    }
}
