use std::io;

use thiserror::Error;

/// Everything that can go wrong before or after rendering.
///
/// Load-time problems (unparseable scene, unknown type names, bad geometry
/// fields) and resource problems (unreadable mesh, unwritable output) are
/// fatal; nothing renders from a partially loaded scene. Numerical edge cases
/// during the render itself are resolved locally and never surface here.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("malformed scene file: {0}")]
    MalformedScene(#[from] serde_json::Error),

    #[error("unknown material type: {0}")]
    UnknownMaterial(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidField {
        field: String,
        reason: String,
    },

    #[error("mesh file {path}: {source}")]
    MeshFile {
        path: String,
        source: io::Error,
    },

    #[error("mesh file {path}, line {line}: {reason}")]
    MalformedMesh {
        path: String,
        line: usize,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SceneError {
    pub fn invalid_field(field: &str, reason: &str) -> SceneError {
        SceneError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SceneError>;

/* Tests */

#[test]
fn error_messages_name_the_offender() {
    let err = SceneError::UnknownMaterial("chrome".into());
    assert_eq!(err.to_string(), "unknown material type: chrome");

    let err = SceneError::invalid_field("cone.cut_height", "must be positive");
    assert_eq!(
        err.to_string(),
        "invalid value for cone.cut_height: must be positive"
    );
}

#[test]
fn io_errors_convert() {
    fn open_missing() -> Result<std::fs::File> {
        Ok(std::fs::File::open("/definitely/not/there.json")?)
    }

    assert!(open_missing().is_err());
}
