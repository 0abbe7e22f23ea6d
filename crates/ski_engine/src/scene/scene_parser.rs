//! Scene file parser
//!
//! A scene file starts with two header tokens followed by whitespace
//! separated pairs of `<mesh-path> <16 comma-separated floats>`. The floats
//! are a column-major model matrix. Lines starting with `#` are comments.
//! Entries that share a mesh path are grouped into one instanced entry.
//!
//! ```text
//! scene course_01
//! slope.obj 1,0,0,0,0,1,0,0,0,0,1,0,0,0,0,1
//! tree.obj  1,0,0,0,0,1,0,0,0,0,1,0,4,0,12,1
//! tree.obj  1,0,0,0,0,1,0,0,0,0,1,0,-6,0,30,1
//! @player   1,0,0,0,0,1,0,0,0,0,1,0,0,2,0,1
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::foundation::math::Mat4;

/// Scene loading errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed token
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Transform does not have 16 components
    #[error("line {line}: expected 16 matrix values, found {count}")]
    BadMatrix {
        /// 1-based line number
        line: usize,
        /// Number of values found
        count: usize,
    },
}

/// Tag marking the player spawn transform
pub const PLAYER_TAG: &str = "@player";

/// What an entry becomes once loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Collision geometry loaded from the mesh path
    Mesh,
    /// Player spawn point
    PlayerSpawn,
    /// Named marker without geometry
    Marker,
}

/// All transforms listed for one path
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntry {
    /// Mesh path or tag as written in the file
    pub name: String,
    /// One transform per listed occurrence, in file order
    pub models: Vec<Mat4>,
}

impl SceneEntry {
    /// Classify the entry by its name
    pub fn kind(&self) -> EntryKind {
        if self.name.contains(PLAYER_TAG) {
            EntryKind::PlayerSpawn
        } else if self.name.starts_with('@') {
            EntryKind::Marker
        } else {
            EntryKind::Mesh
        }
    }

    /// More than one transform
    pub fn is_instanced(&self) -> bool {
        self.models.len() > 1
    }
}

/// Parsed scene file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDescription {
    /// Header tokens
    pub header: Vec<String>,
    /// Entries sorted by path
    pub entries: Vec<SceneEntry>,
}

impl SceneDescription {
    /// Total number of transforms across all entries
    pub fn instance_count(&self) -> usize {
        self.entries.iter().map(|e| e.models.len()).sum()
    }
}

/// Read and parse a scene file
pub fn load_scene_file(path: impl AsRef<Path>) -> Result<SceneDescription, SceneError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let scene = parse_scene(&text)?;
    log::info!(
        "Parsed scene {}: {} meshes, {} instances",
        path.display(),
        scene.entries.len(),
        scene.instance_count()
    );
    Ok(scene)
}

/// Parse scene text
pub fn parse_scene(text: &str) -> Result<SceneDescription, SceneError> {
    let mut tokens = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with('#'))
        .flat_map(|(index, line)| line.split_whitespace().map(move |token| (index + 1, token)));

    let header: Vec<String> = tokens.by_ref().take(2).map(|(_, t)| t.to_string()).collect();

    let mut grouped: BTreeMap<String, Vec<Mat4>> = BTreeMap::new();
    while let Some((line, name)) = tokens.next() {
        let Some((_, values)) = tokens.next() else {
            return Err(SceneError::Parse {
                line,
                message: format!("'{name}' has no transform"),
            });
        };
        let model = parse_matrix(values, line)?;
        grouped.entry(name.to_string()).or_default().push(model);
    }

    let entries = grouped
        .into_iter()
        .map(|(name, models)| SceneEntry { name, models })
        .collect();

    Ok(SceneDescription { header, entries })
}

fn parse_matrix(values: &str, line: usize) -> Result<Mat4, SceneError> {
    let floats = values
        .split(',')
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.trim().parse::<f32>().map_err(|_| SceneError::Parse {
                line,
                message: format!("invalid matrix value '{v}'"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if floats.len() != 16 {
        return Err(SceneError::BadMatrix {
            line,
            count: floats.len(),
        });
    }
    Ok(Mat4::from_column_slice(&floats))
}
