//! File-backed program state: a handful of newline-separated scalars in a
//! fixed field order, read once at startup and written once at shutdown.
//! A missing or malformed file keeps the defaults.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use glam::Vec3;

/// Names of the serialized fields, in file order. Used for error reporting.
const FIELD_NAMES: [&str; 10] = [
    "clear.r", "clear.g", "clear.b", "overlay", "position.x", "position.y", "position.z",
    "front.x", "front.y", "front.z",
];

/// Settings persisted across runs. The file stores one scalar per line in
/// the declaration order of these fields; booleans are written as 0/1.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgramSettings {
    pub clear_color: Vec3,
    pub overlay_enabled: bool,
    pub camera_position: Vec3,
    pub camera_front: Vec3,
}

impl Default for ProgramSettings {
    fn default() -> Self {
        Self {
            clear_color: Vec3::ZERO,
            overlay_enabled: false,
            camera_position: Vec3::ZERO,
            camera_front: Vec3::NEG_Z,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("settings field {index} ({name}) is missing or malformed")]
    Field { index: usize, name: &'static str },
}

impl ProgramSettings {
    /// Parse the newline-scalar format. Blank lines are skipped; every field
    /// must be present and numeric.
    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        let mut values = [0f32; FIELD_NAMES.len()];
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
        for (index, slot) in values.iter_mut().enumerate() {
            let line = lines.next().ok_or(SettingsError::Field {
                index,
                name: FIELD_NAMES[index],
            })?;
            *slot = line.parse().map_err(|_| SettingsError::Field {
                index,
                name: FIELD_NAMES[index],
            })?;
        }
        Ok(Self {
            clear_color: Vec3::new(values[0], values[1], values[2]),
            overlay_enabled: values[3] != 0.0,
            camera_position: Vec3::new(values[4], values[5], values[6]),
            camera_front: Vec3::new(values[7], values[8], values[9]),
        })
    }

    /// Load from `path`. A missing file is normal (first run); any other
    /// failure is logged and the defaults are kept.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match Self::parse(&text) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!(
                        "ignoring malformed settings file {}: {err}",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                log::warn!("could not read settings file {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.serialize())
    }

    fn serialize(&self) -> String {
        let mut out = String::new();
        for value in [
            self.clear_color.x,
            self.clear_color.y,
            self.clear_color.z,
        ] {
            let _ = writeln!(out, "{value}");
        }
        let _ = writeln!(out, "{}", u8::from(self.overlay_enabled));
        for value in [
            self.camera_position.x,
            self.camera_position.y,
            self.camera_position.z,
            self.camera_front.x,
            self.camera_front.y,
            self.camera_front.z,
        ] {
            let _ = writeln!(out, "{value}");
        }
        out
    }
}
