use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Physical layout of the parts register: where the header and the trailing
/// note block sit, and which column each logical field is written to.
///
/// Column and row numbers are 1-based, matching the register's own numbering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RegisterLayout {
    #[serde(default = "default_header_row")]
    pub header_row: u32,
    /// First row of the note block below the data rows. Fill mode may only
    /// write between `header_row` and this row.
    #[serde(default = "default_note_start_row")]
    pub note_start_row: u32,
    #[serde(default = "default_name_col")]
    pub name_col: u32,
    #[serde(default = "default_spec_col")]
    pub spec_col: u32,
    #[serde(default = "default_desc_col")]
    pub desc_col: u32,
    #[serde(default = "default_version_col")]
    pub version_col: u32,
    #[serde(default = "default_title_col")]
    pub title_col: u32,
}

fn default_header_row() -> u32 {
    23
}

fn default_note_start_row() -> u32 {
    39
}

fn default_name_col() -> u32 {
    2
}

fn default_spec_col() -> u32 {
    3
}

fn default_desc_col() -> u32 {
    4
}

fn default_version_col() -> u32 {
    9
}

fn default_title_col() -> u32 {
    13
}

impl Default for RegisterLayout {
    fn default() -> Self {
        Self {
            header_row: default_header_row(),
            note_start_row: default_note_start_row(),
            name_col: default_name_col(),
            spec_col: default_spec_col(),
            desc_col: default_desc_col(),
            version_col: default_version_col(),
            title_col: default_title_col(),
        }
    }
}

impl RegisterLayout {
    /// Data rows available between the header row and the note block.
    pub fn available_rows(&self) -> u32 {
        self.note_start_row
            .saturating_sub(self.header_row)
            .saturating_sub(1)
    }

    /// First row fill mode is allowed to write to.
    pub fn data_start_row(&self) -> u32 {
        self.header_row + 1
    }

    /// Column number for a logical field.
    pub fn column_for(&self, role: crate::register::ColumnRole) -> u32 {
        use crate::register::ColumnRole;
        match role {
            ColumnRole::Name => self.name_col,
            ColumnRole::Spec => self.spec_col,
            ColumnRole::Description => self.desc_col,
            ColumnRole::Version => self.version_col,
            ColumnRole::Title => self.title_col,
        }
    }
}

pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<RegisterLayout, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_layout_from_str(&content)
}

pub fn load_layout_from_str(content: &str) -> Result<RegisterLayout, ConfigError> {
    let layout: RegisterLayout = serde_json::from_str(content)?;
    validate_layout(&layout)?;
    Ok(layout)
}

fn validate_layout(layout: &RegisterLayout) -> Result<(), ConfigError> {
    if layout.note_start_row <= layout.header_row {
        return Err(ConfigError::Validation {
            message: format!(
                "note_start_row ({}) must be below header_row ({})",
                layout.note_start_row, layout.header_row
            ),
        });
    }

    let columns = [
        ("name_col", layout.name_col),
        ("spec_col", layout.spec_col),
        ("desc_col", layout.desc_col),
        ("version_col", layout.version_col),
        ("title_col", layout.title_col),
    ];
    for (field, col) in columns {
        if col == 0 {
            return Err(ConfigError::Validation {
                message: format!("{} must be 1-based (got 0)", field),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_matches_legacy_register() {
        let layout = RegisterLayout::default();
        assert_eq!(layout.header_row, 23);
        assert_eq!(layout.note_start_row, 39);
        assert_eq!(layout.name_col, 2);
        assert_eq!(layout.spec_col, 3);
        assert_eq!(layout.desc_col, 4);
        assert_eq!(layout.version_col, 9);
        assert_eq!(layout.title_col, 13);
        assert_eq!(layout.available_rows(), 15);
        assert_eq!(layout.data_start_row(), 24);
    }

    #[test]
    fn test_load_partial_layout_uses_defaults() {
        let layout = load_layout_from_str(r#"{"header_row": 5, "note_start_row": 20}"#).unwrap();
        assert_eq!(layout.header_row, 5);
        assert_eq!(layout.note_start_row, 20);
        assert_eq!(layout.name_col, 2);
        assert_eq!(layout.available_rows(), 14);
    }

    #[test]
    fn test_note_row_above_header_rejected() {
        let err = load_layout_from_str(r#"{"header_row": 10, "note_start_row": 10}"#).unwrap_err();
        match err {
            ConfigError::Validation { message } => {
                assert!(message.contains("note_start_row"), "got: {}", message);
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_column_rejected() {
        let err = load_layout_from_str(r#"{"version_col": 0}"#).unwrap_err();
        match err {
            ConfigError::Validation { message } => {
                assert!(message.contains("version_col"), "got: {}", message);
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(load_layout_from_str(r#"{"headr_row": 5}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"header_row": 3, "note_start_row": 9}}"#).unwrap();

        let layout = load_layout(file.path()).unwrap();
        assert_eq!(layout.header_row, 3);
        assert_eq!(layout.available_rows(), 5);
    }
}
