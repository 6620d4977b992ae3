use std::fs;
use std::path::{Path, PathBuf};

use teambuilder_core::{CharacterRow, DataSource, SheetError, SheetFormat, parse_rows};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsSourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Sheet {
        path: PathBuf,
        #[source]
        source: SheetError,
    },
}

/// Sheet file plus portrait directory on local disk.
#[derive(Debug, Clone)]
pub struct FsDataSource {
    sheet: PathBuf,
    portraits: PathBuf,
}

impl FsDataSource {
    pub fn new(sheet: impl Into<PathBuf>, portraits: impl Into<PathBuf>) -> Self {
        Self {
            sheet: sheet.into(),
            portraits: portraits.into(),
        }
    }

    pub fn sheet(&self) -> &Path {
        &self.sheet
    }

    fn sheet_format(&self) -> Result<SheetFormat, FsSourceError> {
        let ext = self
            .sheet
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        SheetFormat::from_extension(ext).map_err(|source| FsSourceError::Sheet {
            path: self.sheet.clone(),
            source,
        })
    }
}

impl DataSource for FsDataSource {
    type Error = FsSourceError;

    fn load_rows(&self) -> Result<Vec<CharacterRow>, Self::Error> {
        let format = self.sheet_format()?;
        let bytes = fs::read(&self.sheet).map_err(|source| FsSourceError::Io {
            path: self.sheet.clone(),
            source,
        })?;
        let rows = parse_rows(&bytes, format).map_err(|source| FsSourceError::Sheet {
            path: self.sheet.clone(),
            source,
        })?;
        log::debug!("read {} rows from {}", rows.len(), self.sheet.display());
        Ok(rows)
    }

    fn list_portraits(&self) -> Result<Vec<String>, Self::Error> {
        let io_err = |source| FsSourceError::Io {
            path: self.portraits.clone(),
            source,
        };
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.portraits).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            if !entry.file_type().map_err(io_err)?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => log::warn!("skipping non UTF-8 portrait name {raw:?}"),
            }
        }
        Ok(names)
    }
}
