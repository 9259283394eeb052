//! Settings storage backed by a file

use std::{
    fs,
    io::{self, ErrorKind},
    path::PathBuf,
};

use candue_common::{traits::SettingsStorage, SettingsRecord, SETTINGS_RECORD_SIZE};

/// Stores the settings record in a single file
///
/// Writes go to a temporary file which is then renamed over the record, so an interrupted write
/// leaves the previous record in place.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a storage using the file at `path`. The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsStorage for FileStorage {
    type Error = io::Error;

    fn read_record(&mut self) -> Result<Option<SettingsRecord>, Self::Error> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        match SettingsRecord::try_from(data.as_slice()) {
            Ok(record) => Ok(Some(record)),
            Err(_) => {
                log::warn!(
                    "{} is {} bytes, expected {}",
                    self.path.display(),
                    data.len(),
                    SETTINGS_RECORD_SIZE
                );
                Ok(None)
            }
        }
    }

    fn write_record(&mut self, record: &SettingsRecord) -> Result<(), Self::Error> {
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, record)?;
        fs::rename(&tmp_path, &self.path)?;
        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
