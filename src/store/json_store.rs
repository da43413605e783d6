use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::store::schema::{
    ActiveSessionData, Record, SavedQuestionsData, StatsData, StudyPlanData, TopicsData,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {file}: {source}")]
    Io {
        file: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{file} is not valid JSON: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{file} has schema version {found}, expected {expected}")]
    Version {
        file: &'static str,
        found: u32,
        expected: u32,
    },
    #[error("{file} failed validation: {reason}")]
    Invalid { file: &'static str, reason: String },
}

impl StoreError {
    pub fn file(&self) -> &'static str {
        match self {
            StoreError::Io { file, .. }
            | StoreError::Parse { file, .. }
            | StoreError::Version { file, .. }
            | StoreError::Invalid { file, .. } => file,
        }
    }
}

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> io::Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pilotprep");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// `Ok(None)` when the file does not exist yet. Parse, version and
    /// validation problems are errors; callers fall back to defaults.
    fn load<T: Record>(&self) -> Result<Option<T>, StoreError> {
        let path = self.file_path(T::FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            file: T::FILE,
            source,
        })?;
        let data: T = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            file: T::FILE,
            source,
        })?;
        if data.needs_reset() {
            return Err(StoreError::Version {
                file: T::FILE,
                found: data.schema_version(),
                expected: crate::store::schema::SCHEMA_VERSION,
            });
        }
        data.validate().map_err(|reason| StoreError::Invalid {
            file: T::FILE,
            reason,
        })?;
        Ok(Some(data))
    }

    fn save<T: Record>(&self, data: &T) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            file: T::FILE,
            source,
        };
        let path = self.file_path(T::FILE);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data).map_err(|source| StoreError::Parse {
            file: T::FILE,
            source,
        })?;
        let mut file = fs::File::create(&tmp_path).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        fs::rename(&tmp_path, &path).map_err(io_err)?;
        Ok(())
    }

    pub fn load_stats(&self) -> Result<Option<StatsData>, StoreError> {
        self.load()
    }

    pub fn save_stats(&self, data: &StatsData) -> Result<(), StoreError> {
        self.save(data)
    }

    pub fn load_saved_questions(&self) -> Result<Option<SavedQuestionsData>, StoreError> {
        self.load()
    }

    pub fn save_saved_questions(&self, data: &SavedQuestionsData) -> Result<(), StoreError> {
        self.save(data)
    }

    pub fn load_study_plan(&self) -> Result<Option<StudyPlanData>, StoreError> {
        self.load()
    }

    pub fn save_study_plan(&self, data: &StudyPlanData) -> Result<(), StoreError> {
        self.save(data)
    }

    pub fn load_topics(&self) -> Result<Option<TopicsData>, StoreError> {
        self.load()
    }

    pub fn save_topics(&self, data: &TopicsData) -> Result<(), StoreError> {
        self.save(data)
    }

    pub fn load_active_session(&self) -> Result<Option<ActiveSessionData>, StoreError> {
        self.load()
    }

    pub fn save_active_session(&self, data: &ActiveSessionData) -> Result<(), StoreError> {
        self.save(data)
    }

    pub fn clear_active_session(&self) -> Result<(), StoreError> {
        let path = self.file_path(ActiveSessionData::FILE);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                file: ActiveSessionData::FILE,
                source,
            }),
        }
    }

    pub fn has_active_session(&self) -> bool {
        self.file_path(ActiveSessionData::FILE).exists()
    }

    /// Directory for generated diagrams, created on demand.
    pub fn diagram_path(&self, id: &str) -> io::Result<PathBuf> {
        let dir = self.base_dir.join("diagrams");
        fs::create_dir_all(&dir)?;
        Ok(dir.join(format!("{id}.svg")))
    }
}
