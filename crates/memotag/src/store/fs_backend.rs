use super::backend::StorageBackend;
use crate::error::{MemotagError, Result};
use crate::model::Memo;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DATA_FILE: &str = "memos.json";

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join(DATA_FILE)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(MemotagError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_memos(&self) -> Result<Vec<Memo>> {
        let data_file = self.data_file();
        if !data_file.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&data_file).map_err(MemotagError::Io)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let memos: Vec<Memo> = serde_json::from_str(&content)?;
        Ok(memos)
    }

    fn save_memos(&self, memos: &[Memo]) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(memos)?;
        let tmp_file = self.root.join(format!(".memos-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(MemotagError::Io)?;
        fs::rename(&tmp_file, self.data_file()).map_err(MemotagError::Io)?;
        Ok(())
    }
}
