use super::fs_backend::FsBackend;
use super::memo_store::MemoRepo;
use std::path::{Path, PathBuf};

pub type FileStore = MemoRepo<FsBackend>;

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        MemoRepo::with_backend(FsBackend::new(root))
    }

    pub fn root(&self) -> &Path {
        self.backend.root()
    }
}
