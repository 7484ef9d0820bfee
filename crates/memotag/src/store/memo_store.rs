use super::backend::StorageBackend;
use super::{FindMemo, MemoStore, UpdateMemo};
use crate::error::{MemotagError, Result};
use crate::model::{Memo, MemoId};
use chrono::Utc;

pub struct MemoRepo<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> MemoRepo<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

fn matches(memo: &Memo, find: &FindMemo) -> bool {
    if find.id.is_some_and(|id| id != memo.id) {
        return false;
    }
    if find.creator_id.is_some_and(|creator| creator != memo.creator_id) {
        return false;
    }
    if find.exclude_comments && memo.is_comment() {
        return false;
    }
    match &find.tag_filter {
        Some(filter) => filter.matches(&memo.payload),
        None => true,
    }
}

impl<B: StorageBackend> MemoStore for MemoRepo<B> {
    fn list_memos(&self, find: &FindMemo) -> Result<Vec<Memo>> {
        let memos = self.backend.load_memos()?;
        let offset = find.offset.unwrap_or(0);
        let limit = find.limit.unwrap_or(usize::MAX);
        Ok(memos
            .into_iter()
            .filter(|m| matches(m, find))
            .skip(offset)
            .take(limit)
            .collect())
    }

    fn get_memo(&self, id: &MemoId) -> Result<Option<Memo>> {
        Ok(self.backend.load_memos()?.into_iter().find(|m| m.id == *id))
    }

    fn create_memo(&mut self, memo: Memo) -> Result<Memo> {
        let mut memos = self.backend.load_memos()?;
        if memos.iter().any(|m| m.id == memo.id) {
            return Err(MemotagError::Store(format!("memo {} already exists", memo.id)));
        }
        memos.push(memo.clone());
        self.backend.save_memos(&memos)?;
        Ok(memo)
    }

    fn update_memo(&mut self, update: &UpdateMemo) -> Result<()> {
        let mut memos = self.backend.load_memos()?;
        let memo = memos
            .iter_mut()
            .find(|m| m.id == update.id)
            .ok_or(MemotagError::MemoNotFound(update.id))?;
        if let Some(content) = &update.content {
            memo.content = content.clone();
        }
        if let Some(payload) = &update.payload {
            memo.payload = payload.clone();
        }
        memo.updated_at = Utc::now();
        self.backend.save_memos(&memos)
    }

    fn delete_memo(&mut self, id: &MemoId) -> Result<()> {
        let mut memos = self.backend.load_memos()?;
        if !memos.iter().any(|m| m.id == *id) {
            return Err(MemotagError::MemoNotFound(*id));
        }
        memos.retain(|m| m.id != *id && m.parent_id != Some(*id));
        self.backend.save_memos(&memos)
    }
}
