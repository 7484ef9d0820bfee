use crate::error::Result;
use crate::model::Memo;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while MemoRepo handles the "what" (filtering, ownership, cascade).
pub trait StorageBackend {
    /// Load every memo, in creation order.
    fn load_memos(&self) -> Result<Vec<Memo>>;

    /// Replace the stored memo list.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_memos(&self, memos: &[Memo]) -> Result<()>;
}
