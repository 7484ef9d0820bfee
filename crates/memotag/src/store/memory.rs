use super::mem_backend::MemBackend;
use super::memo_store::MemoRepo;

pub type InMemoryStore = MemoRepo<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        MemoRepo::with_backend(MemBackend::new())
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.backend.set_simulate_write_error(simulate);
    }

    /// Let `count` more writes succeed, then fail the rest.
    pub fn fail_writes_after(&self, count: usize) {
        self.backend.fail_writes_after(count);
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::content::{ContentParser, MarkdownParser};
    use crate::model::{Memo, MemoId, UserId};
    use crate::store::MemoStore;
    use crate::tags::build_payload;

    pub struct StoreFixture {
        pub store: InMemoryStore,
        pub ids: Vec<MemoId>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                ids: Vec::new(),
            }
        }

        /// Adds a memo with its payload built from `content`.
        pub fn with_memo(mut self, creator_id: UserId, content: &str) -> Self {
            let id = self.insert(Memo::new(creator_id, content));
            self.ids.push(id);
            self
        }

        /// Adds a comment on the memo at `parent_index` in `ids`.
        pub fn with_comment(mut self, parent_index: usize, content: &str) -> Self {
            let parent = self.ids[parent_index];
            let creator = self.store.get_memo(&parent).unwrap().unwrap().creator_id;
            let id = self.insert(Memo::new(creator, content).with_parent(parent));
            self.ids.push(id);
            self
        }

        fn insert(&mut self, mut memo: Memo) -> MemoId {
            let nodes = MarkdownParser::new().parse(&memo.content).unwrap();
            memo.payload = build_payload(&nodes);
            self.store.create_memo(memo).unwrap().id
        }

        pub fn content_of(&self, index: usize) -> Option<String> {
            self.store
                .get_memo(&self.ids[index])
                .unwrap()
                .map(|m| m.content)
        }
    }
}
