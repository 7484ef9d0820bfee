use super::backend::StorageBackend;
use crate::error::{MemotagError, Result};
use crate::model::Memo;
use std::cell::{Cell, RefCell};

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the engine is
/// single-threaded per request.
#[derive(Default)]
pub struct MemBackend {
    memos: RefCell<Vec<Memo>>,
    simulate_write_error: Cell<bool>,
    /// Successful saves left before writes start failing.
    writes_before_failure: Cell<Option<usize>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Let `count` more saves succeed, then fail every save after that.
    pub fn fail_writes_after(&self, count: usize) {
        self.writes_before_failure.set(Some(count));
    }

    fn check_write(&self) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(MemotagError::Store("Simulated write error".to_string()));
        }
        match self.writes_before_failure.get() {
            Some(0) => Err(MemotagError::Store("Simulated write error".to_string())),
            Some(n) => {
                self.writes_before_failure.set(Some(n - 1));
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl StorageBackend for MemBackend {
    fn load_memos(&self) -> Result<Vec<Memo>> {
        Ok(self.memos.borrow().clone())
    }

    fn save_memos(&self, memos: &[Memo]) -> Result<()> {
        self.check_write()?;
        *self.memos.borrow_mut() = memos.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let backend = MemBackend::new();
        let memo = Memo::new(1, "x");
        backend.save_memos(std::slice::from_ref(&memo)).unwrap();
        assert_eq!(backend.load_memos().unwrap(), vec![memo]);
    }

    #[test]
    fn test_simulated_write_error() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        assert!(backend.save_memos(&[]).is_err());
        backend.set_simulate_write_error(false);
        assert!(backend.save_memos(&[]).is_ok());
    }

    #[test]
    fn test_fail_writes_after() {
        let backend = MemBackend::new();
        backend.fail_writes_after(2);
        assert!(backend.save_memos(&[]).is_ok());
        assert!(backend.save_memos(&[]).is_ok());
        assert!(backend.save_memos(&[]).is_err());
        assert!(backend.save_memos(&[]).is_err());
    }
}
