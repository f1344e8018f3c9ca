use cohesim_core::common::MemoryError;
use cohesim_core::memory::BackingStore;
use mockall::mock;

mock! {
    pub Store {}
    impl BackingStore for Store {
        fn len(&self) -> usize;
        fn read_block(&mut self, address: u32, buf: &mut [u8]) -> Result<(), MemoryError>;
        fn write_block(&mut self, address: u32, data: &[u8]) -> Result<(), MemoryError>;
    }
}

/// A store of `size` bytes that reads as zeros and accepts no writebacks
/// unless the test adds an expectation for them.
pub fn zeroed_store(size: usize) -> MockStore {
    let mut store = MockStore::new();
    let _ = store.expect_len().return_const(size);
    let _ = store.expect_read_block().returning(|_, buf| {
        buf.fill(0);
        Ok(())
    });
    store
}
