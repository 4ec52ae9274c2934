mod change_observable;
mod key_value_store;
mod memory_store;
mod persisted_flag;
mod store_change;
mod subscription;
#[cfg(test)]
mod test_logger;

pub use change_observable::ChangeObservable;
pub use key_value_store::KeyValueStore;
pub use key_value_store::StoreError;
pub use memory_store::MemoryStore;
pub use persisted_flag::FlagChanges;
pub use persisted_flag::PersistedFlag;
pub use store_change::StoreChange;
pub use subscription::Subscription;
