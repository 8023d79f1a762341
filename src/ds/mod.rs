pub mod entry_store;
pub mod key_index;
pub mod order_list;
pub mod slot_arena;

pub use entry_store::EntryStore;
pub use key_index::KeyIndex;
pub use order_list::{OrderIter, OrderList};
pub use slot_arena::{SlotArena, SlotId};
