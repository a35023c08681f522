//! Q-table persistence.
//!
//! Tables are stored as a flat JSON object mapping `"px,py,tx,ty-dx-dy"` to
//! its value. Loading and saving are best effort from the caller's point of
//! view: [`load_or_empty`] and [`save_best_effort`] log failures and carry on.

pub mod error;
pub mod store;

pub use error::PersistenceError;
pub use store::{
    decode_entry, decode_table, encode_table, load_or_empty, save_best_effort, JsonFileStore,
    TableStore,
};
