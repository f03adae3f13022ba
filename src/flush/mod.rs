mod error;
mod json;

pub use error::PersistError;
pub use json::{load_or_init, load_snapshot, save_logged, save_snapshot};
