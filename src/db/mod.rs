mod migrate;
mod snapshot;

pub use migrate::migrate;
pub use snapshot::{CLAIMS_ENGINE, SIEGES_ENGINE, load_snapshot, save_snapshot};
