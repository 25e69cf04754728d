pub mod clock;
pub mod json_store;

pub use clock::{FixedClock, SystemClock};
pub use json_store::JsonFileStore;
