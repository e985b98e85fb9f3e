mod state;

pub use state::{AppState, ScanOutcome};
