mod state;

pub use state::{TelemetryState, TelemetryStateManager};
