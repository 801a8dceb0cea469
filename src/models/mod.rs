pub mod analysis;
pub mod scene;
pub mod segment;
pub mod telemetry;

pub use analysis::{AnalyzedScene, StructuredAnalysis};
pub use scene::{ContinuityIssue, Scene, ValidationOutcome};
pub use segment::{SceneType, Segment, SegmentationResult, ShotType};
pub use telemetry::TelemetryRecord;
