//! Per-variable transform-and-aggregate pipeline.
//!
//! Drives one dataset through rendering and tabular export: each variable
//! is independently reduced, colored, and rasterized, and independently
//! flattened, written as CSV, and merged into the combined table. A
//! failure in one variable never aborts the run; only a dataset that
//! cannot be opened does.

pub mod orchestrator;
pub mod policy;
pub mod reduce;
pub mod sink;

pub use orchestrator::{run, PipelineConfig, PipelineOutput};
pub use policy::ColormapPolicy;
pub use reduce::reduce;
pub use sink::{ArtifactSink, DirectorySink};
