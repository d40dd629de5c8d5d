pub mod kernel;
pub mod pipeline;

pub use kernel::{drive, drive_until, RunSummary};
pub use pipeline::{
    ConnectionConfig, NodeConfig, Pipeline, PipelineBuilder, PipelineConfig, ASSEMBLER_ID,
};
