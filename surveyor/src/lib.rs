// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    load_targets_from_file,
    load_targets_from_source,
    parse_target_line,
};

// Re-export batch execution from surveyor-core
pub use surveyor_core::recon::{
    ReconOptions, ReconProgressCallback, execute_recon, summary_line,
};
