// Preview rendering and export. PDF encoding is CPU-bound and must run inside
// tokio::task::spawn_blocking.

pub mod export;
pub mod handlers;
pub mod pdf;
pub mod preview;
