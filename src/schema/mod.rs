//! Input model for track synthesis
//!
//! Raw per-field streams as delivered by a fetch layer, and the activity
//! header that anchors their time offsets to an absolute instant.

mod header;
mod streams;

pub use header::*;
pub use streams::*;
