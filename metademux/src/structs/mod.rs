//! Data types passed between the pipeline stages: the detected dialect,
//! records, candidate references and resolved entries.

pub mod dialect;
pub mod record;
pub mod reference;
