#![no_std] // Shared with the WASM build

extern crate alloc;

// Enable std if the feature is active (for packs, tests and tools)
#[cfg(feature = "std")]
extern crate std;

pub mod ids;
pub mod role;
pub mod glossary;

// Re-export core types for convenience
pub use ids::{NodeId, SentenceId};
pub use role::*;

pub mod model;
pub use model::*;

#[cfg(feature = "std")]
pub mod pack;
#[cfg(feature = "std")]
pub use pack::{CorpusPack, PackError, PACK_VERSION};
