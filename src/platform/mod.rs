//! Platform abstraction layer
//!
//! Host services the simulation cores are driven by:
//! - Frame timing (`clock`)
//! - Input events (`input`)
//! - Storage (`storage`, LocalStorage on web)
//! - Image preloading (`assets`)

pub mod assets;
pub mod clock;
pub mod input;
pub mod storage;

pub use assets::{LoadResult, Preloader};
pub use clock::FrameClock;
pub use input::{Action, PendingInput, action_for_key};
pub use storage::{KeyValueStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStore;
