//! Gradient studio: the collection store and its collaborators.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`store`] | canonical list, import flow, debounced persistence, share links |
//! | [`persist`] | key-value storage (`MemoryStore`, `FileStore`) |
//! | [`share`] | page URL handling, clipboard access |
//! | [`export`] | throttled PNG export |
//! | [`config`] | `StudioConfig`, state directory resolution |

pub mod config;
pub mod export;
pub mod persist;
pub mod share;
pub mod store;

pub use config::StudioConfig;
pub use store::{GradientStore, ImportResolution, ImportStatus};
