//! Mesh gradients: organic blends of elliptical light sources on a square canvas.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`model`] | `Gradient`, `ColorStop`, `BlendMode`, `GradientConfig`, `GradientPatch` |
//! | [`limits`] | size, range and naming constants |
//! | [`factory`] | id minting, random stop construction |
//! | [`validate`] | schema and range checks for untrusted input |
//! | [`codec`] | compact URL-safe share tokens, content equality |
//! | [`render`] | layered radial rendering, circular mask, redraw memoization |
//! | [`export`] | export sizes and file naming |
//!
//! # Quick start
//!
//! ```rust
//! use phase_mesh::{codec, factory, render, BlendMode, GradientConfig};
//!
//! let gradient = factory::create_gradient(GradientConfig {
//!     color_stops: vec![factory::create_color_stop("#FF6B6B", Some((30.0, 40.0)), 60.0)],
//!     blend_mode: Some(BlendMode::Screen),
//! });
//!
//! let token = codec::encode(std::slice::from_ref(&gradient));
//! let decoded = codec::try_decode(&token).unwrap();
//! assert!(codec::same_content(&gradient, &decoded[0]));
//!
//! let surface = render::render(&gradient, 64);
//! assert_eq!(surface.width(), 64);
//! ```

pub mod codec;
pub mod export;
pub mod factory;
pub mod limits;
pub mod model;
pub mod render;
pub mod validate;

pub use codec::DecodeError;
pub use export::ExportSize;
pub use model::{BlendMode, ColorStop, Gradient, GradientConfig, GradientPatch};
