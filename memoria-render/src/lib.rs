//! # memoria-render
//!
//! Platform registry and Tera-based decoration of the serialized memory
//! document into per-platform destination payloads.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use memoria_render::{Decorator, PlatformKind};
//!
//! fn decorate_all(content: &str) {
//!     if let Ok(decorator) = Decorator::new() {
//!         for platform in PlatformKind::all() {
//!             if let Ok(payload) = decorator.decorate(*platform, content, "default") {
//!                 println!("{}: {} bytes", platform.name(), payload.len());
//!             }
//!         }
//!     }
//! }
//! ```

pub mod decorator;
pub mod error;
pub mod platform;

pub use decorator::Decorator;
pub use error::RenderError;
pub use platform::PlatformKind;
