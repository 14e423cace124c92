//! Vector scene graph and input pipeline for a freehand note canvas.
//!
//! Pointer samples flow through the [`input::GestureRouter`] into the
//! [`scene::Scene`]; strokes are smoothed into paths by [`geometry`]; the
//! [`wire`] adapter converts the scene to and from the persistence service's
//! JSON; a [`session::CanvasSession`] ties one open document together.

pub mod constants;
pub mod error;
pub mod flush;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod notifications;
pub mod perf;
pub mod persistence;
pub mod scene;
pub mod session;
pub mod settings;
pub mod spatial_index;
pub mod types;
pub mod wire;

pub use scene::Scene;
pub use session::CanvasSession;
