//! Conversion between the scene graph and the persistence service's JSON.
//!
//! ## Modules
//!
//! - `element` - Per-element wire payloads and their defaults
//! - `document` - Document, create/update bodies and QA shapes
//! - `adapter` - Scene to wire and back

mod adapter;
mod document;
mod element;

pub use crate::error::WireError;
pub use adapter::{from_wire, to_wire};
pub use document::{Answer, AttachmentRef, Document, DocumentUpdate, NewDocument, Question};
pub use element::{
    ImagePayload, StrokePayload, TextPayload, WireElement, WirePoint, WirePosition, WireTextStyle,
};

use serde::{Deserialize, Serialize};

/// How element ids are written on save.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// `"{type}-{index}"` within each type's list.
    ///
    /// Known limitation: any id the service assigned is discarded on every
    /// save, so external references to an element do not survive.
    #[default]
    Regenerate,
    /// Keep the id an element was loaded under; locally created elements get
    /// `"{type}-{uuid}"`.
    Preserve,
}
