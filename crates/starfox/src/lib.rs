//! starfox: renders UIXML markup into live control graphs.
//!
//! A host registers [`ControlDefinition`]s (what attributes, events and child
//! containers a control type understands, plus a factory) with an
//! [`Engine`], then renders a document:
//!
//! ```text
//! UIXML text ──parse──► Document ──render──► App { controls, groups }
//!                                                │
//!                                                └─► published onto the controller
//! ```
//!
//! Controls and controllers are plain Rust types implementing [`Control`]
//! and [`Object`]; the engine only ever talks to them through property
//! assignment and method calls by name.

pub mod app;
pub mod binder;
pub mod coerce;
pub mod config;
pub mod definition;
pub mod engine;
pub mod error;
pub mod group;
pub mod load;
pub mod logging;
pub mod object;
pub mod registry;
pub mod resource;
pub mod value;

mod render;

#[cfg(test)]
mod testing;

pub use app::App;
pub use coerce::ValueType;
pub use config::EngineConfig;
pub use definition::{AttributeDefinition, ContainerDefinition, ControlDefinition, EventDefinition};
pub use engine::{Engine, MarkupParser, RenderOptions, UixmlParser};
pub use error::{Error, Result};
pub use group::Group;
pub use load::{FileOpener, MarkupStream, MemoryOpener, UriOpener};
pub use logging::{init_logging, LoggingConfig};
pub use object::{control_ref, object_ref, Control, ControlRef, MemberError, Object, ObjectRef};
pub use registry::ControlRegistry;
pub use resource::{Package, Resource};
pub use value::{Callback, Value};
