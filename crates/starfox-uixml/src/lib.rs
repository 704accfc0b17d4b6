//! Document model and parser for **UIXML**, the markup the starfox engine
//! renders into controls.
//!
//! This crate only knows about XML structure. It has no idea what a control,
//! a group or a controller is, so validators and editor tooling can consume
//! it without the control runtime.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Document`, `Element`, `Node`, `Attribute` |
//! | [`error`] | `ParseError` |
//! | [`parser`] | `parse_str` entry point |
//!
//! # Quick start
//!
//! ```rust
//! use starfox_uixml::parse_str;
//!
//! let src = r#"
//!     <ui name="Hello">
//!         <window title="Main">
//!             <button name="ok"/>
//!         </window>
//!     </ui>
//! "#;
//!
//! let doc = parse_str(src).unwrap();
//! assert_eq!(doc.root.tag, "ui");
//! assert_eq!(doc.root.attr("name"), Some("Hello"));
//! ```

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::{Attribute, Document, Element, Node};
pub use error::ParseError;
pub use parser::parse_str;
