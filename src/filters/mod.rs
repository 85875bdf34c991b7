//! # Filter Catalog
//!
//! Descriptors for every filter the pipeline knows about, the closed set of
//! filter kinds with their parameters, and the read-only registry that holds
//! them in display order.
//!
//! ## Usage
//!
//! ```rust
//! use camera_filters::filters::FilterRegistry;
//!
//! let registry = FilterRegistry::new();
//! let posterize = registry.lookup("color_posterize").unwrap();
//! assert_eq!(posterize.kind.param("levels"), Some(6.0));
//! ```

pub mod descriptor;
pub mod kind;
pub mod registry;

pub use descriptor::{AuxiliaryInputs, FilterCategory, FilterDescriptor, FilterInvocation, ParameterSpec};
pub use kind::{FilterKind, PhotoEffect};
pub use registry::FilterRegistry;
