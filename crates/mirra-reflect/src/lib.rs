//! Mirra reflection toolkit
//!
//! Runtime type lookup for a language without runtime type discovery:
//! an explicit, registration-populated substitute for the introspection
//! facilities managed runtimes provide out of the box.
//!
//! - **Module registry** (`module`, `registry` modules): modules declare
//!   the types they contribute; scans enumerate constructed instances of
//!   every concrete strict subclass of a base capability, or resolve a
//!   type handle from its fully-qualified name.
//! - **Generic dispatch** (`generic` module): dispatch tables mapping a
//!   runtime type-argument handle to pre-instantiated closed-generic
//!   function pointers, for invoking generic methods and constructing
//!   generic types when the type argument is only known at runtime.
//! - **Runtime verifier** (`verify` module): a one-time process check
//!   that the host runs in a 64-bit configuration, triggered lazily by
//!   the other two components.
//!
//! # Example
//!
//! ```rust
//! use mirra_reflect::{registry, Args, Module, TypeEntry};
//!
//! trait Renderer {
//!     fn id(&self) -> &'static str;
//! }
//!
//! struct Software;
//! impl Renderer for Software {
//!     fn id(&self) -> &'static str {
//!         "software"
//!     }
//! }
//!
//! fn make_software(
//!     _args: &Args,
//! ) -> Result<Box<dyn Renderer>, mirra_reflect::ConstructError> {
//!     Ok(Box::new(Software))
//! }
//!
//! registry::register(
//!     Module::new("render")
//!         .with_type(
//!             TypeEntry::concrete::<Software>("render::Software")
//!                 .with_base::<dyn Renderer>(make_software),
//!         ),
//! );
//!
//! let renderers = registry::instances_of::<dyn Renderer>(&Args::new());
//! assert_eq!(renderers.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Opaque argument lists for constructors and methods.
pub mod args;

/// Constructor- and method-resolution policies.
pub mod binding;

/// Error types.
pub mod error;

/// Late-bound generic dispatch tables.
pub mod generic;

/// Modules and their declared type entries.
pub mod module;

/// The module registry and its process-global instance.
pub mod registry;

/// Process architecture verification.
pub mod verify;

pub use args::Args;
pub use binding::{Access, MethodFilter, Receiver, Visibility};
pub use error::{ArgError, ConstructError, InvokeError, MetadataError};
pub use generic::{CtorSlot, GenericCtorFn, GenericDispatch, GenericMethodFn, MethodSlot};
pub use module::{Factory, Module, TypeEntry, TypeHandle, TypeKind};
pub use registry::ModuleRegistry;
pub use verify::{is_64bit, verify, UNSUPPORTED_ARCH_EXIT_CODE};
