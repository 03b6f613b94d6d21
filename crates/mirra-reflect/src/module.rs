//! Modules and the type entries they declare.
//!
//! A [`Module`] is the registration-time analog of a loaded unit of code:
//! it declares, in order, the types it contributes. Each [`TypeEntry`]
//! pairs a fully-qualified name and the runtime identity of a Rust type
//! with the base capabilities that type derives from, one constructor
//! factory per base.
//!
//! Scans re-read declarations on every call, so enumerating twice observes
//! modules registered in between.

use std::any::{Any, TypeId};

use crate::args::Args;
use crate::binding::{Visibility, CTOR_ACCESS};
use crate::error::{ConstructError, MetadataError};

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Instantiable type; visible to enumeration.
    Concrete,
    /// Abstract base or trait; resolvable by name, never instantiated.
    Abstract,
}

/// Constructor factory producing a type as one of its bases.
///
/// Plain `fn` pointers keep the registry `Send + Sync` and match the
/// pre-instantiated dispatch style used throughout the crate.
pub type Factory<B> = fn(&Args) -> Result<Box<B>, ConstructError>;

struct BaseSlot {
    base_id: TypeId,
    ctor_visibility: Visibility,
    // Erased Factory<B>; recovered by downcast in `factory_for`.
    factory: Box<dyn Any + Send + Sync>,
}

/// A declared type: name, runtime identity, kind, and base capabilities.
pub struct TypeEntry {
    name: String,
    id: TypeId,
    kind: TypeKind,
    bases: Vec<BaseSlot>,
}

impl TypeEntry {
    /// Declare the concrete type `C` under a fully-qualified name.
    pub fn concrete<C: 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: TypeId::of::<C>(),
            kind: TypeKind::Concrete,
            bases: Vec::new(),
        }
    }

    /// Declare the abstract base `C` (usually a trait object type) under a
    /// fully-qualified name, making it resolvable by name.
    pub fn abstract_base<C: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: TypeId::of::<C>(),
            kind: TypeKind::Abstract,
            bases: Vec::new(),
        }
    }

    /// Record that this type derives from `B`, constructible through a
    /// public constructor.
    pub fn with_base<B: ?Sized + 'static>(self, factory: Factory<B>) -> Self {
        self.with_base_via(Visibility::Public, factory)
    }

    /// Record that this type derives from `B`, constructible through a
    /// constructor of the given visibility.
    pub fn with_base_via<B: ?Sized + 'static>(
        mut self,
        visibility: Visibility,
        factory: Factory<B>,
    ) -> Self {
        self.bases.push(BaseSlot {
            base_id: TypeId::of::<B>(),
            ctor_visibility: visibility,
            factory: Box::new(factory),
        });
        self
    }

    /// Fully-qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runtime identity of the declared type itself.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Declared kind.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether the entry is instantiable.
    pub fn is_concrete(&self) -> bool {
        self.kind == TypeKind::Concrete
    }

    /// Whether the entry declares `B` among its bases.
    pub fn derives_from<B: ?Sized + 'static>(&self) -> bool {
        let id = TypeId::of::<B>();
        self.bases.iter().any(|slot| slot.base_id == id)
    }

    /// Copyable descriptor for this entry.
    pub fn handle(&self) -> TypeHandle {
        TypeHandle {
            name: self.name.clone(),
            id: self.id,
            kind: self.kind,
        }
    }

    /// Factory for base `B` under the fixed constructor policy, if this
    /// entry declares that base.
    fn factory_for<B: ?Sized + 'static>(&self) -> Option<Factory<B>> {
        let id = TypeId::of::<B>();
        self.bases.iter().find_map(|slot| {
            if slot.base_id != id || !CTOR_ACCESS.admits(slot.ctor_visibility) {
                return None;
            }
            slot.factory.downcast_ref::<Factory<B>>().copied()
        })
    }
}

impl std::fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("bases", &self.bases.len())
            .finish()
    }
}

/// Copyable descriptor of a declared type, as returned by name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHandle {
    name: String,
    id: TypeId,
    kind: TypeKind,
}

impl TypeHandle {
    /// Fully-qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runtime identity of the described type.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Declared kind.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether the described type is instantiable.
    pub fn is_concrete(&self) -> bool {
        self.kind == TypeKind::Concrete
    }

    /// Whether the handle denotes the Rust type `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

/// A registration unit contributing type declarations.
pub struct Module {
    name: String,
    entries: Vec<TypeEntry>,
    unreadable: Option<String>,
}

impl Module {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            unreadable: None,
        }
    }

    /// Create a module whose type metadata cannot be read.
    ///
    /// Models dynamically loaded units that fail on metadata access; scans
    /// treat such a module as contributing nothing instead of failing.
    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            unreadable: Some(reason.into()),
        }
    }

    /// Declare a type, builder style.
    pub fn with_type(mut self, entry: TypeEntry) -> Self {
        self.declare(entry);
        self
    }

    /// Declare a type. Declaration order is preserved.
    pub fn declare(&mut self, entry: TypeEntry) {
        self.entries.push(entry);
    }

    /// Module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared entries, or the metadata defect for unreadable modules.
    pub fn types(&self) -> Result<&[TypeEntry], MetadataError> {
        match &self.unreadable {
            Some(reason) => Err(MetadataError {
                module: self.name.clone(),
                reason: reason.clone(),
            }),
            None => Ok(&self.entries),
        }
    }

    // Entries as seen by scans: unreadable metadata contributes nothing.
    fn readable_entries(&self) -> &[TypeEntry] {
        if self.unreadable.is_some() {
            &[]
        } else {
            &self.entries
        }
    }

    /// Lazily construct one instance per concrete strict subclass of `B`,
    /// in declaration order.
    ///
    /// An entry qualifies when it is concrete, declares `B` among its
    /// bases, and is not `B` itself. Construction failures surface as
    /// `Err` items; an unreadable module yields nothing.
    pub fn instances_of<'a, B: ?Sized + 'static>(
        &'a self,
        args: &'a Args,
    ) -> impl Iterator<Item = Result<Box<B>, ConstructError>> + 'a {
        crate::verify::ensure();
        let base = TypeId::of::<B>();
        self.readable_entries().iter().filter_map(move |entry| {
            if !entry.is_concrete() || entry.type_id() == base {
                return None;
            }
            let factory = entry.factory_for::<B>()?;
            Some(factory(args))
        })
    }

    /// First qualifying instance of `B`, or `None` when the module
    /// declares no concrete strict subclass of `B`.
    pub fn first_instance_of<B: ?Sized + 'static>(
        &self,
        args: &Args,
    ) -> Option<Result<Box<B>, ConstructError>> {
        self.instances_of::<B>(args).next()
    }

    /// Resolve a declared type by exact, case-sensitive fully-qualified
    /// name. Unreadable metadata resolves nothing.
    pub fn find_type(&self, name: &str) -> Option<TypeHandle> {
        crate::verify::ensure();
        self.readable_entries()
            .iter()
            .find(|entry| entry.name() == name)
            .map(TypeEntry::handle)
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("types", &self.entries.len())
            .field("unreadable", &self.unreadable.is_some())
            .finish()
    }
}
