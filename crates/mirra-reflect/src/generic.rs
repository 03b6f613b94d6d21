//! Late-bound generic dispatch.
//!
//! Compile-time generics cannot be specialized from a runtime type handle,
//! so every closed combination is registered up front: generic methods and
//! generic constructible types each map a type-argument `TypeId` to a
//! pre-instantiated function pointer.
//!
//! The two paths deliberately fail differently: method lookup misses are
//! soft (the dispatcher reports an absent result), while construction
//! misses and every failure past a successful lookup are hard errors.

use std::any::{Any, TypeId};
use std::sync::LazyLock;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::args::Args;
use crate::binding::{MethodFilter, Visibility, CTOR_ACCESS};
use crate::error::{ConstructError, InvokeError};

/// A pre-instantiated closed generic method.
///
/// Receives the instance receiver (`None` for static methods) and the call
/// arguments.
pub type GenericMethodFn = fn(Option<&dyn Any>, &Args) -> Result<Box<dyn Any>, InvokeError>;

/// A pre-instantiated closed generic constructor.
pub type GenericCtorFn = fn(&Args) -> Result<Box<dyn Any>, ConstructError>;

/// A generic method declared on a class, with its specializations.
pub struct MethodSlot {
    visibility: Visibility,
    is_static: bool,
    specializations: FxHashMap<TypeId, GenericMethodFn>,
}

impl MethodSlot {
    /// Install the closed function for type argument `A`.
    pub fn specialize<A: 'static>(&mut self, f: GenericMethodFn) -> &mut Self {
        self.specializations.insert(TypeId::of::<A>(), f);
        self
    }
}

struct CtorSpec {
    visibility: Visibility,
    construct: GenericCtorFn,
}

/// An open generic type registered for construction, with its
/// specializations.
pub struct CtorSlot {
    name: String,
    specializations: FxHashMap<TypeId, CtorSpec>,
}

impl CtorSlot {
    /// Install the closed constructor for type argument `A` (public
    /// constructor).
    pub fn specialize<A: 'static>(&mut self, f: GenericCtorFn) -> &mut Self {
        self.specialize_via::<A>(Visibility::Public, f)
    }

    /// Install the closed constructor for type argument `A` with the
    /// given constructor visibility.
    pub fn specialize_via<A: 'static>(&mut self, visibility: Visibility, f: GenericCtorFn) -> &mut Self {
        self.specializations.insert(
            TypeId::of::<A>(),
            CtorSpec {
                visibility,
                construct: f,
            },
        );
        self
    }
}

/// Dispatch tables for late-bound generic methods and constructors.
#[derive(Default)]
pub struct GenericDispatch {
    // class -> method name -> slot
    methods: FxHashMap<TypeId, FxHashMap<String, MethodSlot>>,
    // open generic base -> slot
    ctors: FxHashMap<TypeId, CtorSlot>,
}

impl GenericDispatch {
    /// Create empty dispatch tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a generic method named `name` on class `C`; chain
    /// [`MethodSlot::specialize`] to install closed functions.
    ///
    /// Re-declaring a name updates its modifiers and keeps installed
    /// specializations.
    pub fn register_method<C: ?Sized + 'static>(
        &mut self,
        name: &str,
        visibility: Visibility,
        is_static: bool,
    ) -> &mut MethodSlot {
        let slot = self
            .methods
            .entry(TypeId::of::<C>())
            .or_default()
            .entry(name.to_string())
            .or_insert_with(|| MethodSlot {
                visibility,
                is_static,
                specializations: FxHashMap::default(),
            });
        slot.visibility = visibility;
        slot.is_static = is_static;
        slot
    }

    /// Declare the open generic type `O` as constructible, under a
    /// diagnostic name; chain [`CtorSlot::specialize`] to install closed
    /// constructors.
    pub fn register_generic<O: ?Sized + 'static>(&mut self, name: &str) -> &mut CtorSlot {
        self.ctors
            .entry(TypeId::of::<O>())
            .or_insert_with(|| CtorSlot {
                name: name.to_string(),
                specializations: FxHashMap::default(),
            })
    }

    /// Whether class `C` declares a generic method `name` visible under
    /// `filter`.
    pub fn has_method<C: ?Sized + 'static>(&self, name: &str, filter: MethodFilter) -> bool {
        self.methods
            .get(&TypeId::of::<C>())
            .and_then(|methods| methods.get(name))
            .is_some_and(|slot| filter.matches(slot.visibility, slot.is_static))
    }

    /// Invoke a generic method with a runtime type argument.
    ///
    /// Returns `Ok(None)` when the class or method is unknown under
    /// `filter`, or when no specialization exists for `type_arg`; lookup
    /// never fails hard. Failures raised by the resolved method propagate.
    /// Static methods ignore `instance`; instance methods without one fail
    /// with [`InvokeError::MissingReceiver`].
    pub fn invoke(
        &self,
        class: TypeId,
        instance: Option<&dyn Any>,
        method: &str,
        filter: MethodFilter,
        type_arg: TypeId,
        args: &Args,
    ) -> Result<Option<Box<dyn Any>>, InvokeError> {
        crate::verify::ensure();
        let slot = match self.methods.get(&class).and_then(|methods| methods.get(method)) {
            Some(slot) => slot,
            None => return Ok(None),
        };
        if !filter.matches(slot.visibility, slot.is_static) {
            return Ok(None);
        }
        let f = match slot.specializations.get(&type_arg) {
            Some(f) => *f,
            None => return Ok(None),
        };
        let receiver = if slot.is_static {
            None
        } else if instance.is_some() {
            instance
        } else {
            return Err(InvokeError::MissingReceiver);
        };
        f(receiver, args).map(Some)
    }

    /// Construct an instance of the closed generic type `open[type_arg]`.
    ///
    /// Unknown open types and missing specializations are hard errors, as
    /// are constructor failures. Constructor resolution admits public and
    /// non-public constructors alike.
    pub fn construct(
        &self,
        open: TypeId,
        type_arg: TypeId,
        args: &Args,
    ) -> Result<Box<dyn Any>, ConstructError> {
        crate::verify::ensure();
        let slot = self
            .ctors
            .get(&open)
            .ok_or(ConstructError::UnregisteredGeneric)?;
        let spec = slot
            .specializations
            .get(&type_arg)
            .filter(|spec| CTOR_ACCESS.admits(spec.visibility))
            .ok_or_else(|| ConstructError::NoSpecialization {
                name: slot.name.clone(),
            })?;
        (spec.construct)(args)
    }

    /// Construct an instance of the closed generic type `T[type_arg]` and
    /// return it strongly typed.
    ///
    /// KNOWN LIMITATION: `T` serves both as the open-generic table key and
    /// as the result type, so this only supports registrations whose entry
    /// under `T`'s own key produces a `T` (a narrow, self-referential
    /// shape). Anything else fails with
    /// [`ConstructError::WrongInstanceType`].
    pub fn construct_as<T: 'static>(
        &self,
        type_arg: TypeId,
        args: &Args,
    ) -> Result<Box<T>, ConstructError> {
        self.construct(TypeId::of::<T>(), type_arg, args)?
            .downcast::<T>()
            .map_err(|_| ConstructError::WrongInstanceType)
    }
}

impl std::fmt::Debug for GenericDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let method_count: usize = self.methods.values().map(FxHashMap::len).sum();
        f.debug_struct("GenericDispatch")
            .field("methods", &method_count)
            .field("generics", &self.ctors.len())
            .finish()
    }
}

// ============================================================================
// Process-global dispatch tables
// ============================================================================

static DISPATCH: LazyLock<Mutex<GenericDispatch>> =
    LazyLock::new(|| Mutex::new(GenericDispatch::new()));

/// Run `f` with the process-global dispatch tables locked. Registration
/// usually happens here, once, at startup.
pub fn with_dispatch<R>(f: impl FnOnce(&mut GenericDispatch) -> R) -> R {
    crate::verify::ensure();
    f(&mut DISPATCH.lock())
}

/// Invoke a generic method through the process-global dispatch table.
pub fn invoke(
    class: TypeId,
    instance: Option<&dyn Any>,
    method: &str,
    filter: MethodFilter,
    type_arg: TypeId,
    args: &Args,
) -> Result<Option<Box<dyn Any>>, InvokeError> {
    DISPATCH.lock().invoke(class, instance, method, filter, type_arg, args)
}

/// Construct a closed generic instance through the process-global table.
pub fn construct(open: TypeId, type_arg: TypeId, args: &Args) -> Result<Box<dyn Any>, ConstructError> {
    DISPATCH.lock().construct(open, type_arg, args)
}

/// Typed variant of [`construct`] over the process-global table; see
/// [`GenericDispatch::construct_as`] for the supported shape.
pub fn construct_as<T: 'static>(type_arg: TypeId, args: &Args) -> Result<Box<T>, ConstructError> {
    DISPATCH.lock().construct_as::<T>(type_arg, args)
}
