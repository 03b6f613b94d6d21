//! Module registry: an ordered module list plus the process-global
//! instance.
//!
//! The registry mirrors a host's loaded-module list. Scans visit modules in
//! registration (load) order and re-read declarations on every call, so a
//! repeated scan observes modules registered in between. The registry never
//! loads or unloads anything itself.

use std::sync::LazyLock;

use parking_lot::Mutex;

use crate::args::Args;
use crate::error::ConstructError;
use crate::module::{Module, TypeHandle};

/// Ordered collection of registered modules.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module at the end of the load order.
    pub fn register(&mut self, module: Module) {
        self.modules.push(module);
    }

    /// Registered modules in load order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Lazily construct one instance per concrete strict subclass of `B`
    /// across all modules, in module load order then declaration order.
    ///
    /// Equivalent to concatenating [`Module::instances_of`] over
    /// [`ModuleRegistry::modules`]. Construction failures surface as `Err`
    /// items; modules with unreadable metadata contribute nothing.
    pub fn instances_of<'a, B: ?Sized + 'static>(
        &'a self,
        args: &'a Args,
    ) -> impl Iterator<Item = Result<Box<B>, ConstructError>> + 'a {
        crate::verify::ensure();
        self.modules
            .iter()
            .flat_map(move |module| module.instances_of::<B>(args))
    }

    /// Resolve a type by exact, case-sensitive fully-qualified name.
    ///
    /// The first match in module/declaration order wins; duplicates are
    /// not detected or reported.
    pub fn find_type(&self, name: &str) -> Option<TypeHandle> {
        crate::verify::ensure();
        self.modules.iter().find_map(|module| module.find_type(name))
    }
}

// ============================================================================
// Process-global registry
// ============================================================================

static MODULES: LazyLock<Mutex<ModuleRegistry>> =
    LazyLock::new(|| Mutex::new(ModuleRegistry::new()));

/// Register a module with the process-global registry.
pub fn register(module: Module) {
    crate::verify::ensure();
    MODULES.lock().register(module);
}

/// Run `f` with the process-global registry locked.
///
/// The preferred way to consume the global registry incrementally; the
/// lock is held for the duration of `f`.
pub fn with_modules<R>(f: impl FnOnce(&ModuleRegistry) -> R) -> R {
    crate::verify::ensure();
    f(&MODULES.lock())
}

/// Construct one instance per concrete strict subclass of `B` across all
/// globally registered modules.
///
/// Materializes the whole sequence so the lock is released before
/// returning; use [`with_modules`] with [`ModuleRegistry::instances_of`]
/// for incremental consumption.
pub fn instances_of<B: ?Sized + 'static>(args: &Args) -> Vec<Result<Box<B>, ConstructError>> {
    with_modules(|registry| registry.instances_of::<B>(args).collect())
}

/// Resolve a type by fully-qualified name in the process-global registry.
pub fn find_type(name: &str) -> Option<TypeHandle> {
    with_modules(|registry| registry.find_type(name))
}
