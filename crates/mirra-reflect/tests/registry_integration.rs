//! Integration tests for module registration, enumeration, and name
//! resolution, including the process-global registry.

use mirra_reflect::{registry, Args, ConstructError, Module, ModuleRegistry, TypeEntry, TypeKind, Visibility};

trait Importer {
    fn id(&self) -> &'static str;
    fn prefix(&self) -> &str;
}

struct ObjImporter {
    prefix: String,
}

impl Importer for ObjImporter {
    fn id(&self) -> &'static str {
        "obj"
    }
    fn prefix(&self) -> &str {
        &self.prefix
    }
}

struct GltfImporter {
    prefix: String,
}

impl Importer for GltfImporter {
    fn id(&self) -> &'static str {
        "gltf"
    }
    fn prefix(&self) -> &str {
        &self.prefix
    }
}

struct FbxImporter;

impl Importer for FbxImporter {
    fn id(&self) -> &'static str {
        "fbx"
    }
    fn prefix(&self) -> &str {
        ""
    }
}

fn make_obj(args: &Args) -> Result<Box<dyn Importer>, ConstructError> {
    args.expect_len(1)?;
    Ok(Box::new(ObjImporter {
        prefix: args.get::<String>(0)?.clone(),
    }))
}

fn make_gltf(args: &Args) -> Result<Box<dyn Importer>, ConstructError> {
    args.expect_len(1)?;
    Ok(Box::new(GltfImporter {
        prefix: args.get::<String>(0)?.clone(),
    }))
}

fn make_fbx(args: &Args) -> Result<Box<dyn Importer>, ConstructError> {
    args.expect_len(1)?;
    let _ = args.get::<String>(0)?;
    Ok(Box::new(FbxImporter))
}

fn importer_registry() -> ModuleRegistry {
    let mut reg = ModuleRegistry::new();
    reg.register(
        Module::new("importers-core")
            .with_type(TypeEntry::abstract_base::<dyn Importer>("asset::Importer"))
            .with_type(
                TypeEntry::concrete::<ObjImporter>("asset::ObjImporter")
                    .with_base::<dyn Importer>(make_obj),
            )
            .with_type(
                TypeEntry::concrete::<GltfImporter>("asset::GltfImporter")
                    .with_base_via::<dyn Importer>(Visibility::NonPublic, make_gltf),
            ),
    );
    reg.register(Module::unreadable("importers-dyn", "metadata access fault"));
    reg.register(
        Module::new("importers-extra").with_type(
            TypeEntry::concrete::<FbxImporter>("asset::FbxImporter")
                .with_base::<dyn Importer>(make_fbx),
        ),
    );
    reg
}

fn ctor_args() -> Args {
    Args::new().with("assets/".to_string())
}

#[test]
fn test_enumeration_counts_and_runtime_types() {
    let reg = importer_registry();
    let args = ctor_args();
    let importers: Vec<_> = reg
        .instances_of::<dyn Importer>(&args)
        .collect::<Result<_, _>>()
        .unwrap();

    let ids: Vec<_> = importers.iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec!["obj", "gltf", "fbx"]);
    assert_eq!(importers[0].prefix(), "assets/");
}

#[test]
fn test_all_modules_equals_manual_concatenation() {
    let reg = importer_registry();
    let args = ctor_args();

    let combined: Vec<_> = reg
        .instances_of::<dyn Importer>(&args)
        .map(|r| r.unwrap().id())
        .collect();
    let manual: Vec<_> = reg
        .modules()
        .iter()
        .flat_map(|m| m.instances_of::<dyn Importer>(&args))
        .map(|r| r.unwrap().id())
        .collect();
    assert_eq!(combined, manual);
}

#[test]
fn test_unreadable_module_is_skipped_without_error() {
    let reg = importer_registry();
    let args = ctor_args();

    // The defective module is present but contributes nothing.
    assert!(reg.modules().iter().any(|m| m.name() == "importers-dyn"));
    assert_eq!(reg.instances_of::<dyn Importer>(&args).count(), 3);

    let defective = &reg.modules()[1];
    assert!(defective.types().is_err());
    assert_eq!(defective.instances_of::<dyn Importer>(&args).count(), 0);
}

#[test]
fn test_constructor_mismatch_propagates_per_item() {
    let reg = importer_registry();
    let args = Args::new(); // importers require one argument
    let results: Vec<_> = reg.instances_of::<dyn Importer>(&args).collect();
    assert_eq!(results.len(), 3);
    for result in results {
        assert!(matches!(result, Err(ConstructError::Arg(_))));
    }
}

#[test]
fn test_resolution_is_exact_and_ordered() {
    let reg = importer_registry();

    let handle = reg.find_type("asset::GltfImporter").unwrap();
    assert!(handle.is::<GltfImporter>());
    assert_eq!(handle.kind(), TypeKind::Concrete);

    let base = reg.find_type("asset::Importer").unwrap();
    assert!(base.is::<dyn Importer>());
    assert_eq!(base.kind(), TypeKind::Abstract);

    assert!(reg.find_type("asset::gltfimporter").is_none());
    assert!(reg.find_type("asset::Unregistered").is_none());
}

#[test]
fn test_first_instance_in_module() {
    let reg = importer_registry();
    let args = ctor_args();
    let first = reg.modules()[0]
        .first_instance_of::<dyn Importer>(&args)
        .unwrap()
        .unwrap();
    assert_eq!(first.id(), "obj");

    assert!(reg.modules()[1]
        .first_instance_of::<dyn Importer>(&args)
        .is_none());
}

// ----------------------------------------------------------------------
// Process-global registry
// ----------------------------------------------------------------------

trait GlobalProbe {
    fn tag(&self) -> u32;
}

struct ProbeA;
impl GlobalProbe for ProbeA {
    fn tag(&self) -> u32 {
        1
    }
}

fn make_probe(args: &Args) -> Result<Box<dyn GlobalProbe>, ConstructError> {
    args.expect_len(0)?;
    Ok(Box::new(ProbeA))
}

#[test]
fn test_global_registry_roundtrip() {
    registry::register(
        Module::new("probe-module").with_type(
            TypeEntry::concrete::<ProbeA>("probe::ProbeA").with_base::<dyn GlobalProbe>(make_probe),
        ),
    );

    let args = Args::new();
    let probes = registry::instances_of::<dyn GlobalProbe>(&args);
    assert_eq!(probes.len(), 1);
    assert_eq!(probes[0].as_ref().unwrap().tag(), 1);

    let handle = registry::find_type("probe::ProbeA").unwrap();
    assert!(handle.is::<ProbeA>());

    registry::with_modules(|reg| {
        assert!(reg.modules().iter().any(|m| m.name() == "probe-module"));
    });
}

#[test]
fn test_verifier_gate_is_satisfied_on_64bit_hosts() {
    // Scans run the lazy architecture check; reaching this assertion at
    // all means the check passed without terminating the process.
    assert!(mirra_reflect::is_64bit());
    mirra_reflect::verify();
}
