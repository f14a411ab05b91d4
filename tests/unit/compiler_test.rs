//! Tests for the seed graph compiler

use seedgraph::adapters::file::{FileAssertionStore, FileStateStore};
use seedgraph::adapters::ops::StandardPackageOps;
use seedgraph::core::models::{BuildMode, FragmentKind, Operation, SeedGraph};
use seedgraph::core::ports::StateStore;
use seedgraph::core::services::SeedCompiler;
use seedgraph::core::{ErrorKind, SeedError};
use serde_json::json;

use crate::common::fixtures::{ModelSpec, SeedBuilder, pc_seed, source};
use crate::common::mocks::{MemoryAssertionStore, MemoryStateStore, RecordingPackageOps};

fn compile(seed: &tempfile::TempDir, mode: BuildMode) -> Result<SeedGraph, SeedError> {
    let state = MemoryStateStore::new();
    let store = MemoryAssertionStore::new();
    SeedCompiler::new(&source(seed), &state, &store, &StandardPackageOps, mode).compile()
}

/// (kind, package) for every fragment, in order
fn shape(graph: &SeedGraph) -> Vec<(FragmentKind, Option<&str>)> {
    graph.fragments.iter().map(|f| (f.kind(), f.package())).collect()
}

fn waits(graph: &SeedGraph) -> Vec<Vec<usize>> {
    graph.fragments.iter().map(|f| f.waits_for.iter().map(|w| w.index()).collect()).collect()
}

// =============================================================================
// ORDERING
// =============================================================================

#[test]
fn test_pc_seed_order() {
    let seed = pc_seed();
    let graph = compile(&seed, BuildMode::PackageBased).unwrap();

    assert_eq!(
        shape(&graph),
        vec![
            (FragmentKind::Install, Some("core")),
            (FragmentKind::Install, Some("pc-kernel")),
            (FragmentKind::Install, Some("pc")),
            (FragmentKind::Configure, Some("core")),
            (FragmentKind::Configure, Some("pc-kernel")),
            (FragmentKind::Configure, Some("pc")),
            (FragmentKind::Install, Some("hello-world")),
            (FragmentKind::MarkSeeded, None),
        ]
    );
    assert_eq!(
        waits(&graph),
        vec![vec![], vec![0], vec![1], vec![2], vec![3], vec![4], vec![5], vec![6]]
    );
    assert!(graph.is_well_ordered());
    assert_eq!(graph.roots().count(), 1);
}

#[test]
fn test_foundational_installs_defer_configuration() {
    let seed = pc_seed();
    let graph = compile(&seed, BuildMode::PackageBased).unwrap();

    for name in ["core", "pc-kernel", "pc"] {
        let Operation::Install { flags, .. } = &graph.find(FragmentKind::Install, name).unwrap().operation
        else {
            panic!("not an install");
        };
        assert!(flags.skip_configure, "{name} configures during install");
    }

    let app = graph.find(FragmentKind::Install, "hello-world").unwrap();
    let Operation::Install { flags, .. } = &app.operation else {
        panic!("not an install");
    };
    assert!(!flags.skip_configure);
    assert!(flags.required);
    assert!(app.tasks.iter().any(|t| t.summary.contains("configure hook")));
}

#[test]
fn test_configure_waits_for_gadget_install() {
    let seed = pc_seed();
    let graph = compile(&seed, BuildMode::PackageBased).unwrap();

    let gadget = graph.find(FragmentKind::Install, "pc").unwrap().id;
    for name in ["core", "pc-kernel", "pc"] {
        let configure = graph.find(FragmentKind::Configure, name).unwrap();
        assert!(graph.waits_on(configure.id, gadget));
        let Operation::Configure { flags, .. } = &configure.operation else {
            panic!("not a configure");
        };
        assert!(flags.use_defaults);
    }

    let app = graph.find(FragmentKind::Install, "hello-world").unwrap().id;
    let last_configure = graph.find(FragmentKind::Configure, "pc").unwrap().id;
    assert!(graph.waits_on(app, last_configure));
}

#[test]
fn test_mark_seeded_waits_on_everything() {
    let seed = SeedBuilder::new()
        .model(&ModelSpec::pc())
        .package("core")
        .package("pc-kernel")
        .package("pc")
        .package("alpha")
        .package("beta")
        .build();
    let graph = compile(&seed, BuildMode::PackageBased).unwrap();

    let last = graph.fragments.last().unwrap();
    assert_eq!(last.kind(), FragmentKind::MarkSeeded);
    assert_eq!(graph.fragments.iter().filter(|f| f.kind() == FragmentKind::MarkSeeded).count(), 1);
    for fragment in &graph.fragments[..graph.len() - 1] {
        assert!(graph.waits_on(last.id, fragment.id));
    }
    // others keep manifest order
    let alpha = graph.find(FragmentKind::Install, "alpha").unwrap().id;
    let beta = graph.find(FragmentKind::Install, "beta").unwrap().id;
    assert!(graph.waits_on(beta, alpha));
}

#[test]
fn test_manifest_order_of_foundation_does_not_matter() {
    let seed = SeedBuilder::new()
        .model(&ModelSpec::pc())
        .package("hello-world")
        .package("pc")
        .package("pc-kernel")
        .package("core")
        .build();
    let graph = compile(&seed, BuildMode::PackageBased).unwrap();

    let order: Vec<_> = shape(&graph).into_iter().take(3).collect();
    assert_eq!(
        order,
        vec![
            (FragmentKind::Install, Some("core")),
            (FragmentKind::Install, Some("pc-kernel")),
            (FragmentKind::Install, Some("pc")),
        ]
    );
}

#[test]
fn test_core_only_seed() {
    let mut model = ModelSpec::pc();
    model.kernel = None;
    model.gadget = None;
    let seed = SeedBuilder::new().model(&model).package("core").build();
    let graph = compile(&seed, BuildMode::PackageBased).unwrap();

    assert_eq!(
        shape(&graph),
        vec![
            (FragmentKind::Install, Some("core")),
            (FragmentKind::Configure, Some("core")),
            (FragmentKind::MarkSeeded, None),
        ]
    );
    assert_eq!(waits(&graph), vec![vec![], vec![0], vec![1]]);
}

// =============================================================================
// MANIFEST ERRORS
// =============================================================================

#[test]
fn test_missing_core() {
    let seed = SeedBuilder::new()
        .model(&ModelSpec::pc())
        .package("pc-kernel")
        .package("pc")
        .build();
    let err = compile(&seed, BuildMode::PackageBased).unwrap_err();

    assert!(matches!(err, SeedError::MissingCore));
    assert_eq!(err.to_string(), "cannot proceed without seeding core");
    assert_eq!(err.kind(), ErrorKind::Manifest);
}

#[test]
fn test_missing_kernel() {
    let seed = SeedBuilder::new().model(&ModelSpec::pc()).package("core").package("pc").build();
    let err = compile(&seed, BuildMode::PackageBased).unwrap_err();

    assert!(matches!(&err, SeedError::MissingKernel(name) if name == "pc-kernel"));
    assert_eq!(err.kind(), ErrorKind::Manifest);
}

#[test]
fn test_missing_gadget() {
    let seed = SeedBuilder::new()
        .model(&ModelSpec::pc())
        .package("core")
        .package("pc-kernel")
        .build();
    let err = compile(&seed, BuildMode::PackageBased).unwrap_err();

    assert!(matches!(&err, SeedError::MissingGadget(name) if name == "pc"));
}

#[test]
fn test_empty_manifest_without_foundation_is_nothing_to_seed() {
    let mut model = ModelSpec::pc();
    model.kernel = None;
    model.gadget = None;
    let seed = SeedBuilder::new().model(&model).empty_manifest().build();
    let err = compile(&seed, BuildMode::PackageBased).unwrap_err();

    assert!(matches!(err, SeedError::NothingToSeed));
}

#[test]
fn test_missing_manifest_on_package_system() {
    let seed = SeedBuilder::new().model(&ModelSpec::pc()).without_manifest().build();
    let err = compile(&seed, BuildMode::PackageBased).unwrap_err();

    assert!(matches!(err, SeedError::MissingManifest));
}

#[test]
fn test_invalid_manifest() {
    let seed = SeedBuilder::new().model(&ModelSpec::pc()).build();
    std::fs::write(seed.path().join("seed.toml"), "[[package]]\nname = \"Core!\"\nfile = \"c.pkg\"\n")
        .unwrap();
    let err = compile(&seed, BuildMode::PackageBased).unwrap_err();

    assert!(matches!(err, SeedError::Manifest(_)));
    assert_eq!(err.kind(), ErrorKind::Manifest);
}

// =============================================================================
// OPTIONAL SEEDING
// =============================================================================

#[test]
fn test_already_seeded_touches_nothing() {
    let seed = pc_seed();
    let state = MemoryStateStore::seeded();
    let store = MemoryAssertionStore::new();

    let err = SeedCompiler::new(
        &source(&seed),
        &state,
        &store,
        &StandardPackageOps,
        BuildMode::PackageBased,
    )
    .compile()
    .unwrap_err();

    assert!(matches!(err, SeedError::AlreadySeeded));
    assert_eq!(err.kind(), ErrorKind::AlreadySeeded);
    assert_eq!(store.commit_count(), 0);
    assert!(state.recorded_device().is_none());
}

#[test]
fn test_classic_without_seed_only_marks_seeded() {
    let seed = SeedBuilder::new().without_trust_dir().without_manifest().build();
    let graph = compile(&seed, BuildMode::Classic).unwrap();

    assert_eq!(shape(&graph), vec![(FragmentKind::MarkSeeded, None)]);
    assert!(graph.fragments[0].waits_for.is_empty());
}

#[test]
fn test_classic_without_manifest_only_marks_seeded() {
    let seed = SeedBuilder::new().model(&ModelSpec::classic()).without_manifest().build();
    let state = MemoryStateStore::new();
    let store = MemoryAssertionStore::new();

    let graph =
        SeedCompiler::new(&source(&seed), &state, &store, &StandardPackageOps, BuildMode::Classic)
            .compile()
            .unwrap();

    assert_eq!(shape(&graph), vec![(FragmentKind::MarkSeeded, None)]);
    // the trust chain was still imported
    assert_eq!(state.recorded_device().unwrap().model, "desktop");
}

#[test]
fn test_classic_seed_with_packages() {
    let seed = SeedBuilder::new()
        .model(&ModelSpec::classic())
        .package("core")
        .package("hello-world")
        .build();
    let graph = compile(&seed, BuildMode::Classic).unwrap();

    assert_eq!(
        shape(&graph),
        vec![
            (FragmentKind::Install, Some("core")),
            (FragmentKind::Configure, Some("core")),
            (FragmentKind::Install, Some("hello-world")),
            (FragmentKind::MarkSeeded, None),
        ]
    );
}

// =============================================================================
// PROVENANCE
// =============================================================================

#[test]
fn test_asserted_install_carries_side_info() {
    let seed = SeedBuilder::new()
        .model(&ModelSpec::pc())
        .package("core")
        .package("pc-kernel")
        .package("pc")
        .package_with("hello-world", "private = true\ncontact = \"mailto:dev@acme.example\"\n")
        .build();
    let graph = compile(&seed, BuildMode::PackageBased).unwrap();

    let Operation::Install { side_info, path, .. } =
        &graph.find(FragmentKind::Install, "hello-world").unwrap().operation
    else {
        panic!("not an install");
    };
    assert_eq!(side_info.real_name, "hello-world");
    assert_eq!(side_info.package_id.as_deref(), Some("hello-world-id"));
    assert_eq!(side_info.revision, Some(7));
    assert!(side_info.private);
    assert_eq!(side_info.contact, "mailto:dev@acme.example");
    assert!(path.ends_with("packages/hello-world_1.pkg"));
}

#[test]
fn test_unasserted_install_uses_manifest_name() {
    let seed = SeedBuilder::new()
        .model(&ModelSpec::pc())
        .package("core")
        .package("pc-kernel")
        .package("pc")
        .unasserted_package("local-tool")
        .build();
    let graph = compile(&seed, BuildMode::PackageBased).unwrap();

    let fragment = graph.find(FragmentKind::Install, "local-tool").unwrap();
    let Operation::Install { side_info, .. } = &fragment.operation else {
        panic!("not an install");
    };
    assert_eq!(side_info.real_name, "local-tool");
    assert!(side_info.package_id.is_none());
    assert!(side_info.revision.is_none());
    assert!(fragment.tasks.iter().any(|t| t.summary.contains("(unasserted)")));
}

#[test]
fn test_unsigned_package_is_missing_signatures() {
    let seed = SeedBuilder::new()
        .model(&ModelSpec::pc())
        .package("core")
        .package("pc-kernel")
        .package("pc")
        .unsigned_package("stray")
        .build();
    let err = compile(&seed, BuildMode::PackageBased).unwrap_err();

    assert!(matches!(&err, SeedError::MissingSignatures { name, .. } if name == "stray"));
    assert_eq!(err.kind(), ErrorKind::Provenance);
    assert!(err.to_string().starts_with("cannot find signatures with metadata for package \"stray\""));
}

#[test]
fn test_broken_revision_metadata_is_provenance_error() {
    let seed = SeedBuilder::new()
        .model(&ModelSpec::pc())
        .package("core")
        .package("pc-kernel")
        .package("pc")
        .unsigned_package("odd")
        .build();
    let digest = seedgraph::core::services::package_digest(
        &seed.path().join("packages").join("odd_1.pkg"),
    )
    .unwrap();
    std::fs::write(
        seed.path().join("assertions").join("odd.json"),
        json!({"type": "package-revision", "package-digest": digest}).to_string(),
    )
    .unwrap();

    let err = compile(&seed, BuildMode::PackageBased).unwrap_err();

    assert!(matches!(&err, SeedError::Provenance { name, .. } if name == "odd"));
    assert_eq!(err.kind(), ErrorKind::Provenance);
}

#[test]
fn test_revision_without_declaration_is_provenance_error() {
    let seed = SeedBuilder::new()
        .model(&ModelSpec::pc())
        .package("core")
        .package("pc-kernel")
        .package("pc")
        .unsigned_package("odd")
        .build();
    let digest = seedgraph::core::services::package_digest(
        &seed.path().join("packages").join("odd_1.pkg"),
    )
    .unwrap();
    std::fs::write(
        seed.path().join("assertions").join("odd.json"),
        json!({
            "type": "package-revision",
            "package-digest": digest,
            "package-id": "odd-id",
            "package-revision": 3,
        })
        .to_string(),
    )
    .unwrap();

    let err = compile(&seed, BuildMode::PackageBased).unwrap_err();

    assert!(matches!(&err, SeedError::Provenance { name, .. } if name == "odd"));
    assert_eq!(err.kind(), ErrorKind::Provenance);
    assert!(err.to_string().contains("package-declaration"));
}

#[test]
fn test_missing_package_file_is_install_error() {
    let seed = SeedBuilder::new()
        .model(&ModelSpec::pc())
        .package("core")
        .package("pc-kernel")
        .package("pc")
        .unasserted_package("gone")
        .build();
    std::fs::remove_file(seed.path().join("packages").join("gone_1.pkg")).unwrap();

    let err = compile(&seed, BuildMode::PackageBased).unwrap_err();

    assert!(matches!(&err, SeedError::Install { name, .. } if name == "gone"));
    assert_eq!(err.kind(), ErrorKind::Install);
}

// =============================================================================
// PACKAGE OPERATIONS
// =============================================================================

#[test]
fn test_manifest_flags_reach_package_ops() {
    let seed = SeedBuilder::new()
        .model(&ModelSpec::pc())
        .package("core")
        .package("pc-kernel")
        .package("pc")
        .package_with("dev-tool", "devmode = true\nclassic = true\nchannel = \"edge\"\n")
        .build();
    let state = MemoryStateStore::new();
    let store = MemoryAssertionStore::new();
    let ops = RecordingPackageOps::new();

    let graph =
        SeedCompiler::new(&source(&seed), &state, &store, &ops, BuildMode::PackageBased)
            .compile()
            .unwrap();

    let installs = ops.installs();
    let names: Vec<_> = installs.iter().map(|(s, _)| s.real_name.as_str()).collect();
    assert_eq!(names, vec!["core", "pc-kernel", "pc", "dev-tool"]);
    let (_, flags) = &installs[3];
    assert!(flags.devmode);
    assert!(flags.classic);
    assert!(!flags.required);
    assert_eq!(ops.configures(), vec!["core", "pc-kernel", "pc"]);

    let Operation::Install { channel, .. } =
        &graph.find(FragmentKind::Install, "dev-tool").unwrap().operation
    else {
        panic!("not an install");
    };
    assert_eq!(channel, "edge");
}

#[test]
fn test_refused_install_aborts() {
    let seed = pc_seed();
    let state = MemoryStateStore::new();
    let store = MemoryAssertionStore::new();
    let ops = RecordingPackageOps::refusing("pc");

    let err = SeedCompiler::new(&source(&seed), &state, &store, &ops, BuildMode::PackageBased)
        .compile()
        .unwrap_err();

    assert!(matches!(&err, SeedError::Install { name, .. } if name == "pc"));
    assert!(err.to_string().contains("in use"));
}

#[test]
fn test_kernel_doubling_as_core_is_installed_once() {
    let mut model = ModelSpec::pc();
    model.kernel = Some("core");
    let seed = SeedBuilder::new().model(&model).package("core").package("pc").build();
    let graph = compile(&seed, BuildMode::PackageBased).unwrap();

    assert_eq!(
        shape(&graph),
        vec![
            (FragmentKind::Install, Some("core")),
            (FragmentKind::Install, Some("pc")),
            (FragmentKind::Configure, Some("core")),
            (FragmentKind::Configure, Some("pc")),
            (FragmentKind::MarkSeeded, None),
        ]
    );
}

// =============================================================================
// RECOMPILATION
// =============================================================================

#[test]
fn test_recompile_before_seeded_yields_same_graph() {
    let seed = pc_seed();
    let dir = tempfile::TempDir::new().unwrap();
    let state = FileStateStore::new(dir.path().join("state.json"));
    let store = FileAssertionStore::new(dir.path().join("assertions.json"));
    let source = source(&seed);
    let compiler =
        SeedCompiler::new(&source, &state, &store, &StandardPackageOps, BuildMode::PackageBased);

    let first = compiler.compile().unwrap();
    let second = compiler.compile().unwrap();

    assert_eq!(first, second);
    assert!(!first.is_empty());
    assert_eq!(store.count().unwrap(), 10);

    state.set_seeded().unwrap();
    let err = compiler.compile().unwrap_err();
    assert!(matches!(err, SeedError::AlreadySeeded));
    assert_eq!(err.kind(), ErrorKind::AlreadySeeded);
}
