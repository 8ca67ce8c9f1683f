use std::sync::Arc;

use spaark_loader::registry::{FrameworkDefaults, NamespaceRegistry};
use spaark_loader::{ClassLoader, MemoryUnitSource, Outcome};

use crate::integration::support::{unit, AppTree};

const STD_OUTPUT: &str = r#"
namespace = "Spaark.Core.Output"

[[unit]]
name = "StdOutput"

[[unit.methods]]
name = "page"
"#;

#[test]
fn framework_unit_resolves_under_framework_root() {
    let tree = AppTree::new();
    let path = tree.write("spaark/core/output/stdoutput.unit.toml", STD_OUTPUT);

    let mut loader = tree.loader();
    assert!(loader.load("Spaark.Core.Output.StdOutput").unwrap());
    let unit = loader.unit("Spaark.Core.Output.StdOutput").unwrap();
    assert_eq!(unit.source, path);
}

#[test]
fn framework_only_registry_resolves_framework_units() {
    let tree = AppTree::new();
    tree.write("spaark/core/output/stdoutput.unit.toml", STD_OUTPUT);

    let mut loader = ClassLoader::bootstrap(
        NamespaceRegistry::new(tree.root()),
        FrameworkDefaults::new(tree.framework_root()),
        spaark_loader::FsUnitSource,
    )
    .unwrap();
    assert!(!loader.registry().is_application_ready());
    assert!(loader.load("\\Spaark\\Core\\Output\\StdOutput").unwrap());
}

#[test]
fn unknown_prefix_is_not_found_without_error() {
    let tree = AppTree::new();
    let mut loader = tree.loader();

    assert!(!loader.load("Zzz.Foo").unwrap());
    let attempts = loader.last_attempts();
    assert_eq!(attempts[0].path, tree.root().join("zzz").join("foo.unit.toml"));
    assert!(attempts.iter().all(|a| a.outcome == Outcome::NotFound));
}

#[test]
fn unknown_prefix_loads_from_default_root() {
    let tree = AppTree::new();
    tree.write("zzz/foo.unit.toml", &unit("Zzz.Foo"));
    let mut loader = tree.loader();
    assert!(loader.load("Zzz.Foo").unwrap());
}

#[test]
fn prefixes_do_not_leak_between_roots() {
    let tree = AppTree::new();
    // An application file at the path a framework name would map to under the
    // application root must not satisfy the framework name.
    tree.write("core/output/stdoutput.unit.toml", &unit("App.Core.Output.StdOutput"));

    let mut loader = tree.loader();
    assert!(!loader.load("Spaark.Core.Output.StdOutput").unwrap());
    assert!(loader.load("App.Core.Output.StdOutput").unwrap());
    assert!(!loader.exists("Spaark.Core.Output.StdOutput"));
}

#[test]
fn holder_file_declares_nested_units() {
    let tree = AppTree::new();
    tree.write(
        "status.unit.toml",
        r#"
namespace = "App"

[[unit]]
name = "Status"

[[unit]]
name = "Status.Active"

[[unit]]
name = "Status.Closed"
"#,
    );

    let mut loader = tree.loader();
    assert!(loader.load("App.Status.Active").unwrap());
    // The sibling arrived with the same include and needs no further lookup
    assert!(loader.exists("App.Status.Closed"));
    assert!(loader.load("App.Status.Closed").unwrap());
    assert!(!loader.load("App.Status.Pending").unwrap());
}

#[test]
fn repeated_loads_are_served_from_the_symbol_table() {
    let source = Arc::new(
        MemoryUnitSource::new().with_file("/srv/app/model/user.unit.toml", unit("App.Model.User")),
    );
    let mut loader = ClassLoader::bootstrap(
        NamespaceRegistry::new("/srv/app"),
        FrameworkDefaults::new("/srv/spaark"),
        source.clone(),
    )
    .unwrap();
    loader.with_application_defaults("app").unwrap();

    assert!(loader.load("App.Model.User").unwrap());
    let accesses = source.accesses();
    for _ in 0..10 {
        assert!(loader.load("app.model.user").unwrap());
    }
    assert_eq!(source.accesses(), accesses);
}

#[test]
fn ancestors_in_other_files_are_autoloaded() {
    let tree = AppTree::new();
    tree.write(
        "spaark/core/base/controller.unit.toml",
        &unit("Spaark.Core.Base.Controller"),
    );
    tree.write(
        "controller/home.unit.toml",
        "[[unit]]\nname = \"App.Controller.Home\"\nextends = \"Spaark.Core.Base.Controller\"\n",
    );

    let mut loader = tree.loader();
    assert!(loader.load("App.Controller.Home").unwrap());
    assert!(loader.exists("Spaark.Core.Base.Controller"));
}
