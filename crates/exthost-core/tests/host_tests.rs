mod common;

use common::{helpers, host};
use exthost_core::{
    DependencyOptions, Error, ExtensionDefinition, ExtensionHost, KindId, MissingDependencyError,
};
use exthost_test_utils::TestPlugins;
use pretty_assertions::assert_eq;
use serde_json::json;

fn admin(host: &mut ExtensionHost) -> KindId {
    host.define(
        ExtensionDefinition::builder("Admin", "0.1")
            .description("Server administration")
            .build(),
    )
}

#[test]
fn test_registry_key_is_normalized() {
    let plugins = TestPlugins::new();
    plugins.add_source("admin/admin.ext");
    let (mut host, _console) = host();
    let kind = admin(&mut host);

    let id = host
        .construct(plugins.windows_style("admin/admin.ext"), kind)
        .unwrap();

    let entry = host.registry().entry(plugins.path("admin/admin.ext")).unwrap();
    assert_eq!(entry.instance().id(), id);
    assert!(!entry.path().as_str().contains('\\'));
    assert_eq!(host.registry().len(), 1);
}

#[test]
fn test_construct_records_source_modified() {
    let plugins = TestPlugins::new();
    let source = plugins.add_source("admin.ext");
    let (mut host, _console) = host();
    let kind = admin(&mut host);

    host.construct(&source, kind).unwrap();

    let expected = std::fs::metadata(&source).unwrap().modified().unwrap();
    assert_eq!(host.registry().source_modified(source), Some(expected));
}

#[test]
fn test_construct_without_source_fails() {
    let plugins = TestPlugins::new();
    let (mut host, _console) = host();
    let kind = admin(&mut host);

    let result = host.construct(plugins.path("missing.ext"), kind);

    assert!(matches!(result, Err(Error::Fs(_))));
    assert!(host.registry().is_empty());
}

#[test]
fn test_construct_unknown_kind() {
    let plugins = TestPlugins::new();
    let (mut host, _console) = host();
    let mut other = ExtensionHost::new();
    let foreign = admin(&mut other);

    let result = host.construct(plugins.add_source("admin.ext"), foreign);
    assert!(matches!(result, Err(Error::UnknownKind(k)) if k == foreign));
}

#[test]
fn test_reconstructing_same_path_replaces_entry() {
    let plugins = TestPlugins::new();
    let source = plugins.add_source("admin.ext");
    let (mut host, _console) = host();
    let kind = admin(&mut host);

    let first = host.construct(&source, kind).unwrap();
    let second = host.construct(&source, kind).unwrap();

    assert_ne!(first, second);
    assert_eq!(host.registry().len(), 1);
    assert_eq!(host.lookup("Admin").unwrap().id(), second);
    assert!(matches!(host.instance(first), Err(Error::UnknownExtension(_))));
}

#[test]
fn test_lookup_prefers_latest_registration() {
    let plugins = TestPlugins::new();
    let (mut host, _console) = host();
    let kind = admin(&mut host);

    host.construct(plugins.add_source("one/admin.ext"), kind).unwrap();
    let latest = host.construct(plugins.add_source("two/admin.ext"), kind).unwrap();

    assert_eq!(host.lookup("Admin").unwrap().id(), latest);
    assert!(host.lookup("Chat").is_none());
    assert_eq!(host.registry().paths().len(), 2);
}

#[test]
fn test_renamed_path_keeps_other_instance_resolvable() {
    let plugins = TestPlugins::new();
    let (mut host, _console) = host();
    let core = host.define(ExtensionDefinition::builder("Core", "1").build());
    let other = host.define(ExtensionDefinition::builder("Other", "1").build());
    let admin = host.define(
        ExtensionDefinition::builder("Admin", "0.1")
            .requires("Core", DependencyOptions::default())
            .build(),
    );
    let first = host.construct(plugins.add_source("one/core.ext"), core).unwrap();
    host.construct(plugins.add_source("two/core.ext"), core).unwrap();
    host.construct(plugins.path("two/core.ext"), other).unwrap();
    let admin_id = host.construct(plugins.add_source("admin.ext"), admin).unwrap();

    assert_eq!(host.lookup("Core").unwrap().id(), first);
    host.enable(admin_id).unwrap();
    assert_eq!(host.dependency(admin_id, "Core").unwrap().map(|i| i.id()), Some(first));
}

#[test]
fn test_description_defaults_to_none() {
    let plugins = TestPlugins::new();
    let (mut host, _console) = host();
    let kind = host.define(ExtensionDefinition::builder("Chat", "3").build());
    let id = host.construct(plugins.add_source("chat.ext"), kind).unwrap();

    let descriptor = host.description(id).unwrap();
    assert_eq!(descriptor.name(), "Chat");
    assert_eq!(descriptor.version(), "3");
    assert_eq!(descriptor.description(), "none");
}

#[test]
fn test_data_folder_is_created_next_to_source() {
    let plugins = TestPlugins::new();
    let (mut host, _console) = host();
    let kind = admin(&mut host);
    let id = host.construct(plugins.add_source("admin.ext"), kind).unwrap();

    plugins.assert_not_exists("Admin");
    let dir = host.data_folder(id).unwrap();
    plugins.assert_dir_exists("Admin");

    assert_eq!(dir, host.data_folder(id).unwrap());
    assert_eq!(dir.file_name(), Some("Admin"));
}

#[test]
fn test_config_loads_once_and_caches() {
    let plugins = TestPlugins::new();
    plugins.write("Admin/config.yml", "motd: welcome\nchat:\n  prefix: '!'\n");
    let (mut host, _console) = host();
    let kind = admin(&mut host);
    let id = host.construct(plugins.add_source("admin.ext"), kind).unwrap();

    assert!(!host.configuration(id).unwrap().is_loaded());

    let config = host.config(id).unwrap();
    assert_eq!(config.get_str("motd"), Some("welcome"));
    assert_eq!(config.get_str("chat.prefix"), Some("!"));
    config.set("motd", "changed");

    // Later edits on disk are not picked up by the cached handle.
    plugins.write("Admin/config.yml", "motd: from disk\n");
    assert_eq!(host.config(id).unwrap().get_str("motd"), Some("changed"));
}

#[test]
fn test_config_save_writes_data_folder() {
    let plugins = TestPlugins::new();
    let (mut host, _console) = host();
    let kind = admin(&mut host);
    let id = host.construct(plugins.add_source("admin.ext"), kind).unwrap();

    let config = host.config(id).unwrap();
    assert!(config.values().is_empty());
    config.set("limits.players", 20);
    config.save().unwrap();

    plugins.assert_file_contains("Admin/config.yml", "players: 20");
}

#[test]
fn test_invalid_config_is_reported() {
    let plugins = TestPlugins::new();
    plugins.write("Admin/config.yml", "- just\n- a list\n");
    let (mut host, _console) = host();
    let kind = admin(&mut host);
    let id = host.construct(plugins.add_source("admin.ext"), kind).unwrap();

    assert!(matches!(host.config(id), Err(Error::InvalidConfig { .. })));
}

#[test]
fn test_naggable_flag() {
    let plugins = TestPlugins::new();
    let (mut host, _console) = host();
    let kind = admin(&mut host);
    let id = host.construct(plugins.add_source("admin.ext"), kind).unwrap();

    assert!(!host.is_naggable(id).unwrap());
    host.set_naggable(id, true).unwrap();
    assert!(host.is_naggable(id).unwrap());
}

#[test]
fn test_include_capability_by_hand() {
    let plugins = TestPlugins::new();
    let (mut host, _console) = host();
    let tools = host.define(ExtensionDefinition::builder("Tools", "1").capability(helpers()).build());
    let kind = admin(&mut host);
    host.construct(plugins.add_source("tools.ext"), tools).unwrap();
    let id = host.construct(plugins.add_source("admin.ext"), kind).unwrap();

    host.include_capability(id, "Tools", "Helpers").unwrap();
    host.include_capability(id, "Tools", "Helpers").unwrap();

    assert_eq!(host.composed_capabilities(id).unwrap().len(), 1);
    assert_eq!(
        host.invoke(id, "greet", &json!({"who": "admin"})).unwrap(),
        json!("hello admin")
    );
}

#[test]
fn test_include_capability_from_absent_sibling_is_ignored() {
    let plugins = TestPlugins::new();
    let (mut host, _console) = host();
    let kind = admin(&mut host);
    let id = host.construct(plugins.add_source("admin.ext"), kind).unwrap();

    host.include_capability(id, "Tools", "Helpers").unwrap();
    assert!(host.composed_capabilities(id).unwrap().is_empty());
}

#[test]
fn test_include_capability_not_exported() {
    let plugins = TestPlugins::new();
    let (mut host, _console) = host();
    let tools = host.define(ExtensionDefinition::builder("Tools", "1").build());
    let kind = admin(&mut host);
    host.construct(plugins.add_source("tools.ext"), tools).unwrap();
    let id = host.construct(plugins.add_source("admin.ext"), kind).unwrap();

    let err = host.include_capability(id, "Tools", "Helpers").unwrap_err();
    assert_eq!(
        err.as_missing_dependency(),
        Some(&MissingDependencyError::Capability {
            capability: "Helpers".into(),
            provider: "Tools".into(),
        })
    );
}

#[test]
fn test_invoke_errors() {
    let plugins = TestPlugins::new();
    let (mut host, _console) = host();
    let math = host.define(
        ExtensionDefinition::builder("Math", "1")
            .capability(common::utils())
            .build(),
    );
    let kind = host.define(
        ExtensionDefinition::builder("Calc", "1")
            .requires("Math", DependencyOptions::include("Utils"))
            .build(),
    );
    host.construct(plugins.add_source("math.ext"), math).unwrap();
    let id = host.construct(plugins.add_source("calc.ext"), kind).unwrap();
    host.enable(id).unwrap();

    assert!(matches!(
        host.invoke(id, "triple", &json!(1)),
        Err(Error::UnknownOperation { ref operation, .. }) if operation == "triple"
    ));
    match host.invoke(id, "double", &json!("two")) {
        Err(Error::Operation {
            capability,
            operation,
            source,
        }) => {
            assert_eq!(capability, "Utils");
            assert_eq!(operation, "double");
            assert_eq!(source.to_string(), "expected a number");
        }
        other => panic!("expected operation error, got {other:?}"),
    }
}

#[test]
fn test_hook_context_accessors() {
    let plugins = TestPlugins::new();
    plugins.write("Admin/config.yml", "greeting: hi\n");
    let (mut host, console) = host();
    let kind = host.define(
        ExtensionDefinition::builder("Admin", "0.1")
            .on_enable(|ctx| {
                let dir = ctx.data_folder()?;
                let greeting = ctx.config()?.get_str("greeting").unwrap_or("").to_string();
                ctx.set_naggable(true)?;
                ctx.console(&format!("{greeting} from {}", dir.file_name().unwrap_or("")));
                Ok(())
            })
            .build(),
    );
    let id = host.construct(plugins.add_source("admin.ext"), kind).unwrap();

    host.enable(id).unwrap();

    assert!(host.is_naggable(id).unwrap());
    assert_eq!(console.lines()[0], "hi from Admin");
}
