#![allow(non_snake_case)]

use super::*;
use crate::model::InterfaceDef;
use crate::type_map::DbusCppTypes;

fn render(doc: &Document, role: Role, output_name: &str) -> String {
    let config = GeneratorConfig::default();
    let ctx = GenContext::new(&config, &DbusCppTypes);
    generate(doc, role, output_name, &ctx).unwrap()
}

fn single(name: &str) -> Document {
    Document::from_interfaces(vec![InterfaceDef::new(name)])
}

// ============================================================================
// Artifact frame
// ============================================================================

#[test]
fn generate___frame___banner_guard_and_includes_in_order() {
    let text = render(&Document::from_interfaces(vec![]), Role::Adaptor, "glue.h");

    assert_eq!(
        text,
        "\n/*\n *\tThis file was automatically generated by busgen; DO NOT EDIT!\n */\n\n\
         #ifndef __dbusxx__glue_h__ADAPTOR_MARSHAL_H\n\
         #define __dbusxx__glue_h__ADAPTOR_MARSHAL_H\n\n\
         #include <dbus-c++/dbus.h>\n\
         #include <cassert>\n\n\
         #endif //__dbusxx__glue_h__ADAPTOR_MARSHAL_H\n"
    );
}

#[test]
fn include_guard___proxy_role___legalizes_output_path() {
    let config = GeneratorConfig::default();

    let guard = include_guard(&config, Role::Proxy(ProxyModes::SYNC), "out/greeter-proxy.h");

    assert_eq!(guard, "__dbusxx__out_greeter_proxy_h__PROXY_MARSHAL_H");
}

#[test]
fn generate___custom_config___replaces_fixed_text() {
    let config = GeneratorConfig {
        banner: "generated".to_string(),
        includes: vec!["#include <extra.h>".to_string()],
        guard_prefix: "MY_".to_string(),
        ..GeneratorConfig::default()
    };
    let ctx = GenContext::new(&config, &DbusCppTypes);

    let text = generate(&single("a.B"), Role::Adaptor, "x.h", &ctx).unwrap();

    assert!(text.starts_with("\n/*\n *\tgenerated\n */\n"));
    assert!(text.contains("#ifndef MY_x_h__ADAPTOR_MARSHAL_H\n"));
    assert!(text.contains("#include <extra.h>\n"));
    assert!(!text.contains("dbus-c++/dbus.h"));
}

// ============================================================================
// Scopes and classes
// ============================================================================

#[test]
fn generate___dotted_name___opens_and_closes_each_scope() {
    let text = render(&single("com.example.Greeter"), Role::Proxy(ProxyModes::SYNC), "g.h");

    assert!(text.contains("namespace com {\nnamespace example {\n\nclass Greeter_proxy\n"));
    assert!(text.contains("};\n\n} } \n#endif //"));
}

#[test]
fn generate___undotted_name___no_scopes() {
    let text = render(&single("Greeter"), Role::Adaptor, "g.h");

    assert!(!text.contains("namespace"));
    assert!(text.contains("class Greeter_adaptor\n"));
}

#[test]
fn generate___illegal_characters___legalized_in_scopes_and_class() {
    let text = render(&single("org.my-app.Sound-Player"), Role::Adaptor, "g.h");

    assert!(text.contains("namespace my_app {\n"));
    assert!(text.contains("class Sound_Player_adaptor\n"));
    assert!(text.contains(": ::DBus::InterfaceAdaptor(\"org.my-app.Sound-Player\")"));
}

#[test]
fn generate___interfaces___emitted_in_document_order() {
    let doc = Document::from_interfaces(vec![
        InterfaceDef::new("z.Last"),
        InterfaceDef::new("a.First"),
    ]);

    let text = render(&doc, Role::Adaptor, "g.h");

    let last = text.find("class Last_adaptor").unwrap();
    let first = text.find("class First_adaptor").unwrap();
    assert!(last < first);
}

#[test]
fn generate___meta_interfaces___guard_without_classes() {
    let doc = Document::from_interfaces(vec![
        InterfaceDef::new("org.freedesktop.DBus.Introspectable"),
        InterfaceDef::new("org.freedesktop.DBus.Properties"),
    ]);

    for role in [Role::Adaptor, Role::Proxy(ProxyModes::BOTH)] {
        let text = render(&doc, role, "meta.h");

        assert!(text.contains("#ifndef __dbusxx__meta_h__"));
        assert!(text.contains("#endif //__dbusxx__meta_h__"));
        assert!(!text.contains("class "));
        assert!(!text.contains("namespace"));
    }
}

#[test]
fn generate___same_input___byte_identical_output() {
    let doc = single("com.example.Greeter");

    let first = render(&doc, Role::Proxy(ProxyModes::BOTH), "g.h");
    let second = render(&doc, Role::Proxy(ProxyModes::BOTH), "g.h");

    assert_eq!(first, second);
}

// ============================================================================
// Missing attributes
// ============================================================================

const UNTYPED_XML: &str = r#"<node>
  <interface name="a.B">
    <method name="M"><arg name="x" direction="in"/></method>
    <property name="P" access="read"/>
  </interface>
</node>"#;

#[test]
fn generate___untyped_argument___empty_type_interpolated() {
    let doc = Document::parse(UNTYPED_XML).unwrap();

    for role in [Role::Adaptor, Role::Proxy(ProxyModes::BOTH)] {
        let text = render(&doc, role, "untyped.h");

        assert!(text.contains("M(const & x"), "{role:?}:\n{text}");
    }
}

#[test]
fn generate___untyped_property___empty_type_interpolated() {
    let doc = Document::parse(UNTYPED_XML).unwrap();

    let proxy = render(&doc, Role::Proxy(ProxyModes::SYNC), "untyped.h");
    let adaptor = render(&doc, Role::Adaptor, "untyped.h");

    assert!(proxy.contains("\tconst  P()\n"));
    assert!(adaptor.contains("::DBus::PropertyAdaptor<  > P;"));
}

#[test]
fn generate___unnamed_interface___bare_suffix_class_without_scopes() {
    let doc = Document::parse("<node><interface/></node>").unwrap();

    let proxy = render(&doc, Role::Proxy(ProxyModes::SYNC), "anon.h");
    let adaptor = render(&doc, Role::Adaptor, "anon.h");

    assert!(proxy.contains("class _proxy\n"));
    assert!(adaptor.contains("class _adaptor\n"));
    assert!(adaptor.contains("::DBus::InterfaceAdaptor(\"\")"));
    assert!(!proxy.contains("namespace"));
    assert!(!adaptor.contains("namespace"));
}

// ============================================================================
// Modes
// ============================================================================

#[test]
fn ProxyModes___no_flags___defaults_to_sync() {
    assert_eq!(ProxyModes::from_flags(false, false), ProxyModes::SYNC);
    assert_eq!(ProxyModes::from_flags(false, true), ProxyModes::ASYNC);
    assert_eq!(ProxyModes::from_flags(true, true), ProxyModes::BOTH);
    assert_eq!(ProxyModes::default(), ProxyModes::SYNC);
}

#[test]
fn ProxyModes___every_constructor___enables_some_stubs() {
    let all = [
        ProxyModes::SYNC,
        ProxyModes::ASYNC,
        ProxyModes::BOTH,
        ProxyModes::default(),
        ProxyModes::from_flags(false, false),
        ProxyModes::from_flags(true, false),
        ProxyModes::from_flags(false, true),
        ProxyModes::from_flags(true, true),
    ];

    for modes in all {
        assert!(modes.sync() || modes.asynchronous(), "{modes:?}");
    }
    assert!(!ProxyModes::ASYNC.sync());
    assert!(ProxyModes::ASYNC.asynchronous());
}

// ============================================================================
// Writing
// ============================================================================

#[test]
fn write_output___writable_path___writes_whole_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.h");

    write_output(&path, "text\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "text\n");
}

#[test]
fn write_output___missing_directory___returns_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.h");

    let result = write_output(&path, "text");

    match result {
        Err(GenError::WriteOutput { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("expected WriteOutput, got {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn generate_file___guard_uses_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("greeter.h");
    let config = GeneratorConfig::default();
    let ctx = GenContext::new(&config, &DbusCppTypes);

    generate_file(&single("a.Greeter"), Role::Adaptor, &path, &ctx).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let expected = include_guard(&config, Role::Adaptor, &path.to_string_lossy());
    assert!(text.contains(&format!("#define {expected}\n")));
}
