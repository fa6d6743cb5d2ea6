#![allow(non_snake_case)]

use super::*;
use std::fs;
use tempfile::TempDir;

const GREETER_XML: &str = r#"<node>
  <interface name="com.example.Greeter">
    <method name="Greet">
      <arg name="name" type="s" direction="in"/>
      <arg name="greeting" type="s" direction="out"/>
    </method>
  </interface>
</node>
"#;

fn write_input(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("greeter.xml");
    fs::write(&path, content).unwrap();
    path
}

fn request(input: PathBuf) -> Request {
    Request {
        input,
        proxy: None,
        adaptor: None,
        modes: ProxyModes::SYNC,
        config: None,
    }
}

#[test]
fn run___proxy_and_adaptor___writes_both_files() {
    let dir = TempDir::new().unwrap();
    let proxy = dir.path().join("greeter-proxy.h");
    let adaptor = dir.path().join("greeter-glue.h");
    let req = Request {
        proxy: Some(proxy.clone()),
        adaptor: Some(adaptor.clone()),
        ..request(write_input(&dir, GREETER_XML))
    };

    run(&req).unwrap();

    let proxy_text = fs::read_to_string(&proxy).unwrap();
    let adaptor_text = fs::read_to_string(&adaptor).unwrap();
    assert!(proxy_text.contains("class Greeter_proxy"));
    assert!(proxy_text.contains("__PROXY_MARSHAL_H"));
    assert!(adaptor_text.contains("class Greeter_adaptor"));
    assert!(adaptor_text.contains("__ADAPTOR_MARSHAL_H"));
}

#[test]
fn run___no_outputs___fails() {
    let dir = TempDir::new().unwrap();
    let req = request(write_input(&dir, GREETER_XML));

    let err = run(&req).unwrap_err();

    assert!(err.to_string().contains("Nothing to generate"));
}

#[test]
fn run___missing_input___fails_without_writing() {
    let dir = TempDir::new().unwrap();
    let proxy = dir.path().join("out.h");
    let req = Request {
        proxy: Some(proxy.clone()),
        ..request(dir.path().join("missing.xml"))
    };

    assert!(run(&req).is_err());
    assert!(!proxy.exists());
}

#[test]
fn run___unwritable_output___fails() {
    let dir = TempDir::new().unwrap();
    let req = Request {
        adaptor: Some(dir.path().join("no-such-dir").join("out.h")),
        ..request(write_input(&dir, GREETER_XML))
    };

    let err = run(&req).unwrap_err();

    assert!(err.to_string().contains("unable to write file"));
}

#[test]
fn run___bad_signature___writes_nothing() {
    let dir = TempDir::new().unwrap();
    let proxy = dir.path().join("proxy.h");
    let adaptor = dir.path().join("adaptor.h");
    let xml = r#"<node><interface name="a.B"><method name="M"><arg type="Q"/></method></interface></node>"#;
    let req = Request {
        proxy: Some(proxy.clone()),
        adaptor: Some(adaptor.clone()),
        ..request(write_input(&dir, xml))
    };

    assert!(run(&req).is_err());
    assert!(!proxy.exists());
    assert!(!adaptor.exists());
}

#[test]
fn run___async_mode___emits_completion_handlers() {
    let dir = TempDir::new().unwrap();
    let proxy = dir.path().join("proxy.h");
    let req = Request {
        proxy: Some(proxy.clone()),
        modes: ProxyModes::ASYNC,
        ..request(write_input(&dir, GREETER_XML))
    };

    run(&req).unwrap();

    let text = fs::read_to_string(&proxy).unwrap();
    assert!(text.contains("virtual void GreetCallback("));
}

#[test]
fn load_config___toml_file___overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("busgen.toml");
    fs::write(&path, "guard_prefix = \"MY_\"\n").unwrap();

    let config = load_config(Some(path.as_path())).unwrap();

    assert_eq!(config.guard_prefix, "MY_");
    assert_eq!(config.indent, "\t");
}

#[test]
fn load_config___none___defaults() {
    assert_eq!(load_config(None).unwrap(), GeneratorConfig::default());
}

#[test]
fn load_config___unknown_key___fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("busgen.toml");
    fs::write(&path, "colour = \"blue\"\n").unwrap();

    assert!(load_config(Some(path.as_path())).is_err());
}
