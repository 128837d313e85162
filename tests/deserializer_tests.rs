//! Tests for deserializing configuration trees into Rust types

use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use typed_props::{Properties, PropertiesError, SerdeError, from_properties, from_str};

#[derive(Debug, Deserialize, PartialEq)]
struct Window {
    title: String,
    width: u32,
    height: u32,
    scale: f32,
    visible: bool,
    fonts: Vec<String>,
    position: Position,
    #[serde(default)]
    border: Option<u8>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Position {
    x: i64,
    y: i64,
}

const WINDOW: &str = r#"
# main window
title    = "Main window"
width    = 0x280
height   = 0740
scale    = 1.25
visible  = Yes
fonts    = Arial, "Times New Roman"
position = {
    x = -10
    y = 0b10100
}
"#;

#[test]
fn test_struct_from_text() {
    let window: Window = from_str(WINDOW).unwrap();
    assert_eq!(
        window,
        Window {
            title: "Main window".to_string(),
            width: 640,
            height: 480,
            scale: 1.25,
            visible: true,
            fonts: vec!["Arial".to_string(), "Times New Roman".to_string()],
            position: Position { x: -10, y: 20 },
            border: None,
        }
    );
}

#[test]
fn test_struct_from_parsed_tree() {
    let props: Properties = WINDOW.parse().unwrap();
    let position: Position =
        from_properties(props.get("position").unwrap().struct_value().unwrap()).unwrap();
    assert_eq!(position, Position { x: -10, y: 20 });
}

#[test]
fn test_borrowed_strings() {
    #[derive(Deserialize)]
    struct Names<'a> {
        first: &'a str,
        #[serde(borrow)]
        all: Vec<&'a str>,
    }
    let props: Properties = "first = alpha\nall = alpha, beta".parse().unwrap();
    let names: Names<'_> = from_properties(&props).unwrap();
    assert_eq!(names.first, "alpha");
    assert_eq!(names.all, ["alpha", "beta"]);
}

#[test]
fn test_scalars_read_as_strings() {
    #[derive(Deserialize)]
    struct Raw {
        width: String,
        scale: String,
        visible: String,
    }
    let raw: Raw = from_str(WINDOW).unwrap();
    assert_eq!(raw.width, "0x280");
    assert_eq!(raw.scale, "1.25");
    assert_eq!(raw.visible, "Yes");
}

#[test]
fn test_dynamic_value() {
    let value: serde_json::Value = from_str(WINDOW).unwrap();
    assert_eq!(value["width"], json!(640));
    assert_eq!(value["visible"], json!(true));
    assert_eq!(value["fonts"], json!(["Arial", "Times New Roman"]));
    assert_eq!(value["position"], json!({ "x": -10, "y": 20 }));
}

#[test]
fn test_map_of_sections() {
    #[derive(Debug, Deserialize)]
    struct Section {
        enabled: bool,
        #[serde(default)]
        level: Option<String>,
    }
    let sections: BTreeMap<String, Section> = from_str(
        "audio = {\n enabled = on\n}\nvideo = {\n enabled = off\n level = high\n}\n",
    )
    .unwrap();
    assert!(sections["audio"].enabled);
    assert_eq!(sections["audio"].level, None);
    assert_eq!(sections["video"].level.as_deref(), Some("high"));
}

#[test]
fn test_single_value_as_sequence() {
    #[derive(Deserialize)]
    struct Hosts {
        hosts: Vec<String>,
    }
    let hosts: Hosts = from_str("hosts = localhost").unwrap();
    assert_eq!(hosts.hosts, ["localhost"]);
}

#[test]
fn test_float_accepts_integer() {
    #[derive(Deserialize)]
    struct Ratio {
        ratio: f64,
    }
    let ratio: Ratio = from_str("ratio = 3").unwrap();
    assert_eq!(ratio.ratio, 3.0);
}

#[test]
fn test_type_mismatch_names_property() {
    #[derive(Debug, Deserialize)]
    struct Flag {
        #[allow(dead_code)]
        flag: bool,
    }
    match from_str::<Flag>("flag = 1") {
        Err(PropertiesError::Serde(SerdeError::TypeMismatch {
            name,
            expected,
            found,
        })) => {
            assert_eq!(name, "flag");
            assert_eq!(expected, "boolean");
            assert_eq!(found, "Integer");
        }
        other => panic!("expected type mismatch, got {other:?}"),
    }
}

#[test]
fn test_missing_field() {
    #[derive(Debug, Deserialize)]
    struct Needs {
        #[allow(dead_code)]
        required: i32,
    }
    let err = from_str::<Needs>("other = 1").unwrap_err();
    assert!(matches!(err, PropertiesError::Serde(SerdeError::Custom(_))));
    assert!(err.to_string().contains("required"));
}

#[test]
fn test_list_items_reclassified() {
    #[derive(Deserialize)]
    struct Listener {
        ports: Vec<u16>,
        flags: Vec<bool>,
        weights: Vec<f64>,
    }
    let listener: Listener =
        from_str("ports = 80, 0x1bb, 0b1\nflags = on, NO\nweights = 0.5, 2.5E1").unwrap();
    assert_eq!(listener.ports, [80, 443, 1]);
    assert_eq!(listener.flags, [true, false]);
    assert_eq!(listener.weights, [0.5, 25.0]);
}

#[test]
fn test_enums() {
    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Level {
        Debug,
        Info,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    enum Backend {
        File { path: String, rotate: bool },
        Syslog(String),
    }

    #[derive(Debug, Deserialize)]
    struct Logging {
        level: Level,
        primary: Backend,
        secondary: Backend,
    }

    let logging: Logging = from_str(
        "level = info\nprimary = {\n File = {\n  path = \"/var/log/app\"\n  rotate = yes\n }\n}\nsecondary = {\n Syslog = local0\n}\n",
    )
    .unwrap();
    assert_eq!(logging.level, Level::Info);
    assert_eq!(
        logging.primary,
        Backend::File {
            path: "/var/log/app".to_string(),
            rotate: true
        }
    );
    assert_eq!(logging.secondary, Backend::Syslog("local0".to_string()));
}
