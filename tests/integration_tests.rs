//! Integration tests with a complete configuration file
//!
//! The fixture covers every literal family, lists, a nested structure, and the
//! boolean keywords in mixed case.

use typed_props::{Properties, PropertiesError, PropertyKind};

const FIXTURE: &str = concat!(
    " # a comment \n",
    " prop01 = aProperty # with a line comment\n",
    "\n",
    " prop02 = \" A quoted property with \\\t tab and\\\nnewline and \\\" double quotes and \\' ' single quotes \" # and a comment\n",
    "\n",
    " # Integers\n",
    " prop03 = 112233\n",
    " prop04 = +112233\n",
    " prop05 = -112233\n",
    " prop06 = 0334455 # octal\n",
    " prop07 = 0x124abcde # hex\n",
    " prop08 = 0X124AbCdE # hex\n",
    " prop09 = 0b101100101011 # binary\n",
    "\n",
    " # double values\n",
    " prop10 = 12345.678\n",
    " prop11 = +12345.678\n",
    " prop12 = -12345.678\n",
    " prop13 = 12345.678E2\n",
    " prop14 = +12345.678E-2\n",
    " prop15 = -12345.678E+2\n",
    " prop16 = 12345678E2\n",
    " prop17 = +12345678E-2\n",
    " prop18 = -12345678E+2\n",
    " prop19 = .12345678E2\n",
    " prop20 = +.12345678E-2\n",
    " prop21 = -.12345678E+2\n",
    "\n",
    " # lists\n",
    " prop22 = item1, item2 , item3\n",
    " prop23 = \" item1 \" , item2,\" Item\\\t3\\\nand a newline \"\n",
    " prop24 = { # a structure \n",
    " \tprop24.prop1 = aProperty # with a line comment\n",
    " \tprop24.prop2 = 0x124abcde # hex\n",
    " \tprop24.prop3 = +.12345678E-2\n",
    "\n",
    " \tprop4 = \" item1 \" , item2,\" Item\t3\nand a newline \"\n",
    "}\n",
    "\n",
    " prop25 = on\n",
    " prop26 = off\n",
    " prop27 = ON\n",
    " prop28 = OFF\n",
    " prop29 = On\n",
    " prop30 = OFf\n",
    " prop31 = yes\n",
    " prop32 = no\n",
    " prop33 = YES\n",
    " prop34 = NO\n",
    " prop35 = YEs\n",
    " prop36 = No\n",
    " prop37 = true\n",
    " prop38 = false\n",
    " prop39 = TRUE\n",
    " prop40 = FALSE\n",
    " prop41 = TRue\n",
    " prop42 = FALse\n",
);

fn fixture() -> Properties {
    let mut props = Properties::new();
    props.read_configuration_from(FIXTURE.as_bytes()).unwrap();
    props
}

#[test]
fn test_fixture_shape() {
    let props = fixture();
    assert_eq!(props.len(), 42);
    let names: Vec<&str> = props.names().collect();
    assert_eq!(names.first(), Some(&"prop01"));
    assert_eq!(names.last(), Some(&"prop42"));
}

#[test]
fn test_strings() {
    let props = fixture();
    assert_eq!(props.get_string("prop01", "").unwrap(), "aProperty");
    assert_eq!(
        props.get_string("prop02", "").unwrap(),
        " A quoted property with \t tab and\nnewline and \" double quotes and ' ' single quotes "
    );
    assert!(props.get("prop02").unwrap().is_quoted());
}

#[test]
fn test_integers() {
    let props = fixture();
    let expected = [
        ("prop03", 112233),
        ("prop04", 112233),
        ("prop05", -112233),
        ("prop06", 0o334455),
        ("prop07", 0x124abcde),
        ("prop08", 0x124abcde),
        ("prop09", 0b101100101011),
    ];
    for (name, value) in expected {
        assert_eq!(props.get_int(name, 0).unwrap(), value, "{name}");
    }
    assert_eq!(props.get_int("prop109", 4711).unwrap(), 4711);
    assert_eq!(props.get_string("prop08", "").unwrap(), "0X124AbCdE");
}

#[test]
fn test_floats() {
    let props = fixture();
    let expected = [
        ("prop10", 12345.678),
        ("prop11", 12345.678),
        ("prop12", -12345.678),
        ("prop13", 12345.678E2),
        ("prop14", 12345.678E-2),
        ("prop15", -12345.678E+2),
        ("prop16", 12345678E2),
        ("prop17", 12345678E-2),
        ("prop18", -12345678E+2),
        ("prop19", 0.12345678E2),
        ("prop20", 0.12345678E-2),
        ("prop21", -0.12345678E+2),
    ];
    for (name, value) in expected {
        assert_eq!(props.get_float(name, 0.0).unwrap(), value, "{name}");
    }
    assert_eq!(props.get_float("prop121", -1.5).unwrap(), -1.5);
    assert_eq!(props.get_string("prop13", "").unwrap(), "12345.678E2");
}

#[test]
fn test_lists() {
    let props = fixture();
    let prop22 = props.search_property("prop22").unwrap();
    assert_eq!(prop22.list_values().unwrap(), ["item1", "item2", "item3"]);

    let prop23 = props.search_property("prop23").unwrap();
    assert_eq!(
        prop23.list_values().unwrap(),
        [" item1 ", "item2", " Item\t3\nand a newline "]
    );
    assert_eq!(
        props.get_string("prop23", "").unwrap(),
        r#"" item1 ", "item2", " Item\t3\nand a newline ""#
    );
}

#[test]
fn test_structure() {
    let props = fixture();
    let prop24 = props.search_property("prop24").unwrap();
    assert_eq!(prop24.kind(), PropertyKind::Struct);

    let children = prop24.struct_value().unwrap();
    assert_eq!(children.len(), 4);
    assert_eq!(children.struct_level(), 1);
    assert_eq!(children.get_string("prop24.prop1", "").unwrap(), "aProperty");
    assert_eq!(children.get_int("prop24.prop2", 0).unwrap(), 0x124abcde);
    assert_eq!(children.get_float("prop24.prop3", 0.0).unwrap(), 0.12345678E-2);
    assert_eq!(
        children.search_property("prop4").unwrap().list_values().unwrap(),
        [" item1 ", "item2", " Item\t3\nand a newline "]
    );

    // level-local lookup
    assert!(props.get("prop24.prop1").is_none());
    assert!(children.get("prop01").is_none());

    assert!(matches!(
        props.get_string("prop24", ""),
        Err(PropertiesError::WrongType { .. })
    ));
}

#[test]
fn test_booleans() {
    let props = fixture();
    for (index, number) in (25..=42).enumerate() {
        let name = format!("prop{number}");
        let expected = index % 2 == 0;
        assert_eq!(props.get_bool(&name, !expected).unwrap(), expected, "{name}");
    }
    assert_eq!(props.get_string("prop41", "").unwrap(), "TRue");
}

#[test]
fn test_render_and_reparse() {
    let props = fixture();
    let rendered = props.to_string();

    assert!(rendered.starts_with("prop01 = aProperty\n"));
    assert!(rendered.contains("prop07 = 0x124abcde\n"));
    assert!(rendered.contains("prop24 = {\n\tprop24.prop1 = aProperty\n"));
    assert!(rendered.contains("\n}\nprop25 = on\n"));
    assert!(rendered.contains(
        "prop02 = \" A quoted property with \\t tab and\\nnewline and \\\" double quotes and ' ' single quotes \"\n"
    ));

    let reparsed: Properties = rendered.parse().unwrap();
    assert_eq!(reparsed, props);
    assert_eq!(reparsed.to_string(), rendered);
}

#[test]
fn test_reread_replaces_previous_content() {
    let mut props = fixture();
    props
        .read_configuration_from("only = 1\n".as_bytes())
        .unwrap();
    assert_eq!(props.len(), 1);
    assert!(props.get("prop01").is_none());
}

#[test]
fn test_programmatic_tree() {
    use typed_props::Property;

    let mut window = Properties::new();
    window.insert_property(Property::string("title", "Main window")).unwrap();
    window.insert_property(Property::integer("width", 640)).unwrap();

    let mut root = Properties::new();
    root.insert_property(Property::structure("window", window)).unwrap();
    root.insert_property(Property::list("fonts", ["Arial", "Times New Roman"])).unwrap();
    root.insert_property(Property::float("scale", 1.0)).unwrap();

    assert_eq!(
        root.to_string(),
        "window = {\n\ttitle = \"Main window\"\n\twidth = 640\n}\nfonts = \"Arial\", \"Times New Roman\"\nscale = 1.0\n"
    );

    let reparsed: Properties = root.to_string().parse().unwrap();
    assert_eq!(reparsed, root);

    root.delete_property("window");
    assert_eq!(root.names().collect::<Vec<_>>(), ["fonts", "scale"]);
}
