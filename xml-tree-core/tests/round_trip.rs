use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use xml_tree_core::{parse, write, write_string};

fn fixture(path: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path);
    fs::read_to_string(&path).expect("fixture should be readable")
}

#[test]
fn parse_write_parse_round_trip_preserves_tree_shape() {
    for name in ["fixtures/computer.xml", "fixtures/policy.xml"] {
        let first = parse(&fixture(name)).expect("initial parse should succeed");

        let written = write_string(&first).expect("write should succeed");
        let second = parse(&written).expect("re-parse should succeed");

        assert_eq!(first, second, "{name} changed across a round trip");
    }
}

#[test]
fn write_produces_utf8_bytes() {
    let node = parse("<category><name>Café</name></category>").expect("parse");
    let bytes = write(&node).expect("write");
    let text = String::from_utf8(bytes).expect("utf8");
    assert!(text.contains("Café"));
}

#[test]
fn untouched_leaf_text_survives_round_trip() {
    let raw = "<script>\n  <name>s</name>\n  <parameters>\n    <parameter4> </parameter4>\n  </parameters>\n  <notes>\n</notes>\n  <info></info>\n  <os_requirements/>\n</script>";
    let first = parse(raw).expect("parse");
    assert_eq!(first.get_text(&["parameters", "parameter4"]), Some(" "));
    assert_eq!(first.get_text(&["notes"]), Some("\n"));

    let written = write_string(&first).expect("write");
    assert!(written.contains("<parameter4> </parameter4>"));
    assert!(written.contains("<notes>\n</notes>"));
    assert!(written.contains("<info></info>"));
    assert!(written.contains("<os_requirements/>"));

    let second = parse(&written).expect("re-parse");
    assert_eq!(first, second);
}

#[test]
fn edited_tree_keeps_untouched_whitespace() {
    let mut tree = parse("<policy><general><name>P</name><notes>  </notes></general></policy>")
        .expect("parse");
    tree.children[0].children[0].set_text("Renamed");

    let second = parse(&write_string(&tree).expect("write")).expect("re-parse");
    assert_eq!(second.get_text(&["general", "name"]), Some("Renamed"));
    assert_eq!(second.get_text(&["general", "notes"]), Some("  "));
}
