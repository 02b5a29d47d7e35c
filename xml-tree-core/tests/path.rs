use pretty_assertions::assert_eq;
use xml_tree_core::path::{ensure, find, remove, strip_child_ids};
use xml_tree_core::{parse, ElementPath, XmlNode};

fn path(raw: &str) -> ElementPath {
    ElementPath::parse(raw).expect("valid path")
}

fn sample() -> XmlNode {
    parse(
        r#"<computer>
  <general><id>9</id><name>A</name><site><id>-1</id><name>None</name></site></general>
  <location><building>Old</building></location>
  <extension_attributes>
    <extension_attribute><id>1</id><name>Tag</name><nested><id>5</id></nested></extension_attribute>
    <extension_attribute><name>NoId</name></extension_attribute>
  </extension_attributes>
</computer>"#,
    )
    .expect("sample parses")
}

#[test]
fn find_descends_through_first_matches() {
    let tree = sample();
    let site_name = find(&tree, &path("general/site/name")).expect("site name");
    assert_eq!(site_name.text.as_deref(), Some("None"));
    assert!(find(&tree, &path("general/serial_number")).is_none());
    assert!(find(&tree, &path("missing/id")).is_none());
}

#[test]
fn single_segment_addresses_root_child() {
    let mut tree = sample();
    assert!(find(&tree, &path("location")).is_some());
    assert!(remove(&mut tree, &path("location")));
    assert!(tree.get_child("location").is_none());
}

#[test]
fn ensure_creates_missing_chain() {
    let mut tree = sample();
    let created = ensure(
        &mut tree,
        &path("general/remote_management/management_password"),
    );
    assert!(created.text.is_none());
    assert!(created.children.is_empty());
    created.set_text("secret");

    assert_eq!(
        tree.get_text(&["general", "remote_management", "management_password"]),
        Some("secret")
    );
    // Created links are appended after existing siblings.
    let general = tree.get_child("general").expect("general");
    assert_eq!(
        general.children.last().map(|c| c.tag.as_str()),
        Some("remote_management")
    );
}

#[test]
fn ensure_returns_existing_element() {
    let mut tree = sample();
    let before = tree.clone();
    let existing = ensure(&mut tree, &path("location/building"));
    assert_eq!(existing.text.as_deref(), Some("Old"));
    assert_eq!(tree, before);
}

#[test]
fn remove_is_idempotent() {
    let mut once = sample();
    assert!(remove(&mut once, &path("general/id")));

    let mut twice = once.clone();
    assert!(!remove(&mut twice, &path("general/id")));
    assert_eq!(once, twice);
}

#[test]
fn remove_of_missing_parent_is_noop() {
    let mut tree = sample();
    let before = tree.clone();
    assert!(!remove(&mut tree, &path("purchasing/attachments")));
    assert_eq!(tree, before);
}

#[test]
fn remove_only_touches_first_sibling() {
    let mut tree = parse("<scope><computers><id>1</id><id>2</id></computers></scope>")
        .expect("parse");
    assert!(remove(&mut tree, &path("computers/id")));
    let ids: Vec<_> = tree
        .get_child("computers")
        .expect("computers")
        .get_children("id")
        .iter()
        .filter_map(|id| id.text.as_deref())
        .collect();
    assert_eq!(ids, vec!["2"]);
}

#[test]
fn strip_child_ids_only_removes_direct_id() {
    let mut tree = sample();
    let removed = strip_child_ids(&mut tree, &path("extension_attributes"));
    assert_eq!(removed, Some(1));

    let attributes = tree
        .get_child("extension_attributes")
        .expect("attributes")
        .get_children("extension_attribute");
    assert_eq!(attributes.len(), 2);
    assert!(attributes[0].get_child("id").is_none());
    assert_eq!(attributes[0].get_text(&["name"]), Some("Tag"));
    assert_eq!(attributes[0].get_text(&["nested", "id"]), Some("5"));
    assert_eq!(attributes[1].get_text(&["name"]), Some("NoId"));
}

#[test]
fn strip_child_ids_on_missing_collection_is_noop() {
    let mut tree = sample();
    let before = tree.clone();
    assert_eq!(strip_child_ids(&mut tree, &path("scope/computers")), None);
    assert_eq!(tree, before);
}
