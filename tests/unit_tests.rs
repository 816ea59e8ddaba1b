//! End-to-end tests over the parse → merge → register → resolve pipeline.

use girmodel::prelude::*;

fn parse(source: &str, platform: Platforms, prior: Option<Document>) -> Document {
    Parser::new().parse_str(source, platform, prior).unwrap()
}

/// A single-platform document for a class with one extra method.
fn class_doc(extra_method: &str) -> String {
    format!(
        r#"<repository>
  <namespace name="Gfx">
    <class name="Canvas" c:type="GfxCanvas">
      <method name="paint" c:identifier="gfx_canvas_paint"/>
      <method name="{extra_method}" c:identifier="gfx_canvas_{extra_method}"/>
    </class>
  </namespace>
</repository>"#
    )
}

fn method_names(class: NodeRef<'_>) -> Vec<String> {
    class
        .children_of_kind(ElementKind::Method)
        .filter_map(|m| m.name().map(str::to_owned))
        .collect()
}

fn canvas(doc: &Document) -> NodeId {
    let ns = doc.namespace("Gfx").unwrap();
    doc.registered_type(ns.id(), "Canvas").unwrap()
}

#[test]
fn merge_is_associative_in_effect() {
    let p1 = class_doc("resize");
    let p2 = class_doc("rotate");
    let p3 = class_doc("clear");

    // (P1 ∪ P2) ∪ P3
    let left = parse(&p1, Platforms::LINUX, None);
    let left = parse(&p2, Platforms::WINDOWS, Some(left));
    let left = parse(&p3, Platforms::MACOS, Some(left));

    // P1 ∪ (P2 ∪ P3), realized by chaining the passes in another order.
    let right = parse(&p2, Platforms::WINDOWS, None);
    let right = parse(&p3, Platforms::MACOS, Some(right));
    let right = parse(&p1, Platforms::LINUX, Some(right));

    let left_class = left.node(canvas(&left));
    let right_class = right.node(canvas(&right));

    let mut left_methods = method_names(left_class);
    let mut right_methods = method_names(right_class);
    left_methods.sort();
    right_methods.sort();
    assert_eq!(left_methods, right_methods);
    assert_eq!(
        left_methods,
        vec!["clear", "paint", "resize", "rotate"]
    );

    assert_eq!(left_class.platforms(), Platforms::ALL);
    assert_eq!(right_class.platforms(), Platforms::ALL);
}

#[test]
fn platform_bitmask_union_and_idempotence() {
    let p1 = class_doc("resize");

    let doc = parse(&p1, Platforms::LINUX, None);
    let doc = parse(&p1, Platforms::WINDOWS, Some(doc));
    let class = doc.node(canvas(&doc));
    assert_eq!(class.platforms(), Platforms::LINUX | Platforms::WINDOWS);

    // Merging a side with itself changes nothing.
    let doc = parse(&p1, Platforms::WINDOWS, Some(doc));
    let class = doc.node(canvas(&doc));
    assert_eq!(class.platforms(), Platforms::LINUX | Platforms::WINDOWS);
    assert_eq!(method_names(class), vec!["paint", "resize"]);
}

#[test]
fn record_field_divergence_empties_field_list() {
    let one = r#"<repository><namespace name="Sys">
  <record name="Stat">
    <field name="size"><type name="gint64" c:type="gint64"/></field>
  </record>
</namespace></repository>"#;
    let two = r#"<repository><namespace name="Sys">
  <record name="Stat">
    <field name="size"><type name="gint64" c:type="gint64"/></field>
    <field name="blocks"><type name="gint32" c:type="gint32"/></field>
  </record>
</namespace></repository>"#;

    let merged = parse(two, Platforms::WINDOWS, Some(parse(one, Platforms::LINUX, None)));
    let ns = merged.namespace("Sys").unwrap();
    let record = ns.children_of_kind(ElementKind::Record).next().unwrap();
    assert_eq!(record.children_of_kind(ElementKind::Field).count(), 0);

    // Identical field lists survive.
    let merged = parse(one, Platforms::WINDOWS, Some(parse(one, Platforms::LINUX, None)));
    let ns = merged.namespace("Sys").unwrap();
    let record = ns.children_of_kind(ElementKind::Record).next().unwrap();
    assert_eq!(record.children_of_kind(ElementKind::Field).count(), 1);
}

#[test]
fn shared_library_table_union() {
    let one = r#"<repository><namespace name="Gfx" shared-library="libgfx.so.1"/></repository>"#;
    let two = r#"<repository><namespace name="Gfx" shared-library="gfx-1.dll"/></repository>"#;

    let doc = parse(one, Platforms::LINUX, None);
    let doc = parse(two, Platforms::WINDOWS, Some(doc));
    let ns = doc.namespace("Gfx").unwrap();
    assert_eq!(ns.shared_library(Platforms::LINUX), Some("libgfx.so.1"));
    assert_eq!(ns.shared_library(Platforms::WINDOWS), Some("gfx-1.dll"));
    assert_eq!(ns.shared_library(Platforms::MACOS), None);
}

#[test]
fn forward_reference_resolves_without_errors() {
    let a = r#"<repository><namespace name="A">
  <class name="Widget">
    <field name="backend"><type name="B.Backend"/></field>
  </class>
</namespace></repository>"#;
    let b = r#"<repository><namespace name="B">
  <class name="Backend"/>
</namespace></repository>"#;

    let library = Library::new();
    library.put("A-1.0", parse(a, Platforms::ALL, None));
    let context = library.lookup_namespace("A").unwrap();

    // The reference names a namespace that is not loaded: absent, no
    // exception anywhere.
    assert!(library.resolve(&context, "B.Backend").is_none());

    // After B is registered, a fresh call with the same arguments finds it.
    library.put("B-1.0", parse(b, Platforms::ALL, None));
    let backend = library.resolve(&context, "B.Backend").unwrap();
    assert_eq!(backend.to_ref().name(), Some("Backend"));
    assert_eq!(backend.to_ref().kind(), ElementKind::Class);
}

#[test]
fn resolution_is_deterministic() {
    let source = r#"<repository><namespace name="Gfx">
  <class name="Canvas"/>
  <record name="Point"/>
</namespace></repository>"#;
    let library = Library::new();
    library.put("Gfx-1.0", parse(source, Platforms::ALL, None));
    let context = library.lookup_namespace("Gfx").unwrap();

    for name in ["Canvas", "Point", "Missing"] {
        let first = library.resolve(&context, name).map(|h| h.node);
        let second = library.resolve(&context, name).map(|h| h.node);
        assert_eq!(first, second);
    }
}

#[test]
fn round_trip_identity() {
    let source = r#"<repository version="1.2">
  <namespace name="Gfx" version="1.0">
    <enumeration name="Mode">
      <member name="fast" value="0"/>
      <member name="safe" value="1"/>
    </enumeration>
    <callback name="DrawFunc">
      <return-value><type name="none" c:type="void"/></return-value>
    </callback>
    <function name="init" c:identifier="gfx_init"/>
  </namespace>
</repository>"#;
    let doc = parse(source, Platforms::LINUX, None);

    let root = doc.root();
    assert_eq!(root.kind(), ElementKind::Repository);
    assert_eq!(root.children().count(), 1);

    let ns = doc.namespace("Gfx").unwrap();
    let kinds: Vec<ElementKind> = ns.children().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ElementKind::Enumeration,
            ElementKind::Callback,
            ElementKind::Function
        ]
    );

    let members: Vec<_> = ns
        .children_of_kind(ElementKind::Enumeration)
        .next()
        .unwrap()
        .children_of_kind(ElementKind::Member)
        .filter_map(|m| m.name().map(str::to_owned))
        .collect();
    assert_eq!(members, vec!["fast", "safe"]);

    // Containment is bidirectional.
    for child in ns.children() {
        assert_eq!(child.parent().unwrap().id(), ns.id());
    }
}

#[test]
fn skip_list_subtree_produces_no_nodes() {
    let source = r#"<repository>
  <package name="gfx-1.0">
    <unknown-inner><even-deeper kind="mystery"><leaf/></even-deeper></unknown-inner>
  </package>
  <namespace name="Gfx"><class name="Canvas"/></namespace>
</repository>"#;
    let doc = parse(source, Platforms::LINUX, None);
    // Only the namespace survives under the root.
    assert_eq!(doc.root().children().count(), 1);
    assert!(doc.namespace("Gfx").is_some());
}

#[test]
fn callbacks_are_not_merged() {
    let one = r#"<repository><namespace name="Gfx">
  <callback name="DrawFunc" c:type="GfxDrawFunc"/>
</namespace></repository>"#;
    let two = r#"<repository><namespace name="Gfx">
  <callback name="DrawFunc" c:type="GfxDrawFuncV2"/>
</namespace></repository>"#;

    let doc = parse(one, Platforms::LINUX, None);
    let doc = parse(two, Platforms::WINDOWS, Some(doc));
    let ns = doc.namespace("Gfx").unwrap();
    let callback = ns.children_of_kind(ElementKind::Callback).next().unwrap();
    // The existing declaration stands, platform mask included.
    assert_eq!(callback.c_type(), Some("GfxDrawFunc"));
    assert_eq!(callback.platforms(), Platforms::LINUX);
}

#[test]
fn native_symbol_lookup_spans_documents() {
    let gfx = r#"<repository><namespace name="Gfx">
  <function name="init" c:identifier="gfx_init"/>
  <enumeration name="Mode"><member name="fast" c:identifier="GFX_MODE_FAST" value="0"/></enumeration>
</namespace></repository>"#;
    let snd = r#"<repository><namespace name="Snd">
  <class name="Mixer"><method name="open" c:identifier="snd_mixer_open"/></class>
</namespace></repository>"#;

    let library = Library::new();
    library.put("Gfx-1.0", parse(gfx, Platforms::ALL, None));
    library.put("Snd-1.0", parse(snd, Platforms::ALL, None));

    let init = library.lookup_c_identifier("gfx_init").unwrap();
    assert_eq!(init.to_ref().kind(), ElementKind::Function);

    let member = library.lookup_c_identifier("GFX_MODE_FAST").unwrap();
    assert_eq!(member.to_ref().kind(), ElementKind::Member);

    let method = library.lookup_c_identifier("snd_mixer_open").unwrap();
    assert_eq!(method.to_ref().kind(), ElementKind::Method);

    assert!(library.lookup_c_identifier("gfx_missing").is_none());
}
