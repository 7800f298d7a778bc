/* packages/compiler/src/tests/repeat.rs */

use super::*;

#[test]
fn item_and_index_bindings() {
  let template = r#"<li ast-for="(x,i) in items">{{i}}:{{x}}</li>"#;
  assert_eq!(compile(template, &json!({"items": ["a", "b"]})), "<li>0:a</li><li>1:b</li>");
}

#[test]
fn emits_one_clone_per_item_in_order() {
  let items: Vec<String> = (0..25).map(|n| format!("v{n}")).collect();
  let out = compile(r#"<i ast-for="x in items">{{x}}</i>"#, &json!({"items": items.clone()}));
  let expected: String = items.iter().map(|v| format!("<i>{v}</i>")).collect();
  assert_eq!(out, expected);
}

#[test]
fn empty_array_renders_nothing() {
  let template = r#"<ul><li ast-for="x in xs">{{x}}</li></ul>"#;
  assert_eq!(compile(template, &json!({"xs": []})), "<ul></ul>");
}

#[test]
fn object_items_and_attribute_interpolation() {
  let data = json!({
    "products": [
      {"id": "p1", "name": "Phone", "tags": ["new"]},
      {"id": "p2", "name": "Laptop", "tags": []}
    ]
  });
  let template = concat!(
    r#"<div ast-for="p in products" class="card" id="{{p.id}}">"#,
    r#"<h3>{{p.name}}</h3><small>{{p.tags.length}}</small></div>"#,
  );
  assert_eq!(
    compile(template, &data),
    concat!(
      r#"<div class="card" id="p1"><h3>Phone</h3><small>1</small></div>"#,
      r#"<div class="card" id="p2"><h3>Laptop</h3><small>0</small></div>"#,
    )
  );
}

#[test]
fn outer_data_stays_visible_inside_iterations() {
  let data = json!({"currency": "EUR", "prices": [1, 2]});
  assert_eq!(
    compile(r#"<span ast-for="p in prices">{{p}} {{currency}}</span>"#, &data),
    "<span>1 EUR</span><span>2 EUR</span>"
  );
}

#[test]
fn nested_repeats_compose() {
  let data = json!({
    "groups": [
      {"name": "g0", "members": ["a", "b", "c"]},
      {"name": "g1", "members": ["d", "e", "f"]}
    ]
  });
  let template = concat!(
    r#"<ul ast-for="(g, i) in groups">"#,
    r#"<li ast-for="(m, j) in g.members">{{g.name}}/{{i}}.{{j}}={{m}}</li>"#,
    "</ul>"
  );
  let out = compile(template, &data);
  assert_eq!(out.matches("<li>").count(), 6);
  assert_eq!(
    out,
    concat!(
      "<ul><li>g0/0.0=a</li><li>g0/0.1=b</li><li>g0/0.2=c</li></ul>",
      "<ul><li>g1/1.0=d</li><li>g1/1.1=e</li><li>g1/1.2=f</li></ul>",
    )
  );
}

#[test]
fn inner_bindings_shadow_outer_ones() {
  let data = json!({"x": "root", "rows": [["a", "b"], ["c"]]});
  let template = concat!(
    r#"<tr ast-for="(x, i) in rows">"#,
    r#"<td ast-for="(x, i) in x">{{i}}{{x}}</td>"#,
    "</tr>{{x}}"
  );
  assert_eq!(compile(template, &data), "<tr><td>0a</td><td>1b</td></tr><tr><td>0c</td></tr>root");
}

#[test]
fn index_binding_shadows_root_key() {
  let data = json!({"i": "root-i", "xs": ["a"]});
  assert_eq!(compile(r#"<b ast-for="(x, i) in xs">{{i}}</b>{{i}}"#, &data), "<b>0</b>root-i");
}

#[test]
fn conditional_is_evaluated_per_clone() {
  let data = json!({"users": [
    {"name": "ann", "active": true},
    {"name": "bob", "active": false},
    {"name": "cy", "active": true}
  ]});
  let template = r#"<p ast-for="(u, n) in users" ast-if="u.active && n > 0">{{u.name}}</p>"#;
  assert_eq!(compile(template, &data), "<p>cy</p>");
}

#[test]
fn conditionals_inside_iterations() {
  let data = json!({"items": [{"name": "a", "sale": true}, {"name": "b", "sale": false}]});
  let template =
    r#"<li ast-for="it in items">{{it.name}}<em ast-if="it.sale">sale</em></li>"#;
  assert_eq!(compile(template, &data), "<li>a<em>sale</em></li><li>b</li>");
}

#[test]
fn repeat_inside_conditional() {
  let template = r#"<section ast-if="list.length"><i ast-for="v in list">{{v}}</i></section>"#;
  assert_eq!(compile(template, &json!({"list": [1, 2]})), "<section><i>1</i><i>2</i></section>");
  assert_eq!(compile(template, &json!({"list": []})), "");
}

#[test]
fn malformed_grammar_drops_node() {
  let template = r#"<li ast-for="x of items">{{x}}</li><p>after</p>"#;
  let (out, diags) = compile_with_diagnostics(template, &json!({"items": [1]}));
  assert_eq!(out, "<p>after</p>");
  assert_eq!(diags.len(), 1);
  assert_eq!(diags[0].kind, DiagnosticKind::MalformedRepeat);
  assert_eq!(diags[0].directive, "x of items");
}

#[test]
fn non_sequence_source_drops_node() {
  for data in [json!({"items": "abc"}), json!({"items": 3}), json!({"items": null}), json!({})] {
    let (out, diags) = compile_with_diagnostics(r#"<li ast-for="x in items">{{x}}</li>"#, &data);
    assert_eq!(out, "", "data: {data}");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::RepeatSourceNotArray);
  }
}

#[test]
fn void_and_self_closing_elements_repeat() {
  let data = json!({"srcs": ["a.png", "b.png"]});
  assert_eq!(
    compile(r#"<img ast-for="s in srcs" src="{{s}}"><br ast-for="s in srcs"/>"#, &data),
    r#"<img src="a.png"><img src="b.png"><br/><br/>"#
  );
}

#[test]
fn iteration_does_not_alter_source_children() {
  let data = json!({"xs": ["<1>", "2"]});
  let template = r#"<p ast-for="x in xs"><b title="{{x}}">{{x}}</b></p>"#;
  assert_eq!(
    compile(template, &data),
    r#"<p><b title="&lt;1&gt;">&lt;1&gt;</b></p><p><b title="2">2</b></p>"#
  );
}
