/* packages/compiler/src/tests/mod.rs */

use super::*;
use serde_json::json;

mod conditional;
mod repeat;

#[test]
fn interpolates_text() {
  assert_eq!(compile("<p>{{name}}</p>", &json!({"name": "Ada"})), "<p>Ada</p>");
}

#[test]
fn interpolates_nested_paths_and_numbers() {
  let data = json!({"user": {"address": {"city": "Oslo"}}, "n": 3.0, "ok": true});
  assert_eq!(
    compile("<p>{{user.address.city}} {{n}} {{ok}}</p>", &data),
    "<p>Oslo 3 true</p>"
  );
}

#[test]
fn missing_and_null_render_empty() {
  let data = json!({"n": null, "user": {}});
  assert_eq!(compile("<p>[{{missing}}][{{n}}][{{user.name.first}}]</p>", &data), "<p>[][][]</p>");
}

#[test]
fn interpolates_every_marker_in_attributes() {
  let data = json!({"id": 7, "kind": "card", "size": "lg"});
  assert_eq!(
    compile(r#"<div id="item-{{id}}" class="{{kind}} {{kind}}-{{size}}">x</div>"#, &data),
    r#"<div id="item-7" class="card card-lg">x</div>"#
  );
}

#[test]
fn interpolated_values_are_escaped() {
  let data = json!({"v": r#"<script>"x" & 'y'</script>"#});
  assert_eq!(
    compile(r#"<p title="{{v}}">{{v}}</p>"#, &data),
    concat!(
      r#"<p title="&lt;script&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/script&gt;">"#,
      r#"&lt;script&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/script&gt;</p>"#,
    )
  );
}

#[test]
fn template_without_directives_roundtrips() {
  let templates = [
    "",
    "plain text",
    concat!(
      "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>T</title></head>",
      "<body></body></html>",
    ),
    concat!(
      r#"<section class="hero"  id=top><h1>Hi</h1>"#,
      r#"<br><img src='a.png' alt=""/><!-- note --></section>"#,
    ),
    "<ul><li>one<li>two</ul> trailing < text",
    "<script>if (a < b) { run('</p>'); }</script>",
  ];
  for template in templates {
    assert_eq!(compile(template, &json!({"unused": 1})), template);
  }
}

#[test]
fn compiling_compiled_output_is_a_noop() {
  let template = concat!(
    r#"<ul class="{{cls}}">"#,
    r#"<li ast-for="(p, i) in products" ast-if="p.stock > 0" data-i="{{i}}">{{p.name}}</li>"#,
    r#"</ul><p ast-if="note">{{note}}</p>"#,
  );
  let data = json!({
    "cls": "list",
    "note": "fresh",
    "products": [{"name": "A", "stock": 1}, {"name": "B", "stock": 0}, {"name": "C", "stock": 5}]
  });
  let once = compile(template, &data);
  assert_eq!(
    once,
    r#"<ul class="list"><li data-i="0">A</li><li data-i="2">C</li></ul><p>fresh</p>"#
  );
  assert_eq!(compile(&once, &data), once);
}

#[test]
fn diagnostics_are_empty_for_clean_templates() {
  let (out, diags) =
    compile_with_diagnostics(r#"<p ast-if="a">{{a}}</p>"#, &json!({"a": "yes"}));
  assert_eq!(out, "<p>yes</p>");
  assert!(diags.is_empty());
}

#[test]
fn non_object_root_data() {
  assert_eq!(compile("<p>{{x}}</p>", &json!([1, 2])), "<p></p>");
  assert_eq!(compile(r#"<p ast-if="x">y</p>"#, &json!(null)), "");
}

#[test]
fn deeply_nested_markup_compiles() {
  for depth in [1000, 5000] {
    let template = format!("{}{{{{x}}}}{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let expected = format!("{}ok{}", "<div>".repeat(depth), "</div>".repeat(depth));
    assert_eq!(compile(&template, &json!({"x": "ok"})), expected);
  }
}

#[test]
fn deeply_nested_condition_is_dropped() {
  let template = format!(r#"<p ast-if="{}a">y</p><i>kept</i>"#, "!".repeat(5000));
  let (out, diags) = compile_with_diagnostics(&template, &json!({"a": true}));
  assert_eq!(out, "<i>kept</i>");
  assert_eq!(diags.len(), 1);
  assert_eq!(diags[0].kind, DiagnosticKind::MalformedCondition);
  assert_eq!(diags[0].message, "expression nested deeper than 128 levels");
}
