/* packages/compiler/src/tests/conditional.rs */

use super::*;

#[test]
fn count_zero_prunes_node() {
  let template = r#"<li ast-if="count">{{count}} items</li>"#;
  assert_eq!(compile(template, &json!({"count": 0})), "");
  assert_eq!(compile(template, &json!({"count": 3})), "<li>3 items</li>");
}

#[test]
fn pruned_node_takes_its_subtree() {
  let template = concat!(
    r#"<div><section ast-if="show"><h2>{{title}}</h2><p>body</p></section>"#,
    r#"<footer>f</footer></div>"#,
  );
  assert_eq!(
    compile(template, &json!({"show": false, "title": "T"})),
    "<div><footer>f</footer></div>"
  );
  assert_eq!(
    compile(template, &json!({"show": true, "title": "T"})),
    "<div><section><h2>T</h2><p>body</p></section><footer>f</footer></div>"
  );
}

#[test]
fn comparison_and_logic_expressions() {
  let data = json!({"user": {"role": "admin", "age": 30}, "banned": false});
  let cases = [
    (r#"<b ast-if="user.role == 'admin'">x</b>"#, "<b>x</b>"),
    (r#"<b ast-if="user.role !== 'admin'">x</b>"#, ""),
    (r#"<b ast-if="user.age >= 18 &amp;&amp; !banned">x</b>"#, "<b>x</b>"),
    (r#"<b ast-if="user.age >= 18 && !banned">x</b>"#, "<b>x</b>"),
    (r#"<b ast-if="(banned || user.age < 18)">x</b>"#, ""),
  ];
  for (template, expected) in cases {
    assert_eq!(compile(template, &data), expected, "template: {template}");
  }
}

#[test]
fn unbound_identifier_prunes_and_reports() {
  let (out, diags) = compile_with_diagnostics(r#"<p ast-if="ghost">x</p><p>y</p>"#, &json!({}));
  assert_eq!(out, "<p>y</p>");
  assert_eq!(diags.len(), 1);
  assert_eq!(diags[0].kind, DiagnosticKind::ConditionFailed);
  assert_eq!(diags[0].directive, "ghost");
}

#[test]
fn malformed_expression_prunes_and_reports() {
  for expr in ["a +", "a = 1", "", "fetch('x')", "a.", "'open"] {
    let template = format!(r#"<p ast-if="{expr}">x</p>"#);
    let (out, diags) = compile_with_diagnostics(&template, &json!({"a": 1}));
    assert_eq!(out, "", "expression {expr:?} should prune");
    assert_eq!(diags.len(), 1, "expression {expr:?} should report once");
    assert_eq!(diags[0].kind, DiagnosticKind::MalformedCondition);
  }
}

#[test]
fn valueless_if_attribute_prunes() {
  assert_eq!(compile("<p ast-if>x</p>", &json!({})), "");
}

#[test]
fn nested_conditionals_only_visit_kept_branches() {
  let template = r#"<div ast-if="outer"><span ast-if="ghost">never evaluated</span></div>"#;
  let (out, diags) = compile_with_diagnostics(template, &json!({"outer": false}));
  assert_eq!(out, "");
  assert!(diags.is_empty(), "descendants of a pruned node must not be visited: {diags:?}");
}

#[test]
fn missing_tail_segment_is_falsy_not_an_error() {
  let (out, diags) = compile_with_diagnostics(
    r#"<p ast-if="user.nickname">a</p><p ast-if="!user.nickname">b</p>"#,
    &json!({"user": {}}),
  );
  assert_eq!(out, "<p>b</p>");
  assert!(diags.is_empty());
}
