//! Rule to enforce property shorthand in object literals.
//!
//! ```text
//! const obj = { foo: foo };   // flagged, fixed to `{ foo }`
//! const obj = { foo: (foo) }; // allowed
//! const obj = { __proto__: __proto__ }; // allowed, not equivalent
//! ```
//!
//! Keys and values are compared after decoding `\u` escapes, so
//! `{ foo: foo }` is flagged as well.
//!
//! # Suppression
//!
//! - `// layout-lint: allow(property-shorthand) reason="..."` comment

use layout_lint_core::{
    Fix, FixKind, Node, NodeKind, Report, Rule, RuleCategory, RuleContext, RuleListener,
    RuleMeta, Selector, Severity, SourceCode,
};
use std::borrow::Cow;

/// Rule code for property-shorthand.
pub const CODE: &str = "LL007";

/// Rule name for property-shorthand.
pub const NAME: &str = "property-shorthand";

static META: RuleMeta = RuleMeta {
    category: RuleCategory::Suggestion,
    description: "Enforce property shorthand syntax",
    fixable: Some(FixKind::Code),
    options: &[],
    messages: &[(
        "expectedPropertyShorthand",
        "Expected shorthand for property {{name}}.",
    )],
};

/// Enforces property shorthand in object literals.
#[derive(Debug, Clone)]
pub struct PropertyShorthand {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for PropertyShorthand {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyShorthand {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for PropertyShorthand {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn create<'a>(&self, source: &'a SourceCode) -> Box<dyn RuleListener<'a> + 'a> {
        Box::new(ShorthandListener { source })
    }
}

struct ShorthandListener<'a> {
    source: &'a SourceCode,
}

impl<'a> RuleListener<'a> for ShorthandListener<'a> {
    fn selectors(&self) -> Vec<Selector> {
        vec![Selector::enter(NodeKind::Object)]
    }

    fn visit(&mut self, _selector: Selector, node: &'a Node, cx: &mut RuleContext<'a>) {
        let source = self.source;
        for property in source.children(node).filter(|p| p.kind == NodeKind::Pair) {
            self.check_property(property, cx);
        }
    }
}

impl ShorthandListener<'_> {
    fn check_property(&self, property: &Node, cx: &mut RuleContext<'_>) {
        let source = self.source;
        let (Some(key), Some(value)) = (
            source.child_by_field(property, "key"),
            source.child_by_field(property, "value"),
        ) else {
            return;
        };
        if key.kind != NodeKind::PropertyIdentifier || value.kind != NodeKind::Identifier {
            return;
        }
        let key_text = source.node_text(key);
        let name = decode_identifier(key_text);
        if name == "__proto__" || name != decode_identifier(source.node_text(value)) {
            return;
        }
        // Only the colon may separate the key from the value.
        let (Some(after_key), Some(before_value)) = (
            source.token_or_comment_after(key.range.end),
            source.token_or_comment_before(value.range.start),
        ) else {
            return;
        };
        if !after_key.same_as(before_value) {
            return;
        }
        cx.report(
            Report::new("expectedPropertyShorthand", property.loc)
                .with_data("name", &name)
                .with_fix(Fix::replace(property.range.clone(), key_text)),
        );
    }
}

/// Decodes `\uXXXX` and `\u{...}` escapes in an identifier.
///
/// Malformed escapes are kept as written.
fn decode_identifier(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("\\u") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let (digits, consumed) = match after.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            },
            None => (after.get(..4).unwrap_or(""), 4),
        };
        match u32::from_str_radix(digits, 16).ok().and_then(char::from_u32) {
            Some(c) if !digits.is_empty() => {
                out.push(c);
                rest = &after[consumed..];
            }
            _ => {
                out.push_str("\\u");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fix, lint};
    use layout_lint_core::Violation;

    fn check_code(code: &str) -> Vec<Violation> {
        lint(PropertyShorthand::new(), code)
    }

    #[test]
    fn test_decodes_unicode_escapes() {
        assert_eq!(decode_identifier("foo"), "foo");
        assert_eq!(decode_identifier("f\\u006fo"), "foo");
        assert_eq!(decode_identifier("\\u{66}oo"), "foo");
        assert_eq!(decode_identifier("a\\uZZ"), "a\\uZZ");
    }

    #[test]
    fn test_accepts_non_equivalent_properties() {
        let valid = [
            "const obj = { foo };",
            "const obj = { foo() {} };",
            "const obj = { foo: bar };",
            "const obj = { [foo]: foo };",
            "const obj = { \"foo\": foo };",
            "const obj = { foo: (foo) };",
            "const obj = { foo: /* comment */ foo };",
            "const obj = { foo /* comment */ : foo };",
            "const obj = { __proto__: __proto__ };",
            "const obj = { this: this };",
            "const { foo: foo } = obj;",
        ];
        for code in valid {
            let violations = check_code(code);
            assert!(violations.is_empty(), "{code:?}: {violations:?}");
        }
    }

    #[test]
    fn test_replaces_property_with_its_key() {
        let violations = check_code("const obj = { foo: foo };");
        assert_eq!(violations.len(), 1);
        insta::assert_snapshot!(violations[0].message, @"Expected shorthand for property foo.");
        let loc = &violations[0].location;
        assert_eq!((loc.line, loc.column, loc.end_line, loc.end_column), (1, 15, 1, 23));
        assert_eq!(
            fix(PropertyShorthand::new(), "const obj = { foo: foo };"),
            "const obj = { foo };"
        );
    }

    #[test]
    fn test_keeps_escaped_key_text() {
        let code = "const obj = { f\\u006fo: fo\\u006f };";
        let violations = check_code(code);
        assert_eq!(violations[0].message, "Expected shorthand for property foo.");
        assert_eq!(violations[0].location.end_column, 33);
        assert_eq!(fix(PropertyShorthand::new(), code), "const obj = { f\\u006fo };");
    }
}
