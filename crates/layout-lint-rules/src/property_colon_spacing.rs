//! Rule to enforce consistent spacing around the colon of object literal properties.
//!
//! No space is allowed before the colon. After the colon, a single space is
//! expected, unless the values of several properties are aligned in a column:
//!
//! ```text
//! ({
//!     a:      'A',
//!     bb:     'B',
//!     ccc:    'C',
//! })
//! ```
//!
//! Only properties that start on the line of their value take part in the
//! alignment, and a property sharing a line with its neighbour never does.
//! Shifts are measured in grapheme clusters, so wide keys line up the way
//! they are displayed.
//!
//! # Suppression
//!
//! - `// layout-lint: allow(property-colon-spacing) reason="..."` comment

use layout_lint_core::utils::tokens::{byte_len_of_last_chars, is_colon_token};
use layout_lint_core::{
    Fix, FixKind, Node, NodeId, NodeKind, Report, Rule, RuleCategory, RuleContext,
    RuleListener, RuleMeta, Selector, Severity, SourceCode, SourceLocation, Token,
};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Rule code for property-colon-spacing.
pub const CODE: &str = "LL006";

/// Rule name for property-colon-spacing.
pub const NAME: &str = "property-colon-spacing";

static META: RuleMeta = RuleMeta {
    category: RuleCategory::Layout,
    description: "Enforce consistent spacing around the colon in object literal properties",
    fixable: Some(FixKind::Whitespace),
    options: &[],
    messages: &[
        (
            "extraSpaceAfterColon",
            "Extra space after colon of {{computed}}property '{{key}}'.",
        ),
        (
            "extraSpaceBeforeColon",
            "Extra space before colon of {{computed}}property '{{key}}'.",
        ),
        (
            "missingSpaceAfterColon",
            "Missing space after colon of {{computed}}property '{{key}}'.",
        ),
    ],
};

/// Enforces consistent spacing around the colon of object literal properties.
#[derive(Debug, Clone)]
pub struct PropertyColonSpacing {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for PropertyColonSpacing {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyColonSpacing {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for PropertyColonSpacing {
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
        Box::new(ColonSpacingListener { source })
    }
}

/// A `key: value` property with its colon.
struct KeyValue<'a> {
    pair: &'a Node,
    key: &'a Node,
    colon: &'a Token,
}

/// Column positions of aligned values, keyed by property.
#[derive(Default)]
struct ShiftMap {
    actual: HashMap<NodeId, usize>,
    expected: usize,
}

struct ColonSpacingListener<'a> {
    source: &'a SourceCode,
}

impl<'a> RuleListener<'a> for ColonSpacingListener<'a> {
    fn selectors(&self) -> Vec<Selector> {
        vec![Selector::enter(NodeKind::Object)]
    }

    fn visit(&mut self, _selector: Selector, node: &'a Node, cx: &mut RuleContext<'a>) {
        let properties: Vec<&'a Node> = self.source.children(node).collect();
        let overlapping = overlapping_properties(&properties);
        let pairs: Vec<KeyValue<'a>> = properties
            .iter()
            .filter(|p| p.kind == NodeKind::Pair)
            .filter_map(|p| self.key_value(p))
            .collect();
        let shifts = self.shift_map(&pairs, &overlapping);
        for kv in &pairs {
            self.verify_spacing(kv, &shifts, cx);
        }
    }
}

impl<'a> ColonSpacingListener<'a> {
    fn key_value(&self, pair: &'a Node) -> Option<KeyValue<'a>> {
        let source = self.source;
        let key = source.child_by_field(pair, "key")?;
        let value = source.child_by_field(pair, "value")?;
        let colon = source
            .tokens_in(key.range.end..value.range.start)
            .iter()
            .find(|t| is_colon_token(t))?;
        Some(KeyValue { pair, key, colon })
    }

    fn shift_map(&self, pairs: &[KeyValue<'_>], overlapping: &HashSet<NodeId>) -> ShiftMap {
        let source = self.source;
        let mut shifts = ShiftMap::default();
        let mut max_min_shift = 0;
        for kv in pairs {
            if overlapping.contains(&kv.pair.id) {
                continue;
            }
            let colon = kv.colon;
            let Some(after) = source.token_or_comment_after(colon.range.end) else {
                continue;
            };
            if kv.pair.loc.start.line != after.loc.start.line {
                continue;
            }
            let line_start = source.line_start(colon.loc.start.line);
            let colon_shift = source
                .slice(line_start..colon.range.end)
                .graphemes(true)
                .count();
            let space = source
                .slice(colon.range.end..after.range.start)
                .chars()
                .count();
            max_min_shift = max_min_shift.max(colon_shift + 1);
            shifts.actual.insert(kv.pair.id, colon_shift + space);
        }
        if shifts.actual.len() > 1 {
            shifts.expected = shifts
                .actual
                .values()
                .copied()
                .filter(|&shift| shift >= max_min_shift)
                .min()
                .unwrap_or(max_min_shift);
        } else {
            shifts.actual.clear();
        }
        shifts
    }

    fn verify_spacing(&self, kv: &KeyValue<'_>, shifts: &ShiftMap, cx: &mut RuleContext<'_>) {
        let source = self.source;
        let colon = kv.colon;
        let (Some(before), Some(after)) = (
            source.token_or_comment_before(colon.range.start),
            source.token_or_comment_after(colon.range.end),
        ) else {
            return;
        };

        let space_before = if before.loc.end.line == colon.loc.start.line {
            source
                .slice(before.range.end..colon.range.start)
                .chars()
                .count()
        } else {
            0
        };
        if space_before > 0 {
            let loc = SourceLocation::new(before.loc.end, colon.loc.start);
            let fix = Fix::remove(before.range.end..colon.range.start);
            cx.report(self.report(kv, "extraSpaceBeforeColon", loc).with_fix(fix));
        }

        if colon.loc.end.line != after.loc.start.line {
            return;
        }
        let gap = source.slice(colon.range.end..after.range.start);
        let missing = match shifts.actual.get(&kv.pair.id) {
            Some(&actual) => signed(shifts.expected) - signed(actual) + signed(space_before),
            None => 1 - signed(gap.chars().count()),
        };
        let loc = SourceLocation::new(colon.loc.end, after.loc.start);
        match missing.cmp(&0) {
            Ordering::Greater => {
                let spaces = " ".repeat(usize::try_from(missing).unwrap_or_default());
                let fix = Fix::insert_at(colon.range.end, spaces);
                cx.report(self.report(kv, "missingSpaceAfterColon", loc).with_fix(fix));
            }
            Ordering::Less => {
                let extra = usize::try_from(missing.unsigned_abs()).unwrap_or(usize::MAX);
                let len = byte_len_of_last_chars(gap, extra);
                let fix = Fix::remove(after.range.start - len..after.range.start);
                cx.report(self.report(kv, "extraSpaceAfterColon", loc).with_fix(fix));
            }
            Ordering::Equal => {}
        }
    }

    fn report(&self, kv: &KeyValue<'_>, message_id: &'static str, loc: SourceLocation) -> Report {
        let computed = kv.key.kind == NodeKind::ComputedPropertyName;
        Report::new(message_id, loc)
            .with_data("computed", if computed { "computed " } else { "" })
            .with_data("key", self.key_name(kv.key))
    }

    /// Renders a key the way it reads in a message.
    fn key_name(&self, key: &Node) -> String {
        let source = self.source;
        match key.kind {
            NodeKind::ComputedPropertyName => source
                .children(key)
                .next()
                .map_or_else(|| source.node_text(key), |inner| source.node_text(inner))
                .to_string(),
            NodeKind::Other("string") => {
                let text = source.node_text(key);
                text.get(1..text.len().saturating_sub(1))
                    .unwrap_or(text)
                    .to_string()
            }
            _ => source.node_text(key).to_string(),
        }
    }
}

/// Properties that share a line with the previous or next property.
fn overlapping_properties(properties: &[&Node]) -> HashSet<NodeId> {
    let mut overlapping = HashSet::new();
    for pair in properties.windows(2) {
        if pair[0].loc.end.line == pair[1].loc.start.line {
            overlapping.insert(pair[0].id);
            overlapping.insert(pair[1].id);
        }
    }
    overlapping
}

fn signed(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
