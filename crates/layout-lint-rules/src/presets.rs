//! Rule presets for common configurations.

use crate::{
    BracketLayout, Indent, NiceSpaceBeforeFunctionParen, NoExtraNew, NoLeadingBinaryOperator,
    NoSpacesInCallExpression, NoSpacesInTaggedTemplate, PropertyColonSpacing, PropertyShorthand,
};
use layout_lint_core::{Config, RuleBox};
use std::str::FromStr;
use tracing::warn;

/// Preset configurations for layout-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Every rule, including the opinionated ones.
    Strict,
    /// Minimal rules for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }

    /// Returns the preset name as written in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            _ => Err(format!("Unknown preset: {s}")),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes the layout rules and `property-shorthand` (LL001-LL007).
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(BracketLayout::new()),
        Box::new(Indent::new()),
        Box::new(NiceSpaceBeforeFunctionParen::new()),
        Box::new(NoSpacesInCallExpression::new()),
        Box::new(NoSpacesInTaggedTemplate::new()),
        Box::new(PropertyColonSpacing::new()),
        Box::new(PropertyShorthand::new()),
    ]
}

/// Returns the strict set of rules.
///
/// Includes all recommended rules plus:
/// - `no-leading-binary-operator` (LL008)
/// - `no-extra-new` (LL009)
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    all_rules()
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes the spacing rules that never
/// move code across lines (LL004-LL006).
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![
        Box::new(NoSpacesInCallExpression::new()),
        Box::new(NoSpacesInTaggedTemplate::new()),
        Box::new(PropertyColonSpacing::new()),
    ]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    let mut rules = recommended_rules();
    rules.push(Box::new(NoLeadingBinaryOperator::new()));
    rules.push(Box::new(NoExtraNew::new()));
    rules
}

/// Looks up a rule by name or code, with default settings.
#[must_use]
pub fn rule_by_name(name: &str) -> Option<RuleBox> {
    all_rules()
        .into_iter()
        .find(|rule| rule.name() == name || rule.code().eq_ignore_ascii_case(name))
}

/// Builds the rules selected by a configuration.
///
/// Starts from the configured preset (default: recommended), adds rules that
/// are explicitly enabled under `[rules.<name>]`, and applies rule options.
/// Disabled rules and severity overrides are handled by the linter.
#[must_use]
pub fn rules_from_config(config: &Config) -> Vec<RuleBox> {
    let preset = config
        .preset
        .as_deref()
        .and_then(|name| {
            name.parse::<Preset>()
                .map_err(|e| warn!(error = %e, "Falling back to recommended preset"))
                .ok()
        })
        .unwrap_or(Preset::Recommended);

    let mut rules = preset.rules();
    for (name, rule_config) in &config.rules {
        if rule_config.enabled != Some(true) || rules.iter().any(|r| r.name() == name) {
            continue;
        }
        match rule_by_name(name) {
            Some(rule) => rules.push(rule),
            None => warn!(rule = %name, "Unknown rule in configuration"),
        }
    }

    rules
        .into_iter()
        .map(|rule| configure_rule(rule, config))
        .collect()
}

/// Applies the options configured under `[rules.<name>]` to a rule.
#[must_use]
pub fn configure_rule(rule: RuleBox, config: &Config) -> RuleBox {
    match (rule.name(), config.rule(rule.name())) {
        (crate::indent::NAME, Some(options)) => {
            Box::new(Indent::new().base_indent(options.get_int("base_indent", 0)))
        }
        _ => rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.code()).collect()
    }

    #[test]
    fn test_preset_rules() {
        assert_eq!(
            names(&Preset::Recommended.rules()),
            ["LL001", "LL002", "LL003", "LL004", "LL005", "LL006", "LL007"]
        );
        assert_eq!(Preset::Strict.rules().len(), 9);
        assert_eq!(
            names(&Preset::Minimal.rules()),
            ["LL004", "LL005", "LL006"]
        );
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Strict".parse::<Preset>(), Ok(Preset::Strict));
        assert!("loose".parse::<Preset>().is_err());
        assert_eq!(Preset::Minimal.as_str(), "minimal");
    }

    #[test]
    fn test_rule_by_name_accepts_codes() {
        assert_eq!(rule_by_name("indent").map(|r| r.code()), Some("LL002"));
        assert_eq!(rule_by_name("ll009").map(|r| r.name()), Some("no-extra-new"));
        assert!(rule_by_name("no-such-rule").is_none());
    }

    #[test]
    fn test_rules_from_config() {
        let config = Config::parse(
            "preset = \"minimal\"\n[rules.no-extra-new]\nenabled = true\n[rules.indent]\nbase_indent = 1\n",
        )
        .expect("valid config");
        let rules = rules_from_config(&config);
        assert_eq!(names(&rules), ["LL004", "LL005", "LL006", "LL009"]);

        let config = Config::parse("[rules.indent]\nbase_indent = 1\n").expect("valid config");
        let violations = layout_lint_core::Linter::new(rules_from_config(&config))
            .lint_text(std::path::Path::new("a.ts"), "foo();\n")
            .expect("valid source");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "indent");
    }
}
