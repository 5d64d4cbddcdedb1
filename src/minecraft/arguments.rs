use std::collections::HashMap;

use crate::json::descriptor::{Action, Element, Rule, Value};
use crate::minecraft::options::LaunchOptions;
use crate::minecraft::{TARGET_ARCH, TARGET_OS};

/// Replaces every known `${...}` placeholder in one token. Unknown
/// placeholders stay verbatim.
pub(crate) fn substitute(variables: &HashMap<&'static str, String>, token: &str) -> String {
    variables
        .iter()
        .fold(token.to_string(), |token, (key, value)| {
            token.replace(key, value)
        })
}

/// Evaluates a rule list: an entry is included iff the last matching
/// rule allows it. No rules means included.
pub(crate) fn rules_allow(rules: Option<&[Rule]>, options: &LaunchOptions) -> bool {
    let Some(rules) = rules else {
        return true;
    };
    if rules.is_empty() {
        return true;
    }

    let mut allowed = false;
    for rule in rules {
        if rule_matches(rule, options) {
            allowed = rule.action == Action::Allow;
        }
    }
    allowed
}

fn rule_matches(rule: &Rule, options: &LaunchOptions) -> bool {
    if let Some(os) = &rule.os {
        if let Some(name) = &os.name {
            if name != TARGET_OS {
                return false;
            }
        }
        if let Some(arch) = &os.arch {
            if arch != TARGET_ARCH {
                return false;
            }
        }
    }
    if let Some(features) = &rule.features {
        for (feature, expected) in features {
            if feature_enabled(feature, options) != *expected {
                return false;
            }
        }
    }
    true
}

/// Feature flags the options record can assert. Features this layer does
/// not model (quick play and friends) are never enabled.
fn feature_enabled(feature: &str, options: &LaunchOptions) -> bool {
    match feature {
        "is_demo_user" => options.demo,
        "has_custom_resolution" => options.custom_resolution,
        _ => false,
    }
}

/// Expands a structured argument template into `out`, applying rule
/// filtering and placeholder substitution to every emitted token.
pub(crate) fn expand(
    elements: &[Element],
    variables: &HashMap<&'static str, String>,
    options: &LaunchOptions,
    out: &mut Vec<String>,
) {
    for element in elements {
        match element {
            Element::String(token) => out.push(substitute(variables, token)),
            Element::Conditional(conditional) => {
                if !rules_allow(Some(conditional.rules.as_slice()), options) {
                    continue;
                }
                match &conditional.value {
                    Value::Single(token) => out.push(substitute(variables, token)),
                    Value::Multiple(tokens) => {
                        out.extend(tokens.iter().map(|token| substitute(variables, token)));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::descriptor::{Conditional, OsRule};

    fn vars(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn unknown_placeholders_stay_verbatim() {
        let variables = vars(&[("${known}", "value")]);
        assert_eq!(
            substitute(&variables, "--opt=${known}/${unknown}"),
            "--opt=value/${unknown}"
        );
    }

    #[test]
    fn empty_rule_list_allows() {
        let options = LaunchOptions::default();
        assert!(rules_allow(None, &options));
        assert!(rules_allow(Some(&[]), &options));
    }

    #[test]
    fn feature_rule_follows_options() {
        let rule = Rule {
            action: Action::Allow,
            os: None,
            features: Some([("is_demo_user".to_string(), true)].into_iter().collect()),
        };
        let mut options = LaunchOptions::default();
        assert!(!rules_allow(Some(std::slice::from_ref(&rule)), &options));
        options.demo = true;
        assert!(rules_allow(Some(std::slice::from_ref(&rule)), &options));
    }

    #[test]
    fn disallow_for_other_os_keeps_entry() {
        let other_os = if TARGET_OS == "osx" { "linux" } else { "osx" };
        let rules = vec![
            Rule {
                action: Action::Allow,
                os: None,
                features: None,
            },
            Rule {
                action: Action::Disallow,
                os: Some(OsRule {
                    name: Some(other_os.to_string()),
                    arch: None,
                }),
                features: None,
            },
        ];
        assert!(rules_allow(Some(rules.as_slice()), &LaunchOptions::default()));
    }

    #[test]
    fn expand_filters_and_substitutes() {
        let elements = vec![
            Element::String("--width=${width}".to_string()),
            Element::Conditional(Conditional {
                rules: vec![Rule {
                    action: Action::Allow,
                    os: None,
                    features: Some(
                        [("has_custom_resolution".to_string(), true)]
                            .into_iter()
                            .collect(),
                    ),
                }],
                value: Value::Multiple(vec!["--height".to_string(), "${height}".to_string()]),
            }),
        ];
        let variables = vars(&[("${width}", "854"), ("${height}", "480")]);

        let mut out = Vec::new();
        expand(&elements, &variables, &LaunchOptions::default(), &mut out);
        assert_eq!(out, vec!["--width=854"]);

        let options = LaunchOptions {
            custom_resolution: true,
            ..LaunchOptions::default()
        };
        let mut out = Vec::new();
        expand(&elements, &variables, &options, &mut out);
        assert_eq!(out, vec!["--width=854", "--height", "480"]);
    }
}
