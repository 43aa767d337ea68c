//! Rewrite table
//!
//! An ordered list of (fragment, target) pairs. Each fragment is an old-style
//! relative reference that may appear inside a quoted import string; each
//! target is the canonical package path that replaces the whole quoted literal.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Built-in table of legacy fragments and their canonical package paths.
///
/// Order matters: rules are applied sequentially and each rule sees the
/// output of the previous one.
pub const BUILTIN_TABLE: &[(&str, &str)] = &[
    (
        "models/achievement_model.dart",
        "package:recalim/features/achievements/domain/entities/achievement_model.dart",
    ),
    (
        "models/community_comment_model.dart",
        "package:recalim/features/community/domain/entities/community_comment_model.dart",
    ),
    (
        "models/community_post_model.dart",
        "package:recalim/features/community/domain/entities/community_post_model.dart",
    ),
    (
        "models/habit_model.dart",
        "package:recalim/features/tasks/domain/entities/habit_model.dart",
    ),
    (
        "models/milestone_model.dart",
        "package:recalim/features/milestone/domain/entities/milestone_model.dart",
    ),
    (
        "models/preset_task_model.dart",
        "package:recalim/features/tasks/domain/entities/preset_task_model.dart",
    ),
    (
        "models/progress_model.dart",
        "package:recalim/features/progress/domain/entities/progress_model.dart",
    ),
    (
        "models/project_model.dart",
        "package:recalim/features/projects/domain/entities/project_model.dart",
    ),
    (
        "models/user_model.dart",
        "package:recalim/core/models/user_model.dart",
    ),
    (
        "models/user_stats_model.dart",
        "package:recalim/core/models/user_stats_model.dart",
    ),
    (
        "models/workout_model.dart",
        "package:recalim/features/workouts/domain/entities/workout_model.dart",
    ),
    // Providers
    (
        "providers/language_provider.dart",
        "package:recalim/core/providers/language_provider.dart",
    ),
    (
        "providers/language_helper.dart",
        "package:recalim/core/providers/language_helper.dart",
    ),
    // Widgets
    (
        "widgets/custom_button.dart",
        "package:recalim/core/widgets/custom_button.dart",
    ),
    (
        "widgets/progress_ring.dart",
        "package:recalim/core/widgets/progress_ring.dart",
    ),
    (
        "widgets/habit_card.dart",
        "package:recalim/features/tasks/presentation/widgets/habit_card.dart",
    ),
    (
        "widgets/proof_input_box.dart",
        "package:recalim/features/tasks/presentation/widgets/proof_input_box.dart",
    ),
    (
        "widgets/reflection_card.dart",
        "package:recalim/features/reflection/presentation/widgets/reflection_card.dart",
    ),
    // Routes
    (
        "routes/app_routes.dart",
        "package:recalim/core/routes/app_routes.dart",
    ),
];

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Rule #{index} has an empty `{field}`")]
    EmptyField { index: usize, field: &'static str },
    #[error("Failed to compile rule pattern: {0}")]
    PatternError(#[from] regex::Error),
    #[error("Failed to read rules file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML rules: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Failed to parse YAML rules: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Unsupported rules file format: {0} (expected .toml, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
}

/// Where a fragment is allowed to match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchScope {
    /// Any single-line quoted string literal
    #[default]
    Anywhere,
    /// Only the string operand of an `import`, `export` or `part` directive
    ImportsOnly,
}

/// A single (fragment, target) mapping entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    /// Old-style path fragment, e.g. `models/habit_model.dart`
    pub fragment: String,
    /// Canonical path, without quotes
    pub target: String,
}

impl RewriteRule {
    pub fn new(fragment: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            target: target.into(),
        }
    }

    /// The literal that replaces a matched span, quotes included
    pub fn replacement(&self) -> String {
        format!("'{}'", self.target)
    }
}

/// The built-in table as owned rules, in table order
pub fn builtin_rules() -> Vec<RewriteRule> {
    BUILTIN_TABLE
        .iter()
        .map(|(fragment, target)| RewriteRule::new(*fragment, *target))
        .collect()
}

/// On-disk rules file, shared by the TOML and YAML loaders
#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default, rename = "rule")]
    rules: Vec<RewriteRule>,
}

/// A rule with its compiled matcher
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: RewriteRule,
    replacement: String,
    regex: Regex,
}

impl CompiledRule {
    fn compile(rule: RewriteRule, scope: MatchScope) -> Result<Self, RuleError> {
        let fragment = regex::escape(&rule.fragment);
        // One literal on one line, closed by the same quote that opened it.
        let literal = format!(r#"'[^'\n]*{fragment}'|"[^"\n]*{fragment}""#);
        let pattern = match scope {
            MatchScope::Anywhere => literal,
            MatchScope::ImportsOnly => format!(
                r"(?m)^(?P<lead>[ \t]*(?:import|export|part)[ \t]+)(?:{literal})"
            ),
        };

        Ok(Self {
            replacement: rule.replacement(),
            regex: Regex::new(&pattern)?,
            rule,
        })
    }

    /// Replace every non-overlapping match, returning the new text (if any
    /// match changed) and the number of matches that changed.
    ///
    /// A literal that already equals the replacement is not counted.
    fn replace_all(&self, content: &str) -> (Option<String>, usize) {
        let mut count = 0;
        let replaced = self.regex.replace_all(content, |caps: &Captures| {
            let lead = caps.name("lead").map_or("", |m| m.as_str());
            if caps[0][lead.len()..] != self.replacement {
                count += 1;
            }
            format!("{}{}", lead, self.replacement)
        });

        if count == 0 {
            (None, 0)
        } else {
            (Some(replaced.into_owned()), count)
        }
    }
}

/// How many times one rule matched during a single [`RuleSet::apply`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub fragment: String,
    pub count: usize,
}

/// Result of applying a rule set to one text
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub content: String,
    pub applied: Vec<AppliedRule>,
}

impl Rewrite {
    pub fn total_replacements(&self) -> usize {
        self.applied.iter().map(|a| a.count).sum()
    }
}

/// Ordered, immutable collection of compiled rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    scope: MatchScope,
}

impl RuleSet {
    /// Compile the built-in table
    pub fn builtin(scope: MatchScope) -> Result<Self, RuleError> {
        Self::from_rules(builtin_rules(), scope)
    }

    /// Compile an arbitrary list of rules, preserving their order
    pub fn from_rules(rules: Vec<RewriteRule>, scope: MatchScope) -> Result<Self, RuleError> {
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| {
                if rule.fragment.is_empty() {
                    return Err(RuleError::EmptyField {
                        index,
                        field: "fragment",
                    });
                }
                if rule.target.is_empty() {
                    return Err(RuleError::EmptyField {
                        index,
                        field: "target",
                    });
                }
                CompiledRule::compile(rule, scope)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules, scope })
    }

    /// Load rules from a `.toml`, `.yaml` or `.yml` file
    pub fn load(path: &Path, scope: MatchScope) -> Result<Self, RuleError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let content = fs::read_to_string(path).map_err(|source| RuleError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        let file: RulesFile = match extension.as_str() {
            "toml" => toml::from_str(&content)?,
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            _ => return Err(RuleError::UnsupportedFormat(path.to_path_buf())),
        };

        Self::from_rules(file.rules, scope)
    }

    pub fn scope(&self) -> MatchScope {
        self.scope
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RewriteRule> {
        self.rules.iter().map(|compiled| &compiled.rule)
    }

    /// Apply every rule in order; each rule's output is the next rule's input
    pub fn apply(&self, content: &str) -> Rewrite {
        let mut current = content.to_string();
        let mut applied = Vec::new();

        for compiled in &self.rules {
            let (next, count) = compiled.replace_all(&current);
            if let Some(next) = next {
                current = next;
                applied.push(AppliedRule {
                    fragment: compiled.rule.fragment.clone(),
                    count,
                });
            }
        }

        Rewrite {
            content: current,
            applied,
        }
    }
}
