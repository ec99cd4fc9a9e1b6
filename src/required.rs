//! Required-property computation.

use crate::assembler::PropertyGroup;
use crate::types::{kinds, RuleRecord};

/// Policy deciding which properties end up in `required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequiredPolicy {
    /// Required unless marked `isOptional`.
    #[default]
    Loose,
    /// Required only when marked `isDefined`.
    Strict,
}

impl RequiredPolicy {
    /// Strict when `skipMissingProperties` is enabled.
    pub fn from_skip_missing_properties(skip: bool) -> Self {
        if skip {
            RequiredPolicy::Strict
        } else {
            RequiredPolicy::Loose
        }
    }

    /// Whether a property with these rules is required.
    pub fn is_required(&self, records: &[&RuleRecord]) -> bool {
        match self {
            RequiredPolicy::Loose => !has_kind(records, kinds::IS_OPTIONAL),
            RequiredPolicy::Strict => has_kind(records, kinds::IS_DEFINED),
        }
    }
}

/// Names of required properties, in first-seen order.
pub fn required_properties(properties: &[PropertyGroup<'_>], policy: RequiredPolicy) -> Vec<String> {
    properties
        .iter()
        .filter(|group| policy.is_required(&group.records))
        .map(|group| group.name.to_string())
        .collect()
}

fn has_kind(records: &[&RuleRecord], kind: &str) -> bool {
    records.iter().any(|r| r.rule_kind == kind)
}
