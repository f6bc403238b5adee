use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One level of the visibility hierarchy a configuration can be restricted to.
///
/// Evaluation always walks [`Scope::ALL`], so adding a level here extends the
/// model without touching the availability algorithm.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Site,
    Project,
    User,
}

impl Scope {
    /// Every defined scope level, in evaluation order.
    pub const ALL: [Scope; 3] = [Scope::Site, Scope::Project, Scope::User];
}

/// Per-level allow rule attached to a scoped configuration object.
///
/// `enabled == true` makes the configuration visible to every identity at
/// this level. Otherwise visibility is restricted to the ids in the
/// allow-set. An allow-set that is empty while `enabled` is false hides the
/// configuration from everyone at this level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRule {
    pub scope: Scope,
    pub enabled: bool,
    #[serde(default)]
    pub ids: BTreeSet<String>,
}

impl ScopeRule {
    /// Rule making a configuration visible to every identity at `scope`.
    pub fn enabled_for_all(scope: Scope) -> Self {
        Self {
            scope,
            enabled: true,
            ids: BTreeSet::new(),
        }
    }

    /// Rule restricting visibility at `scope` to the given identifiers.
    pub fn restricted_to<I, S>(scope: Scope, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scope,
            enabled: false,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this single rule admits the given identifier.
    ///
    /// A context with no identifier at this level passes only when the rule
    /// is enabled for all ids.
    pub fn permits(&self, id: Option<&str>) -> bool {
        if self.enabled {
            return true;
        }
        id.is_some_and(|id| self.ids.contains(id))
    }
}

/// Sparse mapping from scope level to the rule governing it. A level with no
/// entry imposes no restriction.
pub type ScopeRules = BTreeMap<Scope, ScopeRule>;

/// The "visible everywhere" default applied by the administrative layer when
/// a new configuration is created without explicit rules.
pub fn default_scope_rules() -> ScopeRules {
    Scope::ALL
        .iter()
        .map(|scope| (*scope, ScopeRule::enabled_for_all(*scope)))
        .collect()
}

/// The identity tuple a resolution request is evaluated against. Built once
/// per request and immutable thereafter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ExecutionContext {
    pub fn new(
        site: Option<String>,
        project: Option<String>,
        user: Option<String>,
    ) -> Self {
        Self {
            site,
            project,
            user,
        }
    }

    /// The context's identifier for the given scope level, if any.
    pub fn id_for(&self, scope: Scope) -> Option<&str> {
        match scope {
            Scope::Site => self.site.as_deref(),
            Scope::Project => self.project.as_deref(),
            Scope::User => self.user.as_deref(),
        }
    }
}

/// Whether a scoped configuration is visible under the given context.
///
/// Walks every defined scope level; a level present in `rules` must admit
/// the context's identifier for that level, a level with no entry is
/// skipped. The result is a short-circuiting conjunction, so an empty rule
/// mapping is vacuously available everywhere.
pub fn is_available(rules: &ScopeRules, context: &ExecutionContext) -> bool {
    Scope::ALL.iter().all(|scope| match rules.get(scope) {
        Some(rule) => rule.permits(context.id_for(*scope)),
        None => true,
    })
}
