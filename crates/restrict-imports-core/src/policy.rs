//! Import policies.
//!
//! A [`Policy`] says: files whose normalized path matches `import_to` may
//! only import specifiers matching one of `can_import_from`, and never one
//! matching `cannot_import_from`. A [`PolicySet`] is the ordered, non-empty
//! list of policies for a project. Invariants are enforced at construction.

use serde::Serialize;

use crate::pattern::Pattern;

/// One folder's import policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    import_to: Pattern,
    #[serde(skip_serializing_if = "Option::is_none")]
    can_import_from: Option<Vec<Pattern>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cannot_import_from: Vec<Pattern>,
}

impl Policy {
    /// Creates a policy.
    ///
    /// `can_import_from = None` means the policy has no allow-list: every
    /// import is allowed unless the deny-list rejects it.
    ///
    /// # Errors
    ///
    /// Returns error if either list contains the same pattern twice.
    pub fn new(
        import_to: Pattern,
        can_import_from: Option<Vec<Pattern>>,
        cannot_import_from: Vec<Pattern>,
    ) -> Result<Self, ModelError> {
        if let Some(allow) = &can_import_from {
            check_unique(allow, "can_import_from")?;
        }
        check_unique(&cannot_import_from, "cannot_import_from")?;
        Ok(Self {
            import_to,
            can_import_from,
            cannot_import_from,
        })
    }

    /// Convenience constructor for an allow-list-only policy.
    ///
    /// # Errors
    ///
    /// Returns error if the allow-list contains duplicates.
    pub fn allow(import_to: Pattern, can_import_from: Vec<Pattern>) -> Result<Self, ModelError> {
        Self::new(import_to, Some(can_import_from), Vec::new())
    }

    /// The path pattern selecting which files this policy governs.
    #[must_use]
    pub fn import_to(&self) -> &Pattern {
        &self.import_to
    }

    /// The allow-list, if the policy has one.
    #[must_use]
    pub fn can_import_from(&self) -> Option<&[Pattern]> {
        self.can_import_from.as_deref()
    }

    /// The deny-list (possibly empty).
    #[must_use]
    pub fn cannot_import_from(&self) -> &[Pattern] {
        &self.cannot_import_from
    }

    /// Tests whether this policy governs `path`.
    #[must_use]
    pub fn applies_to(&self, path: &str) -> bool {
        self.import_to.matches(path)
    }
}

fn check_unique(patterns: &[Pattern], field: &'static str) -> Result<(), ModelError> {
    for (i, pattern) in patterns.iter().enumerate() {
        if patterns[..i].contains(pattern) {
            return Err(ModelError::DuplicatePattern {
                field,
                pattern: pattern.to_string(),
            });
        }
    }
    Ok(())
}

/// Ordered, non-empty collection of policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySet {
    policies: Vec<Policy>,
}

impl PolicySet {
    /// Creates a policy set.
    ///
    /// # Errors
    ///
    /// Returns error if `policies` is empty.
    pub fn new(policies: Vec<Policy>) -> Result<Self, ModelError> {
        if policies.is_empty() {
            return Err(ModelError::NoPolicies);
        }
        Ok(Self { policies })
    }

    /// Iterates policies in configuration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Policy> {
        self.policies.iter()
    }

    /// Number of policies (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl<'a> IntoIterator for &'a PolicySet {
    type Item = &'a Policy;
    type IntoIter = std::slice::Iter<'a, Policy>;

    fn into_iter(self) -> Self::IntoIter {
        self.policies.iter()
    }
}

/// Policy model validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// No policies were configured.
    #[error("at least one policy is required")]
    NoPolicies,

    /// A pattern list contains the same pattern twice.
    #[error("{field}: duplicate pattern `{pattern}`")]
    DuplicatePattern {
        /// Which list the duplicate is in.
        field: &'static str,
        /// The repeated pattern.
        pattern: String,
    },
}
