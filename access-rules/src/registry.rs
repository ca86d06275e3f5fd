//! In-memory rules registry
//!
//! Holds the current [`VersionedRules`] of every registered entity. Each
//! entity carries a revision that increments on every accepted update,
//! including wording fixes that keep the version. Updates are a
//! compare-and-swap on that revision, performed under the entity's shard
//! lock, so updates to one entity are serialized while different entities
//! proceed in parallel.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use access_core::{
    default_chat_rules, AccessError, EntityId, Level, Principal, Result, UpdatedRules,
    VersionedRules,
};

/// Stored state for one entity.
#[derive(Debug, Clone)]
struct RulesEntry {
    level: Level,
    rules: VersionedRules,
    revision: u64,
    updated_by: Option<Principal>,
    updated_at: DateTime<Utc>,
}

/// Point-in-time view of an entity's rules.
///
/// `revision` is the value to pass back as `expected_revision` when
/// proposing an update based on this view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesSnapshot {
    pub level: Level,
    pub rules: VersionedRules,
    pub revision: u64,
    pub updated_by: Option<Principal>,
    pub updated_at: DateTime<Utc>,
}

impl From<&RulesEntry> for RulesSnapshot {
    fn from(entry: &RulesEntry) -> Self {
        Self {
            level: entry.level,
            rules: entry.rules.clone(),
            revision: entry.revision,
            updated_by: entry.updated_by.clone(),
            updated_at: entry.updated_at,
        }
    }
}

/// Rules registry keyed by entity id.
#[derive(Debug, Default)]
pub struct RulesRegistry {
    entries: DashMap<EntityId, RulesEntry>,
}

impl RulesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entity_id: &EntityId) -> bool {
        self.entries.contains_key(entity_id)
    }

    /// Seed the default rules for a newly created entity.
    ///
    /// Fails with `EntityAlreadyRegistered` if the entity already has rules;
    /// existing rules are never reset.
    pub fn register(&self, entity_id: EntityId, level: Level) -> Result<VersionedRules> {
        match self.entries.entry(entity_id) {
            Entry::Occupied(occupied) => {
                Err(AccessError::EntityAlreadyRegistered(occupied.key().clone()))
            }
            Entry::Vacant(vacant) => {
                let rules = default_chat_rules(level);
                debug!(entity = %vacant.key(), level = %level, "Registered default rules");
                vacant.insert(RulesEntry {
                    level,
                    rules: rules.clone(),
                    revision: 0,
                    updated_by: None,
                    updated_at: Utc::now(),
                });
                Ok(rules)
            }
        }
    }

    /// Current rules of `entity_id`.
    pub fn current_rules(&self, entity_id: &EntityId) -> Result<VersionedRules> {
        self.entries
            .get(entity_id)
            .map(|entry| entry.rules.clone())
            .ok_or_else(|| AccessError::UnknownEntity(entity_id.clone()))
    }

    /// Current rules of `entity_id` with the revision and audit fields.
    pub fn snapshot(&self, entity_id: &EntityId) -> Result<RulesSnapshot> {
        self.entries
            .get(entity_id)
            .map(|entry| RulesSnapshot::from(entry.value()))
            .ok_or_else(|| AccessError::UnknownEntity(entity_id.clone()))
    }

    /// Apply `update` if the entity is still at `expected_revision`.
    ///
    /// On success the revision advances by one and the new rules are
    /// returned. If another update landed first, fails with
    /// `RulesVersionConflict` and leaves the stored rules untouched. A bump
    /// past the highest version fails with `RulesVersionExhausted`, also
    /// without touching the stored rules.
    pub fn propose_update(
        &self,
        entity_id: &EntityId,
        update: &UpdatedRules,
        expected_revision: u64,
        actor: &Principal,
    ) -> Result<VersionedRules> {
        let mut entry = self
            .entries
            .get_mut(entity_id)
            .ok_or_else(|| AccessError::UnknownEntity(entity_id.clone()))?;

        if entry.revision != expected_revision {
            warn!(
                entity = %entity_id,
                expected = expected_revision,
                actual = entry.revision,
                "Rules update lost compare-and-swap"
            );
            return Err(AccessError::RulesVersionConflict {
                expected: expected_revision,
                actual: entry.revision,
            });
        }

        let previous = entry.rules.version;
        let next = entry.rules.apply(update)?;

        entry.rules = next.clone();
        entry.revision += 1;
        entry.updated_by = Some(actor.clone());
        entry.updated_at = Utc::now();

        if next.version != previous {
            info!(
                entity = %entity_id,
                actor = %actor,
                from = previous,
                to = next.version,
                "Rules version bumped"
            );
        } else {
            debug!(entity = %entity_id, actor = %actor, version = next.version, "Rules edited");
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn update(text: &str, new_version: bool) -> UpdatedRules {
        UpdatedRules {
            text: text.to_string(),
            enabled: true,
            new_version,
        }
    }

    fn admin() -> Principal {
        Principal::new("admin")
    }

    #[test]
    fn test_register_seeds_defaults_once() {
        let registry = RulesRegistry::new();
        let id = EntityId::new("group-1");

        let rules = assert_ok!(registry.register(id.clone(), Level::Group));
        assert_eq!(rules, default_chat_rules(Level::Group));
        assert_eq!(registry.len(), 1);

        let err = assert_err!(registry.register(id.clone(), Level::Channel));
        assert_eq!(err, AccessError::EntityAlreadyRegistered(id.clone()));

        // The second call did not reset anything
        let snapshot = assert_ok!(registry.snapshot(&id));
        assert_eq!(snapshot.level, Level::Group);
        assert_eq!(snapshot.revision, 0);
        assert!(snapshot.updated_by.is_none());
    }

    #[test]
    fn test_unknown_entity() {
        let registry = RulesRegistry::new();
        let id = EntityId::new("missing");

        assert_eq!(
            registry.current_rules(&id),
            Err(AccessError::UnknownEntity(id.clone()))
        );
        assert_eq!(
            registry.propose_update(&id, &update("x", true), 0, &admin()),
            Err(AccessError::UnknownEntity(id))
        );
    }

    #[test]
    fn test_edit_keeps_version_but_advances_revision() {
        let registry = RulesRegistry::new();
        let id = EntityId::new("group-1");
        registry.register(id.clone(), Level::Group).unwrap();

        let rules = registry
            .propose_update(&id, &update("Be kind", false), 0, &admin())
            .unwrap();
        assert_eq!(rules.version, 0);
        assert_eq!(rules.text, "Be kind");

        let snapshot = registry.snapshot(&id).unwrap();
        assert_eq!(snapshot.revision, 1);
        assert_eq!(snapshot.updated_by, Some(admin()));

        // A stale writer that read revision 0 is rejected
        let err = registry
            .propose_update(&id, &update("Be nice", false), 0, &admin())
            .unwrap_err();
        assert_eq!(
            err,
            AccessError::RulesVersionConflict {
                expected: 0,
                actual: 1
            }
        );
        assert_eq!(registry.current_rules(&id).unwrap().text, "Be kind");
    }

    #[test]
    fn test_exhausted_version_leaves_entry_untouched() {
        let registry = RulesRegistry::new();
        let id = EntityId::new("group-max");
        registry.entries.insert(
            id.clone(),
            RulesEntry {
                level: Level::Group,
                rules: VersionedRules {
                    text: "final".into(),
                    enabled: true,
                    version: u32::MAX,
                },
                revision: 7,
                updated_by: None,
                updated_at: Utc::now(),
            },
        );

        let err = assert_err!(registry.propose_update(&id, &update("more", true), 7, &admin()));
        assert_eq!(err, AccessError::RulesVersionExhausted);

        let snapshot = assert_ok!(registry.snapshot(&id));
        assert_eq!(snapshot.revision, 7);
        assert_eq!(snapshot.rules.text, "final");
        assert_eq!(snapshot.rules.version, u32::MAX);
    }
}
