//! Membership rules and their version transitions.
//!
//! A rules record moves from `(version = v, text = t0)` to either
//! `(v, t1)` for a wording fix or `(v + 1, t1)` for a substantive change.
//! There is no terminal state and no rollback; a revert is another update.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AccessError, Result};

/// Kind of governed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Group,
    Channel,
    Community,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Channel => "channel",
            Self::Community => "community",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rules as stored for an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedRules {
    pub text: String,
    pub enabled: bool,
    pub version: u32,
}

/// An edit submitted by an admin.
///
/// `new_version` declares whether members must accept the rules again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedRules {
    pub text: String,
    pub enabled: bool,
    pub new_version: bool,
}

impl VersionedRules {
    /// Next state after applying `update`.
    ///
    /// Fails with `RulesVersionExhausted` when a bump is requested at
    /// `u32::MAX`; the version never wraps or stalls.
    pub fn apply(&self, update: &UpdatedRules) -> Result<VersionedRules> {
        let version = if update.new_version {
            self.version
                .checked_add(1)
                .ok_or(AccessError::RulesVersionExhausted)?
        } else {
            self.version
        };

        Ok(VersionedRules {
            text: update.text.clone(),
            enabled: update.enabled,
            version,
        })
    }
}

/// Rules seeded when an entity of `level` is created.
///
/// Channels start empty because they inherit their community's rules.
pub fn default_chat_rules(level: Level) -> VersionedRules {
    let text = match level {
        Level::Channel => String::new(),
        Level::Group => conduct_policy("group"),
        Level::Community => conduct_policy("channel"),
    };

    VersionedRules {
        text,
        enabled: false,
        version: 0,
    }
}

fn conduct_policy(scope: &str) -> String {
    format!(
        "- Do not impersonate others in a deceptive or misleading manner\n\
         - Do not intentionally share false or misleading information\n\
         - Keep messages relevant to the {scope}\n\
         \n\
         If you break the rules you might be blocked and/or have your message(s) deleted."
    )
}

/// Whether a principal who accepted `accepted_version` (if any) must accept
/// `rules` before being admitted.
///
/// Acceptance is tied to a version; any bump invalidates it. Disabled rules
/// are never enforced.
pub fn requires_rules_acceptance(rules: &VersionedRules, accepted_version: Option<u32>) -> bool {
    rules.enabled && accepted_version != Some(rules.version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_per_level() {
        let channel = default_chat_rules(Level::Channel);
        assert_eq!(channel.text, "");

        for level in [Level::Group, Level::Community] {
            let rules = default_chat_rules(level);
            assert!(!rules.text.is_empty());
            assert!(!rules.enabled);
            assert_eq!(rules.version, 0);
        }

        assert!(!channel.enabled);
        assert_eq!(channel.version, 0);
    }

    #[test]
    fn test_default_rules_scope_wording() {
        assert!(default_chat_rules(Level::Group)
            .text
            .contains("relevant to the group"));
        assert!(default_chat_rules(Level::Community)
            .text
            .contains("relevant to the channel"));
    }

    #[test]
    fn test_substantive_update_bumps_version() {
        let current = VersionedRules {
            text: "old".into(),
            enabled: true,
            version: 3,
        };
        let next = current
            .apply(&UpdatedRules {
                text: "new".into(),
                enabled: true,
                new_version: true,
            })
            .unwrap();
        assert_eq!(next.version, 4);
        assert_eq!(next.text, "new");
    }

    #[test]
    fn test_cosmetic_update_keeps_version() {
        let current = VersionedRules {
            text: "typo".into(),
            enabled: true,
            version: 3,
        };
        let next = current
            .apply(&UpdatedRules {
                text: "fixed".into(),
                enabled: false,
                new_version: false,
            })
            .unwrap();
        assert_eq!(next.version, 3);
        assert_eq!(next.text, "fixed");
        assert!(!next.enabled);
    }

    #[test]
    fn test_bump_past_max_version_is_rejected() {
        let current = VersionedRules {
            text: "last".into(),
            enabled: true,
            version: u32::MAX,
        };
        let bump = UpdatedRules {
            text: "one more".into(),
            enabled: true,
            new_version: true,
        };
        assert_eq!(current.apply(&bump), Err(AccessError::RulesVersionExhausted));

        // Wording fixes are still possible at the ceiling
        let edit = UpdatedRules {
            new_version: false,
            ..bump
        };
        assert_eq!(current.apply(&edit).unwrap().version, u32::MAX);
    }

    #[test]
    fn test_acceptance_tied_to_version() {
        let rules = VersionedRules {
            text: "be kind".into(),
            enabled: true,
            version: 2,
        };
        assert!(requires_rules_acceptance(&rules, None));
        assert!(requires_rules_acceptance(&rules, Some(1)));
        assert!(!requires_rules_acceptance(&rules, Some(2)));

        let disabled = VersionedRules {
            enabled: false,
            ..rules
        };
        assert!(!requires_rules_acceptance(&disabled, None));
    }

    #[test]
    fn test_updated_rules_field_names() {
        let update: UpdatedRules =
            serde_json::from_str(r#"{"text":"t","enabled":true,"newVersion":true}"#).unwrap();
        assert!(update.new_version);
    }
}
