//! Versioned membership rules
//!
//! [`RulesRegistry`] keeps the current rules of every group, channel and
//! community. Admin edits go through [`RulesRegistry::propose_update`], which
//! either keeps the version (wording fix) or bumps it (members must accept
//! again). Versions only move forward.

pub mod registry;

pub use registry::{RulesRegistry, RulesSnapshot};
