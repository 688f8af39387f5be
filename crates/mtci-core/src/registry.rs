//! Closed registry resolving relation locators to fresh instances.
//!
//! Locators in config are either a canonical name (`whitespace_invariance`) or
//! a dotted path alias (`mtci.mrs.whitespace.WhitespaceInvarianceMR`). The
//! `module:Class` spelling is accepted and normalised to `module.Class`.

use crate::errors::ResolveError;
use crate::relation_api::MetamorphicRelation;
use std::collections::BTreeMap;
use std::sync::Arc;

pub type RelationFactory = Box<dyn Fn() -> Arc<dyn MetamorphicRelation> + Send + Sync>;

/// Normalise `module:Class` to `module.Class`.
pub fn normalize_locator(locator: &str) -> String {
    locator.trim().replace(':', ".")
}

struct Entry {
    aliases: Vec<String>,
    factory: RelationFactory,
}

/// Listing entry for `mtci mrs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub requires_endpoint: bool,
}

#[derive(Default)]
pub struct MrRegistry {
    entries: BTreeMap<String, Entry>,
    aliases: BTreeMap<String, String>,
}

impl MrRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name` plus any locator aliases.
    /// Re-registering a name replaces the earlier factory.
    pub fn register<F>(&mut self, name: &str, aliases: &[&str], factory: F)
    where
        F: Fn() -> Arc<dyn MetamorphicRelation> + Send + Sync + 'static,
    {
        let aliases: Vec<String> = aliases.iter().map(|a| normalize_locator(a)).collect();
        for alias in &aliases {
            self.aliases.insert(alias.clone(), name.to_string());
        }
        self.entries.insert(
            name.to_string(),
            Entry {
                aliases,
                factory: Box::new(factory),
            },
        );
    }

    pub fn contains(&self, locator: &str) -> bool {
        self.canonical(locator).is_some()
    }

    fn canonical(&self, locator: &str) -> Option<&str> {
        let key = normalize_locator(locator);
        if let Some((name, _)) = self.entries.get_key_value(&key) {
            return Some(name.as_str());
        }
        self.aliases.get(&key).map(String::as_str)
    }

    /// Build a fresh instance for `locator`.
    pub fn resolve(&self, locator: &str) -> Result<Arc<dyn MetamorphicRelation>, ResolveError> {
        let entry = self
            .canonical(locator)
            .and_then(|name| self.entries.get(name))
            .ok_or_else(|| ResolveError::UnknownRelation {
                locator: locator.to_string(),
            })?;
        Ok((entry.factory)())
    }

    /// Resolve every locator, failing on the first unknown one.
    pub fn resolve_all(
        &self,
        locators: &[String],
    ) -> Result<Vec<Arc<dyn MetamorphicRelation>>, ResolveError> {
        locators.iter().map(|l| self.resolve(l)).collect()
    }

    pub fn list(&self) -> Vec<RelationInfo> {
        self.entries
            .iter()
            .map(|(name, entry)| {
                let sample = (entry.factory)();
                RelationInfo {
                    name: name.clone(),
                    aliases: entry.aliases.clone(),
                    description: sample.description().to_string(),
                    requires_endpoint: sample.requires_endpoint(),
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for MrRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MrRegistry")
            .field("relations", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ModelError;
    use crate::providers::model::Model;
    use crate::relation_api::MrResult;
    use crate::tolerance::Tolerance;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct Counting {
        calls: AtomicU32,
    }

    #[async_trait]
    impl MetamorphicRelation for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn description(&self) -> &'static str {
            "counts calls"
        }

        async fn run(
            &self,
            _model: &dyn Model,
            _inputs: &[String],
            _max_examples: usize,
            _tolerance: &Tolerance,
        ) -> Result<MrResult, ModelError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(MrResult::pass(n.to_string()))
        }
    }

    fn registry() -> MrRegistry {
        let mut r = MrRegistry::new();
        r.register("counting", &["pkg.mod.CountingMR"], || {
            Arc::new(Counting::default())
        });
        r
    }

    #[test]
    fn test_resolve_name_alias_and_colon_form() {
        let r = registry();
        for locator in ["counting", "pkg.mod.CountingMR", "pkg.mod:CountingMR", " counting "] {
            assert_eq!(r.resolve(locator).unwrap().name(), "counting");
        }
    }

    #[test]
    fn test_unknown_locator() {
        let r = registry();
        let err = r.resolve("pkg.mod.Missing").err().unwrap();
        assert_eq!(
            err,
            ResolveError::UnknownRelation {
                locator: "pkg.mod.Missing".into()
            }
        );
        assert!(r
            .resolve_all(&["counting".into(), "nope".into()])
            .is_err());
    }

    #[tokio::test]
    async fn test_each_resolve_is_fresh() {
        let r = registry();
        let model = crate::providers::model::FakeModel::default();
        let a = r.resolve("counting").unwrap();
        let first = a.run(&model, &[], 1, &Tolerance::default()).await.unwrap();
        let second = a.run(&model, &[], 1, &Tolerance::default()).await.unwrap();
        assert_eq!((first.message.as_str(), second.message.as_str()), ("0", "1"));

        let b = r.resolve("counting").unwrap();
        let fresh = b.run(&model, &[], 1, &Tolerance::default()).await.unwrap();
        assert_eq!(fresh.message, "0");
    }

    #[test]
    fn test_list() {
        let infos = registry().list();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].aliases, vec!["pkg.mod.CountingMR".to_string()]);
        assert_eq!(infos[0].description, "counts calls");
        assert!(!infos[0].requires_endpoint);
    }
}
