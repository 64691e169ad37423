//! PatternLibrary: per-language SPT lookup with a node-kind dispatch index.

use codemark_core::errors::ConfigError;
use codemark_core::FxHashMap;
use smallvec::SmallVec;

use crate::parsers::{Language, NodeKind};

use super::types::SptDefinition;
use super::{java, python};

/// The SPT catalog for one language.
#[derive(Debug)]
pub struct PatternLibrary {
    language: Language,
    definitions: &'static [SptDefinition],
    index: FxHashMap<&'static str, usize>,
    by_kind: FxHashMap<NodeKind, SmallVec<[usize; 4]>>,
}

impl PatternLibrary {
    pub fn for_language(language: Language) -> Self {
        let definitions = match language {
            Language::Python => python::PYTHON_SPTS,
            Language::Java => java::JAVA_SPTS,
        };

        let mut index = FxHashMap::default();
        let mut by_kind: FxHashMap<NodeKind, SmallVec<[usize; 4]>> = FxHashMap::default();
        for (i, def) in definitions.iter().enumerate() {
            index.insert(def.id, i);
            for kind in def.node_kinds {
                by_kind.entry(*kind).or_default().push(i);
            }
        }

        Self {
            language,
            definitions,
            index,
            by_kind,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// All definitions in catalog order.
    pub fn definitions(&self) -> &'static [SptDefinition] {
        self.definitions
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions.iter().map(|d| d.id)
    }

    pub fn get(&self, id: &str) -> Option<&'static SptDefinition> {
        let definitions = self.definitions;
        self.index.get(id).map(|&i| &definitions[i])
    }

    /// Catalog index of `id`.
    pub fn slot(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Like [`get`](Self::get) but reports unknown ids as a config error.
    pub fn lookup(&self, id: &str) -> Result<&'static SptDefinition, ConfigError> {
        self.get(id).ok_or_else(|| ConfigError::UnknownSpt {
            language: self.language.name().to_string(),
            id: id.to_string(),
        })
    }

    /// Catalog indices of definitions dispatched on `kind`.
    pub fn definitions_for_kind(&self, kind: NodeKind) -> &[usize] {
        self.by_kind.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Default backdoor specs for this language.
    pub fn default_backdoors(&self) -> Vec<Vec<String>> {
        let raw = match self.language {
            Language::Python => python::DEFAULT_BACKDOORS,
            Language::Java => java::DEFAULT_BACKDOORS,
        };
        raw.iter()
            .map(|spec| spec.iter().map(|id| id.to_string()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique_and_resolvable() {
        for language in Language::all() {
            let library = PatternLibrary::for_language(*language);
            let ids: Vec<_> = library.ids().collect();
            let mut deduped = ids.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(ids.len(), deduped.len());
            for id in ids {
                assert_eq!(library.lookup(id).unwrap().id, id);
            }
        }
    }

    #[test]
    fn every_definition_has_source_and_trigger() {
        for language in Language::all() {
            for def in PatternLibrary::for_language(*language).definitions() {
                assert!(def.variants.len() >= 2, "{} lacks a trigger form", def.id);
                assert_eq!(def.language, *language);
            }
        }
    }

    #[test]
    fn defaults_reference_catalog_ids() {
        for language in Language::all() {
            let library = PatternLibrary::for_language(*language);
            for spec in library.default_backdoors() {
                for id in spec {
                    assert!(library.get(&id).is_some(), "{id}");
                }
            }
        }
    }

    #[test]
    fn unknown_id_is_config_error() {
        let library = PatternLibrary::for_language(Language::Java);
        assert!(matches!(
            library.lookup("nope"),
            Err(ConfigError::UnknownSpt { .. })
        ));
    }

    #[test]
    fn kind_index_dispatches_calls() {
        let library = PatternLibrary::for_language(Language::Python);
        let ids: Vec<_> = library
            .definitions_for_kind(NodeKind::Call)
            .iter()
            .map(|&i| library.definitions()[i].id)
            .collect();
        assert!(ids.contains(&"call"));
        assert!(ids.contains(&"print"));
        assert!(!ids.contains(&"initlist"));
    }
}
