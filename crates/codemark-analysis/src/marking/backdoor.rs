//! Backdoor specs and mark rates, validated before any sample is processed.

use codemark_core::errors::ConfigError;
use codemark_core::FxHashSet;

use crate::spt::{PatternLibrary, SptDefinition, VariantDef};

/// One required SPT and the surface form it must take.
#[derive(Debug, Clone, Copy)]
pub struct BackdoorTerm {
    pub spt: &'static SptDefinition,
    pub variant: &'static VariantDef,
}

impl BackdoorTerm {
    /// Parse `"id"` (default trigger variant) or `"id:variant"`.
    pub fn parse(library: &PatternLibrary, raw: &str) -> Result<Self, ConfigError> {
        let (id, variant) = match raw.split_once(':') {
            Some((id, variant)) => (id.trim(), Some(variant.trim())),
            None => (raw.trim(), None),
        };
        let spt = library.lookup(id)?;
        let variant = match variant {
            None => spt.trigger_variant(),
            Some(name) => spt.variant(name).ok_or_else(|| ConfigError::UnknownVariant {
                id: id.to_string(),
                variant: name.to_string(),
            })?,
        };
        Ok(Self { spt, variant })
    }

    pub fn spt_id(&self) -> &'static str {
        self.spt.id
    }
}

/// Ordered, non-empty list of terms that must all be rewritten together.
#[derive(Debug, Clone)]
pub struct BackdoorSpec {
    part: usize,
    terms: Vec<BackdoorTerm>,
}

impl BackdoorSpec {
    pub fn parse(library: &PatternLibrary, part: usize, raw: &[String]) -> Result<Self, ConfigError> {
        if raw.is_empty() {
            return Err(ConfigError::EmptyBackdoor { part });
        }
        let mut seen = FxHashSet::default();
        let mut terms = Vec::with_capacity(raw.len());
        for entry in raw {
            let term = BackdoorTerm::parse(library, entry)?;
            if !seen.insert(term.spt_id()) {
                return Err(ConfigError::DuplicateSpt {
                    part,
                    id: term.spt_id().to_string(),
                });
            }
            terms.push(term);
        }
        Ok(Self { part, terms })
    }

    /// Corpus part this spec is applied to.
    pub fn part(&self) -> usize {
        self.part
    }

    pub fn terms(&self) -> &[BackdoorTerm] {
        &self.terms
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.terms.iter().map(BackdoorTerm::spt_id).collect()
    }

    /// Human-readable form, e.g. `call+print`.
    pub fn label(&self) -> String {
        self.terms
            .iter()
            .map(|t| {
                if std::ptr::eq(t.variant, t.spt.trigger_variant()) {
                    t.spt.id.to_string()
                } else {
                    format!("{}:{}", t.spt.id, t.variant.name)
                }
            })
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Parse every configured spec, one per corpus part.
pub fn parse_backdoors(
    library: &PatternLibrary,
    raw: &[Vec<String>],
) -> Result<Vec<BackdoorSpec>, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::NoBackdoors);
    }
    raw.iter()
        .enumerate()
        .map(|(part, spec)| BackdoorSpec::parse(library, part, spec))
        .collect()
}

/// Validate configured mark rates and return them in ascending order.
/// Each rate must lie in `(0, 1]` and appear once; the rate-0 baseline is
/// implicit and never configured.
pub fn validate_mark_rates(rates: &[f64]) -> Result<Vec<f64>, ConfigError> {
    if rates.is_empty() {
        return Err(ConfigError::InvalidMarkRate {
            rate: f64::NAN,
            reason: "at least one mark rate is required".to_string(),
        });
    }
    let mut sorted = Vec::with_capacity(rates.len());
    for &rate in rates {
        if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
            return Err(ConfigError::InvalidMarkRate {
                rate,
                reason: "must lie in (0, 1]".to_string(),
            });
        }
        sorted.push(rate);
    }
    sorted.sort_by(f64::total_cmp);
    if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(ConfigError::InvalidMarkRate {
            rate: pair[0],
            reason: "listed more than once".to_string(),
        });
    }
    Ok(sorted)
}
