//! Concept lookup over inconsistently labelled accounts.
//!
//! A concept is resolved by trying each of its synonyms, in dictionary order,
//! as a substring of the normalized account names. Only when no synonym is
//! contained anywhere does an edit-distance search run, allowing roughly one
//! edit per four characters of the synonym. Absent concepts resolve to zero.

use crate::dictionary::Concept;
use crate::mapper::{category_totals, flatten};
use crate::schema::{AccountNode, FlatMap};
use crate::utils::{finite_or_zero, levenshtein_distance, normalize};
use log::debug;
use serde::{Deserialize, Serialize};

/// Synonyms shorter than this never take part in fuzzy matching.
pub const MIN_FUZZY_KEYWORD_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum MatchKind {
    Substring,
    Fuzzy { distance: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAccount {
    pub account: String,
    pub value: f64,
    pub kind: MatchKind,
}

pub fn fuzzy_threshold(normalized_keyword_len: usize) -> usize {
    normalized_keyword_len / 4 + 1
}

struct Entry {
    account: String,
    norm: String,
    value: f64,
}

/// Flat accounts with their names normalized once up front.
struct AccountLookup {
    entries: Vec<Entry>,
}

impl AccountLookup {
    fn new(flat: &FlatMap) -> Self {
        let entries = flat
            .iter()
            .map(|(account, value)| Entry {
                account: account.clone(),
                norm: normalize(account),
                value: *value,
            })
            .collect();
        Self { entries }
    }

    fn find(&self, keywords: &[&str]) -> Option<ResolvedAccount> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|keyword| normalize(keyword))
            .filter(|keyword| !keyword.is_empty())
            .collect();

        for keyword in &keywords {
            if let Some(entry) = self.entries.iter().find(|e| e.norm.contains(keyword.as_str())) {
                return Some(ResolvedAccount {
                    account: entry.account.clone(),
                    value: finite_or_zero(entry.value),
                    kind: MatchKind::Substring,
                });
            }
        }

        let mut best: Option<(&Entry, &String, usize)> = None;

        for keyword in &keywords {
            if keyword.len() < MIN_FUZZY_KEYWORD_LEN {
                continue;
            }
            let threshold = fuzzy_threshold(keyword.len());

            for entry in &self.entries {
                let distance = levenshtein_distance(keyword, &entry.norm);
                let improves = best.map_or(true, |(_, _, best_distance)| distance < best_distance);
                if distance <= threshold && improves {
                    best = Some((entry, keyword, distance));
                }
            }
        }

        best.map(|(entry, keyword, distance)| {
            debug!(
                "Fuzzy match: '{}' -> '{}' (distance {})",
                keyword, entry.account, distance
            );
            ResolvedAccount {
                account: entry.account.clone(),
                value: finite_or_zero(entry.value),
                kind: MatchKind::Fuzzy { distance },
            }
        })
    }

    /// Net income must not be confused with the pre-tax line that usually
    /// sits next to it ("Utilidad Neta Antes de Impuestos").
    fn find_net_income(&self) -> Option<f64> {
        let keywords: Vec<String> = Concept::NetIncome
            .synonyms()
            .iter()
            .map(|keyword| normalize(keyword))
            .collect();

        let after_tax = self.entries.iter().find(|e| {
            let is_net = keywords.iter().any(|k| e.norm.contains(k.as_str()));
            let is_before = e.norm.contains("antes") || e.norm.contains("before");
            is_net && !is_before
        });

        after_tax
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.norm.contains("despues") || e.norm.contains("after"))
            })
            .map(|entry| finite_or_zero(entry.value))
    }
}

/// Looks up the first account matching any of `keywords`.
pub fn find_value(flat: &FlatMap, keywords: &[&str]) -> Option<ResolvedAccount> {
    AccountLookup::new(flat).find(keywords)
}

pub fn resolve_value(flat: &FlatMap, keywords: &[&str]) -> f64 {
    find_value(flat, keywords).map_or(0.0, |resolved| resolved.value)
}

pub fn find_concept(flat: &FlatMap, concept: Concept) -> Option<ResolvedAccount> {
    find_value(flat, concept.synonyms())
}

/// Total over all inputs: an unresolvable concept reads as zero.
pub fn resolve_concept(flat: &FlatMap, concept: Concept) -> f64 {
    resolve_value(flat, concept.synonyms())
}

pub fn find_net_income(flat: &FlatMap) -> Option<f64> {
    AccountLookup::new(flat).find_net_income()
}

pub fn resolve_net_income(flat: &FlatMap) -> f64 {
    find_net_income(flat).unwrap_or(0.0)
}

/// One statement prepared for repeated concept lookups. Individual accounts
/// are searched first; category totals are consulted only when no account
/// resolves the concept.
pub struct StatementIndex {
    leaves: AccountLookup,
    totals: AccountLookup,
}

impl StatementIndex {
    pub fn new(tree: &AccountNode) -> Self {
        Self {
            leaves: AccountLookup::new(&flatten(tree)),
            totals: AccountLookup::new(&category_totals(tree)),
        }
    }

    pub fn find(&self, concept: Concept) -> Option<ResolvedAccount> {
        self.leaves.find(concept.synonyms()).or_else(|| {
            let resolved = self.totals.find(concept.synonyms());
            if let Some(r) = &resolved {
                debug!("Resolved {} from category total '{}'", concept, r.account);
            }
            resolved
        })
    }

    pub fn resolve(&self, concept: Concept) -> f64 {
        if concept == Concept::NetIncome {
            return self.net_income();
        }
        self.find(concept).map_or(0.0, |resolved| resolved.value)
    }

    pub fn net_income(&self) -> f64 {
        self.leaves
            .find_net_income()
            .or_else(|| self.totals.find_net_income())
            .unwrap_or(0.0)
    }
}
