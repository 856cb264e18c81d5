use crate::chart_of_accounts::{mapper_synonyms, template_for, UNCLASSIFIED_CATEGORY};
use crate::schema::{AccountNode, DocumentType, FlatMap, UnknownAccountPolicy};
use crate::utils::{finite_or_zero, normalize};
use indexmap::IndexMap;
use log::debug;
use std::collections::HashSet;

/// Collapses a statement tree into `account name -> value`, keeping only
/// leaves. Names are not paths: when two leaves share a name the one visited
/// later wins, while the entry keeps the position of its first occurrence.
pub fn flatten(tree: &AccountNode) -> FlatMap {
    let mut result = FlatMap::new();
    if let AccountNode::Category(children) = tree {
        flatten_into(children, &mut result);
    }
    result
}

fn flatten_into(children: &IndexMap<String, AccountNode>, result: &mut FlatMap) {
    for (key, child) in children {
        match child {
            AccountNode::Leaf(value) => {
                result.insert(key.clone(), *value);
            }
            AccountNode::Category(grandchildren) => flatten_into(grandchildren, result),
        }
    }
}

/// Maps every named category of the tree to its total, parents before
/// their subcategories. The root itself has no name and is not reported.
pub fn category_totals(tree: &AccountNode) -> FlatMap {
    let mut totals = FlatMap::new();
    if let AccountNode::Category(children) = tree {
        collect_totals(children, &mut totals);
    }
    totals
}

fn collect_totals(children: &IndexMap<String, AccountNode>, totals: &mut FlatMap) {
    for (key, child) in children {
        if let AccountNode::Category(grandchildren) = child {
            totals.insert(key.clone(), category_total(grandchildren));
            collect_totals(grandchildren, totals);
        }
    }
}

const SUBTOTAL_PREFIXES: &[&str] = &["total", "subtotal", "suma"];

/// A reported subtotal line ("Total Activo Corriente", "Suma del Pasivo",
/// "Subtotal") inside the category takes precedence over summing its lines.
/// Non-finite lines count as zero.
fn category_total(children: &IndexMap<String, AccountNode>) -> f64 {
    let reported = children.iter().find_map(|(key, child)| {
        let value = child.as_leaf()?;
        let norm = normalize(key);
        SUBTOTAL_PREFIXES
            .iter()
            .any(|prefix| norm.starts_with(prefix))
            .then_some(value)
    });

    if let Some(value) = reported {
        return finite_or_zero(value);
    }

    children
        .values()
        .map(|child| match child {
            AccountNode::Leaf(value) => finite_or_zero(*value),
            AccountNode::Category(grandchildren) => category_total(grandchildren),
        })
        .sum()
}

/// Fills the fixed template for `document_type` from a flat account map,
/// dropping accounts the template does not know.
pub fn map_to_schema(document_type: DocumentType, flat_input: &FlatMap) -> AccountNode {
    map_to_schema_with(document_type, flat_input, UnknownAccountPolicy::Drop)
}

pub fn map_to_schema_with(
    document_type: DocumentType,
    flat_input: &FlatMap,
    policy: UnknownAccountPolicy,
) -> AccountNode {
    let template = template_for(document_type);
    let mut tree = template.instantiate();

    let inputs: Vec<InputAccount> = flat_input
        .iter()
        .map(|(key, value)| InputAccount {
            key,
            norm: normalize(key),
            value: finite_or_zero(*value),
        })
        .collect();

    let mut used: HashSet<&str> = HashSet::new();

    if let AccountNode::Category(root) = &mut tree {
        fill_children(root, flat_input, &inputs, &mut used);
    }

    let unmatched: Vec<&InputAccount> = inputs
        .iter()
        .filter(|input| !used.contains(input.key.as_str()))
        .collect();

    debug!(
        "Static mapper used {} input accounts for the {} template ({} accounts), {} unmatched",
        used.len(),
        document_type,
        template.account_names().len(),
        unmatched.len()
    );

    if policy == UnknownAccountPolicy::Preserve && !unmatched.is_empty() {
        let extras: IndexMap<String, AccountNode> = unmatched
            .iter()
            .map(|input| (input.key.clone(), AccountNode::Leaf(input.value)))
            .collect();

        if let AccountNode::Category(root) = &mut tree {
            if let Some(AccountNode::Category(sections)) = root.get_mut(template.name()) {
                sections.insert(UNCLASSIFIED_CATEGORY.to_string(), AccountNode::Category(extras));
            }
        }
    }

    tree
}

struct InputAccount<'a> {
    key: &'a String,
    norm: String,
    value: f64,
}

fn fill_children<'a>(
    children: &mut IndexMap<String, AccountNode>,
    flat_input: &'a FlatMap,
    inputs: &[InputAccount<'a>],
    used: &mut HashSet<&'a str>,
) {
    for (name, child) in children.iter_mut() {
        match child {
            AccountNode::Category(grandchildren) => {
                fill_children(grandchildren, flat_input, inputs, used)
            }
            AccountNode::Leaf(value) => {
                if let Some((key, found)) = lookup_template_account(name, flat_input, inputs) {
                    *value = found;
                    used.insert(key);
                }
            }
        }
    }
}

/// Exact key, then normalized key, then the leaf's registered synonyms.
fn lookup_template_account<'a>(
    name: &str,
    flat_input: &'a FlatMap,
    inputs: &[InputAccount<'a>],
) -> Option<(&'a str, f64)> {
    if let Some((_, key, value)) = flat_input.get_full(name) {
        return Some((key.as_str(), finite_or_zero(*value)));
    }

    let norm_name = normalize(name);

    if let Some(input) = inputs.iter().find(|input| input.norm == norm_name) {
        return Some((input.key.as_str(), input.value));
    }

    let synonyms: Vec<String> = mapper_synonyms(&norm_name)
        .iter()
        .map(|synonym| normalize(synonym))
        .collect();

    inputs
        .iter()
        .find(|input| synonyms.iter().any(|synonym| *synonym == input.norm))
        .map(|input| (input.key.as_str(), input.value))
}
