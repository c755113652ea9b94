//! Tag filter helpers applied before a layout request.

use crate::model::entity::LayoutEntity;
use std::collections::BTreeSet;

/// Every tag used by any entity (primary or not), sorted and unique.
pub fn distinct_tags(entities: &[LayoutEntity]) -> Vec<String> {
    entities
        .iter()
        .flat_map(|entity| entity.tags.iter())
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Keeps entities carrying `selected` in any tag position; `None` keeps all.
///
/// Input order is preserved so downstream slot assignment stays stable.
pub fn filter_by_tag(entities: &[LayoutEntity], selected: Option<&str>) -> Vec<LayoutEntity> {
    match selected {
        None => entities.to_vec(),
        Some(tag) => entities
            .iter()
            .filter(|entity| entity.has_tag(tag))
            .cloned()
            .collect(),
    }
}
