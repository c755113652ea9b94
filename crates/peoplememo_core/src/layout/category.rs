//! Category extraction and fixed category colors.

use crate::model::entity::LayoutEntity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Category name with a dedicated color.
pub const CATEGORY_WORK: &str = "Work";
pub const CATEGORY_HOBBY: &str = "Hobby";
pub const CATEGORY_SCHOOL: &str = "School";
pub const CATEGORY_FAMILY: &str = "Family";
pub const CATEGORY_DRINKING_BUDDY: &str = "Drinking Buddy";

/// Linear RGB color in `[0, 1]` per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TagColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl TagColor {
    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Fallback for categories without a table entry.
    pub const GRAY: TagColor = TagColor::rgb(0.56, 0.56, 0.58);

    /// `#RRGGBB` rendering for non-Rust consumers.
    pub fn to_hex(self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}",
            channel_byte(self.red),
            channel_byte(self.green),
            channel_byte(self.blue)
        )
    }
}

fn channel_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Returns the fixed color for `category`, or [`TagColor::GRAY`].
pub fn color_for_category(category: &str) -> TagColor {
    match category {
        CATEGORY_WORK => TagColor::rgb(0.0, 0.7, 0.9),
        CATEGORY_HOBBY => TagColor::rgb(1.0, 0.5, 0.0),
        CATEGORY_SCHOOL => TagColor::rgb(0.6, 0.2, 0.8),
        CATEGORY_FAMILY => TagColor::rgb(1.0, 0.3, 0.6),
        CATEGORY_DRINKING_BUDDY => TagColor::rgb(1.0, 0.8, 0.0),
        _ => TagColor::GRAY,
    }
}

/// Distinct primary categories, sorted lexicographically.
///
/// Secondary tags never contribute; entities without a primary tag are ignored.
pub fn resolve_categories<'a, I>(entities: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a LayoutEntity>,
{
    entities
        .into_iter()
        .filter_map(LayoutEntity::primary_tag)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
