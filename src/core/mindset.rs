use std::collections::HashSet;

use crate::models::{MindsetTag, Validation};

pub const MAX_MINDSET_TAGS: usize = 5;

pub fn validate_mindset_tags(tags: &[MindsetTag]) -> Validation {
    if tags.len() > MAX_MINDSET_TAGS {
        return Validation::fail(format!(
            "Maximum {} mindset tags allowed",
            MAX_MINDSET_TAGS
        ));
    }
    let mut seen = HashSet::new();
    for t in tags {
        if !seen.insert(t.tag) {
            return Validation::fail(format!("Duplicate mindset tag: {}", t.tag));
        }
    }
    Validation::ok()
}

/// Mean signed intensity in [-1, 1]; `None` when no tags were recorded.
pub fn mindset_balance(tags: &[MindsetTag]) -> Option<f64> {
    if tags.is_empty() {
        return None;
    }
    let total: f64 = tags
        .iter()
        .map(|t| {
            let w = t.intensity.weight();
            if t.tag.is_constructive() {
                w
            } else {
                -w
            }
        })
        .sum();
    Some(total / tags.len() as f64)
}
