//! Ordered registry of the navigable regions on one page instance.

use std::collections::HashMap;
use vt_core::SpyError;
use vt_core::SpyResult;

/// Caller-supplied section description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDescriptor {
    pub id: String,
    pub heading: String,
}

impl SectionDescriptor {
    pub fn new(id: impl Into<String>, heading: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            heading: heading.into(),
        }
    }
}

/// Named, orderable content section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    pub label: String,
    pub order: usize,
}

/// Immutable list of regions in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRegistry {
    regions: Vec<Region>,
    index: HashMap<String, usize>,
}

impl RegionRegistry {
    pub fn new<I>(sections: I) -> SpyResult<Self>
    where
        I: IntoIterator<Item = SectionDescriptor>,
    {
        Self::with_prefix("", sections)
    }

    /// Builds a registry whose ids are namespaced with `prefix` (e.g. `p1-`).
    pub fn with_prefix<I>(prefix: &str, sections: I) -> SpyResult<Self>
    where
        I: IntoIterator<Item = SectionDescriptor>,
    {
        let mut regions = Vec::new();
        let mut index = HashMap::new();

        for (order, section) in sections.into_iter().enumerate() {
            if section.id.trim().is_empty() {
                return Err(SpyError::new(
                    "config.region_id_empty",
                    format!("section at position {order} has an empty id"),
                ));
            }

            let id = format!("{prefix}{}", section.id);
            if index.insert(id.clone(), order).is_some() {
                return Err(SpyError::new(
                    "config.region_id_duplicate",
                    format!("section id `{id}` appears more than once"),
                ));
            }

            regions.push(Region {
                id,
                label: section.heading,
                order,
            });
        }

        if regions.is_empty() {
            return Err(SpyError::new(
                "config.regions_empty",
                "a page needs at least one section",
            ));
        }

        Ok(Self { regions, index })
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|region| region.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.index.get(id).map(|order| &self.regions[*order])
    }

    pub fn label(&self, id: &str) -> Option<&str> {
        self.get(id).map(|region| region.label.as_str())
    }

    pub fn order_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn first(&self) -> &Region {
        // Construction rejects empty registries.
        &self.regions[0]
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
