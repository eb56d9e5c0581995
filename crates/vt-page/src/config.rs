//! Page-instance configuration.

use vt_core::SpyError;
use vt_core::SpyResult;
use vt_fragment::RetryPolicy;
use vt_layout::RootMargin;
use vt_nav::NavItem;
use vt_observer::ObserverConfig;
use vt_registry::RegionRegistry;
use vt_registry::SectionDescriptor;

/// Environment variable that overrides the activation band.
pub const ROOT_MARGIN_ENV: &str = "VANTAGE_ROOT_MARGIN";

/// Anchor used when a page has no sections to link to.
pub const FALLBACK_SECTION_ID: &str = "top";

/// Everything needed to mount one sectioned page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    /// Namespace prepended to every section id, e.g. `p1-`.
    pub id_prefix: String,
    pub sections: Vec<SectionDescriptor>,
    /// Explicit nav entries. Defaults to one per section.
    pub nav_items: Option<Vec<SectionDescriptor>>,
    pub show_nav: bool,
    pub observer: ObserverConfig,
    pub fragment_retry: RetryPolicy,
}

impl PageConfig {
    pub fn new(sections: Vec<SectionDescriptor>) -> Self {
        Self {
            id_prefix: String::new(),
            sections,
            nav_items: None,
            show_nav: true,
            observer: ObserverConfig::default(),
            fragment_retry: RetryPolicy::default(),
        }
    }

    pub fn with_prefix(mut self, id_prefix: impl Into<String>) -> Self {
        self.id_prefix = id_prefix.into();
        self
    }

    pub fn with_nav_items(mut self, nav_items: Vec<SectionDescriptor>) -> Self {
        self.nav_items = Some(nav_items);
        self
    }

    pub fn with_observer(mut self, observer: ObserverConfig) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_root_margin(mut self, root_margin: RootMargin) -> Self {
        self.observer.root_margin = root_margin;
        self
    }

    pub fn with_fragment_retry(mut self, fragment_retry: RetryPolicy) -> Self {
        self.fragment_retry = fragment_retry;
        self
    }

    /// Applies `VANTAGE_ROOT_MARGIN` when it is set and non-empty.
    pub fn with_env_overrides(mut self) -> SpyResult<Self> {
        if let Some(margin) = std::env::var_os(ROOT_MARGIN_ENV) {
            let margin = margin.to_string_lossy();
            if !margin.trim().is_empty() {
                self.observer = ObserverConfig::with_root_margin(&margin)?;
            }
        }
        Ok(self)
    }

    /// Builds the region registry, surfacing configuration errors immediately.
    pub fn registry(&self) -> SpyResult<RegionRegistry> {
        RegionRegistry::with_prefix(&self.id_prefix, self.sections.iter().cloned())
    }

    /// Nav entries with prefixed region ids; empty when the nav is hidden.
    pub fn nav_entries(&self) -> Vec<NavItem> {
        if !self.show_nav {
            return Vec::new();
        }

        self.nav_items
            .as_ref()
            .unwrap_or(&self.sections)
            .iter()
            .map(|item| NavItem::new(self.prefixed(&item.id), item.heading.clone()))
            .collect()
    }

    pub fn first_section_id(&self) -> String {
        match self.sections.first() {
            Some(section) => self.prefixed(&section.id),
            None => FALLBACK_SECTION_ID.to_owned(),
        }
    }

    pub fn prefixed(&self, id: &str) -> String {
        format!("{}{id}", self.id_prefix)
    }

    pub fn validate(&self) -> SpyResult<()> {
        self.registry()?;
        self.fragment_retry.validate()?;

        if let Some(nav_items) = &self.nav_items {
            if nav_items.iter().any(|item| item.id.trim().is_empty()) {
                return Err(SpyError::new(
                    "config.nav_item_id_empty",
                    "nav items must reference a section id",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::PageConfig;
    use vt_registry::SectionDescriptor;

    fn sections() -> Vec<SectionDescriptor> {
        vec![
            SectionDescriptor::new("overview", "Overview"),
            SectionDescriptor::new("results", "Results"),
        ]
    }

    #[test]
    fn nav_defaults_to_sections_with_prefix() {
        let config = PageConfig::new(sections()).with_prefix("p1-");
        let entries = config.nav_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].region_id, "p1-results");
        assert_eq!(entries[1].href(), "#p1-results");
        assert_eq!(config.first_section_id(), "p1-overview");
    }

    #[test]
    fn explicit_nav_items_win() {
        let config = PageConfig::new(sections())
            .with_nav_items(vec![SectionDescriptor::new("results", "Outcome")]);
        let entries = config.nav_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Outcome");
    }

    #[test]
    fn hidden_nav_has_no_entries() {
        let mut config = PageConfig::new(sections());
        config.show_nav = false;
        assert!(config.nav_entries().is_empty());
    }

    #[test]
    fn first_section_falls_back_to_top() {
        let config = PageConfig::new(Vec::new());
        assert_eq!(config.first_section_id(), "top");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_sections() {
        let mut list = sections();
        list.push(SectionDescriptor::new("overview", "Again"));
        let result = PageConfig::new(list).validate();
        assert!(result.is_err_and(|error| error.code == "config.region_id_duplicate"));
    }
}
