//! Projects the active region onto a set of navigation links.

use vt_core::SpyError;
use vt_core::SpyResult;
use vt_tracker::ActiveState;

/// A link-like UI element that can carry the "active" designation.
pub trait NavLink {
    fn set_active(&mut self, active: bool);
    fn is_active(&self) -> bool;
}

/// Nav entry as presented to the host before it becomes a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub region_id: String,
    pub label: String,
}

impl NavItem {
    pub fn new(region_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            label: label.into(),
        }
    }

    /// Fragment href pointing at the region anchor.
    pub fn href(&self) -> String {
        format!("#{}", self.region_id)
    }
}

/// Stock link: an `<a href="#id">` with an active flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorLink {
    pub href: String,
    pub label: String,
    active: bool,
}

impl AnchorLink {
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
            active: false,
        }
    }

    /// Region id the href points at.
    pub fn target(&self) -> &str {
        self.href.strip_prefix('#').unwrap_or(&self.href)
    }
}

impl From<&NavItem> for AnchorLink {
    fn from(item: &NavItem) -> Self {
        Self::new(item.href(), item.label.clone())
    }
}

impl NavLink for AnchorLink {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Relation between a region and the link that mirrors its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLinkBinding<L> {
    pub region_id: String,
    pub link: L,
}

/// Keeps at most one bound link active, matching the tracker state.
#[derive(Debug, Clone)]
pub struct NavSyncSink<L> {
    bindings: Vec<NavLinkBinding<L>>,
    active_region_id: Option<String>,
}

impl<L> Default for NavSyncSink<L> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
            active_region_id: None,
        }
    }
}

impl<L: NavLink> NavSyncSink<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sink with one link per nav item.
    pub fn from_items<'a, I>(items: I) -> SpyResult<Self>
    where
        I: IntoIterator<Item = &'a NavItem>,
        L: for<'b> From<&'b NavItem>,
    {
        let mut sink = Self::new();
        for item in items {
            sink.bind(item.region_id.as_str(), L::from(item))?;
        }
        Ok(sink)
    }

    pub fn bind(&mut self, region_id: &str, mut link: L) -> SpyResult<()> {
        if self
            .bindings
            .iter()
            .any(|binding| binding.region_id == region_id)
        {
            return Err(SpyError::new(
                "config.nav_binding_duplicate",
                format!("region `{region_id}` already has a nav link"),
            ));
        }

        link.set_active(self.active_region_id.as_deref() == Some(region_id));
        self.bindings.push(NavLinkBinding {
            region_id: region_id.to_owned(),
            link,
        });
        Ok(())
    }

    /// Mirrors `state` onto the links. Returns how many links changed.
    pub fn sync(&mut self, state: &ActiveState) -> usize {
        let active = state.active_region_id();
        let mut changed = 0_usize;

        for binding in &mut self.bindings {
            let should_be_active = active == Some(binding.region_id.as_str());
            if binding.link.is_active() != should_be_active {
                binding.link.set_active(should_be_active);
                changed = changed.saturating_add(1);
            }
        }

        self.active_region_id = active.map(str::to_owned);
        if changed > 0 {
            tracing::trace!(active = ?active, changed, "nav links synced");
        }
        changed
    }

    pub fn active_region_id(&self) -> Option<&str> {
        self.active_region_id.as_deref()
    }

    pub fn bindings(&self) -> &[NavLinkBinding<L>] {
        &self.bindings
    }

    pub fn links(&self) -> impl Iterator<Item = &L> {
        self.bindings.iter().map(|binding| &binding.link)
    }

    pub fn link(&self, region_id: &str) -> Option<&L> {
        self.bindings
            .iter()
            .find(|binding| binding.region_id == region_id)
            .map(|binding| &binding.link)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
