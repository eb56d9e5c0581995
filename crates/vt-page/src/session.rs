//! Page session: wires registry, observer, tracker, nav sink and fragment scroller
//! for one mounted page view.

use crate::config::PageConfig;
use vt_core::SpyResult;
use vt_core::Timestamp;
use vt_dom::Document;
use vt_fragment::FragmentPoll;
use vt_fragment::FragmentScroller;
use vt_nav::AnchorLink;
use vt_nav::NavItem;
use vt_nav::NavLink;
use vt_nav::NavSyncSink;
use vt_observer::VisibilityObserver;
use vt_observer::VisibilityReceiver;
use vt_observer::visibility_channel;
use vt_registry::RegionRegistry;
use vt_tracker::ActiveSectionTracker;
use vt_tracker::ActiveState;
use vt_tracker::Transition;

/// What one [`PageSession::pump`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumpReport {
    pub fragment: FragmentPoll,
    pub events_emitted: usize,
    pub batches_applied: usize,
    /// Regions that became active, in order.
    pub activated: Vec<String>,
}

impl Default for PumpReport {
    fn default() -> Self {
        Self {
            fragment: FragmentPoll::Idle,
            events_emitted: 0,
            batches_applied: 0,
            activated: Vec::new(),
        }
    }
}

impl PumpReport {
    pub fn active_changed(&self) -> bool {
        !self.activated.is_empty()
    }
}

/// One mounted page view.
#[derive(Debug)]
pub struct PageSession<L = AnchorLink> {
    config: PageConfig,
    tracker: ActiveSectionTracker,
    observer: VisibilityObserver,
    events: VisibilityReceiver,
    nav: NavSyncSink<L>,
    fragment: FragmentScroller,
    mounted: bool,
}

impl<L> PageSession<L>
where
    L: NavLink + for<'a> From<&'a NavItem>,
{
    /// Validates `config` and starts observing every region already in `document`.
    pub fn mount(config: PageConfig, document: &Document) -> SpyResult<Self> {
        let parts = SessionParts::build(&config)?;
        let (observer, events) = visibility_channel(config.observer.clone());

        let mut session = Self {
            config,
            tracker: ActiveSectionTracker::new(parts.registry),
            observer,
            events,
            nav: parts.nav,
            fragment: parts.fragment,
            mounted: true,
        };
        let missing = session.observe_regions(document);

        tracing::debug!(
            regions = session.tracker.registry().len(),
            missing,
            prefix = %session.config.id_prefix,
            "page session mounted"
        );
        Ok(session)
    }

    /// Replaces the page configuration, e.g. when navigating to another case study.
    ///
    /// The old observer is disposed and its queued batches are dropped. On error
    /// the session keeps its previous configuration.
    pub fn reconfigure(&mut self, config: PageConfig, document: &Document) -> SpyResult<()> {
        let parts = SessionParts::build(&config)?;

        self.observer.dispose();
        let (observer, events) = visibility_channel(config.observer.clone());
        self.observer = observer;
        self.events = events;

        self.tracker.reconfigure(parts.registry);
        self.nav = parts.nav;
        self.fragment = parts.fragment;
        self.config = config;
        self.mounted = true;
        let missing = self.observe_regions(document);

        tracing::debug!(
            regions = self.tracker.registry().len(),
            missing,
            prefix = %self.config.id_prefix,
            "page session reconfigured"
        );
        Ok(())
    }

    /// Releases the observer. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.observer.dispose();
        self.fragment.cancel();
        self.mounted = false;
        tracing::debug!(prefix = %self.config.id_prefix, "page session unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Jumps to `fragment` (with or without the leading `#`) once it is mounted.
    pub fn navigate_to_fragment(&mut self, fragment: &str, now: Timestamp) {
        if !self.mounted {
            return;
        }
        self.fragment.request(fragment, now);
    }

    /// Jumps to the fragment of `url`, if it has one.
    pub fn navigate_to_url(&mut self, url: &str, now: Timestamp) -> SpyResult<bool> {
        if !self.mounted {
            return Ok(false);
        }
        self.fragment.request_url(url, now)
    }

    /// Runs one host frame: fragment retry, late-mounted anchors, visibility check,
    /// then every queued batch through the tracker and on to the nav links.
    pub fn pump(&mut self, document: &mut Document, now: Timestamp) -> PumpReport {
        let mut report = PumpReport::default();
        if !self.mounted {
            return report;
        }

        report.fragment = self.fragment.poll(document, now);
        if let FragmentPoll::Found { target, .. } = &report.fragment {
            if let Transition::Activated(region_id) = self.tracker.activate(target) {
                self.nav.sync(self.tracker.state());
                report.activated.push(region_id);
            }
        }

        let missing = self.observe_regions(document);
        if missing > 0 {
            tracing::trace!(missing, "regions still waiting for their anchors");
        }
        report.events_emitted = self.observer.check(document, now);

        for batch in self.events.drain() {
            report.batches_applied = report.batches_applied.saturating_add(1);
            if let Transition::Activated(region_id) = self.tracker.apply_batch(&batch) {
                self.nav.sync(self.tracker.state());
                report.activated.push(region_id);
            }
        }

        report
    }

    pub fn state(&self) -> &ActiveState {
        self.tracker.state()
    }

    pub fn active_region_id(&self) -> Option<&str> {
        self.tracker.active_region_id()
    }

    pub fn registry(&self) -> &RegionRegistry {
        self.tracker.registry()
    }

    pub fn nav(&self) -> &NavSyncSink<L> {
        &self.nav
    }

    pub fn observer(&self) -> &VisibilityObserver {
        &self.observer
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn pending_fragment(&self) -> Option<&str> {
        self.fragment.pending_target()
    }

    /// Binds every region whose anchor is mounted; a remounted anchor is rebound.
    fn observe_regions(&mut self, document: &Document) -> usize {
        let mut missing = 0_usize;
        for id in self.tracker.registry().ids() {
            match document.element_by_anchor(id) {
                Some(element) => self.observer.observe(id, Some(element)),
                None => missing = missing.saturating_add(1),
            }
        }
        missing
    }
}

struct SessionParts<L> {
    registry: RegionRegistry,
    nav: NavSyncSink<L>,
    fragment: FragmentScroller,
}

impl<L> SessionParts<L>
where
    L: NavLink + for<'a> From<&'a NavItem>,
{
    fn build(config: &PageConfig) -> SpyResult<Self> {
        config.validate()?;
        Ok(Self {
            registry: config.registry()?,
            nav: NavSyncSink::from_items(config.nav_entries().iter())?,
            fragment: FragmentScroller::new(config.fragment_retry)?,
        })
    }
}
