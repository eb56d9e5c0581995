//! Fragment-anchor navigation: locate `#id` targets with bounded retry.

use std::time::Duration;
use url::Url;
use vt_core::SpyError;
use vt_core::SpyResult;
use vt_core::Timestamp;
use vt_dom::Document;
use vt_dom::ElementHandle;

const DEFAULT_MAX_ATTEMPTS: u32 = 10;
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(100);
const RELATIVE_BASE: &str = "http://localhost/";

/// Extracts the fragment from an absolute URL, a relative reference or a bare `#id`.
///
/// Returns `Ok(None)` when there is no fragment or it is empty.
pub fn fragment_of(input: &str) -> SpyResult<Option<String>> {
    let base = Url::parse(RELATIVE_BASE).map_err(|error| {
        SpyError::new(
            "fragment.base_invalid",
            format!("failed to parse base URL: {error}"),
        )
    })?;

    let parsed = base.join(input.trim()).map_err(|error| {
        SpyError::new(
            "fragment.url_invalid",
            format!("failed to parse URL `{input}`: {error}"),
        )
    })?;

    Ok(parsed
        .fragment()
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_owned))
}

/// How long to keep looking for a fragment target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the immediate one included.
    pub max_attempts: u32,
    /// Delay between one failed attempt and the next.
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

impl RetryPolicy {
    pub fn validate(&self) -> SpyResult<()> {
        if self.max_attempts == 0 {
            return Err(SpyError::new(
                "config.fragment_attempts_zero",
                "fragment retry policy needs at least one attempt",
            ));
        }

        if self.interval.is_zero() {
            return Err(SpyError::new(
                "config.fragment_interval_zero",
                "fragment retry interval must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// Result of one [`FragmentScroller::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentPoll {
    /// Nothing requested.
    Idle,
    /// Still looking; the next attempt is due at `next_attempt_at`.
    Pending {
        target: String,
        attempts: u32,
        next_attempt_at: Timestamp,
    },
    /// Target located and scrolled into view.
    Found {
        target: String,
        element: ElementHandle,
        attempts: u32,
    },
    /// Attempt ceiling reached without the target appearing.
    GaveUp { target: String, attempts: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRequest {
    target: String,
    attempts: u32,
    next_attempt_at: Timestamp,
}

/// Scrolls to a fragment target once it is mounted, retrying on a fixed interval.
#[derive(Debug, Clone, Default)]
pub struct FragmentScroller {
    policy: RetryPolicy,
    pending: Option<PendingRequest>,
}

impl FragmentScroller {
    pub fn new(policy: RetryPolicy) -> SpyResult<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            pending: None,
        })
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Starts looking for `target`, replacing any pending request.
    /// The first attempt is due immediately.
    pub fn request(&mut self, target: &str, now: Timestamp) {
        let target = target.trim_start_matches('#');
        if target.is_empty() {
            self.cancel();
            return;
        }

        tracing::debug!(target, "fragment navigation requested");
        self.pending = Some(PendingRequest {
            target: target.to_owned(),
            attempts: 0,
            next_attempt_at: now,
        });
    }

    /// Requests the fragment of `url`, if it has one.
    pub fn request_url(&mut self, url: &str, now: Timestamp) -> SpyResult<bool> {
        match fragment_of(url)? {
            Some(fragment) => {
                self.request(&fragment, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending_target(&self) -> Option<&str> {
        self.pending.as_ref().map(|pending| pending.target.as_str())
    }

    /// Makes at most one attempt if one is due.
    pub fn poll(&mut self, document: &mut Document, now: Timestamp) -> FragmentPoll {
        let Some(pending) = self.pending.as_mut() else {
            return FragmentPoll::Idle;
        };

        if now < pending.next_attempt_at {
            return FragmentPoll::Pending {
                target: pending.target.clone(),
                attempts: pending.attempts,
                next_attempt_at: pending.next_attempt_at,
            };
        }

        pending.attempts = pending.attempts.saturating_add(1);

        if let Some(element) = document.element_by_anchor(&pending.target) {
            document.scroll_into_view(element);
            let target = pending.target.clone();
            let attempts = pending.attempts;
            self.pending = None;
            tracing::debug!(target = %target, attempts, "fragment target located");
            return FragmentPoll::Found {
                target,
                element,
                attempts,
            };
        }

        if pending.attempts >= self.policy.max_attempts {
            let target = pending.target.clone();
            let attempts = pending.attempts;
            self.pending = None;
            tracing::debug!(target = %target, attempts, "fragment target never mounted; giving up");
            return FragmentPoll::GaveUp { target, attempts };
        }

        pending.next_attempt_at = now + self.policy.interval;
        FragmentPoll::Pending {
            target: pending.target.clone(),
            attempts: pending.attempts,
            next_attempt_at: pending.next_attempt_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FragmentPoll;
    use super::FragmentScroller;
    use super::RetryPolicy;
    use super::fragment_of;
    use std::time::Duration;
    use vt_dom::Document;
    use vt_dom::ElementBox;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn page() -> Document {
        let mut doc = Document::new(400.0);
        for (index, anchor) in ["p1-overview", "p1-features"].iter().enumerate() {
            let mounted = doc.mount(anchor, ElementBox::new(index as f32 * 600.0, 600.0));
            assert!(mounted.is_ok());
        }
        doc
    }

    #[test]
    fn extracts_fragments() {
        assert_eq!(
            fragment_of("https://example.com/vr#p1-results"),
            Ok(Some("p1-results".to_owned()))
        );
        assert_eq!(fragment_of("#p1-results"), Ok(Some("p1-results".to_owned())));
        assert_eq!(fragment_of("/full-stack#about"), Ok(Some("about".to_owned())));
        assert_eq!(fragment_of("/full-stack"), Ok(None));
        assert_eq!(fragment_of("/full-stack#"), Ok(None));
    }

    #[test]
    fn finds_mounted_target_immediately() {
        let mut doc = page();
        let mut scroller = FragmentScroller::default();
        scroller.request("#p1-features", ms(0));

        let outcome = scroller.poll(&mut doc, ms(0));
        assert!(matches!(
            outcome,
            FragmentPoll::Found { ref target, attempts: 1, .. } if target == "p1-features"
        ));
        assert_eq!(doc.scroll_top(), 600.0);
        assert_eq!(scroller.poll(&mut doc, ms(1)), FragmentPoll::Idle);
    }

    #[test]
    fn finds_late_mounted_target_on_third_retry() {
        let mut doc = page();
        let mut scroller = FragmentScroller::default();
        scroller.request("p1-results", ms(0));

        for at in [0, 100, 200] {
            let outcome = scroller.poll(&mut doc, ms(at));
            assert!(matches!(outcome, FragmentPoll::Pending { .. }), "found too early at {at}ms");
        }

        let mounted = doc.mount("p1-results", ElementBox::new(1200.0, 600.0));
        assert!(mounted.is_ok());

        assert!(matches!(
            scroller.poll(&mut doc, ms(250)),
            FragmentPoll::Pending { attempts: 3, .. }
        ));

        let outcome = scroller.poll(&mut doc, ms(300));
        assert!(matches!(outcome, FragmentPoll::Found { attempts: 4, .. }));
        assert_eq!(doc.scroll_top(), 1200.0);
    }

    #[test]
    fn gives_up_after_attempt_ceiling() {
        let mut doc = page();
        let mut scroller = FragmentScroller::default();
        scroller.request("missing", ms(0));

        let mut last = FragmentPoll::Idle;
        for step in 0..10 {
            last = scroller.poll(&mut doc, ms(step * 100));
        }
        assert_eq!(
            last,
            FragmentPoll::GaveUp {
                target: "missing".to_owned(),
                attempts: 10
            }
        );
        assert_eq!(scroller.poll(&mut doc, ms(5_000)), FragmentPoll::Idle);
        assert_eq!(doc.scroll_top(), 0.0);
    }

    #[test]
    fn new_request_replaces_pending_one() {
        let mut doc = page();
        let mut scroller = FragmentScroller::default();
        scroller.request("missing", ms(0));
        scroller.poll(&mut doc, ms(0));
        scroller.request("p1-overview", ms(50));
        assert_eq!(scroller.pending_target(), Some("p1-overview"));
        assert!(matches!(
            scroller.poll(&mut doc, ms(50)),
            FragmentPoll::Found { attempts: 1, .. }
        ));
    }

    #[test]
    fn request_url_without_fragment_is_ignored() {
        let mut scroller = FragmentScroller::default();
        assert_eq!(scroller.request_url("https://example.com/vr", ms(0)), Ok(false));
        assert_eq!(scroller.pending_target(), None);
        assert_eq!(scroller.request_url("https://example.com/vr#p1-intro", ms(0)), Ok(true));
        assert_eq!(scroller.pending_target(), Some("p1-intro"));
    }

    #[test]
    fn rejects_degenerate_policies() {
        let zero_attempts = FragmentScroller::new(RetryPolicy {
            max_attempts: 0,
            interval: ms(100),
        });
        assert!(zero_attempts.is_err());

        let zero_interval = RetryPolicy {
            max_attempts: 3,
            interval: Duration::ZERO,
        };
        assert!(zero_interval.validate().is_err_and(|error| error.is_configuration()));
    }
}
