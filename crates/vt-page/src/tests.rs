use crate::FragmentPoll;
use crate::PageConfig;
use crate::PageSession;
use crate::SectionDescriptor;
use proptest::prelude::*;
use std::time::Duration;
use vt_dom::Document;
use vt_dom::ElementBox;
use vt_nav::NavLink;

const VIEWPORT: f32 = 400.0;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn case_config(prefix: &str) -> PageConfig {
    PageConfig::new(vec![
        SectionDescriptor::new("overview", "Overview"),
        SectionDescriptor::new("features", "Features"),
        SectionDescriptor::new("results", "Results"),
    ])
    .with_prefix(prefix)
}

/// Sections 400px tall with 100px gaps between them.
fn gapped_page(anchors: &[&str]) -> Document {
    let mut doc = Document::new(VIEWPORT);
    for (index, anchor) in anchors.iter().enumerate() {
        let mounted = doc.mount(anchor, ElementBox::new(index as f32 * 500.0, 400.0));
        assert!(mounted.is_ok());
    }
    doc
}

fn mount(config: PageConfig, doc: &Document) -> PageSession {
    let session: Result<PageSession, _> = PageSession::mount(config, doc);
    session.unwrap_or_else(|_| unreachable!())
}

fn active_links(session: &PageSession) -> Vec<String> {
    session
        .nav()
        .links()
        .filter(|link| link.is_active())
        .map(|link| link.target().to_owned())
        .collect()
}

#[test]
fn scroll_sequence_tracks_center_line_and_sticks_in_gaps() {
    let mut doc = gapped_page(&["p1-overview", "p1-features", "p1-results"]);
    let mut session = mount(case_config("p1-"), &doc);

    session.pump(&mut doc, ms(0));
    assert_eq!(session.active_region_id(), Some("p1-overview"));
    assert_eq!(active_links(&session), vec!["p1-overview"]);

    doc.scroll_to(350.0);
    let report = session.pump(&mut doc, ms(16));
    assert_eq!(report.activated, vec!["p1-features".to_owned()]);
    assert_eq!(active_links(&session), vec!["p1-features"]);

    // Center line sits in the gap between features and results.
    doc.scroll_to(750.0);
    let report = session.pump(&mut doc, ms(32));
    assert_eq!(report.events_emitted, 1);
    assert!(!report.active_changed());
    assert_eq!(session.active_region_id(), Some("p1-features"));
    assert_eq!(active_links(&session), vec!["p1-features"]);

    doc.scroll_to(850.0);
    session.pump(&mut doc, ms(48));
    assert_eq!(session.active_region_id(), Some("p1-results"));
    assert_eq!(active_links(&session), vec!["p1-results"]);
}

#[test]
fn fractional_viewport_still_activates_center_section() {
    let mut doc = Document::new(300.3);
    for (index, anchor) in ["p1-overview", "p1-features", "p1-results"]
        .iter()
        .enumerate()
    {
        let mounted = doc.mount(anchor, ElementBox::new(index as f32 * 500.0, 500.0));
        assert!(mounted.is_ok());
    }
    let mut session = mount(case_config("p1-"), &doc);

    doc.scroll_to(2.74);
    let report = session.pump(&mut doc, ms(0));
    assert_eq!(report.activated, vec!["p1-overview".to_owned()]);

    doc.scroll_to(351.37);
    session.pump(&mut doc, ms(16));
    assert_eq!(session.active_region_id(), Some("p1-features"));
    assert_eq!(active_links(&session), vec!["p1-features"]);
}

#[test]
fn fast_scroll_past_short_section_activates_landing_region() {
    let mut doc = gapped_page(&["p1-overview", "p1-features", "p1-results"]);
    let mut session = mount(case_config("p1-"), &doc);
    session.pump(&mut doc, ms(0));

    doc.scroll_to(900.0);
    let report = session.pump(&mut doc, ms(16));
    assert_eq!(report.activated, vec!["p1-results".to_owned()]);
    assert_eq!(active_links(&session), vec!["p1-results"]);
}

#[test]
fn unmounted_session_ignores_dom_changes() {
    let mut doc = gapped_page(&["p1-overview", "p1-features", "p1-results"]);
    let mut session = mount(case_config("p1-"), &doc);
    session.pump(&mut doc, ms(0));
    session.unmount();

    doc.scroll_to(850.0);
    let handle = doc
        .element_by_anchor("p1-overview")
        .unwrap_or_else(|| unreachable!());
    assert!(doc.unmount(handle));
    let remounted = doc.mount("p1-overview", ElementBox::new(1000.0, 400.0));
    assert!(remounted.is_ok());

    let report = session.pump(&mut doc, ms(16));
    assert_eq!(report.events_emitted, 0);
    assert_eq!(report.fragment, FragmentPoll::Idle);
    assert_eq!(session.observer().target_count(), 0);
    assert_eq!(session.active_region_id(), Some("p1-overview"));
}

#[test]
fn fragment_target_mounted_late_is_found_on_retry() {
    let mut doc = gapped_page(&["p1-overview", "p1-features"]);
    let mut session = mount(case_config("p1-"), &doc);

    let requested = session.navigate_to_url("https://example.com/vr#p1-results", ms(0));
    assert_eq!(requested, Ok(true));

    for at in [0, 100, 200] {
        let report = session.pump(&mut doc, ms(at));
        assert!(matches!(report.fragment, FragmentPoll::Pending { .. }));
    }
    assert_eq!(session.active_region_id(), Some("p1-overview"));

    let mounted = doc.mount("p1-results", ElementBox::new(1000.0, 400.0));
    assert!(mounted.is_ok());

    let report = session.pump(&mut doc, ms(250));
    assert!(matches!(
        report.fragment,
        FragmentPoll::Pending { attempts: 3, .. }
    ));

    let report = session.pump(&mut doc, ms(300));
    assert!(matches!(
        report.fragment,
        FragmentPoll::Found { ref target, attempts: 4, .. } if target == "p1-results"
    ));
    assert_eq!(doc.scroll_top(), 1000.0);
    assert_eq!(report.activated, vec!["p1-results".to_owned()]);
    assert_eq!(active_links(&session), vec!["p1-results"]);
    assert_eq!(session.pending_fragment(), None);
}

#[test]
fn fragment_that_never_mounts_gives_up_quietly() {
    let mut doc = gapped_page(&["p1-overview"]);
    let mut session = mount(case_config("p1-"), &doc);
    session.navigate_to_fragment("#p1-appendix", ms(0));

    let mut last = FragmentPoll::Idle;
    for step in 0..10 {
        last = session.pump(&mut doc, ms(step * 100)).fragment;
    }
    assert!(matches!(last, FragmentPoll::GaveUp { attempts: 10, .. }));
    assert_eq!(doc.scroll_top(), 0.0);
    assert_eq!(session.active_region_id(), Some("p1-overview"));
}

#[test]
fn reconfigure_switches_page_and_drops_old_state() {
    let mut doc = gapped_page(&["p1-overview", "p1-features", "p1-results"]);
    let mut session = mount(case_config("p1-"), &doc);
    session.pump(&mut doc, ms(0));
    assert_eq!(session.active_region_id(), Some("p1-overview"));

    let mut next = gapped_page(&["p2-overview", "p2-features", "p2-results"]);
    next.scroll_to(350.0);
    let reconfigured = session.reconfigure(case_config("p2-"), &next);
    assert!(reconfigured.is_ok());
    assert_eq!(session.active_region_id(), None);
    assert!(active_links(&session).is_empty());
    assert!(!session.registry().contains("p1-overview"));

    let report = session.pump(&mut next, ms(16));
    assert_eq!(report.batches_applied, 1);
    assert_eq!(report.activated, vec!["p2-features".to_owned()]);
    assert_eq!(active_links(&session), vec!["p2-features"]);
}

#[test]
fn region_mounted_after_session_is_picked_up() {
    let mut doc = gapped_page(&["p1-overview"]);
    let mut session = mount(case_config("p1-"), &doc);
    session.pump(&mut doc, ms(0));
    assert_eq!(session.observer().target_count(), 1);

    let mounted = doc.mount("p1-features", ElementBox::new(500.0, 400.0));
    assert!(mounted.is_ok());
    doc.scroll_to(350.0);
    session.pump(&mut doc, ms(16));
    assert_eq!(session.observer().target_count(), 2);
    assert_eq!(session.active_region_id(), Some("p1-features"));
}

#[test]
fn hidden_nav_still_tracks_active_region() {
    let mut doc = gapped_page(&["p1-overview", "p1-features", "p1-results"]);
    let mut config = case_config("p1-");
    config.show_nav = false;
    let mut session = mount(config, &doc);

    session.pump(&mut doc, ms(0));
    assert!(session.nav().is_empty());
    assert_eq!(session.active_region_id(), Some("p1-overview"));
}

proptest! {
    #[test]
    fn prop_at_most_one_nav_link_active(
        offsets in proptest::collection::vec(0.0_f32..1200.0, 1..24)
    ) {
        let mut doc = gapped_page(&["p1-overview", "p1-features", "p1-results"]);
        let mut session = mount(case_config("p1-"), &doc);

        for (frame, offset) in offsets.into_iter().enumerate() {
            doc.scroll_to(offset);
            session.pump(&mut doc, ms(frame as u64 * 16));

            let active = active_links(&session);
            prop_assert!(active.len() <= 1);
            if let Some(link) = active.first() {
                prop_assert_eq!(Some(link.as_str()), session.active_region_id());
            }
        }
    }
}
