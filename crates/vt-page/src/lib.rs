//! Sectioned-page scroll tracking.
//!
//! A [`PageSession`] owns the region registry, visibility observer, active-section
//! tracker, nav sink and fragment scroller for one page view. The host feeds it
//! document geometry and a clock through [`PageSession::pump`].

mod case_study;
mod config;
mod session;
#[cfg(test)]
mod tests;

pub use case_study::Breadcrumb;
pub use case_study::CallToAction;
pub use case_study::CaseSection;
pub use case_study::CaseStudy;
pub use case_study::HeroMedia;
pub use case_study::Stat;
pub use config::FALLBACK_SECTION_ID;
pub use config::PageConfig;
pub use config::ROOT_MARGIN_ENV;
pub use session::PageSession;
pub use session::PumpReport;

pub use vt_core::SpyError;
pub use vt_core::SpyResult;
pub use vt_core::Timestamp;
pub use vt_dom::Document;
pub use vt_dom::ElementBox;
pub use vt_fragment::FragmentPoll;
pub use vt_fragment::RetryPolicy;
pub use vt_layout::RootMargin;
pub use vt_nav::AnchorLink;
pub use vt_nav::NavItem;
pub use vt_nav::NavLink;
pub use vt_observer::ObserverConfig;
pub use vt_registry::SectionDescriptor;
pub use vt_tracker::ActiveState;
