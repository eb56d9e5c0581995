use vt_page::Breadcrumb;
use vt_page::CallToAction;
use vt_page::CaseSection;
use vt_page::CaseStudy;
use vt_page::HeroMedia;
use vt_page::Stat;

const SLUGS: [&str; 3] = ["full-stack", "computer-vision", "vr"];
const PLACEHOLDER_HERO: &str = "https://storage.googleapis.com/videobucker/newplaceholder.mp4";

pub(crate) fn slugs() -> Vec<&'static str> {
    SLUGS.to_vec()
}

pub(crate) fn find(slug: &str) -> Option<usize> {
    SLUGS.iter().position(|candidate| *candidate == slug)
}

/// Index of the study a breadcrumb path such as `/vr` points at.
pub(crate) fn find_by_path(path: &str) -> Option<usize> {
    find(path.trim_start_matches('/'))
}

/// Per-page namespace for section anchors.
pub(crate) fn id_prefix(index: usize) -> String {
    format!("p{}-", index.saturating_add(1))
}

pub(crate) fn case_studies() -> Vec<CaseStudy> {
    vec![full_stack(), computer_vision(), vr_training()]
}

fn breadcrumb(title: &str, slug: &str) -> Option<Breadcrumb> {
    Some(Breadcrumb {
        title: title.to_owned(),
        path: format!("/{slug}"),
    })
}

fn full_stack() -> CaseStudy {
    CaseStudy {
        slug: "full-stack".to_owned(),
        title: "Full-Stack Portal".to_owned(),
        hero: HeroMedia::from_source(PLACEHOLDER_HERO),
        gallery: vec![
            "/images/fs-snap1.jpg".to_owned(),
            "/images/fs-snap2.jpg".to_owned(),
            "/images/fs-snap3.jpg".to_owned(),
        ],
        gallery_index: 0,
        sections: vec![
            CaseSection::new(
                "overview",
                "Overview",
                "A web portal where analysts find, preview and request data assets.\n\
                 Each domain team owns its own backend service behind one catalog.",
            ),
            CaseSection::new(
                "features",
                "Features",
                "Single sign-on with role-based access.\n\
                 Lineage graphs update as pipelines run.\n\
                 Dataset previews render without leaving the search page.",
            ),
            CaseSection::new(
                "architecture",
                "Architecture",
                "Next.js front end over FastAPI services and Postgres.\n\
                 Containers ship through CI to a managed container runtime.",
            ),
            CaseSection::new(
                "results",
                "Results",
                "Around twelve thousand monthly users.\n\
                 Median request latency under one hundred milliseconds.",
            ),
        ],
        stats: vec![
            Stat::new("In production", "May 2023"),
            Stat::new("Users served", "12K monthly"),
            Stat::new("Tech stack", "Next.js, FastAPI, Postgres"),
            Stat::new("Latency", "99 ms avg"),
        ],
        cta: Some(CallToAction {
            label: "View repo".to_owned(),
            href: "https://github.com/example/fullstack".to_owned(),
        }),
        prev: None,
        next: breadcrumb("Edge Computer Vision", "computer-vision"),
    }
}

fn computer_vision() -> CaseStudy {
    CaseStudy {
        slug: "computer-vision".to_owned(),
        title: "Edge Computer Vision".to_owned(),
        hero: HeroMedia::from_source(PLACEHOLDER_HERO),
        gallery: vec![
            "/images/cv-board.jpg".to_owned(),
            "/images/cv-detect.jpg".to_owned(),
        ],
        gallery_index: 0,
        sections: vec![
            CaseSection::new(
                "overview",
                "Overview",
                "Detection models run on low-power boxes on site, so alerts never wait on the cloud.",
            ),
            CaseSection::new(
                "pipeline",
                "Pipeline",
                "Camera frames are batched on the device and scored in real time.\n\
                 New checkpoints roll out over the air in under two minutes.",
            ),
            CaseSection::new(
                "results",
                "Results",
                "Sixty frames per second sustained.\n\
                 Safety alerts raised in under half a second.",
            ),
        ],
        stats: vec![
            Stat::new("Launch", "Feb 2024"),
            Stat::new("Frames / sec", "60 FPS realtime"),
            Stat::new("Devices", "Jetson Xavier NX"),
        ],
        cta: Some(CallToAction {
            label: "Watch live demo".to_owned(),
            href: "https://example.com/live-demo".to_owned(),
        }),
        prev: breadcrumb("Full-Stack Portal", "full-stack"),
        next: breadcrumb("Immersive VR Training", "vr"),
    }
}

fn vr_training() -> CaseStudy {
    CaseStudy {
        slug: "vr".to_owned(),
        title: "Immersive VR Training".to_owned(),
        hero: HeroMedia::from_source("/images/vr-shot1.png"),
        gallery: Vec::new(),
        gallery_index: 0,
        sections: vec![
            CaseSection::new(
                "overview",
                "Overview",
                "A scenario-based module that teaches hazard awareness to forklift operators.",
            ),
            CaseSection::new(
                "simulation",
                "Simulation",
                "Full physics lets trainees try several mitigation strategies with no real-world risk.",
            ),
            CaseSection::new(
                "analytics",
                "Analytics",
                "Session data streams to an instructor dashboard.\n\
                 Weak spots are flagged per trainee.",
            ),
            CaseSection::new(
                "results",
                "Results",
                "Thirty operators in the pilot cohort.\n\
                 Retention up nineteen points against classroom training.",
            ),
        ],
        stats: vec![
            Stat::new("Pilot cohort", "30 forklift operators"),
            Stat::new("Retention lift", "+19 pts"),
            Stat::new("Engine", "Unity HDRP"),
            Stat::new("Launch", "Q1 2025"),
        ],
        cta: Some(CallToAction {
            label: "Book a walkthrough".to_owned(),
            href: "mailto:contact@example.com".to_owned(),
        }),
        prev: breadcrumb("Edge Computer Vision", "computer-vision"),
        next: None,
    }
}
