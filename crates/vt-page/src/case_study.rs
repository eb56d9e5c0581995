//! Case-study page model.

use crate::config::PageConfig;
use vt_registry::SectionDescriptor;

const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".mov", ".gif"];

/// Label/value pair shown in the stats card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

impl Stat {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One navigable section of a case study.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSection {
    pub id: String,
    pub heading: String,
    pub body: String,
}

impl CaseSection {
    pub fn new(id: impl Into<String>, heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            heading: heading.into(),
            body: body.into(),
        }
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.body
            .split('\n')
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
    }

    pub fn descriptor(&self) -> SectionDescriptor {
        SectionDescriptor::new(self.id.clone(), self.heading.clone())
    }
}

/// Hero media for the right-hand rail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroMedia {
    Video(String),
    Image(String),
}

impl HeroMedia {
    pub fn from_source(source: impl Into<String>) -> Self {
        let source = source.into();
        let path = strip_query_and_fragment(&source).to_ascii_lowercase();
        if VIDEO_EXTENSIONS
            .iter()
            .any(|extension| path.ends_with(extension))
        {
            Self::Video(source)
        } else {
            Self::Image(source)
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Self::Video(source) | Self::Image(source) => source,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallToAction {
    pub label: String,
    pub href: String,
}

/// Link to a neighbouring case study.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseStudy {
    pub slug: String,
    pub title: String,
    pub hero: HeroMedia,
    /// Thumbnail image URLs; the selected one replaces the hero.
    pub gallery: Vec<String>,
    pub gallery_index: usize,
    pub sections: Vec<CaseSection>,
    pub stats: Vec<Stat>,
    pub cta: Option<CallToAction>,
    pub prev: Option<Breadcrumb>,
    pub next: Option<Breadcrumb>,
}

impl CaseStudy {
    pub fn section_descriptors(&self) -> Vec<SectionDescriptor> {
        self.sections.iter().map(CaseSection::descriptor).collect()
    }

    /// Page configuration whose regions are this study's sections.
    pub fn page_config(&self, id_prefix: &str) -> PageConfig {
        PageConfig::new(self.section_descriptors()).with_prefix(id_prefix)
    }

    /// Media shown in the hero slot: the selected gallery image, or the hero
    /// itself when the gallery is empty.
    pub fn displayed_hero(&self) -> HeroMedia {
        match self.gallery.get(self.gallery_index) {
            Some(image) => HeroMedia::Image(image.clone()),
            None => self.hero.clone(),
        }
    }

    /// Selects a gallery thumbnail. Out-of-range indices are ignored.
    pub fn select_gallery(&mut self, index: usize) -> bool {
        if index >= self.gallery.len() || index == self.gallery_index {
            return false;
        }
        self.gallery_index = index;
        true
    }

    pub fn has_breadcrumbs(&self) -> bool {
        self.prev.is_some() || self.next.is_some()
    }
}

fn strip_query_and_fragment(url: &str) -> &str {
    let before_fragment = match url.split_once('#') {
        Some((head, _)) => head,
        None => url,
    };
    match before_fragment.split_once('?') {
        Some((head, _)) => head,
        None => before_fragment,
    }
}
