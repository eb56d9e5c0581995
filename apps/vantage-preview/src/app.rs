use crate::fixtures;
use eframe::egui;
use std::time::Duration;
use std::time::Instant;
use vt_page::CaseStudy;
use vt_page::Document;
use vt_page::ElementBox;
use vt_page::FragmentPoll;
use vt_page::NavLink;
use vt_page::ObserverConfig;
use vt_page::PageConfig;
use vt_page::PageSession;
use vt_page::SpyResult;

const INITIAL_VIEWPORT_HEIGHT: f32 = 640.0;
const FRAGMENT_POLL_INTERVAL: Duration = Duration::from_millis(50);
const SECTION_SPACING: f32 = 48.0;

/// Geometry measured while painting the scroll area.
#[derive(Debug, Default)]
struct PageLayout {
    viewport_height: f32,
    scroll_offset: f32,
    sections: Vec<(String, ElementBox)>,
    follow_path: Option<String>,
    gallery_pick: Option<usize>,
}

pub(crate) struct PreviewApp {
    studies: Vec<CaseStudy>,
    selected: usize,
    observer: ObserverConfig,
    session: PageSession,
    document: Document,
    started: Instant,
    scroll_request: Option<f32>,
    status_line: String,
    last_error: Option<String>,
}

impl PreviewApp {
    pub(crate) fn new(case: Option<&str>, fragment: Option<&str>) -> SpyResult<Self> {
        let studies = fixtures::case_studies();
        let selected = case.and_then(fixtures::find).unwrap_or_default();
        let observer = PageConfig::new(Vec::new()).with_env_overrides()?.observer;

        let document = Document::new(INITIAL_VIEWPORT_HEIGHT);
        let config = page_config(&studies, selected, &observer);
        let session = PageSession::mount(config, &document)?;

        let mut app = Self {
            studies,
            selected,
            observer,
            session,
            document,
            started: Instant::now(),
            scroll_request: None,
            status_line: String::new(),
            last_error: None,
        };

        if let Some(fragment) = fragment {
            let now = app.now();
            app.session.navigate_to_fragment(fragment, now);
        }
        tracing::info!(
            case = %app.current_slug(),
            root_margin = %app.observer.root_margin,
            "preview started"
        );
        Ok(app)
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn current_slug(&self) -> &str {
        self.studies
            .get(self.selected)
            .map(|study| study.slug.as_str())
            .unwrap_or_default()
    }

    fn select_case(&mut self, index: usize) {
        if index == self.selected || index >= self.studies.len() {
            return;
        }

        let viewport_height = self.document.viewport_height();
        let document = Document::new(viewport_height);
        let config = page_config(&self.studies, index, &self.observer);
        match self.session.reconfigure(config, &document) {
            Ok(()) => {
                self.selected = index;
                self.document = document;
                self.scroll_request = Some(0.0);
                self.last_error = None;
                tracing::info!(case = %self.current_slug(), "case study selected");
            }
            Err(error) => {
                tracing::warn!(%error, "case study rejected");
                self.last_error = Some(error.to_string());
            }
        }
    }

    fn pump(&mut self) {
        let now = self.now();
        let report = self.session.pump(&mut self.document, now);
        match &report.fragment {
            FragmentPoll::Found { .. } => {
                self.scroll_request = Some(self.document.scroll_top());
            }
            FragmentPoll::GaveUp { target, attempts } => {
                self.status_line = format!("Anchor #{target} not found after {attempts} attempts");
            }
            FragmentPoll::Idle | FragmentPoll::Pending { .. } => {}
        }
    }

    fn apply_layout(&mut self, layout: PageLayout) {
        self.document.set_viewport_height(layout.viewport_height);
        for (anchor, bounds) in layout.sections {
            if let Err(error) = self.document.upsert(&anchor, bounds) {
                tracing::warn!(%error, anchor = %anchor, "section not measured");
            }
        }
        self.document.scroll_to(layout.scroll_offset);

        if let Some(index) = layout.gallery_pick {
            if let Some(study) = self.studies.get_mut(self.selected) {
                study.select_gallery(index);
            }
        }

        if let Some(path) = layout.follow_path {
            if let Some(index) = fixtures::find_by_path(&path) {
                self.select_case(index);
            }
        }
    }

    fn active_label(&self) -> Option<&str> {
        let active = self.session.active_region_id()?;
        self.session.registry().label(active)
    }

    fn render_nav_rail(&mut self, ui: &mut egui::Ui) {
        ui.heading("Sections");
        ui.separator();

        let mut jump_to: Option<String> = None;
        for link in self.session.nav().links() {
            if ui.selectable_label(link.is_active(), &link.label).clicked() {
                jump_to = Some(link.href.clone());
            }
        }

        if let Some(href) = jump_to {
            let now = self.now();
            self.session.navigate_to_fragment(&href, now);
        }
    }

    fn render_page(&self, ui: &mut egui::Ui, scroll_request: Option<f32>) -> PageLayout {
        let mut layout = PageLayout::default();
        let Some(study) = self.studies.get(self.selected) else {
            ui.label("No case study selected.");
            return layout;
        };

        let mut area = egui::ScrollArea::vertical()
            .id_salt(("case_study_scroll", self.selected))
            .auto_shrink([false, false]);
        if let Some(offset) = scroll_request {
            area = area.vertical_scroll_offset(offset);
        }

        let output = area.show(ui, |ui| {
            let content_top = ui.max_rect().top();
            layout.gallery_pick = render_header(ui, study);

            for section in &study.sections {
                ui.add_space(SECTION_SPACING);
                let response = ui.vertical(|ui| {
                    ui.heading(&section.heading);
                    for paragraph in section.paragraphs() {
                        ui.label(paragraph);
                    }
                });
                let rect = response.response.rect;
                layout.sections.push((
                    self.session.config().prefixed(&section.id),
                    ElementBox::new(rect.top() - content_top, rect.height()),
                ));
            }

            ui.add_space(SECTION_SPACING);
            layout.follow_path = render_breadcrumbs(ui, study);
        });

        layout.viewport_height = output.inner_rect.height();
        layout.scroll_offset = output.state.offset.y;
        layout
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump();
        if self.session.pending_fragment().is_some() {
            ctx.request_repaint_after(FRAGMENT_POLL_INTERVAL);
        }

        egui::TopBottomPanel::top("case_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut selected = self.selected;
                for (index, study) in self.studies.iter().enumerate() {
                    ui.selectable_value(&mut selected, index, study.title.as_str());
                }
                if selected != self.selected {
                    self.select_case(selected);
                }
            });
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                match self.active_label() {
                    Some(label) => ui.label(format!("Active: {label}")),
                    None => ui.label("Active: none"),
                };
                if !self.status_line.is_empty() {
                    ui.separator();
                    ui.label(&self.status_line);
                }
                if let Some(error) = &self.last_error {
                    ui.colored_label(
                        egui::Color32::from_rgb(200, 65, 65),
                        format!("Error: {error}"),
                    );
                }
            });
        });

        if self.session.config().show_nav {
            egui::SidePanel::left("nav_rail")
                .resizable(false)
                .default_width(180.0)
                .show(ctx, |ui| {
                    self.render_nav_rail(ui);
                });
        }

        let scroll_request = self.scroll_request.take();
        let layout = egui::CentralPanel::default()
            .show(ctx, |ui| self.render_page(ui, scroll_request))
            .inner;
        self.apply_layout(layout);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.unmount();
    }
}

fn page_config(studies: &[CaseStudy], index: usize, observer: &ObserverConfig) -> PageConfig {
    let sections = studies
        .get(index)
        .map(CaseStudy::section_descriptors)
        .unwrap_or_default();
    PageConfig::new(sections)
        .with_prefix(fixtures::id_prefix(index))
        .with_observer(observer.clone())
}

/// Returns the gallery thumbnail clicked this frame, if any.
fn render_header(ui: &mut egui::Ui, study: &CaseStudy) -> Option<usize> {
    ui.heading(egui::RichText::new(study.title.as_str()).size(28.0).strong());
    let hero = study.displayed_hero();
    ui.horizontal(|ui| {
        let kind = if hero.is_video() { "video" } else { "image" };
        ui.weak(format!("Hero {kind}: {}", hero.source()));
    });

    let mut pick = None;
    if !study.gallery.is_empty() {
        ui.horizontal_wrapped(|ui| {
            for (index, image) in study.gallery.iter().enumerate() {
                let name = image.rsplit('/').next().unwrap_or(image.as_str());
                if ui
                    .selectable_label(index == study.gallery_index, name)
                    .clicked()
                {
                    pick = Some(index);
                }
            }
        });
    }

    egui::Frame::group(ui.style()).show(ui, |ui| {
        egui::Grid::new(("stats_grid", study.slug.as_str()))
            .num_columns(2)
            .spacing([24.0, 6.0])
            .show(ui, |ui| {
                for stat in &study.stats {
                    ui.label(egui::RichText::new(stat.label.as_str()).weak());
                    ui.label(stat.value.as_str());
                    ui.end_row();
                }
            });
    });

    if let Some(cta) = &study.cta {
        ui.hyperlink_to(cta.label.as_str(), cta.href.as_str());
    }
    pick
}

fn render_breadcrumbs(ui: &mut egui::Ui, study: &CaseStudy) -> Option<String> {
    if !study.has_breadcrumbs() {
        return None;
    }

    let mut follow = None;
    ui.separator();
    ui.horizontal(|ui| {
        if let Some(prev) = &study.prev {
            if ui.link(format!("< {}", prev.title)).clicked() {
                follow = Some(prev.path.clone());
            }
        }
        if let Some(next) = &study.next {
            if ui.link(format!("{} >", next.title)).clicked() {
                follow = Some(next.path.clone());
            }
        }
    });
    follow
}
