//! Visibility observation: reports activation-band crossings as event batches.
//!
//! The observer is sans-IO. The host calls [`VisibilityObserver::check`] after
//! layout or scroll changes; every target whose intersection state changed since
//! the previous check is reported in one batch over a channel, the same way a
//! platform intersection observer delivers its entries in one callback.

use std::sync::mpsc;
use vt_core::SpyResult;
use vt_core::Timestamp;
use vt_dom::Document;
use vt_dom::ElementHandle;
use vt_layout::ActivationBand;
use vt_layout::RootMargin;

/// One crossing of the activation band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityEvent {
    pub region_id: String,
    pub is_intersecting: bool,
    pub boundary_cross_time: Timestamp,
}

impl VisibilityEvent {
    pub fn new(region_id: impl Into<String>, is_intersecting: bool, at: Timestamp) -> Self {
        Self {
            region_id: region_id.into(),
            is_intersecting,
            boundary_cross_time: at,
        }
    }
}

/// Events produced by a single `check` call.
pub type VisibilityBatch = Vec<VisibilityEvent>;

/// Observer tuning.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObserverConfig {
    pub root_margin: RootMargin,
}

impl ObserverConfig {
    pub fn with_root_margin(root_margin: &str) -> SpyResult<Self> {
        Ok(Self {
            root_margin: RootMargin::parse(root_margin)?,
        })
    }
}

#[derive(Debug)]
struct Target {
    region_id: String,
    element: ElementHandle,
    last_intersecting: Option<bool>,
}

/// Watches region elements against the activation band.
#[derive(Debug)]
pub struct VisibilityObserver {
    config: ObserverConfig,
    targets: Vec<Target>,
    tx: Option<mpsc::Sender<VisibilityBatch>>,
}

/// Consumer side of [`visibility_channel`].
#[derive(Debug)]
pub struct VisibilityReceiver {
    rx: mpsc::Receiver<VisibilityBatch>,
}

impl VisibilityReceiver {
    /// Next queued batch, if any.
    pub fn try_next(&self) -> Option<VisibilityBatch> {
        self.rx.try_recv().ok()
    }

    /// All queued batches in delivery order.
    pub fn drain(&self) -> Vec<VisibilityBatch> {
        self.rx.try_iter().collect()
    }
}

/// Creates an observer paired with the receiver its batches are delivered to.
pub fn visibility_channel(config: ObserverConfig) -> (VisibilityObserver, VisibilityReceiver) {
    let (tx, rx) = mpsc::channel();
    tracing::debug!(root_margin = %config.root_margin, "visibility observer created");
    (
        VisibilityObserver {
            config,
            targets: Vec::new(),
            tx: Some(tx),
        },
        VisibilityReceiver { rx },
    )
}

impl VisibilityObserver {
    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    /// Starts watching `region_id`. A missing element is logged and ignored.
    pub fn observe(&mut self, region_id: &str, element: Option<ElementHandle>) {
        if self.is_disposed() {
            tracing::debug!(region_id, "observe after dispose ignored");
            return;
        }

        let Some(element) = element else {
            tracing::debug!(region_id, "element not mounted; region not observed yet");
            return;
        };

        if let Some(target) = self
            .targets
            .iter_mut()
            .find(|target| target.region_id == region_id)
        {
            if target.element != element {
                target.element = element;
                target.last_intersecting = None;
            }
            return;
        }

        tracing::trace!(region_id, element, "observing region");
        self.targets.push(Target {
            region_id: region_id.to_owned(),
            element,
            last_intersecting: None,
        });
    }

    pub fn unobserve(&mut self, region_id: &str) -> bool {
        let before = self.targets.len();
        self.targets.retain(|target| target.region_id != region_id);
        before != self.targets.len()
    }

    pub fn is_observing(&self, region_id: &str) -> bool {
        self.targets
            .iter()
            .any(|target| target.region_id == region_id)
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Evaluates every target and sends one batch with the ones that crossed
    /// the band. Returns the number of events sent.
    pub fn check(&mut self, document: &Document, now: Timestamp) -> usize {
        let Some(tx) = self.tx.as_ref() else {
            return 0;
        };

        let band = ActivationBand::for_document(document, &self.config.root_margin);
        let mut batch = VisibilityBatch::new();

        for target in &mut self.targets {
            let intersecting = document
                .bounds(target.element)
                .is_some_and(|bounds| band.intersects(&bounds));

            if target.last_intersecting == Some(intersecting) {
                continue;
            }

            target.last_intersecting = Some(intersecting);
            batch.push(VisibilityEvent::new(
                target.region_id.clone(),
                intersecting,
                now,
            ));
        }

        if batch.is_empty() {
            return 0;
        }

        let sent = batch.len();
        tracing::trace!(events = sent, "visibility batch emitted");
        if tx.send(batch).is_err() {
            tracing::debug!("visibility receiver dropped; disposing observer");
            self.dispose();
            return 0;
        }

        sent
    }

    /// Stops all observation. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.tx.take().is_none() {
            return;
        }
        self.targets.clear();
        tracing::debug!("visibility observer disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.tx.is_none()
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.dispose();
    }
}
