//! Viewport geometry: root-margin parsing and the activation band it produces.

use core::fmt;
use core::str::FromStr;
use vt_core::SpyError;
use vt_core::SpyResult;
use vt_dom::Document;
use vt_dom::ElementBox;

/// Root margin that collapses the viewport to its vertical centre line.
pub const CENTER_LINE_MARGIN: &str = "-50% 0px -50% 0px";

/// Rounding slack, in units of `f32::EPSILON` relative to the band position.
const LINE_TOLERANCE_ULPS: f32 = 8.0;

/// One inset length from a root-margin shorthand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginLength {
    Px(f32),
    Percent(f32),
}

impl MarginLength {
    /// Resolves against the viewport extent along the same axis.
    pub fn resolve(self, extent: f32) -> f32 {
        match self {
            Self::Px(value) => value,
            Self::Percent(value) => extent * value / 100.0,
        }
    }

    fn parse_token(token: &str) -> SpyResult<Self> {
        let invalid = || {
            SpyError::new(
                "config.root_margin_invalid",
                format!("margin value `{token}` must be `0`, `<n>px` or `<n>%`"),
            )
        };

        if token == "0" {
            return Ok(Self::Px(0.0));
        }

        let (number, percent) = if let Some(number) = token.strip_suffix('%') {
            (number, true)
        } else if let Some(number) = token.strip_suffix("px") {
            (number, false)
        } else {
            return Err(invalid());
        };

        let value: f32 = number.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }

        Ok(if percent {
            Self::Percent(value)
        } else {
            Self::Px(value)
        })
    }
}

impl fmt::Display for MarginLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(value) => write!(f, "{value}px"),
            Self::Percent(value) => write!(f, "{value}%"),
        }
    }
}

/// Insets applied to the viewport before intersection testing.
///
/// Positive values grow the observed area, negative values shrink it, following
/// the `rootMargin` shorthand (`top [right [bottom [left]]]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl RootMargin {
    pub fn zero() -> Self {
        let zero = MarginLength::Px(0.0);
        Self {
            top: zero,
            right: zero,
            bottom: zero,
            left: zero,
        }
    }

    pub fn center_line() -> Self {
        Self {
            top: MarginLength::Percent(-50.0),
            right: MarginLength::Px(0.0),
            bottom: MarginLength::Percent(-50.0),
            left: MarginLength::Px(0.0),
        }
    }

    pub fn parse(input: &str) -> SpyResult<Self> {
        let tokens: Vec<&str> = input.split_ascii_whitespace().collect();
        let values = tokens
            .iter()
            .map(|token| MarginLength::parse_token(token))
            .collect::<SpyResult<Vec<_>>>()?;

        let (top, right, bottom, left) = match values.as_slice() {
            [] => {
                return Err(SpyError::new(
                    "config.root_margin_empty",
                    "root margin must contain at least one value",
                ));
            }
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => {
                return Err(SpyError::new(
                    "config.root_margin_too_many",
                    format!(
                        "root margin accepts at most four values, got {}",
                        values.len()
                    ),
                ));
            }
        };

        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::center_line()
    }
}

impl FromStr for RootMargin {
    type Err = SpyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Visible slice of the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f32,
    pub height: f32,
}

impl Viewport {
    pub fn of(document: &Document) -> Self {
        Self {
            top: document.scroll_top(),
            height: document.viewport_height(),
        }
    }
}

/// Document-space range an element must touch to count as "in view".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationBand {
    pub top: f32,
    pub bottom: f32,
}

impl ActivationBand {
    /// Resolves the band for `viewport`. Insets that close the band up to float
    /// rounding snap it to a line at their midpoint.
    pub fn resolve(viewport: Viewport, margin: &RootMargin) -> Self {
        let top = viewport.top - margin.top.resolve(viewport.height);
        let bottom = viewport.top + viewport.height + margin.bottom.resolve(viewport.height);
        if closes(top, bottom) {
            let line = top + (bottom - top) / 2.0;
            return Self {
                top: line,
                bottom: line,
            };
        }
        Self { top, bottom }
    }

    pub fn for_document(document: &Document, margin: &RootMargin) -> Self {
        Self::resolve(Viewport::of(document), margin)
    }

    /// True when the band has collapsed to a single activation line.
    pub fn is_line(&self) -> bool {
        closes(self.top, self.bottom)
    }

    /// True when the insets overlap by more than rounding error.
    pub fn is_inverted(&self) -> bool {
        self.bottom < self.top && !self.is_line()
    }

    pub fn intersects(&self, bounds: &ElementBox) -> bool {
        if bounds.height <= 0.0 || self.is_inverted() {
            return false;
        }

        if self.is_line() {
            let line = self.top + (self.bottom - self.top) / 2.0;
            return bounds.top <= line && line < bounds.bottom();
        }

        bounds.top < self.bottom && bounds.bottom() > self.top
    }
}

fn closes(top: f32, bottom: f32) -> bool {
    let scale = top.abs().max(bottom.abs()).max(1.0);
    (bottom - top).abs() <= scale * f32::EPSILON * LINE_TOLERANCE_ULPS
}
