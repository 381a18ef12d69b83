use crate::models::AyahRef;

/// Visible slice of the reading view, in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Bounding box of one laid-out ayah element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AyahBox {
    pub ayah: AyahRef,
    pub top: f64,
    pub bottom: f64,
}

impl AyahBox {
    pub fn new(ayah: AyahRef, top: f64, bottom: f64) -> Self {
        Self { ayah, top, bottom }
    }
}

/// The ayah whose box crosses the vertical midpoint of the viewport. When
/// several cross it (tight line spacing, basmala headers), the one furthest
/// down in reading order wins.
pub fn ayah_at_midpoint(viewport: Viewport, boxes: &[AyahBox]) -> Option<AyahRef> {
    let mid = viewport.midpoint();
    boxes
        .iter()
        .filter(|b| b.top <= mid && mid < b.bottom)
        .map(|b| b.ayah)
        .max()
}
