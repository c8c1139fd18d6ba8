use taffy::{AlignItems, AlignSelf, JustifyContent};

use crate::color::Color;
use crate::geometry::Size;
use crate::node_ref::NodeRef;

/// One-cell border in the given color.
#[derive(Clone, Copy, Debug)]
pub struct Border {
    pub color: Color,
}

/// Declarative per-view layout and paint options. All lengths are terminal
/// cells.
#[derive(Clone, Default)]
pub struct Modifier {
    pub size: Option<Size>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub fill_max: bool,
    pub fill_max_w: bool,
    pub fill_max_h: bool,
    pub padding: Option<f32>,
    /// Gap between children on the container's main axis.
    pub gap: Option<f32>,
    pub background: Option<Color>,
    pub border: Option<Border>,
    pub flex_grow: Option<f32>,
    pub align_items: Option<AlignItems>,
    pub align_self: Option<AlignSelf>,
    pub justify_content: Option<JustifyContent>,
    /// Ref stamped with this view's id during layout.
    pub bind: Option<NodeRef>,
}

impl std::fmt::Debug for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modifier")
            .field("size", &self.size)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fill_max", &self.fill_max)
            .field("fill_max_w", &self.fill_max_w)
            .field("fill_max_h", &self.fill_max_h)
            .field("padding", &self.padding)
            .field("gap", &self.gap)
            .field("background", &self.background)
            .field("border", &self.border)
            .field("flex_grow", &self.flex_grow)
            .field("align_items", &self.align_items)
            .field("align_self", &self.align_self)
            .field("justify_content", &self.justify_content)
            .field("bind", &self.bind.as_ref().map(|_| "<ref>"))
            .finish()
    }
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, w: f32, h: f32) -> Self {
        self.size = Some(Size {
            width: w,
            height: h,
        });
        self
    }

    pub fn width(mut self, w: f32) -> Self {
        self.width = Some(w);
        self
    }

    pub fn height(mut self, h: f32) -> Self {
        self.height = Some(h);
        self
    }

    pub fn fill_max_size(mut self) -> Self {
        self.fill_max = true;
        self
    }

    pub fn fill_max_width(mut self) -> Self {
        self.fill_max_w = true;
        self
    }

    pub fn fill_max_height(mut self) -> Self {
        self.fill_max_h = true;
        self
    }

    pub fn padding(mut self, cells: f32) -> Self {
        self.padding = Some(cells);
        self
    }

    pub fn gap(mut self, cells: f32) -> Self {
        self.gap = Some(cells);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn border(mut self, color: Color) -> Self {
        self.border = Some(Border { color });
        self
    }

    pub fn flex_grow(mut self, grow: f32) -> Self {
        self.flex_grow = Some(grow);
        self
    }

    pub fn align_items(mut self, align: AlignItems) -> Self {
        self.align_items = Some(align);
        self
    }

    pub fn align_self(mut self, align: AlignSelf) -> Self {
        self.align_self = Some(align);
        self
    }

    pub fn justify_content(mut self, justify: JustifyContent) -> Self {
        self.justify_content = Some(justify);
        self
    }

    pub fn bind(mut self, node_ref: NodeRef) -> Self {
        self.bind = Some(node_ref);
        self
    }
}
