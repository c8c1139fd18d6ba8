use std::rc::Rc;

use crate::color::Color;
use crate::geometry::Rect;
use crate::modifier::Modifier;

pub type ViewId = u64;

pub type Callback = Rc<dyn Fn()>;

#[derive(Clone)]
pub enum ViewKind {
    Surface,
    Box,
    Row,
    Column,
    Text {
        text: String,
        /// `None` paints with the ambient theme's `on_surface`.
        color: Option<Color>,
    },
    Button {
        label: String,
        on_click: Option<Callback>,
    },
    TextField {
        /// Controlled value: the owner writes it back through `on_change`.
        value: String,
        hint: String,
        on_change: Option<Rc<dyn Fn(String)>>,
    },
}

impl std::fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Surface => write!(f, "Surface"),
            ViewKind::Box => write!(f, "Box"),
            ViewKind::Row => write!(f, "Row"),
            ViewKind::Column => write!(f, "Column"),
            ViewKind::Text { text, color } => f
                .debug_struct("Text")
                .field("text", text)
                .field("color", color)
                .finish(),
            ViewKind::Button { label, .. } => f
                .debug_struct("Button")
                .field("label", label)
                .field("on_click", &"<callback>")
                .finish(),
            ViewKind::TextField { value, hint, .. } => f
                .debug_struct("TextField")
                .field("value", value)
                .field("hint", hint)
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    /// Stamped by layout; zero until then.
    pub id: ViewId,
    pub kind: ViewKind,
    pub modifier: Modifier,
    pub children: Vec<View>,
    pub semantics: Option<crate::semantics::Semantics>,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        View {
            id: 0,
            kind,
            modifier: Modifier::default(),
            children: vec![],
            semantics: None,
        }
    }

    pub fn modifier(mut self, m: Modifier) -> Self {
        self.modifier = m;
        self
    }

    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }

    pub fn semantics(mut self, s: crate::semantics::Semantics) -> Self {
        self.semantics = Some(s);
        self
    }
}

/// Paint list for one frame, in cell coordinates.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub clear_color: Color,
    pub nodes: Vec<SceneNode>,
}

#[derive(Clone, Debug)]
pub enum SceneNode {
    /// Filled rectangle.
    Rect { rect: Rect, color: Color },
    /// One-cell box-drawing border along the rectangle's perimeter.
    Border { rect: Rect, color: Color },
    /// Single line of text; the background of the cells underneath is kept.
    Text {
        rect: Rect,
        text: String,
        color: Color,
    },
}
