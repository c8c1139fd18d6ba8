#![allow(non_snake_case)]
//! Widgets, layout and painting.
//!
//! Widget functions build [`View`] trees; [`layout_and_paint`] turns a tree
//! into a [`Scene`] plus hit regions and semantics for one terminal frame.
//! All coordinates are cells.

pub mod textfield;

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use taffy::prelude::*;
use taffy::style::{AlignItems, Display, FlexDirection, JustifyContent, Style};
use termpose_core::locals::theme;
use termpose_core::prelude::{
    Color, HitRegion, Modifier, Rect, Role, Scene, SceneNode, SemNode, Semantics, View, ViewId,
    ViewKind,
};
use unicode_width::UnicodeWidthStr;

/// Transient pointer state owned by the platform and fed back into paint.
#[derive(Default)]
pub struct Interactions {
    pub hover: Option<ViewId>,
    pub pressed: HashSet<ViewId>,
}

pub fn Surface(modifier: Modifier, child: View) -> View {
    let mut v = View::new(ViewKind::Surface).modifier(modifier);
    v.children = vec![child];
    v
}

pub fn Box(modifier: Modifier) -> View {
    View::new(ViewKind::Box).modifier(modifier)
}

pub fn Row(modifier: Modifier) -> View {
    View::new(ViewKind::Row).modifier(modifier)
}

pub fn Column(modifier: Modifier) -> View {
    View::new(ViewKind::Column).modifier(modifier)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(ViewKind::Text {
        text: text.into(),
        color: None,
    })
}

pub fn Spacer() -> View {
    Box(Modifier::new().flex_grow(1.0))
}

pub fn Button(label: impl Into<String>, on_click: impl Fn() + 'static) -> View {
    View::new(ViewKind::Button {
        label: label.into(),
        on_click: Some(Rc::new(on_click)),
    })
    .semantics(Semantics::new(Role::Button))
}

pub fn TextField(
    value: impl Into<String>,
    hint: impl Into<String>,
    on_change: impl Fn(String) + 'static,
) -> View {
    View::new(ViewKind::TextField {
        value: value.into(),
        hint: hint.into(),
        on_change: Some(Rc::new(on_change)),
    })
    .semantics(Semantics::new(Role::TextField))
}

/// Post-construction styling for `Text` views.
pub trait TextStyleExt {
    fn color(self, color: Color) -> View;
}

impl TextStyleExt for View {
    fn color(mut self, c: Color) -> View {
        if let ViewKind::Text { color, .. } = &mut self.kind {
            *color = Some(c);
        }
        self
    }
}

pub trait ViewChildren {
    fn child(self, children: impl IntoChildren) -> View;
}

impl ViewChildren for View {
    fn child(self, children: impl IntoChildren) -> View {
        self.with_children(children.into_children())
    }
}

pub trait IntoChildren {
    fn into_children(self) -> Vec<View>;
}

impl IntoChildren for View {
    fn into_children(self) -> Vec<View> {
        vec![self]
    }
}

impl IntoChildren for Vec<View> {
    fn into_children(self) -> Vec<View> {
        self
    }
}

impl<const N: usize> IntoChildren for [View; N] {
    fn into_children(self) -> Vec<View> {
        self.into()
    }
}

macro_rules! impl_into_children_tuple {
    ($($idx:tt $t:ident),+) => {
        impl<$($t: IntoChildren),+> IntoChildren for ($($t,)+) {
            fn into_children(self) -> Vec<View> {
                let mut v = Vec::new();
                $(v.extend(self.$idx.into_children());)+
                v
            }
        }
    };
}

impl_into_children_tuple!(0 A, 1 B);
impl_into_children_tuple!(0 A, 1 B, 2 C);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);

fn cell_width(text: &str) -> f32 {
    UnicodeWidthStr::width(text) as f32
}

/// Lays out `root` for a `size.0 x size.1` cell grid and paints it.
///
/// Besides the scene this produces the frame's interactive surface: hit
/// regions in paint order (later entries are on top) and flattened
/// semantics. Ids are stamped depth-first here, and `Modifier::bind` refs
/// are bound to the stamped ids for this frame.
pub fn layout_and_paint(
    root: &View,
    size: (u16, u16),
    interactions: &Interactions,
    focused: Option<ViewId>,
) -> (Scene, Vec<HitRegion>, Vec<SemNode>) {
    fn stamp(mut v: View, next: &mut ViewId) -> View {
        v.id = *next;
        *next += 1;
        if let Some(r) = &v.modifier.bind {
            r.bind(v.id);
        }
        v.children = v.children.into_iter().map(|c| stamp(c, next)).collect();
        v
    }
    let mut next_id: ViewId = 1;
    let root = stamp(root.clone(), &mut next_id);

    // Per-node measurement context.
    #[derive(Clone)]
    enum NodeCtx {
        Text { width: f32 },
        Button { width: f32 },
        TextField { min_width: f32 },
        Container,
    }

    fn style_from_modifier(m: &Modifier, kind: &ViewKind) -> Style {
        let mut s = Style {
            display: Display::Flex,
            ..Style::default()
        };

        s.flex_direction = match kind {
            ViewKind::Row => FlexDirection::Row,
            _ => FlexDirection::Column,
        };

        let is_container = matches!(
            kind,
            ViewKind::Surface | ViewKind::Box | ViewKind::Row | ViewKind::Column
        );
        s.align_items = if is_container {
            Some(AlignItems::Stretch)
        } else {
            Some(AlignItems::FlexStart)
        };
        s.justify_content = Some(JustifyContent::FlexStart);

        if let Some(g) = m.flex_grow {
            s.flex_grow = g;
        }
        if let Some(a) = m.align_items {
            s.align_items = Some(a);
        }
        if let Some(a) = m.align_self {
            s.align_self = Some(a);
        }
        if let Some(j) = m.justify_content {
            s.justify_content = Some(j);
        }

        if let Some(p) = m.padding {
            let v = length(p.max(0.0));
            s.padding = taffy::geometry::Rect {
                left: v,
                right: v,
                top: v,
                bottom: v,
            };
        }

        if let Some(g) = m.gap {
            let v = length(g.max(0.0));
            s.gap = taffy::geometry::Size {
                width: v,
                height: v,
            };
        }

        // Explicit size first, then fill.
        let mut width_set = false;
        let mut height_set = false;
        if let Some(sz) = m.size {
            s.size.width = length(sz.width.max(0.0));
            s.size.height = length(sz.height.max(0.0));
            width_set = true;
            height_set = true;
        }
        if let Some(w) = m.width {
            s.size.width = length(w.max(0.0));
            width_set = true;
        }
        if let Some(h) = m.height {
            s.size.height = length(h.max(0.0));
            height_set = true;
        }
        if (m.fill_max || m.fill_max_w) && !width_set {
            s.size.width = percent(1.0);
        }
        if (m.fill_max || m.fill_max_h) && !height_set {
            s.size.height = percent(1.0);
        }

        s
    }

    let mut taffy: TaffyTree<NodeCtx> = TaffyTree::new();
    let mut nodes: HashMap<ViewId, taffy::NodeId> = HashMap::new();

    fn build_node(
        v: &View,
        t: &mut TaffyTree<NodeCtx>,
        nodes: &mut HashMap<ViewId, taffy::NodeId>,
        style_of: &dyn Fn(&Modifier, &ViewKind) -> Style,
    ) -> taffy::NodeId {
        let style = style_of(&v.modifier, &v.kind);
        let node = match &v.kind {
            ViewKind::Text { text, .. } => t
                .new_leaf_with_context(
                    style,
                    NodeCtx::Text {
                        width: cell_width(text),
                    },
                )
                .unwrap(),
            ViewKind::Button { label, .. } => t
                .new_leaf_with_context(
                    style,
                    NodeCtx::Button {
                        // "[ " + label + " ]"
                        width: cell_width(label) + 4.0,
                    },
                )
                .unwrap(),
            ViewKind::TextField { value, hint, .. } => t
                .new_leaf_with_context(
                    style,
                    NodeCtx::TextField {
                        min_width: (cell_width(value).max(cell_width(hint)) + 2.0).max(12.0),
                    },
                )
                .unwrap(),
            _ => {
                let children: Vec<_> = v
                    .children
                    .iter()
                    .map(|c| build_node(c, t, nodes, style_of))
                    .collect();
                let n = t.new_with_children(style, &children).unwrap();
                t.set_node_context(n, Some(NodeCtx::Container)).ok();
                n
            }
        };
        nodes.insert(v.id, node);
        node
    }

    let root_node = build_node(&root, &mut taffy, &mut nodes, &style_from_modifier);

    {
        let mut rs = taffy.style(root_node).unwrap().clone();
        rs.size.width = length(size.0 as f32);
        rs.size.height = length(size.1 as f32);
        taffy.set_style(root_node, rs).unwrap();
    }

    let available = taffy::geometry::Size {
        width: AvailableSpace::Definite(size.0 as f32),
        height: AvailableSpace::Definite(size.1 as f32),
    };

    taffy
        .compute_layout_with_measure(root_node, available, |known, _avail, _node, ctx, _style| {
            match ctx {
                Some(NodeCtx::Text { width }) => taffy::geometry::Size {
                    width: known.width.unwrap_or(*width),
                    height: known.height.unwrap_or(1.0),
                },
                Some(NodeCtx::Button { width }) => taffy::geometry::Size {
                    width: known.width.unwrap_or(*width),
                    height: known.height.unwrap_or(1.0),
                },
                Some(NodeCtx::TextField { min_width }) => taffy::geometry::Size {
                    width: known.width.unwrap_or(*min_width),
                    height: known.height.unwrap_or(1.0),
                },
                Some(NodeCtx::Container) | None => taffy::geometry::Size::ZERO,
            }
        })
        .unwrap();

    fn layout_of(node: taffy::NodeId, t: &TaffyTree<impl Clone>) -> Rect {
        let l = t.layout(node).unwrap();
        Rect {
            x: l.location.x,
            y: l.location.y,
            w: l.size.width,
            h: l.size.height,
        }
    }

    {
        let content = layout_of(root_node, &taffy);
        if content.h > size.1 as f32 + 0.5 || content.w > size.0 as f32 + 0.5 {
            log::debug!(
                "content ({}x{}) overflows the terminal ({}x{})",
                content.w,
                content.h,
                size.0,
                size.1
            );
        }
    }

    let mut scene = Scene {
        clear_color: theme().background,
        nodes: vec![],
    };
    let mut hits: Vec<HitRegion> = vec![];
    let mut sems: Vec<SemNode> = vec![];

    // Single line of text, vertically centered in its rect.
    fn push_line(scene: &mut Scene, rect: Rect, text: &str, color: Color) {
        let y = rect.y + ((rect.h - 1.0).max(0.0) / 2.0).floor();
        scene.nodes.push(SceneNode::Text {
            rect: Rect {
                x: rect.x,
                y,
                w: rect.w,
                h: 1.0,
            },
            text: text.to_owned(),
            color,
        });
    }

    fn walk(
        v: &View,
        taffy: &TaffyTree<impl Clone>,
        nodes: &HashMap<ViewId, taffy::NodeId>,
        scene: &mut Scene,
        hits: &mut Vec<HitRegion>,
        sems: &mut Vec<SemNode>,
        interactions: &Interactions,
        focused: Option<ViewId>,
        parent_origin: (f32, f32),
    ) {
        let local = layout_of(nodes[&v.id], taffy);
        let rect = Rect {
            x: local.x + parent_origin.0,
            y: local.y + parent_origin.1,
            ..local
        };

        let is_pressed = interactions.pressed.contains(&v.id);
        let is_hovered = interactions.hover == Some(v.id);
        let is_focused = focused == Some(v.id);

        if let Some(bg) = v.modifier.background {
            scene.nodes.push(SceneNode::Rect { rect, color: bg });
        }
        if let Some(b) = &v.modifier.border {
            scene.nodes.push(SceneNode::Border {
                rect,
                color: b.color,
            });
        }

        match &v.kind {
            ViewKind::Text { text, color } => {
                push_line(scene, rect, text, color.unwrap_or(theme().on_surface));
                sems.push(SemNode {
                    id: v.id,
                    role: Role::Text,
                    label: Some(text.clone()),
                    rect,
                    focused: is_focused,
                });
            }

            ViewKind::Button { label, on_click } => {
                let th = theme();
                let bg = if is_focused {
                    th.focus
                } else if is_pressed {
                    th.button_bg_pressed
                } else if is_hovered {
                    th.button_bg_hover
                } else {
                    v.modifier.background.unwrap_or(th.button_bg)
                };
                scene.nodes.push(SceneNode::Rect { rect, color: bg });

                let caption = format!("[ {label} ]");
                let tx = rect.x + ((rect.w - cell_width(&caption)).max(0.0) / 2.0).floor();
                push_line(
                    scene,
                    Rect { x: tx, ..rect },
                    &caption,
                    th.on_primary,
                );

                hits.push(HitRegion {
                    id: v.id,
                    rect,
                    on_click: on_click.clone(),
                    focusable: true,
                    field_text: None,
                    on_text_change: None,
                });
                sems.push(SemNode {
                    id: v.id,
                    role: Role::Button,
                    label: Some(label.clone()),
                    rect,
                    focused: is_focused,
                });
            }

            ViewKind::TextField {
                value,
                hint,
                on_change,
            } => {
                let th = theme();
                let bg = if is_focused {
                    th.field_bg_focused
                } else {
                    th.field_bg
                };
                scene.nodes.push(SceneNode::Rect { rect, color: bg });

                let inner = Rect {
                    x: rect.x + 1.0,
                    w: (rect.w - 2.0).max(0.0),
                    ..rect
                };
                if value.is_empty() {
                    push_line(scene, inner, hint, th.hint);
                } else {
                    push_line(scene, inner, value, th.on_surface);
                }

                hits.push(HitRegion {
                    id: v.id,
                    rect,
                    on_click: None,
                    focusable: true,
                    field_text: Some(value.clone()),
                    on_text_change: on_change.clone(),
                });
                sems.push(SemNode {
                    id: v.id,
                    role: Role::TextField,
                    label: Some(hint.clone()),
                    rect,
                    focused: is_focused,
                });
            }

            ViewKind::Surface | ViewKind::Box | ViewKind::Row | ViewKind::Column => {
                for child in &v.children {
                    walk(
                        child,
                        taffy,
                        nodes,
                        scene,
                        hits,
                        sems,
                        interactions,
                        focused,
                        (rect.x, rect.y),
                    );
                }
            }
        }
    }

    walk(
        &root,
        &taffy,
        &nodes,
        &mut scene,
        &mut hits,
        &mut sems,
        interactions,
        focused,
        (0.0, 0.0),
    );

    (scene, hits, sems)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn sem<'a>(sems: &'a [SemNode], role: Role, label: &str) -> &'a SemNode {
        sems.iter()
            .find(|s| s.role == role && s.label.as_deref() == Some(label))
            .unwrap_or_else(|| panic!("no {role:?} labeled {label:?}"))
    }

    #[test]
    fn column_stacks_children_vertically() {
        let root = Surface(
            Modifier::new().fill_max_size(),
            Column(Modifier::new().gap(1.0)).child((Text("first"), Text("second"))),
        );
        let (_, _, sems) = layout_and_paint(&root, (40, 12), &Interactions::default(), None);

        let a = sem(&sems, Role::Text, "first").rect;
        let b = sem(&sems, Role::Text, "second").rect;
        assert_eq!(a.h, 1.0);
        assert!(b.y >= a.y + a.h + 1.0, "gap not applied: {a:?} vs {b:?}");
    }

    #[test]
    fn row_places_children_side_by_side() {
        let root = Surface(
            Modifier::new().fill_max_size(),
            Row(Modifier::new().gap(2.0)).child((Text("ab"), Text("cd"))),
        );
        let (_, _, sems) = layout_and_paint(&root, (40, 12), &Interactions::default(), None);

        let a = sem(&sems, Role::Text, "ab").rect;
        let b = sem(&sems, Role::Text, "cd").rect;
        assert_eq!(a.y, b.y);
        assert!(b.x >= a.x + 2.0 + 2.0);
    }

    #[test]
    fn button_emits_hit_region_and_focus_chain_entry() {
        let clicks = Rc::new(Cell::new(0));
        let clicks2 = clicks.clone();
        let root = Surface(
            Modifier::new().fill_max_size(),
            Column(Modifier::new()).child(Button("Go", move || clicks2.set(clicks2.get() + 1))),
        );
        let (_, hits, sems) = layout_and_paint(&root, (40, 12), &Interactions::default(), None);

        let id = sem(&sems, Role::Button, "Go").id;
        let hit = hits.iter().find(|h| h.id == id).expect("button hit region");
        assert!(hit.focusable);
        assert!(hit.rect.w >= cell_width("Go") + 4.0);

        hit.on_click.as_ref().expect("click handler")();
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn text_field_carries_its_current_text() {
        let root = Surface(
            Modifier::new().fill_max_size(),
            Column(Modifier::new()).child(TextField("42", "n", |_| {})),
        );
        let (_, hits, sems) = layout_and_paint(&root, (40, 12), &Interactions::default(), None);

        let id = sem(&sems, Role::TextField, "n").id;
        let hit = hits.iter().find(|h| h.id == id).unwrap();
        assert_eq!(hit.field_text.as_deref(), Some("42"));
        assert!(hit.on_text_change.is_some());
    }

    #[test]
    fn focused_view_is_marked_in_semantics() {
        let build = || {
            Surface(
                Modifier::new().fill_max_size(),
                Column(Modifier::new()).child((Button("A", || {}), Button("B", || {}))),
            )
        };
        let (_, _, sems) = layout_and_paint(&build(), (40, 12), &Interactions::default(), None);
        let b = sem(&sems, Role::Button, "B").id;

        let (_, _, sems) = layout_and_paint(&build(), (40, 12), &Interactions::default(), Some(b));
        assert!(sem(&sems, Role::Button, "B").focused);
        assert!(!sem(&sems, Role::Button, "A").focused);
    }

    #[test]
    fn bound_ref_resolves_to_stamped_id() {
        use termpose_core::prelude::NodeRef;
        use termpose_core::runtime::ComposeGuard;

        let _guard = ComposeGuard::begin();
        let r = NodeRef::new();
        let root = Surface(
            Modifier::new().fill_max_size(),
            Column(Modifier::new())
                .child(TextField("", "n", |_| {}).modifier(Modifier::new().bind(r.clone()))),
        );
        let (_, _, sems) = layout_and_paint(&root, (40, 12), &Interactions::default(), None);

        let id = sem(&sems, Role::TextField, "n").id;
        assert_eq!(r.resolve(), Some(id));
    }
}
