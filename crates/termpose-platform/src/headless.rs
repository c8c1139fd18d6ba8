//! Headless driver: the platform's compose/dispatch cycle as a library,
//! with no terminal attached. Integration tests use it to click buttons,
//! type into fields, and observe frames, semantics, and title updates.

use termpose_core::prelude::{
    Event, Frame, Key, KeyEvent, Role, Scene, Scheduler, SemNode, Vec2, View, ViewId,
};
use termpose_core::runtime::reset_composition;

use crate::Session;

pub struct Headless {
    session: Session,
    root: Box<dyn FnMut(&mut Scheduler) -> View>,
    /// Window titles in the order the app set them.
    pub titles: Vec<String>,
}

impl Headless {
    /// Starts a fresh composition (any slot state left on this thread is
    /// dropped) and composes the first frame.
    pub fn new(size: (u16, u16), root: impl FnMut(&mut Scheduler) -> View + 'static) -> Self {
        reset_composition();
        let mut this = Self {
            session: Session::new(size),
            root: Box::new(root),
            titles: Vec::new(),
        };
        this.render();
        this
    }

    /// Composes a frame and applies its staged host effects.
    pub fn render(&mut self) -> &Frame {
        self.session.compose(&mut *self.root);
        let Self {
            session, titles, ..
        } = self;
        session.apply_host_requests(|t| titles.push(t.to_owned()));
        self.frame()
    }

    pub fn frame(&self) -> &Frame {
        self.session
            .frame
            .as_ref()
            .expect("no frame composed yet — call render()")
    }

    pub fn scene(&self) -> &Scene {
        &self.frame().scene
    }

    pub fn semantics(&self) -> &[SemNode] {
        &self.frame().semantics_nodes
    }

    /// All text in the frame, in paint order, newline separated.
    pub fn screen_text(&self) -> String {
        self.scene()
            .nodes
            .iter()
            .filter_map(|n| match n {
                termpose_core::prelude::SceneNode::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.session.sched.focused
    }

    pub fn focused_role(&self) -> Option<Role> {
        let fid = self.focused()?;
        self.semantics()
            .iter()
            .find(|s| s.id == fid)
            .map(|s| s.role)
    }

    pub fn last_title(&self) -> Option<&str> {
        self.titles.last().map(String::as_str)
    }

    /// Routes one raw event against the current frame, then recomposes.
    pub fn dispatch(&mut self, event: Event) {
        self.session.dispatch(event);
        self.render();
    }

    pub fn button_id(&self, label: &str) -> Option<ViewId> {
        self.semantics()
            .iter()
            .find(|s| s.role == Role::Button && s.label.as_deref() == Some(label))
            .map(|s| s.id)
    }

    /// Clicks the button with the given label. Panics when no such button
    /// is on screen, the way a test should fail.
    pub fn click(&mut self, label: &str) {
        let id = self
            .button_id(label)
            .unwrap_or_else(|| panic!("no button labeled {label:?} on screen"));
        let center = self
            .frame()
            .hit_regions
            .iter()
            .find(|h| h.id == id)
            .unwrap_or_else(|| panic!("button {label:?} has no hit region"))
            .rect
            .center();
        self.click_at(center.x, center.y);
    }

    pub fn click_at(&mut self, x: f32, y: f32) {
        let p = Vec2 { x, y };
        self.session.dispatch(Event::MouseDown(p));
        self.session.dispatch(Event::MouseUp(p));
        self.render();
    }

    pub fn key(&mut self, key: Key) {
        self.dispatch(Event::Key(KeyEvent::plain(key)));
    }

    /// Types into the focused field, recomposing after every key so each
    /// edit sees the committed value of the previous one.
    pub fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            self.key(Key::Char(c));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use termpose_core::prelude::*;
    use termpose_ui::*;

    use super::*;

    fn counter_app(s: &mut Scheduler) -> View {
        let _ = s;
        let count = remember(|| signal(0u64));
        let text = remember(|| signal(String::new()));
        Surface(
            Modifier::new().fill_max_size(),
            Column(Modifier::new().gap(1.0).padding(1.0)).child((
                Text(format!("clicks: {}", count.get())),
                Button("Add", {
                    let count = count.clone();
                    move || count.update(|c| *c += 1)
                }),
                TextField(text.get(), "name", {
                    let text = text.clone();
                    move |t| text.set(t)
                }),
                Text(format!("typed: {}", text.get())),
            )),
        )
    }

    #[test]
    fn click_updates_state_on_next_frame() {
        let mut h = Headless::new((40, 12), counter_app);
        assert!(h.screen_text().contains("clicks: 0"));

        h.click("Add");
        h.click("Add");
        assert!(h.screen_text().contains("clicks: 2"));
    }

    #[test]
    fn tab_cycles_focus_through_focusables() {
        let mut h = Headless::new((40, 12), counter_app);
        assert_eq!(h.focused(), None);

        h.key(Key::Tab);
        assert_eq!(h.focused_role(), Some(Role::Button));
        h.key(Key::Tab);
        assert_eq!(h.focused_role(), Some(Role::TextField));
        h.key(Key::Tab);
        assert_eq!(h.focused_role(), Some(Role::Button));
        h.key(Key::BackTab);
        assert_eq!(h.focused_role(), Some(Role::TextField));
    }

    #[test]
    fn typing_flows_through_on_change() {
        let mut h = Headless::new((40, 12), counter_app);
        h.key(Key::Tab);
        h.key(Key::Tab);
        assert_eq!(h.focused_role(), Some(Role::TextField));

        h.type_str("hi");
        assert!(h.screen_text().contains("typed: hi"));
        h.key(Key::Backspace);
        assert!(h.screen_text().contains("typed: h"));
    }

    #[test]
    fn clicking_a_field_focuses_it_and_empty_space_unfocuses() {
        let mut h = Headless::new((40, 12), counter_app);

        let field = h
            .frame()
            .hit_regions
            .iter()
            .find(|r| r.field_text.is_some())
            .map(|r| (r.id, r.rect.center()))
            .expect("field on screen");
        h.click_at(field.1.x, field.1.y);
        assert_eq!(h.focused(), Some(field.0));

        h.click_at(39.0, 11.0);
        assert_eq!(h.focused(), None);
    }

    #[test]
    fn enter_activates_the_focused_button() {
        let clicks = Rc::new(Cell::new(0u32));
        let clicks2 = clicks.clone();
        let mut h = Headless::new((40, 8), move |_| {
            let clicks = clicks2.clone();
            Surface(
                Modifier::new().fill_max_size(),
                Column(Modifier::new()).child(Button("Go", move || clicks.set(clicks.get() + 1))),
            )
        });

        h.key(Key::Tab);
        h.key(Key::Enter);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn release_outside_the_pressed_region_does_not_click() {
        let clicks = Rc::new(Cell::new(0u32));
        let clicks2 = clicks.clone();
        let mut h = Headless::new((40, 8), move |_| {
            let clicks = clicks2.clone();
            Surface(
                Modifier::new().fill_max_size(),
                Column(Modifier::new()).child(Button("Go", move || clicks.set(clicks.get() + 1))),
            )
        });

        let center = h
            .frame()
            .hit_regions
            .first()
            .map(|h| h.rect.center())
            .expect("hit region");
        h.dispatch(Event::MouseDown(center));
        h.dispatch(Event::MouseUp(Vec2 { x: 39.0, y: 7.0 }));
        assert_eq!(clicks.get(), 0);
    }
}
