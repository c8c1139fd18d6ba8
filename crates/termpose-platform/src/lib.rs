//! Terminal runner for termpose apps.
//!
//! [`run_terminal_app`] owns the terminal: raw mode, alternate screen,
//! mouse capture, and the compose → paint → dispatch loop. Host requests
//! staged during composition (window title, focus moves) are applied only
//! after the frame that produced them has been flushed, so a side effect is
//! never observable before its frame.
//!
//! The same compose/dispatch cycle is available without a terminal through
//! [`headless::Headless`], which integration tests use to click buttons and
//! type into fields.

pub mod headless;
pub mod renderer;

use std::collections::HashMap;
use std::io::{self, Write};

use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CtEvent, KeyCode, KeyEventKind,
    KeyModifiers as CtModifiers, MouseButton, MouseEventKind,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
};
use crossterm::{execute, queue};
use termpose_core::prelude::{
    Event, Frame, Key, KeyEvent, KeyModifiers, Scheduler, Vec2, View, ViewId,
};
use termpose_core::runtime::{HostRequest, take_host_requests};
use termpose_ui::{Interactions, layout_and_paint, textfield};
use unicode_width::UnicodeWidthStr;

use crate::renderer::TermRenderer;

/// Compose and dispatch state shared by the terminal loop and the headless
/// driver. The platform owns what the composition does not: focus, pointer
/// interaction state, and text-field carets (keyed by stamped view id).
pub(crate) struct Session {
    pub sched: Scheduler,
    pub interactions: Interactions,
    pub carets: HashMap<ViewId, usize>,
    pub frame: Option<Frame>,
    pressed_id: Option<ViewId>,
}

impl Session {
    pub fn new(size: (u16, u16)) -> Self {
        let mut sched = Scheduler::new();
        sched.size = size;
        Self {
            sched,
            interactions: Interactions::default(),
            carets: HashMap::new(),
            frame: None,
            pressed_id: None,
        }
    }

    pub fn compose(&mut self, root: &mut (dyn FnMut(&mut Scheduler) -> View + '_)) {
        let interactions = &self.interactions;
        let focused = self.sched.focused;
        let frame = self.sched.compose(root, |view, size| {
            layout_and_paint(view, size, interactions, focused)
        });
        self.frame = Some(frame);
    }

    /// Applies the host requests staged by the frame just composed. Titles
    /// go to `on_title`; focus moves are validated against the frame's
    /// focus chain.
    pub fn apply_host_requests(&mut self, mut on_title: impl FnMut(&str)) {
        for req in take_host_requests() {
            match req {
                HostRequest::SetTitle(title) => on_title(&title),
                HostRequest::Focus(id) => {
                    let known = self
                        .frame
                        .as_ref()
                        .is_some_and(|f| f.focus_chain.contains(&id));
                    if known {
                        self.sched.focused = Some(id);
                    } else {
                        log::warn!("focus request for view {id} outside the focus chain");
                    }
                }
            }
        }
    }

    fn hit_at(&self, p: Vec2) -> Option<&termpose_core::prelude::HitRegion> {
        // Later regions paint on top, so they win the hit test.
        self.frame
            .as_ref()?
            .hit_regions
            .iter()
            .rev()
            .find(|h| h.rect.contains(p))
    }

    /// Routes one event against the current frame. Returns `true` when the
    /// app should exit.
    pub fn dispatch(&mut self, event: Event) -> bool {
        match event {
            Event::Resize(w, h) => self.sched.size = (w, h),
            Event::MouseMove(p) => {
                self.interactions.hover = self.hit_at(p).map(|h| h.id);
            }
            Event::MouseDown(p) => match self.hit_at(p).map(|h| (h.id, h.focusable)) {
                Some((id, focusable)) => {
                    if focusable {
                        self.sched.focused = Some(id);
                    }
                    self.pressed_id = Some(id);
                    self.interactions.pressed.insert(id);
                }
                // Clicking empty space drops focus.
                None => self.sched.focused = None,
            },
            Event::MouseUp(p) => {
                let target = self.hit_at(p).map(|h| (h.id, h.on_click.clone()));
                if let (Some(pressed), Some((id, on_click))) = (self.pressed_id.take(), target)
                    && pressed == id
                    && let Some(cb) = on_click
                {
                    cb();
                }
                self.pressed_id = None;
                self.interactions.pressed.clear();
            }
            Event::Key(ev) => return self.dispatch_key(ev),
        }
        false
    }

    fn dispatch_key(&mut self, ev: KeyEvent) -> bool {
        if ev.key == Key::Esc
            || (ev.key == Key::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL))
        {
            return true;
        }
        if matches!(ev.key, Key::Tab | Key::BackTab) {
            self.cycle_focus(ev.key == Key::BackTab);
            return false;
        }

        let Some(fid) = self.sched.focused else {
            return false;
        };
        let Some((on_click, on_text_change, field_text)) = self.frame.as_ref().and_then(|f| {
            f.hit_regions
                .iter()
                .find(|h| h.id == fid)
                .map(|h| (h.on_click.clone(), h.on_text_change.clone(), h.field_text.clone()))
        }) else {
            return false;
        };

        if let Some(on_change) = on_text_change {
            let current = field_text.unwrap_or_default();
            let caret = self.carets.get(&fid).copied().unwrap_or(current.len());
            if let Some(edit) = textfield::apply_key(&current, caret, &ev) {
                self.carets.insert(fid, edit.caret);
                if edit.text != current {
                    on_change(edit.text);
                }
            }
        } else if matches!(ev.key, Key::Enter | Key::Char(' '))
            && let Some(cb) = on_click
        {
            // Keyboard activation for focused buttons.
            cb();
        }
        false
    }

    fn cycle_focus(&mut self, backwards: bool) {
        let next = {
            let Some(frame) = &self.frame else { return };
            let chain = &frame.focus_chain;
            if chain.is_empty() {
                return;
            }
            match self
                .sched
                .focused
                .and_then(|f| chain.iter().position(|&id| id == f))
            {
                Some(i) => {
                    let len = chain.len();
                    if backwards {
                        chain[(i + len - 1) % len]
                    } else {
                        chain[(i + 1) % len]
                    }
                }
                None if backwards => chain[chain.len() - 1],
                None => chain[0],
            }
        };
        self.sched.focused = Some(next);
    }

    /// Cell position for the terminal cursor: inside the focused text
    /// field, at the caret.
    fn cursor_target(&self) -> Option<(u16, u16)> {
        let frame = self.frame.as_ref()?;
        let fid = self.sched.focused?;
        let hit = frame.hit_regions.iter().find(|h| h.id == fid)?;
        let text = hit.field_text.as_ref()?;
        let caret = textfield::clamp_caret(text, self.carets.get(&fid).copied().unwrap_or(text.len()));
        let x = hit.rect.x + 1.0 + UnicodeWidthStr::width(&text[..caret]) as f32;
        let max_x = (hit.rect.x + hit.rect.w - 1.0).max(hit.rect.x);
        Some((x.min(max_x) as u16, hit.rect.y as u16))
    }
}

fn convert_event(ct: CtEvent) -> Option<Event> {
    match ct {
        CtEvent::Key(k) if k.kind != KeyEventKind::Release => {
            let key = match k.code {
                KeyCode::Char(c) => Key::Char(c),
                KeyCode::Enter => Key::Enter,
                KeyCode::Tab => Key::Tab,
                KeyCode::BackTab => Key::BackTab,
                KeyCode::Backspace => Key::Backspace,
                KeyCode::Delete => Key::Delete,
                KeyCode::Left => Key::Left,
                KeyCode::Right => Key::Right,
                KeyCode::Home => Key::Home,
                KeyCode::End => Key::End,
                KeyCode::Esc => Key::Esc,
                _ => return None,
            };
            let mut modifiers = KeyModifiers::empty();
            if k.modifiers.contains(CtModifiers::SHIFT) {
                modifiers |= KeyModifiers::SHIFT;
            }
            if k.modifiers.contains(CtModifiers::CONTROL) {
                modifiers |= KeyModifiers::CONTROL;
            }
            if k.modifiers.contains(CtModifiers::ALT) {
                modifiers |= KeyModifiers::ALT;
            }
            Some(Event::Key(KeyEvent { key, modifiers }))
        }
        CtEvent::Mouse(m) => {
            let p = Vec2 {
                x: m.column as f32,
                y: m.row as f32,
            };
            match m.kind {
                MouseEventKind::Down(MouseButton::Left) => Some(Event::MouseDown(p)),
                MouseEventKind::Up(MouseButton::Left) => Some(Event::MouseUp(p)),
                MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                    Some(Event::MouseMove(p))
                }
                _ => None,
            }
        }
        CtEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

/// Runs a termpose app in the current terminal until Esc (or Ctrl+C).
pub fn run_terminal_app(mut root: impl FnMut(&mut Scheduler) -> View + 'static) -> Result<()> {
    let size = crossterm::terminal::size().unwrap_or((80, 24));
    let mut session = Session::new(size);

    enable_raw_mode()?;
    let mut out = io::stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture, Hide)?;

    let result = run_loop(&mut session, &mut root, &mut out);

    execute!(out, Show, DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result
}

fn run_loop(
    session: &mut Session,
    root: &mut (dyn FnMut(&mut Scheduler) -> View + '_),
    out: &mut io::Stdout,
) -> Result<()> {
    let mut renderer = TermRenderer::new();

    loop {
        session.compose(root);

        let (w, h) = session.sched.size;
        if let Some(frame) = &session.frame {
            let buf = renderer::paint(&frame.scene, w, h);
            renderer.flush(out, &buf)?;
        }
        match session.cursor_target() {
            Some((x, y)) => queue!(out, MoveTo(x, y), Show)?,
            None => queue!(out, Hide)?,
        }
        out.flush()?;

        // Committed: now the frame's host effects may become visible.
        let mut title_result = Ok(());
        session.apply_host_requests(|title| {
            if title_result.is_ok() {
                title_result = execute!(io::stdout(), SetTitle(title));
            }
        });
        title_result?;

        let raw = crossterm::event::read()?;
        if matches!(raw, CtEvent::Resize(..)) {
            renderer.invalidate();
        }
        if let Some(event) = convert_event(raw)
            && session.dispatch(event)
        {
            return Ok(());
        }
    }
}
