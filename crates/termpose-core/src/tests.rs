#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::color::Color;
    use crate::effects::{cleanup, disposable_effect};
    use crate::geometry::{Rect, Vec2};
    use crate::locals::{Theme, ambient, provide, theme};
    use crate::memo::{memo, memo_callback};
    use crate::node_ref::NodeRef;
    use crate::runtime::{
        ComposeGuard, HostRequest, remember, remember_with_key, request_focus,
        reset_composition, set_window_title, take_host_requests,
    };
    use crate::signal::signal;

    /// Runs one frame of composition, the way `Scheduler::compose` does.
    fn frame<R>(f: impl FnOnce() -> R) -> R {
        let _guard = ComposeGuard::begin();
        f()
    }

    #[test]
    fn signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);

        sig.with(|v| assert_eq!(*v, 101));
    }

    #[test]
    fn signal_subscription_fires_on_write() {
        let sig = signal(0);
        let seen = Rc::new(Cell::new(-1));

        let seen2 = seen.clone();
        sig.subscribe(move |v| seen2.set(*v));

        sig.set(42);
        assert_eq!(seen.get(), 42);
        sig.update(|v| *v += 1);
        assert_eq!(seen.get(), 43);
    }

    #[test]
    fn remember_keeps_value_across_frames() {
        reset_composition();

        let a = frame(|| remember(|| signal(7u64)));
        a.update(|v| *v += 1);
        let b = frame(|| remember(|| signal(0u64)));

        // Same slot, so the second initializer never ran.
        assert_eq!(b.get(), 8);
    }

    #[test]
    fn remember_state_is_mutable_across_frames() {
        reset_composition();

        let a = frame(|| crate::runtime::remember_state(|| vec![1, 2]));
        a.borrow_mut().push(3);
        let b = frame(|| crate::runtime::remember_state(Vec::<i32>::new));

        assert_eq!(*b.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn remember_with_key_ignores_later_initializers() {
        reset_composition();

        let first = remember_with_key("k", || 42);
        let second = remember_with_key("k", || 100);

        assert_eq!(*first, 42);
        assert_eq!(*second, 42);
    }

    #[test]
    fn memo_recomputes_once_per_distinct_key() {
        reset_composition();
        let runs = Rc::new(Cell::new(0u32));

        let render = |n: i64| {
            let runs = runs.clone();
            frame(|| {
                memo(n, move || {
                    runs.set(runs.get() + 1);
                    n * 2
                })
            })
        };

        assert_eq!(*render(3), 6);
        assert_eq!(*render(3), 6);
        assert_eq!(*render(3), 6);
        assert_eq!(runs.get(), 1);

        assert_eq!(*render(4), 8);
        assert_eq!(runs.get(), 2);

        // Going back to an earlier key is a key change, not a cache hit.
        assert_eq!(*render(3), 6);
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn memo_returns_same_allocation_for_same_key() {
        reset_composition();

        let a = frame(|| memo(1, || String::from("x")));
        let b = frame(|| memo(1, || String::from("x")));
        assert!(Rc::ptr_eq(&a, &b));

        let c = frame(|| memo(2, || String::from("x")));
        assert!(!Rc::ptr_eq(&a, &c));
    }

    #[test]
    fn memo_callback_identity_tracks_its_key() {
        reset_composition();

        let render = |n: u64| frame(|| memo_callback(n, move || {}));

        let a = render(0);
        let b = render(0);
        assert!(Rc::ptr_eq(&a, &b));

        let c = render(1);
        assert!(!Rc::ptr_eq(&b, &c));

        let d = render(1);
        assert!(Rc::ptr_eq(&c, &d));
    }

    #[test]
    fn memo_callback_invokes_latest_capture() {
        reset_composition();
        let hits = Rc::new(Cell::new(0u64));

        let render = |n: u64| {
            let hits = hits.clone();
            frame(|| memo_callback(n, move || hits.set(hits.get() + n)))
        };

        render(2)();
        assert_eq!(hits.get(), 2);
        render(5)();
        assert_eq!(hits.get(), 7);
    }

    #[test]
    fn disposable_effect_cleans_up_on_key_change() {
        reset_composition();
        let journal = Rc::new(std::cell::RefCell::new(Vec::new()));

        let render = |key: &'static str| {
            let journal = journal.clone();
            frame(|| {
                disposable_effect(key, move || {
                    journal.borrow_mut().push(format!("start {key}"));
                    let journal = journal.clone();
                    cleanup(move || journal.borrow_mut().push(format!("stop {key}")))
                })
            })
        };

        render("a");
        render("a");
        render("b");

        assert_eq!(
            *journal.borrow(),
            vec!["start a".to_string(), "stop a".into(), "start b".into()]
        );
    }

    #[test]
    fn launched_effect_runs_once_per_key() {
        reset_composition();
        let runs = Rc::new(Cell::new(0u32));

        let render = |key: u64| {
            let runs = runs.clone();
            frame(|| crate::launched_effect!(key, move || runs.set(runs.get() + 1)))
        };

        render(0);
        render(0);
        assert_eq!(runs.get(), 1);
        render(1);
        render(1);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn ambient_locals_nest_and_pop() {
        #[derive(Clone, PartialEq, Debug)]
        struct Accent(&'static str);

        assert_eq!(ambient::<Accent>(), None);

        provide(Accent("outer"), || {
            assert_eq!(ambient::<Accent>(), Some(Accent("outer")));
            provide(Accent("inner"), || {
                assert_eq!(ambient::<Accent>(), Some(Accent("inner")));
            });
            assert_eq!(ambient::<Accent>(), Some(Accent("outer")));
        });

        assert_eq!(ambient::<Accent>(), None);
    }

    #[test]
    fn theme_falls_back_to_default() {
        let fallback = theme();
        assert_eq!(fallback.on_surface, Theme::default().on_surface);

        let custom = Theme {
            on_surface: Color::from_hex("#112233"),
            ..Theme::default()
        };
        let seen = provide(custom, theme);
        assert_eq!(seen.on_surface, Color(0x11, 0x22, 0x33));
    }

    #[test]
    fn node_ref_resolves_only_in_the_binding_frame() {
        reset_composition();
        let node_ref = NodeRef::new();

        frame(|| node_ref.bind(17));
        // Still the binding frame: ComposeGuard has ended but no new frame
        // started, which is exactly when event callbacks run.
        assert_eq!(node_ref.resolve(), Some(17));

        // A frame that does not re-bind invalidates the handle.
        frame(|| ());
        assert_eq!(node_ref.resolve(), None);
    }

    #[test]
    fn node_ref_focus_is_noop_when_unmounted() {
        reset_composition();
        let node_ref = NodeRef::new();

        frame(|| node_ref.bind(5));
        node_ref.focus();
        assert_eq!(take_host_requests(), vec![HostRequest::Focus(5)]);

        frame(|| ());
        node_ref.focus();
        assert_eq!(take_host_requests(), vec![]);
    }

    #[test]
    fn host_requests_drain_in_order() {
        reset_composition();

        set_window_title("Count: 0");
        request_focus(3);
        set_window_title("Count: 1");

        assert_eq!(
            take_host_requests(),
            vec![
                HostRequest::SetTitle("Count: 0".into()),
                HostRequest::Focus(3),
                HostRequest::SetTitle("Count: 1".into()),
            ]
        );
        assert_eq!(take_host_requests(), vec![]);
    }

    #[test]
    fn color_from_hex() {
        assert_eq!(Color::from_hex("#FF5733"), Color(255, 87, 51));
        assert_eq!(Color::from_hex("90EE90"), Color(0x90, 0xEE, 0x90));
        assert_eq!(Color::from_hex("#bad"), Color::BLACK);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
        };

        assert!(rect.contains(Vec2 { x: 10.0, y: 10.0 }));
        assert!(rect.contains(Vec2 { x: 50.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 110.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 50.0, y: 60.0 }));
    }
}
