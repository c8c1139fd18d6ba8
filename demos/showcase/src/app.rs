//! One screen that tours the state primitives: remembered signals, a
//! window-title effect, an ambient color scheme with its updater, a node
//! ref driving focus, a memoized Fibonacci display, and a memoized
//! callback.

use std::rc::Rc;

use termpose_core::launched_effect;
use termpose_core::prelude::*;
use termpose_ui::*;

use crate::fib::{self, FibError};
use crate::palette::PaletteColor;

/// Shared color context: the current palette color plus its updater,
/// provided to the subtree as an ambient local.
#[derive(Clone)]
pub struct ColorScheme {
    pub color: PaletteColor,
    pub set_color: Rc<dyn Fn(PaletteColor)>,
}

pub fn app(_s: &mut Scheduler) -> View {
    let count = remember(|| signal(0u64));
    let count2 = remember(|| signal(0u64));
    let number_text = remember(|| signal(String::from("1")));

    // The host applies the title after this frame is committed.
    let n = count.get();
    launched_effect!(n, move || set_window_title(format!("Count: {n}")));

    let increment = {
        let count = count.clone();
        move || count.update(|c| *c += 1)
    };
    let increment_second = memo_callback(count2.get(), {
        let count2 = count2.clone();
        move || count2.update(|c| *c += 1)
    });

    let raw = number_text.get();

    Surface(
        Modifier::new().fill_max_size().background(theme().background),
        Column(Modifier::new().fill_max_size().padding(2.0).gap(1.0)).child((
            Row(Modifier::new().gap(2.0)).child((
                Text(format!("Count: {}", count.get())),
                Button("Increment", increment),
            )),
            Row(Modifier::new().gap(2.0)).child((
                Text("Fibonacci input:"),
                TextField(raw.clone(), "n", {
                    let number_text = number_text.clone();
                    move |t| number_text.set(t)
                })
                .modifier(Modifier::new().width(12.0)),
            )),
            FibPanel(&raw),
            ColorProvider(ColoredBox),
            FocusRow(),
            Row(Modifier::new().gap(2.0)).child((
                Text(format!("Second count: {}", count2.get())),
                Button("Increment (memoized)", move || increment_second()),
            )),
        )),
    )
}

/// Memoized Fibonacci readout. The computation runs once per distinct
/// parsed input; unchanged input across recompositions reuses the cache.
fn FibPanel(raw: &str) -> View {
    let parsed: Option<i64> = raw.trim().parse().ok();
    // memo composes unconditionally so the slots after this panel keep
    // their positions while the input fails to parse.
    let result = memo(parsed, move || parsed.map(fib::checked));

    match (parsed, result.as_ref()) {
        (None, _) | (_, None) => {
            Text(format!("{raw:?} is not a number; enter an integer")).color(theme().error)
        }
        (Some(n), Some(Ok(v))) => Text(format!("fib({n}) = {v}")),
        (Some(n), Some(Err(FibError::Negative))) => {
            Text(format!("fib({n}) is undefined for negative input")).color(theme().error)
        }
        (Some(n), Some(Err(FibError::Overflow(_)))) => {
            Text(format!("fib({n}) does not fit in a u64")).color(theme().error)
        }
    }
}

/// Owns the palette signal and provides [`ColorScheme`] to its content.
fn ColorProvider(content: impl FnOnce() -> View) -> View {
    let color = remember(|| signal(PaletteColor::default()));
    let current = color.get();

    disposable_effect(current, move || {
        log::debug!("palette color set to {current}");
        cleanup(move || log::debug!("palette color {current} replaced"))
    });

    let scheme = ColorScheme {
        color: current,
        set_color: {
            let color = color.clone();
            Rc::new(move |p| color.set(p))
        },
    };
    provide(scheme, content)
}

/// Reads the ambient [`ColorScheme`]; no state of its own.
fn ColoredBox() -> View {
    let Some(scheme) = ambient::<ColorScheme>() else {
        log::warn!("ColoredBox composed without a ColorScheme provider");
        return Text("no color scheme provided").color(theme().error);
    };

    let swatches = PaletteColor::ALL
        .iter()
        .map(|&p| {
            let set_color = scheme.set_color.clone();
            Button(p.label(), move || set_color(p))
        })
        .collect::<Vec<_>>();

    Column(
        Modifier::new()
            .background(scheme.color.color())
            .border(theme().outline)
            .padding(1.0)
            .gap(1.0),
    )
    .child((
        Text(format!("Current color: {}", scheme.color)).color(Color::BLACK),
        Row(Modifier::new().gap(1.0)).child(swatches),
    ))
}

/// A field plus a button that imperatively moves focus into it through a
/// remembered [`NodeRef`].
fn FocusRow() -> View {
    let field_ref = remember(NodeRef::new);
    let field_text = remember(|| signal(String::new()));

    let trigger = field_ref.as_ref().clone();
    Row(Modifier::new().gap(2.0)).child((
        TextField(field_text.get(), "type here", {
            let field_text = field_text.clone();
            move |t| field_text.set(t)
        })
        .modifier(Modifier::new().flex_grow(1.0).bind(field_ref.as_ref().clone())),
        Button("Focus input", move || trigger.focus()),
    ))
}
