pub use crate::color::Color;
pub use crate::effects::{Dispose, cleanup, disposable_effect};
pub use crate::geometry::{Rect, Size, Vec2};
pub use crate::input::{Event, Key, KeyEvent, KeyModifiers};
pub use crate::locals::{Theme, ambient, provide, theme, with_theme};
pub use crate::memo::{memo, memo_callback};
pub use crate::modifier::Modifier;
pub use crate::node_ref::NodeRef;
pub use crate::runtime::{
    ComposeGuard, Frame, HitRegion, HostRequest, Scheduler, SemNode, remember, remember_state,
    remember_with_key, request_focus, set_window_title,
};
pub use crate::semantics::{Role, Semantics};
pub use crate::signal::{Signal, signal};
pub use crate::view::{Scene, SceneNode, View, ViewId, ViewKind};
pub use taffy::{AlignItems, AlignSelf, JustifyContent};
