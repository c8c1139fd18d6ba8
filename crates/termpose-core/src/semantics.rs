/// High-level semantic role of a view, similar to ARIA roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Text,
    Button,
    TextField,
    Container,
}

/// Semantics attached to a `View`; the flattened per-frame list is the
/// source of truth for tests and assistive tooling.
#[derive(Clone, Debug)]
pub struct Semantics {
    pub role: Role,
    /// Accessible name. For buttons this is the announced label.
    pub label: Option<String>,
    pub focused: bool,
    pub enabled: bool,
}

impl Semantics {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            label: None,
            focused: false,
            enabled: true,
        }
    }
}
