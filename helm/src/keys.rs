use serde::{Deserialize, Serialize};

/// Engine-free input key identity. The enclosing application translates its
/// own key events into these before calling into the helm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    Up,
    Down,
    Left,
    Right,
    Space,
    Shift,
    Ctrl,
}
