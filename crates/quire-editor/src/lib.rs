pub mod drag;
pub mod events;
pub mod focus;
pub mod history;
pub mod input;
pub mod session;
pub mod shortcuts;

pub use drag::{DragCommit, DragController, DragUpdate, SnapPoint, SplitGeometry};
pub use events::{EditorEvent, EventBus, Renderer, SubscriptionId};
pub use focus::FocusNavigator;
pub use history::History;
pub use input::{InputEvent, Modifiers};
pub use session::Editor;
pub use shortcuts::{ShortcutAction, ShortcutMap};
