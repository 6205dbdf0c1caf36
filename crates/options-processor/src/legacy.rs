//! Migration of legacy animation payloads
//!
//! Older payloads described a command animation as a single view animation
//! (`showModal: { enabled, translationY }`), or a stack animation with bare
//! per-view animations (`push: { content: { alpha } }`). The current shape
//! splits each into `enter` and `exit` halves. Every payload is classified
//! first and only legacy shapes are rewritten, so already migrated payloads
//! pass through untouched.

use serde_json::{Map, Value};

/// Views animated separately by stack commands
const STACK_VIEWS: [&str; 3] = ["content", "topBar", "bottomTabs"];

/// Keys copied from a legacy `setStackRoot` animation to the stack level
const STACK_ROOT_FLAGS: [&str; 2] = ["enabled", "waitForRender"];

/// Command animation slots of the `animations` section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    ShowModal,
    DismissModal,
    Push,
    Pop,
    SetStackRoot,
}

impl Slot {
    const ALL: [Slot; 5] = [Slot::ShowModal, Slot::DismissModal, Slot::Push, Slot::Pop, Slot::SetStackRoot];

    fn key(self) -> &'static str {
        match self {
            Slot::ShowModal => "showModal",
            Slot::DismissModal => "dismissModal",
            Slot::Push => "push",
            Slot::Pop => "pop",
            Slot::SetStackRoot => "setStackRoot",
        }
    }

    /// Half a legacy animation of this slot belongs to
    fn half(self) -> Half {
        match self {
            Slot::ShowModal | Slot::Push | Slot::SetStackRoot => Half::Enter,
            Slot::DismissModal | Slot::Pop => Half::Exit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Half {
    Enter,
    Exit,
}

impl Half {
    fn key(self) -> &'static str {
        match self {
            Half::Enter => "enter",
            Half::Exit => "exit",
        }
    }
}

/// Shape of an animation payload
#[derive(Debug, PartialEq)]
enum Shape {
    /// Already in the current shape
    Current,
    /// A single view animation (modal slots, `setStackRoot`)
    LegacyView,
    /// A stack animation whose listed views carry bare view animations
    LegacyStackViews(Vec<&'static str>),
}

fn has_halves(map: &Map<String, Value>) -> bool {
    map.contains_key("enter") || map.contains_key("exit")
}

fn classify(slot: Slot, animation: &Map<String, Value>) -> Shape {
    match slot {
        Slot::ShowModal | Slot::DismissModal => {
            if has_halves(animation) {
                Shape::Current
            } else {
                Shape::LegacyView
            }
        }
        Slot::Push | Slot::Pop => {
            let legacy: Vec<&'static str> = STACK_VIEWS
                .into_iter()
                .filter(|view| animation.get(*view).and_then(Value::as_object).is_some_and(|v| !has_halves(v)))
                .collect();
            if legacy.is_empty() {
                Shape::Current
            } else {
                Shape::LegacyStackViews(legacy)
            }
        }
        Slot::SetStackRoot => {
            if STACK_VIEWS.iter().any(|view| animation.contains_key(*view)) {
                Shape::Current
            } else {
                Shape::LegacyView
            }
        }
    }
}

fn wrap(half: Half, animation: Value) -> Value {
    let mut wrapped = Map::new();
    wrapped.insert(half.key().to_string(), animation);
    Value::Object(wrapped)
}

fn migrate(slot: Slot, animation: &mut Map<String, Value>) {
    match (slot, classify(slot, animation)) {
        (_, Shape::Current) => {}
        (Slot::SetStackRoot, Shape::LegacyView) => {
            let original = std::mem::take(animation);
            for flag in STACK_ROOT_FLAGS {
                if let Some(value) = original.get(flag) {
                    animation.insert(flag.to_string(), value.clone());
                }
            }
            animation.insert("content".to_string(), wrap(slot.half(), Value::Object(original)));
        }
        (_, Shape::LegacyView) => {
            let original = std::mem::take(animation);
            animation.insert(slot.half().key().to_string(), Value::Object(original));
        }
        (_, Shape::LegacyStackViews(views)) => {
            for view in views {
                if let Some(value) = animation.remove(view) {
                    animation.insert(view.to_string(), wrap(slot.half(), value));
                }
            }
        }
    }
}

/// Rewrite legacy command animations of an `animations` section in place
pub(crate) fn normalize_animations(animations: &mut Value) {
    let Value::Object(animations) = animations else {
        return;
    };
    for slot in Slot::ALL {
        if let Some(Value::Object(animation)) = animations.get_mut(slot.key()) {
            migrate(slot, animation);
        }
    }
}
