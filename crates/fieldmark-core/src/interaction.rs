//! Drag/resize interaction state machine
//!
//! One [`InteractionSession`] exists per client and drives at most one
//! gesture at a time: `Idle -> Selected -> {Dragging | Resizing} ->
//! Selected -> Idle`. Pointer and touch input arrives as
//! [`InputEvent`] samples; the session answers with [`Effect`]s the glue
//! layer carries out (selection change, live repaint, commit to storage,
//! cursor affordance).
//!
//! The live candidate rectangle computed during a gesture is kept apart
//! from the committed record: storage only sees the final value on
//! release. Commits carry a per-field sequence so an acknowledgment that
//! arrives out of order can be detected and discarded (last write wins).

use std::collections::HashMap;

use crate::geometry::{self, Point, Rect, ResizeDirection};

/// What the pointer landed on at pointer-down.
///
/// The caller supplies the committed rectangle it rendered the target
/// with; the session snapshots it as the gesture origin.
#[derive(Debug, Clone)]
pub enum PointerTarget {
    FieldBody {
        id: String,
        rect: Rect,
    },
    Handle {
        id: String,
        rect: Rect,
        direction: ResizeDirection,
    },
    Background,
}

/// A pointer or touch input sample.
#[derive(Debug, Clone)]
pub enum InputEvent {
    PointerDown {
        target: PointerTarget,
        point: Point,
    },
    /// `touch_points` is 1 for mouse input and for single-point touch.
    PointerMove {
        point: Point,
        touch_points: u32,
    },
    PointerUp,
    /// Gesture ended without a usable release (touchcancel, pointer
    /// capture lost). The live value is discarded.
    Cancel,
}

/// Cursor shown while a gesture is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    Move,
    ResizeSe,
    ResizeE,
    ResizeS,
}

impl CursorStyle {
    pub fn as_css(&self) -> &'static str {
        match self {
            CursorStyle::Move => "move",
            CursorStyle::ResizeSe => "nwse-resize",
            CursorStyle::ResizeE => "ew-resize",
            CursorStyle::ResizeS => "ns-resize",
        }
    }

    fn for_direction(direction: ResizeDirection) -> Self {
        match direction {
            ResizeDirection::Se => CursorStyle::ResizeSe,
            ResizeDirection::E => CursorStyle::ResizeE,
            ResizeDirection::S => CursorStyle::ResizeS,
        }
    }
}

/// The value a finished gesture commits: drags commit position, resizes
/// commit size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommitUpdate {
    Position { x: f64, y: f64 },
    Size { width: f64, height: f64 },
}

/// Side effects for the glue layer to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SelectionChanged(Option<String>),
    /// The live rectangle moved; repaint only, no storage write.
    LiveRect { field_id: String, rect: Rect },
    /// Persist the final gesture value. `seq` identifies the commit for
    /// [`InteractionSession::is_commit_current`].
    Commit {
        field_id: String,
        update: CommitUpdate,
        seq: u64,
    },
    /// Suppress text selection and show the directional cursor.
    GestureStarted { cursor: CursorStyle },
    /// Restore selection behavior and the default cursor. Emitted on
    /// every release path, including cancellation.
    GestureEnded,
}

/// Coarse session mode, exposed for assertions and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Idle,
    Selected,
    Dragging,
    Resizing,
}

#[derive(Debug, Clone)]
struct Gesture {
    pointer_origin: Point,
    start_rect: Rect,
    kind: GestureKind,
}

#[derive(Debug, Clone, Copy)]
enum GestureKind {
    Drag,
    Resize(ResizeDirection),
}

/// Issues monotonically increasing commit sequences per field and
/// remembers the latest, so stale acknowledgments can be told apart.
#[derive(Debug, Default)]
struct CommitSequencer {
    counter: u64,
    latest: HashMap<String, u64>,
}

impl CommitSequencer {
    fn issue(&mut self, field_id: &str) -> u64 {
        self.counter += 1;
        self.latest.insert(field_id.to_string(), self.counter);
        self.counter
    }

    fn is_current(&self, field_id: &str, seq: u64) -> bool {
        self.latest.get(field_id).is_some_and(|&latest| latest == seq)
    }
}

/// Per-client interaction state. See the module docs for the state
/// machine.
#[derive(Debug)]
pub struct InteractionSession {
    scale: f64,
    active_field: Option<String>,
    gesture: Option<Gesture>,
    live: Option<Rect>,
    commits: CommitSequencer,
}

impl Default for InteractionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionSession {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            active_field: None,
            gesture: None,
            live: None,
            commits: CommitSequencer::default(),
        }
    }

    /// Update the zoom scale (displayed pixels per document pixel).
    pub fn set_scale(&mut self, scale: f64) {
        if scale > 0.0 {
            self.scale = scale;
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn mode(&self) -> SessionMode {
        match (&self.active_field, &self.gesture) {
            (None, _) => SessionMode::Idle,
            (Some(_), None) => SessionMode::Selected,
            (Some(_), Some(gesture)) => match gesture.kind {
                GestureKind::Drag => SessionMode::Dragging,
                GestureKind::Resize(_) => SessionMode::Resizing,
            },
        }
    }

    pub fn active_field(&self) -> Option<&str> {
        self.active_field.as_deref()
    }

    /// The provisional rectangle of the active gesture, if one is in
    /// flight. Takes precedence over the committed rect when painting.
    pub fn live_rect(&self) -> Option<(&str, Rect)> {
        match (&self.active_field, self.live) {
            (Some(id), Some(rect)) if self.gesture.is_some() => Some((id.as_str(), rect)),
            _ => None,
        }
    }

    /// True if `seq` is still the newest commit issued for the field.
    /// The storage glue drops acknowledgments for which this is false,
    /// so a slow earlier write can never clobber a later one.
    pub fn is_commit_current(&self, field_id: &str, seq: u64) -> bool {
        self.commits.is_current(field_id, seq)
    }

    /// Drop all gesture and selection state. Recovery hatch for event
    /// streams that have become inconsistent.
    pub fn reset(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.gesture.take().is_some() {
            self.live = None;
            effects.push(Effect::GestureEnded);
        }
        if self.active_field.take().is_some() {
            effects.push(Effect::SelectionChanged(None));
        }
        effects
    }

    pub fn handle_event(&mut self, event: InputEvent) -> Vec<Effect> {
        match event {
            InputEvent::PointerDown { target, point } => self.pointer_down(target, point),
            InputEvent::PointerMove {
                point,
                touch_points,
            } => self.pointer_move(point, touch_points),
            InputEvent::PointerUp => self.release(true),
            InputEvent::Cancel => self.release(false),
        }
    }

    fn pointer_down(&mut self, target: PointerTarget, point: Point) -> Vec<Effect> {
        // A pointer-down while a gesture is in flight finalizes the
        // active gesture before anything else happens.
        let mut effects = self.release(true);

        match target {
            PointerTarget::FieldBody { id, rect } => {
                if self.active_field.as_deref() == Some(id.as_str()) {
                    effects.extend(self.begin_gesture(point, rect, GestureKind::Drag));
                } else {
                    self.active_field = Some(id.clone());
                    effects.push(Effect::SelectionChanged(Some(id)));
                }
            }
            PointerTarget::Handle {
                id,
                rect,
                direction,
            } => {
                if self.active_field.as_deref() == Some(id.as_str()) {
                    effects.extend(self.begin_gesture(point, rect, GestureKind::Resize(direction)));
                } else {
                    // Handles only exist on the selected field; a
                    // mismatch means the event stream is stale. Recover
                    // by selecting.
                    self.active_field = Some(id.clone());
                    effects.push(Effect::SelectionChanged(Some(id)));
                }
            }
            PointerTarget::Background => {
                if self.active_field.take().is_some() {
                    effects.push(Effect::SelectionChanged(None));
                }
            }
        }
        effects
    }

    fn begin_gesture(&mut self, point: Point, rect: Rect, kind: GestureKind) -> Vec<Effect> {
        let cursor = match kind {
            GestureKind::Drag => CursorStyle::Move,
            GestureKind::Resize(direction) => CursorStyle::for_direction(direction),
        };
        self.gesture = Some(Gesture {
            pointer_origin: point,
            start_rect: rect,
            kind,
        });
        self.live = Some(rect);
        vec![Effect::GestureStarted { cursor }]
    }

    fn pointer_move(&mut self, point: Point, touch_points: u32) -> Vec<Effect> {
        // Only single-point gestures drive movement.
        if touch_points > 1 {
            return Vec::new();
        }
        let Some(gesture) = self.gesture.clone() else {
            return Vec::new();
        };
        let Some(field_id) = self.active_field.clone() else {
            // Gesture without a selection cannot happen through the
            // public API; reset if it somehow does.
            return self.reset();
        };

        let delta = geometry::gesture_delta(gesture.pointer_origin, point, self.scale);
        let rect = match gesture.kind {
            GestureKind::Drag => geometry::drag_rect(&gesture.start_rect, delta),
            GestureKind::Resize(direction) => {
                geometry::resize_rect(&gesture.start_rect, delta, direction)
            }
        };
        self.live = Some(rect);
        vec![Effect::LiveRect { field_id, rect }]
    }

    /// Ends the active gesture. `commit` is false for cancellation, in
    /// which case the live value is discarded.
    fn release(&mut self, commit: bool) -> Vec<Effect> {
        let Some(gesture) = self.gesture.take() else {
            return Vec::new();
        };
        let live = self.live.take().unwrap_or(gesture.start_rect);
        let mut effects = Vec::new();

        if commit {
            if let Some(field_id) = self.active_field.clone() {
                let update = match gesture.kind {
                    GestureKind::Drag => CommitUpdate::Position {
                        x: live.x,
                        y: live.y,
                    },
                    GestureKind::Resize(_) => CommitUpdate::Size {
                        width: live.width,
                        height: live.height,
                    },
                };
                let seq = self.commits.issue(&field_id);
                effects.push(Effect::Commit {
                    field_id,
                    update,
                    seq,
                });
            }
        }
        effects.push(Effect::GestureEnded);
        effects
    }
}
