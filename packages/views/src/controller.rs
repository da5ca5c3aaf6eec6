//! Interaction state machine shared by the resizable node views.
//!
//! Lifecycle: `Idle` → `Hovered` (pointer enter) → `Resizing` (handle
//! down) → back to `Hovered` (pointer up). Leaving the node clears the
//! hover only when no drag is in flight; a pointer that strays outside
//! the node mid-drag keeps resizing. A view whose node has vanished
//! from the document goes `Detached` and ignores further events.

/// Where the view is in its interaction lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Idle,
    Hovered,
    Resizing,
    /// Backing node no longer exists; the view is inert
    Detached,
}

/// An in-flight handle drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDrag {
    start_x: i32,
    start_width: u32,
}

impl ResizeDrag {
    pub fn new(start_x: i32, start_width: u32) -> Self {
        Self { start_x, start_width }
    }

    /// Width for the current pointer position. The handle sits on one
    /// edge of a centered box, so each pointer pixel moves the width by
    /// two; the result is clamped into the node's domain.
    pub fn width_at(&self, x: i32, clamp: impl Fn(i64) -> u32) -> u32 {
        let delta = (x - self.start_x) as i64;
        clamp(self.start_width as i64 + delta * 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
    /// Handle grabbed at this pointer x
    Down { x: i32 },
    Move { x: i32 },
    Up,
}

/// Drives the phase transitions; width math stays in [`ResizeDrag`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionState {
    phase: ViewPhase,
    drag: Option<ResizeDrag>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            phase: ViewPhase::Idle,
            drag: None,
        }
    }
}

impl InteractionState {
    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn is_resizing(&self) -> bool {
        self.phase == ViewPhase::Resizing
    }

    pub fn detach(&mut self) {
        self.phase = ViewPhase::Detached;
        self.drag = None;
    }

    /// Advance the machine; returns the drag when a `Move` should
    /// produce a width update
    pub fn on_pointer(&mut self, event: PointerEvent, current_width: u32) -> Option<ResizeDrag> {
        match (self.phase, event) {
            (ViewPhase::Detached, _) => None,

            (ViewPhase::Idle, PointerEvent::Enter) => {
                self.phase = ViewPhase::Hovered;
                None
            }
            (ViewPhase::Hovered, PointerEvent::Leave) => {
                self.phase = ViewPhase::Idle;
                None
            }
            (ViewPhase::Hovered, PointerEvent::Down { x }) => {
                self.phase = ViewPhase::Resizing;
                self.drag = Some(ResizeDrag::new(x, current_width));
                None
            }
            (ViewPhase::Resizing, PointerEvent::Move { .. }) => self.drag,
            (ViewPhase::Resizing, PointerEvent::Up) => {
                self.phase = ViewPhase::Hovered;
                self.drag = None;
                None
            }
            // Straying outside mid-drag does not cancel the resize
            (ViewPhase::Resizing, PointerEvent::Leave) => None,
            _ => None,
        }
    }
}
