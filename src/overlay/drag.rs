use crossterm::event::{Event, MouseButton, MouseEventKind};

/// Signed panel origin in terminal cells. The panel may hang partly off the
/// viewport, so coordinates can be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Pointer event in absolute viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: i32,
    pub y: i32,
}

impl PointerEvent {
    pub const fn new(kind: PointerKind, x: i32, y: i32) -> Self {
        Self { kind, x, y }
    }

    /// Map a terminal event to a pointer event. Only the primary button
    /// takes part in dragging; losing terminal focus cancels a gesture.
    pub fn from_terminal(event: &Event) -> Option<Self> {
        match event {
            Event::Mouse(mouse) => {
                let kind = match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
                    MouseEventKind::Drag(MouseButton::Left) => PointerKind::Move,
                    MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
                    _ => return None,
                };
                Some(Self::new(kind, i32::from(mouse.column), i32::from(mouse.row)))
            }
            Event::FocusLost => Some(Self::new(PointerKind::Cancel, 0, 0)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragGesture {
    #[default]
    Idle,
    Dragging {
        anchor: (i32, i32),
        origin: Position,
    },
}

/// Result of feeding one event through the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStep {
    /// Not part of a drag; the event belongs to whatever is under the pointer.
    PassThrough,
    Started,
    Moved(Position),
    Finished,
}

impl DragGesture {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragGesture::Dragging { .. })
    }

    /// Advance the gesture. `on_handle` says whether the pointer is over the
    /// drag handle, and `position` is the panel origin right now.
    pub fn step(&mut self, event: PointerEvent, on_handle: bool, position: Position) -> DragStep {
        match (*self, event.kind) {
            (DragGesture::Idle, PointerKind::Down) if on_handle => {
                *self = DragGesture::Dragging {
                    anchor: (event.x, event.y),
                    origin: position,
                };
                DragStep::Started
            }
            (DragGesture::Idle, _) => DragStep::PassThrough,
            (DragGesture::Dragging { anchor, origin }, PointerKind::Move) => DragStep::Moved(
                origin.offset(event.x.saturating_sub(anchor.0), event.y.saturating_sub(anchor.1)),
            ),
            (DragGesture::Dragging { .. }, PointerKind::Up | PointerKind::Cancel) => {
                *self = DragGesture::Idle;
                DragStep::Finished
            }
            // A second press without a release restarts from the new point
            // when it lands on the handle and ends the drag otherwise.
            (DragGesture::Dragging { .. }, PointerKind::Down) if on_handle => {
                *self = DragGesture::Dragging {
                    anchor: (event.x, event.y),
                    origin: position,
                };
                DragStep::Started
            }
            (DragGesture::Dragging { .. }, PointerKind::Down) => {
                *self = DragGesture::Idle;
                DragStep::Finished
            }
        }
    }

    pub fn cancel(&mut self) {
        *self = DragGesture::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseEvent};

    fn ev(kind: PointerKind, x: i32, y: i32) -> PointerEvent {
        PointerEvent::new(kind, x, y)
    }

    #[test]
    fn drag_moves_by_pointer_delta() {
        let mut gesture = DragGesture::default();
        let mut pos = Position::new(100, 200);
        assert_eq!(
            gesture.step(ev(PointerKind::Down, 150, 250), true, pos),
            DragStep::Started
        );
        if let DragStep::Moved(next) = gesture.step(ev(PointerKind::Move, 170, 260), true, pos) {
            pos = next;
        }
        assert_eq!(pos, Position::new(120, 210));
        assert_eq!(
            gesture.step(ev(PointerKind::Up, 170, 260), true, pos),
            DragStep::Finished
        );
        assert_eq!(
            gesture.step(ev(PointerKind::Move, 300, 300), true, pos),
            DragStep::PassThrough
        );
        assert_eq!(pos, Position::new(120, 210));
    }

    #[test]
    fn moves_are_relative_to_drag_start_not_last_move() {
        let mut gesture = DragGesture::default();
        let start = Position::new(10, 10);
        gesture.step(ev(PointerKind::Down, 20, 20), true, start);
        let _ = gesture.step(ev(PointerKind::Move, 25, 22), true, start);
        let step = gesture.step(ev(PointerKind::Move, 18, 19), true, Position::new(15, 12));
        assert_eq!(step, DragStep::Moved(Position::new(8, 9)));
    }

    #[test]
    fn press_off_handle_passes_through() {
        let mut gesture = DragGesture::default();
        let step = gesture.step(ev(PointerKind::Down, 1, 1), false, Position::default());
        assert_eq!(step, DragStep::PassThrough);
        assert!(!gesture.is_dragging());
    }

    #[test]
    fn second_press_restarts_only_on_handle() {
        let mut gesture = DragGesture::default();
        let pos = Position::new(10, 10);
        gesture.step(ev(PointerKind::Down, 20, 20), true, pos);
        assert_eq!(
            gesture.step(ev(PointerKind::Down, 30, 20), true, pos),
            DragStep::Started
        );
        assert_eq!(
            gesture.step(ev(PointerKind::Move, 35, 20), true, pos),
            DragStep::Moved(Position::new(15, 10))
        );

        assert_eq!(
            gesture.step(ev(PointerKind::Down, 50, 25), false, pos),
            DragStep::Finished
        );
        assert!(!gesture.is_dragging());
        assert_eq!(
            gesture.step(ev(PointerKind::Move, 60, 30), false, pos),
            DragStep::PassThrough
        );
    }

    #[test]
    fn cancel_ends_drag() {
        let mut gesture = DragGesture::default();
        gesture.step(ev(PointerKind::Down, 0, 0), true, Position::default());
        assert_eq!(
            gesture.step(ev(PointerKind::Cancel, 0, 0), false, Position::default()),
            DragStep::Finished
        );
        assert!(!gesture.is_dragging());
    }

    #[test]
    fn terminal_events_map_to_pointer_kinds() {
        let mouse = |kind| {
            Event::Mouse(MouseEvent {
                kind,
                column: 4,
                row: 7,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert_eq!(
            PointerEvent::from_terminal(&mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(ev(PointerKind::Down, 4, 7))
        );
        assert_eq!(
            PointerEvent::from_terminal(&mouse(MouseEventKind::Drag(MouseButton::Left))),
            Some(ev(PointerKind::Move, 4, 7))
        );
        assert_eq!(
            PointerEvent::from_terminal(&mouse(MouseEventKind::Down(MouseButton::Right))),
            None
        );
        assert_eq!(
            PointerEvent::from_terminal(&Event::FocusLost).map(|p| p.kind),
            Some(PointerKind::Cancel)
        );
    }
}
