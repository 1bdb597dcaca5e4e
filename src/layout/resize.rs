//! Interactive resize of an event block.
//!
//! Two drag handles anchored to the top and bottom edges of a selected
//! event turn gesture deltas into preview rectangles. The controller is a
//! small state machine over the gesture lifecycle; it never touches event
//! times itself, it only reports geometry.

use serde::Serialize;

use super::geometry::Rect;
use crate::models::event::Event;

/// Extra height the padded preview adds around the original frame, making
/// room for the handle chrome above and below.
pub const MAIN_HEIGHT_OFFSET: f32 = 30.0;
/// Vertical inset of the inner event view inside the padded preview.
pub const MAIN_Y_OFFSET: f32 = 15.0;

/// Which edge of the event is being resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResizeHandle {
    /// Top edge - the bottom edge stays pinned
    Top,
    /// Bottom edge - the top edge stays pinned
    Bottom,
}

/// Gesture lifecycle phase reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

/// One gesture sample: phase plus the vertical translation from the
/// gesture origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub phase: GesturePhase,
    pub translation_y: f32,
}

/// Progress of a resize session as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePhase {
    Started,
    Moved,
    Ended,
}

/// Notification emitted as a resize session progresses.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeNotice {
    pub event: Event,
    pub handle: ResizeHandle,
    pub phase: ResizePhase,
    /// The padded preview frame after applying the gesture.
    pub frame: Rect,
}

/// Live drag state for one handle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeSession {
    handle: ResizeHandle,
    original_frame: Rect,
}

/// Drag state machine for one selected event's already-computed rectangle.
///
/// At most one session is active at a time; gesture samples for the other
/// handle are ignored while a session runs.
pub struct ResizeController {
    event: Event,
    frame: Rect,
    min_height: f32,
    session: Option<ResizeSession>,
}

impl ResizeController {
    /// Wrap an already-placed event rectangle in the padded preview frame.
    pub fn new(event: Event, event_frame: Rect, min_height: f32) -> Self {
        let frame = Rect::new(
            event_frame.x,
            event_frame.y - MAIN_Y_OFFSET,
            event_frame.width,
            event_frame.height + MAIN_HEIGHT_OFFSET,
        );
        Self {
            event,
            frame,
            min_height,
            session: None,
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    /// The padded preview frame.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// The inner event-view frame. Derived from the padded frame, so it is
    /// always in sync with the latest height.
    pub fn event_view_frame(&self) -> Rect {
        Rect::new(
            self.frame.x,
            self.frame.y + MAIN_Y_OFFSET,
            self.frame.width,
            self.frame.height - MAIN_HEIGHT_OFFSET,
        )
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Feed one gesture sample for `handle`.
    ///
    /// The first Changed sample opens the session and reports `Started`;
    /// further Changed samples report `Moved` with the updated preview;
    /// Ended, Cancelled and Failed all close the session with `Ended`.
    /// Began samples and samples for a non-active handle are ignored.
    pub fn handle_gesture(
        &mut self,
        handle: ResizeHandle,
        state: GestureState,
    ) -> Option<ResizeNotice> {
        match state.phase {
            GesturePhase::Began => None,
            GesturePhase::Changed => {
                let phase = match self.session {
                    None => {
                        self.session = Some(ResizeSession {
                            handle,
                            original_frame: self.frame,
                        });
                        ResizePhase::Started
                    }
                    Some(session) => {
                        if session.handle != handle {
                            log::debug!("ignoring gesture for inactive resize handle");
                            return None;
                        }
                        ResizePhase::Moved
                    }
                };
                self.apply_translation(state.translation_y);
                Some(ResizeNotice {
                    event: self.event.clone(),
                    handle,
                    phase,
                    frame: self.frame,
                })
            }
            GesturePhase::Ended | GesturePhase::Cancelled | GesturePhase::Failed => {
                let session = self.session.take()?;
                Some(ResizeNotice {
                    event: self.event.clone(),
                    handle: session.handle,
                    phase: ResizePhase::Ended,
                    frame: self.frame,
                })
            }
        }
    }

    /// Drag the active edge by `dy`, keeping the opposite edge pinned and
    /// never shrinking the inner event view below the minimum height.
    fn apply_translation(&mut self, dy: f32) {
        let Some(session) = self.session else {
            return;
        };
        let original = session.original_frame;
        let min_frame_height = self.min_height + MAIN_HEIGHT_OFFSET;

        match session.handle {
            ResizeHandle::Top => {
                let dy = dy.min(original.height - min_frame_height);
                self.frame.y = original.y + dy;
                self.frame.height = original.height - dy;
            }
            ResizeHandle::Bottom => {
                self.frame.height = (original.height + dy).max(min_frame_height);
            }
        }
    }
}
