//! The marker interaction state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Idle        -> ArmedToDraw   (start marking, rejected while naming)
//! ArmedToDraw -> Drawing(id)   (pointer down on the surface: new id + color)
//! ArmedToDraw -> Idle          (cancel)
//! Drawing(id) -> Drawing(id)   (pointer move: draft recomputed, store write
//!                               coalesced to the next frame)
//! Drawing(id) -> Idle          (pointer up: marker committed)
//! Drawing(id) -> Idle          (cancel: marker never created)
//! Idle        -> Naming(id)    (click on an existing marker)
//! Naming(a)   -> Naming(b)     (click on another marker)
//! Naming(id)  -> Idle          (blur, confirm, cancel, or marker deleted)
//! ```
//!
//! Drawing and naming exclude each other: requests that would break this are
//! ignored rather than reported, and the machine stays usable from any state.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::ids::{IdGenerator, UuidGenerator};
use super::keyboard::{KeyCode, KeyboardFocus, KeyboardSubscription, Modifiers};
use super::scheduler::FrameScheduler;
use crate::color_utils::random_bright_color;
use crate::constants::MAX_ID_ATTEMPTS;
use crate::keybindings::{KeyAction, KeyBindings};
use crate::model::{Marker, MarkerId, Point, Rect};
use crate::store::MarkerStore;

/// Current interaction mode, as exposed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Nothing is being drawn or named.
    #[default]
    Idle,
    /// Waiting for the pointer-down that starts a new marker.
    ArmedToDraw,
    /// A marker with this id is being dragged out.
    Drawing(MarkerId),
    /// The marker with this id is being named.
    Naming(MarkerId),
}

impl InteractionMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            InteractionMode::Idle => "Idle",
            InteractionMode::ArmedToDraw => "Armed",
            InteractionMode::Drawing(_) => "Drawing",
            InteractionMode::Naming(_) => "Naming",
        }
    }

    /// Check if the machine is armed or drawing.
    pub fn is_marking(&self) -> bool {
        matches!(
            self,
            InteractionMode::ArmedToDraw | InteractionMode::Drawing(_)
        )
    }

    /// Check if a marker is being named.
    pub fn is_naming(&self) -> bool {
        matches!(self, InteractionMode::Naming(_))
    }
}

/// What an input event did to the machine.
///
/// Anything other than [`EventOutcome::Ignored`] changed state the renderer
/// shows, so the host should repaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event did not apply in the current mode.
    Ignored,
    /// Marking was armed.
    Armed,
    /// Marking was disarmed before a drag started.
    Disarmed,
    /// A drag started a new marker.
    DrawStarted(MarkerId),
    /// The draft rectangle followed the pointer.
    DraftUpdated(MarkerId),
    /// A coalesced draft update was written to the store.
    PreviewApplied(MarkerId),
    /// The drag finished and the marker was committed.
    Committed(MarkerId),
    /// The drag was abandoned; the marker does not exist.
    Cancelled(MarkerId),
    /// Naming started (or moved to another marker).
    NamingStarted(MarkerId),
    /// The named marker's label changed.
    Renamed(MarkerId),
    /// Naming finished.
    NamingEnded(MarkerId),
}

impl EventOutcome {
    /// Whether the host should repaint.
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, EventOutcome::Ignored)
    }
}

/// Bounds of the drawable surface in image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// State of one drag gesture.
#[derive(Debug)]
struct DrawSession {
    /// Pointer position at drag start.
    anchor: Point,
    /// Marker as it would be committed right now.
    draft: Marker,
    /// Whether a preview of the draft has been written to the store.
    previewed: bool,
}

#[derive(Debug, Default)]
enum Session {
    #[default]
    Idle,
    Armed,
    Drawing(DrawSession),
    Naming(MarkerId),
}

/// Turns pointer and keyboard input into marker store mutations.
///
/// The engine does not own the store; every entry point that may write to it
/// takes it as a parameter.
pub struct InteractionEngine {
    session: Session,
    pending: FrameScheduler<Rect>,
    ids: Box<dyn IdGenerator>,
    rng: StdRng,
    surface: Option<Surface>,
    live_preview: bool,
    bindings: KeyBindings,
    keyboard: KeyboardFocus,
}

impl fmt::Debug for InteractionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionEngine")
            .field("session", &self.session)
            .field("pending", &self.pending)
            .field("surface", &self.surface)
            .field("live_preview", &self.live_preview)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionEngine {
    /// Create an engine with UUID identifiers and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self {
            session: Session::Idle,
            pending: FrameScheduler::new(),
            ids: Box::new(UuidGenerator),
            rng: StdRng::from_entropy(),
            surface: None,
            live_preview: true,
            bindings: KeyBindings::default(),
            keyboard: KeyboardFocus::new(),
        }
    }

    /// Use a different identifier source.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Seed the color RNG, making marker colors reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Enable or disable writing draft previews to the store.
    pub fn with_live_preview(mut self, live_preview: bool) -> Self {
        self.live_preview = live_preview;
        self
    }

    /// Use custom keybindings.
    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    // ========================================================================
    // State for renderers
    // ========================================================================

    /// Get the current mode.
    pub fn mode(&self) -> InteractionMode {
        match &self.session {
            Session::Idle => InteractionMode::Idle,
            Session::Armed => InteractionMode::ArmedToDraw,
            Session::Drawing(draw) => InteractionMode::Drawing(draw.draft.id.clone()),
            Session::Naming(id) => InteractionMode::Naming(id.clone()),
        }
    }

    /// The marker being drawn, if any.
    pub fn draft(&self) -> Option<&Marker> {
        match &self.session {
            Session::Drawing(draw) => Some(&draw.draft),
            _ => None,
        }
    }

    /// The anchor point of the drag in progress, if any.
    pub fn anchor(&self) -> Option<Point> {
        match &self.session {
            Session::Drawing(draw) => Some(draw.anchor),
            _ => None,
        }
    }

    /// The marker being named, if any.
    pub fn naming_target(&self) -> Option<&MarkerId> {
        match &self.session {
            Session::Naming(id) => Some(id),
            _ => None,
        }
    }

    /// Check if a draft update is waiting for the next frame.
    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_pending()
    }

    /// Whether draft previews are written to the store.
    pub fn live_preview(&self) -> bool {
        self.live_preview
    }

    /// Change live preview. Applies from the next pointer move.
    pub fn set_live_preview(&mut self, live_preview: bool) {
        self.live_preview = live_preview;
    }

    /// Current keybindings.
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Replace the keybindings.
    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    /// Bounds of the drawable surface.
    pub fn surface(&self) -> Option<Surface> {
        self.surface
    }

    /// Set or clear the bounds of the drawable surface.
    ///
    /// With bounds set, drags only start inside them and pointer positions
    /// are clamped into them. Without bounds, positions are clamped to the
    /// non-negative quadrant.
    pub fn set_surface(&mut self, surface: Option<Surface>) {
        self.surface = surface;
    }

    /// Route key events to the engine until the returned guard is dropped.
    pub fn subscribe_keyboard(&self) -> KeyboardSubscription {
        self.keyboard.subscribe()
    }

    /// Check if key events currently reach the engine.
    pub fn keyboard_active(&self) -> bool {
        self.keyboard.is_active()
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Arm the engine so the next pointer-down starts a new marker.
    pub fn start_marking(&mut self) -> EventOutcome {
        if let Session::Naming(id) = &self.session {
            log::debug!("Start marking rejected while naming {}", id);
            return EventOutcome::Ignored;
        }
        if !matches!(self.session, Session::Idle) {
            return EventOutcome::Ignored;
        }
        self.session = Session::Armed;
        log::debug!("Marking armed");
        EventOutcome::Armed
    }

    /// Cancel whatever is in progress (the Escape command).
    ///
    /// Disarms an armed engine, abandons a drag (removing any preview already
    /// written to the store) and leaves naming.
    pub fn cancel(&mut self, store: &mut MarkerStore) -> EventOutcome {
        match std::mem::take(&mut self.session) {
            Session::Idle => EventOutcome::Ignored,
            Session::Armed => {
                log::debug!("Marking disarmed");
                EventOutcome::Disarmed
            }
            Session::Drawing(draw) => {
                self.pending.cancel();
                if draw.previewed {
                    store.delete(&draw.draft.id);
                }
                log::info!("Cancelled drawing marker {}", draw.draft.id);
                EventOutcome::Cancelled(draw.draft.id)
            }
            Session::Naming(id) => {
                log::debug!("Naming {} cancelled", id);
                EventOutcome::NamingEnded(id)
            }
        }
    }

    /// Tell the id generator about ids that exist or existed, so it never
    /// hands them out for a new marker.
    pub fn observe_ids<'a>(&mut self, ids: impl IntoIterator<Item = &'a MarkerId>) {
        for id in ids {
            self.ids.observe(id);
        }
    }

    /// Drop all transient state and return to idle.
    ///
    /// The store is not touched; callers use this when they are about to
    /// clear or replace it.
    pub fn reset(&mut self) {
        self.pending.cancel();
        self.session = Session::Idle;
        log::debug!("Interaction reset");
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    /// Handle a pointer press at `position` (image pixels).
    ///
    /// Starts a new marker when armed. While a drag is already in progress
    /// the press is rejected: there is only ever one drawing session.
    pub fn pointer_down(&mut self, position: Point, store: &MarkerStore) -> EventOutcome {
        match &self.session {
            Session::Armed => {}
            Session::Drawing(draw) => {
                log::warn!(
                    "Drag start rejected, marker {} is still being drawn",
                    draw.draft.id
                );
                return EventOutcome::Ignored;
            }
            Session::Idle | Session::Naming(_) => return EventOutcome::Ignored,
        }

        if !self.on_surface(position) {
            log::debug!(
                "Pointer down at ({:.1}, {:.1}) is outside the surface",
                position.x,
                position.y
            );
            return EventOutcome::Ignored;
        }

        let Some(id) = self.fresh_id(store) else {
            log::error!(
                "Could not generate an unused marker id after {} attempts",
                MAX_ID_ATTEMPTS
            );
            return EventOutcome::Ignored;
        };

        let color = random_bright_color(&mut self.rng);
        let draft = Marker::new(id.clone(), Rect::from_drag(position, position), color);
        log::info!(
            "Drawing marker {} from ({:.1}, {:.1}) with color {}",
            id,
            position.x,
            position.y,
            color
        );
        self.session = Session::Drawing(DrawSession {
            anchor: position,
            draft,
            previewed: false,
        });
        EventOutcome::DrawStarted(id)
    }

    /// Handle pointer movement.
    ///
    /// The draft follows the pointer immediately; the store write is
    /// scheduled for the next frame, replacing any write still pending.
    pub fn pointer_move(&mut self, position: Point) -> EventOutcome {
        let Some(position) = self.clamp_to_surface(position) else {
            return EventOutcome::Ignored;
        };
        let Session::Drawing(draw) = &mut self.session else {
            return EventOutcome::Ignored;
        };

        let rect = Rect::from_drag(draw.anchor, position);
        draw.draft.rect = rect;
        if self.live_preview {
            self.pending.schedule(rect);
        }
        EventOutcome::DraftUpdated(draw.draft.id.clone())
    }

    /// Apply the pending draft update. Call once per repaint opportunity.
    pub fn on_frame(&mut self, store: &mut MarkerStore) -> EventOutcome {
        let Some(rect) = self.pending.take() else {
            return EventOutcome::Ignored;
        };
        let Session::Drawing(draw) = &mut self.session else {
            return EventOutcome::Ignored;
        };

        store.upsert(Marker::new(draw.draft.id.clone(), rect, draw.draft.color));
        draw.previewed = true;
        EventOutcome::PreviewApplied(draw.draft.id.clone())
    }

    /// Handle a pointer release: commit the marker being drawn.
    ///
    /// A release without movement still commits a zero-size marker.
    pub fn pointer_up(&mut self, position: Point, store: &mut MarkerStore) -> EventOutcome {
        let draw = match std::mem::take(&mut self.session) {
            Session::Drawing(draw) => draw,
            other => {
                self.session = other;
                return EventOutcome::Ignored;
            }
        };
        self.pending.cancel();

        let rect = match self.clamp_to_surface(position) {
            Some(position) => Rect::from_drag(draw.anchor, position),
            // Unusable release position, keep the last draft geometry
            None => draw.draft.rect,
        };
        let id = draw.draft.id.clone();
        store.upsert(Marker::new(id.clone(), rect, draw.draft.color));
        log::info!(
            "Committed marker {} at ({:.1}, {:.1}) size {:.1}x{:.1} (total: {})",
            id,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            store.len()
        );
        EventOutcome::Committed(id)
    }

    // ========================================================================
    // Naming
    // ========================================================================

    /// Start naming an existing marker (the host saw a click on it).
    ///
    /// Ignored while armed or drawing, and for ids the store does not hold.
    /// Naming another marker while one is already being named retargets.
    pub fn begin_naming(&mut self, id: &MarkerId, store: &MarkerStore) -> EventOutcome {
        match &self.session {
            Session::Armed | Session::Drawing(_) => {
                log::debug!("Naming {} ignored while marking", id);
                return EventOutcome::Ignored;
            }
            Session::Idle | Session::Naming(_) => {}
        }
        if !store.contains(id) {
            log::debug!("Naming ignored, no marker {}", id);
            return EventOutcome::Ignored;
        }

        log::debug!("Naming marker {}", id);
        self.session = Session::Naming(id.clone());
        EventOutcome::NamingStarted(id.clone())
    }

    /// Apply a text change from the name field immediately.
    pub fn name_changed(&mut self, text: &str, store: &mut MarkerStore) -> EventOutcome {
        let Session::Naming(id) = &self.session else {
            return EventOutcome::Ignored;
        };
        if store.rename(id, text) {
            return EventOutcome::Renamed(id.clone());
        }

        // The target disappeared underneath us
        let id = id.clone();
        self.session = Session::Idle;
        EventOutcome::NamingEnded(id)
    }

    /// Finish naming (blur or confirm).
    pub fn end_naming(&mut self) -> EventOutcome {
        match std::mem::take(&mut self.session) {
            Session::Naming(id) => {
                log::debug!("Finished naming marker {}", id);
                EventOutcome::NamingEnded(id)
            }
            other => {
                self.session = other;
                EventOutcome::Ignored
            }
        }
    }

    /// Let go of any reference to a marker that is being deleted.
    ///
    /// Naming that marker ends and drawing it is abandoned, within this call,
    /// so the deletion cannot leave a dangling target behind.
    pub fn marker_removed(&mut self, id: &MarkerId) -> EventOutcome {
        let (referenced, drawing) = match &self.session {
            Session::Naming(target) => (target == id, false),
            Session::Drawing(draw) => (&draw.draft.id == id, true),
            Session::Idle | Session::Armed => (false, false),
        };
        if !referenced {
            return EventOutcome::Ignored;
        }

        self.pending.cancel();
        self.session = Session::Idle;
        if drawing {
            log::debug!("Drawing abandoned, marker {} deleted", id);
            EventOutcome::Cancelled(id.clone())
        } else {
            log::debug!("Naming ended, marker {} deleted", id);
            EventOutcome::NamingEnded(id.clone())
        }
    }

    // ========================================================================
    // Keyboard input
    // ========================================================================

    /// Handle a key press. Ignored unless a keyboard subscription is alive.
    pub fn key_pressed(
        &mut self,
        key: KeyCode,
        modifiers: Modifiers,
        store: &mut MarkerStore,
    ) -> EventOutcome {
        if !self.keyboard.is_active() {
            log::trace!("Key {:?} ignored, no keyboard subscription", key);
            return EventOutcome::Ignored;
        }
        match self.bindings.action_for_key(key, modifiers) {
            Some(KeyAction::StartMarking) => self.start_marking(),
            Some(KeyAction::Cancel) => self.cancel(store),
            Some(KeyAction::ConfirmName) => self.end_naming(),
            None => EventOutcome::Ignored,
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn fresh_id(&mut self, store: &MarkerStore) -> Option<MarkerId> {
        self.observe_ids(store.markers().keys());
        (0..MAX_ID_ATTEMPTS)
            .map(|_| self.ids.next_id())
            .find(|id| !store.contains(id))
    }

    fn on_surface(&self, p: Point) -> bool {
        if !(p.x.is_finite() && p.y.is_finite()) || p.x < 0.0 || p.y < 0.0 {
            return false;
        }
        match self.surface {
            Some(surface) => p.x <= surface.width && p.y <= surface.height,
            None => true,
        }
    }

    fn clamp_to_surface(&self, p: Point) -> Option<Point> {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return None;
        }
        Some(match self.surface {
            Some(surface) => Point::new(
                p.x.clamp(0.0, surface.width.max(0.0)),
                p.y.clamp(0.0, surface.height.max(0.0)),
            ),
            None => Point::new(p.x.max(0.0), p.y.max(0.0)),
        })
    }
}
