//! Single-writer adoption point for concurrently computed layouts.
//!
//! # Responsibility
//! - Number layout requests so stale work can be recognized.
//! - Serialize the only write into shared display state: adopting a result.
//!
//! # Invariants
//! - Generations handed out by `begin` strictly increase.
//! - An adopted generation never goes backwards; a result older than the
//!   adopted one is discarded.
//! - Computation itself runs outside the lock on copied input.
//!
//! # See also
//! - docs/architecture/layout.md

use crate::layout::config::{LayoutConfig, LayoutConfigError};
use crate::layout::result::LayoutResult;
use crate::layout::LayoutKind;
use crate::model::entity::LayoutEntity;
use crate::model::geometry::CanvasSize;
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Handle for one in-flight layout request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutTicket {
    generation: u64,
    kind: LayoutKind,
    canvas: CanvasSize,
}

impl LayoutTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }
}

/// Layout currently applied to the display state.
#[derive(Debug, Clone, PartialEq)]
pub struct AdoptedLayout {
    pub generation: u64,
    pub canvas: CanvasSize,
    pub result: LayoutResult,
}

/// Outcome of handing a finished (or abandoned) request to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adoption {
    /// The result is now the current layout.
    Adopted,
    /// A newer result was already adopted; this one was dropped.
    Superseded,
    /// A newer request existed before computing started; nothing was computed.
    Skipped,
}

#[derive(Debug, Default)]
struct SessionState {
    latest_requested: u64,
    adopted: Option<Arc<AdoptedLayout>>,
}

/// Coordination point between layout workers and one display surface.
#[derive(Debug, Default)]
pub struct LayoutSession {
    state: Mutex<SessionState>,
}

impl LayoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new request and returns its ticket.
    pub fn begin(&self, kind: LayoutKind, canvas: CanvasSize) -> LayoutTicket {
        let mut state = self.state.lock();
        state.latest_requested += 1;
        LayoutTicket {
            generation: state.latest_requested,
            kind,
            canvas,
        }
    }

    /// Whether no newer request has been registered since `ticket`.
    pub fn is_current(&self, ticket: &LayoutTicket) -> bool {
        self.state.lock().latest_requested == ticket.generation
    }

    /// Adopts `result` unless an equal or newer generation is already adopted.
    pub fn complete(&self, ticket: LayoutTicket, result: LayoutResult) -> Adoption {
        let mut state = self.state.lock();
        if let Some(current) = &state.adopted {
            if current.generation >= ticket.generation {
                debug!(
                    "event=layout_adopt module=session status=superseded kind={} generation={} adopted={}",
                    ticket.kind.as_str(),
                    ticket.generation,
                    current.generation
                );
                return Adoption::Superseded;
            }
        }

        debug!(
            "event=layout_adopt module=session status=ok kind={} generation={} nodes={}",
            ticket.kind.as_str(),
            ticket.generation,
            result.nodes.len()
        );
        state.adopted = Some(Arc::new(AdoptedLayout {
            generation: ticket.generation,
            canvas: ticket.canvas,
            result,
        }));
        Adoption::Adopted
    }

    /// Snapshot of the adopted layout, if any.
    pub fn current(&self) -> Option<Arc<AdoptedLayout>> {
        self.state.lock().adopted.clone()
    }

    pub fn latest_generation(&self) -> u64 {
        self.state.lock().latest_requested
    }

    /// Computes the ticket's layout on the calling thread and offers it for
    /// adoption. Stale tickets are skipped without computing.
    ///
    /// # Errors
    /// - Returns `LayoutConfigError` when `config` fails validation.
    pub fn run(
        &self,
        ticket: LayoutTicket,
        entities: &[LayoutEntity],
        config: &LayoutConfig,
    ) -> Result<Adoption, LayoutConfigError> {
        if !self.is_current(&ticket) {
            debug!(
                "event=layout_adopt module=session status=skipped kind={} generation={}",
                ticket.kind.as_str(),
                ticket.generation
            );
            return Ok(Adoption::Skipped);
        }
        let engine = ticket.kind.engine(config.clone())?;
        let result = engine.compute(entities, ticket.canvas);
        Ok(self.complete(ticket, result))
    }

    /// Registers a request now and computes it on a background thread.
    pub fn spawn(
        self: &Arc<Self>,
        kind: LayoutKind,
        entities: Vec<LayoutEntity>,
        canvas: CanvasSize,
        config: LayoutConfig,
    ) -> JoinHandle<Result<Adoption, LayoutConfigError>> {
        let ticket = self.begin(kind, canvas);
        let session = Arc::clone(self);
        std::thread::spawn(move || session.run(ticket, &entities, &config))
    }
}

#[cfg(test)]
mod tests {
    use super::{Adoption, LayoutSession};
    use crate::layout::result::LayoutResult;
    use crate::layout::LayoutKind;
    use crate::model::geometry::CanvasSize;

    const CANVAS: CanvasSize = CanvasSize::new(390.0, 600.0);

    #[test]
    fn generations_increase() {
        let session = LayoutSession::new();
        let first = session.begin(LayoutKind::Galaxy, CANVAS);
        let second = session.begin(LayoutKind::Galaxy, CANVAS);
        assert!(second.generation() > first.generation());
        assert!(!session.is_current(&first));
        assert!(session.is_current(&second));
    }

    #[test]
    fn stale_completion_after_newer_adoption_is_dropped() {
        let session = LayoutSession::new();
        let old = session.begin(LayoutKind::Galaxy, CANVAS);
        let new = session.begin(LayoutKind::Galaxy, CANVAS);

        assert_eq!(
            session.complete(new, LayoutResult::empty(LayoutKind::Galaxy)),
            Adoption::Adopted
        );
        assert_eq!(
            session.complete(old, LayoutResult::empty(LayoutKind::Galaxy)),
            Adoption::Superseded
        );
        assert_eq!(
            session.current().expect("adopted").generation,
            new.generation()
        );
    }

    #[test]
    fn older_completion_is_adopted_until_newer_arrives() {
        let session = LayoutSession::new();
        let old = session.begin(LayoutKind::Network, CANVAS);
        let new = session.begin(LayoutKind::Network, CANVAS);

        assert_eq!(
            session.complete(old, LayoutResult::empty(LayoutKind::Network)),
            Adoption::Adopted
        );
        assert_eq!(
            session.complete(new, LayoutResult::empty(LayoutKind::Network)),
            Adoption::Adopted
        );
        assert_eq!(
            session.current().expect("adopted").generation,
            new.generation()
        );
    }
}
