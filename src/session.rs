//! Session driver: apply one update at a time, repaint when anything changed
//!
//! A `Session` owns the [`StateStore`], the [`Renderer`] and (once attached)
//! the drawing surface. Updates are processed strictly one after another; an
//! update is fully applied and, if it changed anything, fully rendered before
//! the next one is looked at.

use std::collections::VecDeque;

use crate::error::{Result, ViewError};
use crate::protocol::{ServerMessage, WorldRequest};
use crate::render::{DrawingSurface, Renderer};
use crate::world::{StateStore, WorldSnapshot, WorldUpdate};

/// Running counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub updates_applied: u64,
    pub updates_rejected: u64,
    pub redraws: u64,
}

/// Outcome of draining the update queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub applied: usize,
    pub rejected: usize,
    pub redraws: usize,
}

pub struct Session<S> {
    store: StateStore,
    renderer: Renderer,
    surface: Option<S>,
    pending: VecDeque<WorldUpdate>,
    stats: SessionStats,
}

impl<S: DrawingSurface> Session<S> {
    /// Start a session with an empty world and no surface attached.
    pub fn new(renderer: Renderer) -> Self {
        Self {
            store: StateStore::new(),
            renderer,
            surface: None,
            pending: VecDeque::new(),
            stats: SessionStats::default(),
        }
    }

    /// Attach the drawing target, returning the previous one if any.
    pub fn attach_surface(&mut self, surface: S) -> Option<S> {
        self.surface.replace(surface)
    }

    pub fn detach_surface(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn snapshot(&self) -> &WorldSnapshot {
        self.store.snapshot()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Number of queued updates not processed yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Apply `update` and repaint once if it changed anything.
    ///
    /// Returns whether the snapshot changed. A malformed update is rejected
    /// in full and leaves both the snapshot and the surface untouched.
    pub fn on_update(&mut self, update: WorldUpdate) -> Result<bool> {
        let outcome = match self.store.apply_update(update) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.stats.updates_rejected += 1;
                return Err(e);
            }
        };
        if !outcome.changed {
            return Ok(false);
        }
        self.stats.updates_applied += 1;
        self.redraw()?;
        Ok(true)
    }

    /// Repaint from the current snapshot, e.g. after attaching a new surface.
    ///
    /// Returns whether anything was painted (nothing is painted before the
    /// world size is known).
    pub fn redraw(&mut self) -> Result<bool> {
        let painted = self
            .renderer
            .redraw(self.store.snapshot(), self.surface.as_mut())?;
        if painted {
            self.stats.redraws += 1;
        }
        Ok(painted)
    }

    /// Decode one server message and apply the world fields it carries.
    ///
    /// Returns the request the transport should send in reply, if any: once
    /// the server acknowledges the login, the full map is requested.
    pub fn on_message(&mut self, text: &str) -> Result<Option<WorldRequest>> {
        let message = match ServerMessage::decode(text) {
            Ok(message) => message,
            Err(e) => {
                self.stats.updates_rejected += 1;
                return Err(e);
            }
        };
        let authenticated = message.is_authenticated();
        if authenticated {
            log::info!("Server accepted the session, requesting full map");
        }

        let update = message.into_update();
        if !update.is_empty() {
            self.on_update(update)?;
        }

        Ok(authenticated.then(WorldRequest::full_map))
    }

    /// Queue an update for [`Session::process_pending`].
    pub fn enqueue(&mut self, update: WorldUpdate) {
        self.pending.push_back(update);
    }

    /// Drain the queue in arrival order.
    ///
    /// Malformed updates are logged and skipped. A missing surface stops the
    /// drain and is returned; later updates stay queued. The report is lost on
    /// that path, so read [`Session::stats`] for what was applied before the stop.
    pub fn process_pending(&mut self) -> Result<ProcessReport> {
        let mut report = ProcessReport::default();
        while let Some(update) = self.pending.pop_front() {
            let redraws_before = self.stats.redraws;
            match self.on_update(update) {
                Ok(changed) => {
                    if changed {
                        report.applied += 1;
                    }
                }
                Err(ViewError::MalformedUpdate { field, reason }) => {
                    log::warn!("Rejected update ({}): {}", field, reason);
                    report.rejected += 1;
                }
                Err(e) => return Err(e),
            }
            report.redraws += (self.stats.redraws - redraws_before) as usize;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{PixelSurface, RenderStyle};
    use crate::world::{Creature, FoodTile};

    fn session() -> Session<PixelSurface> {
        let mut session = Session::new(Renderer::default());
        session.attach_surface(PixelSurface::new(32, 32));
        session
    }

    #[test]
    fn test_size_unset_does_not_redraw() {
        let mut session = session();
        let changed = session
            .on_update(WorldUpdate::default().with_creatures(vec![]))
            .unwrap();
        assert!(changed);
        assert_eq!(session.stats().redraws, 0);
    }

    #[test]
    fn test_each_change_redraws_once() {
        let mut session = session();
        session.on_update(WorldUpdate::default().with_size(8.0)).unwrap();
        session
            .on_update(WorldUpdate::default().with_food_fields(vec![FoodTile::uniform(
                0.0, 0.0, 8.0, true,
            )]))
            .unwrap();
        assert!(!session.on_update(WorldUpdate::default()).unwrap());
        assert_eq!(
            session.stats(),
            SessionStats {
                updates_applied: 2,
                updates_rejected: 0,
                redraws: 2,
            }
        );
    }

    #[test]
    fn test_missing_surface_is_reported() {
        let mut session: Session<PixelSurface> = Session::new(Renderer::default());
        let err = session
            .on_update(WorldUpdate::default().with_size(8.0))
            .unwrap_err();
        assert!(matches!(err, ViewError::SurfaceUnavailable));
        // The store still accepted the data; a later attach can paint it.
        assert_eq!(session.snapshot().size(), Some(8.0));
        session.attach_surface(PixelSurface::new(4, 4));
        assert!(session.redraw().unwrap());
    }

    #[test]
    fn test_queue_skips_malformed_updates() {
        let mut session = session();
        session.enqueue(WorldUpdate::default().with_size(16.0));
        session.enqueue(WorldUpdate::default().with_size(-1.0));
        session.enqueue(WorldUpdate::default());
        session.enqueue(WorldUpdate::default().with_creatures(vec![Creature {
            x: 8.0,
            y: 8.0,
            radius: 1.0,
            direction: 0.0,
        }]));

        let report = session.process_pending().unwrap();
        assert_eq!(
            report,
            ProcessReport {
                applied: 2,
                rejected: 1,
                redraws: 2,
            }
        );
        assert_eq!(session.pending(), 0);
        assert_eq!(session.snapshot().size(), Some(16.0));
        assert_eq!(session.stats().updates_rejected, 1);
    }

    #[test]
    fn test_queue_stops_without_surface() {
        let mut session: Session<PixelSurface> = Session::new(Renderer::default());
        session.enqueue(WorldUpdate::default().with_size(16.0));
        session.enqueue(WorldUpdate::default().with_creatures(vec![]));
        assert!(matches!(
            session.process_pending(),
            Err(ViewError::SurfaceUnavailable)
        ));
        assert_eq!(session.pending(), 1);
        // The update that hit the missing surface was still applied.
        assert_eq!(session.stats().updates_applied, 1);
        assert_eq!(session.stats().redraws, 0);
        assert_eq!(session.snapshot().size(), Some(16.0));
    }

    #[test]
    fn test_authenticated_requests_full_map() {
        let mut session = session();
        let reply = session.on_message(r#"{"authenticated":true}"#).unwrap();
        assert_eq!(reply, Some(WorldRequest::full_map()));
        assert_eq!(session.stats().updates_applied, 0);

        let reply = session.on_message(r#"{"food_dist":{"size":8}}"#).unwrap();
        assert_eq!(reply, None);
        assert_eq!(session.stats().redraws, 1);
    }

    #[test]
    fn test_undecodable_message_counts_as_rejected() {
        let mut session = session();
        assert!(session.on_message("garbage").is_err());
        assert_eq!(session.stats().updates_rejected, 1);
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn test_replacing_food_repaints_whole_frame() {
        let style = RenderStyle::default();
        let mut session = Session::new(Renderer::new(style.clone()));
        session.attach_surface(PixelSurface::new(8, 8));
        session
            .on_update(
                WorldUpdate::default()
                    .with_size(8.0)
                    .with_food_fields(vec![FoodTile::uniform(0.0, 0.0, 8.0, true)]),
            )
            .unwrap();
        let surface = session.surface().unwrap();
        assert_eq!(surface.count_color(style.occupied_color), 64);

        // A fresh world arrives through the update path, never by wiping state.
        session
            .on_update(WorldUpdate::default().with_food_fields(vec![]))
            .unwrap();
        let surface = session.surface().unwrap();
        assert_eq!(surface.count_color(style.occupied_color), 0);
        assert_eq!(session.snapshot().size(), Some(8.0));
    }
}
