/// Phases of playhead tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackingPhase {
    /// No player bound yet.
    #[default]
    Idle,
    /// Player positions are published as they are polled.
    Tracking,
    /// The user holds the seek control; player positions are ignored.
    UserDragging,
}

#[derive(Debug, Default)]
pub struct SeekTracker {
    phase: TrackingPhase,
}

impl SeekTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TrackingPhase {
        self.phase
    }

    pub fn bind(&mut self) {
        if self.phase == TrackingPhase::Idle {
            self.phase = TrackingPhase::Tracking;
        }
    }

    /// Takes the seek lock. Returns `false` while no player is bound.
    pub fn begin_drag(&mut self) -> bool {
        match self.phase {
            TrackingPhase::Idle => false,
            _ => {
                self.phase = TrackingPhase::UserDragging;
                true
            }
        }
    }

    /// Releases the seek lock. Returns `false` if no drag was in progress.
    pub fn commit(&mut self) -> bool {
        if self.phase != TrackingPhase::UserDragging {
            return false;
        }
        self.phase = TrackingPhase::Tracking;
        true
    }

    pub fn is_locked(&self) -> bool {
        self.phase == TrackingPhase::UserDragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_requires_bound_player() {
        let mut tracker = SeekTracker::new();
        assert!(!tracker.begin_drag());
        assert_eq!(tracker.phase(), TrackingPhase::Idle);

        tracker.bind();
        assert!(tracker.begin_drag());
        assert!(tracker.is_locked());
    }

    #[test]
    fn commit_releases_lock_once() {
        let mut tracker = SeekTracker::new();
        tracker.bind();
        tracker.begin_drag();
        tracker.begin_drag();

        assert!(tracker.commit());
        assert_eq!(tracker.phase(), TrackingPhase::Tracking);
        assert!(!tracker.commit());
    }

    #[test]
    fn rebinding_keeps_an_active_drag() {
        let mut tracker = SeekTracker::new();
        tracker.bind();
        tracker.begin_drag();
        tracker.bind();

        assert!(tracker.is_locked());
    }
}
