use crate::{
    core::geo::Point,
    input::events::{PointerEvent, PointerId, PointerPhase},
    prelude::Instant,
};

/// A tracked touch/pointer contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerContact {
    pub id: PointerId,
    pub position: Point,
    pub previous_position: Point,
    pub timestamp: Instant,
}

/// What applying an event did to the tracked set
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerUpdate {
    Added,
    Moved,
    Removed(PointerContact),
    /// Redundant down, or move/end for an unknown id
    Ignored,
}

/// The set of contacts currently down, in the order they went down
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    contacts: Vec<PointerContact>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Downs and moves at non-finite positions are ignored. Ends still
    /// remove the contact since their position is never used.
    pub fn apply(&mut self, event: &PointerEvent) -> PointerUpdate {
        let finite = event.position.x.is_finite() && event.position.y.is_finite();
        if !finite && !event.is_end() {
            return PointerUpdate::Ignored;
        }

        match event.phase {
            PointerPhase::Down => {
                if self.get(event.id).is_some() {
                    return PointerUpdate::Ignored;
                }
                self.contacts.push(PointerContact {
                    id: event.id,
                    position: event.position,
                    previous_position: event.position,
                    timestamp: event.timestamp,
                });
                PointerUpdate::Added
            }
            PointerPhase::Move => match self.contacts.iter_mut().find(|c| c.id == event.id) {
                Some(contact) => {
                    contact.previous_position = contact.position;
                    contact.position = event.position;
                    contact.timestamp = event.timestamp;
                    PointerUpdate::Moved
                }
                None => PointerUpdate::Ignored,
            },
            PointerPhase::Up | PointerPhase::Cancel => {
                match self.contacts.iter().position(|c| c.id == event.id) {
                    Some(index) => PointerUpdate::Removed(self.contacts.remove(index)),
                    None => PointerUpdate::Ignored,
                }
            }
        }
    }

    pub fn get(&self, id: PointerId) -> Option<&PointerContact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn contacts(&self) -> &[PointerContact] {
        &self.contacts
    }

    /// The two earliest contacts, if at least two are down
    pub fn first_two(&self) -> Option<(&PointerContact, &PointerContact)> {
        match self.contacts.as_slice() {
            [first, second, ..] => Some((first, second)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_lifecycle() {
        let now = Instant::now();
        let mut tracker = PointerTracker::new();

        assert_eq!(
            tracker.apply(&PointerEvent::down(1, Point::new(10.0, 10.0), now)),
            PointerUpdate::Added
        );
        assert_eq!(
            tracker.apply(&PointerEvent::moved(1, Point::new(20.0, 10.0), now)),
            PointerUpdate::Moved
        );

        let contact = tracker.get(1).unwrap();
        assert_eq!(contact.position, Point::new(20.0, 10.0));
        assert_eq!(contact.previous_position, Point::new(10.0, 10.0));

        assert!(matches!(
            tracker.apply(&PointerEvent::up(1, Point::new(20.0, 10.0), now)),
            PointerUpdate::Removed(PointerContact { id: 1, .. })
        ));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_anomalies_are_ignored() {
        let now = Instant::now();
        let mut tracker = PointerTracker::new();
        tracker.apply(&PointerEvent::down(1, Point::new(0.0, 0.0), now));

        let redundant = tracker.apply(&PointerEvent::down(1, Point::new(50.0, 50.0), now));
        assert_eq!(redundant, PointerUpdate::Ignored);
        assert_eq!(tracker.get(1).unwrap().position, Point::new(0.0, 0.0));

        assert_eq!(
            tracker.apply(&PointerEvent::moved(7, Point::default(), now)),
            PointerUpdate::Ignored
        );
        assert_eq!(
            tracker.apply(&PointerEvent::cancel(7, Point::default(), now)),
            PointerUpdate::Ignored
        );
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_non_finite_positions_are_ignored() {
        let now = Instant::now();
        let mut tracker = PointerTracker::new();

        assert_eq!(
            tracker.apply(&PointerEvent::down(1, Point::new(f64::NAN, 0.0), now)),
            PointerUpdate::Ignored
        );
        assert!(tracker.is_empty());

        tracker.apply(&PointerEvent::down(2, Point::new(10.0, 10.0), now));
        assert_eq!(
            tracker.apply(&PointerEvent::moved(2, Point::new(f64::INFINITY, 10.0), now)),
            PointerUpdate::Ignored
        );
        assert_eq!(tracker.get(2).unwrap().position, Point::new(10.0, 10.0));

        let removed = tracker.apply(&PointerEvent::up(2, Point::new(f64::NAN, f64::NAN), now));
        assert!(matches!(
            removed,
            PointerUpdate::Removed(PointerContact { id: 2, .. })
        ));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_first_two_keeps_down_order() {
        let now = Instant::now();
        let mut tracker = PointerTracker::new();
        assert!(tracker.first_two().is_none());

        for id in [5, 3, 9] {
            tracker.apply(&PointerEvent::down(id, Point::default(), now));
        }

        let (a, b) = tracker.first_two().unwrap();
        assert_eq!((a.id, b.id), (5, 3));
    }
}
