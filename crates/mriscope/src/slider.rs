use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::{ClientError, Result};
use crate::surface::{Class, Region, Surface};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(7);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Circular position over the hero slides plus the auto-advance deadline.
#[derive(Debug)]
pub struct SlideController {
    len: usize,
    current: usize,
    last_active: usize,
    interval: Duration,
    /// `None` while paused.
    next_due: Option<Instant>,
}

impl SlideController {
    pub fn new(len: usize, interval: Duration) -> Result<Self> {
        if len == 0 {
            return Err(ClientError::EmptySlides);
        }
        Ok(Self {
            len,
            current: 0,
            last_active: 0,
            interval,
            next_due: None,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slide_count(&self) -> usize {
        self.len
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Index reached from the current one, wrapping at both ends.
    pub fn position_after(&self, direction: Direction) -> usize {
        match direction {
            Direction::Forward if self.current >= self.len - 1 => 0,
            Direction::Forward => self.current + 1,
            Direction::Backward if self.current == 0 => self.len - 1,
            Direction::Backward => self.current - 1,
        }
    }

    /// Mark the current slide active without moving.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.set_class(Region::Slide(self.current), Class::Active, true);
    }

    pub fn advance(&mut self, direction: Direction, surface: &mut dyn Surface) {
        self.current = self.position_after(direction);
        surface.set_class(Region::Slide(self.last_active), Class::Active, false);
        surface.set_class(Region::Slide(self.current), Class::Active, true);
        self.last_active = self.current;
        trace!(slide = self.current, ?direction, "slide advanced");
    }

    /// (Re)start the auto-advance timer from `now`.
    pub fn resume(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn pause(&mut self) {
        self.next_due = None;
    }

    /// Run the timer. Returns whether an automatic advance happened.
    pub fn tick(&mut self, now: Instant, surface: &mut dyn Surface) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        self.advance(Direction::Forward, surface);
        let next = due + self.interval;
        // A long stall (suspended window) should not replay every missed step.
        self.next_due = Some(if next <= now { now + self.interval } else { next });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::PageView;

    fn slider(len: usize) -> SlideController {
        SlideController::new(len, DEFAULT_INTERVAL).unwrap()
    }

    #[test]
    fn test_empty_slider_rejected() {
        assert!(matches!(
            SlideController::new(0, DEFAULT_INTERVAL),
            Err(ClientError::EmptySlides)
        ));
    }

    #[test]
    fn test_forward_wraps_to_first() {
        let mut surface = PageView::default();
        let mut s = slider(3);
        s.advance(Direction::Forward, &mut surface);
        s.advance(Direction::Forward, &mut surface);
        assert_eq!(s.current(), 2);
        s.advance(Direction::Forward, &mut surface);
        assert_eq!(s.current(), 0);
    }

    #[test]
    fn test_backward_wraps_to_last() {
        let mut surface = PageView::default();
        let mut s = slider(4);
        s.advance(Direction::Backward, &mut surface);
        assert_eq!(s.current(), 3);
    }

    #[test]
    fn test_index_stays_in_range_for_mixed_sequences() {
        let mut surface = PageView::default();
        for len in 1..6 {
            let mut s = slider(len);
            let mut expected: isize = 0;
            for step in 0..50 {
                let direction = if step % 3 == 0 {
                    Direction::Backward
                } else {
                    Direction::Forward
                };
                s.advance(direction, &mut surface);
                expected += if direction == Direction::Forward { 1 } else { -1 };
                assert!(s.current() < len);
                assert_eq!(s.current() as isize, expected.rem_euclid(len as isize));
            }
        }
    }

    #[test]
    fn test_single_slide_stays_put() {
        let mut surface = PageView::default();
        let mut s = slider(1);
        s.advance(Direction::Forward, &mut surface);
        s.advance(Direction::Backward, &mut surface);
        assert_eq!(s.current(), 0);
        assert!(surface.has(Region::Slide(0), Class::Active));
    }

    #[test]
    fn test_only_one_slide_active() {
        let mut surface = PageView::default();
        let mut s = slider(3);
        s.render(&mut surface);
        s.advance(Direction::Forward, &mut surface);
        assert!(!surface.has(Region::Slide(0), Class::Active));
        assert!(surface.has(Region::Slide(1), Class::Active));
        s.advance(Direction::Backward, &mut surface);
        s.advance(Direction::Backward, &mut surface);
        let active: Vec<usize> = (0..3)
            .filter(|&i| surface.has(Region::Slide(i), Class::Active))
            .collect();
        assert_eq!(active, vec![2]);
    }

    #[test]
    fn test_timer_advances_every_interval() {
        let mut surface = PageView::default();
        let mut s = slider(3);
        let start = Instant::now();
        s.resume(start);
        assert!(!s.tick(start + Duration::from_secs(6), &mut surface));
        assert!(s.tick(start + Duration::from_secs(7), &mut surface));
        assert_eq!(s.current(), 1);
        assert!(!s.tick(start + Duration::from_secs(13), &mut surface));
        assert!(s.tick(start + Duration::from_secs(14), &mut surface));
        assert_eq!(s.current(), 2);
    }

    #[test]
    fn test_hover_blocks_auto_advance_until_leave() {
        let mut surface = PageView::default();
        let mut s = slider(3);
        let start = Instant::now();
        s.resume(start);
        s.pause();
        for secs in [7, 14, 60] {
            assert!(!s.tick(start + Duration::from_secs(secs), &mut surface));
        }
        assert_eq!(s.current(), 0);

        let leave = start + Duration::from_secs(60);
        s.resume(leave);
        assert!(!s.tick(leave + Duration::from_secs(6), &mut surface));
        assert!(s.tick(leave + Duration::from_secs(7), &mut surface));
        assert_eq!(s.current(), 1);
    }

    #[test]
    fn test_click_advances_independently_of_timer() {
        let mut surface = PageView::default();
        let mut s = slider(3);
        let start = Instant::now();
        s.resume(start);
        s.advance(Direction::Forward, &mut surface);
        assert_eq!(s.next_due(), Some(start + DEFAULT_INTERVAL));
        assert!(s.tick(start + DEFAULT_INTERVAL, &mut surface));
        assert_eq!(s.current(), 2);
    }

    #[test]
    fn test_stall_does_not_replay_missed_steps() {
        let mut surface = PageView::default();
        let mut s = slider(5);
        let start = Instant::now();
        s.resume(start);
        let late = start + Duration::from_secs(70);
        assert!(s.tick(late, &mut surface));
        assert!(!s.tick(late, &mut surface));
        assert_eq!(s.current(), 1);
        assert_eq!(s.next_due(), Some(late + DEFAULT_INTERVAL));
    }
}
