//! The robot's replay memory: a bounded cache of past (perception, action)
//! pairs.  A recurring perception replays the remembered action instead of
//! consulting the rule book.  This is a cache, not a learner: entries are
//! never rewritten, only evicted FIFO once the cap is reached.

use std::collections::VecDeque;

use mkr_rules::{RobotAction, RobotPerception};

/// One remembered step.  The stored action is the *specific* action that was
/// executed (a resolved `move_random` is stored as its concrete `move`).
#[derive(Clone, Debug)]
pub struct Experience {
    pub perception: RobotPerception,
    pub action: RobotAction,
}

/// Bounded FIFO of [`Experience`]s, newest at the back.
pub struct ReplayMemory {
    entries: VecDeque<Experience>,
    cap: usize,
}

impl ReplayMemory {
    pub fn new(cap: usize) -> ReplayMemory {
        ReplayMemory { entries: VecDeque::new(), cap }
    }

    /// Record an experience, evicting the oldest entry at the cap.
    pub fn push(&mut self, experience: Experience) {
        if self.cap == 0 {
            return;
        }
        if self.entries.len() == self.cap {
            self.entries.pop_front();
        }
        self.entries.push_back(experience);
    }

    /// The most recent remembered action whose perception matches `p` over
    /// all eight key sensors, scanning newest to oldest.
    pub fn recall(&self, p: &RobotPerception) -> Option<&RobotAction> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.perception.matches(p))
            .map(|e| &e.action)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
