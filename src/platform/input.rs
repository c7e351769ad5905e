//! Jump input collection
//!
//! Platform callbacks report raw presses and releases here. The handler turns
//! them into edge-triggered jump intents that the frame loop consumes once per
//! tick, so input callbacks never touch simulation state directly.

use crate::sim::{GamePhase, TickInput};

/// Physical source of a jump press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Space,
    ArrowUp,
    Pointer,
    Touch,
}

impl Trigger {
    /// Map a `KeyboardEvent.code` to a jump key
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "Space" => Some(Trigger::Space),
            "ArrowUp" => Some(Trigger::ArrowUp),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Trigger::Space => 1,
            Trigger::ArrowUp => 1 << 1,
            Trigger::Pointer => 1 << 2,
            Trigger::Touch => 1 << 3,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    /// Triggers currently held down
    held: u8,
    /// A jump edge arrived since the last tick
    jump_pending: bool,
    /// Demo mode flag passed through to every tick
    pub autopilot: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A trigger went down. Repeats while already held are ignored.
    pub fn press(&mut self, trigger: Trigger) {
        if self.held & trigger.bit() != 0 {
            return;
        }
        self.held |= trigger.bit();
        self.jump_pending = true;
    }

    pub fn release(&mut self, trigger: Trigger) {
        self.held &= !trigger.bit();
    }

    /// Forget held triggers (focus loss, teardown)
    pub fn reset(&mut self) {
        self.held = 0;
        self.jump_pending = false;
    }

    /// Consume this frame's intents. Jumps are dropped unless the run is active.
    pub fn take_tick_input(&mut self, phase: GamePhase) -> TickInput {
        let jump = std::mem::take(&mut self.jump_pending);
        TickInput {
            jump: jump && phase == GamePhase::Active,
            autopilot: self.autopilot,
        }
    }
}
