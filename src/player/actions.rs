//! Timers and triggers gating the player's actions.
//!
//! - [`StartupGate`]: one-shot countdown before the blob pops into view.
//! - [`FireCooldown`]: minimum interval between spitballs.
//! - [`trigger_held`]: level-triggered check shared by fire and suck.
//!
//! All timers are decrement-and-check; nothing is scheduled.

/// Where the startup countdown stands after an [`StartupGate::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Still straining: the character is invisible and ignores input.
    Dormant,
    /// The countdown crossed zero during this call.  Reported exactly once.
    Revealed,
    /// Gameplay is live.
    Active,
}

/// One-shot startup countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartupGate {
    remaining: f32,
}

impl StartupGate {
    pub fn new(start_time: f32) -> Self {
        Self {
            remaining: start_time.max(0.0),
        }
    }

    /// `true` once the countdown has run out; never reverts.
    pub fn is_open(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    /// Count down by `dt` while dormant.
    ///
    /// Returns [`Phase::Revealed`] on the call that crosses zero, which is
    /// still a non-gameplay tick; every later call returns [`Phase::Active`].
    pub fn advance(&mut self, dt: f32) -> Phase {
        if self.is_open() {
            return Phase::Active;
        }
        self.remaining -= dt;
        if self.is_open() {
            Phase::Revealed
        } else {
            Phase::Dormant
        }
    }
}

/// Countdown to the next allowed shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireCooldown {
    /// Seconds until the next shot; may go negative while idle.
    timer: f32,
    cooldown: f32,
}

impl FireCooldown {
    pub fn new(cooldown: f32) -> Self {
        Self {
            timer: 0.0,
            cooldown,
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn tick(&mut self, dt: f32) {
        self.timer -= dt;
    }

    /// Fire if `trigger` is above `dead_zone` and the timer has run out.
    ///
    /// On success the timer is reset to the full cooldown.
    pub fn try_fire(&mut self, trigger: f32, dead_zone: f32) -> bool {
        if self.timer <= 0.0 && trigger_held(trigger, dead_zone) {
            self.timer = self.cooldown;
            true
        } else {
            false
        }
    }
}

/// Strictly-above threshold test for analog triggers.
#[inline]
pub fn trigger_held(trigger: f32, dead_zone: f32) -> bool {
    trigger > dead_zone
}
