//! Chamber roulette: an optional, once-per-activation gamble that replaces normal hand
//! scoring for the current blind.
//!
//! The session is a plain state machine. Player actions ([`RiskSession::confirm`],
//! [`RiskSession::spin`], [`RiskSession::boost_spin`], [`RiskSession::fire`]) move it
//! between phases that wait for input; [`RiskSession::advance`] moves it through the
//! timed phases. The session never touches the game state itself: when an outcome is
//! resolved, `advance` returns it and the [`Engine`](crate::engine::Engine) applies it.
//!
//! ```text
//! Warning -> Rolling -> Loading -> ReadyToSpin -> Spinning -> ReadyToShoot
//!         -> Shooting -> Firing -> Result
//! Rolling -(six bullets)-> Result
//! ```

use std::f64::consts::TAU;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::rng::RandomSource;

/// Chambers in the cylinder.
pub const CHAMBERS: u8 = 6;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPhase {
    /// Waiting for the player to confirm or cancel
    Warning,
    /// Bullet count is being rolled
    Rolling,
    /// Bullets are being loaded, one per `loading_step_secs`
    Loading,
    /// Waiting for the first spin
    ReadyToSpin,
    /// Cylinder is turning; boosts allowed
    Spinning,
    /// Cylinder has settled; waiting for the trigger
    ReadyToShoot,
    /// Tension before the shot
    Shooting,
    /// Outcome known, shot playing out
    Firing,
    /// Terminal; waiting for continue
    Result,
}

impl fmt::Display for RiskPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskPhase::Warning => "warning",
            RiskPhase::Rolling => "rolling",
            RiskPhase::Loading => "loading",
            RiskPhase::ReadyToSpin => "ready to spin",
            RiskPhase::Spinning => "spinning",
            RiskPhase::ReadyToShoot => "ready to shoot",
            RiskPhase::Shooting => "shooting",
            RiskPhase::Firing => "firing",
            RiskPhase::Result => "result",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskOutcome {
    /// Six bullets were rolled: the multiplier is wiped but the blind counts as won.
    SixPenalty,
    Survived { chamber: u8, bonus: f64 },
    Died { chamber: u8 },
}

impl fmt::Display for RiskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskOutcome::SixPenalty => {
                write!(f, "Six bullets. No shot is fired, but the multiplier drops to 0x.")
            }
            RiskOutcome::Survived { bonus, .. } => {
                write!(f, "CLICK... you survived! Multiplier x{}. Blind won.", bonus)
            }
            RiskOutcome::Died { .. } => write!(f, "BANG! You are dead."),
        }
    }
}

/// Timing and physics of the roulette. All durations are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub max_spins: u32,
    pub rolling_secs: f64,
    pub loading_step_secs: f64,
    /// Angular velocity added per spin or boost, radians per second
    pub spin_impulse: f64,
    /// Exponential decay rate of angular velocity, per second
    pub friction: f64,
    /// Below this angular velocity the cylinder may settle
    pub settle_threshold: f64,
    pub min_spin_secs: f64,
    pub shooting_secs: f64,
    pub firing_secs: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_spins: 3,
            rolling_secs: 2.5,
            loading_step_secs: 0.4,
            spin_impulse: 18.0,
            friction: 1.2,
            settle_threshold: 0.5,
            min_spin_secs: 1.5,
            shooting_secs: 1.2,
            firing_secs: 0.6,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.max_spins == 0 {
            return Err(GameError::InvalidRules("max_spins must be >= 1".into()));
        }
        let physics = [self.spin_impulse, self.friction, self.settle_threshold];
        if physics.iter().any(|v| !v.is_finite()) {
            return Err(GameError::InvalidRules(
                "spin_impulse, friction and settle_threshold must be finite".into(),
            ));
        }
        if !(self.friction > 0.0) || !(self.settle_threshold > 0.0) {
            return Err(GameError::InvalidRules(
                "friction and settle_threshold must be > 0".into(),
            ));
        }
        if !(self.spin_impulse > self.settle_threshold) {
            return Err(GameError::InvalidRules(
                "spin_impulse must exceed settle_threshold".into(),
            ));
        }
        let durations = [
            self.rolling_secs,
            self.loading_step_secs,
            self.min_spin_secs,
            self.shooting_secs,
            self.firing_secs,
        ];
        if durations.iter().any(|d| !(*d >= 0.0) || !d.is_finite()) {
            return Err(GameError::InvalidRules("durations must be finite and >= 0".into()));
        }
        Ok(())
    }
}

/// Reward multiplier for surviving with `bullets` loaded. The first spin is free;
/// every extra one halves the reward.
///
/// ```
/// use chamber_engine::risk::survival_bonus;
///
/// assert_eq!(survival_bonus(3, 1), 16.0);
/// assert_eq!(survival_bonus(3, 2), 8.0);
/// assert_eq!(survival_bonus(3, 3), 4.0);
/// ```
pub fn survival_bonus(bullets: u8, spins_used: u32) -> f64 {
    let base = (bullets as f64 + 1.0).powi(2);
    let penalty_spins = spins_used.saturating_sub(1) as i32;
    base * 0.5f64.powi(penalty_spins)
}

/// Chambers `0..bullets` are loaded; the shot kills iff it lands on one of them.
pub fn is_fatal(chamber: u8, bullets: u8) -> bool {
    chamber < bullets
}

#[derive(Debug, Clone)]
pub struct RiskSession {
    config: RiskConfig,
    phase: RiskPhase,
    phase_elapsed: f64,
    bullet_count: Option<u8>,
    loaded: u8,
    spins_used: u32,
    /// Radians, in `0..TAU`
    angle: f64,
    angular_velocity: f64,
    spin_elapsed: f64,
    final_chamber: Option<u8>,
    outcome: Option<RiskOutcome>,
}

impl RiskSession {
    pub fn new(config: RiskConfig) -> Self {
        Self {
            config,
            phase: RiskPhase::Warning,
            phase_elapsed: 0.0,
            bullet_count: None,
            loaded: 0,
            spins_used: 0,
            angle: 0.0,
            angular_velocity: 0.0,
            spin_elapsed: 0.0,
            final_chamber: None,
            outcome: None,
        }
    }

    pub fn phase(&self) -> RiskPhase {
        self.phase
    }

    /// Rolled bullet count, once past the warning.
    pub fn bullet_count(&self) -> Option<u8> {
        self.bullet_count
    }

    /// Visual loading counter.
    pub fn loaded_chambers(&self) -> u8 {
        self.loaded
    }

    pub fn spins_used(&self) -> u32 {
        self.spins_used
    }

    pub fn spins_remaining(&self) -> u32 {
        self.config.max_spins.saturating_sub(self.spins_used)
    }

    pub fn final_chamber(&self) -> Option<u8> {
        self.final_chamber
    }

    /// Cylinder rotation in degrees, `0..360`.
    pub fn chamber_angle(&self) -> f64 {
        self.angle.to_degrees()
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Bonus a survival would pay with the spins used so far.
    pub fn potential_bonus(&self) -> Option<f64> {
        match self.bullet_count {
            Some(b) if b < CHAMBERS => Some(survival_bonus(b, self.spins_used)),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<RiskOutcome> {
        self.outcome
    }

    pub fn outcome_text(&self) -> Option<String> {
        self.outcome.map(|o| o.to_string())
    }

    /// Only the warning can be backed out of.
    pub fn can_cancel(&self) -> bool {
        self.phase == RiskPhase::Warning
    }

    /// Phases that wait for the player rather than the clock.
    pub fn awaiting_input(&self) -> bool {
        matches!(
            self.phase,
            RiskPhase::Warning | RiskPhase::ReadyToSpin | RiskPhase::ReadyToShoot | RiskPhase::Result
        )
    }

    /// Accepts the gamble and rolls the bullet count.
    pub fn confirm(&mut self, rng: &mut dyn RandomSource) -> Result<u8, GameError> {
        self.expect_phase(RiskPhase::Warning, "confirm")?;
        let bullets = rng.next_below(CHAMBERS as usize) as u8 + 1;
        self.bullet_count = Some(bullets);
        tracing::debug!(bullets, "roulette bullets rolled");
        self.enter(RiskPhase::Rolling);
        Ok(bullets)
    }

    pub fn spin(&mut self) -> Result<(), GameError> {
        self.expect_phase(RiskPhase::ReadyToSpin, "spin")?;
        self.spins_used = 1;
        self.spin_elapsed = 0.0;
        self.angular_velocity += self.config.spin_impulse;
        self.enter(RiskPhase::Spinning);
        Ok(())
    }

    pub fn boost_spin(&mut self) -> Result<(), GameError> {
        self.expect_phase(RiskPhase::Spinning, "boost")?;
        if self.spins_used >= self.config.max_spins {
            return Err(GameError::NoSpinsRemaining);
        }
        self.spins_used += 1;
        self.angular_velocity += self.config.spin_impulse;
        tracing::debug!(spins_used = self.spins_used, "roulette boosted");
        Ok(())
    }

    pub fn fire(&mut self) -> Result<(), GameError> {
        self.expect_phase(RiskPhase::ReadyToShoot, "fire")?;
        self.enter(RiskPhase::Shooting);
        Ok(())
    }

    /// Moves the timed phases forward by `elapsed`, at most one transition per call.
    /// Returns the outcome on the tick it is resolved.
    pub fn advance(&mut self, elapsed: Duration, rng: &mut dyn RandomSource) -> Option<RiskOutcome> {
        let dt = elapsed.as_secs_f64();
        match self.phase {
            RiskPhase::Warning | RiskPhase::ReadyToSpin | RiskPhase::ReadyToShoot | RiskPhase::Result => {
                None
            }
            RiskPhase::Rolling => {
                self.phase_elapsed += dt;
                if self.phase_elapsed < self.config.rolling_secs {
                    return None;
                }
                if self.bullet_count == Some(CHAMBERS) {
                    self.outcome = Some(RiskOutcome::SixPenalty);
                    self.enter(RiskPhase::Result);
                    return self.outcome;
                }
                self.enter(RiskPhase::Loading);
                None
            }
            RiskPhase::Loading => {
                self.phase_elapsed += dt;
                let bullets = self.bullet_count.unwrap_or(0);
                let step = self.config.loading_step_secs;
                if step <= 0.0 || self.phase_elapsed >= step * bullets as f64 {
                    self.loaded = bullets;
                    self.enter(RiskPhase::ReadyToSpin);
                } else {
                    self.loaded = ((self.phase_elapsed / step) as u8).min(bullets);
                }
                None
            }
            RiskPhase::Spinning => {
                self.step_spin(dt, rng);
                None
            }
            RiskPhase::Shooting => {
                self.phase_elapsed += dt;
                if self.phase_elapsed < self.config.shooting_secs {
                    return None;
                }
                let (Some(chamber), Some(bullets)) = (self.final_chamber, self.bullet_count) else {
                    return None;
                };
                let outcome = if is_fatal(chamber, bullets) {
                    RiskOutcome::Died { chamber }
                } else {
                    RiskOutcome::Survived {
                        chamber,
                        bonus: survival_bonus(bullets, self.spins_used),
                    }
                };
                self.outcome = Some(outcome);
                self.enter(RiskPhase::Firing);
                Some(outcome)
            }
            RiskPhase::Firing => {
                self.phase_elapsed += dt;
                if self.phase_elapsed >= self.config.firing_secs {
                    self.enter(RiskPhase::Result);
                }
                None
            }
        }
    }

    fn step_spin(&mut self, dt: f64, rng: &mut dyn RandomSource) {
        self.spin_elapsed += dt;
        self.angle = (self.angle + self.angular_velocity * dt).rem_euclid(TAU);
        self.angular_velocity *= (-self.config.friction * dt).exp();
        if self.angular_velocity >= self.config.settle_threshold
            || self.spin_elapsed < self.config.min_spin_secs
        {
            return;
        }
        let chamber = rng.next_below(CHAMBERS as usize) as u8;
        self.final_chamber = Some(chamber);
        self.angular_velocity = 0.0;
        self.angle = chamber as f64 * TAU / CHAMBERS as f64;
        self.enter(RiskPhase::ReadyToShoot);
    }

    fn expect_phase(&self, phase: RiskPhase, action: &'static str) -> Result<(), GameError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(GameError::WrongRiskPhase {
                action,
                phase: self.phase,
            })
        }
    }

    fn enter(&mut self, phase: RiskPhase) {
        tracing::debug!(from = %self.phase, to = %phase, "roulette phase");
        self.phase = phase;
        self.phase_elapsed = 0.0;
    }
}
