//! The player avatar: movement, auto-aimed fire, class specials and i-frames.

use collapse_arena_core::{
    snapshot::{PlayerPose, VisualFlags},
    ArenaBounds, FrameInput, Health, PlayerClass, Vec2, WeaponMod, MAX_WEAPON_TIER,
};
use collapse_arena_system_projectiles::{fire_volley, tier_factor, ProjectileSpawn, VolleyRequest};
use rand::Rng;

use crate::PLAYER_RADIUS;

/// Movement speed in units per second.
pub const PLAYER_SPEED: f32 = 220.0;
/// Maximum player health.
pub const PLAYER_MAX_HEALTH: f32 = 100.0;
/// Invulnerability granted by a discrete hit, in seconds.
pub const INVULNERABILITY_SECS: f32 = 0.6;
/// Seconds between volleys at the base fire rate.
pub const FIRE_INTERVAL_SECS: f32 = 0.22;
/// Seconds a sniper slow lasts.
pub const SLOW_SECS: f32 = 1.5;
/// Seconds an overclock lasts.
pub const OVERCLOCK_SECS: f32 = 4.0;
/// Seconds a deployed turret lasts.
pub const TURRET_LIFETIME_SECS: f32 = 8.0;

const STARTING_CHARGES: u32 = 2;
const MAX_CHARGES: u32 = 3;
const SPECIAL_COOLDOWN_SECS: f32 = 1.0;
const SLOW_FACTOR: f32 = 0.55;
const OVERCLOCK_FIRE_FACTOR: f32 = 0.5;
const PURGE_RADIUS: f32 = 200.0;
const PURGE_DAMAGE: f32 = 40.0;
const FLASH_SECS: f32 = 0.1;

/// Class ability requested by the player this step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpecialAbility {
    /// Halves the fire interval for `duration` seconds.
    Overclock {
        /// Seconds the overclock lasts.
        duration: f32,
    },
    /// Area burst around the player.
    Purge {
        /// Centre of the burst.
        center: Vec2,
        /// Burst radius.
        radius: f32,
        /// Damage dealt to every enemy inside.
        damage: f32,
    },
    /// Deploys a stationary turret.
    Turret {
        /// Deployment point.
        position: Vec2,
        /// Seconds the turret survives.
        lifetime: f32,
    },
}

/// Outcome of one player update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerStep {
    /// A volley was fired.
    pub fired: bool,
    /// A special ability was triggered.
    pub special: Option<SpecialAbility>,
}

/// The player avatar.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    position: Vec2,
    velocity: Vec2,
    aim: Option<Vec2>,
    health: Health,
    class: PlayerClass,
    weapon: WeaponMod,
    tier: u32,
    fire_timer: f32,
    charges: u32,
    special_cooldown: f32,
    invulnerable: f32,
    flash: f32,
    slowed: bool,
    overclocked: bool,
    tokens: u32,
    token_progress: u32,
    tokens_per_charge: u32,
}

impl Player {
    /// Creates a full-health player of `class` at `position`.
    #[must_use]
    pub fn new(class: PlayerClass, position: Vec2, tokens_per_charge: u32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            aim: None,
            health: Health::full(PLAYER_MAX_HEALTH),
            class,
            weapon: WeaponMod::Standard,
            tier: 1,
            fire_timer: 0.0,
            charges: STARTING_CHARGES,
            special_cooldown: 0.0,
            invulnerable: 0.0,
            flash: 0.0,
            slowed: false,
            overclocked: false,
            tokens: 0,
            token_progress: 0,
            tokens_per_charge: tokens_per_charge.max(1),
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity applied during the last update.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Point the player aimed at during the last update.
    #[must_use]
    pub const fn aim(&self) -> Option<Vec2> {
        self.aim
    }

    /// Health pool.
    #[must_use]
    pub const fn health(&self) -> &Health {
        &self.health
    }

    /// Player class.
    #[must_use]
    pub const fn class(&self) -> PlayerClass {
        self.class
    }

    /// Active weapon modifier.
    #[must_use]
    pub const fn weapon(&self) -> WeaponMod {
        self.weapon
    }

    /// Active weapon tier.
    #[must_use]
    pub const fn tier(&self) -> u32 {
        self.tier
    }

    /// Special ability charges available.
    #[must_use]
    pub const fn charges(&self) -> u32 {
        self.charges
    }

    /// Tokens collected this run.
    #[must_use]
    pub const fn tokens(&self) -> u32 {
        self.tokens
    }

    /// Reports whether invulnerability frames are active.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    /// Reports whether a slow is active.
    #[must_use]
    pub const fn is_slowed(&self) -> bool {
        self.slowed
    }

    /// Reports whether an overclock is active.
    #[must_use]
    pub const fn is_overclocked(&self) -> bool {
        self.overclocked
    }

    /// Reports whether the player ran out of health.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health.is_depleted()
    }

    /// Seconds between volleys at the current fire rate.
    #[must_use]
    pub fn fire_interval(&self) -> f32 {
        if self.overclocked {
            FIRE_INTERVAL_SECS * OVERCLOCK_FIRE_FACTOR
        } else {
            FIRE_INTERVAL_SECS
        }
    }

    /// Advances timers, moves, triggers the special and fires at `aim_target`.
    ///
    /// Volleys are appended to `volleys`. Without an aim target the fire
    /// control is ignored.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        input: &FrameInput,
        bounds: &ArenaBounds,
        aim_target: Option<Vec2>,
        rng: &mut R,
        volleys: &mut Vec<ProjectileSpawn>,
    ) -> PlayerStep {
        let mut step = PlayerStep::default();
        if self.is_dead() || !(dt > 0.0) {
            return step;
        }

        self.invulnerable = (self.invulnerable - dt).max(0.0);
        self.flash = (self.flash - dt).max(0.0);
        self.special_cooldown = (self.special_cooldown - dt).max(0.0);
        self.fire_timer = (self.fire_timer - dt).max(0.0);

        let speed = if self.slowed {
            PLAYER_SPEED * SLOW_FACTOR
        } else {
            PLAYER_SPEED
        };
        self.velocity = input.clamped_movement() * speed;
        self.position = bounds.clamp_circle(self.position + self.velocity * dt, PLAYER_RADIUS);
        self.aim = aim_target;

        if input.special {
            step.special = self.trigger_special();
        }

        if input.firing && self.fire_timer <= 0.0 {
            if let Some(aim) = self.aim {
                let crit_multiplier = if rng.gen::<f32>() < self.class.crit_chance() {
                    self.class.crit_multiplier()
                } else {
                    1.0
                };
                fire_volley(
                    VolleyRequest {
                        weapon: self.weapon,
                        tier: self.tier,
                        crit_multiplier,
                        origin: self.position,
                        aim,
                    },
                    volleys,
                );
                self.fire_timer = self.fire_interval();
                step.fired = true;
            }
        }
        step
    }

    /// Applies a discrete hit and reports whether it was lethal.
    ///
    /// Hits during invulnerability are ignored; a hit that lands grants
    /// invulnerability frames.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_invulnerable() || self.is_dead() || !(amount > 0.0) {
            return false;
        }
        self.invulnerable = INVULNERABILITY_SECS;
        self.flash = FLASH_SECS;
        self.health.apply_damage(amount)
    }

    /// Applies continuous damage such as contact or collapse burn.
    ///
    /// Respects invulnerability without granting it.
    pub fn take_continuous_damage(&mut self, amount: f32) -> bool {
        if self.is_invulnerable() || self.is_dead() {
            return false;
        }
        self.health.apply_damage(amount)
    }

    /// Restores health and returns the amount applied.
    pub fn heal(&mut self, amount: f32) -> f32 {
        self.health.heal(amount)
    }

    /// Slows the player until [`Player::clear_slow`] is called.
    pub fn apply_slow(&mut self) {
        self.slowed = true;
    }

    /// Ends an active slow.
    pub fn clear_slow(&mut self) {
        self.slowed = false;
    }

    /// Starts or ends an overclock.
    pub fn set_overclock(&mut self, active: bool) {
        self.overclocked = active;
        if active {
            self.fire_timer = self.fire_timer.min(self.fire_interval());
        }
    }

    /// Swaps the active weapon modifier.
    pub fn set_weapon(&mut self, weapon: WeaponMod) {
        self.weapon = weapon;
    }

    /// Sets the weapon tier, clamped to the reachable range.
    pub fn set_tier(&mut self, tier: u32) {
        self.tier = tier.clamp(1, MAX_WEAPON_TIER);
    }

    /// Adds tokens and returns the number of special charges they granted.
    pub fn add_tokens(&mut self, amount: u32) -> u32 {
        self.tokens = self.tokens.saturating_add(amount);
        self.token_progress += amount;
        let mut granted = 0;
        while self.token_progress >= self.tokens_per_charge {
            self.token_progress -= self.tokens_per_charge;
            if self.charges < MAX_CHARGES {
                self.charges += 1;
                granted += 1;
            }
        }
        granted
    }

    /// Displaces the player, keeping the body inside `bounds`.
    pub fn nudge(&mut self, offset: Vec2, bounds: &ArenaBounds) {
        self.position = bounds.clamp_circle(self.position + offset, PLAYER_RADIUS);
    }

    /// Snapshot of the player for the renderer.
    #[must_use]
    pub fn pose(&self) -> PlayerPose {
        PlayerPose {
            position: self.position,
            aim: self.aim,
            health_fraction: self.health.fraction(),
            invulnerable: self.is_invulnerable(),
            flags: VisualFlags {
                flashing: self.flash > 0.0,
                dying: self.is_dead(),
                ..VisualFlags::default()
            },
        }
    }

    fn trigger_special(&mut self) -> Option<SpecialAbility> {
        if self.charges == 0 || self.special_cooldown > 0.0 {
            return None;
        }
        self.charges -= 1;
        self.special_cooldown = SPECIAL_COOLDOWN_SECS;

        let ability = match self.class {
            PlayerClass::Striker => SpecialAbility::Overclock {
                duration: OVERCLOCK_SECS,
            },
            PlayerClass::Reaper => SpecialAbility::Purge {
                center: self.position,
                radius: PURGE_RADIUS,
                damage: PURGE_DAMAGE * tier_factor(self.tier),
            },
            PlayerClass::Engineer => SpecialAbility::Turret {
                position: self.position,
                lifetime: TURRET_LIFETIME_SECS,
            },
        };
        Some(ability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn bounds() -> ArenaBounds {
        ArenaBounds::new(1_280.0, 720.0)
    }

    fn step(player: &mut Player, input: FrameInput, aim: Option<Vec2>) -> (PlayerStep, Vec<ProjectileSpawn>) {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut volleys = Vec::new();
        let outcome = player.update(0.016, &input, &bounds(), aim, &mut rng, &mut volleys);
        (outcome, volleys)
    }

    #[test]
    fn hits_grant_invulnerability_frames() {
        let mut player = Player::new(PlayerClass::Striker, Vec2::new(100.0, 100.0), 10);
        assert!(!player.take_damage(30.0));
        assert!(player.is_invulnerable());
        assert!(!player.take_damage(30.0));
        assert_eq!(player.health().current(), 70.0);
    }

    #[test]
    fn continuous_damage_respects_but_never_grants_frames() {
        let mut player = Player::new(PlayerClass::Striker, Vec2::new(100.0, 100.0), 10);
        let _ = player.take_continuous_damage(5.0);
        assert!(!player.is_invulnerable());
        let _ = player.take_continuous_damage(5.0);
        assert_eq!(player.health().current(), 90.0);

        let _ = player.take_damage(10.0);
        let _ = player.take_continuous_damage(5.0);
        assert_eq!(player.health().current(), 80.0);
    }

    #[test]
    fn movement_is_clamped_to_the_arena() {
        let mut player = Player::new(PlayerClass::Reaper, Vec2::new(15.0, 15.0), 10);
        let input = FrameInput::new(Vec2::new(-1.0, -1.0), false, false);
        let _ = step(&mut player, input, None);
        assert_eq!(player.position(), Vec2::splat(PLAYER_RADIUS));
    }

    #[test]
    fn slow_scales_movement() {
        let mut player = Player::new(PlayerClass::Reaper, Vec2::new(500.0, 300.0), 10);
        player.apply_slow();
        let _ = step(&mut player, FrameInput::new(Vec2::X, false, false), None);
        assert!((player.velocity().x - PLAYER_SPEED * SLOW_FACTOR).abs() < 1e-4);
        player.clear_slow();
        let _ = step(&mut player, FrameInput::new(Vec2::X, false, false), None);
        assert!((player.velocity().x - PLAYER_SPEED).abs() < 1e-4);
    }

    #[test]
    fn fires_only_with_an_aim_target() {
        let mut player = Player::new(PlayerClass::Engineer, Vec2::new(500.0, 300.0), 10);
        let firing = FrameInput::new(Vec2::ZERO, true, false);
        let (outcome, volleys) = step(&mut player, firing, None);
        assert!(!outcome.fired);
        assert!(volleys.is_empty());

        let (outcome, volleys) = step(&mut player, firing, Some(Vec2::new(700.0, 300.0)));
        assert!(outcome.fired);
        assert_eq!(volleys.len(), 1);
        assert!(volleys[0].from_player);
    }

    #[test]
    fn overclock_halves_fire_interval() {
        let mut player = Player::new(PlayerClass::Striker, Vec2::new(500.0, 300.0), 10);
        let (outcome, _) = step(&mut player, FrameInput::new(Vec2::ZERO, false, true), None);
        assert_eq!(
            outcome.special,
            Some(SpecialAbility::Overclock {
                duration: OVERCLOCK_SECS
            })
        );
        player.set_overclock(true);
        assert!((player.fire_interval() - 0.11).abs() < 1e-6);
    }

    #[test]
    fn special_consumes_charges_and_honours_cooldown() {
        let mut player = Player::new(PlayerClass::Reaper, Vec2::new(500.0, 300.0), 10);
        let special = FrameInput::new(Vec2::ZERO, false, true);
        let (first, _) = step(&mut player, special, None);
        assert!(matches!(first.special, Some(SpecialAbility::Purge { radius, .. }) if radius == PURGE_RADIUS));
        let (second, _) = step(&mut player, special, None);
        assert!(second.special.is_none(), "cooldown still running");
        assert_eq!(player.charges(), 1);
    }

    #[test]
    fn tokens_grant_charges_up_to_the_cap() {
        let mut player = Player::new(PlayerClass::Engineer, Vec2::ZERO, 10);
        assert_eq!(player.add_tokens(9), 0);
        assert_eq!(player.add_tokens(1), 1);
        assert_eq!(player.charges(), 3);
        assert_eq!(player.add_tokens(10), 0);
        assert_eq!(player.charges(), 3);
        assert_eq!(player.tokens(), 20);
    }

    #[test]
    fn tier_is_clamped() {
        let mut player = Player::new(PlayerClass::Striker, Vec2::ZERO, 10);
        player.set_tier(9);
        assert_eq!(player.tier(), MAX_WEAPON_TIER);
        player.set_tier(0);
        assert_eq!(player.tier(), 1);
    }
}
