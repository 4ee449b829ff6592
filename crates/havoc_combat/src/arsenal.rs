//! Player weapon arsenal

use crate::error::{CombatError, Result};
use crate::hooks::{CombatHost, Effect, Sound};
use crate::loot::Pickup;
use crate::projectile::{ProjectileSpawn, ProjectileTier};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Minimum time between two weapon switches
pub const SWITCH_COOLDOWN_MS: u64 = 500;

/// Perturb a unit direction by `(rand - 0.5) * spread` on each axis, then
/// renormalize.
pub fn scatter<R: Rng + ?Sized>(direction: Vec3, spread: f32, rng: &mut R) -> Vec3 {
    let base = direction.normalize_or_zero();
    if spread <= 0.0 {
        return base;
    }
    let jitter = Vec3::new(
        (rng.gen::<f32>() - 0.5) * spread,
        (rng.gen::<f32>() - 0.5) * spread,
        (rng.gen::<f32>() - 0.5) * spread,
    );
    (base + jitter).normalize_or_zero()
}

/// The seven player weapons, in slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Pistol,
    Shotgun,
    AssaultRifle,
    SniperRifle,
    RocketLauncher,
    PlasmaGun,
    Bfg,
}

impl WeaponKind {
    /// Slot order
    pub const ALL: [WeaponKind; 7] = [
        WeaponKind::Pistol,
        WeaponKind::Shotgun,
        WeaponKind::AssaultRifle,
        WeaponKind::SniperRifle,
        WeaponKind::RocketLauncher,
        WeaponKind::PlasmaGun,
        WeaponKind::Bfg,
    ];

    /// Identifier used in sounds and pickups
    pub fn name(&self) -> &'static str {
        match self {
            WeaponKind::Pistol => "pistol",
            WeaponKind::Shotgun => "shotgun",
            WeaponKind::AssaultRifle => "assault_rifle",
            WeaponKind::SniperRifle => "sniper_rifle",
            WeaponKind::RocketLauncher => "rocket_launcher",
            WeaponKind::PlasmaGun => "plasma_gun",
            WeaponKind::Bfg => "bfg",
        }
    }

    /// Shipped stats
    pub fn spec(&self) -> WeaponSpec {
        let hitscan = |damage, cooldown_ms, range, ammo_type, ammo, max_ammo, spread, recoil| WeaponSpec {
            damage,
            cooldown_ms,
            range,
            pellets: 1,
            ammo_type,
            start_ammo: ammo,
            max_ammo,
            spread,
            recoil,
            projectile: None,
        };

        match self {
            WeaponKind::Pistol => hitscan(15.0, 400, 50.0, "pistol", 50, 100, 0.01, 0.01),
            WeaponKind::Shotgun => WeaponSpec {
                pellets: 8,
                ..hitscan(8.0, 800, 20.0, "shells", 20, 40, 0.05, 0.05)
            },
            WeaponKind::AssaultRifle => hitscan(10.0, 100, 100.0, "rifle", 60, 200, 0.02, 0.02),
            WeaponKind::SniperRifle => hitscan(50.0, 1000, 200.0, "rifle", 20, 40, 0.001, 0.03),
            WeaponKind::RocketLauncher => WeaponSpec {
                projectile: Some(ProjectileProfile {
                    speed: 30.0,
                    radius: 5.0,
                    tier: ProjectileTier::Standard,
                }),
                ..hitscan(100.0, 1500, 150.0, "rockets", 5, 15, 0.01, 0.1)
            },
            WeaponKind::PlasmaGun => WeaponSpec {
                projectile: Some(ProjectileProfile {
                    speed: 50.0,
                    radius: 0.0,
                    tier: ProjectileTier::Plasma,
                }),
                ..hitscan(20.0, 300, 80.0, "cells", 40, 100, 0.02, 0.01)
            },
            WeaponKind::Bfg => WeaponSpec {
                projectile: Some(ProjectileProfile {
                    speed: 20.0,
                    radius: 10.0,
                    tier: ProjectileTier::Bfg,
                }),
                ..hitscan(200.0, 2000, 100.0, "cells", 10, 20, 0.01, 0.2)
            },
        }
    }
}

impl FromStr for WeaponKind {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        WeaponKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| CombatError::UnknownWeapon(s.to_string()))
    }
}

/// Flight parameters of a projectile weapon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileProfile {
    pub speed: f32,
    /// Explosion radius (0 = direct hit only)
    pub radius: f32,
    pub tier: ProjectileTier,
}

/// Static weapon statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    /// Damage per hit (per pellet for shotguns)
    pub damage: f32,
    /// Minimum time between shots
    pub cooldown_ms: u64,
    pub range: f32,
    pub pellets: u32,
    pub ammo_type: &'static str,
    pub start_ammo: u32,
    pub max_ammo: u32,
    pub spread: f32,
    pub recoil: f32,
    /// `Some` for projectile weapons
    pub projectile: Option<ProjectileProfile>,
}

/// One weapon slot
#[derive(Debug, Clone)]
pub struct WeaponSlot {
    pub kind: WeaponKind,
    pub spec: WeaponSpec,
    pub ammo: u32,
    pub acquired: bool,
    last_fired_ms: Option<u64>,
}

impl WeaponSlot {
    fn new(kind: WeaponKind) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            spec,
            ammo: spec.start_ammo,
            acquired: kind == WeaponKind::Pistol,
            last_fired_ms: None,
        }
    }

    /// Whether the shot cooldown has elapsed at `now_ms`
    pub fn is_ready(&self, now_ms: u64) -> bool {
        self.last_fired_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.spec.cooldown_ms)
    }
}

/// A single hitscan trace produced by a trigger pull
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitscanRay {
    pub origin: Vec3,
    pub direction: Vec3,
    pub range: f32,
    pub damage: f32,
}

/// Everything one trigger pull produced
#[derive(Debug, Clone, PartialEq)]
pub struct Volley {
    pub weapon: WeaponKind,
    /// One per pellet for hitscan weapons
    pub rays: Vec<HitscanRay>,
    /// Set for projectile weapons
    pub projectile: Option<ProjectileSpawn>,
    /// View kick for the host camera
    pub recoil: f32,
}

/// The player's weapons, ammo and current selection
#[derive(Debug, Clone)]
pub struct Arsenal {
    slots: Vec<WeaponSlot>,
    current: usize,
    last_switch_ms: Option<u64>,
}

impl Arsenal {
    /// Full shipped arsenal with only the pistol acquired
    pub fn standard() -> Self {
        Self {
            slots: WeaponKind::ALL.into_iter().map(WeaponSlot::new).collect(),
            current: 0,
            last_switch_ms: None,
        }
    }

    /// Currently selected slot
    pub fn current(&self) -> &WeaponSlot {
        &self.slots[self.current]
    }

    /// Index of the selected slot
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// All slots
    pub fn slots(&self) -> &[WeaponSlot] {
        &self.slots
    }

    /// Slot holding `kind`
    pub fn slot(&self, kind: WeaponKind) -> Option<&WeaponSlot> {
        self.slots.iter().find(|s| s.kind == kind)
    }

    /// Select slot `index`. Refused during the switch cooldown and for
    /// unacquired or missing slots.
    pub fn switch_to<H: CombatHost + ?Sized>(&mut self, index: usize, now_ms: u64, host: &mut H) -> bool {
        if let Some(last) = self.last_switch_ms {
            if now_ms.saturating_sub(last) < SWITCH_COOLDOWN_MS {
                return false;
            }
        }
        match self.slots.get(index) {
            Some(slot) if slot.acquired => {}
            _ => return false,
        }

        self.last_switch_ms = Some(now_ms);
        self.current = index;
        host.play_sound(Sound::WeaponSwitch);
        log::debug!("switched to {}", self.slots[index].kind.name());
        true
    }

    /// Pull the trigger on the current weapon
    pub fn fire<R, H>(&mut self, now_ms: u64, origin: Vec3, look: Vec3, rng: &mut R, host: &mut H) -> Option<Volley>
    where
        R: Rng + ?Sized,
        H: CombatHost + ?Sized,
    {
        let slot = &mut self.slots[self.current];
        if !slot.is_ready(now_ms) {
            return None;
        }
        if slot.ammo == 0 {
            host.play_sound(Sound::Empty);
            return None;
        }

        slot.last_fired_ms = Some(now_ms);
        slot.ammo -= 1;
        host.play_sound(Sound::WeaponFire(slot.kind));
        host.trigger_effect(Effect::MuzzleFlash {
            position: origin,
            weapon: slot.kind.name(),
        });

        let spec = slot.spec;
        let mut volley = Volley {
            weapon: slot.kind,
            rays: Vec::new(),
            projectile: None,
            recoil: spec.recoil,
        };

        if let Some(profile) = spec.projectile {
            volley.projectile = Some(ProjectileSpawn {
                origin,
                direction: scatter(look, spec.spread, rng),
                speed: profile.speed,
                damage: spec.damage,
                radius: profile.radius,
                tier: profile.tier,
            });
        } else {
            // Pellets scatter twice as wide as a single round
            let spread = if spec.pellets > 1 { spec.spread * 2.0 } else { spec.spread };
            for _ in 0..spec.pellets.max(1) {
                volley.rays.push(HitscanRay {
                    origin,
                    direction: scatter(look, spread, rng),
                    range: spec.range,
                    damage: spec.damage,
                });
            }
        }

        Some(volley)
    }

    /// Mark a weapon as owned and switch to it. Returns false if it was
    /// already owned.
    pub fn acquire<H: CombatHost + ?Sized>(&mut self, kind: WeaponKind, now_ms: u64, host: &mut H) -> bool {
        let Some(index) = self.slots.iter().position(|s| s.kind == kind) else {
            return false;
        };
        if self.slots[index].acquired {
            return false;
        }

        self.slots[index].acquired = true;
        self.switch_to(index, now_ms, host);
        host.play_sound(Sound::Pickup);
        log::info!("acquired {}", kind.name());
        true
    }

    /// Add ammo of `ammo_type` (or `"all"`) to every matching weapon, clamped
    /// to each weapon's maximum. Plays `pickup` if anything was added.
    pub fn add_ammo<H: CombatHost + ?Sized>(&mut self, ammo_type: &str, amount: u32, host: &mut H) -> bool {
        let mut added = false;
        for slot in &mut self.slots {
            if ammo_type == "all" || slot.spec.ammo_type == ammo_type {
                let before = slot.ammo;
                slot.ammo = slot.ammo.saturating_add(amount).min(slot.spec.max_ammo);
                added |= slot.ammo > before;
            }
        }
        if added {
            host.play_sound(Sound::Pickup);
        }
        added
    }

    /// Apply an ammo or weapon pickup. Health and armor belong to the player
    /// controller and are ignored.
    pub fn apply_pickup<H: CombatHost + ?Sized>(&mut self, pickup: &Pickup, now_ms: u64, host: &mut H) -> bool {
        match pickup {
            Pickup::Ammo { ammo, amount } => self.add_ammo(ammo, *amount, host),
            Pickup::Weapon(name) => match name.parse::<WeaponKind>() {
                Ok(kind) => self.acquire(kind, now_ms, host),
                Err(err) => {
                    log::warn!("ignoring weapon pickup: {err}");
                    false
                }
            },
            Pickup::Health(_) | Pickup::Armor(_) => false,
        }
    }
}

impl Default for Arsenal {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::EventLog;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_standard_arsenal() {
        let arsenal = Arsenal::standard();
        assert_eq!(arsenal.slots().len(), 7);
        assert_eq!(arsenal.current().kind, WeaponKind::Pistol);
        assert!(arsenal.current().acquired);
        assert!(arsenal.slots().iter().skip(1).all(|s| !s.acquired));
        assert_eq!(arsenal.slot(WeaponKind::Shotgun).unwrap().spec.pellets, 8);
    }

    #[test]
    fn test_weapon_names_parse() {
        assert_eq!("bfg".parse::<WeaponKind>().unwrap(), WeaponKind::Bfg);
        assert_eq!("Assault Rifle".parse::<WeaponKind>().unwrap(), WeaponKind::AssaultRifle);
        assert!("railgun".parse::<WeaponKind>().is_err());
    }

    #[test]
    fn test_fire_respects_cooldown_and_consumes_ammo() {
        let mut arsenal = Arsenal::standard();
        let mut host = EventLog::new();
        let mut rng = rng();

        let volley = arsenal.fire(1000, Vec3::ZERO, Vec3::Z, &mut rng, &mut host).unwrap();
        assert_eq!(volley.rays.len(), 1);
        assert_relative_eq!(volley.rays[0].direction.length(), 1.0, epsilon = 1e-5);
        assert!(volley.rays[0].direction.z > 0.99);
        assert_eq!(arsenal.current().ammo, 49);
        assert_eq!(host.count_sound(Sound::WeaponFire(WeaponKind::Pistol)), 1);

        assert!(arsenal.fire(1399, Vec3::ZERO, Vec3::Z, &mut rng, &mut host).is_none());
        assert!(arsenal.fire(1400, Vec3::ZERO, Vec3::Z, &mut rng, &mut host).is_some());
        assert_eq!(arsenal.current().ammo, 48);
    }

    #[test]
    fn test_empty_weapon_clicks() {
        let mut arsenal = Arsenal::standard();
        let mut host = EventLog::new();
        arsenal.slots[0].ammo = 0;

        assert!(arsenal.fire(0, Vec3::ZERO, Vec3::Z, &mut rng(), &mut host).is_none());
        assert_eq!(host.count_sound(Sound::Empty), 1);
    }

    #[test]
    fn test_switch_rules() {
        let mut arsenal = Arsenal::standard();
        let mut host = EventLog::new();

        // Not acquired
        assert!(!arsenal.switch_to(1, 0, &mut host));
        // Out of range
        assert!(!arsenal.switch_to(12, 0, &mut host));

        assert!(arsenal.acquire(WeaponKind::Shotgun, 0, &mut host));
        assert_eq!(arsenal.current().kind, WeaponKind::Shotgun);
        assert!(!arsenal.acquire(WeaponKind::Shotgun, 10, &mut host));

        // Inside the switch cooldown
        assert!(!arsenal.switch_to(0, 499, &mut host));
        assert!(arsenal.switch_to(0, 500, &mut host));
        assert_eq!(arsenal.current().kind, WeaponKind::Pistol);
        assert_eq!(host.count_sound(Sound::WeaponSwitch), 2);
    }

    #[test]
    fn test_shotgun_fires_pellets() {
        let mut arsenal = Arsenal::standard();
        let mut host = EventLog::new();
        arsenal.acquire(WeaponKind::Shotgun, 0, &mut host);

        let volley = arsenal.fire(0, Vec3::ZERO, Vec3::X, &mut rng(), &mut host).unwrap();
        assert_eq!(volley.rays.len(), 8);
        assert!(volley.projectile.is_none());
        assert_relative_eq!(volley.recoil, 0.05);
        assert_eq!(arsenal.current().ammo, 19);
    }

    #[test]
    fn test_rocket_launcher_spawns_projectile() {
        let mut arsenal = Arsenal::standard();
        let mut host = EventLog::new();
        arsenal.acquire(WeaponKind::RocketLauncher, 0, &mut host);

        let volley = arsenal.fire(0, Vec3::Y, Vec3::X, &mut rng(), &mut host).unwrap();
        assert!(volley.rays.is_empty());
        let spawn = volley.projectile.unwrap();
        assert_relative_eq!(spawn.speed, 30.0);
        assert_relative_eq!(spawn.radius, 5.0);
        assert_relative_eq!(spawn.damage, 100.0);
        assert_eq!(spawn.origin, Vec3::Y);
    }

    #[test]
    fn test_add_ammo_clamps_and_reports() {
        let mut arsenal = Arsenal::standard();
        let mut host = EventLog::new();

        assert!(arsenal.add_ammo("rifle", 500, &mut host));
        assert_eq!(arsenal.slot(WeaponKind::AssaultRifle).unwrap().ammo, 200);
        assert_eq!(arsenal.slot(WeaponKind::SniperRifle).unwrap().ammo, 40);

        // Already full
        assert!(!arsenal.add_ammo("rifle", 5, &mut host));
        assert!(arsenal.add_ammo("all", 1, &mut host));
        assert_eq!(arsenal.slot(WeaponKind::Pistol).unwrap().ammo, 51);
        assert_eq!(host.count_sound(Sound::Pickup), 2);
    }

    #[test]
    fn test_apply_pickup() {
        let mut arsenal = Arsenal::standard();
        let mut host = EventLog::new();

        assert!(arsenal.apply_pickup(&Pickup::Weapon("bfg".into()), 0, &mut host));
        assert!(arsenal.slot(WeaponKind::Bfg).unwrap().acquired);
        assert!(arsenal.apply_pickup(
            &Pickup::Ammo { ammo: "shells".into(), amount: 12 },
            0,
            &mut host
        ));
        assert!(!arsenal.apply_pickup(&Pickup::Health(20), 0, &mut host));
        assert!(!arsenal.apply_pickup(&Pickup::Weapon("railgun".into()), 0, &mut host));
    }
}
