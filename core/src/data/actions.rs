//! Baseline action table
//!
//! A compact demonstration kit; real deployments supply per-job tables via
//! [`GameData::with_tables`](super::GameData::with_tables).

use kardia_types::ActionId;

/// Static definition of one castable action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionInfo {
    pub id: u32,
    pub name: &'static str,
    pub icon: &'static str,
    /// Whether the action rolls the global cooldown.
    pub on_gcd: bool,
    /// Recast time in milliseconds (the GCD length for on-GCD actions).
    pub cooldown_ms: i64,
    pub charges: u8,
}

pub const STRIKE: ActionId = ActionId(1);
pub const SAVAGE_BLADE: ActionId = ActionId(2);
pub const RENDING_TALON: ActionId = ActionId(3);
pub const CLEAVING_GALE: ActionId = ActionId(4);
pub const BLOODLETTER: ActionId = ActionId(5);
pub const ONSLAUGHT: ActionId = ActionId(6);
pub const BATTLE_CRY: ActionId = ActionId(7);
pub const VEILED_EDGE: ActionId = ActionId(8);

pub static ACTIONS: phf::Map<u32, ActionInfo> = phf::phf_map! {
    1u32 => ActionInfo {
        id: 1,
        name: "Strike",
        icon: "strike.png",
        on_gcd: true,
        cooldown_ms: 2500,
        charges: 1,
    },
    2u32 => ActionInfo {
        id: 2,
        name: "Savage Blade",
        icon: "savage_blade.png",
        on_gcd: true,
        cooldown_ms: 2500,
        charges: 1,
    },
    3u32 => ActionInfo {
        id: 3,
        name: "Rending Talon",
        icon: "rending_talon.png",
        on_gcd: true,
        cooldown_ms: 2500,
        charges: 1,
    },
    4u32 => ActionInfo {
        id: 4,
        name: "Cleaving Gale",
        icon: "cleaving_gale.png",
        on_gcd: true,
        cooldown_ms: 2500,
        charges: 1,
    },
    5u32 => ActionInfo {
        id: 5,
        name: "Bloodletter",
        icon: "bloodletter.png",
        on_gcd: false,
        cooldown_ms: 15_000,
        charges: 3,
    },
    6u32 => ActionInfo {
        id: 6,
        name: "Onslaught",
        icon: "onslaught.png",
        on_gcd: false,
        cooldown_ms: 120_000,
        charges: 1,
    },
    7u32 => ActionInfo {
        id: 7,
        name: "Battle Cry",
        icon: "battle_cry.png",
        on_gcd: false,
        cooldown_ms: 120_000,
        charges: 1,
    },
    8u32 => ActionInfo {
        id: 8,
        name: "Veiled Edge",
        icon: "veiled_edge.png",
        on_gcd: true,
        cooldown_ms: 2500,
        charges: 1,
    },
};
