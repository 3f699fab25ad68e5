//! Baseline status table

use kardia_types::StatusId;

/// Static definition of one status effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusInfo {
    pub id: u32,
    pub name: &'static str,
    pub icon: &'static str,
    /// Nominal duration in milliseconds.
    pub duration_ms: i64,
}

/// Party-wide damage buff applied by Battle Cry.
pub const BATTLE_FERVOR: StatusId = StatusId(101);
/// Personal damage buff.
pub const KEEN_EDGE: StatusId = StatusId(102);
/// Damage-over-time debuff.
pub const EXPOSED: StatusId = StatusId(103);
/// Enemy invulnerability marker (downtime detection).
pub const VOIDWALL: StatusId = StatusId(104);

pub static STATUSES: phf::Map<u32, StatusInfo> = phf::phf_map! {
    101u32 => StatusInfo {
        id: 101,
        name: "Battle Fervor",
        icon: "battle_fervor.png",
        duration_ms: 20_000,
    },
    102u32 => StatusInfo {
        id: 102,
        name: "Keen Edge",
        icon: "keen_edge.png",
        duration_ms: 30_000,
    },
    103u32 => StatusInfo {
        id: 103,
        name: "Exposed",
        icon: "exposed.png",
        duration_ms: 24_000,
    },
    104u32 => StatusInfo {
        id: 104,
        name: "Voidwall",
        icon: "voidwall.png",
        duration_ms: 10_000,
    },
};
