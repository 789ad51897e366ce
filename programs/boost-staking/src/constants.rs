// ══════════════════════════════════════════════════════════════════════════════
// PDA SEEDS
// ══════════════════════════════════════════════════════════════════════════════

/// Registry PDA: ["registry"]
pub const REGISTRY_SEED: &[u8] = b"registry";

/// Session PDA: ["session", session_id.to_le_bytes()]
pub const SESSION_SEED: &[u8] = b"session";

/// Participant PDA: ["participant", session, user]
pub const PARTICIPANT_SEED: &[u8] = b"participant";

/// Vault PDA: ["vault", session, tag]
pub const VAULT_SEED: &[u8] = b"vault";

pub const STAKE_VAULT_TAG: &[u8] = b"stake";
pub const REWARD_VAULT_TAG: &[u8] = b"reward";
pub const BOOST_VAULT_TAG: &[u8] = b"boost";

// ══════════════════════════════════════════════════════════════════════════════
// FIXED POINT
// ══════════════════════════════════════════════════════════════════════════════

/// Scale factor of every fixed-point value (1.0 == 1e18)
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Default share of the boost pool split by stake alone (0.6)
pub const DEFAULT_GAMMA: u128 = 600_000_000_000_000_000;

// ══════════════════════════════════════════════════════════════════════════════
// CHECK-IN CONFIGURATION
// ══════════════════════════════════════════════════════════════════════════════

/// Minimum seconds between two check-ins of the same participant
pub const DEFAULT_CHECK_IN_COOLDOWN: i64 = 300;

/// (minimum stake in whole tokens, points per check-in), highest tier first
pub const DEFAULT_TIER_TABLE: [(u64, u64); 5] = [
    (50, 5),
    (30, 4),
    (20, 3),
    (10, 2),
    (5, 1),
];

/// Upper bound on configured tiers (keeps the registry account small)
pub const MAX_TIERS: usize = 8;

/// One whole token of a 9-decimal mint
pub const DEFAULT_STAKE_UNIT: u64 = 1_000_000_000;

// ══════════════════════════════════════════════════════════════════════════════
// REENTRANCY GUARD STATES
// ══════════════════════════════════════════════════════════════════════════════

pub const NOT_ENTERED: u8 = 1;
pub const ENTERED: u8 = 2;
