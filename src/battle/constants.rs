//! Battle system constants - all tunable values in one place

// Rounds
pub const MAX_ROUNDS: u32 = 10;

// Damage variance, drawn once per attacking unit type per phase
pub const DAMAGE_VARIANCE_MIN: f64 = 0.8;
pub const DAMAGE_VARIANCE_MAX: f64 = 1.2;

// Mitigation: damage * ARMOR_SCALE / (ARMOR_SCALE + armor)
pub const ARMOR_SCALE: f64 = 100.0;

// Battle log
pub const BATTLE_LOG_CAPACITY: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variance_window() {
        assert!(DAMAGE_VARIANCE_MIN < 1.0 && DAMAGE_VARIANCE_MAX > 1.0);
        assert!((DAMAGE_VARIANCE_MIN + DAMAGE_VARIANCE_MAX - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_limits_positive() {
        assert!(MAX_ROUNDS > 0);
        assert!(BATTLE_LOG_CAPACITY > 0);
        assert!(ARMOR_SCALE > 0.0);
    }
}
