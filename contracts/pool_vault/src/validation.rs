use crate::error::Error;
use crate::storage::{
    PoolConfig, MAX_LOCK_DURATION, MAX_RATE_BPS, MAX_TAX_RATE_BPS, MIN_LOCK_DURATION,
};

/// Validate every field of a pool configuration. Re-run in full on every
/// config update, not only on the fields that changed.
pub fn validate_config(config: &PoolConfig) -> Result<(), Error> {
    if config.lock_duration < MIN_LOCK_DURATION || config.lock_duration > MAX_LOCK_DURATION {
        return Err(Error::InvalidLockDuration);
    }

    if config.min_investment <= 0 || config.min_investment > config.max_investment {
        return Err(Error::InvalidInvestmentRange);
    }

    if config.expected_rate_bps > MAX_RATE_BPS {
        return Err(Error::InvalidRate);
    }

    if config.tax_rate_bps > MAX_TAX_RATE_BPS {
        return Err(Error::InvalidTaxRate);
    }

    // A nonzero cap below max_investment would make the configured maximum
    // unreachable.
    if config.utilization_cap != 0 && config.utilization_cap < config.max_investment {
        return Err(Error::InvalidCap);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{Env, String};

    const SCALE: i128 = 10_000_000;

    fn base_config(env: &Env) -> PoolConfig {
        PoolConfig {
            name: String::from_str(env, "Core Pool"),
            lock_duration: 30 * 24 * 3600,
            min_investment: 100 * SCALE,
            max_investment: 100_000 * SCALE,
            utilization_cap: 0,
            expected_rate_bps: 2000,
            tax_rate_bps: 250,
            accepting_deposits: true,
        }
    }

    #[test]
    fn test_valid_config() {
        let env = Env::default();
        assert_eq!(validate_config(&base_config(&env)), Ok(()));
    }

    #[test]
    fn test_lock_duration_bounds() {
        let env = Env::default();

        let mut config = base_config(&env);
        config.lock_duration = 3600; // below 1 day
        assert_eq!(validate_config(&config), Err(Error::InvalidLockDuration));

        config.lock_duration = MAX_LOCK_DURATION + 1;
        assert_eq!(validate_config(&config), Err(Error::InvalidLockDuration));

        config.lock_duration = MIN_LOCK_DURATION;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_investment_range() {
        let env = Env::default();

        let mut config = base_config(&env);
        config.min_investment = 0;
        assert_eq!(validate_config(&config), Err(Error::InvalidInvestmentRange));

        config.min_investment = 200_000 * SCALE; // above max
        assert_eq!(validate_config(&config), Err(Error::InvalidInvestmentRange));
    }

    #[test]
    fn test_rate_ceilings() {
        let env = Env::default();

        let mut config = base_config(&env);
        config.expected_rate_bps = MAX_RATE_BPS + 1;
        assert_eq!(validate_config(&config), Err(Error::InvalidRate));

        let mut config = base_config(&env);
        config.tax_rate_bps = MAX_TAX_RATE_BPS + 1;
        assert_eq!(validate_config(&config), Err(Error::InvalidTaxRate));
    }

    #[test]
    fn test_cap_zero_means_uncapped() {
        let env = Env::default();

        let mut config = base_config(&env);
        config.utilization_cap = 0;
        assert_eq!(validate_config(&config), Ok(()));

        config.utilization_cap = config.max_investment - 1;
        assert_eq!(validate_config(&config), Err(Error::InvalidCap));

        config.utilization_cap = config.max_investment;
        assert_eq!(validate_config(&config), Ok(()));
    }
}
