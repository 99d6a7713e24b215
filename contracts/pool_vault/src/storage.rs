use soroban_sdk::{contracttype, Address, String};

// Constants
pub const BASIS_POINTS: i128 = 10_000;
pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 3600;
pub const MIN_LOCK_DURATION: u64 = 24 * 3600; // 1 day
pub const MAX_LOCK_DURATION: u64 = 5 * 365 * 24 * 3600; // 5 years
pub const MAX_RATE_BPS: u32 = 10_000; // 100% annualized
pub const MAX_TAX_RATE_BPS: u32 = 2_000; // 20%
/// Sentinel for available capacity of an uncapped pool
pub const UNCAPPED_AVAILABLE: i128 = i128::MAX;

#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Human-readable pool name
    pub name: String,
    /// Lock period in seconds applied to every deposit
    pub lock_duration: u64,
    /// Minimum deposit (asset units)
    pub min_investment: i128,
    /// Maximum deposit (asset units)
    pub max_investment: i128,
    /// Total deposit ceiling; 0 = uncapped
    pub utilization_cap: i128,
    /// Annualized expected return, basis points
    pub expected_rate_bps: u32,
    /// Pool-level tax rate, basis points; 0 = use protocol default
    pub tax_rate_bps: u32,
    /// Whether new deposits are accepted
    pub accepting_deposits: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct Position {
    /// Recorded investor; must hold the certificate at redemption
    pub investor: Address,
    /// Principal in asset units, immutable after deposit
    pub principal: i128,
    /// Human label supplied at deposit time
    pub label: String,
    /// Unix timestamp of the deposit
    pub deposit_time: u64,
    /// deposit_time + lock_duration
    pub maturity_time: u64,
    /// Principal plus projected interest at deposit time
    pub estimated_gross_return: i128,
    /// Ledger-scale shares minted to the investor
    pub user_shares: i128,
    /// Ledger-scale shares minted to the tax sink
    pub tax_shares: i128,
    /// user_shares + tax_shares, denominator for interest splitting
    pub total_shares: i128,
    /// User leg closed (one-way)
    pub is_withdrawn: bool,
    /// Tax leg closed (one-way)
    pub tax_withdrawn: bool,
    /// 0 until reported; authoritative interest override once set
    pub actual_interest: i128,
    /// Ownership certificate bound to this position
    pub certificate_id: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolStats {
    pub total_deposited: i128,
    pub total_withdrawn: i128,
    /// Remaining capacity; UNCAPPED_AVAILABLE when no cap is configured
    pub available_capacity: i128,
    /// deposited * 10_000 / cap; 0 when no cap is configured
    pub utilization_bps: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Governance,
    Asset,
    ShareToken,
    Registry,
    TaxSink,
    Custody,
    PoolId,
    ShareScale,
    Config,
    TotalDeposited,
    TotalWithdrawn,
    PositionCounter,
    Position(u64),
    /// certificate_id -> position_id
    CertPosition(u64),
    /// investor -> position id list
    InvestorPositions(Address),
    Paused,
    Initialized,
}
