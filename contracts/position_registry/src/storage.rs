use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct Certificate {
    /// Certificate identifier (token id)
    pub certificate_id: u64,
    /// Pool this certificate belongs to
    pub pool_id: u32,
    /// Vault position the certificate authorizes
    pub position_id: u64,
    /// Principal at deposit time (asset units)
    pub amount: i128,
    /// Unix timestamp after which the position is redeemable
    pub maturity_time: u64,
    /// Principal plus projected interest at deposit time
    pub gross_return: i128,
    /// Annualized expected rate in basis points
    pub rate_bps: u32,
    /// Unix timestamp of the deposit
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Operators(Address),
    /// certificate_id -> owner
    Owner(u64),
    /// certificate_id -> certificate record
    Certificate(u64),
    CertificateCounter,
    TotalMinted,
    Initialized,
}
