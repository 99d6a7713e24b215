use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct InvestedEvent {
    pub position_id: u64,
    pub certificate_id: u64,
    pub investor: Address,
    pub amount: i128,
    pub user_shares: i128,
    pub tax_shares: i128,
    pub maturity_time: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct WithdrawnEvent {
    pub position_id: u64,
    pub investor: Address,
    pub amount_paid: i128,
    pub shares_burned: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct EmergencyExitEvent {
    pub position_id: u64,
    pub investor: Address,
    pub principal_paid: i128,
    pub user_shares_burned: i128,
    pub tax_shares_burned: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TaxCollectedEvent {
    pub position_id: u64,
    pub recipient: Address,
    pub amount_paid: i128,
    pub shares_burned: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ActualInterestEvent {
    pub position_id: u64,
    pub actual_interest: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ConfigUpdatedEvent {
    pub lock_duration: u64,
    pub min_investment: i128,
    pub max_investment: i128,
    pub utilization_cap: i128,
    pub expected_rate_bps: u32,
    pub tax_rate_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct CustodyUpdatedEvent {
    pub old_custody: Address,
    pub new_custody: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct AcceptingDepositsEvent {
    pub accepting: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct SweepEvent {
    pub token: Address,
    pub amount: i128,
    pub to: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct GovernanceTransferEvent {
    pub token: Address,
    pub amount: i128,
    pub to: Address,
}
