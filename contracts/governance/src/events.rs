use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct ProposalCreatedEvent {
    pub proposal_id: u64,
    pub proposer: Address,
    pub expires_at: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ProposalSignedEvent {
    pub proposal_id: u64,
    pub signer: Address,
    pub signature_count: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ProposalExecutedEvent {
    pub proposal_id: u64,
    pub signature_count: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct DepositRoutedEvent {
    pub investor: Address,
    pub amount: i128,
    pub certificate_id: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct SwapDepositEvent {
    pub investor: Address,
    pub token_in: Address,
    pub amount_in: i128,
    pub amount_out: i128,
    pub certificate_id: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct WithdrawRoutedEvent {
    pub investor: Address,
    pub certificate_id: u64,
    pub amount_paid: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TaxRateChangedEvent {
    pub tax_rate_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TreasuryChangedEvent {
    pub treasury: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ProtocolPausedEvent {
    pub paused: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct SignerAddedEvent {
    pub signer: Address,
    pub signer_count: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct SignerRemovedEvent {
    pub signer: Address,
    pub signer_count: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct EmergencyWithdrawEvent {
    pub token: Address,
    pub amount: i128,
    pub recipient: Address,
}
