use soroban_sdk::{contracttype, Address, String};

// Constants
/// Signing window after proposal creation
pub const PROPOSAL_TTL: u64 = 3 * 24 * 3600; // 3 days
/// Minimum size the signer set may shrink to
pub const MIN_SIGNERS: u32 = 2;
/// Ceiling on the protocol-wide default tax rate
pub const MAX_TAX_RATE_BPS: u32 = 2_000; // 20%

/// Privileged action carried by a proposal. Dispatch is an exhaustive
/// match, so a new variant cannot be added without a handler.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProposalAction {
    PauseProtocol,
    UnpauseProtocol,
    /// New protocol-wide default tax rate, basis points
    SetTaxRate(u32),
    /// New treasury address
    SetTreasury(Address),
    /// (token, amount, recipient) moved out of the vault
    EmergencyWithdraw(Address, i128, Address),
    AddSigner(Address),
    RemoveSigner(Address),
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct Proposal {
    pub id: u64,
    pub action: ProposalAction,
    pub proposer: Address,
    pub description: String,
    pub created_at: u64,
    /// created_at + PROPOSAL_TTL; signing and execution blocked afterwards
    pub expires_at: u64,
    /// One-way; set before dispatch
    pub executed: bool,
    /// Strictly increases by 1 per unique signer
    pub signature_count: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Signers,
    Threshold,
    Treasury,
    DefaultTaxRate,
    Paused,
    Vault,
    Asset,
    ShareToken,
    SwapAdapter,
    ProposalCounter,
    Proposal(u64),
    /// (proposal_id, signer) -> has signed
    Signed(u64, Address),
    Initialized,
}
