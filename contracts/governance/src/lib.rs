#![no_std]

mod error;
mod events;
mod storage;

use soroban_sdk::{
    contract, contractimpl, token, vec, Address, Env, IntoVal, String, Symbol, Vec,
};

pub use error::Error;
pub use storage::{Proposal, ProposalAction};

use events::{
    DepositRoutedEvent, EmergencyWithdrawEvent, ProposalCreatedEvent, ProposalExecutedEvent,
    ProposalSignedEvent, ProtocolPausedEvent, SignerAddedEvent, SignerRemovedEvent,
    SwapDepositEvent, TaxRateChangedEvent, TreasuryChangedEvent, WithdrawRoutedEvent,
};
use storage::{DataKey, MAX_TAX_RATE_BPS, MIN_SIGNERS, PROPOSAL_TTL};

#[contract]
pub struct Governance;

#[contractimpl]
impl Governance {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// One-shot setup of the signer set, protocol parameters and the
    /// contract addresses this router talks to.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        admin: Address,
        signers: Vec<Address>,
        threshold: u32,
        treasury: Address,
        default_tax_rate_bps: u32,
        vault: Address,
        asset: Address,
        share_token: Address,
        swap_adapter: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();

        if signers.len() < MIN_SIGNERS {
            return Err(Error::TooFewSigners);
        }
        if threshold < MIN_SIGNERS || threshold > signers.len() {
            return Err(Error::InvalidThreshold);
        }
        for i in 0..signers.len() {
            for j in (i + 1)..signers.len() {
                if signers.get_unchecked(i) == signers.get_unchecked(j) {
                    return Err(Error::DuplicateSigner);
                }
            }
        }
        if default_tax_rate_bps > MAX_TAX_RATE_BPS {
            return Err(Error::InvalidTaxRate);
        }

        let storage = env.storage().instance();
        storage.set(&DataKey::Admin, &admin);
        storage.set(&DataKey::Signers, &signers);
        storage.set(&DataKey::Threshold, &threshold);
        storage.set(&DataKey::Treasury, &treasury);
        storage.set(&DataKey::DefaultTaxRate, &default_tax_rate_bps);
        storage.set(&DataKey::Paused, &false);
        storage.set(&DataKey::Vault, &vault);
        storage.set(&DataKey::Asset, &asset);
        storage.set(&DataKey::ShareToken, &share_token);
        storage.set(&DataKey::SwapAdapter, &swap_adapter);
        storage.set(&DataKey::ProposalCounter, &0u64);
        storage.set(&DataKey::Initialized, &true);

        Ok(())
    }

    // ============================================
    // PROPOSAL LIFECYCLE
    // ============================================

    /// Open a proposal. The proposer's signature is counted immediately,
    /// so a threshold-of-one set would execute here; the threshold floor
    /// keeps that from being reachable.
    pub fn propose(
        env: Env,
        proposer: Address,
        action: ProposalAction,
        description: String,
    ) -> Result<u64, Error> {
        Self::require_init(&env)?;
        proposer.require_auth();
        Self::require_signer(&env, &proposer)?;
        Self::validate_action(&env, &action)?;

        let id: u64 = env
            .storage()
            .instance()
            .get::<DataKey, u64>(&DataKey::ProposalCounter)
            .unwrap_or(0)
            + 1;
        let now = env.ledger().timestamp();
        let expires_at = now + PROPOSAL_TTL;

        let proposal = Proposal {
            id,
            action,
            proposer: proposer.clone(),
            description,
            created_at: now,
            expires_at,
            executed: false,
            signature_count: 1,
        };

        env.storage()
            .persistent()
            .set(&DataKey::Proposal(id), &proposal);
        env.storage()
            .persistent()
            .set(&DataKey::Signed(id, proposer.clone()), &true);
        env.storage().instance().set(&DataKey::ProposalCounter, &id);

        env.events().publish(
            (Symbol::new(&env, "proposal_created"), id),
            ProposalCreatedEvent {
                proposal_id: id,
                proposer,
                expires_at,
            },
        );

        Ok(id)
    }

    /// Add a signature. Crossing the threshold executes the proposal in
    /// the same call.
    pub fn sign(env: Env, signer: Address, proposal_id: u64) -> Result<(), Error> {
        Self::require_init(&env)?;
        signer.require_auth();
        Self::require_signer(&env, &signer)?;

        let mut proposal = Self::load_proposal(&env, proposal_id)?;
        if proposal.executed {
            return Err(Error::ProposalAlreadyExecuted);
        }
        if env.ledger().timestamp() > proposal.expires_at {
            return Err(Error::ProposalExpired);
        }
        if env
            .storage()
            .persistent()
            .has(&DataKey::Signed(proposal_id, signer.clone()))
        {
            return Err(Error::AlreadySigned);
        }

        proposal.signature_count += 1;
        env.storage()
            .persistent()
            .set(&DataKey::Signed(proposal_id, signer.clone()), &true);
        env.storage()
            .persistent()
            .set(&DataKey::Proposal(proposal_id), &proposal);

        env.events().publish(
            (Symbol::new(&env, "proposal_signed"), proposal_id),
            ProposalSignedEvent {
                proposal_id,
                signer,
                signature_count: proposal.signature_count,
            },
        );

        let threshold: u32 = env
            .storage()
            .instance()
            .get(&DataKey::Threshold)
            .ok_or(Error::NotInitialized)?;
        if proposal.signature_count >= threshold {
            Self::execute_internal(&env, proposal_id)?;
        }

        Ok(())
    }

    /// Execute a proposal that already has enough signatures. Normally
    /// unnecessary since the threshold-crossing `sign` executes, but kept
    /// for proposals whose dispatch failed transiently.
    pub fn execute(env: Env, proposal_id: u64) -> Result<(), Error> {
        Self::require_init(&env)?;

        let proposal = Self::load_proposal(&env, proposal_id)?;
        if proposal.executed {
            return Err(Error::ProposalAlreadyExecuted);
        }
        if env.ledger().timestamp() > proposal.expires_at {
            return Err(Error::ProposalExpired);
        }
        let threshold: u32 = env
            .storage()
            .instance()
            .get(&DataKey::Threshold)
            .ok_or(Error::NotInitialized)?;
        if proposal.signature_count < threshold {
            return Err(Error::InsufficientSignatures);
        }

        Self::execute_internal(&env, proposal_id)
    }

    // ============================================
    // DEPOSIT / WITHDRAW ROUTING
    // ============================================

    /// Route a deposit into the vault. Pulls the principal from the
    /// investor, parks it at the vault and opens the position.
    pub fn deposit(
        env: Env,
        investor: Address,
        amount: i128,
        label: String,
    ) -> Result<(u64, i128, i128), Error> {
        Self::require_init(&env)?;
        Self::check_not_paused(&env)?;
        investor.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let asset: Address = env
            .storage()
            .instance()
            .get(&DataKey::Asset)
            .ok_or(Error::NotInitialized)?;
        let vault: Address = env
            .storage()
            .instance()
            .get(&DataKey::Vault)
            .ok_or(Error::NotInitialized)?;

        token::Client::new(&env, &asset).transfer(&investor, &vault, &amount);

        let (certificate_id, user_shares, tax_shares) = Self::vault_invest(
            &env,
            &vault,
            &investor,
            amount,
            &label,
        );

        env.events().publish(
            (Symbol::new(&env, "deposit_routed"), investor.clone()),
            DepositRoutedEvent {
                investor,
                amount,
                certificate_id,
            },
        );

        Ok((certificate_id, user_shares, tax_shares))
    }

    /// Route a deposit funded in a foreign token. The token is swapped to
    /// the pool asset through the configured adapter and the proceeds are
    /// deposited as usual. The deadline is checked here so an expired
    /// order never reaches the adapter.
    pub fn deposit_with_swap(
        env: Env,
        investor: Address,
        token_in: Address,
        amount_in: i128,
        min_out: i128,
        deadline: u64,
        label: String,
    ) -> Result<(u64, i128, i128), Error> {
        Self::require_init(&env)?;
        Self::check_not_paused(&env)?;
        investor.require_auth();

        if amount_in <= 0 || min_out <= 0 {
            return Err(Error::InvalidAmount);
        }
        if env.ledger().timestamp() > deadline {
            return Err(Error::DeadlineExpired);
        }

        let asset: Address = env
            .storage()
            .instance()
            .get(&DataKey::Asset)
            .ok_or(Error::NotInitialized)?;
        let vault: Address = env
            .storage()
            .instance()
            .get(&DataKey::Vault)
            .ok_or(Error::NotInitialized)?;
        let adapter: Address = env
            .storage()
            .instance()
            .get(&DataKey::SwapAdapter)
            .ok_or(Error::NotInitialized)?;

        // Stage the input here, swap, then forward the proceeds. The
        // adapter pulls from and pays to this contract.
        let this = env.current_contract_address();
        token::Client::new(&env, &token_in).transfer(&investor, &this, &amount_in);

        let amount_out: i128 = env
            .try_invoke_contract::<i128, soroban_sdk::Error>(
                &adapter,
                &Symbol::new(&env, "swap"),
                vec![
                    &env,
                    this.into_val(&env),
                    token_in.into_val(&env),
                    asset.into_val(&env),
                    amount_in.into_val(&env),
                    min_out.into_val(&env),
                    deadline.into_val(&env),
                ],
            )
            .map_err(|_| Error::SwapFailed)?
            .map_err(|_| Error::SwapFailed)?;

        token::Client::new(&env, &asset).transfer(&this, &vault, &amount_out);

        let (certificate_id, user_shares, tax_shares) = Self::vault_invest(
            &env,
            &vault,
            &investor,
            amount_out,
            &label,
        );

        env.events().publish(
            (Symbol::new(&env, "swap_deposit"), investor.clone()),
            SwapDepositEvent {
                investor,
                token_in,
                amount_in,
                amount_out,
                certificate_id,
            },
        );

        Ok((certificate_id, user_shares, tax_shares))
    }

    /// Close a matured position. Moves the investor's shares into vault
    /// custody and invokes the vault, which burns them and pays out
    /// principal plus the user interest leg.
    pub fn withdraw(env: Env, investor: Address, certificate_id: u64) -> Result<i128, Error> {
        Self::require_init(&env)?;
        Self::check_not_paused(&env)?;
        investor.require_auth();

        let vault: Address = env
            .storage()
            .instance()
            .get(&DataKey::Vault)
            .ok_or(Error::NotInitialized)?;

        let shares = Self::stage_position_shares(&env, &vault, &investor, certificate_id)?;
        let paid: i128 = env.invoke_contract(
            &vault,
            &Symbol::new(&env, "withdraw"),
            vec![
                &env,
                investor.into_val(&env),
                certificate_id.into_val(&env),
                shares.into_val(&env),
            ],
        );

        env.events().publish(
            (Symbol::new(&env, "withdraw_routed"), investor.clone()),
            WithdrawRoutedEvent {
                investor,
                certificate_id,
                amount_paid: paid,
            },
        );

        Ok(paid)
    }

    /// Close a position before maturity. Principal only; all interest is
    /// forfeited. Available even while the protocol is paused.
    pub fn emergency_exit(
        env: Env,
        investor: Address,
        certificate_id: u64,
    ) -> Result<i128, Error> {
        Self::require_init(&env)?;
        investor.require_auth();

        let vault: Address = env
            .storage()
            .instance()
            .get(&DataKey::Vault)
            .ok_or(Error::NotInitialized)?;

        let shares = Self::stage_position_shares(&env, &vault, &investor, certificate_id)?;
        let paid: i128 = env.invoke_contract(
            &vault,
            &Symbol::new(&env, "emergency_withdraw"),
            vec![
                &env,
                investor.into_val(&env),
                certificate_id.into_val(&env),
                shares.into_val(&env),
            ],
        );

        env.events().publish(
            (Symbol::new(&env, "withdraw_routed"), investor.clone()),
            WithdrawRoutedEvent {
                investor,
                certificate_id,
                amount_paid: paid,
            },
        );

        Ok(paid)
    }

    // ============================================
    // VIEWS
    // ============================================

    pub fn get_proposal(env: Env, proposal_id: u64) -> Result<Proposal, Error> {
        Self::load_proposal(&env, proposal_id)
    }

    pub fn has_signed(env: Env, proposal_id: u64, signer: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Signed(proposal_id, signer))
    }

    pub fn signers(env: Env) -> Vec<Address> {
        env.storage()
            .instance()
            .get(&DataKey::Signers)
            .unwrap_or(Vec::new(&env))
    }

    pub fn threshold(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::Threshold)
            .unwrap_or(0)
    }

    pub fn treasury(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Treasury)
            .ok_or(Error::NotInitialized)
    }

    pub fn default_tax_rate_bps(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::DefaultTaxRate)
            .unwrap_or(0)
    }

    pub fn is_paused(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Paused)
            .unwrap_or(false)
    }

    pub fn swap_adapter(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::SwapAdapter)
            .ok_or(Error::NotInitialized)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_init(env: &Env) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }
        Ok(())
    }

    fn check_not_paused(env: &Env) -> Result<(), Error> {
        let paused: bool = env
            .storage()
            .instance()
            .get(&DataKey::Paused)
            .unwrap_or(false);
        if paused {
            return Err(Error::ProtocolPaused);
        }
        Ok(())
    }

    fn require_signer(env: &Env, who: &Address) -> Result<(), Error> {
        let signers: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::Signers)
            .ok_or(Error::NotInitialized)?;
        if !signers.contains(who) {
            return Err(Error::NotSigner);
        }
        Ok(())
    }

    fn load_proposal(env: &Env, proposal_id: u64) -> Result<Proposal, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Proposal(proposal_id))
            .ok_or(Error::ProposalNotFound)
    }

    /// Reject actions that could never execute. Signer-set changes are
    /// re-checked at dispatch since the set may move between proposal and
    /// execution.
    fn validate_action(env: &Env, action: &ProposalAction) -> Result<(), Error> {
        match action {
            ProposalAction::SetTaxRate(bps) => {
                if *bps > MAX_TAX_RATE_BPS {
                    return Err(Error::InvalidTaxRate);
                }
            }
            ProposalAction::EmergencyWithdraw(_, amount, _) => {
                if *amount <= 0 {
                    return Err(Error::InvalidAmount);
                }
            }
            ProposalAction::AddSigner(signer) => {
                Self::check_addable(env, signer)?;
            }
            ProposalAction::RemoveSigner(signer) => {
                Self::check_removable(env, signer)?;
            }
            ProposalAction::PauseProtocol
            | ProposalAction::UnpauseProtocol
            | ProposalAction::SetTreasury(_) => {}
        }
        Ok(())
    }

    fn check_addable(env: &Env, signer: &Address) -> Result<(), Error> {
        let signers: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::Signers)
            .ok_or(Error::NotInitialized)?;
        if signers.contains(signer) {
            return Err(Error::DuplicateSigner);
        }
        Ok(())
    }

    fn check_removable(env: &Env, signer: &Address) -> Result<(), Error> {
        let signers: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::Signers)
            .ok_or(Error::NotInitialized)?;
        if !signers.contains(signer) {
            return Err(Error::SignerNotFound);
        }
        let threshold: u32 = env
            .storage()
            .instance()
            .get(&DataKey::Threshold)
            .ok_or(Error::NotInitialized)?;
        let remaining = signers.len() - 1;
        if remaining < MIN_SIGNERS || remaining < threshold {
            return Err(Error::TooFewSigners);
        }
        Ok(())
    }

    /// Mark executed, then dispatch. A failing dispatch reverts the whole
    /// invocation including the flag, so a transient failure leaves the
    /// proposal executable.
    fn execute_internal(env: &Env, proposal_id: u64) -> Result<(), Error> {
        let mut proposal = Self::load_proposal(env, proposal_id)?;
        proposal.executed = true;
        env.storage()
            .persistent()
            .set(&DataKey::Proposal(proposal_id), &proposal);

        Self::dispatch(env, &proposal.action)?;

        env.events().publish(
            (Symbol::new(env, "proposal_executed"), proposal_id),
            ProposalExecutedEvent {
                proposal_id,
                signature_count: proposal.signature_count,
            },
        );

        Ok(())
    }

    fn dispatch(env: &Env, action: &ProposalAction) -> Result<(), Error> {
        match action {
            ProposalAction::PauseProtocol => {
                env.storage().instance().set(&DataKey::Paused, &true);
                env.events().publish(
                    (Symbol::new(env, "protocol_paused"),),
                    ProtocolPausedEvent { paused: true },
                );
            }
            ProposalAction::UnpauseProtocol => {
                env.storage().instance().set(&DataKey::Paused, &false);
                env.events().publish(
                    (Symbol::new(env, "protocol_paused"),),
                    ProtocolPausedEvent { paused: false },
                );
            }
            ProposalAction::SetTaxRate(bps) => {
                if *bps > MAX_TAX_RATE_BPS {
                    return Err(Error::InvalidTaxRate);
                }
                env.storage().instance().set(&DataKey::DefaultTaxRate, bps);
                env.events().publish(
                    (Symbol::new(env, "tax_rate_changed"),),
                    TaxRateChangedEvent { tax_rate_bps: *bps },
                );
            }
            ProposalAction::SetTreasury(treasury) => {
                env.storage().instance().set(&DataKey::Treasury, treasury);
                env.events().publish(
                    (Symbol::new(env, "treasury_changed"),),
                    TreasuryChangedEvent {
                        treasury: treasury.clone(),
                    },
                );
            }
            ProposalAction::EmergencyWithdraw(tkn, amount, recipient) => {
                let vault: Address = env
                    .storage()
                    .instance()
                    .get(&DataKey::Vault)
                    .ok_or(Error::NotInitialized)?;
                env.invoke_contract::<()>(
                    &vault,
                    &Symbol::new(env, "governance_transfer"),
                    vec![
                        env,
                        tkn.into_val(env),
                        amount.into_val(env),
                        recipient.into_val(env),
                    ],
                );
                env.events().publish(
                    (Symbol::new(env, "emergency_withdraw"),),
                    EmergencyWithdrawEvent {
                        token: tkn.clone(),
                        amount: *amount,
                        recipient: recipient.clone(),
                    },
                );
            }
            ProposalAction::AddSigner(signer) => {
                Self::check_addable(env, signer)?;
                let mut signers: Vec<Address> = env
                    .storage()
                    .instance()
                    .get(&DataKey::Signers)
                    .ok_or(Error::NotInitialized)?;
                signers.push_back(signer.clone());
                env.storage().instance().set(&DataKey::Signers, &signers);
                env.events().publish(
                    (Symbol::new(env, "signer_added"),),
                    SignerAddedEvent {
                        signer: signer.clone(),
                        signer_count: signers.len(),
                    },
                );
            }
            ProposalAction::RemoveSigner(signer) => {
                Self::check_removable(env, signer)?;
                let signers: Vec<Address> = env
                    .storage()
                    .instance()
                    .get(&DataKey::Signers)
                    .ok_or(Error::NotInitialized)?;
                let mut remaining = Vec::new(env);
                for s in signers.iter() {
                    if s != *signer {
                        remaining.push_back(s);
                    }
                }
                env.storage().instance().set(&DataKey::Signers, &remaining);
                env.events().publish(
                    (Symbol::new(env, "signer_removed"),),
                    SignerRemovedEvent {
                        signer: signer.clone(),
                        signer_count: remaining.len(),
                    },
                );
            }
        }
        Ok(())
    }

    /// Look up the position behind a certificate and move its recorded
    /// user shares from the investor into vault custody. The vault burns
    /// from its own balance, so a stale or forged share amount can never
    /// touch more than the recorded leg.
    fn stage_position_shares(
        env: &Env,
        vault: &Address,
        investor: &Address,
        certificate_id: u64,
    ) -> Result<i128, Error> {
        let position_id: u64 = env.invoke_contract(
            vault,
            &Symbol::new(env, "position_of_certificate"),
            vec![env, certificate_id.into_val(env)],
        );
        let shares: i128 = env.invoke_contract(
            vault,
            &Symbol::new(env, "position_user_shares"),
            vec![env, position_id.into_val(env)],
        );

        let share_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::ShareToken)
            .ok_or(Error::NotInitialized)?;
        env.invoke_contract::<()>(
            &share_token,
            &Symbol::new(env, "transfer"),
            vec![
                env,
                investor.into_val(env),
                vault.into_val(env),
                shares.into_val(env),
            ],
        );

        Ok(shares)
    }

    fn vault_invest(
        env: &Env,
        vault: &Address,
        investor: &Address,
        amount: i128,
        label: &String,
    ) -> (u64, i128, i128) {
        env.invoke_contract(
            vault,
            &Symbol::new(env, "invest"),
            vec![
                env,
                investor.into_val(env),
                amount.into_val(env),
                label.into_val(env),
            ],
        )
    }
}
