#![no_std]

mod error;
mod events;
mod interest;
mod storage;
mod validation;

pub use error::Error;
pub use storage::{PoolConfig, PoolStats, Position};

use events::*;
use interest::{leg_amount, projected_interest, shares_for_deposit, split_tax};
use storage::{DataKey, BASIS_POINTS, UNCAPPED_AVAILABLE};
use validation::validate_config;

use soroban_sdk::{
    contract, contractimpl, token, vec, Address, Env, IntoVal, String, Symbol, Vec,
};

#[contract]
pub struct PoolVault;

#[contractimpl]
impl PoolVault {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the pool
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidShareScale`: Scale factor must be positive
    /// - Config validation errors
    pub fn initialize(
        env: Env,
        admin: Address,
        governance: Address,
        asset: Address,
        share_token: Address,
        registry: Address,
        tax_sink: Address,
        custody: Address,
        pool_id: u32,
        share_scale: i128,
        config: PoolConfig,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        if share_scale <= 0 {
            return Err(Error::InvalidShareScale);
        }
        validate_config(&config)?;

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Governance, &governance);
        env.storage().instance().set(&DataKey::Asset, &asset);
        env.storage().instance().set(&DataKey::ShareToken, &share_token);
        env.storage().instance().set(&DataKey::Registry, &registry);
        env.storage().instance().set(&DataKey::TaxSink, &tax_sink);
        env.storage().instance().set(&DataKey::Custody, &custody);
        env.storage().instance().set(&DataKey::PoolId, &pool_id);
        env.storage().instance().set(&DataKey::ShareScale, &share_scale);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::TotalDeposited, &0i128);
        env.storage().instance().set(&DataKey::TotalWithdrawn, &0i128);
        env.storage().instance().set(&DataKey::PositionCounter, &0u64);
        env.storage().instance().set(&DataKey::Paused, &false);

        Ok(())
    }

    /// Replace the pool configuration (pool admin only). Every field is
    /// re-validated, not only the changed ones.
    pub fn update_pool_config(env: Env, config: PoolConfig) -> Result<(), Error> {
        let admin = Self::require_admin(&env)?;
        admin.require_auth();

        validate_config(&config)?;
        env.storage().instance().set(&DataKey::Config, &config);

        env.events().publish(
            (Symbol::new(&env, "config_updated"),),
            ConfigUpdatedEvent {
                lock_duration: config.lock_duration,
                min_investment: config.min_investment,
                max_investment: config.max_investment,
                utilization_cap: config.utilization_cap,
                expected_rate_bps: config.expected_rate_bps,
                tax_rate_bps: config.tax_rate_bps,
            },
        );

        Ok(())
    }

    /// Rotate the pool's external custody address (pool admin only)
    pub fn update_custody(env: Env, new_custody: Address) -> Result<(), Error> {
        let admin = Self::require_admin(&env)?;
        admin.require_auth();

        let old_custody: Address = env
            .storage()
            .instance()
            .get(&DataKey::Custody)
            .ok_or(Error::NotInitialized)?;

        env.storage().instance().set(&DataKey::Custody, &new_custody);

        env.events().publish(
            (Symbol::new(&env, "custody_updated"),),
            CustodyUpdatedEvent {
                old_custody,
                new_custody,
            },
        );

        Ok(())
    }

    /// Toggle deposit acceptance. Publishes an event only on an actual flip.
    pub fn set_accepting_deposits(env: Env, accepting: bool) -> Result<(), Error> {
        let admin = Self::require_admin(&env)?;
        admin.require_auth();

        let mut config: PoolConfig = env
            .storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)?;

        if config.accepting_deposits == accepting {
            return Ok(());
        }

        config.accepting_deposits = accepting;
        env.storage().instance().set(&DataKey::Config, &config);

        env.events().publish(
            (Symbol::new(&env, "accepting_deposits"),),
            AcceptingDepositsEvent { accepting },
        );

        Ok(())
    }

    /// Pause the pool (pool-level circuit breaker, pool admin only)
    pub fn pause(env: Env) -> Result<(), Error> {
        let admin = Self::require_admin(&env)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Paused, &true);
        Ok(())
    }

    /// Unpause the pool
    pub fn unpause(env: Env) -> Result<(), Error> {
        let admin = Self::require_admin(&env)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Paused, &false);
        Ok(())
    }

    /// Recover stray tokens sent to the vault. The share token can never be
    /// swept; the reference asset only while the pool is paused, so live
    /// user funds cannot be siphoned.
    pub fn sweep(env: Env, tkn: Address, amount: i128, to: Address) -> Result<(), Error> {
        let admin = Self::require_admin(&env)?;
        admin.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let share_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::ShareToken)
            .ok_or(Error::NotInitialized)?;
        if tkn == share_token {
            return Err(Error::CannotSweepShares);
        }

        let asset: Address = env
            .storage()
            .instance()
            .get(&DataKey::Asset)
            .ok_or(Error::NotInitialized)?;
        if tkn == asset && !Self::paused(&env) {
            return Err(Error::NotPaused);
        }

        let client = token::Client::new(&env, &tkn);
        client.transfer(&env.current_contract_address(), &to, &amount);

        env.events().publish(
            (Symbol::new(&env, "sweep"),),
            SweepEvent {
                token: tkn,
                amount,
                to,
            },
        );

        Ok(())
    }

    /// Move pool funds on behalf of an executed governance proposal.
    /// Callable only by the governance contract.
    pub fn governance_transfer(
        env: Env,
        tkn: Address,
        amount: i128,
        to: Address,
    ) -> Result<(), Error> {
        let governance: Address = env
            .storage()
            .instance()
            .get(&DataKey::Governance)
            .ok_or(Error::NotInitialized)?;
        governance.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let share_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::ShareToken)
            .ok_or(Error::NotInitialized)?;
        if tkn == share_token {
            return Err(Error::CannotSweepShares);
        }

        let client = token::Client::new(&env, &tkn);
        client.transfer(&env.current_contract_address(), &to, &amount);

        env.events().publish(
            (Symbol::new(&env, "gov_transfer"),),
            GovernanceTransferEvent {
                token: tkn,
                amount,
                to,
            },
        );

        Ok(())
    }

    /// Record authoritative realized interest for a position. Overrides the
    /// projected formula for both the user and tax legs.
    pub fn report_actual_interest(
        env: Env,
        position_id: u64,
        amount: i128,
    ) -> Result<(), Error> {
        let admin = Self::require_admin(&env)?;
        admin.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let mut position = Self::load_position(&env, position_id)?;
        if position.is_withdrawn && position.tax_withdrawn {
            return Err(Error::PositionClosed);
        }

        position.actual_interest = amount;
        env.storage()
            .persistent()
            .set(&DataKey::Position(position_id), &position);

        env.events().publish(
            (Symbol::new(&env, "actual_interest"), position_id),
            ActualInterestEvent {
                position_id,
                actual_interest: amount,
            },
        );

        Ok(())
    }

    // ============================================
    // DEPOSIT
    // ============================================

    /// Open a position. Callable only by governance, which has already
    /// pulled `amount` of the reference asset into the vault.
    ///
    /// Returns (certificate_id, user_shares, tax_shares).
    pub fn invest(
        env: Env,
        investor: Address,
        amount: i128,
        label: String,
    ) -> Result<(u64, i128, i128), Error> {
        Self::require_governance(&env)?;
        Self::check_not_paused(&env)?;

        let config: PoolConfig = env
            .storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)?;

        if !config.accepting_deposits {
            return Err(Error::DepositsClosed);
        }
        if amount < config.min_investment {
            return Err(Error::BelowMinInvestment);
        }
        if amount > config.max_investment {
            return Err(Error::AboveMaxInvestment);
        }

        let total_deposited: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalDeposited)
            .unwrap_or(0);

        if config.utilization_cap > 0 {
            let projected = total_deposited
                .checked_add(amount)
                .ok_or(Error::MathOverflow)?;
            if projected > config.utilization_cap {
                return Err(Error::ExceedsUtilizationCap);
            }
        }

        let share_scale: i128 = env
            .storage()
            .instance()
            .get(&DataKey::ShareScale)
            .ok_or(Error::NotInitialized)?;

        // Share pricing: the one place the share price is computed. The
        // denominator is the deposited total in ledger scale, which moves in
        // the same step as every mint and burn.
        let scaled_amount = amount.checked_mul(share_scale).ok_or(Error::MathOverflow)?;
        let supply = Self::share_supply(&env);
        let total_deposited_scaled = total_deposited
            .checked_mul(share_scale)
            .ok_or(Error::MathOverflow)?;

        let shares = shares_for_deposit(scaled_amount, supply, total_deposited_scaled)
            .ok_or(Error::MathOverflow)?;

        let effective_tax_bps = if config.tax_rate_bps != 0 {
            config.tax_rate_bps
        } else {
            Self::governance_default_tax_rate(&env)
        };

        let (user_shares, tax_shares) =
            split_tax(shares, effective_tax_bps).ok_or(Error::MathOverflow)?;

        let now = env.ledger().timestamp();
        let maturity_time = now + config.lock_duration;
        let interest = projected_interest(amount, config.expected_rate_bps, config.lock_duration)
            .ok_or(Error::MathOverflow)?;
        let estimated_gross_return = amount.checked_add(interest).ok_or(Error::MathOverflow)?;

        let position_id: u64 = env
            .storage()
            .instance()
            .get::<DataKey, u64>(&DataKey::PositionCounter)
            .unwrap_or(0)
            + 1;

        let pool_id: u32 = env
            .storage()
            .instance()
            .get(&DataKey::PoolId)
            .ok_or(Error::NotInitialized)?;

        let certificate_id = Self::mint_certificate(
            &env,
            &investor,
            pool_id,
            position_id,
            amount,
            maturity_time,
            estimated_gross_return,
            config.expected_rate_bps,
            now,
        );

        let position = Position {
            investor: investor.clone(),
            principal: amount,
            label,
            deposit_time: now,
            maturity_time,
            estimated_gross_return,
            user_shares,
            tax_shares,
            total_shares: shares,
            is_withdrawn: false,
            tax_withdrawn: false,
            actual_interest: 0,
            certificate_id,
        };

        env.storage()
            .persistent()
            .set(&DataKey::Position(position_id), &position);
        env.storage()
            .persistent()
            .set(&DataKey::CertPosition(certificate_id), &position_id);
        env.storage()
            .instance()
            .set(&DataKey::PositionCounter, &position_id);

        let mut index: Vec<u64> = env
            .storage()
            .persistent()
            .get(&DataKey::InvestorPositions(investor.clone()))
            .unwrap_or(Vec::new(&env));
        index.push_back(position_id);
        env.storage()
            .persistent()
            .set(&DataKey::InvestorPositions(investor.clone()), &index);

        let new_total = total_deposited
            .checked_add(amount)
            .ok_or(Error::MathOverflow)?;
        env.storage()
            .instance()
            .set(&DataKey::TotalDeposited, &new_total);

        // Mint both share legs, then forward principal to custody
        Self::mint_shares(&env, &investor, user_shares);
        if tax_shares > 0 {
            let tax_sink: Address = env
                .storage()
                .instance()
                .get(&DataKey::TaxSink)
                .ok_or(Error::NotInitialized)?;
            Self::mint_shares(&env, &tax_sink, tax_shares);
        }

        let asset: Address = env
            .storage()
            .instance()
            .get(&DataKey::Asset)
            .ok_or(Error::NotInitialized)?;
        let custody: Address = env
            .storage()
            .instance()
            .get(&DataKey::Custody)
            .ok_or(Error::NotInitialized)?;
        let asset_client = token::Client::new(&env, &asset);
        asset_client.transfer(&env.current_contract_address(), &custody, &amount);

        env.events().publish(
            (Symbol::new(&env, "invested"), position_id, investor.clone()),
            InvestedEvent {
                position_id,
                certificate_id,
                investor,
                amount,
                user_shares,
                tax_shares,
                maturity_time,
            },
        );

        Ok((certificate_id, user_shares, tax_shares))
    }

    // ============================================
    // WITHDRAWAL
    // ============================================

    /// Close the user leg of a matured position. Callable only by
    /// governance, which has already moved the investor's shares into vault
    /// custody. `shares_offered` must equal the recorded user shares
    /// exactly; the burn always uses the recorded amount.
    pub fn withdraw(
        env: Env,
        investor: Address,
        certificate_id: u64,
        shares_offered: i128,
    ) -> Result<i128, Error> {
        Self::require_governance(&env)?;
        Self::check_not_paused(&env)?;

        let position_id = Self::position_of_cert(&env, certificate_id)?;
        let mut position = Self::load_position(&env, position_id)?;

        if position.is_withdrawn {
            return Err(Error::AlreadyWithdrawn);
        }
        if Self::certificate_holder(&env, certificate_id)? != investor
            || position.investor != investor
        {
            return Err(Error::NotPositionHolder);
        }
        if env.ledger().timestamp() < position.maturity_time {
            return Err(Error::NotMatured);
        }
        if shares_offered != position.user_shares {
            return Err(Error::ShareMismatch);
        }

        let vault = env.current_contract_address();
        if Self::share_balance(&env, &vault) < position.user_shares {
            return Err(Error::InsufficientShareCustody);
        }

        let interest = Self::position_interest(&position)?;
        let user_interest = leg_amount(interest, position.user_shares, position.total_shares)
            .ok_or(Error::MathOverflow)?;
        let payout = position
            .principal
            .checked_add(user_interest)
            .ok_or(Error::MathOverflow)?;

        // Liquidity check precedes every state change so a failed payout
        // leaves the position re-attemptable once the pool is funded.
        let asset: Address = env
            .storage()
            .instance()
            .get(&DataKey::Asset)
            .ok_or(Error::NotInitialized)?;
        let asset_client = token::Client::new(&env, &asset);
        if asset_client.balance(&vault) < payout {
            return Err(Error::InsufficientPoolBalance);
        }

        position.is_withdrawn = true;
        env.storage()
            .persistent()
            .set(&DataKey::Position(position_id), &position);
        Self::decrease_deposited(&env, position.principal)?;
        Self::increase_withdrawn(&env, payout)?;

        Self::burn_shares(&env, &vault, position.user_shares);
        Self::burn_certificate(&env, certificate_id);
        env.storage()
            .persistent()
            .remove(&DataKey::CertPosition(certificate_id));

        asset_client.transfer(&vault, &investor, &payout);

        env.events().publish(
            (Symbol::new(&env, "withdrawn"), position_id, investor.clone()),
            WithdrawnEvent {
                position_id,
                investor,
                amount_paid: payout,
                shares_burned: shares_offered,
            },
        );

        Ok(payout)
    }

    /// Exit a position before maturity. Pays principal only and closes both
    /// legs: with no interest accrued the tax leg has nothing to collect.
    pub fn emergency_withdraw(
        env: Env,
        investor: Address,
        certificate_id: u64,
        shares_offered: i128,
    ) -> Result<i128, Error> {
        Self::require_governance(&env)?;

        let position_id = Self::position_of_cert(&env, certificate_id)?;
        let mut position = Self::load_position(&env, position_id)?;

        if position.is_withdrawn {
            return Err(Error::AlreadyWithdrawn);
        }
        if Self::certificate_holder(&env, certificate_id)? != investor
            || position.investor != investor
        {
            return Err(Error::NotPositionHolder);
        }
        if shares_offered != position.user_shares {
            return Err(Error::ShareMismatch);
        }

        let vault = env.current_contract_address();
        if Self::share_balance(&env, &vault) < position.user_shares {
            return Err(Error::InsufficientShareCustody);
        }

        let payout = position.principal;
        let asset: Address = env
            .storage()
            .instance()
            .get(&DataKey::Asset)
            .ok_or(Error::NotInitialized)?;
        let asset_client = token::Client::new(&env, &asset);
        if asset_client.balance(&vault) < payout {
            return Err(Error::InsufficientPoolBalance);
        }

        let close_tax_leg = !position.tax_withdrawn && position.tax_shares > 0;

        position.is_withdrawn = true;
        position.tax_withdrawn = true;
        env.storage()
            .persistent()
            .set(&DataKey::Position(position_id), &position);
        Self::decrease_deposited(&env, position.principal)?;
        Self::increase_withdrawn(&env, payout)?;

        Self::burn_shares(&env, &vault, position.user_shares);
        let mut tax_shares_burned = 0i128;
        if close_tax_leg {
            let tax_sink: Address = env
                .storage()
                .instance()
                .get(&DataKey::TaxSink)
                .ok_or(Error::NotInitialized)?;
            Self::burn_shares(&env, &tax_sink, position.tax_shares);
            tax_shares_burned = position.tax_shares;
        }

        Self::burn_certificate(&env, certificate_id);
        env.storage()
            .persistent()
            .remove(&DataKey::CertPosition(certificate_id));

        asset_client.transfer(&vault, &investor, &payout);

        env.events().publish(
            (
                Symbol::new(&env, "emergency_exit"),
                position_id,
                investor.clone(),
            ),
            EmergencyExitEvent {
                position_id,
                investor,
                principal_paid: payout,
                user_shares_burned: shares_offered,
                tax_shares_burned,
            },
        );

        Ok(payout)
    }

    // ============================================
    // TAX COLLECTION
    // ============================================

    /// Collect the tax leg of one matured position. Callable by the
    /// protocol treasury (read from governance).
    pub fn collect_tax(env: Env, position_id: u64, recipient: Address) -> Result<i128, Error> {
        Self::require_treasury(&env)?;
        Self::check_not_paused(&env)?;

        Self::collect_tax_inner(&env, position_id, &recipient)
    }

    /// Collect the tax legs of many positions. Positions failing state
    /// checks are skipped; the batch stops at the first position the pool
    /// balance cannot cover, bounding one failure's blast radius.
    ///
    /// Returns (positions processed, total amount paid).
    pub fn collect_tax_batch(
        env: Env,
        position_ids: Vec<u64>,
        recipient: Address,
    ) -> Result<(u32, i128), Error> {
        Self::require_treasury(&env)?;
        Self::check_not_paused(&env)?;

        let mut processed = 0u32;
        let mut total_paid = 0i128;

        for position_id in position_ids.iter() {
            match Self::collect_tax_inner(&env, position_id, &recipient) {
                Ok(amount) => {
                    processed += 1;
                    total_paid += amount;
                }
                Err(Error::InsufficientPoolBalance) => break,
                Err(_) => continue,
            }
        }

        Ok((processed, total_paid))
    }

    fn collect_tax_inner(env: &Env, position_id: u64, recipient: &Address) -> Result<i128, Error> {
        let mut position = Self::load_position(env, position_id)?;

        if position.tax_withdrawn {
            return Err(Error::TaxAlreadyCollected);
        }
        if env.ledger().timestamp() < position.maturity_time {
            return Err(Error::NotMatured);
        }

        // A zero-tax position is trivially collected
        if position.tax_shares == 0 {
            position.tax_withdrawn = true;
            env.storage()
                .persistent()
                .set(&DataKey::Position(position_id), &position);
            return Ok(0);
        }

        let interest = Self::position_interest(&position)?;
        let tax_payout = leg_amount(interest, position.tax_shares, position.total_shares)
            .ok_or(Error::MathOverflow)?;

        let vault = env.current_contract_address();
        let asset: Address = env
            .storage()
            .instance()
            .get(&DataKey::Asset)
            .ok_or(Error::NotInitialized)?;
        let asset_client = token::Client::new(env, &asset);
        if asset_client.balance(&vault) < tax_payout {
            return Err(Error::InsufficientPoolBalance);
        }

        position.tax_withdrawn = true;
        env.storage()
            .persistent()
            .set(&DataKey::Position(position_id), &position);
        Self::increase_withdrawn(env, tax_payout)?;

        let tax_sink: Address = env
            .storage()
            .instance()
            .get(&DataKey::TaxSink)
            .ok_or(Error::NotInitialized)?;
        Self::burn_shares(env, &tax_sink, position.tax_shares);

        if tax_payout > 0 {
            asset_client.transfer(&vault, recipient, &tax_payout);
        }

        env.events().publish(
            (Symbol::new(env, "tax_collected"), position_id),
            TaxCollectedEvent {
                position_id,
                recipient: recipient.clone(),
                amount_paid: tax_payout,
                shares_burned: position.tax_shares,
            },
        );

        Ok(tax_payout)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Pool configuration
    pub fn get_config(env: Env) -> Result<PoolConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    /// Full position record
    pub fn get_position(env: Env, position_id: u64) -> Result<Position, Error> {
        Self::load_position(&env, position_id)
    }

    /// Recorded user shares of a position (router helper)
    pub fn position_user_shares(env: Env, position_id: u64) -> Result<i128, Error> {
        Ok(Self::load_position(&env, position_id)?.user_shares)
    }

    /// Position bound to a certificate
    pub fn position_of_certificate(env: Env, certificate_id: u64) -> Result<u64, Error> {
        Self::position_of_cert(&env, certificate_id)
    }

    /// Position ids opened by an investor
    pub fn positions_of(env: Env, investor: Address) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::InvestorPositions(investor))
            .unwrap_or(Vec::new(&env))
    }

    /// Aggregate pool statistics. Both the capacity and the utilization
    /// branch explicitly on cap == 0; an uncapped pool never divides.
    pub fn get_pool_stats(env: Env) -> Result<PoolStats, Error> {
        let config: PoolConfig = env
            .storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)?;

        let total_deposited: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalDeposited)
            .unwrap_or(0);
        let total_withdrawn: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalWithdrawn)
            .unwrap_or(0);

        let (available_capacity, utilization_bps) = if config.utilization_cap > 0 {
            let available = config.utilization_cap.saturating_sub(total_deposited);
            let utilization = total_deposited
                .checked_mul(BASIS_POINTS)
                .and_then(|v| v.checked_div(config.utilization_cap))
                .ok_or(Error::MathOverflow)?;
            (available, utilization)
        } else {
            (UNCAPPED_AVAILABLE, 0)
        };

        Ok(PoolStats {
            total_deposited,
            total_withdrawn,
            available_capacity,
            utilization_bps,
        })
    }

    /// Check pool-level pause state
    pub fn is_paused(env: Env) -> bool {
        Self::paused(&env)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_admin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    fn require_governance(env: &Env) -> Result<(), Error> {
        let governance: Address = env
            .storage()
            .instance()
            .get(&DataKey::Governance)
            .ok_or(Error::NotInitialized)?;
        governance.require_auth();
        Ok(())
    }

    fn require_treasury(env: &Env) -> Result<(), Error> {
        let governance: Address = env
            .storage()
            .instance()
            .get(&DataKey::Governance)
            .ok_or(Error::NotInitialized)?;
        let treasury: Address = env.invoke_contract(
            &governance,
            &Symbol::new(env, "treasury"),
            vec![env],
        );
        treasury.require_auth();
        Ok(())
    }

    fn check_not_paused(env: &Env) -> Result<(), Error> {
        if Self::paused(env) {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    fn paused(env: &Env) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Paused)
            .unwrap_or(false)
    }

    fn load_position(env: &Env, position_id: u64) -> Result<Position, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Position(position_id))
            .ok_or(Error::PositionNotFound)
    }

    fn position_of_cert(env: &Env, certificate_id: u64) -> Result<u64, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::CertPosition(certificate_id))
            .ok_or(Error::CertificateNotFound)
    }

    /// Interest for payout purposes: reported actual interest when present,
    /// else the projected formula over the full lock period.
    fn position_interest(position: &Position) -> Result<i128, Error> {
        if position.actual_interest > 0 {
            return Ok(position.actual_interest);
        }

        // The projected interest was fixed at deposit time inside
        // estimated_gross_return; reading it back keeps the payout immune to
        // config changes made after the deposit.
        position
            .estimated_gross_return
            .checked_sub(position.principal)
            .ok_or(Error::MathOverflow)
    }

    fn governance_default_tax_rate(env: &Env) -> u32 {
        let governance: Address = env
            .storage()
            .instance()
            .get(&DataKey::Governance)
            .unwrap();
        env.invoke_contract(
            &governance,
            &Symbol::new(env, "default_tax_rate_bps"),
            vec![env],
        )
    }

    fn share_supply(env: &Env) -> i128 {
        let share_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::ShareToken)
            .unwrap();
        env.invoke_contract(&share_token, &Symbol::new(env, "total_supply"), vec![env])
    }

    fn share_balance(env: &Env, holder: &Address) -> i128 {
        let share_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::ShareToken)
            .unwrap();
        env.invoke_contract(
            &share_token,
            &Symbol::new(env, "balance"),
            vec![env, holder.into_val(env)],
        )
    }

    fn mint_shares(env: &Env, to: &Address, amount: i128) {
        let share_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::ShareToken)
            .unwrap();
        env.invoke_contract::<()>(
            &share_token,
            &Symbol::new(env, "mint"),
            vec![
                env,
                env.current_contract_address().into_val(env),
                to.into_val(env),
                amount.into_val(env),
            ],
        );
    }

    fn burn_shares(env: &Env, from: &Address, amount: i128) {
        let share_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::ShareToken)
            .unwrap();
        env.invoke_contract::<()>(
            &share_token,
            &Symbol::new(env, "burn"),
            vec![
                env,
                env.current_contract_address().into_val(env),
                from.into_val(env),
                amount.into_val(env),
            ],
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn mint_certificate(
        env: &Env,
        investor: &Address,
        pool_id: u32,
        position_id: u64,
        amount: i128,
        maturity_time: u64,
        gross_return: i128,
        rate_bps: u32,
        created_at: u64,
    ) -> u64 {
        let registry: Address = env
            .storage()
            .instance()
            .get(&DataKey::Registry)
            .unwrap();
        env.invoke_contract(
            &registry,
            &Symbol::new(env, "mint_certificate"),
            vec![
                env,
                env.current_contract_address().into_val(env),
                investor.into_val(env),
                pool_id.into_val(env),
                position_id.into_val(env),
                amount.into_val(env),
                maturity_time.into_val(env),
                gross_return.into_val(env),
                rate_bps.into_val(env),
                created_at.into_val(env),
            ],
        )
    }

    fn burn_certificate(env: &Env, certificate_id: u64) {
        let registry: Address = env
            .storage()
            .instance()
            .get(&DataKey::Registry)
            .unwrap();
        env.invoke_contract::<()>(
            &registry,
            &Symbol::new(env, "burn_certificate"),
            vec![
                env,
                env.current_contract_address().into_val(env),
                certificate_id.into_val(env),
            ],
        );
    }

    fn certificate_holder(env: &Env, certificate_id: u64) -> Result<Address, Error> {
        let registry: Address = env
            .storage()
            .instance()
            .get(&DataKey::Registry)
            .ok_or(Error::NotInitialized)?;
        Ok(env.invoke_contract(
            &registry,
            &Symbol::new(env, "owner_of"),
            vec![env, certificate_id.into_val(env)],
        ))
    }

    fn decrease_deposited(env: &Env, amount: i128) -> Result<(), Error> {
        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalDeposited)
            .unwrap_or(0);
        let new_total = total.checked_sub(amount).ok_or(Error::MathOverflow)?;
        env.storage()
            .instance()
            .set(&DataKey::TotalDeposited, &new_total);
        Ok(())
    }

    fn increase_withdrawn(env: &Env, amount: i128) -> Result<(), Error> {
        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalWithdrawn)
            .unwrap_or(0);
        let new_total = total.checked_add(amount).ok_or(Error::MathOverflow)?;
        env.storage()
            .instance()
            .set(&DataKey::TotalWithdrawn, &new_total);
        Ok(())
    }
}
