//! End-to-end tests wiring the governance router to the real vault,
//! share ledger and certificate registry.

use soroban_sdk::{
    contract, contractimpl, testutils::{Address as _, Ledger},
    token, vec, Address, Env, String, Vec,
};

use governance::{Error as GovError, Governance, GovernanceClient, ProposalAction};
use pool_shares::{PoolShares, PoolSharesClient};
use pool_vault::{PoolConfig, PoolVault, PoolVaultClient};
use position_registry::{PositionRegistry, PositionRegistryClient};

const LOCK: u64 = 31_536_000; // one year

/// Fixed-price 1:1 swap venue. Pulls the input token from the caller and
/// pays the output token from its own reserves.
#[contract]
struct MockSwapAdapter;

#[contractimpl]
impl MockSwapAdapter {
    pub fn quote(_env: Env, _token_in: Address, _token_out: Address, amount_in: i128) -> i128 {
        amount_in
    }

    pub fn swap(
        env: Env,
        caller: Address,
        token_in: Address,
        token_out: Address,
        amount_in: i128,
        min_out: i128,
        deadline: u64,
    ) -> i128 {
        if env.ledger().timestamp() > deadline {
            panic!("expired");
        }
        let amount_out = amount_in;
        if amount_out < min_out {
            panic!("insufficient output");
        }

        let this = env.current_contract_address();
        token::Client::new(&env, &token_in).transfer(&caller, &this, &amount_in);
        token::Client::new(&env, &token_out).transfer(&this, &caller, &amount_out);
        amount_out
    }
}

struct Protocol {
    env: Env,
    gov: GovernanceClient<'static>,
    vault: PoolVaultClient<'static>,
    shares: PoolSharesClient<'static>,
    registry: PositionRegistryClient<'static>,
    asset: Address,
    adapter: Address,
    vault_address: Address,
    custody: Address,
    tax_sink: Address,
    treasury: Address,
    signers: Vec<Address>,
    investor: Address,
}

impl Protocol {
    fn mint_asset(&self, to: &Address, amount: i128) {
        token::StellarAssetClient::new(&self.env, &self.asset).mint(to, &amount);
    }

    fn asset_balance(&self, who: &Address) -> i128 {
        token::Client::new(&self.env, &self.asset).balance(who)
    }

    fn advance_time(&self, by: u64) {
        self.env.ledger().with_mut(|li| {
            li.timestamp += by;
        });
    }

    fn pass_proposal(&self, action: &ProposalAction) {
        let id = self.gov.propose(
            &self.signers.get_unchecked(0),
            action,
            &String::from_str(&self.env, "ops"),
        );
        self.gov.sign(&self.signers.get_unchecked(1), &id);
    }
}

fn setup_with_tax(pool_tax_bps: u32) -> Protocol {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let treasury = Address::generate(&env);
    let custody = Address::generate(&env);
    let tax_sink = Address::generate(&env);
    let investor = Address::generate(&env);

    let asset = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();

    let shares_id = env.register_contract(None, PoolShares);
    let shares = PoolSharesClient::new(&env, &shares_id);
    shares.initialize(&admin);

    let registry_id = env.register_contract(None, PositionRegistry);
    let registry = PositionRegistryClient::new(&env, &registry_id);
    registry.initialize(&admin);

    let vault_id = env.register_contract(None, PoolVault);
    let vault = PoolVaultClient::new(&env, &vault_id);

    let gov_id = env.register_contract(None, Governance);
    let gov = GovernanceClient::new(&env, &gov_id);

    let adapter = env.register_contract(None, MockSwapAdapter);

    shares.add_operator(&vault_id);
    registry.add_operator(&vault_id);

    let config = PoolConfig {
        name: String::from_str(&env, "Growth Pool"),
        lock_duration: LOCK,
        min_investment: 100,
        max_investment: 1_000_000,
        utilization_cap: 0,
        expected_rate_bps: 2_000,
        tax_rate_bps: pool_tax_bps,
        accepting_deposits: true,
    };
    vault.initialize(
        &admin,
        &gov_id,
        &asset,
        &shares_id,
        &registry_id,
        &tax_sink,
        &custody,
        &1u32,
        &1i128,
        &config,
    );

    let signers = vec![
        &env,
        Address::generate(&env),
        Address::generate(&env),
        Address::generate(&env),
    ];
    gov.initialize(
        &admin, &signers, &2u32, &treasury, &100u32, &vault_id, &asset, &shares_id, &adapter,
    );

    Protocol {
        env,
        gov,
        vault,
        shares,
        registry,
        asset,
        adapter,
        vault_address: vault_id,
        custody,
        tax_sink,
        treasury,
        signers,
        investor,
    }
}

fn setup() -> Protocol {
    setup_with_tax(250)
}

// ============================================
// DEPOSIT ROUTING
// ============================================

#[test]
fn test_deposit_splits_shares_and_forwards_principal() {
    let p = setup();
    p.mint_asset(&p.investor, 10_000);

    let (certificate_id, user_shares, tax_shares) =
        p.gov
            .deposit(&p.investor, &10_000, &String::from_str(&p.env, "first"));

    assert_eq!(certificate_id, 1);
    assert_eq!(user_shares, 9_750);
    assert_eq!(tax_shares, 250);

    // Principal travels investor -> vault -> custody in one call
    assert_eq!(p.asset_balance(&p.investor), 0);
    assert_eq!(p.asset_balance(&p.vault_address), 0);
    assert_eq!(p.asset_balance(&p.custody), 10_000);

    assert_eq!(p.shares.balance(&p.investor), 9_750);
    assert_eq!(p.shares.balance(&p.tax_sink), 250);
    assert_eq!(p.shares.total_supply(), 10_000);

    assert_eq!(p.registry.owner_of(&certificate_id), p.investor);
    assert_eq!(p.vault.positions_of(&p.investor), vec![&p.env, 1u64]);
}

#[test]
fn test_deposit_rejects_non_positive_amount() {
    let p = setup();
    let result = p
        .gov
        .try_deposit(&p.investor, &0, &String::from_str(&p.env, "nothing"));
    assert_eq!(result, Err(Ok(GovError::InvalidAmount)));
}

// ============================================
// SWAP DEPOSITS
// ============================================

#[test]
fn test_swap_deposit_converts_and_invests() {
    let p = setup();

    let usdc = p
        .env
        .register_stellar_asset_contract_v2(Address::generate(&p.env))
        .address();
    token::StellarAssetClient::new(&p.env, &usdc).mint(&p.investor, &5_000);
    // Adapter reserves in the pool asset
    p.mint_asset(&p.adapter, 5_000);

    let deadline = p.env.ledger().timestamp() + 600;
    let (certificate_id, user_shares, tax_shares) = p.gov.deposit_with_swap(
        &p.investor,
        &usdc,
        &5_000,
        &4_900,
        &deadline,
        &String::from_str(&p.env, "swapped"),
    );

    assert_eq!(certificate_id, 1);
    assert_eq!(user_shares, 4_875);
    assert_eq!(tax_shares, 125);
    assert_eq!(p.asset_balance(&p.custody), 5_000);
    assert_eq!(token::Client::new(&p.env, &usdc).balance(&p.investor), 0);
    assert_eq!(token::Client::new(&p.env, &usdc).balance(&p.adapter), 5_000);
}

#[test]
fn test_swap_deposit_rejects_expired_deadline() {
    let p = setup();
    let usdc = p
        .env
        .register_stellar_asset_contract_v2(Address::generate(&p.env))
        .address();

    p.advance_time(1_000);
    let result = p.gov.try_deposit_with_swap(
        &p.investor,
        &usdc,
        &5_000,
        &4_900,
        &500u64,
        &String::from_str(&p.env, "late"),
    );
    assert_eq!(result, Err(Ok(GovError::DeadlineExpired)));
}

#[test]
fn test_swap_deposit_surfaces_adapter_failure() {
    let p = setup();

    let usdc = p
        .env
        .register_stellar_asset_contract_v2(Address::generate(&p.env))
        .address();
    token::StellarAssetClient::new(&p.env, &usdc).mint(&p.investor, &5_000);
    p.mint_asset(&p.adapter, 5_000);

    // 1:1 venue cannot satisfy min_out above amount_in
    let deadline = p.env.ledger().timestamp() + 600;
    let result = p.gov.try_deposit_with_swap(
        &p.investor,
        &usdc,
        &5_000,
        &5_001,
        &deadline,
        &String::from_str(&p.env, "greedy"),
    );
    assert_eq!(result, Err(Ok(GovError::SwapFailed)));
}

// ============================================
// WITHDRAWAL ROUTING
// ============================================

#[test]
fn test_withdraw_after_maturity_pays_principal_plus_user_leg() {
    let p = setup();
    p.mint_asset(&p.investor, 10_000);
    let (certificate_id, _, _) =
        p.gov
            .deposit(&p.investor, &10_000, &String::from_str(&p.env, "first"));

    p.advance_time(LOCK);
    // Custody returns principal plus realized yield before redemption
    p.mint_asset(&p.vault_address, 11_950);

    let paid = p.gov.withdraw(&p.investor, &certificate_id);

    // 10_000 principal + 2_000 * 9_750 / 10_000 user leg
    assert_eq!(paid, 11_950);
    assert_eq!(p.asset_balance(&p.investor), 11_950);
    assert_eq!(p.shares.balance(&p.investor), 0);
    // Tax leg still outstanding
    assert_eq!(p.shares.total_supply(), 250);
    assert!(p.registry.try_owner_of(&certificate_id).is_err());
}

#[test]
fn test_withdraw_before_maturity_fails() {
    let p = setup();
    p.mint_asset(&p.investor, 10_000);
    let (certificate_id, _, _) =
        p.gov
            .deposit(&p.investor, &10_000, &String::from_str(&p.env, "early"));

    p.mint_asset(&p.vault_address, 11_950);
    assert!(p.gov.try_withdraw(&p.investor, &certificate_id).is_err());
}

#[test]
fn test_withdraw_twice_fails() {
    let p = setup();
    p.mint_asset(&p.investor, 10_000);
    let (certificate_id, _, _) =
        p.gov
            .deposit(&p.investor, &10_000, &String::from_str(&p.env, "once"));

    p.advance_time(LOCK);
    p.mint_asset(&p.vault_address, 20_000);
    p.gov.withdraw(&p.investor, &certificate_id);

    // The certificate is burned; a replay cannot even resolve a position
    assert!(p.gov.try_withdraw(&p.investor, &certificate_id).is_err());
}

#[test]
fn test_emergency_exit_returns_principal_only() {
    let p = setup();
    p.mint_asset(&p.investor, 10_000);
    let (certificate_id, _, _) =
        p.gov
            .deposit(&p.investor, &10_000, &String::from_str(&p.env, "exit"));

    p.mint_asset(&p.vault_address, 10_000);
    let paid = p.gov.emergency_exit(&p.investor, &certificate_id);

    assert_eq!(paid, 10_000);
    assert_eq!(p.asset_balance(&p.investor), 10_000);
    // Both legs burned, nothing left to collect
    assert_eq!(p.shares.total_supply(), 0);
    assert_eq!(p.shares.balance(&p.tax_sink), 0);
}

// ============================================
// GOVERNANCE ACTIONS AGAINST THE LIVE VAULT
// ============================================

#[test]
fn test_emergency_withdraw_proposal_drains_vault_to_treasury() {
    let p = setup();
    p.mint_asset(&p.vault_address, 3_000);

    p.pass_proposal(&ProposalAction::EmergencyWithdraw(
        p.asset.clone(),
        3_000,
        p.treasury.clone(),
    ));

    assert_eq!(p.asset_balance(&p.vault_address), 0);
    assert_eq!(p.asset_balance(&p.treasury), 3_000);
}

#[test]
fn test_pause_blocks_deposits_but_not_emergency_exit() {
    let p = setup();
    p.mint_asset(&p.investor, 10_000);
    let (certificate_id, _, _) =
        p.gov
            .deposit(&p.investor, &10_000, &String::from_str(&p.env, "pre"));

    p.pass_proposal(&ProposalAction::PauseProtocol);
    assert!(p.gov.is_paused());

    p.mint_asset(&p.investor, 500);
    let result = p
        .gov
        .try_deposit(&p.investor, &500, &String::from_str(&p.env, "blocked"));
    assert_eq!(result, Err(Ok(GovError::ProtocolPaused)));

    // The escape hatch stays open while paused
    p.mint_asset(&p.vault_address, 10_000);
    let paid = p.gov.emergency_exit(&p.investor, &certificate_id);
    assert_eq!(paid, 10_000);

    p.pass_proposal(&ProposalAction::UnpauseProtocol);
    let (certificate_id, _, _) =
        p.gov
            .deposit(&p.investor, &500, &String::from_str(&p.env, "resumed"));
    assert_eq!(certificate_id, 2);
}

#[test]
fn test_tax_rate_proposal_applies_to_default_rate_pools() {
    // Pool-level rate 0 defers to the protocol default
    let p = setup_with_tax(0);
    p.mint_asset(&p.investor, 20_000);

    let (_, user_shares, tax_shares) =
        p.gov
            .deposit(&p.investor, &10_000, &String::from_str(&p.env, "at 1%"));
    assert_eq!(user_shares, 9_900);
    assert_eq!(tax_shares, 100);

    p.pass_proposal(&ProposalAction::SetTaxRate(500));

    let (_, user_shares, tax_shares) =
        p.gov
            .deposit(&p.investor, &10_000, &String::from_str(&p.env, "at 5%"));
    assert_eq!(user_shares, 9_500);
    assert_eq!(tax_shares, 500);
}

#[test]
fn test_tax_collection_after_user_withdrawal() {
    let p = setup();
    p.mint_asset(&p.investor, 10_000);
    let (certificate_id, _, _) =
        p.gov
            .deposit(&p.investor, &10_000, &String::from_str(&p.env, "taxed"));

    p.advance_time(LOCK);
    p.mint_asset(&p.vault_address, 12_000);
    p.gov.withdraw(&p.investor, &certificate_id);

    // 2_000 * 250 / 10_000 tax leg, collected by the treasury
    let collected = p.vault.collect_tax(&1u64, &p.treasury);
    assert_eq!(collected, 50);
    assert_eq!(p.asset_balance(&p.treasury), 50);
    assert_eq!(p.shares.total_supply(), 0);
}
