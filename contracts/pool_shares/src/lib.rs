#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;

use events::{BurnEvent, MintEvent, TransferEvent};
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

#[contract]
pub struct PoolShares;

#[contractimpl]
impl PoolShares {
    /// Initialize the share ledger
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::TotalSupply, &0i128);

        Ok(())
    }

    /// Register an operator (the owning vault)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn add_operator(env: Env, operator: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        env.storage()
            .instance()
            .set(&DataKey::Operators(operator), &true);

        Ok(())
    }

    /// Remove an operator
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn remove_operator(env: Env, operator: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        env.storage()
            .instance()
            .remove(&DataKey::Operators(operator));

        Ok(())
    }

    /// Mint shares (operators only). Balance and total supply move together.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOperator`: Caller is not a registered operator
    /// - `InvalidAmount`: Amount <= 0
    pub fn mint(env: Env, operator: Address, to: Address, amount: i128) -> Result<(), Error> {
        Self::require_operator(&env, &operator)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let balance_key = DataKey::Balance(to.clone());
        let current = env
            .storage()
            .persistent()
            .get::<DataKey, i128>(&balance_key)
            .unwrap_or(0);

        let new_balance = current.checked_add(amount).ok_or(Error::MathOverflow)?;

        let supply: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0);
        let new_supply = supply.checked_add(amount).ok_or(Error::MathOverflow)?;

        env.storage().persistent().set(&balance_key, &new_balance);
        env.storage()
            .instance()
            .set(&DataKey::TotalSupply, &new_supply);

        env.events().publish(
            (Symbol::new(&env, "mint"), to.clone()),
            MintEvent {
                to,
                amount,
                total_supply: new_supply,
            },
        );

        Ok(())
    }

    /// Burn shares (operators only). Balance and total supply move together.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOperator`: Caller is not a registered operator
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Not enough shares
    pub fn burn(env: Env, operator: Address, from: Address, amount: i128) -> Result<(), Error> {
        Self::require_operator(&env, &operator)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let balance_key = DataKey::Balance(from.clone());
        let current = env
            .storage()
            .persistent()
            .get::<DataKey, i128>(&balance_key)
            .ok_or(Error::InsufficientBalance)?;

        if current < amount {
            return Err(Error::InsufficientBalance);
        }

        let new_balance = current - amount;

        let supply: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0);
        let new_supply = supply.checked_sub(amount).ok_or(Error::MathOverflow)?;

        if new_balance == 0 {
            env.storage().persistent().remove(&balance_key);
        } else {
            env.storage().persistent().set(&balance_key, &new_balance);
        }
        env.storage()
            .instance()
            .set(&DataKey::TotalSupply, &new_supply);

        env.events().publish(
            (Symbol::new(&env, "burn"), from.clone()),
            BurnEvent {
                from,
                amount,
                total_supply: new_supply,
            },
        );

        Ok(())
    }

    /// Transfer shares between holders
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Not enough shares
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        from.require_auth();

        let from_key = DataKey::Balance(from.clone());
        let from_balance = env
            .storage()
            .persistent()
            .get::<DataKey, i128>(&from_key)
            .ok_or(Error::InsufficientBalance)?;

        if from_balance < amount {
            return Err(Error::InsufficientBalance);
        }

        let to_key = DataKey::Balance(to.clone());
        let to_balance = env
            .storage()
            .persistent()
            .get::<DataKey, i128>(&to_key)
            .unwrap_or(0);

        let new_from = from_balance - amount;
        let new_to = to_balance.checked_add(amount).ok_or(Error::MathOverflow)?;

        if new_from == 0 {
            env.storage().persistent().remove(&from_key);
        } else {
            env.storage().persistent().set(&from_key, &new_from);
        }
        env.storage().persistent().set(&to_key, &new_to);

        env.events().publish(
            (Symbol::new(&env, "transfer"), from.clone(), to.clone()),
            TransferEvent { from, to, amount },
        );

        Ok(())
    }

    /// Get a holder's share balance
    pub fn balance(env: Env, holder: Address) -> i128 {
        env.storage()
            .persistent()
            .get::<DataKey, i128>(&DataKey::Balance(holder))
            .unwrap_or(0)
    }

    /// Get the outstanding share supply
    pub fn total_supply(env: Env) -> i128 {
        env.storage()
            .instance()
            .get::<DataKey, i128>(&DataKey::TotalSupply)
            .unwrap_or(0)
    }

    /// Check if address is an operator
    pub fn is_operator(env: Env, address: Address) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Operators(address))
            .unwrap_or(false)
    }

    fn require_operator(env: &Env, operator: &Address) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        operator.require_auth();

        let is_operator = env
            .storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Operators(operator.clone()))
            .unwrap_or(false);

        if !is_operator {
            return Err(Error::NotOperator);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{testutils::Address as _, Address, Env};

    const SCALE: i128 = 10_000_000;

    fn setup() -> (Env, PoolSharesClient<'static>, Address, Address) {
        let env = Env::default();
        env.mock_all_auths();

        let contract_id = env.register_contract(None, PoolShares);
        let client = PoolSharesClient::new(&env, &contract_id);

        let admin = Address::generate(&env);
        let vault = Address::generate(&env);

        client.initialize(&admin);
        client.add_operator(&vault);

        (env, client, admin, vault)
    }

    #[test]
    fn test_initialize_once() {
        let (_env, client, admin, _vault) = setup();

        let result = client.try_initialize(&admin);
        assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
    }

    #[test]
    fn test_mint_updates_balance_and_supply() {
        let (env, client, _admin, vault) = setup();

        let user = Address::generate(&env);
        let amount = 1000i128 * SCALE;

        client.mint(&vault, &user, &amount);

        assert_eq!(client.balance(&user), amount);
        assert_eq!(client.total_supply(), amount);
    }

    #[test]
    fn test_mint_requires_operator() {
        let (env, client, _admin, _vault) = setup();

        let stranger = Address::generate(&env);
        let user = Address::generate(&env);

        let result = client.try_mint(&stranger, &user, &(100i128 * SCALE));
        assert_eq!(result, Err(Ok(Error::NotOperator)));
    }

    #[test]
    fn test_burn_updates_balance_and_supply() {
        let (env, client, _admin, vault) = setup();

        let user = Address::generate(&env);
        client.mint(&vault, &user, &(1000i128 * SCALE));
        client.burn(&vault, &user, &(400i128 * SCALE));

        assert_eq!(client.balance(&user), 600i128 * SCALE);
        assert_eq!(client.total_supply(), 600i128 * SCALE);
    }

    #[test]
    fn test_burn_more_than_balance_fails() {
        let (env, client, _admin, vault) = setup();

        let user = Address::generate(&env);
        client.mint(&vault, &user, &(100i128 * SCALE));

        let result = client.try_burn(&vault, &user, &(200i128 * SCALE));
        assert_eq!(result, Err(Ok(Error::InsufficientBalance)));
        assert_eq!(client.total_supply(), 100i128 * SCALE);
    }

    #[test]
    fn test_transfer_conserves_supply() {
        let (env, client, _admin, vault) = setup();

        let user1 = Address::generate(&env);
        let user2 = Address::generate(&env);

        client.mint(&vault, &user1, &(1000i128 * SCALE));
        client.transfer(&user1, &user2, &(250i128 * SCALE));

        assert_eq!(client.balance(&user1), 750i128 * SCALE);
        assert_eq!(client.balance(&user2), 250i128 * SCALE);
        assert_eq!(client.total_supply(), 1000i128 * SCALE);
    }

    #[test]
    fn test_removed_operator_cannot_mint() {
        let (env, client, _admin, vault) = setup();

        let user = Address::generate(&env);
        client.remove_operator(&vault);

        let result = client.try_mint(&vault, &user, &(100i128 * SCALE));
        assert_eq!(result, Err(Ok(Error::NotOperator)));
    }
}
