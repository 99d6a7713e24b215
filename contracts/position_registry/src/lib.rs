#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
pub use storage::Certificate;

use events::{CertificateBurnedEvent, CertificateMintedEvent, CertificateTransferEvent};
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

#[contract]
pub struct PositionRegistry;

#[contractimpl]
impl PositionRegistry {
    /// Initialize the registry
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
        env.storage()
            .instance()
            .set(&DataKey::CertificateCounter, &0u64);
        env.storage().instance().set(&DataKey::TotalMinted, &0u64);

        Ok(())
    }

    /// Register an operator (a vault)
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

    /// Mint an ownership certificate for a vault position (operators only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOperator`: Caller is not a registered operator
    /// - `InvalidAmount`: Amount <= 0
    pub fn mint_certificate(
        env: Env,
        operator: Address,
        investor: Address,
        pool_id: u32,
        position_id: u64,
        amount: i128,
        maturity_time: u64,
        gross_return: i128,
        rate_bps: u32,
        created_at: u64,
    ) -> Result<u64, Error> {
        Self::require_operator(&env, &operator)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let counter: u64 = env
            .storage()
            .instance()
            .get(&DataKey::CertificateCounter)
            .unwrap_or(0);
        let certificate_id = counter + 1;

        let certificate = Certificate {
            certificate_id,
            pool_id,
            position_id,
            amount,
            maturity_time,
            gross_return,
            rate_bps,
            created_at,
        };

        env.storage()
            .persistent()
            .set(&DataKey::Certificate(certificate_id), &certificate);
        env.storage()
            .persistent()
            .set(&DataKey::Owner(certificate_id), &investor);
        env.storage()
            .instance()
            .set(&DataKey::CertificateCounter, &certificate_id);

        let minted: u64 = env
            .storage()
            .instance()
            .get(&DataKey::TotalMinted)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::TotalMinted, &(minted + 1));

        env.events().publish(
            (Symbol::new(&env, "cert_minted"), certificate_id),
            CertificateMintedEvent {
                certificate_id,
                position_id,
                pool_id,
                investor,
                amount,
                maturity_time,
            },
        );

        Ok(certificate_id)
    }

    /// Burn a certificate at full user-leg exit (operators only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOperator`: Caller is not a registered operator
    /// - `CertificateNotFound`: Certificate doesn't exist
    pub fn burn_certificate(env: Env, operator: Address, certificate_id: u64) -> Result<(), Error> {
        Self::require_operator(&env, &operator)?;

        let holder: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Owner(certificate_id))
            .ok_or(Error::CertificateNotFound)?;
        let certificate: Certificate = env
            .storage()
            .persistent()
            .get(&DataKey::Certificate(certificate_id))
            .ok_or(Error::CertificateNotFound)?;

        env.storage()
            .persistent()
            .remove(&DataKey::Owner(certificate_id));
        env.storage()
            .persistent()
            .remove(&DataKey::Certificate(certificate_id));

        env.events().publish(
            (Symbol::new(&env, "cert_burned"), certificate_id),
            CertificateBurnedEvent {
                certificate_id,
                position_id: certificate.position_id,
                holder,
            },
        );

        Ok(())
    }

    /// Transfer a certificate. The vault still requires the holder to match
    /// the recorded investor at redemption, so this does not transfer the
    /// right to redeem.
    ///
    /// # Errors
    /// - `CertificateNotFound`: Certificate doesn't exist
    /// - `NotHolder`: From address is not the current holder
    pub fn transfer(env: Env, from: Address, to: Address, certificate_id: u64) -> Result<(), Error> {
        from.require_auth();

        let holder: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Owner(certificate_id))
            .ok_or(Error::CertificateNotFound)?;

        if holder != from {
            return Err(Error::NotHolder);
        }

        env.storage()
            .persistent()
            .set(&DataKey::Owner(certificate_id), &to);

        env.events().publish(
            (Symbol::new(&env, "cert_transfer"), certificate_id),
            CertificateTransferEvent {
                certificate_id,
                from,
                to,
            },
        );

        Ok(())
    }

    /// Current holder of a certificate
    ///
    /// # Errors
    /// - `CertificateNotFound`: Certificate doesn't exist or was burned
    pub fn owner_of(env: Env, certificate_id: u64) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Owner(certificate_id))
            .ok_or(Error::CertificateNotFound)
    }

    /// Position bound to a certificate
    ///
    /// # Errors
    /// - `CertificateNotFound`: Certificate doesn't exist or was burned
    pub fn position_of(env: Env, certificate_id: u64) -> Result<u64, Error> {
        let certificate: Certificate = env
            .storage()
            .persistent()
            .get(&DataKey::Certificate(certificate_id))
            .ok_or(Error::CertificateNotFound)?;
        Ok(certificate.position_id)
    }

    /// Full certificate record
    ///
    /// # Errors
    /// - `CertificateNotFound`: Certificate doesn't exist or was burned
    pub fn get_certificate(env: Env, certificate_id: u64) -> Result<Certificate, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Certificate(certificate_id))
            .ok_or(Error::CertificateNotFound)
    }

    /// Lifetime mint count (burned certificates included)
    pub fn total_minted(env: Env) -> u64 {
        env.storage()
            .instance()
            .get::<DataKey, u64>(&DataKey::TotalMinted)
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
