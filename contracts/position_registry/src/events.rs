use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct CertificateMintedEvent {
    pub certificate_id: u64,
    pub position_id: u64,
    pub pool_id: u32,
    pub investor: Address,
    pub amount: i128,
    pub maturity_time: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct CertificateBurnedEvent {
    pub certificate_id: u64,
    pub position_id: u64,
    pub holder: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct CertificateTransferEvent {
    pub certificate_id: u64,
    pub from: Address,
    pub to: Address,
}
