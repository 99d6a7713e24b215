use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-15)
    // ============================================
    /// Caller is not an authorized signer
    NotSigner = 10,

    // ============================================
    // PROPOSAL ERRORS (20-29)
    // ============================================
    /// Proposal not found
    ProposalNotFound = 20,
    /// Proposal window has closed
    ProposalExpired = 21,
    /// Proposal already executed
    ProposalAlreadyExecuted = 22,
    /// Signer already signed this proposal
    AlreadySigned = 23,
    /// Signature count below threshold
    InsufficientSignatures = 24,

    // ============================================
    // SIGNER SET ERRORS (30-39)
    // ============================================
    /// Signer already in the set
    DuplicateSigner = 30,
    /// Signer not in the set
    SignerNotFound = 31,
    /// Removal would leave fewer signers than required
    TooFewSigners = 32,
    /// Threshold outside [2, signer count]
    InvalidThreshold = 33,

    // ============================================
    // AMOUNT/RATE ERRORS (40-49)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 40,
    /// Tax rate above ceiling
    InvalidTaxRate = 41,

    // ============================================
    // EXTERNAL CALL ERRORS (50-59)
    // ============================================
    /// Swap deadline already passed
    DeadlineExpired = 50,
    /// Swap adapter call failed
    SwapFailed = 51,

    // ============================================
    // OPERATIONAL ERRORS (60-69)
    // ============================================
    /// Protocol is paused by governance
    ProtocolPaused = 60,
}
