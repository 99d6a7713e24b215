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
    /// Caller not authorized for this operation
    Unauthorized = 10,

    // ============================================
    // POSITION/CERTIFICATE ERRORS (20-29)
    // ============================================
    /// Position not found
    PositionNotFound = 20,
    /// Certificate not bound to any position
    CertificateNotFound = 21,
    /// Certificate holder is not the recorded investor
    NotPositionHolder = 22,

    // ============================================
    // LIFECYCLE ERRORS (30-39)
    // ============================================
    /// User leg already withdrawn
    AlreadyWithdrawn = 30,
    /// Position has not reached maturity
    NotMatured = 31,
    /// Tax leg already collected
    TaxAlreadyCollected = 32,
    /// Offered shares must equal the recorded user shares exactly
    ShareMismatch = 33,
    /// Vault share custody doesn't cover the burn
    InsufficientShareCustody = 34,
    /// Position is fully closed
    PositionClosed = 35,

    // ============================================
    // AMOUNT ERRORS (40-49)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 40,
    /// Deposit below pool minimum
    BelowMinInvestment = 41,
    /// Deposit above pool maximum
    AboveMaxInvestment = 42,
    /// Deposit would exceed the utilization cap
    ExceedsUtilizationCap = 43,
    /// Arithmetic overflow
    MathOverflow = 44,

    // ============================================
    // CONFIG VALIDATION ERRORS (50-59)
    // ============================================
    /// Lock duration outside [MIN_LOCK_DURATION, MAX_LOCK_DURATION]
    InvalidLockDuration = 50,
    /// min_investment must be positive and <= max_investment
    InvalidInvestmentRange = 51,
    /// Expected rate above ceiling
    InvalidRate = 52,
    /// Tax rate above ceiling
    InvalidTaxRate = 53,
    /// Nonzero cap must cover at least one max investment
    InvalidCap = 54,
    /// Share scale factor must be positive
    InvalidShareScale = 55,

    // ============================================
    // OPERATIONAL ERRORS (60-69)
    // ============================================
    /// Pool is paused
    ContractPaused = 60,
    /// Pool is not accepting deposits
    DepositsClosed = 61,
    /// Operation requires the pool to be paused
    NotPaused = 62,
    /// Share token cannot be swept
    CannotSweepShares = 63,

    // ============================================
    // LIQUIDITY ERRORS (70-79)
    // ============================================
    /// Pool asset balance insufficient for the payout
    InsufficientPoolBalance = 70,
}
