pub mod address_blacklist;
pub mod bytecode;
pub mod dangerous_functions;
pub mod front_running;
pub mod gas_optimization;
pub mod hardcoded_secrets;
pub mod hidden_withdrawal;
pub mod integer_overflow;
pub mod liquidity_removal;
pub mod ownership_transfer;
pub mod proxy_storage;
pub mod reentrancy;
pub mod supply_manipulation;
pub mod trading_restrictions;
pub mod transaction_tax;
pub mod transfer_gating;
pub mod tx_origin_auth;
pub mod uncapped_minting;
pub mod unchecked_calls;

/// Returns all built-in detectors
pub fn all_detectors() -> Vec<Box<dyn solguard::detector::Detector>> {
    vec![
        Box::new(ownership_transfer::OwnershipTransfer),
        Box::new(hidden_withdrawal::HiddenWithdrawal),
        Box::new(liquidity_removal::LiquidityRemoval),
        Box::new(address_blacklist::AddressBlacklist),
        Box::new(uncapped_minting::UncappedMinting),
        Box::new(supply_manipulation::SupplyManipulation),
        Box::new(trading_restrictions::TradingRestrictions),
        Box::new(transfer_gating::TransferGating),
        Box::new(transaction_tax::TransactionTax),
        Box::new(tx_origin_auth::TxOriginAuth),
        Box::new(dangerous_functions::DangerousFunctions),
        Box::new(reentrancy::Reentrancy),
        Box::new(integer_overflow::IntegerOverflow),
        Box::new(unchecked_calls::UncheckedCalls),
        Box::new(hardcoded_secrets::HardcodedSecrets),
        Box::new(gas_optimization::GasOptimization),
        Box::new(front_running::FrontRunning),
        Box::new(proxy_storage::ProxyStorage),
        Box::new(bytecode::BytecodeHeuristics),
    ]
}
