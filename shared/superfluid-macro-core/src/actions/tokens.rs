//! Token actions: upgrade, downgrade, approve and transfer.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolValue};

use crate::{
    errors::Result,
    format::{format_amount, SUPER_TOKEN_DECIMALS},
    host::HostContext,
    operations::{Operation, OperationType},
};

/// Symbol shown for super tokens wrapping the chain's native asset.
pub const NATIVE_UNDERLYING_SYMBOL: &str = "native";

sol! {
    /// `(address token, uint256 amount)`, shared by upgrade and downgrade.
    #[derive(Debug, PartialEq, Eq)]
    struct TokenAmountParams {
        address token;
        uint256 amount;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ApproveParams {
        address token;
        address spender;
        uint256 amount;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct TransferParams {
        address token;
        address receiver;
        uint256 amount;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct SuperfluidUpgrade {
        string action;
        address token;
        uint256 amount;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct SuperfluidDowngrade {
        string action;
        address token;
        uint256 amount;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct SuperfluidApprove {
        string action;
        address token;
        address spender;
        uint256 amount;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct SuperfluidTransfer {
        string action;
        address token;
        address receiver;
        uint256 amount;
    }
}

/// Underlying side of a wrap: formatted underlying amount and its symbol.
fn underlying_side<H: HostContext + ?Sized>(
    host: &H,
    token: Address,
    amount: U256,
) -> Result<(String, String)> {
    let underlying = host.underlying_token(token)?;
    let (underlying_amount, _adjusted) = host.to_underlying_amount(token, amount)?;
    if underlying == Address::ZERO {
        return Ok((
            format_amount(underlying_amount, SUPER_TOKEN_DECIMALS),
            NATIVE_UNDERLYING_SYMBOL.to_string(),
        ));
    }
    let decimals = host.decimals(underlying)?;
    Ok((format_amount(underlying_amount, decimals), host.symbol(underlying)?))
}

pub(crate) fn upgrade_message<H: HostContext + ?Sized>(
    host: &H,
    p: &TokenAmountParams,
) -> Result<String> {
    let symbol = host.symbol(p.token)?;
    let (underlying, underlying_symbol) = underlying_side(host, p.token, p.amount)?;
    Ok(format!(
        "Upgrade {underlying} {underlying_symbol} to {} {symbol}",
        format_amount(p.amount, SUPER_TOKEN_DECIMALS)
    ))
}

pub(crate) fn downgrade_message<H: HostContext + ?Sized>(
    host: &H,
    p: &TokenAmountParams,
) -> Result<String> {
    let symbol = host.symbol(p.token)?;
    let (underlying, underlying_symbol) = underlying_side(host, p.token, p.amount)?;
    Ok(format!(
        "Downgrade {} {symbol} to {underlying} {underlying_symbol}",
        format_amount(p.amount, SUPER_TOKEN_DECIMALS)
    ))
}

pub(crate) fn approve_message<H: HostContext + ?Sized>(
    host: &H,
    p: &ApproveParams,
) -> Result<String> {
    let symbol = host.symbol(p.token)?;
    Ok(format!(
        "Approve spending of {} {symbol}",
        format_amount(p.amount, SUPER_TOKEN_DECIMALS)
    ))
}

pub(crate) fn transfer_message<H: HostContext + ?Sized>(
    host: &H,
    p: &TransferParams,
) -> Result<String> {
    let symbol = host.symbol(p.token)?;
    Ok(format!(
        "Transfer {} {symbol}",
        format_amount(p.amount, SUPER_TOKEN_DECIMALS)
    ))
}

pub(crate) fn upgrade_typed(action: String, p: &TokenAmountParams) -> SuperfluidUpgrade {
    SuperfluidUpgrade {
        action,
        token: p.token,
        amount: p.amount,
    }
}

pub(crate) fn downgrade_typed(action: String, p: &TokenAmountParams) -> SuperfluidDowngrade {
    SuperfluidDowngrade {
        action,
        token: p.token,
        amount: p.amount,
    }
}

pub(crate) fn approve_typed(action: String, p: &ApproveParams) -> SuperfluidApprove {
    SuperfluidApprove {
        action,
        token: p.token,
        spender: p.spender,
        amount: p.amount,
    }
}

pub(crate) fn transfer_typed(action: String, p: &TransferParams) -> SuperfluidTransfer {
    SuperfluidTransfer {
        action,
        token: p.token,
        receiver: p.receiver,
        amount: p.amount,
    }
}

pub(crate) fn upgrade_operation(p: &TokenAmountParams) -> Operation {
    Operation::new(OperationType::SuperTokenUpgrade, p.token, p.amount.abi_encode())
}

pub(crate) fn downgrade_operation(p: &TokenAmountParams) -> Operation {
    Operation::new(OperationType::SuperTokenDowngrade, p.token, p.amount.abi_encode())
}

pub(crate) fn approve_operation(p: &ApproveParams) -> Operation {
    let data = (p.spender, p.amount).abi_encode_params();
    Operation::new(OperationType::Erc20Approve, p.token, data)
}

/// Pulls from the caller, so the relayer can never redirect someone else's funds.
pub(crate) fn transfer_operation(caller: Address, p: &TransferParams) -> Operation {
    let data = (caller, p.receiver, p.amount).abi_encode_params();
    Operation::new(OperationType::Erc20TransferFrom, p.token, data)
}
