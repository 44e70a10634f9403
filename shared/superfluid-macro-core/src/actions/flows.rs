//! Constant-flow actions: create, update and delete a stream.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{sol, SolCall, SolValue};

use crate::{
    errors::Result,
    format::format_flow_rate_per_day,
    host::HostContext,
    operations::{Operation, OperationType},
};

sol! {
    /// `(address token, address receiver, int96 flowRate)`, shared by create and update.
    #[derive(Debug, PartialEq, Eq)]
    struct FlowParams {
        address token;
        address receiver;
        int96 flowRate;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct DeleteFlowParams {
        address token;
        address sender;
        address receiver;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct SuperfluidCreateFlow {
        string action;
        address token;
        address receiver;
        int96 flowRate;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct SuperfluidUpdateFlow {
        string action;
        address token;
        address receiver;
        int96 flowRate;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct SuperfluidDeleteFlow {
        string action;
        address token;
        address sender;
        address receiver;
    }

    /// Agreement entrypoints invoked through the host's `callAgreement`.
    interface IConstantFlowAgreementV1 {
        function createFlow(address token, address receiver, int96 flowRate, bytes ctx) external returns (bytes newCtx);
        function updateFlow(address token, address receiver, int96 flowRate, bytes ctx) external returns (bytes newCtx);
        function deleteFlow(address token, address sender, address receiver, bytes ctx) external returns (bytes newCtx);
    }
}

pub(crate) fn create_message<H: HostContext + ?Sized>(host: &H, p: &FlowParams) -> Result<String> {
    let symbol = host.symbol(p.token)?;
    Ok(format!(
        "Create a flow of {} {symbol}/day",
        format_flow_rate_per_day(p.flowRate)
    ))
}

pub(crate) fn update_message<H: HostContext + ?Sized>(host: &H, p: &FlowParams) -> Result<String> {
    let symbol = host.symbol(p.token)?;
    Ok(format!(
        "Update the flow to {} {symbol}/day",
        format_flow_rate_per_day(p.flowRate)
    ))
}

pub(crate) fn delete_message<H: HostContext + ?Sized>(
    host: &H,
    p: &DeleteFlowParams,
) -> Result<String> {
    let symbol = host.symbol(p.token)?;
    Ok(format!("Delete the flow of {symbol}"))
}

pub(crate) fn create_typed(action: String, p: &FlowParams) -> SuperfluidCreateFlow {
    SuperfluidCreateFlow {
        action,
        token: p.token,
        receiver: p.receiver,
        flowRate: p.flowRate,
    }
}

pub(crate) fn update_typed(action: String, p: &FlowParams) -> SuperfluidUpdateFlow {
    SuperfluidUpdateFlow {
        action,
        token: p.token,
        receiver: p.receiver,
        flowRate: p.flowRate,
    }
}

pub(crate) fn delete_typed(action: String, p: &DeleteFlowParams) -> SuperfluidDeleteFlow {
    SuperfluidDeleteFlow {
        action,
        token: p.token,
        sender: p.sender,
        receiver: p.receiver,
    }
}

pub(crate) fn create_operation(cfa: Address, p: &FlowParams) -> Operation {
    let call = IConstantFlowAgreementV1::createFlowCall {
        token: p.token,
        receiver: p.receiver,
        flowRate: p.flowRate,
        ctx: Bytes::new(),
    };
    call_agreement(cfa, call.abi_encode())
}

pub(crate) fn update_operation(cfa: Address, p: &FlowParams) -> Operation {
    let call = IConstantFlowAgreementV1::updateFlowCall {
        token: p.token,
        receiver: p.receiver,
        flowRate: p.flowRate,
        ctx: Bytes::new(),
    };
    call_agreement(cfa, call.abi_encode())
}

pub(crate) fn delete_operation(cfa: Address, p: &DeleteFlowParams) -> Operation {
    let call = IConstantFlowAgreementV1::deleteFlowCall {
        token: p.token,
        sender: p.sender,
        receiver: p.receiver,
        ctx: Bytes::new(),
    };
    call_agreement(cfa, call.abi_encode())
}

/// `callAgreement` operation data is `abi.encode(bytes callData, bytes userData)`.
fn call_agreement(cfa: Address, call_data: Vec<u8>) -> Operation {
    let data = (Bytes::from(call_data), Bytes::new()).abi_encode_params();
    Operation::new(OperationType::CallAgreement, cfa, data)
}
