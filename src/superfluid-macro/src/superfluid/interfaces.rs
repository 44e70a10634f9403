//! Solidity ABI of the Superfluid contracts the macro reads from.

use stylus_sdk::alloy_sol_types::sol;

sol! {
    interface ISuperfluid {
        function getAgreementClass(bytes32 agreementType) external view returns (address agreementClass);
    }

    #[derive(Debug)]
    interface ISuperToken {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function getUnderlyingToken() external view returns (address);
        function toUnderlyingAmount(uint256 amount)
            external
            view
            returns (uint256 underlyingAmount, uint256 adjustedAmount);
    }
}
