//! Solidity interfaces of the Safe functions the analyzer recognizes.

use alloy_sol_types::sol;

sol! {
    /// Owner, threshold, module and guard management of the Safe singleton.
    interface ISafe {
        function addOwnerWithThreshold(address owner, uint256 _threshold) external;
        function removeOwner(address prevOwner, address owner, uint256 _threshold) external;
        function swapOwner(address prevOwner, address oldOwner, address newOwner) external;
        function changeThreshold(uint256 _threshold) external;

        function enableModule(address module) external;
        function disableModule(address prevModule, address module) external;
        function setGuard(address guard) external;
        /// Introduced in Safe 1.5.0.
        function setModuleGuard(address moduleGuard) external;
    }

    /// Safe batching library; `transactions` is the packed encoding decoded by
    /// [`crate::decode_packed`].
    interface IMultiSend {
        function multiSend(bytes memory transactions) external payable;
    }
}
