//! Constants of the Safe contracts.
//!
//! Type hashes are the precomputed values baked into the Safe singletons; they are kept literal
//! so that a typo in a type string cannot silently change the hash being displayed.

use alloy_primitives::{address, b256, Address, B256};

use crate::SafeVersion;

/// `keccak256("EIP712Domain(uint256 chainId,address verifyingContract)")`, used since Safe 1.3.0.
pub const DOMAIN_SEPARATOR_TYPEHASH: B256 =
    b256!("47e79534a245952e8b16893a336b85a3d9ea9fa8c573f3d803afb92a79469218");

/// `keccak256("EIP712Domain(address verifyingContract)")`, used up to and including Safe 1.2.0.
pub const DOMAIN_SEPARATOR_TYPEHASH_OLD: B256 =
    b256!("035aff83d86937d35b32e04f0ddc6ff469290eef2f1b692d8a815c89404d4749");

/// `keccak256("SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,
/// uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)")`.
pub const SAFE_TX_TYPEHASH: B256 =
    b256!("bb8310d486368db6bd6f849402fdd73ad53d316b5a4b2644ad6efe0f941286d8");

/// Type hash of the pre-1.0.0 `SafeTx` struct, which named `baseGas` as `dataGas`.
pub const SAFE_TX_TYPEHASH_OLD: B256 =
    b256!("14d461bc7412367e924637b363c7bf29b8f47e2f84869f4426e5633d8af47b20");

/// The EIP-191 prefix of an EIP-712 signing payload.
pub const EIP712_PREFIX: [u8; 2] = [0x19, 0x01];

/// The oldest Safe version whose hashing scheme is known.
pub const MIN_SUPPORTED_VERSION: SafeVersion = SafeVersion::new(0, 1, 0);

/// Versions up to and including this one use the chain-agnostic domain separator.
pub const LAST_LEGACY_DOMAIN_VERSION: SafeVersion = SafeVersion::new(1, 2, 0);

/// Versions below this one use [`SAFE_TX_TYPEHASH_OLD`].
pub const FIRST_BASE_GAS_VERSION: SafeVersion = SafeVersion::new(1, 0, 0);

/// Maximum nesting of `MultiSend` batches that is unwound before analysis gives up and fails
/// closed.
pub const MAX_BATCH_DEPTH: usize = 16;

/// Contracts that are audited to be safe targets of a `DELEGATECALL` from a Safe.
pub const TRUSTED_DELEGATE_CALL_TARGETS: &[Address] = &[
    // MultiSend v1.1.1
    address!("0x8D29bE29923b68abfDD21e541b9374737B49cdAD"),
    // MultiSend v1.3.0 (canonical and EIP-155 deployments)
    address!("0xA238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761"),
    address!("0x998739BFdAAdde7C933B942a68053933098f9EDa"),
    // MultiSendCallOnly v1.3.0 (canonical and EIP-155 deployments)
    address!("0x40A2aCCbd92BCA938b02010E17A5b8929b49130D"),
    address!("0xA1dabEF33b3B82c7814B6D82A79e50F4AC44102B"),
    // MultiSend v1.4.1
    address!("0x38869bf66a61cF6bDB996A6aE40D5853Fd43B526"),
    // MultiSendCallOnly v1.4.1
    address!("0x9641d764fc13c8B624c04430C7356C1C7C8102e2"),
    // SignMessageLib v1.3.0 (canonical and EIP-155 deployments)
    address!("0xA65387F16B013cf2Af4605Ad8aA5ec25a2cbA3a2"),
    address!("0x98FFBBF51bb33A056B08ddf711f289936AafF717"),
    // SignMessageLib v1.4.1
    address!("0xd53cd0aB83D845Ac265BE939c57F53AD838012c9"),
    // SafeMigration v1.4.1
    address!("0x526643F69b81B008F46d95CD5ced5eC0edFFDaC6"),
    // SafeToL2Migration v1.4.1
    address!("0xfF83F6335d8930cBad1c0D439A841f01888D9f69"),
];

/// Modules and guards deployed by the Safe team. Enabling one of these still warrants a warning,
/// but the warning says which audited contract it is.
pub const TRUSTED_MODULES_AND_GUARDS: &[Address] = &[
    // AllowanceModule
    address!("0xCFbFaC74C26F8647cBDb8c5caf80BB5b32E43134"),
    // Safe4337Module v0.2.0
    address!("0xa581c4A4DB7175302464fF3C06380BC3270b4037"),
    // Safe4337Module v0.3.0
    address!("0x75cf11467937ce3F2f357CE24ffc3DBF8fD5c226"),
];

/// Returns `true` if `target` is a known-good `DELEGATECALL` target.
pub fn is_trusted_delegate_call_target(target: Address) -> bool {
    TRUSTED_DELEGATE_CALL_TARGETS.contains(&target)
}

/// Returns `true` if `target` is one of the audited modules or guards.
pub fn is_trusted_module_or_guard(target: Address) -> bool {
    TRUSTED_MODULES_AND_GUARDS.contains(&target)
}
