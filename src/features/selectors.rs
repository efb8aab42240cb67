//! Well-known 4-byte method selectors matched against raw call-data.
//!
//! Values are keccak256 prefixes of the canonical signatures; the feature
//! extractor only ever does prefix matching on the `0x…` hex form.

/// `transfer(address,uint256)` — ERC-20 transfer
pub const ERC20_TRANSFER: &str = "0xa9059cbb";

/// `transferFrom(address,address,uint256)` — ERC-20/721 delegated transfer,
/// treated as an NFT-style movement by the extractor
pub const TRANSFER_FROM: &str = "0x23b872dd";

/// `approve(address,uint256)` — token approval grant
pub const APPROVE: &str = "0x095ea7b3";

/// `mint(address,uint256)` — mint event (SBT/POAP issuance heuristic)
pub const MINT: &str = "0x40c10f19";

/// `safeTransferFrom(address,address,uint256,bytes)` — ERC-721 safe transfer
pub const SAFE_TRANSFER_FROM: &str = "0xb88d4fde";
