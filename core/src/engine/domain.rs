// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Domain-separator validation context.
//!
//! While the walker reports the domain-separator struct as the current root
//! type, completed fields are matched by name: `verifyingContract` is
//! captured for later display / signature scoping, `chainId` is compared
//! against the trusted chain id supplied at session start.

use zeroize::Zeroize;

use super::Error;

/// Address width expected for the `verifyingContract` field
pub const ADDRESS_LEN: usize = 20;

/// Domain-separator context for one signing session
#[derive(Clone, PartialEq, Debug)]
pub struct DomainContext {
    /// Trusted chain id, from caller configuration
    chain_id: u64,

    /// Captured verifying contract address
    verifying_contract: [u8; ADDRESS_LEN],
    has_contract: bool,
}

impl DomainContext {
    /// Create a new domain context with the provided trusted chain id
    pub const fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            verifying_contract: [0u8; ADDRESS_LEN],
            has_contract: false,
        }
    }

    /// Fetch the trusted chain id
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Fetch the captured verifying contract address, if seen
    pub fn verifying_contract(&self) -> Option<&[u8; ADDRESS_LEN]> {
        match self.has_contract {
            true => Some(&self.verifying_contract),
            false => None,
        }
    }

    /// Apply domain-separator side effects for a completed field
    ///
    /// `value` must be the complete raw field value (domain fields are
    /// static and always complete within their first chunk).
    pub fn check_field(&mut self, name: &str, value: &[u8]) -> Result<(), Error> {
        match name {
            "verifyingContract" => {
                if value.len() != ADDRESS_LEN {
                    #[cfg(feature = "log")]
                    log::error!("unexpected verifyingContract length: {}", value.len());

                    return Err(Error::InvalidData);
                }

                self.verifying_contract.copy_from_slice(value);
                self.has_contract = true;

                Ok(())
            }
            "chainId" => {
                let chain_id = u64_from_be(value)?;

                if chain_id != self.chain_id {
                    #[cfg(feature = "log")]
                    log::error!(
                        "domain chain id mismatch, expected {} got {}",
                        self.chain_id,
                        chain_id
                    );

                    return Err(Error::ConditionNotSatisfied);
                }

                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Clear captured domain state
    pub fn clear(&mut self) {
        self.chain_id = 0;
        self.verifying_contract.zeroize();
        self.has_contract = false;
    }
}

/// Parse a variable-length big-endian unsigned integer
fn u64_from_be(data: &[u8]) -> Result<u64, Error> {
    if data.len() > 8 {
        return Err(Error::InvalidData);
    }

    let mut v = 0u64;
    for b in data {
        v = (v << 8) | (*b as u64);
    }

    Ok(v)
}
