// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Application Information APDUs

use encdec::{Decode, DecodeOwned, Encode};

use super::{ApduError, ApduStatic, Instruction, EIP712_APDU_CLA};

/// Fetch application info APDU
#[derive(Copy, Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct AppInfoReq;

impl ApduStatic for AppInfoReq {
    const CLA: u8 = EIP712_APDU_CLA;

    /// Application Info GET APDU is instruction `0x00`
    const INS: u8 = Instruction::GetAppInfo as u8;
}

bitflags::bitflags! {
    /// Application info flags
    pub struct AppFlags: u16 {
        /// Indicates app is unlocked for signing requests
        const UNLOCKED = 1 << 0;

        /// Indicates app supports typed-data signing
        const HAS_TYPED_DATA = 1 << 8;
    }
}

/// Application information response APDU
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   PROTO_VER   |    NAME_LEN   |  VERSION_LEN  |     FLAGS     >
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// >     FLAGS     |                    NAME...                    /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                           VERSION...                          /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AppInfoResp<'a> {
    /// Protocol version (must be 1)
    pub proto: u8,

    /// Application name
    pub name: &'a str,

    /// Application version
    pub version: &'a str,

    /// Application flags
    pub flags: AppFlags,
}

impl<'a> AppInfoResp<'a> {
    /// Create a new application version APDU
    pub fn new(proto: u8, name: &'a str, version: &'a str, flags: AppFlags) -> Self {
        Self {
            proto,
            name,
            version,
            flags,
        }
    }
}

impl<'a> Encode for AppInfoResp<'a> {
    type Error = ApduError;

    /// Encode an app version APDU into the provided buffer
    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let name = self.name.as_bytes();
        let version = self.version.as_bytes();

        // Check lengths fit their single-byte header fields and the buffer
        if name.len() > u8::MAX as usize || version.len() > u8::MAX as usize {
            return Err(ApduError::InvalidLength);
        }
        if buff.len() < 5 + name.len() + version.len() {
            return Err(ApduError::InvalidLength);
        }

        let mut index = 0;

        // Write header
        buff[0] = self.proto;
        buff[1] = name.len() as u8;
        buff[2] = version.len() as u8;
        index += 3;

        // Write flags
        buff[index..][..2].copy_from_slice(&self.flags.bits().to_le_bytes());
        index += 2;

        // Write name
        buff[index..][..name.len()].copy_from_slice(name);
        index += name.len();

        // Write version
        buff[index..][..version.len()].copy_from_slice(version);
        index += version.len();

        Ok(index)
    }

    /// Compute APDU encoded length
    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(5 + self.name.len() + self.version.len())
    }
}

impl<'a> Decode<'a> for AppInfoResp<'a> {
    type Output = Self;
    type Error = ApduError;

    /// Decode an app version APDU from the provided buffer
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        // Check header length
        if buff.len() < 5 {
            return Err(ApduError::InvalidLength);
        }

        let mut index = 0;

        // Fetch headers
        let proto = buff[0];
        let name_len = buff[1] as usize;
        let version_len = buff[2] as usize;
        index += 3;

        // Fetch flags
        let bits = u16::from_le_bytes([buff[index], buff[index + 1]]);
        let flags = AppFlags::from_bits_truncate(bits);
        index += 2;

        // Check full buffer length
        if buff.len() < 5 + name_len + version_len {
            return Err(ApduError::InvalidLength);
        }

        // Fetch name string
        let name = core::str::from_utf8(&buff[index..][..name_len])
            .map_err(|_| ApduError::InvalidUtf8)?;
        index += name_len;

        // Fetch version string
        let version = core::str::from_utf8(&buff[index..][..version_len])
            .map_err(|_| ApduError::InvalidUtf8)?;
        index += version_len;

        Ok((
            Self {
                proto,
                name,
                version,
                flags,
            },
            index,
        ))
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::test::encode_decode_apdu;

    #[test]
    fn app_info_req_apdu() {
        let apdu = AppInfoReq::default();

        let mut buff = [0u8; 128];
        encode_decode_apdu(&mut buff, &apdu);
    }

    #[test]
    fn app_info_resp_apdu() {
        let name = "TEST NAME";
        let version = "TEST VERSION";

        let apdu = AppInfoResp::new(
            1,
            name,
            version,
            AppFlags::UNLOCKED | AppFlags::HAS_TYPED_DATA,
        );

        let mut buff = [0u8; 128];
        encode_decode_apdu(&mut buff, &apdu);
    }
}
