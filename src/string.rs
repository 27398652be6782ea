//! Hex string conversions for identifiers and keys, and the human readable summary of frames.
//!
//! Identifiers travel least significant byte first and are written the other way round, so that
//! `DevAddr::from_str("49be7df1")` gives the address carried on air as `f1 7d be 49`. Keys are
//! written in the order they are used.
use crate::keys::*;
use crate::parser::*;

pub use hex::FromHexError;

macro_rules! fixed_len_struct_impl_string_msb {
    (
        $type:ident,$size:expr;
    ) => {
        impl core::str::FromStr for $type {
            type Err = FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mut res = [0; $size];
                hex::decode_to_slice(s.as_bytes(), &mut res)?;
                Ok(Self::from(res))
            }
        }

        #[cfg(feature = "with-to-string")]
        impl core::fmt::Display for $type {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let mut res = [0u8; $size * 2];
                hex::encode_to_slice(self.as_ref(), &mut res).map_err(|_| core::fmt::Error)?;
                f.write_str(core::str::from_utf8(&res).map_err(|_| core::fmt::Error)?)
            }
        }
    };
}

macro_rules! fixed_len_struct_impl_string_lsb {
    (
        $type:ident[$size:expr];
    ) => {
        impl core::str::FromStr for $type<[u8; $size]> {
            type Err = FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mut res = [0; $size];
                hex::decode_to_slice(s.as_bytes(), &mut res)?;
                res.reverse();
                Ok(Self::from(res))
            }
        }

        #[cfg(feature = "with-to-string")]
        impl<T: AsRef<[u8]>> core::fmt::Display for $type<T> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                self.as_ref().iter().rev().try_for_each(|b| write!(f, "{:02x}", b))
            }
        }
    };
}

fixed_len_struct_impl_string_lsb! {
    EUI64[8];
}

fixed_len_struct_impl_string_lsb! {
    DevNonce[2];
}

fixed_len_struct_impl_string_lsb! {
    AppNonce[3];
}

fixed_len_struct_impl_string_lsb! {
    NetId[3];
}

fixed_len_struct_impl_string_lsb! {
    DevAddr[4];
}

fixed_len_struct_impl_string_msb! {
    AppKey, 16;
}

fixed_len_struct_impl_string_msb! {
    NwkSKey, 16;
}

fixed_len_struct_impl_string_msb! {
    AES128, 16;
}

#[cfg(feature = "with-to-string")]
impl core::fmt::Display for MType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            MType::JoinRequest => "JoinRequest",
            MType::JoinAccept => "JoinAccept",
            MType::UnconfirmedDataUp => "UnconfirmedDataUp",
            MType::UnconfirmedDataDown => "UnconfirmedDataDown",
            MType::ConfirmedDataUp => "ConfirmedDataUp",
            MType::ConfirmedDataDown => "ConfirmedDataDown",
            MType::RFU => "RFU",
            MType::Proprietary => "Proprietary",
        };
        f.write_str(name)
    }
}

/// Gives the message type followed by the identifiers of the frame, e.g.
/// `UnconfirmedDataUp (49be7df1)`. A JoinAccept gives its type only.
#[cfg(feature = "with-to-string")]
impl<T: AsRef<[u8]>, F> core::fmt::Display for PhyPayload<T, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PhyPayload::JoinRequest(jr) => {
                write!(f, "{} ({}, {})", self.mtype(), jr.app_eui(), jr.dev_eui())
            }
            PhyPayload::JoinAccept(_) => write!(f, "{}", self.mtype()),
            PhyPayload::UnconfirmedDataUp(d)
            | PhyPayload::UnconfirmedDataDown(d)
            | PhyPayload::ConfirmedDataUp(d)
            | PhyPayload::ConfirmedDataDown(d) => {
                write!(f, "{} ({})", self.mtype(), d.fhdr().dev_addr())
            }
        }
    }
}
