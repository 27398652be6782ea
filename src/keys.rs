// Copyright (c) 2017-2020 Ivaylo Petrov
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//
// author: Ivaylo Petrov <ivajloip@gmail.com>

//! Key material and the CMAC abstraction the MIC computation is built on.

macro_rules! lorawan_key {
    (
        $(#[$outer:meta])*
        pub struct $type:ident(AES128);
    ) => {
        $(#[$outer])*
        #[doc = concat!(
            "# Usage\n\n",
            "## Creating from a hex-encoded MSB string:\n",
            "```\n",
            "use lorawan_parser::keys::", stringify!($type), ";\n",
            "use core::str::FromStr;\n",
            "let key = ", stringify!($type), "::from_str(\"00112233445566778899aabbccddeeff\").unwrap();\n",
            "```\n"
        )]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
        pub struct $type(pub(crate) AES128);

        impl $type {
            pub const fn byte_len() -> usize {
                16
            }

            /// Gives the raw AES128 key, as expected by the MIC functions.
            pub fn inner(&self) -> &AES128 {
                &self.0
            }
        }

        impl From<[u8; 16]> for $type {
            fn from(key: [u8; 16]) -> Self {
                $type(AES128(key))
            }
        }

        impl AsRef<[u8]> for $type {
            fn as_ref(&self) -> &[u8] {
                &self.0 .0
            }
        }
    };
}

lorawan_key!(
    /// The [`AppKey`] is the AES-128 root key of an end-device.
    ///
    /// It authenticates JoinRequest and JoinAccept frames.
    pub struct AppKey(AES128);
);

lorawan_key!(
    /// The [`NwkSKey`] is the network session key (AES-128) of an end-device.
    ///
    /// It authenticates data frames.
    pub struct NwkSKey(AES128);
);

/// [`AES128`] represents 128-bit AES key.
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct AES128(pub [u8; 16]);

impl From<[u8; 16]> for AES128 {
    fn from(v: [u8; 16]) -> Self {
        AES128(v)
    }
}

impl AsRef<[u8]> for AES128 {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

/// [`MIC`] represents LoRaWAN message integrity code (MIC).
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct MIC(pub [u8; 4]);

impl From<[u8; 4]> for MIC {
    fn from(v: [u8; 4]) -> Self {
        MIC(v)
    }
}

impl AsRef<[u8]> for MIC {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

/// Trait for implementations of CMAC (RFC4493).
pub trait Mac {
    fn input(&mut self, data: &[u8]);
    fn reset(&mut self);
    fn result(self) -> [u8; 16];
}

/// Represents an abstraction over the crypto functions.
///
/// This trait provides a way to pick a different implementation of the CMAC primitive, for
/// example a hardware accelerated one.
pub trait CryptoFactory {
    type M: Mac;

    /// Method that creates a MAC calculator.
    fn new_mac(&self, key: &AES128) -> Self::M;
}

impl<F: CryptoFactory> CryptoFactory for &F {
    type M = F::M;

    fn new_mac(&self, key: &AES128) -> Self::M {
        (*self).new_mac(key)
    }
}
