//! Provides a default software implementation for LoRaWAN's MIC computation.
use super::keys::*;
use super::parser::{DataPayload, Error, JoinAcceptPayload, JoinRequestPayload};
use aes::Aes128;
use cmac::digest::KeyInit;
use cmac::Cmac as RustCmac;
use generic_array::GenericArray;

pub type Cmac = RustCmac<Aes128>;

/// Provides a default implementation for build object for using the crypto functions.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultFactory;

impl CryptoFactory for DefaultFactory {
    type M = Cmac;

    fn new_mac(&self, key: &AES128) -> Self::M {
        let key = GenericArray::from_slice(&key.0[..]);
        <Cmac as KeyInit>::new(key)
    }
}

impl Mac for Cmac {
    fn input(&mut self, data: &[u8]) {
        cmac::Mac::update(self, data);
    }

    fn reset(&mut self) {
        cmac::Mac::reset(self);
    }

    fn result(self) -> [u8; 16] {
        cmac::Mac::finalize(self).into_bytes().into()
    }
}

impl<T: AsRef<[u8]>> JoinRequestPayload<T, DefaultFactory> {
    /// Creates a new JoinRequestPayload if the provided data is acceptable.
    ///
    /// # Argument
    ///
    /// * data - the bytes for the payload.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = vec![0x00, 0x04, 0x03, 0x02, 0x01, 0x04, 0x03, 0x02, 0x01, 0x05, 0x04, 0x03,
    ///     0x02, 0x05, 0x04, 0x03, 0x02, 0x2d, 0x10, 0x6a, 0x99, 0x0e, 0x12];
    /// let phy = lorawan_parser::parser::JoinRequestPayload::new(data);
    /// assert!(phy.is_ok());
    /// ```
    pub fn new(data: T) -> Result<Self, Error> {
        Self::new_with_factory(data, DefaultFactory)
    }
}

impl<T: AsRef<[u8]>> JoinAcceptPayload<T, DefaultFactory> {
    /// Creates a new JoinAcceptPayload if the provided data is acceptable.
    ///
    /// The bytes are taken as they are authenticated, that is after decryption.
    pub fn new(data: T) -> Result<Self, Error> {
        Self::new_with_factory(data, DefaultFactory)
    }
}

impl<T: AsRef<[u8]>> DataPayload<T, DefaultFactory> {
    /// Creates a DataPayload from the bytes of a frame of any of the four data message types.
    pub fn new(data: T) -> Result<Self, Error> {
        Self::new_with_factory(data, DefaultFactory)
    }
}
