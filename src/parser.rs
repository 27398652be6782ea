// Copyright (c) 2017,2018,2020 Ivaylo Petrov
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//
// author: Ivaylo Petrov <ivajloip@gmail.com>

//! Provides types and methods for parsing LoRaWAN frames and checking their MIC.
//!
//! # Examples
//!
//! ```
//! use lorawan_parser::keys::*;
//! use lorawan_parser::parser::*;
//!
//! let data = vec![0x40, 0xf1, 0x7d, 0xbe, 0x49, 0x00, 0x03, 0x00, 0x01, 0x2a, 0x35, 0x18, 0xaf];
//! let key = AES128([0x44, 0x02, 0x42, 0x41, 0xed, 0x4c, 0xe9, 0xa6, 0x8c, 0x6a, 0x8b, 0xc0,
//!     0x55, 0x23, 0x3f, 0xd3]);
//! match parse(data) {
//!     Ok(PhyPayload::UnconfirmedDataUp(data_payload)) => {
//!         assert!(data_payload.validate_mic(&key));
//!         assert_eq!(data_payload.fhdr().dev_addr().to_u32(), 0x49be7df1);
//!         assert_eq!(data_payload.f_port(), Some(1));
//!     }
//!     _ => panic!("failed to parse data payload"),
//! }
//! ```

use super::keys::{CryptoFactory, AES128, MIC};
use super::packet_length::phy::join::{
    JOIN_ACCEPT_PAYLOAD_LEN, JOIN_ACCEPT_PAYLOAD_WITH_CFLIST_LEN, JOIN_REQUEST_PAYLOAD_LEN,
};
use super::packet_length::phy::mac::fhdr::{FCTRL_END, FHDR_MIN_LEN};
use super::packet_length::phy::{DATA_PAYLOAD_MAX_LEN, MHDR_LEN, MIC_LEN, PHY_PAYLOAD_MIN_LEN};
use super::securityhelpers::{self, DataMicBlock};
use super::types::{CfList, DLSettings};

#[cfg(feature = "default-crypto")]
use super::default_crypto::DefaultFactory;

/// Reasons for which a byte slice is not accepted as a LoRaWAN frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error {
    /// The MHDR carries the message type RFU (6) or Proprietary (7).
    UnsupportedMessageType,
    /// The frame is shorter than its fixed layout or its FOptsLen demands.
    TruncatedFrame,
    /// A join frame is longer than any of its permitted layouts.
    InvalidLength,
    /// The bytes were handed to the constructor of another message type.
    IncorrectMessageType,
    /// MIC computation was requested from a payload with no MIC recipe.
    Unimplemented,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Error::UnsupportedMessageType => "unsupported message type",
            Error::TruncatedFrame => "insufficient number of bytes",
            Error::InvalidLength => "mac payload has incorrect size",
            Error::IncorrectMessageType => "bytes carry a different message type",
            Error::Unimplemented => "MIC is not implemented for this payload",
        };
        f.write_str(msg)
    }
}

macro_rules! fixed_len_struct {
    (
        $(#[$outer:meta])*
        struct $type:ident[$size:expr];
    ) => {
        $(#[$outer])*
        #[derive(Debug, Eq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
        pub struct $type<T: AsRef<[u8]>>(T);

        impl<T: AsRef<[u8]>> $type<T> {
            fn new_from_raw(bytes: T) -> $type<T> {
                $type(bytes)
            }

            /// Creates the value if exactly the right number of bytes is provided.
            pub fn new(data: T) -> Option<$type<T>> {
                if data.as_ref().len() != $size {
                    None
                } else {
                    Some($type(data))
                }
            }

            #[inline]
            pub fn to_owned(&self) -> $type<[u8; $size]> {
                let mut data = [0u8; $size];
                data.copy_from_slice(self.0.as_ref());
                $type(data)
            }
        }

        impl<T: AsRef<[u8]> + Clone> Clone for $type<T> {
            fn clone(&self) -> Self {
                Self(self.0.clone())
            }
        }

        impl<T: AsRef<[u8]> + Copy> Copy for $type<T> {}

        impl<T: AsRef<[u8]>, V: AsRef<[u8]>> PartialEq<$type<T>> for $type<V> {
            fn eq(&self, other: &$type<T>) -> bool {
                self.as_ref() == other.as_ref()
            }
        }

        impl<T: AsRef<[u8]>> core::hash::Hash for $type<T> {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                self.as_ref().hash(state);
            }
        }

        impl<'a> From<&'a [u8; $size]> for $type<&'a [u8; $size]> {
            fn from(v: &'a [u8; $size]) -> Self {
                $type(v)
            }
        }

        impl From<[u8; $size]> for $type<[u8; $size]> {
            fn from(v: [u8; $size]) -> Self {
                $type(v)
            }
        }

        impl<T: AsRef<[u8]>> AsRef<[u8]> for $type<T> {
            fn as_ref(&self) -> &[u8] {
                self.0.as_ref()
            }
        }
    };
}

// Identifiers are carried least significant byte first.
macro_rules! le_integer {
    ($type:ident[$size:expr] => $int:ty, $method:ident) => {
        impl<T: AsRef<[u8]>> $type<T> {
            /// Gives the little-endian integer value of the field.
            pub fn $method(&self) -> $int {
                let mut buf = [0u8; core::mem::size_of::<$int>()];
                buf[..$size].copy_from_slice(self.0.as_ref());
                <$int>::from_le_bytes(buf)
            }
        }

        impl From<$int> for $type<[u8; $size]> {
            fn from(v: $int) -> Self {
                let mut data = [0u8; $size];
                data.copy_from_slice(&v.to_le_bytes()[..$size]);
                $type(data)
            }
        }
    };
}

fixed_len_struct! {
    /// EUI64 represents a 64 bit EUI.
    struct EUI64[8];
}
le_integer!(EUI64[8] => u64, to_u64);

fixed_len_struct! {
    /// DevNonce represents a 16 bit device nonce.
    struct DevNonce[2];
}
le_integer!(DevNonce[2] => u16, to_u16);

fixed_len_struct! {
    /// AppNonce represents a 24 bit network server nonce.
    struct AppNonce[3];
}
le_integer!(AppNonce[3] => u32, to_u32);

fixed_len_struct! {
    /// NetId represents the 24 bit identifier of the network.
    struct NetId[3];
}
le_integer!(NetId[3] => u32, to_u32);

fixed_len_struct! {
    /// DevAddr represents a 32 bit device address.
    struct DevAddr[4];
}
le_integer!(DevAddr[4] => u32, to_u32);

impl<T: AsRef<[u8]>> DevAddr<T> {
    /// Gives the NwkID, the 7 most significant bits of the address.
    pub fn nwk_id(&self) -> u8 {
        (self.to_u32() >> 25) as u8
    }
}

/// Trait with the sole purpose to make clear distinction in some implementations between types
/// that just happen to have AsRef and those that are complete LoRaWAN frames.
///
/// Implementors guarantee that `as_bytes` holds at least MHDR and MIC.
pub trait AsPhyPayloadBytes {
    /// Gives the frame exactly as it is carried on air.
    fn as_bytes(&self) -> &[u8];

    /// Gives the bytes between MHDR and MIC.
    fn mac_payload(&self) -> &[u8] {
        let data = self.as_bytes();
        &data[MHDR_LEN..data.len() - MIC_LEN]
    }
}

/// Helper trait to add mic to all types that should have it.
pub trait MICAble {
    /// Gives the MIC of the PhyPayload.
    fn mic(&self) -> MIC;
}

impl<T: AsPhyPayloadBytes> MICAble for T {
    fn mic(&self) -> MIC {
        mic_of(self.as_bytes())
    }
}

/// Helper trait to add mhdr to all types that should have it.
pub trait MHDRAble {
    /// Gives the MHDR of the PhyPayload.
    fn mhdr(&self) -> MHDR;
}

impl<T: AsPhyPayloadBytes> MHDRAble for T {
    fn mhdr(&self) -> MHDR {
        MHDR(self.as_bytes()[0])
    }
}

fn mic_of(data: &[u8]) -> MIC {
    let len = data.len();
    MIC([data[len - 4], data[len - 3], data[len - 2], data[len - 1]])
}

/// Computation and verification of the MIC of a frame.
///
/// The key is the AppKey for join frames and the NwkSKey for data frames.
pub trait MICComputable: AsPhyPayloadBytes {
    /// Computes the MIC the frame should carry under `key`.
    ///
    /// Payloads without a MIC recipe keep this default and return `Error::Unimplemented`.
    fn calculate_mic(&self, key: &AES128) -> Result<MIC, Error> {
        let _ = key;
        Err(Error::Unimplemented)
    }

    /// Verifies that the frame carries the correct MIC. Never fails, gives `false` instead.
    fn validate_mic(&self, key: &AES128) -> bool {
        match self.calculate_mic(key) {
            Ok(mic) if mic == mic_of(self.as_bytes()) => true,
            Ok(_) => {
                debug!("MIC mismatch");
                false
            }
            Err(_) => false,
        }
    }
}

/// GenericPhyPayload is a frame split into MHDR, MACPayload and MIC with no further
/// interpretation of the MACPayload.
///
/// [parse](fn.parse.html) builds one before dispatching on the message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericPhyPayload<T>(T);

impl<T: AsRef<[u8]>> GenericPhyPayload<T> {
    /// Accepts any slice that is long enough to carry MHDR and MIC.
    pub fn new(data: T) -> Result<Self, Error> {
        if data.as_ref().len() < PHY_PAYLOAD_MIN_LEN {
            return Err(Error::TruncatedFrame);
        }
        Ok(Self(data))
    }

    /// Gives back the underlying buffer.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: AsRef<[u8]>> AsPhyPayloadBytes for GenericPhyPayload<T> {
    fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<T: AsRef<[u8]>> MICComputable for GenericPhyPayload<T> {}

/// PhyPayload is a type that represents a physical LoRaWAN payload.
///
/// There is one variant per supported message type; the four data variants share
/// [DataPayload](struct.DataPayload.html).
#[derive(Debug, PartialEq, Eq)]
pub enum PhyPayload<T, F> {
    JoinRequest(JoinRequestPayload<T, F>),
    JoinAccept(JoinAcceptPayload<T, F>),
    UnconfirmedDataUp(DataPayload<T, F>),
    UnconfirmedDataDown(DataPayload<T, F>),
    ConfirmedDataUp(DataPayload<T, F>),
    ConfirmedDataDown(DataPayload<T, F>),
}

impl<T: AsRef<[u8]>, F> PhyPayload<T, F> {
    /// Gives the message type of the frame.
    pub fn mtype(&self) -> MType {
        match self {
            PhyPayload::JoinRequest(_) => MType::JoinRequest,
            PhyPayload::JoinAccept(_) => MType::JoinAccept,
            PhyPayload::UnconfirmedDataUp(_) => MType::UnconfirmedDataUp,
            PhyPayload::UnconfirmedDataDown(_) => MType::UnconfirmedDataDown,
            PhyPayload::ConfirmedDataUp(_) => MType::ConfirmedDataUp,
            PhyPayload::ConfirmedDataDown(_) => MType::ConfirmedDataDown,
        }
    }

    /// Gives whether the frame is one of the four data messages.
    pub fn is_data_message(&self) -> bool {
        self.mtype().is_data()
    }

    /// Gives the data payload if the frame is a data message.
    pub fn as_data(&self) -> Option<&DataPayload<T, F>> {
        match self {
            PhyPayload::UnconfirmedDataUp(d)
            | PhyPayload::UnconfirmedDataDown(d)
            | PhyPayload::ConfirmedDataUp(d)
            | PhyPayload::ConfirmedDataDown(d) => Some(d),
            _ => None,
        }
    }

    /// Gives back the underlying buffer.
    pub fn into_inner(self) -> T {
        match self {
            PhyPayload::JoinRequest(jr) => jr.0,
            PhyPayload::JoinAccept(ja) => ja.0,
            PhyPayload::UnconfirmedDataUp(d)
            | PhyPayload::UnconfirmedDataDown(d)
            | PhyPayload::ConfirmedDataUp(d)
            | PhyPayload::ConfirmedDataDown(d) => d.0,
        }
    }
}

impl<T: AsRef<[u8]>, F> AsPhyPayloadBytes for PhyPayload<T, F> {
    fn as_bytes(&self) -> &[u8] {
        match self {
            PhyPayload::JoinRequest(jr) => jr.as_bytes(),
            PhyPayload::JoinAccept(ja) => ja.as_bytes(),
            PhyPayload::UnconfirmedDataUp(d)
            | PhyPayload::UnconfirmedDataDown(d)
            | PhyPayload::ConfirmedDataUp(d)
            | PhyPayload::ConfirmedDataDown(d) => d.as_bytes(),
        }
    }
}

impl<T: AsRef<[u8]>, F> AsRef<[u8]> for PhyPayload<T, F> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<T: AsRef<[u8]>, F: CryptoFactory> MICComputable for PhyPayload<T, F> {
    fn calculate_mic(&self, key: &AES128) -> Result<MIC, Error> {
        match self {
            PhyPayload::JoinRequest(jr) => jr.calculate_mic(key),
            PhyPayload::JoinAccept(ja) => ja.calculate_mic(key),
            PhyPayload::UnconfirmedDataUp(d)
            | PhyPayload::UnconfirmedDataDown(d)
            | PhyPayload::ConfirmedDataUp(d)
            | PhyPayload::ConfirmedDataDown(d) => d.calculate_mic(key),
        }
    }
}

// Shared admission check of the variant constructors, returns the MACPayload length.
fn check_frame(bytes: &[u8], accepted: impl Fn(MType) -> bool) -> Result<usize, Error> {
    if bytes.len() < PHY_PAYLOAD_MIN_LEN {
        return Err(Error::TruncatedFrame);
    }
    if !accepted(MHDR(bytes[0]).mtype()) {
        return Err(Error::IncorrectMessageType);
    }
    Ok(bytes.len() - PHY_PAYLOAD_MIN_LEN)
}

/// JoinRequestPayload represents a JoinRequest.
///
/// It can be built either directly through the [new](#method.new) or using the
/// [parse](fn.parse.html) function.
#[derive(Debug, PartialEq, Eq)]
pub struct JoinRequestPayload<T, F>(T, F);

impl<T: AsRef<[u8]>, F> AsPhyPayloadBytes for JoinRequestPayload<T, F> {
    fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<T: AsRef<[u8]>, F: CryptoFactory> JoinRequestPayload<T, F> {
    /// Creates a new JoinRequestPayload if the provided data is acceptable.
    ///
    /// # Argument
    ///
    /// * data - the bytes for the payload.
    /// * factory - the factory that shall be used to create object for crypto functions.
    pub fn new_with_factory(data: T, factory: F) -> Result<Self, Error> {
        let len = check_frame(data.as_ref(), |m| m == MType::JoinRequest)?;
        match len {
            JOIN_REQUEST_PAYLOAD_LEN => Ok(Self(data, factory)),
            l if l < JOIN_REQUEST_PAYLOAD_LEN => Err(Error::TruncatedFrame),
            _ => Err(Error::InvalidLength),
        }
    }
}

impl<T: AsRef<[u8]>, F> JoinRequestPayload<T, F> {
    /// Gives the APP EUI of the JoinRequest.
    pub fn app_eui(&self) -> EUI64<&[u8]> {
        EUI64::new_from_raw(&self.0.as_ref()[1..9])
    }

    /// Gives the DEV EUI of the JoinRequest.
    pub fn dev_eui(&self) -> EUI64<&[u8]> {
        EUI64::new_from_raw(&self.0.as_ref()[9..17])
    }

    /// Gives the DEV Nonce of the JoinRequest.
    pub fn dev_nonce(&self) -> DevNonce<&[u8]> {
        DevNonce::new_from_raw(&self.0.as_ref()[17..19])
    }

    /// Gives back the underlying buffer.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: AsRef<[u8]>, F: CryptoFactory> MICComputable for JoinRequestPayload<T, F> {
    /// MIC = CMAC(AppKey, MHDR | AppEUI | DevEUI | DevNonce)[0..4]
    fn calculate_mic(&self, key: &AES128) -> Result<MIC, Error> {
        let mhdr = [self.mhdr().raw_value()];
        Ok(securityhelpers::calculate_mic(
            &[&mhdr, self.app_eui().as_ref(), self.dev_eui().as_ref(), self.dev_nonce().as_ref()],
            self.1.new_mac(key),
        ))
    }
}

/// JoinAcceptPayload represents a JoinAccept as it is authenticated, that is in clear.
///
/// It can be built either directly through the [new](#method.new) or using the
/// [parse](fn.parse.html) function.
#[derive(Debug, PartialEq, Eq)]
pub struct JoinAcceptPayload<T, F>(T, F);

impl<T: AsRef<[u8]>, F> AsPhyPayloadBytes for JoinAcceptPayload<T, F> {
    fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<T: AsRef<[u8]>, F: CryptoFactory> JoinAcceptPayload<T, F> {
    /// Creates a new JoinAcceptPayload if the provided data is acceptable.
    ///
    /// # Argument
    ///
    /// * data - the bytes for the payload.
    /// * factory - the factory that shall be used to create object for crypto functions.
    pub fn new_with_factory(data: T, factory: F) -> Result<Self, Error> {
        let len = check_frame(data.as_ref(), |m| m == MType::JoinAccept)?;
        match len {
            JOIN_ACCEPT_PAYLOAD_LEN | JOIN_ACCEPT_PAYLOAD_WITH_CFLIST_LEN => Ok(Self(data, factory)),
            l if l < JOIN_ACCEPT_PAYLOAD_LEN => Err(Error::TruncatedFrame),
            _ => Err(Error::InvalidLength),
        }
    }
}

impl<T: AsRef<[u8]>, F> JoinAcceptPayload<T, F> {
    /// Gives the app nonce of the JoinAccept.
    pub fn app_nonce(&self) -> AppNonce<&[u8]> {
        AppNonce::new_from_raw(&self.0.as_ref()[1..4])
    }

    /// Gives the net ID of the JoinAccept.
    pub fn net_id(&self) -> NetId<&[u8]> {
        NetId::new_from_raw(&self.0.as_ref()[4..7])
    }

    /// Gives the dev address of the JoinAccept.
    pub fn dev_addr(&self) -> DevAddr<&[u8]> {
        DevAddr::new_from_raw(&self.0.as_ref()[7..11])
    }

    /// Gives the downlink configuration of the JoinAccept.
    pub fn dl_settings(&self) -> DLSettings {
        DLSettings::new(self.0.as_ref()[11])
    }

    /// Gives the RxDelay byte of the JoinAccept.
    pub fn rx_delay(&self) -> u8 {
        self.0.as_ref()[12]
    }

    /// Gives the raw CFList, empty when the JoinAccept carries none.
    pub fn c_f_list(&self) -> &[u8] {
        let d = self.0.as_ref();
        &d[13..d.len() - MIC_LEN]
    }

    /// Gives the decoded channel frequency list of the JoinAccept.
    pub fn cf_list(&self) -> Option<CfList<'_>> {
        CfList::new(self.c_f_list())
    }

    /// Gives back the underlying buffer.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: AsRef<[u8]>, F: CryptoFactory> MICComputable for JoinAcceptPayload<T, F> {
    /// MIC = CMAC(AppKey, MHDR | AppNonce | NetID | DevAddr | DLSettings | RxDelay | CFList)[0..4]
    fn calculate_mic(&self, key: &AES128) -> Result<MIC, Error> {
        let mhdr = [self.mhdr().raw_value()];
        let settings = [self.dl_settings().raw_value(), self.rx_delay()];
        Ok(securityhelpers::calculate_mic(
            &[
                &mhdr,
                self.app_nonce().as_ref(),
                self.net_id().as_ref(),
                self.dev_addr().as_ref(),
                &settings,
                self.c_f_list(),
            ],
            self.1.new_mac(key),
        ))
    }
}

fn fhdr_length(fctrl: u8) -> usize {
    FHDR_MIN_LEN + (fctrl & 0x0f) as usize
}

/// DataPayload represents a ConfirmedDataUp, ConfirmedDataDown, UnconfirmedDataUp or
/// UnconfirmedDataDown.
///
/// FRMPayload is kept as it is on air, it is never decrypted here.
#[derive(Debug, PartialEq, Eq)]
pub struct DataPayload<T, F>(T, F);

impl<T: AsRef<[u8]>, F> AsPhyPayloadBytes for DataPayload<T, F> {
    fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<T: AsRef<[u8]>, F: CryptoFactory> DataPayload<T, F> {
    /// Creates a new DataPayload if the provided data is acceptable.
    ///
    /// # Argument
    ///
    /// * data - the bytes for the payload.
    /// * factory - the factory that shall be used to create object for crypto functions.
    pub fn new_with_factory(data: T, factory: F) -> Result<Self, Error> {
        let bytes = data.as_ref();
        check_frame(bytes, |m| m.is_data())?;
        if bytes.len() > DATA_PAYLOAD_MAX_LEN {
            return Err(Error::InvalidLength);
        }
        let direction = MHDR(bytes[0]).mtype().direction().ok_or(Error::IncorrectMessageType)?;
        FHDR::new(&bytes[MHDR_LEN..bytes.len() - MIC_LEN], direction)?;
        Ok(Self(data, factory))
    }

    /// Computes the MIC using the session's 32-bit frame counter.
    ///
    /// The 16 least significant bits of `session_fcnt` are replaced by the FCnt carried in the
    /// frame, so passing the last counter seen for the device handles the 16-bit rollover.
    pub fn calculate_mic_with_fcnt(&self, key: &AES128, session_fcnt: u32) -> MIC {
        let fhdr = self.fhdr();
        let dev_addr = fhdr.dev_addr();
        let d = self.0.as_ref();
        let block = DataMicBlock {
            direction: self.direction(),
            dev_addr: dev_addr.as_ref(),
            fcnt: securityhelpers::compute_fcnt(session_fcnt, fhdr.fcnt()),
        };
        // MHDR | FHDR | FPort | FRMPayload is the frame without its MIC
        securityhelpers::calculate_data_mic(&d[..d.len() - MIC_LEN], &block, self.1.new_mac(key))
    }

    /// Verifies the MIC using the session's 32-bit frame counter.
    pub fn validate_mic_with_fcnt(&self, key: &AES128, session_fcnt: u32) -> bool {
        self.mic() == self.calculate_mic_with_fcnt(key, session_fcnt)
    }
}

impl<T: AsRef<[u8]>, F> DataPayload<T, F> {
    /// Gives the message type, always one of the four data message types.
    pub fn mtype(&self) -> MType {
        MHDR(self.0.as_ref()[0]).mtype()
    }

    /// Gives the direction the frame travels in.
    pub fn direction(&self) -> Direction {
        if self.0.as_ref()[0] & 0x20 == 0 {
            Direction::Uplink
        } else {
            Direction::Downlink
        }
    }

    /// Gives whether the payload is uplink or not.
    pub fn is_uplink(&self) -> bool {
        self.direction() == Direction::Uplink
    }

    /// Gives whether the frame is confirmed.
    pub fn is_confirmed(&self) -> bool {
        self.mtype().is_confirmed()
    }

    /// Gives the FHDR of the DataPayload.
    pub fn fhdr(&self) -> FHDR<'_> {
        let mac_payload = self.mac_payload();
        FHDR::new_from_raw(&mac_payload[..fhdr_length(mac_payload[4])], self.direction())
    }

    /// Gives the FPort of the DataPayload if there is one.
    pub fn f_port(&self) -> Option<u8> {
        let mac_payload = self.mac_payload();
        mac_payload.get(fhdr_length(mac_payload[4])).copied()
    }

    /// Gives the FRMPayload as carried on air, empty when there is none.
    pub fn frm_payload(&self) -> &[u8] {
        let mac_payload = self.mac_payload();
        let start = fhdr_length(mac_payload[4]) + 1;
        mac_payload.get(start..).unwrap_or(&[])
    }

    /// Gives back the underlying buffer.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: AsRef<[u8]>, F: CryptoFactory> MICComputable for DataPayload<T, F> {
    /// MIC = CMAC(NwkSKey, B0 | MHDR | FHDR | FPort | FRMPayload)[0..4] with the 16-bit FCnt
    /// zero-extended in B0.
    fn calculate_mic(&self, key: &AES128) -> Result<MIC, Error> {
        Ok(self.calculate_mic_with_fcnt(key, 0))
    }
}

/// Parses a payload as LoRaWAN physical payload.
///
/// # Argument
///
/// * bytes - the data from which the PhyPayload is to be built.
///
/// # Examples
///
/// ```
/// let data = vec![0x60, 0xf1, 0x7d, 0xbe, 0x49, 0x20, 0x02, 0x00, 0x01, 0xf9, 0xd6, 0x5d, 0x27];
/// if let Ok(lorawan_parser::parser::PhyPayload::UnconfirmedDataDown(phy)) =
///     lorawan_parser::parser::parse(data)
/// {
///     assert!(phy.fhdr().fctrl().ack());
/// } else {
///     panic!("failed to parse data payload");
/// }
/// ```
#[cfg(feature = "default-crypto")]
pub fn parse<T: AsRef<[u8]>>(data: T) -> Result<PhyPayload<T, DefaultFactory>, Error> {
    parse_with_factory(data, DefaultFactory)
}

/// Parses a payload as LoRaWAN physical payload.
///
/// Check out [parse](fn.parse.html) if you do not need custom crypto factory.
///
/// # Argument
///
/// * bytes - the data from which the PhyPayload is to be built.
/// * factory - the factory that shall be used to create object for crypto functions.
pub fn parse_with_factory<T, F>(data: T, factory: F) -> Result<PhyPayload<T, F>, Error>
where
    T: AsRef<[u8]>,
    F: CryptoFactory,
{
    let generic = GenericPhyPayload::new(data)?;
    let mhdr = generic.mhdr();
    trace!("parsing frame with mtype {=u8}", mhdr.raw_value() >> 5);
    let data = generic.into_inner();
    let res = match mhdr.mtype() {
        MType::JoinRequest => {
            JoinRequestPayload::new_with_factory(data, factory).map(PhyPayload::JoinRequest)
        }
        MType::JoinAccept => {
            JoinAcceptPayload::new_with_factory(data, factory).map(PhyPayload::JoinAccept)
        }
        MType::UnconfirmedDataUp => {
            DataPayload::new_with_factory(data, factory).map(PhyPayload::UnconfirmedDataUp)
        }
        MType::UnconfirmedDataDown => {
            DataPayload::new_with_factory(data, factory).map(PhyPayload::UnconfirmedDataDown)
        }
        MType::ConfirmedDataUp => {
            DataPayload::new_with_factory(data, factory).map(PhyPayload::ConfirmedDataUp)
        }
        MType::ConfirmedDataDown => {
            DataPayload::new_with_factory(data, factory).map(PhyPayload::ConfirmedDataDown)
        }
        MType::RFU | MType::Proprietary => Err(Error::UnsupportedMessageType),
    };
    if let Err(e) = res {
        debug!("rejected frame: {}", e);
    }
    res
}

/// MHDR represents LoRaWAN MHDR.
///
/// Only the message type is interpreted, the remaining bits are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct MHDR(u8);

impl MHDR {
    pub fn new(byte: u8) -> MHDR {
        MHDR(byte)
    }

    /// Gives the type of message that PhyPayload is carrying.
    pub fn mtype(&self) -> MType {
        match (self.0 >> 5) & 0x07 {
            0 => MType::JoinRequest,
            1 => MType::JoinAccept,
            2 => MType::UnconfirmedDataUp,
            3 => MType::UnconfirmedDataDown,
            4 => MType::ConfirmedDataUp,
            5 => MType::ConfirmedDataDown,
            6 => MType::RFU,
            _ => MType::Proprietary,
        }
    }

    /// Gives the binary representation of the MHDR.
    pub fn raw_value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for MHDR {
    fn from(v: u8) -> Self {
        MHDR(v)
    }
}

/// MType gives the possible message types of the PhyPayload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum MType {
    JoinRequest,
    JoinAccept,
    UnconfirmedDataUp,
    UnconfirmedDataDown,
    ConfirmedDataUp,
    ConfirmedDataDown,
    RFU,
    Proprietary,
}

impl MType {
    /// Gives whether the type is one of the four data messages.
    pub fn is_data(&self) -> bool {
        self.direction().is_some()
    }

    /// Gives whether the receiver has to acknowledge the frame.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, MType::ConfirmedDataUp | MType::ConfirmedDataDown)
    }

    /// Gives the direction implied by a data message type, `None` for other types.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            MType::UnconfirmedDataUp | MType::ConfirmedDataUp => Some(Direction::Uplink),
            MType::UnconfirmedDataDown | MType::ConfirmedDataDown => Some(Direction::Downlink),
            _ => None,
        }
    }
}

/// Direction a data frame travels in, as encoded in the B0 block of the MIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    Uplink = 0,
    Downlink = 1,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FCtrlBit {
    AdrAckReq,
    FPending,
    Rfu,
}

// Meaning of FCtrl bits 6 and 4, indexed by direction.
const FCTRL_LAYOUT: [(FCtrlBit, FCtrlBit); 2] = [
    (FCtrlBit::AdrAckReq, FCtrlBit::Rfu),
    (FCtrlBit::Rfu, FCtrlBit::FPending),
];

/// FCtrl represents the FCtrl from FHDR.
///
/// Two FCtrl are equal when their bytes are equal.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct FCtrl(u8, Direction);

impl FCtrl {
    pub fn new(byte: u8, direction: Direction) -> FCtrl {
        FCtrl(byte, direction)
    }

    /// Gives the direction used to interpret bits 6 and 4.
    pub fn direction(&self) -> Direction {
        self.1
    }

    fn mask_of(&self, bit: FCtrlBit) -> u8 {
        let (bit6, bit4) = FCTRL_LAYOUT[self.1 as usize];
        if bit6 == bit {
            1 << 6
        } else if bit4 == bit {
            1 << 4
        } else {
            0
        }
    }

    /// Gives whether ADR is enabled or not.
    pub fn adr(&self) -> bool {
        self.0 & (1 << 7) != 0
    }

    /// Gives whether ADR ACK is requested, always false downlink.
    pub fn adr_ack_req(&self) -> bool {
        self.0 & self.mask_of(FCtrlBit::AdrAckReq) != 0
    }

    /// Gives whether ack bit is set.
    pub fn ack(&self) -> bool {
        self.0 & (1 << 5) != 0
    }

    /// Gives whether there are more payloads pending, always false uplink.
    pub fn f_pending(&self) -> bool {
        self.0 & self.mask_of(FCtrlBit::FPending) != 0
    }

    /// Gives the reserved bit, bit 4 uplink and bit 6 downlink.
    pub fn rfu(&self) -> bool {
        self.0 & self.mask_of(FCtrlBit::Rfu) != 0
    }

    /// Gives the size of FOpts.
    pub fn f_opts_len(&self) -> u8 {
        self.0 & 0x0f
    }

    /// Gives the binary representation of the FCtrl.
    pub fn raw_value(&self) -> u8 {
        self.0
    }

    fn set(&mut self, mask: u8, value: bool) {
        if value {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }

    pub fn set_adr(&mut self, value: bool) -> &mut Self {
        self.set(1 << 7, value);
        self
    }

    pub fn set_ack(&mut self, value: bool) -> &mut Self {
        self.set(1 << 5, value);
        self
    }

    /// Sets ADRACKReq, ignored for downlink frames.
    pub fn set_adr_ack_req(&mut self, value: bool) -> &mut Self {
        self.set(self.mask_of(FCtrlBit::AdrAckReq), value);
        self
    }

    /// Sets FPending, ignored for uplink frames.
    pub fn set_f_pending(&mut self, value: bool) -> &mut Self {
        self.set(self.mask_of(FCtrlBit::FPending), value);
        self
    }

    pub(crate) fn set_f_opts_len(&mut self, len: u8) {
        self.0 = (self.0 & 0xf0) | (len & 0x0f);
    }
}

impl PartialEq for FCtrl {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for FCtrl {}

impl PartialEq<u8> for FCtrl {
    fn eq(&self, other: &u8) -> bool {
        self.0 == *other
    }
}

/// FHDR represents FHDR from DataPayload.
///
/// It is a view over the encoded header, so [data](#method.data) is its exact encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct FHDR<'a>(&'a [u8], Direction);

impl<'a> FHDR<'a> {
    fn new_from_raw(bytes: &'a [u8], direction: Direction) -> FHDR<'a> {
        FHDR(bytes, direction)
    }

    /// Decodes the FHDR at the start of `bytes`, the rest of the slice is ignored.
    pub fn new(bytes: &'a [u8], direction: Direction) -> Result<FHDR<'a>, Error> {
        if bytes.len() < FCTRL_END {
            return Err(Error::TruncatedFrame);
        }
        let len = fhdr_length(bytes[4]);
        if bytes.len() < len {
            return Err(Error::TruncatedFrame);
        }
        Ok(FHDR(&bytes[..len], direction))
    }

    /// Gives the device address associated with the given payload.
    pub fn dev_addr(&self) -> DevAddr<&'a [u8]> {
        DevAddr::new_from_raw(&self.0[0..4])
    }

    /// Gives the FCtrl associated with the given payload.
    pub fn fctrl(&self) -> FCtrl {
        FCtrl(self.0[4], self.1)
    }

    /// Gives the truncated FCnt associated with the given payload.
    pub fn fcnt(&self) -> u16 {
        u16::from_le_bytes([self.0[5], self.0[6]])
    }

    /// Gives the raw piggy-backed MAC commands.
    pub fn fopts(&self) -> &'a [u8] {
        &self.0[FHDR_MIN_LEN..]
    }

    /// Gives the length of the FHDR, 7 + FOptsLen.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Gives the encoded FHDR.
    pub fn data(&self) -> &'a [u8] {
        self.0
    }
}
