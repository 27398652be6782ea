//! Provides types and methods for creating LoRaWAN payloads.
//!
//! See [DataPayloadCreator.new](struct.DataPayloadCreator.html#method.new) for an example.
use super::keys::{AppKey, CryptoFactory, NwkSKey};
use super::parser::{self, Direction, FCtrl};
use super::securityhelpers::{self, DataMicBlock};
use crate::packet_length::phy::join::JOIN_REQUEST_LEN;
use crate::packet_length::phy::mac::fhdr::FOPTS_MAX_LEN;
use crate::packet_length::phy::{DATA_PAYLOAD_MAX_LEN, DATA_PAYLOAD_MIN_LEN, MIC_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error {
    BufferTooShort,
    FOptsTooLong,
    FRMPayloadWithoutFPort,
    FrameTooLong,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Error::BufferTooShort => "buffer too short for the frame",
            Error::FOptsTooLong => "FOpts longer than 15 bytes",
            Error::FRMPayloadWithoutFPort => "FRMPayload given without FPort",
            Error::FrameTooLong => "frame longer than 259 bytes",
        };
        f.write_str(msg)
    }
}

fn set_mic<M: crate::keys::Mac>(data: &mut [u8], mac: M) {
    let len = data.len();
    let mic = securityhelpers::calculate_mic(&[&data[..len - MIC_LEN]], mac);

    data[len - MIC_LEN..].copy_from_slice(&mic.0[..]);
}

/// JoinRequestCreator serves for creating binary representation of Physical
/// Payload of JoinRequest.
/// # Examples
///
/// ```
/// let mut buf = [0u8; 100];
/// let mut phy = lorawan_parser::creator::JoinRequestCreator::new(&mut buf).unwrap();
/// let key = lorawan_parser::keys::AppKey::from([7; 16]);
/// phy.set_app_eui(&[1; 8]);
/// phy.set_dev_eui(&[2; 8]);
/// phy.set_dev_nonce(&[3; 2]);
/// let payload = phy.build(&key, &lorawan_parser::default_crypto::DefaultFactory);
/// assert_eq!(payload.len(), 23);
/// ```
///
/// A creator always comes from [new](#method.new), which checks the buffer length:
///
/// ```compile_fail
/// let phy: lorawan_parser::creator::JoinRequestCreator<Vec<u8>> = Default::default();
/// ```
pub struct JoinRequestCreator<D> {
    data: D,
}

impl<D: AsMut<[u8]>> JoinRequestCreator<D> {
    /// Creates a well initialized JoinRequestCreator writing into `data`.
    pub fn new(mut data: D) -> Result<Self, Error> {
        let d = data.as_mut();
        if d.len() < JOIN_REQUEST_LEN {
            return Err(Error::BufferTooShort);
        }
        d[0] = 0x00;
        Ok(Self { data })
    }

    /// Sets the application EUI of the JoinRequest to the provided value.
    ///
    /// # Argument
    ///
    /// * app_eui - instance of lorawan_parser::parser::EUI64 or anything that can be converted
    ///   into it.
    pub fn set_app_eui<H: AsRef<[u8]>, T: Into<parser::EUI64<H>>>(
        &mut self,
        app_eui: T,
    ) -> &mut Self {
        let converted = app_eui.into();
        self.data.as_mut()[1..9].copy_from_slice(converted.as_ref());

        self
    }

    /// Sets the device EUI of the JoinRequest to the provided value.
    ///
    /// # Argument
    ///
    /// * dev_eui - instance of lorawan_parser::parser::EUI64 or anything that can be converted
    ///   into it.
    pub fn set_dev_eui<H: AsRef<[u8]>, T: Into<parser::EUI64<H>>>(
        &mut self,
        dev_eui: T,
    ) -> &mut Self {
        let converted = dev_eui.into();
        self.data.as_mut()[9..17].copy_from_slice(converted.as_ref());

        self
    }

    /// Sets the device nonce of the JoinRequest to the provided value.
    ///
    /// # Argument
    ///
    /// * dev_nonce - instance of lorawan_parser::parser::DevNonce or anything that can be
    ///   converted into it.
    pub fn set_dev_nonce<H: AsRef<[u8]>, T: Into<parser::DevNonce<H>>>(
        &mut self,
        dev_nonce: T,
    ) -> &mut Self {
        let converted = dev_nonce.into();
        self.data.as_mut()[17..19].copy_from_slice(converted.as_ref());

        self
    }

    /// Provides the binary representation of the JoinRequest physical payload
    /// with the MIC set.
    ///
    /// # Argument
    ///
    /// * key - the key to be used for setting the MIC.
    pub fn build<F: CryptoFactory>(&mut self, key: &AppKey, factory: &F) -> &[u8] {
        let d = self.data.as_mut();
        set_mic(&mut d[..JOIN_REQUEST_LEN], factory.new_mac(key.inner()));
        &d[..JOIN_REQUEST_LEN]
    }
}

/// DataPayloadCreator serves for creating binary representation of Physical
/// Payload of DataUp or DataDown messages.
///
/// The FRMPayload is written as given, callers pass it already encrypted.
///
/// # Example
///
/// ```
/// let mut buf = [0u8; 23];
/// let mut phy = lorawan_parser::creator::DataPayloadCreator::new(&mut buf[..]).unwrap();
/// let nwk_skey = lorawan_parser::keys::NwkSKey::from([2; 16]);
/// phy.set_confirmed(true)
///     .set_uplink(true)
///     .set_f_port(42)
///     .set_dev_addr(&[4, 3, 2, 1])
///     .set_fctrl(&lorawan_parser::parser::FCtrl::new(0x80, lorawan_parser::parser::Direction::Uplink))
///     .set_fcnt(76543);
/// let frame = phy.build(b"hello", &[], &nwk_skey, &lorawan_parser::default_crypto::DefaultFactory)
///     .unwrap();
/// assert_eq!(frame.len(), 18);
/// ```
pub struct DataPayloadCreator<D> {
    data: D,
    f_port: Option<u8>,
    fctrl: FCtrl,
    fcnt: u32,
}

impl<D: AsMut<[u8]>> DataPayloadCreator<D> {
    /// Creates a well initialized DataPayloadCreator writing into `data`.
    ///
    /// By default the packet is unconfirmed data up packet.
    pub fn new(mut data: D) -> Result<Self, Error> {
        let d = data.as_mut();
        if d.len() < DATA_PAYLOAD_MIN_LEN {
            return Err(Error::BufferTooShort);
        }
        d[0] = 0x40;
        Ok(DataPayloadCreator { data, f_port: None, fctrl: FCtrl::new(0, Direction::Uplink), fcnt: 0 })
    }

    /// Sets whether the packet is uplink or downlink.
    ///
    /// # Argument
    ///
    /// * uplink - whether the packet is uplink or downlink.
    pub fn set_uplink(&mut self, uplink: bool) -> &mut Self {
        if uplink {
            self.data.as_mut()[0] &= 0xdf;
        } else {
            self.data.as_mut()[0] |= 0x20;
        }
        self
    }

    /// Sets whether the packet is confirmed or unconfirmed.
    ///
    /// # Argument
    ///
    /// * confirmed - whether the packet is confirmed or unconfirmed.
    pub fn set_confirmed(&mut self, confirmed: bool) -> &mut Self {
        let d = self.data.as_mut();
        if confirmed {
            d[0] &= 0xbf;
            d[0] |= 0x80;
        } else {
            d[0] &= 0x7f;
            d[0] |= 0x40;
        }

        self
    }

    /// Sets the device address of the DataPayload to the provided value.
    ///
    /// # Argument
    ///
    /// * dev_addr - instance of lorawan_parser::parser::DevAddr or anything that can be converted
    ///   into it.
    pub fn set_dev_addr<H: AsRef<[u8]>, T: Into<parser::DevAddr<H>>>(
        &mut self,
        dev_addr: T,
    ) -> &mut Self {
        let converted = dev_addr.into();
        self.data.as_mut()[1..5].copy_from_slice(converted.as_ref());

        self
    }

    /// Sets the FCtrl header of the DataPayload packet to the specified value.
    ///
    /// FOptsLen is taken from the FOpts given to [build](#method.build).
    pub fn set_fctrl(&mut self, fctrl: &FCtrl) -> &mut Self {
        self.fctrl = *fctrl;
        self
    }

    /// Sets the FCnt header of the DataPayload packet to the specified value.
    ///
    /// NOTE: In the packet header the value will be truncated to u16, the full value still takes
    /// part in the MIC.
    pub fn set_fcnt(&mut self, fcnt: u32) -> &mut Self {
        self.fcnt = fcnt;
        self
    }

    /// Sets the FPort header of the DataPayload packet to the specified value.
    pub fn set_f_port(&mut self, f_port: u8) -> &mut Self {
        self.f_port = Some(f_port);
        self
    }

    fn direction(&mut self) -> Direction {
        if self.data.as_mut()[0] & 0x20 == 0 {
            Direction::Uplink
        } else {
            Direction::Downlink
        }
    }

    /// Provides the binary representation of the DataPayload physical payload
    /// with the MIC set.
    ///
    /// # Argument
    ///
    /// * payload - the FRMPayload, written as it is.
    /// * fopts - the piggy-backed MAC commands, at most 15 bytes.
    /// * nwk_skey - the key to be used for setting the MIC.
    /// * factory - the factory that shall be used to create object for crypto functions.
    pub fn build<F: CryptoFactory>(
        &mut self,
        payload: &[u8],
        fopts: &[u8],
        nwk_skey: &NwkSKey,
        factory: &F,
    ) -> Result<&[u8], Error> {
        if fopts.len() > FOPTS_MAX_LEN {
            return Err(Error::FOptsTooLong);
        }
        if self.f_port.is_none() && !payload.is_empty() {
            return Err(Error::FRMPayloadWithoutFPort);
        }
        let port_len = if self.f_port.is_some() { 1 + payload.len() } else { 0 };
        // MHDR + FHDR without the FOpts
        let fopts_start = 8;
        let len = fopts_start + fopts.len() + port_len + MIC_LEN;
        if len > DATA_PAYLOAD_MAX_LEN {
            return Err(Error::FrameTooLong);
        }
        if self.data.as_mut().len() < len {
            return Err(Error::BufferTooShort);
        }

        let direction = self.direction();
        let mut fctrl = FCtrl::new(self.fctrl.raw_value(), direction);
        fctrl.set_f_opts_len(fopts.len() as u8);
        let f_port = self.f_port;
        let fcnt = self.fcnt;

        let d = self.data.as_mut();
        d[5] = fctrl.raw_value();
        d[6..8].copy_from_slice(&(fcnt as u16).to_le_bytes());
        let mut last_filled = fopts_start;
        d[last_filled..last_filled + fopts.len()].copy_from_slice(fopts);
        last_filled += fopts.len();
        if let Some(port) = f_port {
            d[last_filled] = port;
            last_filled += 1;
            d[last_filled..last_filled + payload.len()].copy_from_slice(payload);
            last_filled += payload.len();
        }

        let block = DataMicBlock { direction, dev_addr: &d[1..5], fcnt };
        let mic = securityhelpers::calculate_data_mic(
            &d[..last_filled],
            &block,
            factory.new_mac(nwk_skey.inner()),
        );
        d[last_filled..len].copy_from_slice(&mic.0);
        trace!("built data frame of {=usize} bytes", len);

        Ok(&d[..len])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::keys::{Mac, AES128, MIC};

    // Echoes the first bytes it is fed so that tests can see the MIC input.
    struct Echo([u8; 16], usize);

    impl Mac for Echo {
        fn input(&mut self, data: &[u8]) {
            for b in data {
                if self.1 < 16 {
                    self.0[self.1] = *b;
                    self.1 += 1;
                }
            }
        }

        fn reset(&mut self) {
            self.1 = 0;
        }

        fn result(self) -> [u8; 16] {
            self.0
        }
    }

    struct EchoFactory;

    impl CryptoFactory for EchoFactory {
        type M = Echo;

        fn new_mac(&self, _key: &AES128) -> Echo {
            Echo([0; 16], 0)
        }
    }

    #[test]
    fn data_creator_rejects_small_buffers() {
        let mut buf = [0u8; 11];
        assert!(DataPayloadCreator::new(&mut buf[..]).is_err());

        let mut buf = [0u8; 12];
        let mut phy = DataPayloadCreator::new(&mut buf[..]).unwrap();
        phy.set_f_port(1);
        assert_eq!(
            phy.build(&[], &[], &NwkSKey::from([0; 16]), &EchoFactory),
            Err(Error::BufferTooShort)
        );
    }

    #[test]
    fn data_creator_validates_fields() {
        let mut buf = [0u8; 64];
        let mut phy = DataPayloadCreator::new(&mut buf[..]).unwrap();
        let key = NwkSKey::from([0; 16]);
        assert_eq!(phy.build(&[1], &[], &key, &EchoFactory), Err(Error::FRMPayloadWithoutFPort));
        assert_eq!(phy.build(&[], &[0; 16], &key, &EchoFactory), Err(Error::FOptsTooLong));
    }

    #[test]
    fn data_creator_rejects_frames_over_b0_length() {
        let mut buf = [0u8; 300];
        let mut phy = DataPayloadCreator::new(&mut buf[..]).unwrap();
        phy.set_f_port(1);
        let key = NwkSKey::from([0; 16]);
        // MHDR, FHDR and FPort take 9 bytes
        assert_eq!(phy.build(&[0; 257], &[], &key, &EchoFactory), Err(Error::FrameTooLong));
        assert_eq!(phy.build(&[0; 247], &[], &key, &EchoFactory), Err(Error::FrameTooLong));
        assert_eq!(phy.build(&[0; 246], &[], &key, &EchoFactory).map(|f| f.len()), Ok(259));
    }

    #[test]
    fn data_creator_sets_fopts_len_and_direction() {
        let mut buf = [0u8; 64];
        let mut phy = DataPayloadCreator::new(&mut buf[..]).unwrap();
        let mut fctrl = FCtrl::new(0x0f, Direction::Uplink);
        fctrl.set_ack(true);
        phy.set_uplink(false).set_fctrl(&fctrl).set_dev_addr(&[1, 2, 3, 4]).set_fcnt(0x1_0203);
        let frame = phy.build(&[], &[0x02, 0x03], &NwkSKey::from([0; 16]), &EchoFactory).unwrap();
        assert_eq!(
            frame,
            &[0x60, 1, 2, 3, 4, 0x22, 0x03, 0x02, 0x02, 0x03, 0x49, 0, 0, 0]
        );
    }

    #[test]
    fn join_request_creator_layout() {
        let mut buf = [0u8; 23];
        let mut phy = JoinRequestCreator::new(&mut buf).unwrap();
        phy.set_app_eui(&[1; 8]).set_dev_eui(&[2; 8]).set_dev_nonce(&[3; 2]);
        let frame = phy.build(&AppKey::from([0; 16]), &EchoFactory);
        assert_eq!(frame[0], 0);
        assert_eq!(&frame[1..9], &[1; 8]);
        assert_eq!(&frame[17..19], &[3; 2]);
        // the MIC input starts with the MHDR
        assert_eq!(MIC([frame[19], frame[20], frame[21], frame[22]]), MIC([0, 1, 1, 1]));

        let mut short = [0u8; 22];
        assert!(JoinRequestCreator::new(&mut short).is_err());
    }
}
