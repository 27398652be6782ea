//! LoRaWAN type primitives (frequency, channel mask, downlink settings)
//! carried inside a JoinAccept.

/// ChannelMask represents the ChannelMask from LoRaWAN.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct ChannelMask<const N: usize>([u8; N]);

impl<const N: usize> Default for ChannelMask<N> {
    fn default() -> Self {
        ChannelMask([0xFF; N])
    }
}

impl<const N: usize> ChannelMask<N> {
    /// Constructs a new ChannelMask from the provided data.
    pub fn new(data: &[u8]) -> Option<Self> {
        if data.len() < N {
            return None;
        }
        Some(Self::new_from_raw(data))
    }

    /// Constructs a new ChannelMask from the provided data, without verifying if they are
    /// admissible.
    ///
    /// Improper use of this method could lead to panic during runtime!
    pub fn new_from_raw(data: &[u8]) -> Self {
        let mut payload = [0; N];
        payload[..N].copy_from_slice(&data[..N]);
        ChannelMask(payload)
    }

    fn channel_enabled(&self, index: usize) -> bool {
        self.0[index >> 3] & (1 << (index & 0x07)) != 0
    }

    /// Verifies if a given channel is enabled, `None` if the index is outside the mask.
    pub fn is_enabled(&self, index: usize) -> Option<bool> {
        if index >= N * 8 {
            return None;
        }
        Some(self.channel_enabled(index))
    }
}

impl<const N: usize> From<[u8; N]> for ChannelMask<N> {
    fn from(v: [u8; N]) -> Self {
        ChannelMask(v)
    }
}

impl<const N: usize> AsRef<[u8]> for ChannelMask<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

/// DLSettings represents LoRaWAN DLSettings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct DLSettings(u8);

impl DLSettings {
    /// Constructs a new DLSettings from the provided data.
    pub fn new(byte: u8) -> DLSettings {
        DLSettings(byte)
    }

    /// The offset between the uplink data rate and the downlink data rate used to communicate with
    /// the end-device on the first reception slot (RX1).
    pub fn rx1_dr_offset(&self) -> u8 {
        (self.0 >> 4) & 0x07
    }

    /// The data rate of a downlink using the second receive window.
    pub fn rx2_data_rate(&self) -> u8 {
        self.0 & 0x0f
    }

    /// The integer value of the DL Settings.
    pub fn raw_value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for DLSettings {
    fn from(v: u8) -> Self {
        DLSettings(v)
    }
}

/// Frequency represents a channel's central frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Frequency<'a>(&'a [u8]);

impl<'a> Frequency<'a> {
    /// Constructs a new Frequency from the provided bytes, without verifying if they are
    /// admissible.
    ///
    /// Improper use of this method could lead to panic during runtime!
    pub fn new_from_raw(bytes: &'a [u8]) -> Self {
        Frequency(bytes)
    }

    /// Constructs a new Frequency from the provided bytes.
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() != 3 {
            return None;
        }

        Some(Frequency(bytes))
    }

    /// Provides the decimal value in Hz of the frequency.
    pub fn value(&self) -> u32 {
        ((u32::from(self.0[2]) << 16) + (u32::from(self.0[1]) << 8) + u32::from(self.0[0])) * 100
    }
}

impl AsRef<[u8]> for Frequency<'_> {
    fn as_ref(&self) -> &[u8] {
        self.0
    }
}

/// CfList is the optional channel list of a JoinAccept, decoded according to its type byte.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum CfList<'a> {
    DynamicChannel([Frequency<'a>; 5]),
    FixedChannel(ChannelMask<9>),
}

impl<'a> CfList<'a> {
    /// Decodes the 16 bytes of a CFList, `None` for a wrong size or an unknown list type.
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() != 16 {
            return None;
        }
        match bytes[15] {
            0 => Some(CfList::DynamicChannel([
                Frequency::new_from_raw(&bytes[0..3]),
                Frequency::new_from_raw(&bytes[3..6]),
                Frequency::new_from_raw(&bytes[6..9]),
                Frequency::new_from_raw(&bytes[9..12]),
                Frequency::new_from_raw(&bytes[12..15]),
            ])),
            1 => Some(CfList::FixedChannel(ChannelMask::new_from_raw(&bytes[0..9]))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dl_settings() {
        let dl_settings = DLSettings::new(0xcb);
        assert_eq!(dl_settings.rx1_dr_offset(), 4);
        assert_eq!(dl_settings.rx2_data_rate(), 11);
        assert_eq!(dl_settings.raw_value(), 0xcb);
    }

    #[test]
    fn test_new_frequency() {
        let freq = Frequency::new(&[0x18, 0x4F, 0x84]);

        assert!(freq.is_some());
        assert_eq!(freq.unwrap().value(), 867_100_000);
        assert!(Frequency::new(&[0x18, 0x4F]).is_none());
    }

    #[test]
    fn test_channel_mask() {
        let mask = ChannelMask::<2>::new(&[0x05, 0x80]).unwrap();
        assert_eq!(mask.is_enabled(0), Some(true));
        assert_eq!(mask.is_enabled(1), Some(false));
        assert_eq!(mask.is_enabled(2), Some(true));
        assert_eq!(mask.is_enabled(15), Some(true));
        assert_eq!(mask.is_enabled(16), None);
        assert!(ChannelMask::<2>::new(&[0x05]).is_none());
    }

    #[test]
    fn test_cf_list_dynamic() {
        let bytes = [
            0x18, 0x4F, 0x84, 0xE8, 0x56, 0x84, 0xB8, 0x5E, 0x84, 0x88, 0x66, 0x84, 0x58, 0x6E,
            0x84, 0x00,
        ];
        match CfList::new(&bytes) {
            Some(CfList::DynamicChannel(freqs)) => {
                assert_eq!(freqs[0].value(), 867_100_000);
                assert_eq!(freqs[4].value(), 867_900_000);
            }
            other => panic!("unexpected cf list {:?}", other),
        }
    }

    #[test]
    fn test_cf_list_fixed_and_unknown() {
        let mut bytes = [0u8; 16];
        bytes[0] = 0xff;
        bytes[15] = 1;
        match CfList::new(&bytes) {
            Some(CfList::FixedChannel(mask)) => assert_eq!(mask.is_enabled(7), Some(true)),
            other => panic!("unexpected cf list {:?}", other),
        }
        bytes[15] = 2;
        assert_eq!(CfList::new(&bytes), None);
        assert_eq!(CfList::new(&bytes[..15]), None);
    }
}
