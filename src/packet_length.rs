//! Byte lengths of the LoRaWAN frame fields.
pub mod phy {
    pub const MHDR_LEN: usize = 1;
    pub const MIC_LEN: usize = 4;

    /// The shortest frame that can still be split into MHDR and MIC.
    pub const PHY_PAYLOAD_MIN_LEN: usize = MHDR_LEN + MIC_LEN;

    pub mod join {
        use super::{MHDR_LEN, MIC_LEN};

        pub const APP_NONCE_LEN: usize = 3;
        pub const NET_ID_LEN: usize = 3;
        pub const DEV_ADDR_LEN: usize = 4;
        pub const DL_SETTINGS_LEN: usize = 1;
        pub const RX_DELAY_LEN: usize = 1;
        pub const CF_LIST_LEN: usize = 16;

        pub const JOIN_ACCEPT_PAYLOAD_LEN: usize =
            APP_NONCE_LEN + NET_ID_LEN + DEV_ADDR_LEN + DL_SETTINGS_LEN + RX_DELAY_LEN;
        pub const JOIN_ACCEPT_PAYLOAD_WITH_CFLIST_LEN: usize =
            JOIN_ACCEPT_PAYLOAD_LEN + CF_LIST_LEN;

        pub const JOIN_ACCEPT_LEN: usize = MHDR_LEN + JOIN_ACCEPT_PAYLOAD_LEN + MIC_LEN;
        pub const JOIN_ACCEPT_WITH_CFLIST_LEN: usize =
            MHDR_LEN + JOIN_ACCEPT_PAYLOAD_WITH_CFLIST_LEN + MIC_LEN;

        pub const APP_EUI_LEN: usize = 8;
        pub const DEV_EUI_LEN: usize = 8;
        pub const DEV_NONCE_LEN: usize = 2;
        pub const JOIN_REQUEST_PAYLOAD_LEN: usize = APP_EUI_LEN + DEV_EUI_LEN + DEV_NONCE_LEN;
        pub const JOIN_REQUEST_LEN: usize = MHDR_LEN + JOIN_REQUEST_PAYLOAD_LEN + MIC_LEN;
    }

    pub mod mac {
        pub const FPORT_LEN: usize = 1;
        pub mod fhdr {
            pub const DEV_ADDR_LEN: usize = 4;
            pub const FCTRL_LEN: usize = 1;
            pub const FCNT_LEN: usize = 2;
            pub const FOPTS_MAX_LEN: usize = 15;

            /// Bytes that must be present before FOptsLen can be read.
            pub const FCTRL_END: usize = DEV_ADDR_LEN + FCTRL_LEN;

            pub const FHDR_MIN_LEN: usize = DEV_ADDR_LEN + FCTRL_LEN + FCNT_LEN;
            pub const FHDR_MAX_LEN: usize = FHDR_MIN_LEN + FOPTS_MAX_LEN;
        }
        pub const MAC_PAYLOAD_MIN: usize = fhdr::FHDR_MIN_LEN;
    }

    /// The shortest data frame: MHDR, an FHDR without FOpts and the MIC.
    pub const DATA_PAYLOAD_MIN_LEN: usize = MHDR_LEN + mac::MAC_PAYLOAD_MIN + MIC_LEN;

    /// The longest data frame, the B0 block carries the length of everything before the MIC
    /// in a single byte.
    pub const DATA_PAYLOAD_MAX_LEN: usize = u8::MAX as usize + MIC_LEN;
}
