// Copyright (c) 2020 Ivaylo Petrov
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//
// author: Ivaylo Petrov <ivajloip@gmail.com>

use lorawan_parser::creator::*;
use lorawan_parser::default_crypto::DefaultFactory;
use lorawan_parser::keys::*;
use lorawan_parser::parser::*;

fn nwk_skey() -> NwkSKey {
    "44024241ed4ce9a68c6a8bc055233fd3".parse().unwrap()
}

#[test]
fn test_data_payload_creator_matches_captured_uplink() {
    let mut buf = [0u8; 64];
    let mut phy = DataPayloadCreator::new(&mut buf[..]).unwrap();
    phy.set_dev_addr(DevAddr::from(0x49be7df1_u32))
        .set_fctrl(&FCtrl::new(0x00, Direction::Uplink))
        .set_fcnt(2)
        .set_f_port(1);
    let frame = phy.build(&[0x95, 0x43, 0x78, 0x76], &[], &nwk_skey(), &DefaultFactory).unwrap();
    assert_eq!(frame, &hex::decode("40F17DBE4900020001954378762B11FF0D").unwrap()[..]);
}

#[test]
fn test_data_payload_creator_matches_captured_downlink() {
    let mut buf = [0u8; 64];
    let mut phy = DataPayloadCreator::new(&mut buf[..]).unwrap();
    let mut fctrl = FCtrl::new(0, Direction::Downlink);
    fctrl.set_ack(true);
    phy.set_uplink(false)
        .set_dev_addr(&[0xf1, 0x7d, 0xbe, 0x49])
        .set_fctrl(&fctrl)
        .set_fcnt(2)
        .set_f_port(1);
    let frame = phy.build(&[], &[], &nwk_skey(), &DefaultFactory).unwrap();
    assert_eq!(frame, &hex::decode("60F17DBE4920020001F9D65D27").unwrap()[..]);
}

#[test]
fn test_created_frame_parses_back() {
    let mut buf = [0u8; 64];
    let mut phy = DataPayloadCreator::new(&mut buf[..]).unwrap();
    let mut fctrl = FCtrl::new(0, Direction::Uplink);
    fctrl.set_adr(true).set_adr_ack_req(true);
    phy.set_confirmed(true)
        .set_dev_addr(&[1, 2, 3, 4])
        .set_fctrl(&fctrl)
        .set_fcnt(0x0001_0005)
        .set_f_port(10);
    let frame = phy.build(b"abc", &[0x02], &nwk_skey(), &DefaultFactory).unwrap().to_vec();

    let parsed = parse(frame).unwrap();
    if let PhyPayload::ConfirmedDataUp(data_payload) = parsed {
        let fhdr = data_payload.fhdr();
        assert_eq!(fhdr.dev_addr().as_ref(), &[1, 2, 3, 4]);
        assert_eq!(fhdr.fcnt(), 5);
        assert_eq!(fhdr.fopts(), &[0x02]);
        assert!(fhdr.fctrl().adr());
        assert!(fhdr.fctrl().adr_ack_req());
        assert_eq!(fhdr.fctrl().f_opts_len(), 1);
        assert_eq!(data_payload.f_port(), Some(10));
        assert_eq!(data_payload.frm_payload(), b"abc");
        // the full counter took part in the MIC
        assert!(!data_payload.validate_mic(nwk_skey().inner()));
        assert!(data_payload.validate_mic_with_fcnt(nwk_skey().inner(), 0x0001_0000));
    } else {
        panic!("failed to parse ConfirmedDataUp");
    }
}

#[test]
fn test_join_request_creator() {
    let mut buf = [0u8; 23];
    let mut phy = JoinRequestCreator::new(&mut buf[..]).unwrap();
    phy.set_app_eui(&[0x04, 0x03, 0x02, 0x01, 0x04, 0x03, 0x02, 0x01])
        .set_dev_eui(&[0x05, 0x04, 0x03, 0x02, 0x05, 0x04, 0x03, 0x02])
        .set_dev_nonce(&[0x2d, 0x10]);
    let frame = phy.build(&AppKey::from([1; 16]), &DefaultFactory);
    assert_eq!(
        frame,
        &[
            0x00, 0x04, 0x03, 0x02, 0x01, 0x04, 0x03, 0x02, 0x01, 0x05, 0x04, 0x03, 0x02, 0x05,
            0x04, 0x03, 0x02, 0x2d, 0x10, 0x6a, 0x99, 0x0e, 0x12,
        ]
    );
}

#[test]
fn test_join_request_creator_from_typed_fields() {
    let mut buf = [0u8; 23];
    let mut phy = JoinRequestCreator::new(&mut buf[..]).unwrap();
    phy.set_app_eui(EUI64::from(0x70b3d57ed00000dc_u64))
        .set_dev_eui(EUI64::from(0x00afee7cf5ed6f1e_u64))
        .set_dev_nonce(DevNonce::from(0x86c8_u16));
    let frame = phy.build(&AppKey::from([0; 16]), &DefaultFactory).to_vec();
    assert_eq!(frame, hex::decode("00DC0000D07ED5B3701E6FEDF57CEEAF00C8868629827F").unwrap());

    let parsed = JoinRequestPayload::new(frame).unwrap();
    assert!(parsed.validate_mic(&AES128([0; 16])));
}
