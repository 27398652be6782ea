// Copyright (c) 2017,2018,2020 Ivaylo Petrov
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//
// author: Ivaylo Petrov <ivajloip@gmail.com>
use super::keys;
use super::parser::Direction;

/// Fields of the B0 authentication block of a data frame.
pub(crate) struct DataMicBlock<'a> {
    pub direction: Direction,
    pub dev_addr: &'a [u8],
    pub fcnt: u32,
}

/// calculate_data_mic computes the MIC of a data frame.
///
/// `msg` is MHDR | FHDR | FPort | FRMPayload, i.e. the frame without its MIC.
pub(crate) fn calculate_data_mic<M: keys::Mac>(
    msg: &[u8],
    block: &DataMicBlock<'_>,
    mac: M,
) -> keys::MIC {
    let mut b0 = [0u8; 16];
    generate_helper_block(block, 0x49, &mut b0);
    // callers keep msg within DATA_PAYLOAD_MAX_LEN - MIC_LEN
    b0[15] = msg.len() as u8;

    calculate_mic_with_header(&b0, &[msg], mac)
}

fn generate_helper_block(block: &DataMicBlock<'_>, first: u8, res: &mut [u8; 16]) {
    res[0] = first;
    // res[1..5] are 0
    res[5] = block.direction as u8;
    res[6..10].copy_from_slice(block.dev_addr);
    res[10..14].copy_from_slice(&block.fcnt.to_le_bytes());
    // res[14] is 0
    // res[15] is to be set later
}

fn calculate_mic_with_header<M: keys::Mac>(header: &[u8], parts: &[&[u8]], mac: M) -> keys::MIC {
    let mut cipher = mac;
    cipher.input(header);
    for part in parts {
        cipher.input(part);
    }
    let result = cipher.result();

    let mut mic = [0u8; 4];
    mic.copy_from_slice(&result[0..4]);

    keys::MIC(mic)
}

/// calculate_mic computes the MIC of a join frame from its consecutive fields.
pub(crate) fn calculate_mic<M: keys::Mac>(parts: &[&[u8]], mac: M) -> keys::MIC {
    calculate_mic_with_header(&[], parts, mac)
}

/// Splices the 16 bits of FCnt carried on air into the 32-bit counter kept by the session.
pub(crate) fn compute_fcnt(old_fcnt: u32, fcnt: u16) -> u32 {
    ((old_fcnt >> 16) << 16) ^ u32::from(fcnt)
}
