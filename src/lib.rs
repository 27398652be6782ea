// Copyright (c) 2017,2018 Ivaylo Petrov
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//
// author: Ivaylo Petrov <ivajloip@gmail.com>

//! This crate implements decoding of LoRaWAN MAC frames and the computation and
//! verification of their message integrity code.
//!
//! Frames are parsed into typed views over the original bytes with
//! [parser::parse](parser/fn.parse.html), nothing is copied or allocated.
#![no_std]
#![deny(rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// This must go FIRST so that all the other modules see its macros.
mod fmt;

pub mod creator;
pub mod keys;
pub mod packet_length;
pub mod parser;
pub mod string;
pub mod types;

#[cfg(feature = "default-crypto")]
#[cfg_attr(docsrs, doc(cfg(feature = "default-crypto")))]
pub mod default_crypto;

mod securityhelpers;
