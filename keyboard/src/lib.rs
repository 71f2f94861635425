/*
 * Scan Code Decoder
 *
 * Turns the raw PS/2 set-2 byte stream into canonical key-down events
 * while tracking prefix and modifier state. One byte in, at most one
 * event out; multi-byte sequences are carried purely in prefix flags.
 */

#![cfg_attr(not(test), no_std)]

pub mod codes;
pub mod scan;

mod decode;

pub use decode::{Action, Decoder, KeyPress, Modifiers, Prefix};
