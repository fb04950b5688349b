// cellvm-data - Canonical encoding and content hashing
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Canonical byte encoding of values, and content hashes derived from it.
//!
//! The encoding is a tag byte per value followed by a fixed-width big-endian
//! payload; collections are length-prefixed and written in their iteration
//! order, which for maps and sets is key order. Structurally equal values
//! therefore always produce identical bytes and identical hashes, on every
//! node.

use std::fmt;

use crate::blob_map::BlobMap;
use crate::map::Map;
use crate::sequence::Sequence;
use crate::state::{AccountStatus, State};
use crate::value::Value;

mod tag {
    pub const NIL: u8 = 0x00;
    pub const FALSE: u8 = 0x01;
    pub const TRUE: u8 = 0x02;
    pub const LONG: u8 = 0x10;
    pub const STRING: u8 = 0x20;
    pub const BLOB: u8 = 0x21;
    pub const ADDRESS: u8 = 0x22;
    pub const SYMBOL: u8 = 0x30;
    pub const KEYWORD: u8 = 0x31;
    pub const LIST: u8 = 0x80;
    pub const VECTOR: u8 = 0x81;
    pub const MAP: u8 = 0x82;
    pub const SET: u8 = 0x83;
    pub const BLOB_MAP: u8 = 0x84;
    pub const STATE: u8 = 0x90;
}

/// A 32-byte blake3 digest of a canonical encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        ContentHash(*blake3::hash(bytes).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self)
    }
}

fn write_len(out: &mut Vec<u8>, len: usize) {
    out.extend_from_slice(&(len as u64).to_be_bytes());
}

fn write_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_len(out, bytes.len());
    out.extend_from_slice(bytes);
}

fn write_map(out: &mut Vec<u8>, map: &Map) {
    out.push(tag::MAP);
    write_len(out, map.count());
    for (k, v) in map.iter() {
        k.write_encoding(out);
        v.write_encoding(out);
    }
}

fn write_blob_map(out: &mut Vec<u8>, map: &BlobMap) {
    out.push(tag::BLOB_MAP);
    write_len(out, map.count());
    for (k, v) in map.iter() {
        write_bytes(out, k.as_bytes());
        v.write_encoding(out);
    }
}

fn write_account(out: &mut Vec<u8>, account: &AccountStatus) {
    out.extend_from_slice(&account.balance().to_be_bytes());
    out.extend_from_slice(&account.sequence().to_be_bytes());
    write_map(out, account.environment());
    write_blob_map(out, account.holdings());
}

impl Value {
    /// Append the canonical encoding of this value to `out`.
    pub fn write_encoding(&self, out: &mut Vec<u8>) {
        match self {
            Value::Nil => out.push(tag::NIL),
            Value::Bool(false) => out.push(tag::FALSE),
            Value::Bool(true) => out.push(tag::TRUE),
            Value::Long(n) => {
                out.push(tag::LONG);
                out.extend_from_slice(&n.to_be_bytes());
            }
            Value::String(s) => {
                out.push(tag::STRING);
                write_bytes(out, s.as_bytes());
            }
            Value::Blob(b) => {
                out.push(tag::BLOB);
                write_bytes(out, b.as_bytes());
            }
            Value::Address(a) => {
                out.push(tag::ADDRESS);
                out.extend_from_slice(&a.value().to_be_bytes());
            }
            Value::Symbol(s) => {
                out.push(tag::SYMBOL);
                write_bytes(out, s.name().as_bytes());
            }
            Value::Keyword(k) => {
                out.push(tag::KEYWORD);
                write_bytes(out, k.name().as_bytes());
            }
            Value::List(l) => {
                out.push(tag::LIST);
                write_len(out, l.count());
                l.iter().for_each(|v| v.write_encoding(out));
            }
            Value::Vector(v) => {
                out.push(tag::VECTOR);
                write_len(out, v.count());
                v.iter().for_each(|v| v.write_encoding(out));
            }
            Value::Map(m) => write_map(out, m),
            Value::Set(s) => {
                out.push(tag::SET);
                write_len(out, s.count());
                s.iter().for_each(|v| v.write_encoding(out));
            }
            Value::BlobMap(m) => write_blob_map(out, m),
            Value::State(s) => s.write_encoding(out),
        }
    }

    /// The canonical encoding of this value.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_encoding(&mut out);
        out
    }

    /// Content hash of the canonical encoding.
    #[must_use]
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of_bytes(&self.encode())
    }
}

impl State {
    pub fn write_encoding(&self, out: &mut Vec<u8>) {
        out.push(tag::STATE);
        out.extend_from_slice(&self.timestamp().to_be_bytes());
        write_len(out, self.account_count());
        for (_, account) in self.accounts() {
            write_account(out, account);
        }
    }

    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_encoding(&mut out);
        out
    }

    #[must_use]
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of_bytes(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Blob, Keyword, List, Set, Vector};

    #[test]
    fn test_equal_values_equal_hashes() {
        let a = Value::from(Map::of([(Keyword::new("a"), 1), (Keyword::new("b"), 2)]));
        let b = Value::from(Map::of([(Keyword::new("b"), 2), (Keyword::new("a"), 1)]));
        assert_eq!(a.encode(), b.encode());
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_list_and_vector_hash_differently() {
        let l = Value::from(List::of([1, 2]));
        let v = Value::from(Vector::of([1, 2]));
        assert_ne!(l.content_hash(), v.content_hash());
    }

    #[test]
    fn test_nesting_is_unambiguous() {
        let flat = Value::from(Vector::of([1, 2]));
        let nested = Value::from(Vector::of([Value::from(Vector::of([1])), Value::from(2)]));
        assert_ne!(flat.encode(), nested.encode());
        let empty_set = Value::from(Set::empty());
        assert_ne!(empty_set.encode(), Value::from(Map::empty()).encode());
    }

    #[test]
    fn test_long_encoding() {
        assert_eq!(
            Value::from(1).encode(),
            vec![tag::LONG, 0, 0, 0, 0, 0, 0, 0, 1]
        );
    }

    #[test]
    fn test_state_hash_tracks_content() {
        let s = State::genesis([10, 20]);
        let same = State::genesis([10, 20]);
        assert!(!s.ptr_eq(&same));
        assert_eq!(s.content_hash(), same.content_hash());
        let moved = s.transfer(crate::Address::new(0), crate::Address::new(1), 1).unwrap();
        assert_ne!(s.content_hash(), moved.content_hash());
    }

    #[test]
    fn test_hash_hex_display() {
        let h = Value::from(Blob::from(&[1u8, 2][..])).content_hash();
        assert_eq!(h.to_hex().len(), 64);
        assert!(h.to_string().starts_with("0x"));
    }
}
