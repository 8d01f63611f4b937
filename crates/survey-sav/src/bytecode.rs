//! Bytecode compression for case data.
//!
//! Data is a sequence of 8-byte command blocks. Each command byte describes
//! one 8-byte slot:
//!
//! | Code     | Meaning                                          |
//! |----------|--------------------------------------------------|
//! | 0        | padding, ignored                                 |
//! | 1..=251  | numeric value `code - bias`                      |
//! | 252      | end of data                                      |
//! | 253      | raw 8-byte slot follows the command block        |
//! | 254      | eight spaces                                     |
//! | 255      | system-missing                                   |
//!
//! Command blocks may span case boundaries, so the decoder keeps state for
//! the whole data section.

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::types::{Endian, SYSMIS};

const CODE_PADDING: u8 = 0;
const CODE_EOF: u8 = 252;
const CODE_RAW: u8 = 253;
const CODE_SPACES: u8 = 254;
const CODE_SYSMIS: u8 = 255;

const SPACES: [u8; 8] = [b' '; 8];

/// Decodes compressed slots one at a time.
pub(crate) struct BytecodeDecoder<'a> {
    cursor: ByteCursor<'a>,
    block: [u8; 8],
    next: usize,
    bias: f64,
    finished: bool,
}

impl<'a> BytecodeDecoder<'a> {
    pub(crate) fn new(cursor: ByteCursor<'a>, bias: f64) -> Self {
        Self {
            cursor,
            block: [0; 8],
            next: 8,
            bias,
            finished: false,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Next slot in raw file byte order, `None` at end of data.
    pub(crate) fn next_slot(&mut self, endian: Endian) -> Result<Option<[u8; 8]>> {
        loop {
            if self.finished {
                return Ok(None);
            }
            if self.next == self.block.len() {
                if self.cursor.remaining() < 8 {
                    self.finished = true;
                    return Ok(None);
                }
                self.block = self.cursor.read_raw8()?;
                self.next = 0;
            }
            let code = self.block[self.next];
            self.next += 1;
            match code {
                CODE_PADDING => {}
                CODE_EOF => {
                    self.finished = true;
                    return Ok(None);
                }
                CODE_RAW => return self.cursor.read_raw8().map(Some),
                CODE_SPACES => return Ok(Some(SPACES)),
                CODE_SYSMIS => return Ok(Some(endian.f64_to(SYSMIS))),
                value => return Ok(Some(endian.f64_to(f64::from(value) - self.bias))),
            }
        }
    }
}

/// Slot kinds accepted by the encoder.
#[derive(Debug, Clone, Copy)]
pub(crate) enum EncodedSlot {
    Numeric(Option<f64>),
    Text([u8; 8]),
}

/// Accumulates compressed slots into command blocks.
pub(crate) struct BytecodeEncoder {
    out: Vec<u8>,
    block: [u8; 8],
    used: usize,
    pending: Vec<[u8; 8]>,
    bias: f64,
    endian: Endian,
}

impl BytecodeEncoder {
    pub(crate) fn new(bias: f64, endian: Endian) -> Self {
        Self {
            out: Vec::new(),
            block: [CODE_PADDING; 8],
            used: 0,
            pending: Vec::new(),
            bias,
            endian,
        }
    }

    pub(crate) fn push(&mut self, slot: EncodedSlot) {
        match slot {
            EncodedSlot::Numeric(None) => self.push_code(CODE_SYSMIS, None),
            EncodedSlot::Numeric(Some(value)) => match self.compact_code(value) {
                Some(code) => self.push_code(code, None),
                None => {
                    let raw = self.endian.f64_to(value);
                    self.push_code(CODE_RAW, Some(raw));
                }
            },
            EncodedSlot::Text(bytes) if bytes == SPACES => self.push_code(CODE_SPACES, None),
            EncodedSlot::Text(bytes) => self.push_code(CODE_RAW, Some(bytes)),
        }
    }

    /// Flush the open block and return the encoded bytes.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.flush();
        self.out
    }

    fn compact_code(&self, value: f64) -> Option<u8> {
        let shifted = value + self.bias;
        let in_range = value.fract() == 0.0 && (1.0..=251.0).contains(&shifted);
        // -0.0 would come back as +0.0 through the compact form.
        (in_range && !(value == 0.0 && value.is_sign_negative())).then_some(shifted as u8)
    }

    fn push_code(&mut self, code: u8, raw: Option<[u8; 8]>) {
        if self.used == self.block.len() {
            self.flush();
        }
        self.block[self.used] = code;
        self.used += 1;
        if let Some(raw) = raw {
            self.pending.push(raw);
        }
    }

    fn flush(&mut self) {
        if self.used == 0 {
            return;
        }
        self.out.extend_from_slice(&self.block);
        for raw in self.pending.drain(..) {
            self.out.extend_from_slice(&raw);
        }
        self.block = [CODE_PADDING; 8];
        self.used = 0;
    }
}
