//! Endian-aware byte cursor over an in-memory file.

use crate::error::{Result, SavError};
use crate::types::Endian;

pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(data: &'a [u8], pos: usize, endian: Endian) -> Self {
        Self { data, pos, endian }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or(SavError::UnexpectedEof { offset: self.pos })?;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or(SavError::UnexpectedEof { offset: self.pos })?;
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(self.endian.i32_from([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_raw8(&mut self) -> Result<[u8; 8]> {
        let bytes = self.read_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(buf)
    }

    pub(crate) fn read_f64(&mut self) -> Result<f64> {
        let raw = self.read_raw8()?;
        Ok(self.endian.f64_from(raw))
    }

    /// Read a non-negative count field.
    pub(crate) fn read_count(&mut self, what: &str) -> Result<usize> {
        let offset = self.pos;
        let value = self.read_i32()?;
        usize::try_from(value).map_err(|_| {
            SavError::invalid_format(format!("negative {what} ({value}) at offset {offset}"))
        })
    }
}

/// Decode fixed-width text, dropping trailing spaces and NULs.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches([' ', '\0'])
        .to_string()
}
