use crate::{IoError, IoResult};

/// Cursor over a borrowed byte slice.
pub struct MemoryReader<'a> {
    memory: &'a [u8],
    pos: usize,
}

impl<'a> MemoryReader<'a> {
    pub fn new(memory: &'a [u8]) -> Self {
        Self { memory, pos: 0 }
    }

    /// Starts reading at `pos`.
    pub fn with_position(memory: &'a [u8], pos: usize) -> Self {
        Self { memory, pos }
    }

    #[inline(always)]
    fn ensure_position(&self, move_by: usize) -> IoResult<()> {
        match self.pos.checked_add(move_by) {
            Some(end) if end <= self.memory.len() => Ok(()),
            _ => Err(IoError::EndOfStream {
                position: self.pos,
                needed: move_by,
            }),
        }
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.memory.len().saturating_sub(self.pos)
    }

    #[inline(always)]
    pub fn has_more(&self) -> bool {
        self.pos < self.memory.len()
    }

    #[inline(always)]
    pub fn peek(&self) -> IoResult<u8> {
        self.ensure_position(1)?;
        Ok(self.memory[self.pos])
    }

    pub fn read_bool(&mut self) -> IoResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(IoError::InvalidData(format!(
                "Invalid boolean value {other}"
            ))),
        }
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> IoResult<u8> {
        self.ensure_position(1)?;
        let value = self.memory[self.pos];
        self.pos += 1;
        Ok(value)
    }

    #[inline(always)]
    pub fn read_i16(&mut self) -> IoResult<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    #[inline(always)]
    pub fn read_u16(&mut self) -> IoResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    #[inline(always)]
    pub fn read_i32(&mut self) -> IoResult<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    #[inline(always)]
    pub fn read_u32(&mut self) -> IoResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    #[inline(always)]
    pub fn read_i64(&mut self) -> IoResult<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    #[inline(always)]
    pub fn read_u64(&mut self) -> IoResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Reads exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> IoResult<[u8; N]> {
        let slice = self.read_memory(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    pub fn read_var_int(&mut self, max: u64) -> IoResult<u64> {
        let b = self.read_u8()?;
        let value = match b {
            0xfd => self.read_u16()? as u64,
            0xfe => self.read_u32()? as u64,
            0xff => self.read_u64()?,
            _ => b as u64,
        };
        if value > max {
            return Err(IoError::ExceedsMaximum { value, max });
        }
        Ok(value)
    }

    #[inline(always)]
    pub fn read_memory(&mut self, count: usize) -> IoResult<&'a [u8]> {
        self.ensure_position(count)?;
        let result = &self.memory[self.pos..self.pos + count];
        self.pos += count;
        Ok(result)
    }

    #[inline(always)]
    pub fn read_var_memory(&mut self, max: usize) -> IoResult<&'a [u8]> {
        let length = self.read_var_int(max as u64)? as usize;
        self.read_memory(length)
    }

    pub fn read_var_bytes(&mut self, max: usize) -> IoResult<Vec<u8>> {
        Ok(self.read_var_memory(max)?.to_vec())
    }

    pub fn read_var_string(&mut self, max: usize) -> IoResult<String> {
        let data = self.read_var_memory(max)?;
        String::from_utf8(data.to_vec())
            .map_err(|_| IoError::InvalidData("Invalid UTF-8 sequence".to_string()))
    }

    #[inline(always)]
    pub fn read_to_end(&mut self) -> &'a [u8] {
        let start = self.pos.min(self.memory.len());
        self.pos = self.memory.len();
        &self.memory[start..]
    }
}
