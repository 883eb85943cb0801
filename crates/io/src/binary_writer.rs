/// Growable little-endian byte writer.
///
/// # Examples
///
/// ```rust
/// use neo_io::BinaryWriter;
///
/// let mut writer = BinaryWriter::new();
/// writer.write_u32(42);
/// writer.write_var_bytes(b"Neo");
///
/// assert_eq!(writer.to_bytes(), vec![42, 0, 0, 0, 3, b'N', b'e', b'o']);
/// ```
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
    inner: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self { inner: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }

    pub fn write_bool(&mut self, value: bool) {
        self.inner.push(value as u8);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.inner.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.inner.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.inner.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.inner.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.inner.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.inner.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.inner.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, buffer: &[u8]) {
        self.inner.extend_from_slice(buffer);
    }

    pub fn write_var_int(&mut self, value: u64) {
        if value < 0xfd {
            self.write_u8(value as u8);
        } else if value <= 0xffff {
            self.write_u8(0xfd);
            self.write_u16(value as u16);
        } else if value <= 0xffff_ffff {
            self.write_u8(0xfe);
            self.write_u32(value as u32);
        } else {
            self.write_u8(0xff);
            self.write_u64(value);
        }
    }

    pub fn write_var_bytes(&mut self, value: &[u8]) {
        self.write_var_int(value.len() as u64);
        self.write_bytes(value);
    }

    pub fn write_var_string(&mut self, value: &str) {
        self.write_var_bytes(value.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_writer() {
        let mut writer = BinaryWriter::new();

        writer.write_bool(true);
        writer.write_u8(42);
        writer.write_i16(-1000);
        writer.write_u32(1_000_000);
        writer.write_i64(-1_000_000_000_000);
        writer.write_var_string("Hello, Neo!");

        let mut expected = Vec::new();
        expected.extend_from_slice(&[1]);
        expected.extend_from_slice(&[42]);
        expected.extend_from_slice(&(-1000i16).to_le_bytes());
        expected.extend_from_slice(&1_000_000u32.to_le_bytes());
        expected.extend_from_slice(&(-1_000_000_000_000i64).to_le_bytes());
        expected.extend_from_slice(&[11]);
        expected.extend_from_slice(b"Hello, Neo!");

        assert_eq!(writer.into_bytes(), expected);
    }

    #[test]
    fn test_var_int_boundaries() {
        let mut writer = BinaryWriter::new();
        writer.write_var_int(0xfc);
        writer.write_var_int(0xfd);
        writer.write_var_int(0x1_0000);
        writer.write_var_int(0x1_0000_0000);
        assert_eq!(
            hex::encode(writer.to_bytes()),
            "fcfdfd00fe00000100ff0000000001000000"
        );
    }
}
