use std::io::{self, Cursor, Read};

pub fn read_u8(cursor: &mut Cursor<&[u8]>) -> io::Result<u8> {
    if cursor.position() >= cursor.get_ref().len() as u64 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "End of buffer reached",
        ));
    }

    let mut buf = [0u8; 1];
    cursor.read_exact(&mut buf)?;
    Ok(buf[0])
}

pub fn read_u16_le(cursor: &mut Cursor<&[u8]>) -> io::Result<u16> {
    if cursor.position() + 1 >= cursor.get_ref().len() as u64 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "End of buffer reached or not enough bytes for u16",
        ));
    }

    let mut buf = [0u8; 2];
    cursor.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

pub fn read_u32_le(cursor: &mut Cursor<&[u8]>) -> io::Result<u32> {
    if cursor.position() + 3 >= cursor.get_ref().len() as u64 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "End of buffer reached or not enough bytes for u32",
        ));
    }

    let mut buf = [0u8; 4];
    cursor.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub fn read_bytes(cursor: &mut Cursor<&[u8]>, length: usize) -> io::Result<Vec<u8>> {
    if cursor.position() + (length as u64) > cursor.get_ref().len() as u64 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Not enough bytes remaining for read_bytes({})", length),
        ));
    }

    let mut buffer = vec![0u8; length];
    cursor.read_exact(&mut buffer)?;
    Ok(buffer)
}

/// Read a fixed-width, NUL-padded ASCII field and trim the padding.
pub fn read_padded_name(cursor: &mut Cursor<&[u8]>, width: usize) -> io::Result<String> {
    let raw = read_bytes(cursor, width)?;
    let trimmed: &[u8] = match raw.iter().position(|&b| b == 0) {
        Some(end) => &raw[..end],
        None => &raw,
    };
    if !trimmed.is_ascii() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Name field is not ASCII",
        ));
    }
    Ok(String::from_utf8_lossy(trimmed).into_owned())
}
