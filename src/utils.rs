pub fn hexdump(buffer: &[u8]) -> String {
    partial_hexdump(buffer, 0, buffer.len())
}

/// Hex and ASCII dump of `buffer[start..end]`, 16 bytes per line.
pub fn partial_hexdump(buffer: &[u8], start: usize, end: usize) -> String {
    let end = end.min(buffer.len());
    let start = start.min(end);

    let mut str = String::new();
    for (row, chunk) in buffer[start..end].chunks(16).enumerate() {
        let addr = start + row * 16;
        let mut line = format!("{:04x}: ", addr);
        let mut chars = String::new();
        for &byte in chunk {
            line.push_str(&format!("{:02x} ", byte));
            let c = byte as char;
            chars.push(if c.is_ascii_graphic() || c == ' ' {
                c
            } else {
                '.'
            });
        }

        str.push_str(&format!("{:<54} {}\n", line, chars));
    }

    str
}
