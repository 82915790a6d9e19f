//! Text operator generation

use crate::fmt_coord;

/// Line leading for a text block, in points
///
/// Matches the common 1.2 em default, so a 10 pt block advances 12 pt
/// per line.
pub fn line_leading(font_size: f64) -> f64 {
    font_size * 1.2
}

/// Encode text as a PDF literal string
///
/// Backslash and parentheses are escaped. Characters outside the
/// Latin-1 range cannot be represented with a WinAnsi-encoded base font
/// and are replaced with `?` rather than rejected.
pub fn encode_literal(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    for c in text.chars() {
        match c {
            '(' => out.extend_from_slice(b"\\("),
            ')' => out.extend_from_slice(b"\\)"),
            '\\' => out.extend_from_slice(b"\\\\"),
            '\n' => out.extend_from_slice(b"\\n"),
            '\r' => out.extend_from_slice(b"\\r"),
            c if (c as u32) < 256 => out.push(c as u8),
            _ => out.push(b'?'),
        }
    }
    out.push(b')');
    out
}

/// Generate PDF operators for a block of text lines
///
/// Produces a single text object: the first line starts at `(x, y)` and
/// every following line is offset downward by the block's leading using
/// a relative `Td`.
///
/// # Arguments
/// * `lines` - Lines of text, drawn top to bottom
/// * `x` - X coordinate of the first line in points
/// * `y` - Y coordinate of the first line's baseline in points (from bottom)
/// * `font_resource` - Font resource name (e.g., "F1")
/// * `font_size` - Font size in points
///
/// # Returns
/// PDF content stream operators as bytes
pub fn text_block_operators<S: AsRef<str>>(
    lines: &[S],
    x: f64,
    y: f64,
    font_resource: &str,
    font_size: f64,
) -> Vec<u8> {
    let mut ops = Vec::new();

    ops.extend_from_slice(b"BT\n");
    ops.extend_from_slice(
        format!("/{} {} Tf\n", font_resource, fmt_coord(font_size)).as_bytes(),
    );
    ops.extend_from_slice(format!("{} {} Td\n", fmt_coord(x), fmt_coord(y)).as_bytes());

    let leading = fmt_coord(line_leading(font_size));
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            ops.extend_from_slice(format!("0 -{leading} Td\n").as_bytes());
        }
        ops.extend_from_slice(&encode_literal(line.as_ref()));
        ops.extend_from_slice(b" Tj\n");
    }

    ops.extend_from_slice(b"ET\n");
    ops
}
