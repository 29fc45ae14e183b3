//! Confetti burst shown after a successful submission.

use rand::Rng;

const GLYPHS: &[char] = &['*', '+', '•', '✦', '◆', '~', 'o', '°'];

/// Chance that a cell holds a glyph rather than a space.
const DENSITY: f64 = 0.35;

/// Render `rows` lines of `width` cells of scattered confetti.
pub fn burst<R: Rng + ?Sized>(rng: &mut R, width: usize, rows: usize) -> String {
    let mut lines = Vec::with_capacity(rows);
    for _ in 0..rows {
        let line: String = (0..width)
            .map(|_| {
                if rng.gen_bool(DENSITY) {
                    GLYPHS[rng.gen_range(0..GLYPHS.len())]
                } else {
                    ' '
                }
            })
            .collect();
        lines.push(line);
    }
    lines.join("\n")
}
