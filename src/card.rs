use crate::engine::EndCause;
use crate::session::RoundSummary;

pub const CARD_WIDTH: u32 = 240;
pub const CARD_HEIGHT: u32 = 160;

type Rgb = [u8; 3];

// Jelly palette
const BACKGROUND: Rgb = [0xFF, 0xF0, 0xF5];
const SNAKE_HEAD: Rgb = [0xFF, 0x6B, 0x9D];
const SNAKE_BODY: Rgb = [0xFF, 0x9A, 0x9E];
const FOOD: Rgb = [0x18, 0xDC, 0xFF];
const FOOD_STAR: Rgb = [0xFF, 0xC3, 0x12];
const INK: Rgb = [0x4A, 0x2C, 0x3F];
const CLEARED: Rgb = [0x2E, 0xCC, 0x71];

// 3x5 digit glyphs, one row per byte, high bit on the left.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

const SCORE_SCALE: u32 = 8;
const BEST_SCALE: u32 = 4;

fn cause_color(cause: EndCause) -> Rgb {
    match cause {
        EndCause::WallCollision => FOOD,
        EndCause::SelfCollision => SNAKE_HEAD,
        EndCause::TimeUp => FOOD_STAR,
        EndCause::BoardFull => CLEARED,
    }
}

/// Pixel width of `value` drawn with the digit font at `scale`.
pub fn number_width(value: u32, scale: u32) -> u32 {
    let digits = value.to_string().len() as u32;
    digits * 3 * scale + digits.saturating_sub(1) * scale
}

/// A rasterized result card for sharing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultCard {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl ResultCard {
    fn blank(width: u32, height: u32, color: Rgb) -> Self {
        Self { width, height, pixels: vec![color; (width * height) as usize] }
    }

    pub fn render(summary: &RoundSummary) -> Self {
        let mut card = Self::blank(CARD_WIDTH, CARD_HEIGHT, BACKGROUND);

        // Frame and cause band
        card.fill_rect(0, 0, CARD_WIDTH, 4, SNAKE_HEAD);
        card.fill_rect(0, CARD_HEIGHT - 4, CARD_WIDTH, 4, SNAKE_HEAD);
        card.fill_rect(0, 0, 4, CARD_HEIGHT, SNAKE_HEAD);
        card.fill_rect(CARD_WIDTH - 4, 0, 4, CARD_HEIGHT, SNAKE_HEAD);
        card.fill_rect(4, 8, CARD_WIDTH - 8, 12, cause_color(summary.cause));

        let score_w = number_width(summary.score, SCORE_SCALE);
        let score_x = CARD_WIDTH.saturating_sub(score_w) / 2;
        card.draw_number(summary.score, score_x, 34, SCORE_SCALE, INK);
        if summary.new_best {
            card.fill_rect(score_x + score_w + 8, 34, 12, 12, FOOD_STAR);
        }

        // Best score, prefixed with a star swatch
        let best_w = number_width(summary.high_score, BEST_SCALE);
        let best_x = CARD_WIDTH.saturating_sub(best_w + 16) / 2;
        card.fill_rect(best_x, 98, 10, 10, FOOD_STAR);
        card.draw_number(summary.high_score, best_x + 16, 94, BEST_SCALE, INK);

        // Snake motif along the bottom, one segment per level
        let mut x = 16;
        for i in 0..=summary.level.number() as u32 {
            let color = if i == summary.level.number() as u32 { SNAKE_HEAD } else { SNAKE_BODY };
            card.fill_rect(x, 130, 12, 12, color);
            x += 14;
        }
        card.fill_rect(x + 10, 132, 8, 8, FOOD);

        card
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for py in y.min(y_end)..y_end {
            for px in x.min(x_end)..x_end {
                self.pixels[(py * self.width + px) as usize] = color;
            }
        }
    }

    fn draw_number(&mut self, value: u32, x: u32, y: u32, scale: u32, color: Rgb) {
        let mut cursor = x;
        for ch in value.to_string().bytes() {
            let glyph = DIGITS[(ch - b'0') as usize];
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..3u32 {
                    if bits & (0b100 >> col) != 0 {
                        self.fill_rect(cursor + col * scale, y + row as u32 * scale, scale, scale, color);
                    }
                }
            }
            cursor += 4 * scale;
        }
    }

    /// Uncompressed 24-bit BMP, bottom-up rows padded to four bytes.
    pub fn to_bmp(&self) -> Vec<u8> {
        let row_bytes = self.width * 3;
        let padding = (4 - row_bytes % 4) % 4;
        let image_size = (row_bytes + padding) * self.height;
        let offset: u32 = 14 + 40;
        let file_size = offset + image_size;

        let mut data: Vec<u8> = Vec::with_capacity(file_size as usize);
        // File header
        data.extend_from_slice(b"BM");
        data.extend_from_slice(&file_size.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes()); // reserved
        data.extend_from_slice(&offset.to_le_bytes());
        // BITMAPINFOHEADER
        data.extend_from_slice(&40u32.to_le_bytes());
        data.extend_from_slice(&(self.width as i32).to_le_bytes());
        data.extend_from_slice(&(self.height as i32).to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes()); // planes
        data.extend_from_slice(&24u16.to_le_bytes()); // bits per pixel
        data.extend_from_slice(&0u32.to_le_bytes()); // no compression
        data.extend_from_slice(&image_size.to_le_bytes());
        data.extend_from_slice(&2835u32.to_le_bytes()); // 72 dpi
        data.extend_from_slice(&2835u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes()); // palette size
        data.extend_from_slice(&0u32.to_le_bytes()); // important colors

        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let [r, g, b] = self.pixels[(y * self.width + x) as usize];
                data.extend_from_slice(&[b, g, r]);
            }
            data.extend(std::iter::repeat_n(0u8, padding as usize));
        }
        data
    }
}
