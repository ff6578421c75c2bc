//! PNG encoding for rendered pages.
//!
//! Two encoding modes:
//! - indexed (color type 3) when the page has at most 256 unique colors,
//!   which pseudocolor panels over a stop palette usually satisfy;
//! - RGBA (color type 6) as the general fallback.
//!
//! `write_page` picks automatically.

use std::collections::HashMap;
use std::io::Write as _;
use std::path::Path;

use rayon::prelude::*;

use crate::canvas::Canvas;
use crate::error::{RenderError, Result};

/// Maximum palette entries for an indexed PNG.
const MAX_PALETTE: usize = 256;

/// Minimum pixel count before palette extraction goes parallel.
const PARALLEL_THRESHOLD: usize = 4096;

/// Encode a canvas and write it to `path`.
pub fn write_page(canvas: &Canvas, path: impl AsRef<Path>) -> Result<()> {
    let bytes = encode_auto(
        canvas.pixels(),
        canvas.width() as usize,
        canvas.height() as usize,
    )?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Encode RGBA pixels, choosing indexed or full-color automatically.
pub fn encode_auto(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    match extract_palette(pixels) {
        Some((palette, indices)) => encode_indexed(width, height, &palette, &indices),
        None => encode_rgba(pixels, width, height),
    }
}

#[inline(always)]
fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

#[inline(always)]
fn unpack(packed: u32) -> (u8, u8, u8, u8) {
    (
        packed as u8,
        (packed >> 8) as u8,
        (packed >> 16) as u8,
        (packed >> 24) as u8,
    )
}

type Palette = Vec<(u8, u8, u8, u8)>;

/// Map pixels to a palette of at most 256 colors, or None when there are
/// too many. Large images collect candidate colors in parallel first.
fn extract_palette(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let num_pixels = pixels.len() / 4;
    if num_pixels < PARALLEL_THRESHOLD {
        return extract_sequential(pixels);
    }

    // Parallel pass: unique colors per chunk, bailing early past the limit.
    let chunk_size = (num_pixels / rayon::current_num_threads()).max(256) * 4;
    let candidates: Vec<u32> = pixels
        .par_chunks(chunk_size)
        .flat_map(|chunk| {
            let mut local: HashMap<u32, ()> = HashMap::with_capacity(MAX_PALETTE);
            for px in chunk.chunks_exact(4) {
                local.insert(pack(px[0], px[1], px[2], px[3]), ());
                if local.len() > MAX_PALETTE {
                    break;
                }
            }
            local.into_keys().collect::<Vec<_>>()
        })
        .collect();

    let mut color_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE);
    let mut palette: Palette = Vec::with_capacity(MAX_PALETTE);
    for packed in candidates {
        if !color_index.contains_key(&packed) {
            if palette.len() >= MAX_PALETTE {
                return None;
            }
            color_index.insert(packed, palette.len() as u8);
            palette.push(unpack(packed));
        }
    }

    // Second parallel pass: map every pixel to its palette index.
    let mut indices = vec![0u8; num_pixels];
    indices
        .par_chunks_mut(chunk_size / 4)
        .enumerate()
        .for_each(|(chunk_idx, out)| {
            let start = chunk_idx * (chunk_size / 4) * 4;
            for (i, idx) in out.iter_mut().enumerate() {
                let off = start + i * 4;
                if off + 3 < pixels.len() {
                    let packed = pack(pixels[off], pixels[off + 1], pixels[off + 2], pixels[off + 3]);
                    *idx = *color_index.get(&packed).unwrap_or(&0);
                }
            }
        });

    Some((palette, indices))
}

fn extract_sequential(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let mut color_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE);
    let mut palette: Palette = Vec::with_capacity(MAX_PALETTE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let packed = pack(px[0], px[1], px[2], px[3]);
        let idx = match color_index.get(&packed) {
            Some(&i) => i,
            None => {
                if palette.len() >= MAX_PALETTE {
                    return None;
                }
                let i = palette.len() as u8;
                color_index.insert(packed, i);
                palette.push((px[0], px[1], px[2], px[3]));
                i
            }
        };
        indices.push(idx);
    }
    Some((palette, indices))
}

/// Indexed PNG, color type 3.
pub fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8, u8)],
    indices: &[u8],
) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    png.extend_from_slice(&[137, 80, 78, 71, 13, 10, 26, 10]);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.extend_from_slice(&[8, 3, 0, 0, 0]); // depth, indexed, deflate, none, none
    write_chunk(&mut png, b"IHDR", &ihdr);

    let mut plte = Vec::with_capacity(palette.len() * 3);
    for (r, g, b, _) in palette {
        plte.extend_from_slice(&[*r, *g, *b]);
    }
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|(_, _, _, a)| *a < 255) {
        let trns: Vec<u8> = palette.iter().map(|(_, _, _, a)| *a).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(indices, width, height, 1)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Full-color PNG, color type 6.
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    png.extend_from_slice(&[137, 80, 78, 71, 13, 10, 26, 10]);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
    write_chunk(&mut png, b"IHDR", &ihdr);

    let idat = deflate_scanlines(pixels, width, height, 4)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Prepend the per-scanline filter byte (0 = none) and zlib-compress.
fn deflate_scanlines(data: &[u8], width: usize, height: usize, bpp: usize) -> Result<Vec<u8>> {
    let stride = width * bpp;
    let mut raw = Vec::with_capacity(height * (1 + stride));
    for y in 0..height {
        raw.push(0);
        raw.extend_from_slice(&data[y * stride..(y + 1) * stride]);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&raw)
        .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| RenderError::PngEncode(e.to_string()))
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);
    let crc_input = [chunk_type.as_slice(), data].concat();
    png.extend_from_slice(&crc32fast::hash(&crc_input).to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

    #[test]
    fn test_palette_extraction() {
        let pixels = [
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, 255, 255, // blue
            255, 0, 0, 255, // red again
        ];
        let (palette, indices) = extract_sequential(&pixels).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(indices.len(), 4);
        assert_eq!(indices[0], indices[3]);
    }

    #[test]
    fn test_palette_overflow() {
        // 300 unique grays exceed the indexed limit once alpha varies too.
        let mut pixels = Vec::new();
        for i in 0..300u32 {
            pixels.extend_from_slice(&[(i % 256) as u8, (i / 256) as u8, 0, 255]);
        }
        assert!(extract_sequential(&pixels).is_none());
    }

    #[test]
    fn test_parallel_extraction_matches() {
        // Large image with a small palette triggers the parallel path.
        let mut pixels = Vec::with_capacity(128 * 128 * 4);
        for y in 0..128u32 {
            for x in 0..128u32 {
                let c = (((x / 8) + (y / 8)) % 40) as u8;
                pixels.extend_from_slice(&[c * 5, 100 + c * 3, 200 - c * 2, 255]);
            }
        }
        let (palette, indices) = extract_palette(&pixels).unwrap();
        assert!(palette.len() <= 40);
        assert_eq!(indices.len(), 128 * 128);
        // Every index must map back to the pixel's color.
        for (i, px) in pixels.chunks_exact(4).enumerate() {
            let (r, g, b, a) = palette[indices[i] as usize];
            assert_eq!([r, g, b, a], [px[0], px[1], px[2], px[3]]);
        }
    }

    #[test]
    fn test_indexed_png_structure() {
        let pixels = [255, 0, 0, 255, 0, 0, 255, 255, 255, 0, 0, 255, 0, 0, 255, 255];
        let png = encode_auto(&pixels, 2, 2).unwrap();
        assert_eq!(&png[..8], &SIGNATURE);
        // IHDR color type: indexed.
        assert_eq!(png[8 + 4 + 4 + 9], 3);
        assert!(png.windows(4).any(|w| w == b"PLTE"));
        assert!(png.windows(4).any(|w| w == b"IEND"));
    }

    #[test]
    fn test_rgba_png_structure() {
        let pixels = [10, 20, 30, 255, 40, 50, 60, 255];
        let png = encode_rgba(&pixels, 2, 1).unwrap();
        assert_eq!(&png[..8], &SIGNATURE);
        assert_eq!(png[8 + 4 + 4 + 9], 6);
        assert!(!png.windows(4).any(|w| w == b"PLTE"));
    }

    #[test]
    fn test_write_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        let canvas = Canvas::new(16, 16, [255, 255, 255, 255]);
        write_page(&canvas, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &SIGNATURE);
    }
}
