use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use png;
use qrcode::{render::svg, Color, EcLevel, QrCode};
use resvg::render;
use std::sync::Arc;
use tiny_skia::Pixmap;
use usvg::{fontdb, Options, Tree};

lazy_static! {
    // Loaded once; text in rendered SVGs resolves against the system fonts
    static ref FONT_DB: Arc<fontdb::Database> = {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Arc::new(db)
    };
}

/// Generate a standalone QR code SVG for an address
pub fn generate_qr_code(data: &str) -> Result<Vec<u8>> {
    // Create QR code with high error correction
    let code = QrCode::with_error_correction_level(data, EcLevel::H)
        .map_err(|e| anyhow!("Failed to generate QR code: {}", e))?;

    let svg_string = code
        .render()
        .min_dimensions(200, 200)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    Ok(svg_string.into_bytes())
}

/// QR code as a single SVG path of unit squares, for embedding in a larger
/// document. Returns the path data and the module count per side.
pub fn qr_path_data(data: &str) -> Result<(String, usize)> {
    let code = QrCode::with_error_correction_level(data, EcLevel::M)
        .map_err(|e| anyhow!("Failed to generate QR code: {}", e))?;
    let width = code.width();

    let mut path = String::new();
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color == Color::Dark {
            path.push_str(&format!("M{},{}h1v1h-1z", i % width, i / width));
        }
    }

    Ok((path, width))
}

/// Converts SVG (as bytes) to PNG (returns Vec<u8> with PNG data).
pub fn convert_svg_to_png(svg_data: &[u8]) -> Result<Vec<u8>> {
    // 1) Parse SVG using usvg
    let mut opt = Options::default();
    opt.fontdb = FONT_DB.clone();
    let tree = Tree::from_data(svg_data, &opt).map_err(|e| anyhow!("Error parsing SVG: {}", e))?;

    // 2) Get SVG dimensions from the root node
    let svg_size = tree.size();
    let width = svg_size.width() as u32;
    let height = svg_size.height() as u32;

    // 3) Create a Pixmap of the required size
    let mut pixmap =
        Pixmap::new(width, height).ok_or_else(|| anyhow!("Failed to create Pixmap"))?;

    // 4) Render SVG to Pixmap at its original size
    render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    // 5) Encode Pixmap (RGBA) to PNG
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixmap.data())?;
    }

    Ok(png_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_path_only_draws_dark_modules() {
        let (path, width) = qr_path_data("0xabc").unwrap();
        assert!(width >= 21);
        assert!(path.starts_with('M'));
        assert_eq!(path.matches('z').count(), path.matches('M').count());
    }

    #[test]
    fn qr_svg_converts_to_png() {
        let svg = generate_qr_code("0x1").unwrap();
        let png = convert_svg_to_png(&svg).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
