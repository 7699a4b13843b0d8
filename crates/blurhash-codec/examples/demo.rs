//! Encode a synthetic image, then render its placeholder at a few sizes.
//!
//! Run with: cargo run -p blurhash-codec --example demo

use blurhash_codec::{encode, BlurHash, PixelGrid};

fn main() {
    // Red grows to the right, green grows downwards.
    let image = PixelGrid::from_fn(75, 50, |x, y| {
        [(x * 255 / 74) as u8, (y * 255 / 49) as u8, 128]
    });
    println!("source image: {}x{}", image.width(), image.height());

    let hash = match encode(&image, 4, 3) {
        Ok(hash) => hash,
        Err(err) => {
            eprintln!("encode failed: {err}");
            return;
        }
    };
    println!("blurhash: {hash} ({} characters)", hash.len());

    let parsed: BlurHash = match hash.parse() {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("parse failed: {err}");
            return;
        }
    };
    println!("components: {}", parsed.components());
    println!("average colour: {:?}", parsed.average_color());

    for (width, height, punch) in [(8, 6, 1.0), (32, 24, 1.0), (32, 24, 1.5)] {
        match parsed.render(width, height, punch) {
            Ok(thumbnail) => println!(
                "{width}x{height} punch {punch}: top-left {:?}, bottom-right {:?}",
                thumbnail.pixel(0, 0).unwrap_or_default(),
                thumbnail.pixel(width - 1, height - 1).unwrap_or_default()
            ),
            Err(err) => eprintln!("render failed: {err}"),
        }
    }
}
