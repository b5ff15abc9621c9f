//! mistake-capture CLI.
//!
//! Runs one photo through the capture flow: ingest, crop, adaptive
//! recognition, normalization. Prints the question text and optionally
//! writes the storage crop.
//!
//! Usage:
//!   mistake-capture <image>                          Default crop, general tier
//!   mistake-capture <image> --crop 0.1,0.2,0.8,0.5   Explicit normalized crop
//!   mistake-capture <image> --constrained            Constrained-tier caps
//!   mistake-capture <image> --viewport 390x520       Element size the crop refers to
//!   mistake-capture <image> --out crop.jpg           Write the storage crop
//!   mistake-capture --normalize-only <text-file>     Just run text normalization
//!   mistake-capture --save-key <key>                 Store the vision API key in the OS keychain

use mistake_capture::{
    llm::{provider, VisionRecognizer}, normalize_math_like_text, CaptureSession, CropBox, PlatformTier,
    RecognitionConfig, SmartRecognizer, Viewport,
};
use std::path::PathBuf;

struct Args {
    input: PathBuf,
    crop: Option<CropBox>,
    viewport: Option<Viewport>,
    out: Option<PathBuf>,
    constrained: bool,
    normalize_only: bool,
    save_key: Option<String>,
}

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  mistake-capture <image> [--crop x,y,w,h] [--viewport WxH] [--constrained] [--out path]");
    eprintln!("  mistake-capture --normalize-only <text-file>");
    eprintln!("  mistake-capture --save-key <key>");
    std::process::exit(1);
}

/// `x,y,w,h` fractions. Boxes outside the unit square or below the minimum
/// crop size are rejected.
fn parse_crop(value: &str) -> Option<CropBox> {
    let parts: Vec<f64> = value.split(',').map(|p| p.trim().parse().ok()).collect::<Option<_>>()?;
    match parts.as_slice() {
        [x, y, w, h] => Some(CropBox::new(*x, *y, *w, *h)).filter(CropBox::is_valid),
        _ => None,
    }
}

fn parse_viewport(value: &str) -> Option<Viewport> {
    let (w, h) = value.split_once('x')?;
    Some(Viewport::new(w.trim().parse().ok()?, h.trim().parse().ok()?))
}

fn parse_args() -> Args {
    let mut raw = std::env::args().skip(1);
    let mut args = Args {
        input: PathBuf::new(),
        crop: None,
        viewport: None,
        out: None,
        constrained: false,
        normalize_only: false,
        save_key: None,
    };
    let mut input = None;

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--crop" => {
                let value = raw.next().unwrap_or_else(|| usage());
                args.crop = Some(parse_crop(&value).unwrap_or_else(|| {
                    eprintln!("Invalid crop {:?}: need x,y,w,h inside [0,1], w >= 0.16, h >= 0.08", value);
                    usage()
                }))
            }
            "--viewport" => {
                args.viewport = Some(raw.next().and_then(|v| parse_viewport(&v)).unwrap_or_else(|| usage()))
            }
            "--out" => args.out = Some(raw.next().map(PathBuf::from).unwrap_or_else(|| usage())),
            "--constrained" => args.constrained = true,
            "--normalize-only" => args.normalize_only = true,
            "--save-key" => args.save_key = Some(raw.next().unwrap_or_else(|| usage())),
            "-h" | "--help" => usage(),
            other if other.starts_with("--") => {
                eprintln!("Unknown flag: {}", other);
                usage();
            }
            other => input = Some(PathBuf::from(other)),
        }
    }

    match (input, &args.save_key) {
        (Some(path), _) => args.input = path,
        (None, Some(_)) => {}
        (None, None) => usage(),
    }
    args
}

#[tokio::main]
async fn main() {
    mistake_capture::load_env_files();
    env_logger::init();

    let args = parse_args();

    if let Some(key) = &args.save_key {
        if let Err(e) = provider::save_api_key(key.trim()) {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        eprintln!("Vision API key saved");
        return;
    }

    if args.normalize_only {
        match std::fs::read_to_string(&args.input) {
            Ok(raw) => println!("{}", normalize_math_like_text(&raw)),
            Err(e) => {
                eprintln!("Failed to read {}: {}", args.input.display(), e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut config = RecognitionConfig::from_env();
    if args.constrained {
        config = RecognitionConfig::for_tier(PlatformTier::Constrained);
    }

    if !provider::is_configured() {
        eprintln!("No vision API key. Set VISION_API_KEY or run with --save-key <key>.");
        std::process::exit(1);
    }
    let recognizer = match VisionRecognizer::from_env(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Recognition service unavailable: {}", e);
            std::process::exit(1);
        }
    };

    let bytes = match std::fs::read(&args.input) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args.input.display(), e);
            std::process::exit(1);
        }
    };

    let mut session = CaptureSession::new(SmartRecognizer::new(recognizer, config));
    if let Err(e) = session.load_image(&bytes) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    if let Some(crop) = args.crop {
        session.set_crop(crop);
    }

    // Without a host layout, the crop refers to the image at natural size.
    let viewport = match (args.viewport, session.image()) {
        (Some(v), _) => v,
        (None, Some(image)) => Viewport::fitted(image.natural_size()),
        (None, None) => usage(),
    };

    let start = std::time::Instant::now();
    match session.finish(viewport).await {
        Ok(captured) => {
            log::info!(
                "[PIPELINE] Done in {}ms after {} recognition pass(es)",
                start.elapsed().as_millis(),
                session.recognize_attempts()
            );
            println!("{}", captured.question);
            if let Some(out) = args.out {
                match std::fs::write(&out, &captured.image.bytes) {
                    Ok(_) => eprintln!("Wrote {}x{} crop to {}", captured.image.width, captured.image.height, out.display()),
                    Err(e) => {
                        eprintln!("Failed to write {}: {}", out.display(), e);
                        std::process::exit(1);
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("{} ({})", session.error_text().unwrap_or("Recognition failed"), e);
            std::process::exit(1);
        }
    }
}
