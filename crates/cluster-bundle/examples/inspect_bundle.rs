//! Simple inspector for bundle files.
//!
//! Reads a bundle in YAML, JSON or text form (chosen by file extension),
//! prints its index and images, and optionally re-encodes it.
//!
//! ```text
//! cargo run --example inspect_bundle -- bundle.yaml [yaml|json|text]
//! ```

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use cluster_bundle::codec::BUNDLE;
use cluster_bundle::{Bundle, BundleFinder, ContainerImages, FormatError};

fn decode(path: &Path, data: &[u8]) -> Result<Bundle, FormatError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => BUNDLE.from_json(data),
        Some("txt" | "textpb" | "pbtxt") => BUNDLE.from_text(data),
        _ => BUNDLE.from_yaml(data),
    }
}

fn encode(bundle: &Bundle, format: &str) -> Result<Vec<u8>, FormatError> {
    match format {
        "json" => BUNDLE.to_json(bundle),
        "text" => BUNDLE.to_text(bundle),
        _ => BUNDLE.to_yaml(bundle),
    }
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: inspect_bundle <file> [yaml|json|text]");
        return ExitCode::FAILURE;
    };
    let output_format = args.next();
    let path = Path::new(&path);

    println!("Reading: {}", path.display());
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("failed to read {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };
    println!("File size: {} bytes", data.len());

    let bundle = match decode(path, &data) {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("failed to decode: {e}");
            return ExitCode::FAILURE;
        }
    };

    let finder = match BundleFinder::new(&bundle) {
        Ok(finder) => finder,
        Err(e) => {
            eprintln!("invalid bundle: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("\n=== Bundle Info ===");
    println!("Name: {}", bundle.name);
    println!("Version: {}", bundle.version);
    println!("Node configs: {}", finder.node_config_count());
    println!("Components: {}", finder.component_count());
    println!("Objects: {}", finder.component_object_count());

    println!("\n=== Node Configs ===");
    for node in &bundle.node_configs {
        println!("  {} (image: {})", node.name, node.os_image);
    }

    println!("\n=== Components ===");
    for component in &bundle.components {
        println!("  {} {}", component.name, component.version);
        for object in &component.objects {
            let source = match (&object.inlined, &object.file) {
                (Some(payload), _) => format!("inlined, {} fields", payload.len()),
                (None, Some(file)) => format!("file {}", file.url),
                (None, None) => "empty".to_string(),
            };
            println!("    - {} ({source})", object.name);
        }
    }

    match finder.component_images_with(&ContainerImages) {
        Ok(images) if !images.is_empty() => {
            println!("\n=== Images ===");
            for image in images {
                println!("  {} @ {}: {}", image.key, image.object_path.join("."), image.image);
            }
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("failed to collect images: {e}");
            return ExitCode::FAILURE;
        }
    }

    if let Some(format) = output_format {
        match encode(&bundle, &format) {
            Ok(bytes) => println!("\n=== {format} ===\n{}", String::from_utf8_lossy(&bytes)),
            Err(e) => {
                eprintln!("failed to encode: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
