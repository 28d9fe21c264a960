//! LayoutDB CLI library
//!
//! This module contains the core CLI logic for the LayoutDB conversion tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use log::{info, warn};

use layoutdb::{DesignBuilder, LayoutDbError, encode::write_atomic, files::DesignFiles};

/// Run the LayoutDB CLI application
///
/// This function reads the parser dump, converts it through the resolve
/// and compact stages, and writes the encoded result to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `LayoutDbError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Design file validation errors
/// - Malformed input
/// - Resolution errors
pub fn run(args: &Args) -> Result<(), LayoutDbError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing design"
    );

    // Load configuration; flags only switch output options on
    let app_config = config::load_config(args.config.as_ref())?;
    let output = app_config
        .output()
        .with_compress(args.compress)
        .with_pretty(args.pretty);
    let builder = DesignBuilder::new(app_config.with_output(output));

    let raw = builder.read_raw_file(&args.input)?;

    if let Some(def) = &args.def {
        let mut files = DesignFiles::new();
        files.add_def(def)?;
        for lef in &args.lef {
            files.add_lef(lef.clone());
        }
        let def_name = files.def_design_name()?;
        if raw.name.as_deref() != Some(def_name.as_str()) {
            warn!(
                def_design = def_name,
                input_design:? = raw.name;
                "Input design name differs from the DEF file"
            );
        }
    }

    let compacted = builder.convert(&raw)?;
    let bytes = builder.encode(&compacted)?;
    write_atomic(&args.output, &bytes)?;

    let counts = compacted.design().counts();
    info!(
        output_file = args.output,
        instances = counts.instances,
        nets = counts.nets,
        pins = counts.instance_pins + counts.block_pins,
        bytes = bytes.len();
        "Design exported successfully"
    );

    Ok(())
}
