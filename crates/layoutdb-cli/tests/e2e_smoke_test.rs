use std::{
    fs,
    io::Write,
    path::PathBuf,
};

use tempfile::tempdir;

use layoutdb::{LayoutDbError, encode::decode_raw};
use layoutdb_cli::{Args, run};

fn designs_dir() -> PathBuf {
    // Sample designs live at the workspace root
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("designs")
}

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

fn args(input: PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        compress: false,
        pretty: false,
        def: None,
        lef: Vec::new(),
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_designs() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let designs = collect_json_files(designs_dir());
    assert!(!designs.is_empty(), "No sample designs found in designs/");

    let mut failed = Vec::new();
    for design_path in &designs {
        let output_filename = format!(
            "{}.out.json",
            design_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        match run(&args(design_path.clone(), output_path.clone())) {
            Ok(()) => {
                let reread = decode_raw(&fs::read(&output_path).unwrap()).unwrap();
                assert!(
                    reread.instance_pins.iter().all(|pin| pin.net.is_none()),
                    "{} kept a pin back edge",
                    design_path.display()
                );
            }
            Err(err) => failed.push((design_path.clone(), err)),
        }
    }

    if !failed.is_empty() {
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} sample design(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_designs() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let designs = collect_json_files(designs_dir().join("errors"));
    assert!(!designs.is_empty(), "No error designs found in designs/errors/");

    for design_path in &designs {
        let output_path = temp_dir.path().join("never.json");
        let result = run(&args(design_path.clone(), output_path.clone()));

        assert!(
            matches!(result, Err(LayoutDbError::Graph(_))),
            "{} should fail resolution, got {:?}",
            design_path.display(),
            result
        );
        assert!(!output_path.exists(), "no output is written on failure");
    }
}

#[test]
fn e2e_compressed_output() {
    let temp_dir = tempdir().unwrap();
    let output_path = temp_dir.path().join("gcd.json.gz");

    let mut args = args(designs_dir().join("gcd.raw.json"), output_path.clone());
    args.compress = true;
    run(&args).unwrap();

    let bytes = fs::read(&output_path).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

    let reread = decode_raw(&bytes).unwrap();
    assert_eq!(reread.name.as_deref(), Some("gcd"));
    assert_eq!(reread.nets.len(), 2);
}

#[test]
fn e2e_config_file_policies_apply() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let mut config = fs::File::create(&config_path).unwrap();
    writeln!(config, "[resolve]\non_dangling = \"mark_missing\"").unwrap();

    let output_path = temp_dir.path().join("dangling.json");
    let mut args = args(designs_dir().join("errors/dangling_net.raw.json"), output_path.clone());
    args.config = Some(config_path.to_string_lossy().to_string());
    run(&args).unwrap();

    let written = decode_raw(&fs::read(&output_path).unwrap()).unwrap();
    let pin = &written.block_pins[0];
    assert_eq!(pin.name, "in");
    assert!(pin.net.is_none(), "back edge to the net should be dropped");

    let floating = written.nets[0].pins[0].as_stub().unwrap();
    assert_eq!(floating.id().as_raw(), 7);
    assert!(floating.is_dangling());
}

#[test]
fn e2e_design_files_are_checked() {
    let temp_dir = tempdir().unwrap();
    let def_path = temp_dir.path().join("gcd.def");
    fs::write(&def_path, "VERSION 5.8 ;\nDESIGN gcd ;\nEND DESIGN\n").unwrap();

    let mut good = args(
        designs_dir().join("gcd.raw.json"),
        temp_dir.path().join("gcd.json"),
    );
    good.def = Some(def_path.to_string_lossy().to_string());
    good.lef = vec!["tech.lef:tech".parse().unwrap(), "cells.lef:lib".parse().unwrap()];
    run(&good).unwrap();

    let mut bad = good;
    bad.lef = vec!["cells.lef:lib".parse().unwrap()];
    let result = run(&bad);
    assert!(matches!(result, Err(LayoutDbError::Files(_))));
}
