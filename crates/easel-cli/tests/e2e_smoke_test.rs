use std::{fs, path::PathBuf};

use tempfile::tempdir;

use easel_cli::{Args, run};

/// Collects all .json files from a directory
fn collect_scene_files(dir: PathBuf) -> Vec<PathBuf> {
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

    // Sort for consistent test output
    files.sort();
    files
}

/// Demos live at the workspace root, not in the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
        theme: None,
        scale: 1.0,
        no_background: false,
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_demos = collect_scene_files(demos_path());

    assert!(!valid_demos.is_empty(), "No demo scenes found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let stem = demo_path.file_stem().unwrap().to_string_lossy().to_string();

        let svg_path = temp_dir.path().join(format!("{stem}.svg"));
        match run(&args_for(demo_path, svg_path.clone())) {
            Ok(()) => {
                let svg = fs::read_to_string(&svg_path).expect("SVG output written");
                assert!(svg.contains("<svg"), "{} produced no SVG root", demo_path.display());
            }
            Err(e) => failed_demos.push((demo_path.clone(), "svg", e)),
        }

        let png_path = temp_dir.path().join(format!("{stem}.png"));
        match run(&args_for(demo_path, png_path.clone())) {
            Ok(()) => {
                let png = fs::read(&png_path).expect("PNG output written");
                assert!(png.starts_with(b"\x89PNG"), "{} produced no PNG", demo_path.display());
            }
            Err(e) => failed_demos.push((demo_path.clone(), "png", e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, format, err) in &failed_demos {
            eprintln!("  - {} ({format}): {}", path.display(), err);
        }
        panic!("{} demo export(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} demos exported", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_scene_files(demos_path().join("errors"));

    assert!(!error_demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join(format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args_for(demo_path, output_path.clone())).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
        assert!(!output_path.exists(), "{} left a partial output", demo_path.display());
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!("{} error demo(s) succeeded unexpectedly", unexpectedly_succeeded.len());
    }

    println!("✅ All {} error demos failed as expected", error_demos.len());
}

#[test]
fn e2e_overrides_apply() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demo = demos_path().join("shapes.json");

    let output = temp_dir.path().join("dark.svg");
    let mut args = args_for(&demo, output.clone());
    args.theme = Some(easel_core::config::Theme::Dark);
    args.no_background = true;
    run(&args).expect("export succeeds");

    let light_output = temp_dir.path().join("light.svg");
    run(&args_for(&demo, light_output.clone())).expect("export succeeds");

    let dark = fs::read_to_string(output).unwrap();
    let light = fs::read_to_string(light_output).unwrap();
    assert_ne!(dark, light);
}
