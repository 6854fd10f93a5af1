use std::env;
use std::time::Duration;

use sharpgate::{FrameGate, LumaBuffer, LumaFrame, SharpGateConfig, SharpnessEvaluator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    sharpgate::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: sharpgate-cli <command> [args]");
        eprintln!("Commands: analyze <image> [--threshold T] [--json]");
        eprintln!("          gate <image...> [--threshold T] [--json]");
        std::process::exit(1);
    }

    let command = &args[1];
    match command.as_str() {
        "analyze" => cmd_analyze(&args),
        "gate" => cmd_gate(&args),
        _ => {
            eprintln!("Unknown command: {}", command);
            std::process::exit(1);
        }
    }
}

fn parse_threshold(args: &[String]) -> Result<f32, Box<dyn std::error::Error>> {
    if let Some(pos) = args.iter().position(|a| a == "--threshold") {
        let value = args
            .get(pos + 1)
            .ok_or("--threshold requires a value")?;
        Ok(value.parse()?)
    } else {
        Ok(SharpGateConfig::load_or_default().evaluator.pass_threshold)
    }
}

fn load_luma(path: &str) -> Result<LumaBuffer, Box<dyn std::error::Error>> {
    let img = image::open(path)?;
    Ok(LumaBuffer::from_image(&img)?)
}

fn cmd_analyze(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    if args.len() < 3 {
        eprintln!("Usage: sharpgate-cli analyze <image> [--threshold T] [--json]");
        std::process::exit(1);
    }
    let path = &args[2];
    let threshold = parse_threshold(args)?;

    let buffer = load_luma(path)?;
    let evaluator = SharpnessEvaluator::new(threshold)?;
    let result = evaluator.evaluate(&buffer.as_plane());

    if args.contains(&"--json".to_string()) {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!(
            "{}: {}x{} std_dev {:.2} mean {:.2} level {:?} -> {}",
            path,
            buffer.width(),
            buffer.height(),
            result.std_dev,
            result.mean,
            result.level,
            if result.passed { "PASS" } else { "REJECT" }
        );
    }
    Ok(())
}

fn cmd_gate(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let paths: Vec<&String> = args[2..]
        .iter()
        .take_while(|a| !a.starts_with("--"))
        .collect();
    if paths.is_empty() {
        eprintln!("Usage: sharpgate-cli gate <image...> [--threshold T] [--json]");
        std::process::exit(1);
    }
    let threshold = parse_threshold(args)?;

    let evaluator = SharpnessEvaluator::new(threshold)?;
    let mut gate = FrameGate::new(evaluator);

    let total = paths.len();
    for path in paths {
        let buffer = load_luma(path)?;
        if !gate.submit(LumaFrame::new(buffer, path.to_string())) {
            eprintln!("Queue full, dropped {}", path);
        }
    }

    let mut passed = Vec::new();
    while passed.len() < total {
        match gate.next_timeout(Duration::from_millis(500)) {
            Some(gated) => passed.push(gated),
            None => break, // remaining frames were rejected
        }
    }
    gate.stop();

    let stats = gate.stats();
    if args.contains(&"--json".to_string()) {
        println!("{}", serde_json::to_string(&stats)?);
    } else {
        for gated in &passed {
            println!(
                "PASS {} (std_dev {:.2})",
                gated.frame.source_id, gated.result.std_dev
            );
        }
        println!(
            "{} submitted, {} passed, {} rejected, {} dropped",
            stats.submitted, stats.passed, stats.rejected, stats.dropped
        );
    }
    Ok(())
}
