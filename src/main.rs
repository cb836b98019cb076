//! Headless spin driver
//!
//! Stands in for the animation loop of an embedding UI: builds a wheel,
//! spins it, ticks the engine at a fixed rate and prints one JSON line per
//! outcome. Useful for eyeballing the feel of tuning changes.
//!
//! ```text
//! hellwheel [LABEL]... [--chaos] [--seed N] [--spins N] [--strength X]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use hellwheel::consts::DEFAULT_DT;
    use hellwheel::{Tuning, WheelEngine};

    env_logger::init();

    let mut labels: Vec<String> = Vec::new();
    let mut seed: Option<u64> = None;
    let mut spins = 1u32;
    let mut strength = 1.0f32;
    let mut chaos = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--chaos" => chaos = true,
            "--seed" => seed = args.next().and_then(|v| v.parse().ok()),
            "--spins" => {
                spins = args.next().and_then(|v| v.parse().ok()).unwrap_or(spins);
            }
            "--strength" => {
                strength = args.next().and_then(|v| v.parse().ok()).unwrap_or(strength);
            }
            _ => labels.push(arg),
        }
    }

    if labels.is_empty() {
        labels = ["Pizza", "Sushi", "Tacos", "Ramen", "Burgers", "Salad"]
            .iter()
            .map(|s| s.to_string())
            .collect();
    }

    let seed = seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    log::info!(
        "hellwheel: seed={seed}, sectors={}, chaos={chaos}",
        labels.len()
    );

    let mut engine = WheelEngine::with_seed(Tuning::default(), seed);
    engine.set_labels(&labels);
    engine.on_hit(|intensity| log::debug!("tooth hit, intensity {intensity:.2}"));

    for spin in 0..spins {
        engine.spin(strength, chaos);
        let mut ticks = 0u64;
        while engine.is_spinning() {
            engine.step(DEFAULT_DT);
            ticks += 1;
        }
        if let Some(outcome) = engine.last_outcome() {
            let line = serde_json::json!({
                "spin": spin,
                "index": outcome.index,
                "label": outcome.label,
                "ticks": ticks,
                "seconds": (ticks as f32 * DEFAULT_DT * 100.0).round() / 100.0,
            });
            println!("{line}");
        } else {
            log::warn!("spin {spin} produced no outcome (empty wheel?)");
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is platform-agnostic; the demo driver is native-only
}
