use std::error::Error;

use serde::Deserialize;
use steadytrack_rs::{config::TrackerConfig, stable_tracker::StableTracker};

const SEQUENCE_JSON_PATH: &str = "data/jsons/jitter_sequence.json";

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct SequenceJson {
    name: String,
    height: f32,
    width: f32,
    frames: Vec<FrameJson>,
}

#[derive(Debug, Deserialize)]
struct FrameJson {
    frame_id: usize,
    detections: Vec<DetectionJson>,
}

#[derive(Debug, Deserialize)]
struct DetectionJson {
    label: usize,
    score: f32,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

fn read_sequence_json(path: &str) -> Result<SequenceJson, Box<dyn Error>> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

/// Usage: `cargo run --example smooth_sequence [SEQUENCE_JSON] [CONFIG_JSON]`
///
/// Set `RUST_LOG=steadytrack_rs=debug` to see track creation and eviction.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let sequence_path = args.next().unwrap_or_else(|| SEQUENCE_JSON_PATH.to_string());
    let sequence = read_sequence_json(&sequence_path)?;

    let config = match args.next() {
        Some(path) => TrackerConfig::from_json_reader(std::fs::File::open(path)?)?,
        None => TrackerConfig::new(sequence.height, sequence.width),
    };
    let mut tracker = StableTracker::new(config)?;

    println!("=== Confident Object Per Frame ===");
    println!("Sequence: {} ({} frames)", sequence.name, sequence.frames.len());
    println!();

    let mut switches = 0;
    let mut last_id = None;
    for frame in sequence.frames.iter() {
        let mut boxes = Vec::with_capacity(frame.detections.len() * 4);
        let mut labels = Vec::with_capacity(frame.detections.len());
        let mut scores = Vec::with_capacity(frame.detections.len());
        for d in frame.detections.iter() {
            boxes.extend_from_slice(&[d.left, d.top, d.right, d.bottom]);
            labels.push(d.label);
            scores.push(d.score);
        }
        tracker.ingest_frame(&boxes, &labels, &scores)?;

        match tracker.get_confident_object() {
            Some(best) => {
                let [t, l, b, r] = best.bbox.get_tlbr();
                println!(
                    "frame {:>4}: track {:>3} label {:>3} score {:.3} seen {:>3} box [{:.3}, {:.3}, {:.3}, {:.3}]",
                    frame.frame_id, best.track_id, best.label, best.score, best.recognition_count, t, l, b, r
                );
                if last_id.is_some() && last_id != Some(best.track_id) {
                    switches += 1;
                }
                last_id = Some(best.track_id);
            }
            None => println!("frame {:>4}: -", frame.frame_id),
        }
    }

    println!();
    println!("Live tracks: {}", tracker.track_count());
    println!("Confident object switches: {}", switches);
    Ok(())
}
