//! Run a short course once against the simulator.
//!
//! ```sh
//! RUST_LOG=info cargo run --example simulated_run
//! ```

use core::time::Duration;
use embedded_drive::{
    sim::{SimConfig, SimRobot},
    HeadingFrame, Hsv, Mission, Step,
};

/// Blue tape on the course means back out and face the other way.
fn classify(hsv: Hsv) -> Option<Vec<Step>> {
    if (200. ..260.).contains(&hsv.hue) && hsv.saturation > 0.4 {
        Some(vec![Step::backward(0.8, 60.), Step::turn(170.)])
    } else {
        None
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let config = SimConfig::default()
        .with_brake_slip(Duration::from_millis(30))
        .with_mismatch(0.05)
        .with_color(Hsv::new(225., 0.7, 0.5));
    let mut robot = SimRobot::new(config);
    let mut frame = HeadingFrame::new();

    let mission = Mission::new(vec![
        Step::forward(3., 80.),
        Step::turn(90.),
        Step::forward(1.5, 70.),
        Step::Wait(Duration::from_millis(250)),
        Step::Inspect(classify),
        Step::turn(-45.),
        Step::forward(2., 100.),
    ]);

    match mission.run(&mut robot, &mut frame).await {
        Ok(summary) => {
            for report in &summary.reports {
                println!(
                    "{:>8}: {:>4} iterations, residual {:+.3} deg{}",
                    report.kind,
                    report.iterations,
                    report.residual,
                    if report.pulsed { " (pulsed)" } else { "" }
                );
            }
            println!(
                "{} markers, {} misses, true heading {:.2} deg",
                summary.markers,
                summary.misses,
                robot.true_heading()
            );
        }
        Err(error) => {
            eprintln!("mission failed: {}", error);
            std::process::exit(1);
        }
    }
}
