use crate::options::{Envelope as EnvelopeCmd, EnvelopeFormat, LatLon};
use anyhow::Result;
use rfgeo::Envelope;
use serde::Serialize;
use std::io::Write;
use textplots::{Chart, Plot, Shape};

impl EnvelopeCmd {
    pub fn run(&self) -> Result<()> {
        let LatLon(start) = self.start;
        let LatLon(end) = self.end;

        let mut builder = Envelope::builder()
            .start(start)
            .end(end)
            .freq_ghz(self.frequency)
            .samples(self.samples);
        if let Some(scale) = self.scale {
            builder = builder.scale(scale);
        }
        let envelope = builder.build()?;

        match self.format {
            EnvelopeFormat::Csv => print_csv(&envelope)?,
            EnvelopeFormat::Json => print_json(&envelope)?,
            EnvelopeFormat::Plot => plot_ascii(&envelope),
        };
        Ok(())
    }
}

/// # Example with gnuplot
///
/// ```sh
/// cargo run -p linkplan -- envelope --start=44.2831,-71.3083 --end=44.2563,-71.2972 --frequency=5.8 | tr ',' ' ' > ~/.tmp/env && gnuplot -p -e "plot '~/.tmp/env' using 6:7 with lines, '' using 8:9 with lines"
/// ```
fn print_csv(envelope: &Envelope) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(
        stdout,
        "Longitude,Latitude,Radius,Scaled,UpperLongitude,UpperLatitude,LowerLongitude,LowerLatitude"
    )?;
    let n = envelope.centerline.len();
    for (idx, (point, radius)) in envelope
        .centerline
        .iter()
        .zip(envelope.radii_m.iter())
        .enumerate()
    {
        let scaled = radius * envelope.scale;
        let upper = envelope.upper()[idx];
        let lower = envelope.lower()[n - 1 - idx];
        writeln!(
            stdout,
            "{},{},{radius},{scaled},{},{},{},{}",
            point.x, point.y, upper.x, upper.y, lower.x, lower.y
        )?;
    }
    Ok(())
}

fn print_json(envelope: &Envelope) -> Result<()> {
    #[derive(Serialize)]
    struct JsonEnvelope {
        distance_m: f64,
        max_radius_m: f64,
        scale: f64,
        ring: Vec<[f64; 2]>,
    }

    let json = JsonEnvelope {
        distance_m: envelope.distance_m,
        max_radius_m: envelope.max_radius_m,
        scale: envelope.scale,
        ring: envelope.ring.iter().map(|c| [c.x, c.y]).collect(),
    };
    println!("{}", serde_json::to_string(&json)?);
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn plot_ascii(envelope: &Envelope) {
    let plot_data: Vec<(f32, f32)> = envelope
        .radii_m
        .iter()
        .enumerate()
        .map(|(idx, radius)| (idx as f32, *radius as f32))
        .collect();
    Chart::new(300, 150, 0.0, plot_data.len() as f32)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
    println!(
        "distance: {:.1} m, max radius: {:.2} m",
        envelope.distance_m, envelope.max_radius_m
    );
}
