//! Report Demo - composes a two-page branded sample report
//!
//! Shows:
//! - Builder construction with metadata and a custom font
//! - Text blocks and multi-line placement in centimeters
//! - Image placement with and without aspect preservation
//! - Page lifecycle (the template reappears on every page)
//!
//! Run with: cargo run --example report_demo -p report

use report::{Metadata, ReportCanvas};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "report=debug".into()),
        )
        .init();

    std::fs::create_dir_all("output")?;

    let metadata = Metadata::from_json(
        r#"{
            "Patient ID": "123",
            "Unit": "TrueBeam 2",
            "Beams analyzed": 4,
            "Tolerance (mm)": 1.5
        }"#,
    )?;

    let mut report = ReportCanvas::builder("Winston-Lutz Analysis")
        .metadata(metadata)
        .create("output/demo_report.pdf")?;

    // Page 1: summary text
    report.add_text_lines(
        &[
            "Summary",
            "Maximum 2D CAX->BB distance: 0.87 mm",
            "Median 2D CAX->BB distance: 0.52 mm",
            "Gantry 3D isocenter diameter: 1.12 mm",
        ],
        (2.0, 23.0),
        11.0,
    )?;
    report.add_text("Result: PASS", (2.0, 17.0), 14.0)?;

    // Page 2: a plot image, fit into its box without distortion
    report.add_new_page()?;
    let plot = std::fs::read("demos/sample_plot.png").or_else(|_| render_placeholder_plot())?;
    report.add_image(&plot, (3.0, 8.0), (14.0, 12.0), true)?;
    report.add_text("Figure 1: per-image deviation", (3.0, 7.0), 9.0)?;

    report.finish()?;
    println!("Wrote output/demo_report.pdf");
    Ok(())
}

/// Fallback plot when no sample image is present: a gray gradient PNG
fn render_placeholder_plot() -> std::io::Result<Vec<u8>> {
    use image::{ImageBuffer, Luma};

    let img: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_fn(280, 200, |x, y| Luma([((x + y) % 256) as u8]));
    let mut buffer = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut buffer),
        image::ImageFormat::Png,
    )
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    Ok(buffer)
}
