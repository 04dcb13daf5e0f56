//! Command implementations: file IO at the edges, the orchestrator in the
//! middle.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, bail};
use archrender_client::{ApiClient, PlanningLot, PlanningRequest, ReferenceListing};
use archrender_core::{ImageData, mime_from_extension};
use archrender_pipeline::{Flow, Orchestrator, ReferenceSource};

use crate::display;
use crate::{FormArgs, ReferenceArgs};

pub async fn analyze(client: ApiClient, sketch: &Path, json: bool) -> anyhow::Result<()> {
    let mut orch = Orchestrator::new(client);
    orch.session_mut().set_sketch(read_image(sketch)?);

    eprintln!("  Analyzing {}...", sketch.display());
    let start = Instant::now();
    if orch.analyze().await?.is_busy() {
        bail!("another flow is in progress");
    }
    eprintln!("  Done in {:.1}s", start.elapsed().as_secs_f64());

    let analysis = orch
        .session()
        .analysis()
        .context("backend returned no analysis")?;
    if json {
        println!("{}", serde_json::to_string_pretty(analysis)?);
    } else {
        display::print_analysis_card(analysis);
    }
    Ok(())
}

pub async fn render(
    client: ApiClient,
    sketch: &Path,
    output: &Path,
    form: FormArgs,
    reference: ReferenceArgs,
    analyze_first: bool,
) -> anyhow::Result<()> {
    let mut orch = Orchestrator::new(client);
    orch.session_mut().set_sketch(read_image(sketch)?);
    let start = Instant::now();

    if analyze_first {
        eprintln!("  Analyzing sketch...");
        if orch.analyze().await?.is_busy() {
            bail!("another flow is in progress");
        }
    }

    // Manual overrides edit the live form; anything changed after the
    // analyze-time translation forces a re-translate before render.
    let changed = form.apply(orch.session_mut().form_mut());
    if changed || !analyze_first {
        eprintln!("  Translating form...");
        if orch.translate().await?.is_busy() {
            bail!("another flow is in progress");
        }
    }

    if let Some(path) = &reference.reference {
        orch.pick_reference(ReferenceSource::Upload(read_image(path)?))
            .await?;
    } else if let Some(id) = &reference.reference_id {
        eprintln!("  Fetching reference {id}...");
        orch.pick_reference(ReferenceSource::Library {
            image_id: id.clone(),
        })
        .await?;
    }

    let aspect_ratio = orch.session().form().aspect_ratio.clone();
    let viewpoint = orch.session().form().viewpoint.clone();
    eprintln!("  Rendering ({aspect_ratio}, {viewpoint})...");
    let image = match orch.render().await? {
        Flow::Done(image) => image,
        Flow::Busy => bail!("another flow is in progress"),
    };

    write_image(output, &image)?;
    eprintln!("  Done in {:.1}s", start.elapsed().as_secs_f64());
    println!("{} ({})", output.display(), image.mime_type);
    Ok(())
}

pub async fn list_references(client: ApiClient, category: Option<&str>) -> anyhow::Result<()> {
    match client.list_references(category).await? {
        ReferenceListing::Categories { categories } => {
            println!("Categories ({}):", categories.len());
            for category in categories {
                println!("  {category}");
            }
            println!();
            println!("Use --category <name> to list its images.");
        }
        ReferenceListing::Images { images } => {
            println!("Images ({}):", images.len());
            for image in images {
                print!("  {:<16} {}", image.id, image.name);
                if let Some(url) = image.thumbnail_url {
                    print!("  {url}");
                }
                println!();
            }
        }
    }
    Ok(())
}

pub async fn download_reference(
    client: ApiClient,
    id: &str,
    output: &Path,
) -> anyhow::Result<()> {
    let download = client.download_reference(id).await?;
    let image = image_from_payload(download.base64, download.mime_type);
    write_image(output, &image)?;
    println!("{} ({})", output.display(), image.mime_type);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn plan(
    client: ApiClient,
    site_plan: &Path,
    lot_map: &Path,
    output: &Path,
    lots: &[String],
    camera_angle: String,
    time_of_day: String,
    aspect_ratio: String,
    style_keywords: String,
) -> anyhow::Result<()> {
    let lot_descriptions = lots
        .iter()
        .map(|lot| parse_lot(lot))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let request = PlanningRequest {
        site_plan_base64: read_image(site_plan)?.base64,
        lot_map_base64: read_image(lot_map)?.base64,
        lot_descriptions,
        camera_angle,
        time_of_day,
        aspect_ratio,
        style_keywords,
    };

    eprintln!(
        "  Rendering plan ({} lots)...",
        request.lot_descriptions.len()
    );
    let start = Instant::now();
    let response = client.detail_render(&request).await?;
    let image = image_from_payload(response.generated_image_base64, response.mime_type);

    write_image(output, &image)?;
    eprintln!("  Done in {:.1}s", start.elapsed().as_secs_f64());
    println!("{} ({})", output.display(), image.mime_type);
    Ok(())
}

pub async fn upscale(
    client: ApiClient,
    image_path: &Path,
    output: &Path,
    scale: u8,
    estimate_only: bool,
) -> anyhow::Result<()> {
    if estimate_only {
        let estimate = client.estimate_upscale_cost(scale).await?;
        println!("{}x upscale: ${:.3}", estimate.scale, estimate.cost_estimate);
        if let Some(time) = estimate.processing_time_estimate {
            println!("Estimated time: {time}");
        }
        return Ok(());
    }

    let source = read_image(image_path)?;
    eprintln!("  Upscaling {scale}x...");
    let start = Instant::now();
    let response = client.upscale(&source, scale).await?;
    let image = image_from_payload(response.upscaled_image_base64, response.mime_type);

    write_image(output, &image)?;
    eprintln!(
        "  {} -> {} in {:.1}s",
        response.original_resolution,
        response.upscaled_resolution,
        start.elapsed().as_secs_f64()
    );
    eprintln!("  Cost: ${:.3}", response.cost_estimate);
    println!("{} ({})", output.display(), image.mime_type);
    Ok(())
}

pub async fn health(client: ApiClient) -> anyhow::Result<()> {
    let status = client.health().await?;
    println!("Status: {}", status.status);
    if !status.features.is_empty() {
        println!("Features:");
        for feature in status.features {
            println!("  {feature}");
        }
    }
    Ok(())
}

fn read_image(path: &Path) -> anyhow::Result<ImageData> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let mime = mime_from_extension(ext)
        .with_context(|| format!("unsupported image extension: {}", path.display()))?;
    Ok(ImageData::from_bytes(&bytes, mime))
}

fn write_image(path: &Path, image: &ImageData) -> anyhow::Result<()> {
    let bytes = image.decode().context("decoding image payload")?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

/// Backends answer with either bare base64 or a full data URI.
fn image_from_payload(payload: String, mime_type: String) -> ImageData {
    match ImageData::from_data_uri(&payload) {
        Ok(image) => image,
        Err(_) => ImageData {
            base64: payload,
            mime_type,
        },
    }
}

fn parse_lot(input: &str) -> anyhow::Result<PlanningLot> {
    let Some((number, description)) = input.split_once(':') else {
        bail!("lot must be <number>:<description>, got {input:?}");
    };
    let number = number.trim();
    let description = description.trim();
    if number.is_empty() || description.is_empty() {
        bail!("lot must be <number>:<description>, got {input:?}");
    }
    Ok(PlanningLot {
        lot_number: number.to_string(),
        description: description.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lot_splits_on_first_colon() {
        let lot = parse_lot("12: corner cafe, two storeys: brick").unwrap();
        assert_eq!(lot.lot_number, "12");
        assert_eq!(lot.description, "corner cafe, two storeys: brick");
    }

    #[test]
    fn parse_lot_rejects_missing_parts() {
        assert!(parse_lot("no separator").is_err());
        assert!(parse_lot(":description only").is_err());
        assert!(parse_lot("7:").is_err());
    }

    #[test]
    fn payload_accepts_data_uri() {
        let image = image_from_payload(
            "data:image/png;base64,aW1n".to_string(),
            "image/jpeg".to_string(),
        );
        // The URI's own mime wins over the response field.
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.base64, "aW1n");
    }

    #[test]
    fn payload_accepts_bare_base64() {
        let image = image_from_payload("aW1n".to_string(), "image/png".to_string());
        assert_eq!(image.base64, "aW1n");
        assert_eq!(image.mime_type, "image/png");
    }
}
