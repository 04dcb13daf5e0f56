//! Vertical card display for sketch analysis results.
//!
//! Renders an [`AnalysisResult`] as a grouped, human-readable card, skipping
//! sections the backend left empty.

use archrender_core::AnalysisResult;

const MAX_LIST_ITEMS: usize = 10;

/// Print an analysis as a vertical card grouped by section.
pub fn print_analysis_card(analysis: &AnalysisResult) {
    println!("=== Sketch Analysis ===");
    println!();

    if analysis.building_type.is_some()
        || analysis.facade_style.is_some()
        || analysis.floor_count.is_some()
    {
        println!("Building");
        print_opt("building_type", &analysis.building_type);
        print_opt("facade_style", &analysis.facade_style);
        print_opt("floor_count", &analysis.floor_count);
        println!();
    }

    if !analysis.critical_elements.is_empty()
        || !analysis.materials_precise.is_empty()
        || !analysis.environment.is_empty()
    {
        println!("Detected Elements");
        print_list("critical_elements", &analysis.critical_elements);
        print_list("materials_precise", &analysis.materials_precise);
        print_list("environment", &analysis.environment);
        println!();
    }

    if let Some(specs) = &analysis.technical_specs {
        let has_data = specs.camera.is_some()
            || specs.lens.is_some()
            || specs.lighting.is_some()
            || specs.materials.is_some();
        if has_data {
            println!("Technical Specs");
            print_opt("camera", &specs.camera);
            print_opt("lens", &specs.lens);
            print_opt("lighting", &specs.lighting);
            print_opt("materials", &specs.materials);
            println!();
        }
    }

    if analysis.sketch_detail_level.is_some()
        || analysis.is_colored.is_some()
        || analysis.sketch_type.is_some()
    {
        println!("Sketch");
        print_opt("detail_level", &analysis.sketch_detail_level);
        if let Some(colored) = analysis.is_colored {
            println!(
                "  {:<26} {}",
                "is_colored",
                if colored { "yes" } else { "no" }
            );
        }
        print_opt("sketch_type", &analysis.sketch_type);
        println!();
    }
}

fn print_opt(name: &str, value: &Option<String>) {
    if let Some(value) = value {
        println!("  {:<26} {}", name, value);
    }
}

fn print_list(name: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let show = items.len().min(MAX_LIST_ITEMS);
    println!("  {:<26} {}", name, items[..show].join(", "));
    if items.len() > MAX_LIST_ITEMS {
        println!("  {:<26} ... and {} more", "", items.len() - MAX_LIST_ITEMS);
    }
}
