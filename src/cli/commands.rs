use crate::config::ExtractConfig;
use crate::core::name_scanner::compile;
use crate::core::CellValue;
use crate::error::ExtractResult;
use crate::excel::{Workbook, XlsxLoader};
use crate::reader::SovReader;
use crate::types::SovDocument;
use crate::writer::{default_output_path, write_json};
use colored::Colorize;
use std::path::PathBuf;

/// Extra data label echoed in verbose output
const NAMED_INSURED: &str = "Named Insured";

/// Execute the extract command
pub fn extract(
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
) -> ExtractResult<()> {
    let output = output.unwrap_or_else(|| default_output_path(&input));

    println!("{}", "📄 SOV Reader - Extracting workbook".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let config = match config {
        Some(path) => {
            if verbose {
                println!("   Config: {}\n", path.display());
            }
            ExtractConfig::from_file(&path)?
        }
        None => ExtractConfig::default(),
    };

    if verbose {
        println!("{}", "📖 Reading workbook...".cyan());
    }

    let reader = SovReader::open(&input, config)?;
    let document = reader.document()?;

    if verbose {
        print_summary(&document);
    }

    write_json(&document, &output)?;

    println!("{}", "✅ Extraction Complete!".bold().green());
    println!("   SOV: {}", document.id.bright_blue());
    println!("   Buildings: {}", document.num_buildings);
    println!("   JSON file: {}\n", output.display());

    Ok(())
}

fn print_summary(document: &SovDocument) {
    println!("   Client: {}", document.metadata.client_name);
    println!("   Found {} buildings", document.num_buildings);

    if let Some(CellValue::Text(insured)) = document.extra_data.get(NAMED_INSURED) {
        println!("   Named Insured: {}", insured.bright_blue());
    }
    println!("   Extra data fields: {}", document.extra_data.len());

    match &document.policy_terms {
        Some(terms) => {
            println!(
                "   📊 Policy terms: {} layers, {} peril groups, {} zone groups",
                terms.layer_terms.len(),
                terms.peril_terms.len(),
                terms.zone_terms.len()
            );
            for layer in &terms.layer_terms {
                println!("      Layer {}", layer.name.bright_blue());
            }
            if !terms.excluded_subperil_types.is_empty() {
                println!(
                    "      Excluded: {}",
                    terms.excluded_subperil_types.join(", ").yellow()
                );
            }
        }
        None => println!("{}", "   No policy terms in workbook".yellow()),
    }
    println!();
}

/// Execute the names command
pub fn names(input: PathBuf, pattern: Option<String>) -> ExtractResult<()> {
    let workbook = XlsxLoader::new(&input).load()?;
    let filter = pattern.as_deref().map(compile).transpose()?;

    println!("{}", "📄 SOV Reader - Defined names".bold().green());
    println!("   File: {}\n", input.display());

    let mut shown = 0;
    for defined in workbook.defined_names() {
        if let Some(regex) = &filter {
            if !regex.is_match(&defined.name) {
                continue;
            }
        }
        println!("   {} → {}", defined.name.bright_blue(), defined.target);
        shown += 1;
    }

    println!(
        "\n   {} of {} names",
        shown,
        workbook.defined_names().len()
    );
    Ok(())
}
