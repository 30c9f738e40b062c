use crate::core::{extract, ExportMapper, ImportMapper, Mapper, Schema};
use crate::error::{MapperError, MapperResult};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::template::{source_from_json, Template};
use colored::Colorize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// Reject `--exclude` names that match no column
fn check_excludes<R>(schema: &Schema<R>, exclude: &[String]) -> MapperResult<()> {
    let columns = extract(schema, &HashSet::new())?;
    match exclude.iter().find(|name| columns.get(name).is_none()) {
        Some(unknown) => Err(MapperError::ColumnNotMatched(unknown.clone())),
        None => Ok(()),
    }
}

/// Execute the columns command
pub fn columns(template: PathBuf, exclude: Vec<String>) -> MapperResult<()> {
    let template = Template::load(&template)?;
    let schema = template.schema();
    check_excludes(&schema, &exclude)?;
    let excluded: HashSet<String> = exclude.into_iter().collect();
    let columns = extract(&schema, &excluded)?;

    println!(
        "{}",
        format!("📋 Columns of '{}'", template.type_name()).bold().green()
    );
    for (idx, descriptor) in columns.iter().enumerate() {
        let name = if descriptor.required {
            format!("{} (required)", descriptor.display_name).red().bold()
        } else {
            descriptor.display_name.normal()
        };
        let kind = schema.field(&descriptor.field_key)?.kind().to_string();
        println!(
            "   {:>2}. {}  → {} [{}]",
            idx + 1,
            name,
            descriptor.field_key.bright_blue(),
            kind
        );
    }
    println!();

    Ok(())
}

/// Execute the import command
pub fn import(
    template: PathBuf,
    input: PathBuf,
    output: Option<PathBuf>,
    exclude: Vec<String>,
    verbose: bool,
) -> MapperResult<()> {
    // Records go to stdout when no output file is given, so keep banners off it
    let chatty = output.is_some();
    if chatty {
        println!("{}", "📥 Excel Mapper - Import".bold().green());
        println!("   Template: {}", template.display());
        println!("   Input:    {}\n", input.display());
    }

    let template = Template::load(&template)?;
    let schema = template.schema();
    check_excludes(&schema, &exclude)?;

    if verbose && chatty {
        println!("{}", "📖 Reading spreadsheet...".cyan());
    }
    let grid = ExcelImporter::new(&input).read_grid()?;

    if verbose && chatty {
        println!("   Found {} rows (header included)\n", grid.len());
        println!("{}", "🔄 Mapping rows to records...".cyan());
    }
    let records = ImportMapper::new(&grid, &schema).filter(exclude).run()?;

    let document = Value::Array(records.into_iter().map(Value::Object).collect());
    let json = serde_json::to_string_pretty(&document)?;

    match output {
        Some(path) => {
            fs::write(&path, json)?;
            println!("{}", "✅ Import Complete!".bold().green());
            println!(
                "   {} records → {}\n",
                document.as_array().map_or(0, Vec::len),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Execute the export command
pub fn export(
    template: PathBuf,
    input: PathBuf,
    output: PathBuf,
    sheet: String,
    exclude: Vec<String>,
    verbose: bool,
) -> MapperResult<()> {
    println!("{}", "📤 Excel Mapper - Export".bold().green());
    println!("   Template: {}", template.display());
    println!("   Input:    {}", input.display());
    println!("   Output:   {}\n", output.display());

    let template = Template::load(&template)?;
    let schema = template.schema();
    check_excludes(&schema, &exclude)?;

    if verbose {
        println!("{}", "📖 Reading records...".cyan());
    }
    let content = fs::read_to_string(&input)?;
    let document: Value = serde_json::from_str(&content)?;

    if verbose {
        println!("{}", "📊 Building sheet...".cyan());
    }
    let encoded = ExportMapper::new(sheet, &schema, source_from_json(&document))
        .filter(exclude)
        .run()?;

    if verbose {
        println!(
            "   {} columns, {} records\n",
            encoded.header().map_or(0, |header| header.len()),
            encoded.record_count()
        );
    }

    ExcelExporter::new(&encoded).export(&output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Sheet '{}' → {}\n", encoded.name, output.display());

    Ok(())
}
