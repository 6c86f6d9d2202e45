use crate::infra::load_service;
use clap::Args;
use paperflow::config::{AppConfig, NormalizationConfig};
use paperflow::correspondents::{resolve_csv, slugify, CorrespondentIdentity, StoragePathPlan};
use paperflow::error::AppError;
use paperflow::telemetry::{self, LogTarget};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// Raw correspondent names
    #[arg(required = true)]
    pub(crate) names: Vec<String>,
    /// Emit one JSON object per line instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SlugArgs {
    /// Display name to turn into a path segment
    pub(crate) text: String,
}

#[derive(Args, Debug)]
pub(crate) struct StoragePathArgs {
    /// Raw correspondent name
    pub(crate) name: String,
    /// Storage category (defaults to PAPERFLOW_DEFAULT_CATEGORY)
    #[arg(long)]
    pub(crate) category: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with a `name` column and an optional `category` column
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where to write the resolved CSV (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_normalize(args: NormalizeArgs) -> Result<(), AppError> {
    let service = load_service(&command_config()?)?;
    let identities: Vec<CorrespondentIdentity> = args
        .names
        .iter()
        .map(|name| service.normalizer().resolve(name))
        .collect();

    write_identities(&mut io::stdout().lock(), &identities, args.json)?;
    Ok(())
}

pub(crate) fn run_slug(args: SlugArgs) -> Result<(), AppError> {
    println!("{}", slugify(&args.text));
    Ok(())
}

pub(crate) fn run_storage_path(args: StoragePathArgs) -> Result<(), AppError> {
    let service = load_service(&command_config()?)?;
    let plan = service.plan(args.category.as_deref(), &args.name);

    write_plan(&mut io::stdout().lock(), &plan)?;
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let service = load_service(&command_config()?)?;
    let input = File::open(&args.input)?;

    let written = match args.output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            resolve_csv(service.planner(), input, writer)?
        }
        None => resolve_csv(service.planner(), input, io::stdout().lock())?,
    };

    eprintln!("Resolved {written} correspondent rows");
    Ok(())
}

fn write_identities<W: Write>(
    out: &mut W,
    identities: &[CorrespondentIdentity],
    json: bool,
) -> io::Result<()> {
    for identity in identities {
        if json {
            let line = serde_json::to_string(identity).map_err(io::Error::from)?;
            writeln!(out, "{line}")?;
        } else {
            writeln!(
                out,
                "{} -> {} [{}]",
                identity.raw.as_deref().unwrap_or_default(),
                identity.canonical,
                identity.slug
            )?;
        }
    }
    Ok(())
}

fn write_plan<W: Write>(out: &mut W, plan: &StoragePathPlan) -> io::Result<()> {
    writeln!(out, "Canonical: {}", plan.correspondent_canonical)?;
    writeln!(out, "Slug: {}", plan.correspondent_slug)?;
    writeln!(out, "Template: {}", plan.path_template)?;
    writeln!(out, "Name: {}", plan.display_name)
}

/// Logs go to stderr so stdout stays machine readable.
fn command_config() -> Result<NormalizationConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_target(&config.telemetry, LogTarget::Stderr)?;
    Ok(config.normalization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperflow::correspondents::CorrespondentService;
    use serde_json::{json, Value};
    use std::io::Cursor;

    fn service() -> CorrespondentService {
        CorrespondentService::from_config(&NormalizationConfig::default())
            .expect("standard service builds")
    }

    fn rendered(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn normalize_prints_one_line_per_name() {
        let service = service();
        let identities: Vec<_> = ["Acme GmbH & Co", "magenta telekom austria", "  "]
            .iter()
            .map(|name| service.normalizer().resolve(name))
            .collect();

        let mut buffer = Vec::new();
        write_identities(&mut buffer, &identities, false).expect("write table");

        assert_eq!(
            rendered(buffer),
            "Acme GmbH & Co -> Acme [acme]\n\
             magenta telekom austria -> Magenta Telekom [magenta-telekom]\n\
             \x20  -> Unknown [unknown]\n"
        );
    }

    #[test]
    fn normalize_json_lines_carry_every_field() {
        let identities = vec![service().normalizer().resolve("Ärger GmbH")];

        let mut buffer = Vec::new();
        write_identities(&mut buffer, &identities, true).expect("write json");

        let output = rendered(buffer);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);
        let parsed: Value = serde_json::from_str(lines[0]).expect("json line");
        assert_eq!(
            parsed,
            json!({ "raw": "Ärger GmbH", "canonical": "Ärger", "slug": "arger" })
        );
    }

    #[test]
    fn storage_path_prints_labelled_fields() {
        let plan = service().plan(None, "Acme GmbH");

        let mut buffer = Vec::new();
        write_plan(&mut buffer, &plan).expect("write plan");

        assert_eq!(
            rendered(buffer),
            "Canonical: Acme\n\
             Slug: acme\n\
             Template: reference-documents/acme/{created_year}-{created_month}-{created_day}-{title}\n\
             Name: reference-documents - Acme\n"
        );
    }

    #[test]
    fn batch_output_is_csv_with_header() {
        let service = service();
        let mut buffer = Vec::new();
        let written = resolve_csv(
            service.planner(),
            Cursor::new("name,category\nAcme GmbH,invoices\n"),
            &mut buffer,
        )
        .expect("batch writes");

        assert_eq!(written, 1);
        assert_eq!(
            rendered(buffer),
            "raw,canonical,slug,path_template,display_name\n\
             Acme GmbH,Acme,acme,invoices/acme/{created_year}-{created_month}-{created_day}-{title},invoices - Acme\n"
        );
    }
}
