//! Classify command - show how an address is interpreted.

use anyhow::Result;
use clap::Args;
use s3reader_core::{Address, classify, display_name, normalize};
use serde::Serialize;

use crate::OutputFormat;

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Address to classify.
    pub address: String,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,
}

/// JSON output for a classified address.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyOutput<'a> {
    normalized: String,
    file_name: String,
    remote: bool,
    address: &'a Address,
}

/// Runs the classify command.
pub fn run(args: &ClassifyArgs) -> Result<()> {
    println!("{}", render(&args.address, args.format)?);
    Ok(())
}

fn render(raw: &str, format: OutputFormat) -> Result<String> {
    let address = classify(raw)?;
    let normalized = normalize(raw);
    let file_name = display_name(&normalized);

    match format {
        OutputFormat::Json => {
            let output = ClassifyOutput {
                normalized,
                file_name,
                remote: address.is_remote(),
                address: &address,
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
        OutputFormat::Text => {
            let mut lines = vec![format!("kind:      {}", address.kind())];
            match &address {
                Address::None => {}
                Address::Local { path } => lines.push(format!("path:      {}", path.display())),
                Address::ObjectStore { bucket, key } => {
                    lines.push(format!("bucket:    {bucket}"));
                    lines.push(format!("key:       {key}"));
                }
                Address::Http { url } => lines.push(format!("url:       {url}")),
            }
            lines.push(format!("file name: {file_name}"));
            Ok(lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_object_store() {
        let out = render("s3://bucket//data///file.csv", OutputFormat::Text).unwrap();
        assert_eq!(
            out,
            "kind:      object_store\n\
             bucket:    bucket\n\
             key:       data/file.csv\n\
             file name: file.csv"
        );
    }

    #[test]
    fn test_text_local() {
        let out = render("./a//b.txt", OutputFormat::Text).unwrap();
        assert!(out.starts_with("kind:      local\n"));
        assert!(out.ends_with("file name: b.txt"));
    }

    #[test]
    fn test_json_http() {
        let out = render("https://example.com/a/b.txt", OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["remote"], true);
        assert_eq!(value["fileName"], "b.txt");
        assert_eq!(value["address"]["kind"], "http");
        assert_eq!(value["address"]["url"], "https://example.com/a/b.txt");
    }

    #[test]
    fn test_missing_bucket_is_an_error() {
        let err = render("s3:/", OutputFormat::Text).unwrap_err();
        assert!(err.downcast_ref::<s3reader_core::AddressError>().is_some());
    }
}
