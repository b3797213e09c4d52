//! Fezz Invoke - call a Fezz function from the command line.
//!
//! The gateway URL and credential come from `FEZZ_URL` and `FEZZ_AUTH`.

use fezz_client::prelude::*;
use std::io::Write;
use std::process::exit;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: fezz-invoke <function-path> \
[--text BODY | --json JSON | --form KEY=VALUE ...] \
[--header NAME:VALUE ...] [--type json|text|arrayBuffer|blob]";

/// Parse command-line arguments into a function path and invoke options.
fn parse_args(args: &[String]) -> Result<(String, InvokeOptions), String> {
    let mut iter = args.iter();
    let path = iter.next().ok_or("missing function path")?.clone();
    let mut options = InvokeOptions::new();
    let mut form: Vec<(String, String)> = Vec::new();

    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("missing value for {}", flag))
        };

        match flag.as_str() {
            "--text" => options = options.body(value()?),
            "--json" => {
                let raw = value()?;
                let parsed: serde_json::Value =
                    serde_json::from_str(&raw).map_err(|e| format!("invalid --json: {}", e))?;
                options = options.json(&parsed).map_err(|e| e.to_string())?;
            }
            "--form" => {
                let pair = value()?;
                let (key, val) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", pair))?;
                form.push((key.to_string(), val.to_string()));
            }
            "--header" | "-H" => {
                let header = value()?;
                let (name, val) = header
                    .split_once(':')
                    .ok_or_else(|| format!("expected NAME:VALUE, got '{}'", header))?;
                options = options.header(name.trim(), val.trim());
            }
            "--type" => {
                let response_type = value()?.parse::<ResponseType>().map_err(|e| e.to_string())?;
                options = options.response_type(response_type);
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }

    if !form.is_empty() {
        options = options.form(form);
    }

    Ok((path, options))
}

/// Write decoded data to stdout.
fn print_data(data: &InvokeData) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match data {
        InvokeData::Json(value) => {
            let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            writeln!(stdout, "{}", pretty)
        }
        InvokeData::Text(text) => writeln!(stdout, "{}", text),
        InvokeData::Bytes(bytes) => stdout.write_all(bytes),
        InvokeData::Blob(blob) => stdout.write_all(&blob.bytes()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (path, options) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            exit(2);
        }
    };

    let client = FezzClient::with_config(ClientConfig::from_env())?;

    tracing::info!("Invoking '{}' via {}", path, client.base_url());

    match client.invoke(&path, options).await {
        Ok(data) => {
            print_data(&data)?;
            Ok(())
        }
        Err(e) => {
            tracing::error!("{}", e);
            if let Some(response) = e.context() {
                tracing::error!("Response body: {}", response.text_body());
            }
            exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_text_and_headers() {
        let (path, options) = parse_args(&args(&[
            "hello?x=1",
            "--text",
            "hi",
            "-H",
            "X-Name: Fezz",
            "--type",
            "text",
        ]))
        .unwrap();

        assert_eq!(path, "hello?x=1");
        assert_eq!(options.body, Some(InvokeBody::Text("hi".to_string())));
        assert_eq!(options.get_header("x-name"), Some("Fezz"));
        assert_eq!(options.response_type, ResponseType::Text);
    }

    #[test]
    fn test_parse_form_pairs() {
        let (_, options) =
            parse_args(&args(&["submit", "--form", "a=1", "--form", "b=x=y"])).unwrap();

        assert_eq!(
            options.body,
            Some(InvokeBody::form([("a", "1"), ("b", "x=y")]))
        );
    }

    #[test]
    fn test_parse_json_sets_content_type() {
        let (_, options) = parse_args(&args(&["echo", "--json", r#"{"a": 1}"#])).unwrap();

        assert_eq!(options.get_header("content-type"), Some("application/json"));
        assert_eq!(options.body, Some(InvokeBody::Text(r#"{"a":1}"#.to_string())));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&[]).is_err());
        assert!(parse_args(&args(&["hello", "--type", "xml"])).is_err());
        assert!(parse_args(&args(&["hello", "--text"])).is_err());
        assert!(parse_args(&args(&["hello", "--bogus"])).is_err());
    }
}
