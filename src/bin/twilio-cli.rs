use clap::{Args, Parser, Subcommand};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::json;

use twilio_axum::security::{signature::signing_payload, FormParameters, RequestSigner, X_TWILIO_SIGNATURE};

#[derive(Parser)]
#[command(name = "twilio-cli")]
#[command(about = "Sign and send Twilio-style webhook requests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the X-Twilio-Signature for a URL and form parameters
    Sign(Request),
    /// POST a signed form to a webhook and print the response
    Send(Request),
}

#[derive(Args)]
struct Request {
    /// Auth token used as the HMAC key
    #[arg(short, long, env = "TWILIO_AUTH_TOKEN", hide_env_values = true)]
    token: String,

    /// Full webhook URL, including any query string
    #[arg(short, long)]
    url: String,

    /// Form parameter as key=value (repeatable). A repeated key is sent as
    /// separate fields and signed as one comma-joined value, as the platform does
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sign(request) => {
            let (params, signature) = sign(&request)?;
            if request.json {
                let output = json!({
                    "url": request.url,
                    "payload": signing_payload(&request.url, params.pairs()),
                    "signature": signature,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", signature);
            }
        }
        Commands::Send(request) => {
            let (_, signature) = sign(&request)?;
            let body = form_body(&request.params);

            let res = reqwest::Client::new()
                .post(&request.url)
                .header(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"))
                .header(X_TWILIO_SIGNATURE, HeaderValue::from_str(&signature)?)
                .body(body)
                .send()
                .await?;
            print_response(res, request.json).await?;
        }
    }

    Ok(())
}

fn sign(request: &Request) -> Result<(FormParameters, String), Box<dyn std::error::Error>> {
    let signer = RequestSigner::new(&request.token)?;
    let params: FormParameters = request.params.iter().cloned().collect();
    let signature = signer.sign(&request.url, params.pairs());
    Ok((params, signature))
}

/// Encode the pairs in the order given, repeated keys included.
fn form_body(params: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

async fn print_response(res: reqwest::Response, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await.unwrap_or_default();

    if as_json {
        let output = json!({ "status": status.as_u16(), "body": text });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if status.is_success() {
        println!("{}", status);
    } else {
        eprintln!("Error: webhook returned status {}", status);
    }
    if !text.is_empty() {
        println!("{}", text);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(params: &[&str]) -> Request {
        Request {
            token: "thisisafakeauthtoken".to_string(),
            url: "https://hooks.example.com/sms".to_string(),
            params: params.iter().map(|p| parse_param(p).unwrap()).collect(),
            json: false,
        }
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("Body=a=b").unwrap(), ("Body".to_string(), "a=b".to_string()));
        assert!(parse_param("Body").is_err());
    }

    #[test]
    fn test_repeated_keys_sent_separately_signed_joined() {
        let request = request(&["MediaUrl=a", "Body=hi", "MediaUrl=c"]);

        assert_eq!(form_body(&request.params), "MediaUrl=a&Body=hi&MediaUrl=c");

        let (params, signature) = sign(&request).unwrap();
        assert_eq!(params.get("MediaUrl"), Some("a,c"));

        let received = FormParameters::from_urlencoded(form_body(&request.params).as_bytes());
        let signer = RequestSigner::new(&request.token).unwrap();
        assert!(signer.verify(&request.url, received.pairs(), &signature));
    }
}
