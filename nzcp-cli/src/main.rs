// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! `nzcp` command-line tool.
//!
//! Exit codes: 0 when decoding (and, for `verify`, trust evaluation) succeeds,
//! 1 for decode or usage errors, 3 when the signature is not trusted.

use std::io::Read as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use nzcp::{Envelope, JsonFileKeySet, TrustReport, TrustVerifier};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const EXIT_UNTRUSTED: u8 = 3;

#[derive(Debug, Parser)]
#[command(version, about = "Decode and verify NZ COVID Pass tokens")]
struct Arguments {
    #[command(subcommand)]
    command: Command,

    /// Print JSON instead of a text summary.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a token and print its headers and claims.
    Decode {
        /// The `NZCP:/...` token, or `-` to read it from stdin.
        token: String,
    },
    /// Decode a token and evaluate its signature against a key-set file.
    Verify {
        /// The `NZCP:/...` token, or `-` to read it from stdin.
        token: String,

        /// JSON object mapping key identifiers to lists of base64 SPKI keys.
        #[arg(long, env = "NZCP_KEYS")]
        keys: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Arguments::parse();

    match args.command {
        Command::Decode { token } => {
            let envelope = decode(&token)?;
            print_envelope(&envelope, None, args.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { token, keys } => {
            let envelope = decode(&token)?;
            debug!(keys = %keys.display(), "loading key set");
            let source = JsonFileKeySet::new(keys);

            let kid = envelope.key_identifier()?;
            let report = TrustVerifier::default()
                .verify_detailed(&envelope.signable_content(), kid, &source)
                .await;

            print_envelope(&envelope, Some(&report), args.json)?;
            Ok(if report.outcome.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_UNTRUSTED)
            })
        }
    }
}

fn decode(token: &str) -> anyhow::Result<Envelope> {
    let token = if token == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("failed to read token from stdin")?;
        buf
    } else {
        token.to_string()
    };
    nzcp::decode(token.trim()).context("failed to decode token")
}

fn print_envelope(envelope: &Envelope, report: Option<&TrustReport>, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let mut doc = envelope.to_json();
        if let Some(report) = report {
            doc["trust"] = json!({
                "outcome": report.outcome.as_str(),
                "kid": report.key_identifier,
                "matched_key_index": report.matched_key_index,
                "candidates_tried": report.candidates_tried,
            });
        }
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let claims = envelope.pass_claims();
    println!("version: {}", envelope.version());
    println!("kid: {}", envelope.key_identifier_text()?);
    match envelope.signing_algorithm().and_then(|alg| alg.as_i64()) {
        Some(alg) => println!("alg: {alg}"),
        None => println!("alg: (none)"),
    }
    if let Some(issuer) = claims.issuer() {
        println!("issuer: {issuer}");
    }
    if let Some(nbf) = claims.not_before() {
        println!("not_before: {nbf}");
    }
    if let Some(exp) = claims.expiry() {
        println!("expiry: {exp}");
    }
    if let Some(jti) = claims.token_id_uuid() {
        println!("jti: {jti}");
    }
    if let Some(subject) = claims.credential_subject() {
        println!("given_name: {}", subject.given_name().unwrap_or_default());
        println!("family_name: {}", subject.family_name().unwrap_or_default());
        println!("dob: {}", subject.dob().unwrap_or_default());
    }
    if let Some(report) = report {
        println!("trust: {}", report.outcome);
        if let Some(index) = report.matched_key_index {
            println!("matched_key_index: {index}");
        }
        println!("candidates_tried: {}", report.candidates_tried);
    }
    Ok(())
}
