mod cli;

use std::{fs, path::Path, str::FromStr};

use alloy_primitives::{aliases::I96, U256};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde_json::json;
use superfluid_macro_core::{
    format::{format_amount, format_flow_rate_per_day},
    MacroConfig, MacroDispatcher,
};
use superfluid_macro_encoder::{
    encoder::{
        decode_hex, encode_provided_params, inspect_envelope, parse_signing_key, preview,
        sign_request, signer_address,
    },
    logging::init_logging,
    tokens::StaticTokenBook,
    types::ActionRequest,
};

use cli::{Cli, Commands, InspectArgs, PreviewArgs, SignArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging("info", cli.log_format);

    match cli.command {
        Commands::Encode(args) => {
            let request = load_request(&args.request)?;
            println!("0x{}", hex::encode(encode_provided_params(&request)?));
        }
        Commands::Digest(args) => digest(cli.config.as_deref(), &args)?,
        Commands::Sign(args) => sign(cli.config.as_deref(), &args)?,
        Commands::Inspect(args) => inspect(cli.config.as_deref(), &args)?,
        Commands::FormatAmount { amount, decimals } => {
            let raw = U256::from_str(&amount)
                .map_err(|err| anyhow!("invalid amount `{amount}`: {err}"))?;
            println!("{}", format_amount(raw, decimals));
        }
        Commands::FormatRate { rate } => {
            let rate = I96::from_str(&rate).map_err(|err| anyhow!("invalid flow rate `{rate}`: {err}"))?;
            println!("{}", format_flow_rate_per_day(rate));
        }
    }
    Ok(())
}

fn digest(config: Option<&Path>, args: &PreviewArgs) -> Result<()> {
    let request = load_request(&args.request.request)?;
    let book = StaticTokenBook::load(&args.tokens)?;
    let dispatcher = load_dispatcher(config, &book)?;

    let preview = preview(&dispatcher, &book, &request)?;
    println!("{}", serde_json::to_string_pretty(&preview)?);
    Ok(())
}

fn sign(config: Option<&Path>, args: &SignArgs) -> Result<()> {
    let request = load_request(&args.preview.request.request)?;
    let book = StaticTokenBook::load(&args.preview.tokens)?;
    let dispatcher = load_dispatcher(config, &book)?;
    let key = parse_signing_key(&args.key)?;

    let (preview, envelope) = sign_request(&dispatcher, &book, &request, &key)?;
    let out = json!({
        "signer": signer_address(&key),
        "message": preview.message,
        "digest": preview.digest,
        "envelope": format!("0x{}", hex::encode(envelope)),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn inspect(config: Option<&Path>, args: &InspectArgs) -> Result<()> {
    let envelope = decode_hex(&args.envelope)?;
    let report = match (args.caller, &args.tokens) {
        (Some(caller), Some(tokens)) => {
            let book = StaticTokenBook::load(tokens)?;
            let dispatcher = load_dispatcher(config, &book)?;
            inspect_envelope(&envelope, Some((&dispatcher, &book, caller)))?
        }
        _ => inspect_envelope::<StaticTokenBook>(&envelope, None)?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_request(path: &Path) -> Result<ActionRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read request {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse request {}", path.display()))
}

fn load_dispatcher(config: Option<&Path>, book: &StaticTokenBook) -> Result<MacroDispatcher> {
    let path = config.ok_or_else(|| anyhow!("missing --config (or MACRO_CONFIG)"))?;
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: MacroConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    tracing::info!(
        chain_id = config.domain.chain_id,
        verifying_contract = %config.domain.verifying_contract,
        fee = config.fee.is_some(),
        "config loaded"
    );
    MacroDispatcher::from_config(&config, book).context("failed to build dispatcher")
}
