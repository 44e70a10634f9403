use std::path::PathBuf;

use alloy_primitives::Address;
use clap::{Args, Parser, Subcommand};

use superfluid_macro_encoder::logging::LogFormat;

/// Encode, preview, sign and inspect Superfluid macro envelopes.
#[derive(Parser, Debug)]
#[command(name = "superfluid-macro-encoder", version, about, propagate_version = true)]
pub struct Cli {
    /// Macro deployment config (JSON): signing domain, fee and action codes.
    #[arg(long, short = 'c', env = "MACRO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the hex `providedParams` for a request.
    Encode(RequestArgs),
    /// Print the message and EIP-712 digest a wallet must sign.
    Digest(PreviewArgs),
    /// Sign a request and print the sealed envelope.
    Sign(SignArgs),
    /// Decode an envelope, optionally checking it against a caller.
    Inspect(InspectArgs),
    /// Render a raw token amount with five decimals.
    FormatAmount {
        /// Raw amount, decimal or 0x-hex.
        amount: String,
        #[arg(long, default_value_t = 18)]
        decimals: u8,
    },
    /// Render a per-second flow rate as a per-day amount.
    FormatRate {
        /// Flow rate in wei per second.
        #[arg(allow_hyphen_values = true)]
        rate: String,
    },
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Action request (JSON).
    #[arg(long, short = 'r')]
    pub request: PathBuf,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Token book (JSON) used to render symbols and amounts.
    #[arg(long, short = 't')]
    pub tokens: PathBuf,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub preview: PreviewArgs,

    /// Hex secp256k1 secret key of the signer.
    #[arg(long, env = "SIGNER_KEY", hide_env_values = true)]
    pub key: String,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Hex envelope.
    pub envelope: String,

    /// Authenticate the envelope as if submitted on behalf of this address.
    #[arg(long, requires = "tokens")]
    pub caller: Option<Address>,

    #[arg(long, short = 't')]
    pub tokens: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_rate_is_not_a_flag() {
        let cli = Cli::try_parse_from(["superfluid-macro-encoder", "format-rate", "-1157407407407"])
            .unwrap();
        match cli.command {
            Commands::FormatRate { rate } => assert_eq!(rate, "-1157407407407"),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
