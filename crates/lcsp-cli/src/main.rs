//! lcsp - rewrite a Content-Security-Policy for a legacy browser
//!
//! ```text
//! lcsp --user-agent "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.1; Trident/6.0)" "script-src 'nonce-abc'"
//! X-Content-Security-Policy: script-src 'unsafe-inline'
//! ```

#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lcsp_resolver::{Resolution, TargetLevel};
use lcsp_rewrite::{
    CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY_REPORT_ONLY, CspRewriter, ExtendCspHook, Request, Response,
    ResponseHook, RewriteConfig,
};

/// Rewrite CSP headers the way a given browser would receive them.
#[derive(Parser, Debug)]
#[command(name = "lcsp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// User-Agent of the requesting browser
    #[arg(short = 'u', long, conflicts_with = "level")]
    user_agent: Option<String>,

    /// Target CSP level instead of detecting one (0 removes the header)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=3))]
    level: Option<u8>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat the policies as Content-Security-Policy-Report-Only
    #[arg(long)]
    report_only: bool,

    /// Policies, one header occurrence each
    #[arg(required = true)]
    policies: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the rewritten headers
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RewriteConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => RewriteConfig::default(),
    };
    let rewriter = CspRewriter::from_config(&config).context("indexing capability data")?;

    let header = if cli.report_only {
        CONTENT_SECURITY_POLICY_REPORT_ONLY
    } else {
        CONTENT_SECURITY_POLICY
    };

    let mut request = Request::get("/");
    if let Some(ua) = &cli.user_agent {
        request = request.with_user_agent(ua);
    }
    let mut response = cli
        .policies
        .iter()
        .fold(Response::new(200), |response, policy| response.with_header(header, policy));

    ExtendCspHook::new(config.extension()).on_response(&request, &mut response);

    let resolution = match cli.level {
        // value_parser bounds the level to 0..=3
        Some(level) => Resolution::new(TargetLevel::from_number(level).unwrap_or(TargetLevel::Unknown)),
        None => rewriter.resolve(request.user_agent()),
    };
    tracing::info!(level = %resolution.level, header = %resolution.header_name(header), "resolved");

    rewriter.apply(&resolution, &mut response.headers);

    if response.headers.is_empty() {
        println!("(removed)");
    }
    for (name, value) in response.headers.iter() {
        println!("{name}: {value}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from(["lcsp", "--level", "1", "--report-only", "script-src a.com/x", "img-src b.com"]).unwrap();
        assert_eq!(cli.level, Some(1));
        assert!(cli.report_only);
        assert_eq!(cli.policies.len(), 2);
    }

    #[test]
    fn test_rejects_bad_level_and_conflicts() {
        assert!(Cli::try_parse_from(["lcsp", "--level", "4", "default-src 'self'"]).is_err());
        assert!(Cli::try_parse_from(["lcsp", "--level", "1", "-u", "x", "default-src 'self'"]).is_err());
        assert!(Cli::try_parse_from(["lcsp"]).is_err());
    }
}
