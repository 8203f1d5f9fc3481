use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zipform")]
#[command(version)]
#[command(about = "Decode ZIP attachment payloads and extract form records", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipform form.zip.b64                  print the extracted record as JSON\n  \
  zipform -l form.zip.b64               list archive members\n  \
  pbpaste | zipform -z Asia/Tokyo -     read the payload from stdin")]
pub struct Cli {
    /// Payload files (base64 or decimal text), `-` for stdin
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Time zone that form dates are written in
    #[arg(short = 'z', long = "zone", value_name = "TZ", default_value = "Asia/Tokyo")]
    pub zone: String,

    /// YAML file with extra field labels
    #[arg(short = 'L', long = "labels", value_name = "FILE")]
    pub labels: Option<PathBuf>,

    /// List archive members only
    #[arg(short = 'l')]
    pub list: bool,

    /// Write decoded archives into DIR instead of extracting
    #[arg(short = 'D', long = "decode-only", value_name = "DIR")]
    pub decode_only: Option<PathBuf>,

    /// Do not split comma-joined payloads into segments
    #[arg(long = "no-segmented")]
    pub no_segmented: bool,

    /// More log output (-vv => trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (q, _) if q > 1 => "error",
            (1, _) => "warn",
            (_, 0) => "info",
            (_, 1) => "debug",
            _ => "trace",
        }
    }
}
