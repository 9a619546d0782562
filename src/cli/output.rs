pub use origami_core::format::OutputFormat;

use clap::builder::{PossibleValuesParser, TypedValueParser};

/// clap parser for `--format`, listing the accepted values in help output
pub fn format_parser() -> impl TypedValueParser<Value = OutputFormat> {
    PossibleValuesParser::new(["human", "json", "records"])
        .map(|s| s.parse::<OutputFormat>().unwrap_or_default())
}
