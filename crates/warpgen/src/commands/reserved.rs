//! Reserved-bytes decoder command.

use serde::Serialize;

use warpgen_config::Config;
use warpgen_core::{CoreError, ReservedBytes, ReservedMode, decode_or_default};

use crate::cli::{GlobalOpts, ReservedArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ReservedView {
    bytes: [u8; 3],
    comma: String,
    uri: String,
}

impl From<ReservedBytes> for ReservedView {
    fn from(r: ReservedBytes) -> Self {
        Self {
            bytes: r.as_bytes(),
            comma: r.to_comma_string(),
            uri: r.to_uri_component(),
        }
    }
}

pub fn handle(args: &ReservedArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let format = config::output_format(global, cfg);
    let mode = if args.strict {
        ReservedMode::Strict
    } else {
        ReservedMode::Lenient
    };

    let (reserved, warning) = decode_or_default(&args.client_id, mode).map_err(CoreError::from)?;
    if let Some(w) = warning {
        output::warn(w, output::should_color_stderr(global.color));
    }

    let view = ReservedView::from(reserved);
    let out = output::render_single(format, &view, |v| {
        format!("Reserved: {}\nURI form: {}", v.comma, v.uri)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
