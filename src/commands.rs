//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the movie services.
//! Each handler takes CLI args, config and Output, returns ExitCode.

use crate::api::{MetadataClient, MovieService};
use crate::cli::{
    validate_imdb_id, CombineCmd, EquationResponse, ExitCode, Output, PosterCmd, PosterResponse,
    ResolveCmd, SearchCmd,
};
use crate::config::Config;
use crate::error::ComputeError;
use crate::models::Operator;
use crate::search::match_query;

fn client(config: &Config, output: &Output) -> Result<MetadataClient, ExitCode> {
    MetadataClient::from_config(config).map_err(|e| output.error(e.to_string(), ExitCode::InvalidArgs))
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, config: &Config, output: &Output) -> ExitCode {
    output.info(format!("Searching for: {}", cmd.query));

    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }

    let cached = if cmd.no_cache {
        None
    } else {
        match_query(query, &config.search_cache())
    };

    let mut results = match cached {
        Some(movies) => movies,
        None => {
            let client = match client(config, output) {
                Ok(c) => c,
                Err(code) => return code,
            };
            match client.search(query).await {
                Ok(movies) => movies,
                Err(e) => return output.error(format!("Search failed: {}", e), ExitCode::NetworkError),
            }
        }
    };

    results.truncate(cmd.limit);

    if let Err(e) = output.print(&results) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Add / Subtract Commands
// =============================================================================

pub async fn combine_cmd(
    operator: Operator,
    cmd: CombineCmd,
    config: &Config,
    output: &Output,
) -> ExitCode {
    for id in [&cmd.first, &cmd.second] {
        if let Err(e) = validate_imdb_id(id) {
            return output.error(format!("{}: {}", e, id), ExitCode::InvalidArgs);
        }
    }

    let client = match client(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    output.info(format!(
        "Computing {} {} {}...",
        cmd.first,
        operator.symbol(),
        cmd.second
    ));

    match client.solve(operator, &cmd.first, &cmd.second).await {
        Ok(result) => {
            let response = EquationResponse {
                first: cmd.first,
                second: cmd.second,
                operator,
                result,
            };
            if let Err(e) = output.print(&response) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e @ ComputeError::Service(_)) => output.error(e.to_string(), ExitCode::NetworkError),
        Err(e) => output.error(e.to_string(), ExitCode::ComputeFailed),
    }
}

// =============================================================================
// Resolve Command
// =============================================================================

pub async fn resolve_cmd(cmd: ResolveCmd, config: &Config, output: &Output) -> ExitCode {
    if let Err(e) = validate_imdb_id(&cmd.imdb_id) {
        return output.error(e, ExitCode::InvalidArgs);
    }

    let client = match client(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match client.resolve_by_external_id(&cmd.imdb_id).await {
        Ok(Some(movie)) => {
            if let Err(e) = output.print(&movie) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Ok(None) => output.error(format!("No movie found for {}", cmd.imdb_id), ExitCode::NotFound),
        Err(e) => output.error(format!("Lookup failed: {}", e), ExitCode::NetworkError),
    }
}

// =============================================================================
// Poster Command
// =============================================================================

pub async fn poster_cmd(cmd: PosterCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match client(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let year = cmd.year.clone().unwrap_or_default();
    match client.resolve_image(&cmd.title, &year).await {
        Ok(image) => {
            let found = image.is_some();
            let response = PosterResponse {
                title: cmd.title,
                year: cmd.year,
                image,
            };
            if let Err(e) = output.print(&response) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            if found {
                ExitCode::Success
            } else {
                ExitCode::NotFound
            }
        }
        Err(e) => output.error(format!("Poster lookup failed: {}", e), ExitCode::NetworkError),
    }
}
