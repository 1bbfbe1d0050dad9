use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::formula::Formula;
use crate::http::HttpClient;
use crate::runtime::Runtime;

/// Environment variable naming a JSON formula file to use instead of the
/// built-in one.
pub const FORMULA_ENV: &str = "ASCIIGEN_FORMULA";

pub struct Config {
    pub http_client: HttpClient,
    pub formula: Formula,
}

impl Config {
    pub fn new<R: Runtime>(runtime: &R, formula_path: Option<PathBuf>) -> Result<Self> {
        let formula = match formula_path {
            Some(path) => {
                debug!("Using formula file {:?}", path);
                Formula::load(runtime, &path)?
            }
            None => Formula::builtin(),
        };

        Ok(Self {
            http_client: HttpClient::with_defaults()?,
            formula,
        })
    }
}
