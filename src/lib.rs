// Library root
// -----------
// The binary (`main.rs`) is a thin shim; everything it does lives here so
// it can be tested without a terminal or a network.
//
// Module responsibilities:
// - `config`: resolves the API key, endpoint and timeout from flags, env
//   and the optional JSON config file.
// - `api`: the blocking HTTP client and the response envelope.
// - `extract`: local validation and the file/URL extractors.
// - `ui`: banner rendering, the single-shot run and the interactive loop.
// - `error`: the error shown to the user when an extraction fails.
pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod ui;

pub use error::ScanError;
