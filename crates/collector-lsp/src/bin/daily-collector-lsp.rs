//! Daily Note Collector LSP Server Binary Entry Point

use collector_lsp::{create_lsp_service, init_logging};
use tower_lsp::Server;

#[tokio::main]
async fn main() {
    init_logging();

    log::info!("Daily Note Collector LSP server starting, listening on stdin/stdout");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = create_lsp_service();
    Server::new(stdin, stdout, socket).serve(service).await;
}
