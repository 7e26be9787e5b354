mod cli;
mod demo;
mod infra;
mod routes;
mod seed;
mod server;

use lingua_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
