mod cli;
mod infra;
mod render;
mod routes;
mod server;

use clinic_forms::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
