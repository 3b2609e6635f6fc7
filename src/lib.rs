mod cli;
pub mod render;

use atar_engine::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
