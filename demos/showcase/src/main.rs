use anyhow::Result;
use showcase::app;
use termpose_platform::run_terminal_app;

fn main() -> Result<()> {
    env_logger::init();
    run_terminal_app(app)
}
