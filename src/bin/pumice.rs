use anyhow::Result;

fn main() -> Result<()> {
    pumice::cli::run::<String>(None)
}
