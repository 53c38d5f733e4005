use ton_nft_collection::cli::Cli;
use ton_nft_collection::utils::init_logger;

fn main() -> anyhow::Result<()> {
    init_logger()?;
    let cli = Cli::parse_args();
    cli.execute()?;
    Ok(())
}
