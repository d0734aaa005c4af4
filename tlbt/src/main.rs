use tlbt::cli::CommandLineInterface;

fn main() -> anyhow::Result<()> {
    let cli = CommandLineInterface::load();
    cli.init_logging();
    cli.run()
}
