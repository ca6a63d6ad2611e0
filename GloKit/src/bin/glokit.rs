fn main() -> anyhow::Result<()> {
    glokit::cli::run_cli()
}
