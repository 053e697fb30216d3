fn main() -> anyhow::Result<()> {
    moneta::run(moneta::StartupConfig::from_args())?;
    Ok(())
}
