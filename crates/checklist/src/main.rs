fn main() -> anyhow::Result<()> {
    checklist::cli::main()
}
