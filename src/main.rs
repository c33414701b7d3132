fn main() -> anyhow::Result<()> {
    quantum_chat::cli::run()
}
