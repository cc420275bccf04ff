fn main() -> anyhow::Result<()> {
    tox_session::run()
}
